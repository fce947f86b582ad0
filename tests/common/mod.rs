use std::{
    ffi::OsString,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Result;
use tempfile::{tempdir, TempDir};
use test_context::TestContext;

/// A source directory and an output directory.
pub struct ConversionContext {
    pub source_directory: TempDir,
    pub output_directory: TempDir,
}

impl TestContext for ConversionContext {
    fn setup() -> Self {
        ConversionContext {
            source_directory: tempdir().unwrap(),
            output_directory: tempdir().unwrap(),
        }
    }
}

impl ConversionContext {
    /// Creates dummy source files. FFmpeg is never run on them for real.
    pub fn create_source_files(&self, filenames: &[&str]) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(filenames.len());

        for filename in filenames {
            let path = self.source_directory.path().join(filename);

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }

            File::create(&path)?.write_all(b"test")?;

            paths.push(path);
        }

        Ok(paths)
    }

    /// Builds command line arguments.
    pub fn arguments<P: AsRef<Path>>(&self, ffmpeg: P, options: &[&str]) -> Vec<OsString> {
        let mut arguments: Vec<OsString> = vec!["ffaudio-converter".into()];

        arguments.push("--ffmpeg".into());
        arguments.push(ffmpeg.as_ref().as_os_str().to_os_string());
        arguments.extend(options.iter().map(OsString::from));
        arguments.push(self.output_directory.path().as_os_str().to_os_string());
        arguments.push(self.source_directory.path().as_os_str().to_os_string());

        arguments
    }
}

/// An executable that ignores its arguments and exits with code 0.
#[allow(dead_code)]
pub fn succeeding_ffmpeg() -> PathBuf {
    which::which("true").unwrap()
}

/// An executable that ignores its arguments and exits with code 1.
#[allow(dead_code)]
pub fn failing_ffmpeg() -> PathBuf {
    which::which("false").unwrap()
}
