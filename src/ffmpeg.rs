// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! A module for running FFmpeg.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use which::which;

use crate::conversion_error::ConversionError;

fn command_name(program: &Path) -> String {
    program
        .file_name()
        .unwrap_or(program.as_os_str())
        .to_string_lossy()
        .into_owned()
}

/// Resolves the path of the FFmpeg executable.
///
/// A bare name like `ffmpeg` is looked up on `PATH`. A path with a directory is used as it is.
pub fn resolve_ffmpeg<P: AsRef<Path>>(binary: P) -> Result<PathBuf, ConversionError> {
    let binary = binary.as_ref();

    if binary.components().count() > 1 {
        return if binary.is_file() {
            Ok(binary.to_path_buf())
        } else {
            Err(ConversionError::NotFile {
                path: binary.to_path_buf(),
            })
        };
    }

    which(binary).map_err(|error| ConversionError::CommandNotFound {
        command: command_name(binary),
        error,
    })
}

/// Runs an external command until it exits.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Runs `program` with `arguments`.
    ///
    /// Succeeds only if the command exits with code 0.
    fn run(&self, program: &Path, arguments: &[OsString]) -> Result<(), ConversionError>;
}

/// Runs FFmpeg as a child process.
///
/// The standard output is discarded. The standard error is kept for the error report.
pub struct FFmpegRunner;

impl CommandRunner for FFmpegRunner {
    fn run(&self, program: &Path, arguments: &[OsString]) -> Result<(), ConversionError> {
        let result = Command::new(program)
            .args(arguments)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output();

        match result {
            Ok(output) => {
                if output.status.success() {
                    Ok(())
                } else {
                    Err(ConversionError::CommandFailed {
                        command: command_name(program),
                        code: output.status.code(),
                        stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
                    })
                }
            }
            Err(error) => Err(ConversionError::CommandCannotExecuted {
                command: command_name(program),
                error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_name_is_filename() {
        assert_eq!("ffmpeg", command_name(Path::new("/usr/bin/ffmpeg")));
        assert_eq!("ffmpeg", command_name(Path::new("ffmpeg")));
    }

    #[test]
    fn unknown_command_is_not_found() {
        let error = resolve_ffmpeg("ffaudio-converter-command-that-does-not-exist").unwrap_err();

        assert!(matches!(
            error,
            ConversionError::CommandNotFound { command, .. }
            if command == "ffaudio-converter-command-that-does-not-exist"
        ));
    }

    #[test]
    fn explicit_path_is_used_as_it_is() {
        let binary = tempfile::NamedTempFile::new().unwrap();

        assert_eq!(binary.path(), resolve_ffmpeg(binary.path()).unwrap());
    }

    #[test]
    fn explicit_directory_is_not_file() {
        let directory = tempfile::tempdir().unwrap();

        let error = resolve_ffmpeg(directory.path()).unwrap_err();

        assert!(matches!(error, ConversionError::NotFile { path } if path == directory.path()));
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_zero_is_success() {
        let program = which("true").unwrap();

        FFmpegRunner
            .run(&program, &[OsString::from("-hide_banner")])
            .unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_code_is_failure() {
        let program = which("false").unwrap();

        let error = FFmpegRunner.run(&program, &[]).unwrap_err();

        assert!(matches!(
            error,
            ConversionError::CommandFailed { command, code: Some(1), .. } if command == "false"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn standard_error_is_reported() {
        let program = which("sh").unwrap();
        let arguments = [
            OsString::from("-c"),
            OsString::from("echo 'Invalid data found' >&2; exit 3"),
        ];

        let error = FFmpegRunner.run(&program, &arguments).unwrap_err();

        assert!(matches!(
            error,
            ConversionError::CommandFailed { code: Some(3), stderr, .. }
            if stderr == "Invalid data found"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn killed_by_signal_has_no_exit_code() {
        let program = which("sh").unwrap();
        let arguments = [OsString::from("-c"), OsString::from("kill -9 $$")];

        let error = FFmpegRunner.run(&program, &arguments).unwrap_err();

        assert!(matches!(
            error,
            ConversionError::CommandFailed { command, code: None, .. } if command == "sh"
        ));
    }

    #[test]
    fn missing_program_cannot_be_executed() {
        let directory = tempfile::tempdir().unwrap();
        let program = directory.path().join("missing-ffmpeg");

        let error = FFmpegRunner.run(&program, &[]).unwrap_err();

        assert!(matches!(
            error,
            ConversionError::CommandCannotExecuted { command, .. } if command == "missing-ffmpeg"
        ));
    }
}
