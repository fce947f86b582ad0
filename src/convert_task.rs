// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Conversion of a single source file.

use std::{
    fmt,
    fs::create_dir_all,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{
    conversion_error::ConversionError, conversion_setting::ConversionSetting, ffmpeg::CommandRunner,
    ffmpeg_arguments, output_path,
};

/// The result of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertStatus {
    /// The file is converted.
    Done,

    /// The converted file already exists.
    Skipped,

    Failed,
}

impl fmt::Display for ConvertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConvertStatus::Done => "done",
            ConvertStatus::Skipped => "skipped",
            ConvertStatus::Failed => "failed",
        };

        f.write_str(text)
    }
}

/// A report of a finished task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub id: usize,

    pub source: PathBuf,

    /// The converted file. `None` if the path could not be decided.
    pub destination: Option<PathBuf>,

    pub status: ConvertStatus,
}

/// A task that converts a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertTask {
    pub id: usize,

    pub source: PathBuf,
}

impl ConvertTask {
    pub fn new<P: AsRef<Path>>(id: usize, source: P) -> Self {
        ConvertTask {
            id,
            source: source.as_ref().to_path_buf(),
        }
    }

    fn report(&self, destination: Option<PathBuf>, status: ConvertStatus) -> ConvertReport {
        ConvertReport {
            id: self.id,
            source: self.source.clone(),
            destination,
            status,
        }
    }

    fn convert<R: CommandRunner + ?Sized>(
        &self,
        destination: &output_path::OutputPath,
        setting: &ConversionSetting,
        ffmpeg: &Path,
        runner: &R,
    ) -> Result<(), ConversionError> {
        create_dir_all(&destination.directory)
            .map_err(|error| ConversionError::IoError { error })?;

        let arguments = ffmpeg_arguments::build_arguments(setting, &self.source, &destination.file);

        runner.run(ffmpeg, &arguments)
    }

    /// Converts the source file with `ffmpeg`.
    ///
    /// Errors are logged and reported as [`ConvertStatus::Failed`].
    pub fn run<R: CommandRunner + ?Sized>(
        &self,
        setting: &ConversionSetting,
        ffmpeg: &Path,
        runner: &R,
    ) -> ConvertReport {
        let destination = match output_path::get_output_path(
            &self.source,
            &setting.output_directory,
            setting.format.extension(),
        ) {
            Ok(destination) => destination,
            Err(error) => {
                warn!("Job {} for {:?} is failed: {error}", self.id, self.source);

                return self.report(None, ConvertStatus::Failed);
            }
        };

        if setting.skip_existing && destination.file.exists() {
            debug!(
                "Skipped job {} because {:?} already exists",
                self.id, destination.file
            );

            return self.report(Some(destination.file), ConvertStatus::Skipped);
        }

        debug!(
            "Starting convert job {} | {:?} -> {:?}",
            self.id, self.source, destination.file
        );

        let status = match self.convert(&destination, setting, ffmpeg, runner) {
            Ok(()) => {
                debug!("Finished job {} with exit code 0", self.id);

                ConvertStatus::Done
            }
            Err(error) => {
                warn!("Job {} for {:?} is failed: {error}", self.id, self.source);

                ConvertStatus::Failed
            }
        };

        self.report(Some(destination.file), status)
    }
}
