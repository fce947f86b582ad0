// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! This module has the function that called by the main function.

use std::{
    fs::create_dir_all,
    io,
    path::{Path, PathBuf},
};

use clap::Parser;
use log::{debug, info};
use rayon::ThreadPoolBuildError;
use thiserror::Error;

use crate::{
    batch::{self, ProgressListener},
    conversion_error::ConversionError,
    conversion_setting::{ConversionSetting, DEFAULT_FFMPEG_BINARY},
    convert_task::ConvertReport,
    ffmpeg::{self, FFmpegRunner},
    output_format::{OutputFormat, Quality},
};

/// The struct for setting.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Convert audio files with FFmpeg. The directories of source files are \
                  reconstructed in the output directory."
)]
pub struct Setting {
    #[arg(
        short,
        long,
        value_name = "FORMAT",
        default_value = "mp3",
        help = "mp3, ogg, opus, flac, wav or another extension that FFmpeg knows."
    )]
    format: OutputFormat,

    #[arg(short, long, value_enum, default_value_t = Quality::High)]
    quality: Quality,

    #[arg(
        short = 'r',
        long,
        value_name = "HZ",
        value_parser = clap::value_parser!(u32).range(1..),
        help = "The sample rate of converted files. The source's rate is kept if omitted."
    )]
    sample_rate: Option<u32>,

    #[arg(short, long, help = "Skips source files whose converted file already exists.")]
    skip_existing: bool,

    #[arg(
        short = 'j',
        long,
        value_name = "N",
        value_parser = is_positive_number,
        help = "The number of files converted at the same time. [default: the number of CPUs]"
    )]
    threads: Option<usize>,

    #[arg(
        long,
        value_name = "PATH",
        env = "FFAUDIO_CONVERTER_FFMPEG",
        default_value = DEFAULT_FFMPEG_BINARY,
        help = "The FFmpeg executable."
    )]
    ffmpeg: PathBuf,

    #[arg(
        required = true,
        value_parser = is_destination_directory_or_not_found,
        help = "A directory that converted files are saved."
    )]
    output_directory: PathBuf,

    #[arg(
        required = true,
        value_name = "SOURCE",
        value_parser = is_source_available,
        help = "Audio files or directories that contain audio files."
    )]
    sources: Vec<PathBuf>,
}

impl Setting {
    /// Creates the settings used by the conversion.
    pub fn conversion_setting(&self) -> ConversionSetting {
        let default_setting = ConversionSetting::new(&self.output_directory);

        ConversionSetting {
            format: self.format.clone(),
            quality: self.quality,
            sample_rate: self.sample_rate,
            skip_existing: self.skip_existing,
            ffmpeg_binary: self.ffmpeg.clone(),
            threads: self.threads.unwrap_or(default_setting.threads),
            ..default_setting
        }
    }
}

/// Error of ffaudio_converter.
#[derive(Error, Debug)]
pub enum FFaudioConverterError {
    #[error("FFmpeg is not available: {0}")]
    FFmpegNotFound(ConversionError),

    #[error("The directory `{0}` cannot be created: {1}")]
    DirectoryCannotBeCreated(PathBuf, io::Error),

    #[error("Source files cannot be collected: {0}")]
    SourceTraversalFailed(walkdir::Error),

    #[error("No source files are found.")]
    NoSourceFiles,

    #[error("Worker threads cannot be created: {0}")]
    ThreadPoolCannotBeBuilt(ThreadPoolBuildError),
}

#[cfg_attr(test, mockall::automock)]
trait FFaudioConverterRunner {
    fn resolve_ffmpeg(&self, binary: &Path) -> Result<PathBuf, ConversionError>;

    fn create_output_directory(&self, path: &Path) -> io::Result<()>;

    fn collect_sources(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, walkdir::Error>;

    fn convert_all(
        &self,
        sources: &[PathBuf],
        setting: &ConversionSetting,
        ffmpeg: &Path,
    ) -> Result<Vec<ConvertReport>, ThreadPoolBuildError>;
}

struct FFaudioConverter<'a, L: ?Sized> {
    listener: &'a L,
}

impl<L: ProgressListener + Sync + ?Sized> FFaudioConverterRunner for FFaudioConverter<'_, L> {
    fn resolve_ffmpeg(&self, binary: &Path) -> Result<PathBuf, ConversionError> {
        ffmpeg::resolve_ffmpeg(binary)
    }

    fn create_output_directory(&self, path: &Path) -> io::Result<()> {
        create_dir_all(path)
    }

    fn collect_sources(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, walkdir::Error> {
        batch::collect_sources(paths)
    }

    fn convert_all(
        &self,
        sources: &[PathBuf],
        setting: &ConversionSetting,
        ffmpeg: &Path,
    ) -> Result<Vec<ConvertReport>, ThreadPoolBuildError> {
        batch::convert_all(sources, setting, ffmpeg, &FFmpegRunner, self.listener)
    }
}

fn is_destination_directory_or_not_found(argument: &str) -> Result<PathBuf, String> {
    let path = Path::new(argument);

    if path.is_dir() || !path.exists() {
        Ok(path.to_path_buf())
    } else {
        Err(format!(
            r#"The destination "{argument}" exists and is not a directory."#
        ))
    }
}

fn is_source_available(argument: &str) -> Result<PathBuf, String> {
    let path = Path::new(argument);

    if path.is_file() || path.is_dir() {
        Ok(path.to_path_buf())
    } else {
        Err(format!(r#"The file or directory "{argument}" is not found."#))
    }
}

fn is_positive_number(argument: &str) -> Result<usize, String> {
    match argument.parse::<usize>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(format!(r#""{argument}" is not a positive number."#)),
    }
}

fn ffaudio_converter_on_runner<T: FFaudioConverterRunner>(
    setting: &Setting,
    runner: T,
) -> Result<Vec<ConvertReport>, FFaudioConverterError> {
    let conversion_setting = setting.conversion_setting();

    info!(
        "Converts audio files to {} ({:?} quality).",
        conversion_setting.format, conversion_setting.quality
    );

    let ffmpeg = runner
        .resolve_ffmpeg(&conversion_setting.ffmpeg_binary)
        .map_err(FFaudioConverterError::FFmpegNotFound)?;

    debug!("FFmpeg: {:?}", ffmpeg);
    debug!(
        "Output directory: {:?}",
        &conversion_setting.output_directory
    );

    runner
        .create_output_directory(&conversion_setting.output_directory)
        .map_err(|error| {
            FFaudioConverterError::DirectoryCannotBeCreated(
                conversion_setting.output_directory.clone(),
                error,
            )
        })?;

    let sources = runner
        .collect_sources(&setting.sources)
        .map_err(FFaudioConverterError::SourceTraversalFailed)?;

    if sources.is_empty() {
        return Err(FFaudioConverterError::NoSourceFiles);
    }

    info!("{} source files are found.", sources.len());

    let reports = runner
        .convert_all(&sources, &conversion_setting, &ffmpeg)
        .map_err(FFaudioConverterError::ThreadPoolCannotBeBuilt)?;

    info!("Completed.");

    Ok(reports)
}

/// Converts audio files with FFmpeg.
///
/// Each finished file is reported to `listener`. A file that cannot be converted does not stop
/// the others; it is reported as [`crate::convert_task::ConvertStatus::Failed`].
pub fn ffaudio_converter<L: ProgressListener + Sync + ?Sized>(
    setting: &Setting,
    listener: &L,
) -> Result<Vec<ConvertReport>, FFaudioConverterError> {
    ffaudio_converter_on_runner(setting, FFaudioConverter { listener })
}
