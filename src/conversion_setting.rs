// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Settings that decide how source files are converted.

use std::path::{Path, PathBuf};

use crate::output_format::{OutputFormat, Quality};

/// The default name of the FFmpeg executable.
pub const DEFAULT_FFMPEG_BINARY: &str = "ffmpeg";

/// Settings of a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSetting {
    /// The root directory of converted files.
    pub output_directory: PathBuf,

    pub format: OutputFormat,

    pub quality: Quality,

    /// The sample rate of converted files in Hz.
    ///
    /// The sample rate of the source file is kept if this is `None`.
    pub sample_rate: Option<u32>,

    /// Whether existing converted files are kept.
    pub skip_existing: bool,

    /// The FFmpeg executable. A bare name is looked up on `PATH`.
    pub ffmpeg_binary: PathBuf,

    /// The number of files converted at the same time.
    pub threads: usize,
}

impl ConversionSetting {
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        ConversionSetting {
            output_directory: output_directory.as_ref().to_path_buf(),
            format: OutputFormat::default(),
            quality: Quality::default(),
            sample_rate: None,
            skip_existing: false,
            ffmpeg_binary: PathBuf::from(DEFAULT_FFMPEG_BINARY),
            threads: num_cpus::get(),
        }
    }
}
