// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Output formats and quality levels.

use std::{fmt, str::FromStr};

use clap::ValueEnum;

/// A format of converted files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Mp3,

    OggVorbis,

    Opus,

    Flac,

    Wav,

    /// A format that has no encoder options.
    ///
    /// Only the extension of the output file is decided. FFmpeg chooses the encoder from it.
    Other(String),
}

impl OutputFormat {
    /// The extension of converted files without the leading dot.
    pub fn extension(&self) -> &str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::OggVorbis => "ogg",
            OutputFormat::Opus => "opus",
            OutputFormat::Flac => "flac",
            OutputFormat::Wav => "wav",
            OutputFormat::Other(extension) => extension,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim().trim_start_matches('.');

        if name.is_empty() {
            return Err("The output format is empty.".to_owned());
        }

        if name.contains(['/', '\\']) {
            return Err(format!(r#"The output format "{name}" contains a path separator."#));
        }

        let format = match name.to_ascii_lowercase().as_str() {
            "mp3" => OutputFormat::Mp3,
            "ogg" => OutputFormat::OggVorbis,
            "opus" => OutputFormat::Opus,
            "flac" => OutputFormat::Flac,
            "wav" => OutputFormat::Wav,
            _ => OutputFormat::Other(name.to_owned()),
        };

        Ok(format)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Quality of converted files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Quality {
    Extreme,

    #[default]
    High,

    Medium,
}
