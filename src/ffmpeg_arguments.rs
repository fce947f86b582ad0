// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Arguments of FFmpeg.

use std::{ffi::OsString, path::Path};

use crate::{
    conversion_setting::ConversionSetting,
    output_format::{OutputFormat, Quality},
};

#[derive(Default)]
struct Arguments {
    arguments: Vec<OsString>,
}

impl Arguments {
    fn arg<S: Into<OsString>>(&mut self, argument: S) -> &mut Self {
        self.arguments.push(argument.into());

        self
    }

    fn sample_rate(&mut self, sample_rate: Option<u32>) -> &mut Self {
        if let Some(sample_rate) = sample_rate {
            self.arg("-ar").arg(sample_rate.to_string());
        }

        self
    }

    fn map_metadata(&mut self) -> &mut Self {
        // The second mapping copies stream level tags, e.g. Vorbis comments of Ogg files.
        self.arg("-map_metadata")
            .arg("0")
            .arg("-map_metadata")
            .arg("0:s:0")
    }
}

fn mp3(arguments: &mut Arguments, setting: &ConversionSetting) {
    arguments.arg("-c:a").arg("libmp3lame");

    match setting.quality {
        Quality::Extreme => arguments.arg("-b:a").arg("320k"),
        Quality::High => arguments.arg("-q:a").arg("1"),
        Quality::Medium => arguments.arg("-q:a").arg("4"),
    };

    arguments
        .sample_rate(setting.sample_rate)
        .map_metadata()
        .arg("-id3v2_version")
        .arg("3");
}

fn ogg_vorbis(arguments: &mut Arguments, setting: &ConversionSetting) {
    // Without -vn, an embedded cover is written as a video stream.
    arguments.arg("-vn").arg("-c:a").arg("libvorbis");

    match setting.quality {
        Quality::Extreme => arguments.arg("-q:a").arg("9"),
        Quality::High => arguments.arg("-q:a").arg("6"),
        Quality::Medium => arguments.arg("-q:a").arg("4"),
    };

    arguments.sample_rate(setting.sample_rate).map_metadata();
}

fn opus(arguments: &mut Arguments, setting: &ConversionSetting) {
    arguments.arg("-c:a").arg("libopus");

    match setting.quality {
        Quality::Extreme => arguments.arg("-b:a").arg("192k"),
        Quality::High => arguments.arg("-b:a").arg("160k"),
        Quality::Medium => arguments.arg("-b:a").arg("128k"),
    };

    // Opus is always encoded at 48 kHz, so the sample rate is ignored.
    arguments.map_metadata();
}

fn flac(arguments: &mut Arguments, setting: &ConversionSetting) {
    arguments.arg("-c:a").arg("flac");

    if setting.quality == Quality::Medium {
        arguments.arg("-sample_fmt").arg("s16");
    }

    arguments.sample_rate(setting.sample_rate).map_metadata();
}

fn wav(arguments: &mut Arguments, setting: &ConversionSetting) {
    arguments
        .arg("-c:a")
        .arg("pcm_s16le")
        .sample_rate(setting.sample_rate);
}

/// Builds the arguments of FFmpeg that converts `source_file` to `destination_file`.
///
/// The program name is not included.
pub fn build_arguments(
    setting: &ConversionSetting,
    source_file: &Path,
    destination_file: &Path,
) -> Vec<OsString> {
    let mut arguments = Arguments::default();

    arguments
        .arg("-hide_banner")
        .arg(if setting.skip_existing { "-n" } else { "-y" })
        .arg("-i")
        .arg(source_file);

    match setting.format {
        OutputFormat::Mp3 => mp3(&mut arguments, setting),
        OutputFormat::OggVorbis => ogg_vorbis(&mut arguments, setting),
        OutputFormat::Opus => opus(&mut arguments, setting),
        OutputFormat::Flac => flac(&mut arguments, setting),
        OutputFormat::Wav => wav(&mut arguments, setting),
        OutputFormat::Other(_) => {}
    }

    arguments.arg(destination_file);

    arguments.arguments
}
