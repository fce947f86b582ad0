// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

pub mod batch;
pub mod conversion_error;
pub mod conversion_setting;
pub mod convert_task;
pub mod ffaudio_converter;
pub mod ffmpeg;
pub mod ffmpeg_arguments;
pub mod output_format;
pub mod output_path;
pub mod utilities;
