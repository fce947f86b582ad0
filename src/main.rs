// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::process::exit;

use clap::Parser;

use env_logger::Env;
use ffaudio_converter::{
    batch::{BatchSummary, ProgressListener},
    convert_task::{ConvertReport, ConvertStatus},
    ffaudio_converter::{ffaudio_converter, FFaudioConverterError, Setting},
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, Log, Metadata, Record};

/// Writes log records above the progress bar instead of through it.
struct ProgressBarLogger {
    logger: env_logger::Logger,
    progress_bar: ProgressBar,
}

impl Log for ProgressBarLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.logger.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.logger.matches(record) {
            self.progress_bar.suspend(|| self.logger.log(record));
        }
    }

    fn flush(&self) {
        self.logger.flush();
    }
}

fn initialize_logging(progress_bar: ProgressBar) {
    let logger = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .format_timestamp(None)
        .build();
    let max_level = logger.filter();

    if log::set_boxed_logger(Box::new(ProgressBarLogger {
        logger,
        progress_bar,
    }))
    .is_ok()
    {
        log::set_max_level(max_level);
    }
}

struct ProgressBarListener {
    progress_bar: ProgressBar,
}

impl ProgressBarListener {
    fn new() -> Self {
        let progress_bar = ProgressBar::new(0);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            progress_bar.set_style(style.progress_chars("#>-"));
        }

        ProgressBarListener { progress_bar }
    }
}

impl ProgressListener for ProgressBarListener {
    fn on_start(&self, total: usize) {
        self.progress_bar.set_length(total as u64);
    }

    fn on_convert_done(&self, report: &ConvertReport) {
        if report.status == ConvertStatus::Failed {
            self.progress_bar
                .println(format!("{}: {}", report.status, report.source.display()));
        }

        self.progress_bar
            .set_message(format!("{} {}", report.status, report.source.display()));
        self.progress_bar.inc(1);
    }
}

fn main() {
    let listener = ProgressBarListener::new();

    initialize_logging(listener.progress_bar.clone());
    let result = ffaudio_converter(&Setting::parse(), &listener);

    listener.progress_bar.finish_and_clear();

    match result {
        Ok(reports) => {
            let summary = BatchSummary::new(&reports);

            info!(
                "Done: {}, Skipped: {}, Failed: {}",
                summary.done, summary.skipped, summary.failed
            );

            if summary.has_failure() {
                exit(1);
            }
        }
        Err(error) => {
            match error {
                FFaudioConverterError::FFmpegNotFound(error) => {
                    error!("FFmpeg is not available. Detail: {error}");
                }
                FFaudioConverterError::DirectoryCannotBeCreated(directory, error) => {
                    error!("{directory:?} cannot be created. Detail: {error}");
                }
                FFaudioConverterError::SourceTraversalFailed(error) => {
                    error!("Source files cannot be collected. Detail: {error}");
                }
                FFaudioConverterError::NoSourceFiles => {
                    error!("No source files are found.");
                }
                FFaudioConverterError::ThreadPoolCannotBeBuilt(error) => {
                    error!("Worker threads cannot be created. Detail: {error}");
                }
            }

            exit(1);
        }
    }
}
