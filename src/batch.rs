// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Converts many source files at the same time.

use std::{
    collections::{hash_map::Entry, HashMap, HashSet},
    path::{self, Path, PathBuf},
};

use log::{debug, warn};
use rayon::{prelude::*, ThreadPoolBuildError, ThreadPoolBuilder};
use walkdir::{DirEntry, WalkDir};

use crate::{
    conversion_setting::ConversionSetting,
    convert_task::{ConvertReport, ConvertStatus, ConvertTask},
    ffmpeg::CommandRunner,
    output_path, utilities,
};

/// Receives reports of finished tasks.
///
/// Reports are delivered from worker threads in the order the tasks finish.
pub trait ProgressListener {
    /// Called once before any task starts.
    fn on_start(&self, _total: usize) {}

    fn on_convert_done(&self, report: &ConvertReport);
}

/// A [`ProgressListener`] that ignores all reports.
pub struct NullProgressListener;

impl ProgressListener for NullProgressListener {
    fn on_convert_done(&self, _: &ConvertReport) {}
}

/// Counts of each [`ConvertStatus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub done: usize,

    pub skipped: usize,

    pub failed: usize,
}

impl BatchSummary {
    pub fn new(reports: &[ConvertReport]) -> Self {
        reports
            .iter()
            .fold(BatchSummary::default(), |mut summary, report| {
                match report.status {
                    ConvertStatus::Done => summary.done += 1,
                    ConvertStatus::Skipped => summary.skipped += 1,
                    ConvertStatus::Failed => summary.failed += 1,
                }

                summary
            })
    }

    pub fn has_failure(&self) -> bool {
        self.failed > 0
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Lists the files under `directory`.
///
/// Only an error of `directory` itself is returned. Entries that cannot be read, e.g. broken
/// symbolic links, are skipped with a warning.
fn walk_directory(directory: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = Vec::new();

    let walker = WalkDir::new(directory)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
            Err(error) if error.depth() == 0 => return Err(error),
            Err(error) => warn!("Skipped an entry that cannot be read: {error}"),
        }
    }

    Ok(files)
}

/// Collects source files.
///
/// Files are used as they are. Directories are searched recursively. Files that are not music,
/// e.g. logs and cover images, and hidden files in directories are excluded. Each file appears
/// only once.
pub fn collect_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut sources = Vec::new();

    for path in paths {
        let path = path.as_ref();

        if path.is_dir() {
            sources.extend(utilities::filter_paths(&walk_directory(path)?));
        } else {
            sources.push(path.to_path_buf());
        }
    }

    let mut seen = HashSet::new();

    sources.retain(|source| {
        // `a.flac` and `./a.flac` are the same file.
        seen.insert(path::absolute(source).unwrap_or_else(|_| source.clone()))
    });

    Ok(sources)
}

/// Finds tasks whose converted file is the same as that of an earlier task.
///
/// Returns the IDs of the later tasks with the shared converted file, e.g. `a.wav` after
/// `a.flac`.
fn find_output_collisions(
    tasks: &[ConvertTask],
    setting: &ConversionSetting,
) -> HashMap<usize, PathBuf> {
    let mut owners = HashMap::new();
    let mut collisions = HashMap::new();

    for task in tasks {
        let Ok(destination) = output_path::get_output_path(
            &task.source,
            &setting.output_directory,
            setting.format.extension(),
        ) else {
            continue;
        };

        match owners.entry(destination.file) {
            Entry::Occupied(owner) => {
                warn!(
                    "Job {} for {:?} has the same output {:?} as job {}",
                    task.id,
                    task.source,
                    owner.key(),
                    owner.get()
                );

                collisions.insert(task.id, owner.key().clone());
            }
            Entry::Vacant(owner) => {
                owner.insert(task.id);
            }
        }
    }

    collisions
}

/// Converts all `sources` with `setting.threads` workers.
///
/// Returns the reports ordered by task ID, which is the index in `sources`. A source whose
/// converted file is the same as that of an earlier source is not converted and is reported as
/// [`ConvertStatus::Failed`].
pub fn convert_all<P, R, L>(
    sources: &[P],
    setting: &ConversionSetting,
    ffmpeg: &Path,
    runner: &R,
    listener: &L,
) -> Result<Vec<ConvertReport>, ThreadPoolBuildError>
where
    P: AsRef<Path> + Sync,
    R: CommandRunner + Sync + ?Sized,
    L: ProgressListener + Sync + ?Sized,
{
    let tasks: Vec<ConvertTask> = sources
        .iter()
        .enumerate()
        .map(|(id, source)| ConvertTask::new(id, source))
        .collect();
    let collisions = find_output_collisions(&tasks, setting);

    let threads = setting.threads.max(1);
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|index| format!("ffaudio-converter-{index}"))
        .build()?;

    debug!("Converts {} files with {threads} threads", tasks.len());

    listener.on_start(tasks.len());

    let reports = pool.install(|| {
        tasks
            .par_iter()
            .map(|task| {
                let report = match collisions.get(&task.id) {
                    Some(destination) => ConvertReport {
                        id: task.id,
                        source: task.source.clone(),
                        destination: Some(destination.clone()),
                        status: ConvertStatus::Failed,
                    },
                    None => task.run(setting, ffmpeg, runner),
                };

                listener.on_convert_done(&report);

                report
            })
            .collect::<Vec<_>>()
    });

    Ok(reports)
}
