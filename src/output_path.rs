// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Locates converted files.
//!
//! The directory of a source file is reconstructed under the output directory. For example,
//! `/music/album/01.flac` is converted to `<output directory>/music/album/01.mp3`.

use std::{
    ffi::{OsStr, OsString},
    path::{self, Component, Path, PathBuf, Prefix},
};

use crate::conversion_error::ConversionError;

/// The paths of a converted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPath {
    /// The directory that contains the converted file.
    pub directory: PathBuf,

    pub file: PathBuf,
}

fn prefix_component(prefix: Prefix) -> OsString {
    match prefix {
        Prefix::Disk(letter) | Prefix::VerbatimDisk(letter) => {
            OsString::from((letter as char).to_string())
        }
        Prefix::UNC(server, share) | Prefix::VerbatimUNC(server, share) => {
            let mut component = server.to_os_string();

            component.push("_");
            component.push(share);

            component
        }
        Prefix::Verbatim(name) | Prefix::DeviceNS(name) => name.to_os_string(),
    }
}

/// Converts an absolute directory to a relative path that can be joined to another directory.
///
/// `..` is resolved lexically, so symbolic links are not followed.
fn to_relative_directory(absolute_directory: &Path) -> PathBuf {
    let mut components: Vec<OsString> = Vec::new();

    for component in absolute_directory.components() {
        match component {
            Component::Prefix(prefix) => components.push(prefix_component(prefix.kind())),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                components.pop();
            }
            Component::Normal(name) => components.push(name.to_os_string()),
        }
    }

    components.iter().collect()
}

/// The filename without its last extension.
///
/// A filename whose only dot is the first character, e.g. `.hidden`, is returned as it is.
fn base_name(filename: &OsStr) -> &OsStr {
    Path::new(filename).file_stem().unwrap_or(filename)
}

/// Gets the paths of the converted file of `source_file`.
///
/// The converted file has `extension`.
pub fn get_output_path<P: AsRef<Path>, Q: AsRef<Path>>(
    source_file: P,
    output_directory: Q,
    extension: &str,
) -> Result<OutputPath, ConversionError> {
    let source_file = source_file.as_ref();

    let invalid_path = || ConversionError::PathInvalid {
        path: source_file.to_path_buf(),
    };

    let absolute_source =
        path::absolute(source_file).map_err(|error| ConversionError::IoError { error })?;

    let filename = absolute_source.file_name().ok_or_else(invalid_path)?;
    let parent = absolute_source.parent().ok_or_else(invalid_path)?;

    let directory = output_directory
        .as_ref()
        .join(to_relative_directory(parent));

    let file = {
        let mut filename = base_name(filename).to_os_string();

        filename.push(".");
        filename.push(extension);

        directory.join(filename)
    };

    Ok(OutputPath { directory, file })
}
