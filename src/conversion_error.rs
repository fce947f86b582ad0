// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use thiserror::Error;

/// Error about conversion of a single file.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Path ({path}) is invalid.")]
    PathInvalid { path: PathBuf },

    #[error("{path} is not a file.")]
    NotFile { path: PathBuf },

    #[error("Command {command} is not found: {error}")]
    CommandNotFound {
        command: String,
        error: which::Error,
    },

    #[error("Command {command} is failed ({}): {stderr}", exit_code_text(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Command {command} cannot be executed: {error}")]
    CommandCannotExecuted {
        command: String,
        error: std::io::Error,
    },

    #[error("I/O error: {error}")]
    IoError { error: std::io::Error },
}

fn exit_code_text(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_owned(),
    }
}
