// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Local file import/export.
//!
//! Import reads a user-selected file as UTF-8 text; no format validation.
//! Export always writes under the fixed playground file name, the moral
//! equivalent of the browser client's save-as download.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Fixed name the document is saved under.
pub const SAVE_FILE_NAME: &str = "LeanProject.lean";

#[derive(Debug)]
pub enum FileError {
    Read { path: PathBuf, source: io::Error },
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
        }
    }
}

/// Reads a file to text. A failure leaves the caller's document untouched;
/// the error is reported to the user instead.
pub fn import(path: &Path) -> Result<String, FileError> {
    fs::read_to_string(path)
        .map_err(|source| FileError::Read { path: path.to_path_buf(), source })
}

/// Writes the document under [`SAVE_FILE_NAME`] in `dir` and returns the
/// full path.
pub fn export(dir: &Path, content: &str) -> Result<PathBuf, FileError> {
    let path = dir.join(SAVE_FILE_NAME);
    fs::write(&path, content)
        .map_err(|source| FileError::Write { path: path.clone(), source })?;
    Ok(path)
}
