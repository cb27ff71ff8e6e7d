// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Dropped-file descriptions and the per-file records produced once a read completes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use time::OffsetDateTime;

/// Where the bytes of a dropped file live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileSource {
    /// Native drops hand over a filesystem path.
    Path(PathBuf),
    /// Web drops (and tests) hand over the bytes directly.
    Bytes(Arc<[u8]>),
}

/// One item of a drop gesture, captured before any read starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedFile {
    /// File name without directories.
    pub name: String,
    /// Size in bytes as reported by the host (0 when unknown).
    pub size: u64,
    /// MIME type; guessed from the name when the host does not report one.
    pub mime: String,
    /// Last modification time, when the host knows it.
    pub last_modified: Option<SystemTime>,
    /// Location of the file contents.
    pub source: FileSource,
}

impl DroppedFile {
    /// Describe a file on disk, filling size and timestamp from its metadata when available.
    pub fn from_path(path: PathBuf) -> Self {
        let name = display_name(&path);
        let meta = path.metadata().ok();
        Self {
            mime: guess_mime(&name),
            size: meta.as_ref().map(|m| m.len()).unwrap_or(0),
            last_modified: meta.and_then(|m| m.modified().ok()),
            name,
            source: FileSource::Path(path),
        }
    }

    /// Describe an in-memory file.
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: Arc<[u8]>) -> Self {
        let name = name.into();
        let mime = mime.into();
        Self {
            mime: if mime.is_empty() { guess_mime(&name) } else { mime },
            size: bytes.len() as u64,
            last_modified: None,
            name,
            source: FileSource::Bytes(bytes),
        }
    }
}

/// Result of reading one dropped file. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub last_modified: Option<OffsetDateTime>,
    /// Data URL, bare Base64 payload or decoded text, depending on configuration.
    pub data: String,
}

impl FileRecord {
    /// Combine the static metadata of a dropped file with its processed content.
    pub fn new(file: &DroppedFile, data: String) -> Self {
        Self {
            name: file.name.clone(),
            size: file.size,
            mime: file.mime.clone(),
            last_modified: file.last_modified.map(OffsetDateTime::from),
            data,
        }
    }
}

/// Outcome of one asynchronous read: a record, or the reason it could not be produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Loaded(FileRecord),
    Failed { name: String, cause: String },
}

impl ReadOutcome {
    /// Name of the file this outcome belongs to.
    pub fn name(&self) -> &str {
        match self {
            ReadOutcome::Loaded(record) => &record.name,
            ReadOutcome::Failed { name, .. } => name,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ReadOutcome::Loaded(_))
    }
}

/// Guess a MIME type from a file name, falling back to `application/octet-stream`.
pub(crate) fn guess_mime(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
