// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types and aggregation shared between the UI and the reader.

pub mod batch;
pub mod config;
pub mod file_record;

pub use batch::{BatchId, BatchReport, DropBatch, FailedBatch, PendingBatch};
pub use config::{ConfigError, DropConfig, DropZoneOptions, HoverTarget};
pub use file_record::{DroppedFile, FileRecord, FileSource, ReadOutcome};
