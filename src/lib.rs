// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Drop zones that read files dragged in from the operating system and hand every
//! file of a drop to one callback, in drop order, once all reads have finished.

pub mod app;
pub mod models;
pub mod mvu;
pub mod reader;
pub mod ui;
pub mod utils;

pub use models::{
    BatchReport, ConfigError, DropBatch, DropConfig, DropZoneOptions, DroppedFile, FailedBatch,
    FileRecord, HoverTarget, ReadOutcome,
};
pub use ui::components::drop_zone::{DropZoneModel, DropZoneMsg};
pub use utils::{file_drop_supported, remove_uri_scheme};
