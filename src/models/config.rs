// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Drop zone options, their normalization, and the resolved configuration handed to callbacks.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::batch::{BatchReport, DropBatch, FailedBatch};

/// Class name applied while files hover over a zone, unless overridden.
pub const DEFAULT_OVER_CLASS: &str = "over";

/// Invoked once per drop with every record, in drop order.
pub type FileReadCallback = Arc<dyn Fn(&DropBatch, &DropConfig) + Send + Sync>;
/// Invoked once per drop when at least one read failed.
pub type ReadErrorCallback = Arc<dyn Fn(&FailedBatch, &DropConfig) + Send + Sync>;

/// Errors raised while binding a drop zone.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the \"on_file_read\" option is not set to a callback")]
    MissingCallback,
}

/// Which element receives the hover class.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HoverTarget {
    /// The drop surface itself.
    #[default]
    Surface,
    /// A separately rendered indicator, addressed by name; several zones may share one.
    Indicator(String),
}

/// Caller-facing options. Every field is optional until [`DropZoneOptions::resolve`].
#[derive(Clone)]
pub struct DropZoneOptions {
    pub on_file_read: Option<FileReadCallback>,
    pub on_read_error: Option<ReadErrorCallback>,
    /// Strip the `data:<mime>;base64,` prefix from each record's content.
    pub remove_data_uri_scheme: bool,
    /// Decode the Base64 payload into text. Implies `remove_data_uri_scheme`.
    pub decode_base64: bool,
    pub add_class_to: HoverTarget,
    pub over_class: String,
}

impl Default for DropZoneOptions {
    fn default() -> Self {
        Self {
            on_file_read: None,
            on_read_error: None,
            remove_data_uri_scheme: true,
            decode_base64: false,
            add_class_to: HoverTarget::Surface,
            over_class: DEFAULT_OVER_CLASS.to_string(),
        }
    }
}

impl DropZoneOptions {
    /// Default options with `callback` as the completion callback.
    pub fn from_callback<F>(callback: F) -> Self
    where
        F: Fn(&DropBatch, &DropConfig) + Send + Sync + 'static,
    {
        Self::default().on_file_read(callback)
    }

    pub fn on_file_read<F>(mut self, callback: F) -> Self
    where
        F: Fn(&DropBatch, &DropConfig) + Send + Sync + 'static,
    {
        self.on_file_read = Some(Arc::new(callback));
        self
    }

    pub fn on_read_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FailedBatch, &DropConfig) + Send + Sync + 'static,
    {
        self.on_read_error = Some(Arc::new(callback));
        self
    }

    pub fn remove_data_uri_scheme(mut self, enabled: bool) -> Self {
        self.remove_data_uri_scheme = enabled;
        self
    }

    pub fn decode_base64(mut self, enabled: bool) -> Self {
        self.decode_base64 = enabled;
        self
    }

    pub fn add_class_to(mut self, target: HoverTarget) -> Self {
        self.add_class_to = target;
        self
    }

    pub fn over_class(mut self, class: impl Into<String>) -> Self {
        self.over_class = class.into();
        self
    }

    /// Normalize the options into an immutable configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCallback`] when no completion callback was set.
    pub fn resolve(self) -> Result<DropConfig, ConfigError> {
        let on_file_read = self.on_file_read.ok_or(ConfigError::MissingCallback)?;
        Ok(DropConfig {
            on_file_read,
            on_read_error: self.on_read_error,
            remove_data_uri_scheme: self.remove_data_uri_scheme || self.decode_base64,
            decode_base64: self.decode_base64,
            add_class_to: self.add_class_to,
            over_class: self.over_class,
        })
    }
}

/// Content post-processing flags, small enough to ship to reader threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContentOptions {
    pub remove_data_uri_scheme: bool,
    pub decode_base64: bool,
}

/// Resolved, immutable drop zone configuration.
#[derive(Clone)]
pub struct DropConfig {
    on_file_read: FileReadCallback,
    on_read_error: Option<ReadErrorCallback>,
    remove_data_uri_scheme: bool,
    decode_base64: bool,
    add_class_to: HoverTarget,
    over_class: String,
}

impl DropConfig {
    pub fn remove_data_uri_scheme(&self) -> bool {
        self.remove_data_uri_scheme
    }

    pub fn decode_base64(&self) -> bool {
        self.decode_base64
    }

    pub fn add_class_to(&self) -> &HoverTarget {
        &self.add_class_to
    }

    pub fn over_class(&self) -> &str {
        &self.over_class
    }

    pub fn content_options(&self) -> ContentOptions {
        ContentOptions {
            remove_data_uri_scheme: self.remove_data_uri_scheme,
            decode_base64: self.decode_base64,
        }
    }

    /// Hand a finished drop to the matching callback.
    ///
    /// Partial batches without an error callback are logged instead.
    pub fn deliver(&self, report: &BatchReport) {
        match report {
            BatchReport::Complete(batch) => (self.on_file_read)(batch, self),
            BatchReport::Partial(failed) => match &self.on_read_error {
                Some(callback) => callback(failed, self),
                None => {
                    for (name, cause) in failed.failures() {
                        log::warn!("batch {}: failed to read {name}: {cause}", failed.id());
                    }
                }
            },
        }
    }
}

impl fmt::Debug for DropConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropConfig")
            .field("on_read_error", &self.on_read_error.is_some())
            .field("remove_data_uri_scheme", &self.remove_data_uri_scheme)
            .field("decode_base64", &self.decode_base64)
            .field("add_class_to", &self.add_class_to)
            .field("over_class", &self.over_class)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{ConfigError, DropConfig, DropZoneOptions, FileReadCallback, HoverTarget};
    use crate::models::batch::{BatchId, DropBatch, PendingBatch};
    use crate::models::file_record::{FileRecord, ReadOutcome};

    #[test]
    fn resolve_rejects_missing_callback() {
        let err = DropZoneOptions::default().resolve().unwrap_err();
        assert_eq!(err, ConfigError::MissingCallback);
        assert!(err.to_string().contains("on_file_read"));
    }

    // A bare callback is the same as options carrying only that callback.
    #[test]
    fn from_callback_matches_default_options() {
        let calls = Arc::new(AtomicUsize::new(0));
        let callback: FileReadCallback = {
            let calls = calls.clone();
            Arc::new(move |_: &DropBatch, _: &DropConfig| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        let bare = DropZoneOptions::from_callback({
            let callback = callback.clone();
            move |batch, config| callback(batch, config)
        })
        .resolve()
        .unwrap();
        let explicit = DropZoneOptions {
            on_file_read: Some(callback),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        assert_eq!(bare.content_options(), explicit.content_options());
        assert_eq!(bare.add_class_to(), &HoverTarget::Surface);
        assert_eq!(bare.add_class_to(), explicit.add_class_to());
        assert_eq!(bare.over_class(), explicit.over_class());
        assert_eq!(bare.over_class(), "over");
        assert!(bare.remove_data_uri_scheme());
        assert!(!bare.decode_base64());

        let report = PendingBatch::new(BatchId(0), 1)
            .fill(0, ReadOutcome::Loaded(record("a.txt")))
            .unwrap();
        bare.deliver(&report);
        explicit.deliver(&report);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    fn record(name: &str) -> FileRecord {
        FileRecord {
            name: name.into(),
            size: 0,
            mime: "text/plain".into(),
            last_modified: None,
            data: String::new(),
        }
    }

    #[test]
    fn decode_forces_scheme_removal() {
        let config = DropZoneOptions::from_callback(|_, _| {})
            .remove_data_uri_scheme(false)
            .decode_base64(true)
            .resolve()
            .unwrap();
        assert!(config.remove_data_uri_scheme());
        assert!(config.decode_base64());

        let config = DropZoneOptions::from_callback(|_, _| {})
            .remove_data_uri_scheme(false)
            .resolve()
            .unwrap();
        assert!(!config.remove_data_uri_scheme());
    }

    #[test]
    fn deliver_routes_partial_batches_to_error_callback() {
        let ok_calls = Arc::new(AtomicUsize::new(0));
        let err_calls = Arc::new(AtomicUsize::new(0));
        let config = DropZoneOptions::from_callback({
            let ok_calls = ok_calls.clone();
            move |_, _| {
                ok_calls.fetch_add(1, Ordering::SeqCst);
            }
        })
        .on_read_error({
            let err_calls = err_calls.clone();
            move |failed, _| {
                assert_eq!(failed.failures().count(), 1);
                err_calls.fetch_add(1, Ordering::SeqCst);
            }
        })
        .resolve()
        .unwrap();

        let mut pending = PendingBatch::new(BatchId(1), 1);
        let report = pending
            .fill(
                0,
                ReadOutcome::Failed {
                    name: "a".into(),
                    cause: "gone".into(),
                },
            )
            .unwrap();
        config.deliver(&report);

        assert_eq!(ok_calls.load(Ordering::SeqCst), 0);
        assert_eq!(err_calls.load(Ordering::SeqCst), 1);
    }
}
