// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reading dropped files into data URLs and post-processing their content.

use std::fs;

use anyhow::{Context, Result};

use crate::models::config::ContentOptions;
use crate::models::file_record::{DroppedFile, FileRecord, FileSource, ReadOutcome};
use crate::utils::{decode_base64_text, remove_uri_scheme, to_data_url};

/// Read the full contents of a dropped file as a Base64 data URL.
///
/// # Errors
///
/// Returns an error when a path-backed file cannot be opened or fully read.
pub fn read_as_data_url(file: &DroppedFile) -> Result<String> {
    let url = match &file.source {
        FileSource::Path(path) => {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read dropped file: {:?}", path))?;
            to_data_url(&file.mime, &bytes)
        }
        FileSource::Bytes(bytes) => to_data_url(&file.mime, bytes),
    };
    Ok(url)
}

/// Apply scheme stripping and then Base64 decoding, as configured.
pub fn process_content(data_url: String, options: ContentOptions) -> String {
    let mut content = if options.remove_data_uri_scheme {
        remove_uri_scheme(&data_url).to_string()
    } else {
        data_url
    };
    if options.decode_base64 {
        content = decode_base64_text(&content);
    }
    content
}

/// Read one dropped file and turn it into a record, or a failure carrying the cause.
pub fn load(file: &DroppedFile, options: ContentOptions) -> ReadOutcome {
    match read_as_data_url(file) {
        Ok(url) => ReadOutcome::Loaded(FileRecord::new(file, process_content(url, options))),
        Err(err) => {
            log::warn!("{err:#}");
            ReadOutcome::Failed {
                name: file.name.clone(),
                cause: format!("{err:#}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::{load, process_content, read_as_data_url};
    use crate::models::config::ContentOptions;
    use crate::models::file_record::{DroppedFile, ReadOutcome};

    const STRIP: ContentOptions = ContentOptions {
        remove_data_uri_scheme: true,
        decode_base64: false,
    };
    const DECODE: ContentOptions = ContentOptions {
        remove_data_uri_scheme: true,
        decode_base64: true,
    };

    #[test]
    fn read_as_data_url_reads_path_backed_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.txt");
        fs::write(&path, b"Hello").unwrap();

        let url = read_as_data_url(&DroppedFile::from_path(path)).unwrap();

        assert_eq!(url, "data:text/plain;base64,SGVsbG8=");
    }

    #[test]
    fn process_content_strips_then_decodes() {
        let url = "data:text/plain;base64,SGVsbG8=".to_string();
        assert_eq!(process_content(url.clone(), ContentOptions::default()), url);
        assert_eq!(process_content(url.clone(), STRIP), "SGVsbG8=");
        assert_eq!(process_content(url, DECODE), "Hello");
    }

    // Binary content cannot be decoded as text and degrades to an empty string.
    #[test]
    fn load_decodes_binary_to_empty_content() {
        let file = DroppedFile::from_bytes("blob.bin", "", Arc::from(&[0xff_u8, 0xfe][..]));

        let ReadOutcome::Loaded(record) = load(&file, DECODE) else {
            panic!("in-memory read cannot fail");
        };

        assert_eq!(record.data, "");
        assert_eq!(record.size, 2);
    }

    #[test]
    fn load_reports_missing_file_as_failure() {
        let tmp = TempDir::new().unwrap();
        let file = DroppedFile::from_path(tmp.path().join("gone.txt"));

        let outcome = load(&file, STRIP);

        let ReadOutcome::Failed { name, cause } = outcome else {
            panic!("missing file must fail");
        };
        assert_eq!(name, "gone.txt");
        assert!(cause.contains("Failed to read dropped file"));
    }
}
