// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by the drop zones and the reader.

pub mod data_uri;
pub mod support;

/// Strip a leading `data:<mime>;base64,` prefix.
pub use data_uri::remove_uri_scheme;
/// Decode a Base64 payload into text, empty on failure.
pub use data_uri::decode_base64_text;
/// Build a Base64 data URL from raw bytes.
pub use data_uri::to_data_url;
/// Write-once capability flag for OS file drops.
pub use support::file_drop_supported;
