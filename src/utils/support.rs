// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! One-time detection of whether the host can deliver OS file drops at all.

use std::sync::OnceLock;

static FILE_DROP_SUPPORTED: OnceLock<bool> = OnceLock::new();

/// Whether the current environment supports dragging files from the OS into the window.
///
/// Computed on first call and never recomputed. Purely informational; drop zones do not
/// consult it.
pub fn file_drop_supported() -> bool {
    *FILE_DROP_SUPPORTED.get_or_init(detect)
}

fn detect() -> bool {
    let supported = if cfg!(any(
        target_arch = "wasm32",
        target_os = "windows",
        target_os = "macos"
    )) {
        true
    } else {
        has_display_server(|key| std::env::var_os(key).is_some_and(|v| !v.is_empty()))
    };
    log::debug!("file drop supported: {supported}");
    supported
}

/// X11 and Wayland both carry file drops; a headless session has neither.
fn has_display_server(is_set: impl Fn(&str) -> bool) -> bool {
    is_set("WAYLAND_DISPLAY") || is_set("DISPLAY")
}

#[cfg(test)]
mod tests {
    use super::{file_drop_supported, has_display_server};

    #[test]
    fn display_server_detection_checks_wayland_and_x11() {
        assert!(has_display_server(|k| k == "WAYLAND_DISPLAY"));
        assert!(has_display_server(|k| k == "DISPLAY"));
        assert!(!has_display_server(|_| false));
    }

    // The flag is write-once: repeated reads agree.
    #[test]
    fn file_drop_supported_is_stable() {
        assert_eq!(file_drop_supported(), file_drop_supported());
    }
}
