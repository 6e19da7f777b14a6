//! Browser executable discovery.

use std::path::{Path, PathBuf};

use anyhow::Result;

/// File names accepted as the browser binary inside a bundled directory.
const BINARY_NAMES: [&str; 3] = ["chrome", "chrome.exe", "Google Chrome for Testing"];
/// Directory next to the `diagpull` executable that may hold a bundled browser.
const BUNDLE_DIR: &str = "chromium";

/// Pick the browser to launch.
///
/// An explicit path must exist. Without one, a browser bundled next to the
/// running executable is preferred; `None` leaves the choice to chromiumoxide's
/// system detection.
///
/// # Errors
///
/// Returns an error if `explicit` is given but does not exist.
pub fn resolve_executable(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        anyhow::ensure!(
            path.exists(),
            "browser executable {} not found",
            path.display()
        );
        return Ok(Some(path.to_path_buf()));
    }
    let bundled = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(BUNDLE_DIR)))
        .filter(|dir| dir.is_dir())
        .and_then(|dir| find_in_bundle(&dir));
    if let Some(path) = &bundled {
        tracing::debug!(path = %path.display(), "using bundled browser");
    }
    Ok(bundled)
}

/// Walk `dir` for a browser binary, including macOS `.app` bundles.
#[must_use]
pub fn find_in_bundle(dir: &Path) -> Option<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return None;
    };
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if path.is_file() && BINARY_NAMES.contains(&name.as_ref()) {
            return Some(path);
        }
        if path.is_dir() {
            if name.ends_with(".app") {
                let app_bin = path
                    .join("Contents")
                    .join("MacOS")
                    .join("Google Chrome for Testing");
                if app_bin.is_file() {
                    return Some(app_bin);
                }
            }
            subdirs.push(path);
        }
    }
    subdirs.sort();
    subdirs.iter().find_map(|sub| find_in_bundle(sub))
}
