//! Filesystem locations used by the host runtime.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MUSICIAN_SEARCH_DATA_DIR";

/// Returns the directory for trace files and other runtime data.
///
/// Resolution order: `$MUSICIAN_SEARCH_DATA_DIR`, then
/// `$HOME/.local/share/musician-search`, then the system temp directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map_or_else(std::env::temp_dir, |home| {
            PathBuf::from(home).join(".local").join("share")
        })
        .join("musician-search")
}
