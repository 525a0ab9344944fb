// Cache path helpers.
// Locates the default on-disk store file.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Base cache directory (~/.cache/comix on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "comix").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Default location of the comic store file.
pub fn store_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("comics.json"))
}
