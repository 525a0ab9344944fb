// Store persistence.
// Whole-file save and load of the comic store as JSON.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{ComixError, PersistenceError, Result};

use super::store::ComicStore;

/// Write the whole store to `path`, replacing any existing file.
pub fn save(store: &ComicStore, path: &Path) -> Result<()> {
    save_inner(store, path).map_err(|source| ComixError::Persistence {
        path: path.to_path_buf(),
        source,
    })
}

fn save_inner(store: &ComicStore, path: &Path) -> std::result::Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = store.serialize()?;

    // Write via temp file so a torn write never replaces a good store.
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(&json)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    tracing::debug!(path = %path.display(), comics = store.len(), "store saved");
    Ok(())
}

/// Load a store from `path`. A missing file is an empty store; a file that
/// exists but does not parse is an error.
pub fn load(path: &Path) -> Result<ComicStore> {
    load_inner(path).map_err(|source| ComixError::Persistence {
        path: path.to_path_buf(),
        source,
    })
}

fn load_inner(path: &Path) -> std::result::Result<ComicStore, PersistenceError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no store file yet, starting empty");
        return Ok(ComicStore::new());
    }
    let bytes = fs::read(path)?;
    Ok(ComicStore::deserialize(&bytes)?)
}
