//! Where the desktop app keeps its saved game.

use std::path::PathBuf;

use cellcraft_core::{FileStore, KeyValueStore, MemoryStore};
use directories::ProjectDirs;

use crate::APP_NAME;

pub fn default_save_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|proj_dirs| proj_dirs.data_dir().to_path_buf())
}

/// File-backed store in the platform data directory, or an in-memory store
/// when no home directory can be resolved.
pub fn open_store(dir: Option<PathBuf>) -> Box<dyn KeyValueStore> {
    match dir {
        Some(dir) => {
            log::info!("saving games under {}", dir.display());
            Box::new(FileStore::new(dir))
        }
        None => {
            log::warn!("no data directory available; progress will not survive a restart");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellcraft_core::persistence::SAVE_KEY;
    use tempfile::tempdir;

    #[test]
    fn store_writes_into_the_given_directory() {
        let dir = tempdir().unwrap();
        let mut store = open_store(Some(dir.path().to_path_buf()));
        store.set(SAVE_KEY, "{}").unwrap();
        assert!(dir.path().join(format!("{SAVE_KEY}.json")).exists());
    }

    #[test]
    fn missing_directory_falls_back_to_memory() {
        let mut store = open_store(None);
        store.set(SAVE_KEY, "{}").unwrap();
        assert_eq!(store.get(SAVE_KEY).unwrap().as_deref(), Some("{}"));
    }
}
