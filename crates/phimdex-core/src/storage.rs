use std::path::PathBuf;
use tracing::{debug, warn};

use phimdex_models::Movie;

use crate::error::StoreError;
use crate::store::MovieCache;

/// JSON snapshot persistence for the movie cache.
pub struct MovieStorage {
    path: PathBuf,
}

impl MovieStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the snapshot. A corrupted file is deleted and replaced with
    /// an empty cache rather than taking the store down.
    pub fn load(&self) -> Result<MovieCache, StoreError> {
        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Vec<Movie>>(&content) {
            Ok(entries) => {
                debug!(
                    "Loaded {} movie record(s) from {:?}",
                    entries.len(),
                    self.path
                );
                Ok(MovieCache::from_entries(entries))
            }
            Err(e) => {
                warn!(
                    "Movie store corruption detected in {:?}: {}. Deleting corrupted file.",
                    self.path, e
                );
                if let Err(rm_err) = std::fs::remove_file(&self.path) {
                    warn!("Failed to delete corrupted store file: {}", rm_err);
                }
                Ok(MovieCache::new())
            }
        }
    }

    /// Persist the full cache. The snapshot is written to a temp file and
    /// renamed into place so readers never observe a half-written table.
    pub fn save(&self, cache: &MovieCache) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&cache.all_entries())?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        debug!("Saved {} movie record(s) to {:?}", cache.len(), self.path);
        Ok(())
    }
}
