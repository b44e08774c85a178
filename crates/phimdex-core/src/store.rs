use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use phimdex_models::Movie;

use crate::error::StoreError;
use crate::storage::MovieStorage;

/// In-memory movie table with a multi-index structure.
///
/// One `Arc<Movie>` is shared between the primary-key index and the
/// external-id index, so both always observe the same canonical entry.
pub struct MovieCache {
    /// Primary index: internal id -> canonical entry.
    by_id: HashMap<String, Arc<Movie>>,

    /// Secondary unique index: external catalog id -> same entry.
    by_external_id: HashMap<String, Arc<Movie>>,

    /// Track dirty state so persistence can be throttled.
    dirty: bool,
}

impl MovieCache {
    pub fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            by_external_id: HashMap::new(),
            dirty: false,
        }
    }

    /// Rebuild a cache from a persisted snapshot.
    pub fn from_entries(entries: Vec<Movie>) -> Self {
        let mut cache = Self::new();
        for movie in entries {
            cache.index(Arc::new(movie));
        }
        cache.dirty = false;
        cache
    }

    fn index(&mut self, movie: Arc<Movie>) {
        if let Some(external_id) = &movie.external_id {
            self.by_external_id
                .insert(external_id.clone(), movie.clone());
        }
        self.by_id.insert(movie.id.clone(), movie);
    }

    pub fn get(&self, id: &str) -> Option<Arc<Movie>> {
        self.by_id.get(id).cloned()
    }

    pub fn get_by_external_id(&self, external_id: &str) -> Option<Arc<Movie>> {
        self.by_external_id.get(external_id).cloned()
    }

    /// Merge-upsert one candidate record.
    ///
    /// The existing entry is found by internal id first, then by external
    /// id — an insert that would collide on the external-id unique index
    /// becomes an update of the colliding record instead of a failure.
    /// Candidate fields that are empty never erase stored values (see
    /// [`Movie::merge_from`]).
    pub fn merge_save(&mut self, candidate: Movie) -> Arc<Movie> {
        let existing = self.by_id.get(&candidate.id).cloned().or_else(|| {
            candidate
                .external_id
                .as_ref()
                .and_then(|external_id| self.by_external_id.get(external_id).cloned())
        });

        let stored = if let Some(existing) = existing {
            let mut merged = (*existing).clone();
            merged.merge_from(&candidate);
            // An external-id change leaves a stale secondary index entry
            // behind; drop it before re-indexing.
            if existing.external_id != merged.external_id {
                if let Some(old_external_id) = &existing.external_id {
                    self.by_external_id.remove(old_external_id);
                }
            }
            Arc::new(merged)
        } else {
            Arc::new(candidate)
        };

        self.index(stored.clone());
        self.dirty = true;
        stored
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// All entries as owned records (for serialization).
    pub fn all_entries(&self) -> Vec<Movie> {
        self.by_id.values().map(|movie| (**movie).clone()).collect()
    }
}

impl Default for MovieCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Persisted movie table: the in-memory cache behind one write lock plus
/// a JSON snapshot on disk.
///
/// The whole lookup-merge-index sequence of [`MovieStore::merge_save`]
/// runs inside a single write section, so concurrent saves for the same
/// external id cannot lose updates (no caller-side read-then-write).
pub struct MovieStore {
    cache: RwLock<MovieCache>,
    storage: MovieStorage,
}

impl MovieStore {
    /// Open the store backed by `path`, loading a previous snapshot when
    /// one exists.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let storage = MovieStorage::new(path);
        let cache = if storage.exists() {
            storage.load()?
        } else {
            MovieCache::new()
        };
        debug!("Movie store opened with {} cached record(s)", cache.len());
        Ok(Self {
            cache: RwLock::new(cache),
            storage,
        })
    }

    pub async fn get(&self, id: &str) -> Option<Movie> {
        self.cache.read().await.get(id).map(|movie| (*movie).clone())
    }

    pub async fn get_by_external_id(&self, external_id: &str) -> Option<Movie> {
        self.cache
            .read()
            .await
            .get_by_external_id(external_id)
            .map(|movie| (*movie).clone())
    }

    /// Idempotent merge-upsert; see [`MovieCache::merge_save`].
    pub async fn merge_save(&self, candidate: Movie) -> Movie {
        let mut cache = self.cache.write().await;
        (*cache.merge_save(candidate)).clone()
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Write the snapshot when anything changed since the last save.
    pub async fn save_if_dirty(&self) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        if !cache.is_dirty() {
            return Ok(());
        }
        self.storage.save(&cache)?;
        cache.mark_clean();
        Ok(())
    }

    /// Drop every cached record and persist the empty table.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        *cache = MovieCache::new();
        self.storage.save(&cache)?;
        cache.mark_clean();
        Ok(())
    }
}
