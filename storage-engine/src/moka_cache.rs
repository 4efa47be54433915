use async_trait::async_trait;
use monster::Movie;
use monster::ports::RecordStore;
use moka::future::Cache;
use std::fmt::Debug;

/// Moka-based lookup cache for decoded movies
/// Unbounded and without TTL: entries live until the process exits
#[derive(Clone)]
pub struct MokaRecordStore {
    cache: Cache<String, Movie>,
}

impl MokaRecordStore {
    pub fn new(name: &str) -> Self {
        Self {
            cache: Cache::builder().name(name).build(),
        }
    }
}

impl Default for MokaRecordStore {
    fn default() -> Self {
        Self::new("movies")
    }
}

#[async_trait]
impl RecordStore for MokaRecordStore {
    async fn lookup(&self, movie_id: &str) -> Option<Movie> {
        self.cache.get(movie_id).await
    }

    async fn insert(&self, movie_id: String, movie: Movie) {
        self.cache.insert(movie_id, movie).await;
    }

    async fn len(&self) -> u64 {
        // entry_count is eventually consistent until pending writes are applied
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

impl Debug for MokaRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaRecordStore")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}
