use crate::domain::Movie;
use crate::domain::response::{LookupResponse, PosterResponse};
use async_trait::async_trait;
use shared::Result;

/// Application-level movie operations trait
#[async_trait]
pub trait MovieOperations: Send + Sync + 'static {
    /// Serve `movie_id` from the cache, fetching and caching it on a miss.
    async fn lookup(&self, movie_id: &str) -> Result<LookupResponse>;

    /// Download the movie's poster and write it to the poster store.
    async fn save_poster(&self, movie: &Movie) -> Result<PosterResponse>;
}
