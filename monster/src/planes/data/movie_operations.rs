use crate::domain::Movie;
use crate::domain::response::{LookupResponse, PosterResponse};
use crate::planes::data::operation::MovieOperations;
use crate::ports::{ImageSource, MetadataSource, PosterStore, RecordStore};
use async_trait::async_trait;
use bytes::Bytes;
use shared::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Application service that orchestrates movie lookups
/// This is the main entry point for all movie operations in the application core
#[derive(Clone)]
pub struct MovieLookupService {
    records: Arc<dyn RecordStore>,
    metadata: Arc<dyn MetadataSource>,
    images: Arc<dyn ImageSource>,
    posters: Arc<dyn PosterStore>,
}

impl MovieLookupService {
    pub fn new(
        records: Arc<dyn RecordStore>,
        metadata: Arc<dyn MetadataSource>,
        images: Arc<dyn ImageSource>,
        posters: Arc<dyn PosterStore>,
    ) -> Self {
        Self {
            records,
            metadata,
            images,
            posters,
        }
    }

    pub async fn cached_movies(&self) -> u64 {
        self.records.len().await
    }
}

impl std::fmt::Debug for MovieLookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieLookupService")
            .field("records", &"<dyn RecordStore>")
            .finish()
    }
}

#[async_trait]
impl MovieOperations for MovieLookupService {
    async fn lookup(&self, movie_id: &str) -> Result<LookupResponse> {
        // No single-flight: concurrent misses for one id each fetch, last insert wins
        let from_cache = match self.records.lookup(movie_id).await {
            Some(_) => {
                info!("Movie Id: {} is in the local cache, serving from cache", movie_id);
                true
            }
            None => {
                info!("Movie Id: {} is not in the local cache, fetching", movie_id);
                let body = self.metadata.fetch(movie_id).await?;
                let movie = Movie::from_slice(&body)?;
                self.records.insert(movie_id.to_string(), movie).await;
                info!(
                    "Movie Id: {} cached ({} movies in cache)",
                    movie_id,
                    self.cached_movies().await
                );
                false
            }
        };

        let movie = self.records.lookup(movie_id).await.ok_or(Error::NotFound)?;
        let body = movie.to_json()?;
        debug!("Movie Id: {} serialized to {} bytes", movie_id, body.len());

        Ok(LookupResponse::new(movie, Bytes::from(body), from_cache))
    }

    async fn save_poster(&self, movie: &Movie) -> Result<PosterResponse> {
        let poster_path = movie.poster_path().ok_or(Error::NoPoster)?;
        let file_name = movie
            .poster_file_name()
            .ok_or_else(|| Error::Internal(format!("poster path {:?} names no file", poster_path)))?;

        let image = self.images.fetch(poster_path).await?;
        let bytes_written = self.posters.save(file_name, image).await?;

        info!("Poster {} saved ({} bytes)", file_name, bytes_written);
        Ok(PosterResponse::new(file_name, bytes_written))
    }
}
