#![deny(clippy::all)]

use crate::domain::Movie;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use shared::Result;

// Ports are the pluggable extension points for upstream APIs and local storage

/// Body of a poster download, yielded chunk by chunk
pub type ImageStream = BoxStream<'static, Result<Bytes>>;

/// Port for the remote movie-metadata API
#[async_trait]
pub trait MetadataSource: Send + Sync + 'static {
    /// Fetch the raw body for `movie_id`. The HTTP status is not inspected.
    async fn fetch(&self, movie_id: &str) -> Result<Bytes>;
}

/// Port for the remote image host
#[async_trait]
pub trait ImageSource: Send + Sync + 'static {
    /// Start a poster download. Anything but a 200 is an `UnexpectedStatus` error.
    async fn fetch(&self, poster_path: &str) -> Result<ImageStream>;
}

/// Port for the in-process lookup cache (e.g., Moka)
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    async fn lookup(&self, movie_id: &str) -> Option<Movie>;
    /// Overwrites any existing entry for `movie_id`
    async fn insert(&self, movie_id: String, movie: Movie);
    async fn len(&self) -> u64;
}

/// Port for persisting downloaded posters
#[async_trait]
pub trait PosterStore: Send + Sync + 'static {
    /// Write `image` to `file_name`, replacing any existing file. Returns bytes written.
    async fn save(&self, file_name: &str, image: ImageStream) -> Result<u64>;
}
