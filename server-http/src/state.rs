use monster::MovieLookupService;
use monster::ports::{ImageSource, MetadataSource, PosterStore, RecordStore};
use shared::config::Config;
use std::sync::Arc;
use storage_engine::{DiskPosterStore, MokaRecordStore};
use tokio_util::task::TaskTracker;
use upstream::{ImageClient, MetadataClient};

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub movie_operations: Arc<MovieLookupService>,
    pub config: Arc<Config>,
    /// Poster downloads still running; drained before the process exits
    pub poster_tasks: TaskTracker,
}

impl AppState {
    pub fn new(movie_operations: Arc<MovieLookupService>, config: Arc<Config>) -> Self {
        Self {
            movie_operations,
            config,
            poster_tasks: TaskTracker::new(),
        }
    }

    /// Wire the production adapters: Moka cache, reqwest upstreams, posters on disk.
    pub fn from_config(config: Arc<Config>) -> shared::Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| shared::Error::Internal(format!("failed to build HTTP client: {}", e)))?;

        let records: Arc<dyn RecordStore> = Arc::new(MokaRecordStore::new("movies"));
        let metadata: Arc<dyn MetadataSource> =
            Arc::new(MetadataClient::from_config(http.clone(), &config));
        let images: Arc<dyn ImageSource> = Arc::new(ImageClient::from_config(http, &config));
        let posters: Arc<dyn PosterStore> = Arc::new(DiskPosterStore::new(&config.poster_dir));

        tracing::info!(
            "Lookup cache initialized (unbounded, no TTL); posters go to {}",
            config.poster_dir
        );

        let movie_operations = Arc::new(MovieLookupService::new(records, metadata, images, posters));
        Ok(Self::new(movie_operations, config))
    }
}
