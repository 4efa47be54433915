use async_trait::async_trait;
use bytes::Bytes;
use monster::ports::MetadataSource;
use reqwest::Client;
use shared::config::Config;
use shared::{Error, Result};
use tracing::{debug, info};

/// Client for the remote movie-metadata API.
///
/// Request URLs are `url_prefix + movie_id + url_suffix`; the suffix usually
/// carries the API key, so it is kept out of the logs.
#[derive(Clone, Debug)]
pub struct MetadataClient {
    client: Client,
    url_prefix: String,
    url_suffix: String,
}

impl MetadataClient {
    pub fn new(client: Client, url_prefix: impl Into<String>, url_suffix: impl Into<String>) -> Self {
        Self {
            client,
            url_prefix: url_prefix.into(),
            url_suffix: url_suffix.into(),
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(client, &config.api_url_prefix, &config.api_url_suffix)
    }

    pub fn movie_url(&self, movie_id: &str) -> String {
        format!("{}{}{}", self.url_prefix, movie_id, self.url_suffix)
    }
}

#[async_trait]
impl MetadataSource for MetadataClient {
    async fn fetch(&self, movie_id: &str) -> Result<Bytes> {
        info!("Fetching movie {} from {}", movie_id, self.url_prefix);

        let response = self
            .client
            .get(self.movie_url(movie_id))
            .send()
            .await
            .map_err(|e| Error::Transport(e.without_url().to_string()))?;

        // Status is deliberately not checked here; the body is decoded as-is
        debug!("Metadata API answered {} for movie {}", response.status(), movie_id);

        response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.without_url().to_string()))
    }
}
