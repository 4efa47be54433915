use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use monster::ports::{ImageSource, ImageStream};
use reqwest::{Client, StatusCode};
use shared::config::Config;
use shared::{Error, Result};
use tracing::{info, warn};

/// Client for the poster image host
#[derive(Clone, Debug)]
pub struct ImageClient {
    client: Client,
    url_prefix: String,
}

impl ImageClient {
    pub fn new(client: Client, url_prefix: impl Into<String>) -> Self {
        Self {
            client,
            url_prefix: url_prefix.into(),
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(client, &config.image_url_prefix)
    }

    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{}", self.url_prefix, poster_path)
    }
}

#[async_trait]
impl ImageSource for ImageClient {
    async fn fetch(&self, poster_path: &str) -> Result<ImageStream> {
        let url = self.poster_url(poster_path);
        info!("Downloading poster from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        if response.status() != StatusCode::OK {
            warn!("Received a non 200 response ({}) for {}", response.status(), url);
            return Err(Error::UnexpectedStatus(response.status().as_u16()));
        }

        Ok(response
            .bytes_stream()
            .map_err(|e| Error::Transport(e.to_string()))
            .boxed())
    }
}
