use tracing::warn;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub api_url_prefix: String,
    pub api_url_suffix: String,
    pub image_url_prefix: String,
    pub poster_dir: String,
    /// Exit the process when the metadata API cannot be reached.
    pub fatal_transport_errors: bool,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 6262;
    const DEFAULT_API_URL_PREFIX: &str = "https://api.themoviedb.org/3/movie/";
    const DEFAULT_IMAGE_URL_PREFIX: &str = "https://image.tmdb.org/t/p/original";
    const DEFAULT_POSTER_DIR: &str = ".";

    pub fn from_env() -> Self {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. `from_env` is the production entry point.
    pub fn from_source<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_port = var("MONSTER_HTTP_PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(Self::DEFAULT_HTTP_PORT);

        let api_url_suffix = var("MONSTER_API_URL_SUFFIX").unwrap_or_else(|| {
            let api_key = var("MONSTER_API_KEY").unwrap_or_else(|| {
                warn!("MONSTER_API_KEY not set, metadata requests will likely be rejected");
                String::new()
            });
            format!("?api_key={}", api_key)
        });

        Self {
            host: var("MONSTER_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            http_port,
            api_url_prefix: var("MONSTER_API_URL_PREFIX")
                .unwrap_or_else(|| Self::DEFAULT_API_URL_PREFIX.to_string()),
            api_url_suffix,
            image_url_prefix: var("MONSTER_IMAGE_URL_PREFIX")
                .unwrap_or_else(|| Self::DEFAULT_IMAGE_URL_PREFIX.to_string()),
            poster_dir: var("MONSTER_POSTER_DIR")
                .unwrap_or_else(|| Self::DEFAULT_POSTER_DIR.to_string()),
            fatal_transport_errors: var("MONSTER_FATAL_TRANSPORT_ERRORS")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}
