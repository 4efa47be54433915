use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Build and configure the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/movie/{movie_id}", get(handlers::get_movie))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use bytes::Bytes;
    use futures::{stream, StreamExt};
    use http_body_util::BodyExt;
    use monster::ports::{ImageSource, ImageStream, MetadataSource};
    use monster::MovieLookupService;
    use shared::config::Config;
    use shared::{Error, Result};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use storage_engine::{DiskPosterStore, MokaRecordStore};
    use tokio_util::task::TaskTracker;
    use tower::ServiceExt;

    const RESERVOIR_DOGS: &str = r#"{"id":"500","poster_path":"/abc.jpg","title":"Reservoir Dogs"}"#;

    struct StubMetadata {
        body: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StubMetadata {
        fn serving(body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                body: Some(body),
                calls: AtomicUsize::new(0),
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                body: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataSource for StubMetadata {
        async fn fetch(&self, _movie_id: &str) -> Result<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body
                .map(|b| Bytes::from_static(b.as_bytes()))
                .ok_or_else(|| Error::Transport("connection refused".into()))
        }
    }

    struct StubImages {
        status: u16,
        fetches: AtomicUsize,
    }

    impl StubImages {
        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageSource for StubImages {
        async fn fetch(&self, _poster_path: &str) -> Result<ImageStream> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.status != 200 {
                return Err(Error::UnexpectedStatus(self.status));
            }
            Ok(stream::iter(vec![Ok(Bytes::from_static(b"poster-bytes"))]).boxed())
        }
    }

    fn test_config(poster_dir: &Path) -> Arc<Config> {
        let dir = poster_dir.display().to_string();
        Arc::new(Config::from_source(move |key| match key {
            "MONSTER_POSTER_DIR" => Some(dir.clone()),
            "MONSTER_FATAL_TRANSPORT_ERRORS" => Some("false".to_string()),
            _ => None,
        }))
    }

    fn test_app(
        metadata: Arc<StubMetadata>,
        images: Arc<StubImages>,
        poster_dir: &Path,
    ) -> (Router, TaskTracker) {
        let operations = Arc::new(MovieLookupService::new(
            Arc::new(MokaRecordStore::new("test")),
            metadata,
            images,
            Arc::new(DiskPosterStore::new(poster_dir)),
        ));
        let state = AppState::new(operations, test_config(poster_dir));
        let tasks = state.poster_tasks.clone();
        (build_router(state), tasks)
    }

    fn test_router(
        metadata: Arc<StubMetadata>,
        images: Arc<StubImages>,
        poster_dir: &Path,
    ) -> Router {
        test_app(metadata, images, poster_dir).0
    }

    async fn drain(tasks: &TaskTracker) {
        tasks.close();
        tokio::time::timeout(Duration::from_secs(1), tasks.wait())
            .await
            .expect("poster downloads never finished");
    }

    fn images(status: u16) -> Arc<StubImages> {
        Arc::new(StubImages {
            status,
            fetches: AtomicUsize::new(0),
        })
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, Bytes) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    #[tokio::test]
    async fn test_root_returns_greeting() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(StubMetadata::serving(RESERVOIR_DOGS), images(200), dir.path());

        let (status, body) = get(&router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"Movie monster, at your service");

        // Unaffected by lookups, failed or not
        get(&router, "/movie/500").await;
        let (status, body) = get(&router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], handlers::GREETING.as_bytes());
    }

    #[tokio::test]
    async fn test_movie_lookup_returns_json_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = StubMetadata::serving(RESERVOIR_DOGS);
        let router = test_router(metadata.clone(), images(200), dir.path());

        let response = router
            .clone()
            .oneshot(Request::builder().uri("/movie/500").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let first = response.into_body().collect().await.unwrap().to_bytes();

        let (status, second) = get(&router, "/movie/500").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first, second);
        assert_eq!(metadata.calls(), 1);

        let body: serde_json::Value = serde_json::from_slice(&first).unwrap();
        let upstream: serde_json::Value = serde_json::from_str(RESERVOIR_DOGS).unwrap();
        assert_eq!(body, upstream);
    }

    #[tokio::test]
    async fn test_movie_lookup_saves_poster() {
        let dir = tempfile::tempdir().unwrap();
        let (router, tasks) =
            test_app(StubMetadata::serving(RESERVOIR_DOGS), images(200), dir.path());

        let (status, _) = get(&router, "/movie/500").await;
        assert_eq!(status, StatusCode::OK);

        drain(&tasks).await;
        let poster = std::fs::read(dir.path().join("abc.jpg")).unwrap();
        assert_eq!(poster, b"poster-bytes");
    }

    #[tokio::test]
    async fn test_cache_hit_downloads_poster_again() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = StubMetadata::serving(RESERVOIR_DOGS);
        let images = images(200);
        let (router, tasks) = test_app(metadata.clone(), images.clone(), dir.path());

        get(&router, "/movie/500").await;
        get(&router, "/movie/500").await;
        assert_eq!(metadata.calls(), 1);

        drain(&tasks).await;
        assert!(tasks.is_empty());
        assert_eq!(images.fetches(), 2);
        let poster = std::fs::read(dir.path().join("abc.jpg")).unwrap();
        assert_eq!(poster, b"poster-bytes");
    }

    #[tokio::test]
    async fn test_poster_404_writes_no_file_but_serves_movie() {
        let dir = tempfile::tempdir().unwrap();
        let images = images(404);
        let (router, tasks) =
            test_app(StubMetadata::serving(RESERVOIR_DOGS), images.clone(), dir.path());

        let (status, body) = get(&router, "/movie/500").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.is_empty());

        drain(&tasks).await;
        assert_eq!(images.fetches(), 1);
        assert!(!dir.path().join("abc.jpg").exists());
    }

    #[tokio::test]
    async fn test_invalid_json_yields_empty_body_and_retries() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = StubMetadata::serving("not json at all");
        let router = test_router(metadata.clone(), images(200), dir.path());

        let (status, body) = get(&router, "/movie/500").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());

        let (status, body) = get(&router, "/movie/500").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(metadata.calls(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_metadata_yields_empty_body_when_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = StubMetadata::unreachable();
        let router = test_router(metadata.clone(), images(200), dir.path());

        let (status, body) = get(&router, "/movie/500").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(metadata.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(StubMetadata::serving(RESERVOIR_DOGS), images(200), dir.path());

        let (status, _) = get(&router, "/movies").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
