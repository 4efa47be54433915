use async_trait::async_trait;
use futures::StreamExt;
use monster::ports::{ImageStream, PosterStore};
use shared::{Error, Result};
use std::path::{Component, Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Writes posters as plain files under a root directory
#[derive(Clone, Debug)]
pub struct DiskPosterStore {
    root: PathBuf,
}

impl DiskPosterStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `file_name` under the root. Absolute names and `..` segments are refused.
    fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        let relative = Path::new(file_name);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

        if file_name.is_empty() || !contained {
            return Err(Error::Io(format!(
                "poster file name {:?} is outside the poster directory",
                file_name
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl PosterStore for DiskPosterStore {
    async fn save(&self, file_name: &str, mut image: ImageStream) -> Result<u64> {
        let path = self.resolve(file_name)?;
        debug!("Writing poster to {}", path.display());

        // File is closed on drop, whichever way we leave this block
        let mut file = File::create(&path).await?;
        let mut written = 0u64;

        while let Some(chunk) = image.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        Ok(written)
    }
}
