use crate::domain::ports::SessionStore;
use crate::domain::session::Credentials;
use crate::error::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::warn;

/// Durable session store backed by a single JSON file.
///
/// The file holds one serialized [`Credentials`] value. Content that cannot
/// be parsed loads as absent so a corrupted file degrades to a logged-out
/// session instead of wedging startup; genuine I/O failures propagate.
#[derive(Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Credentials>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(credentials) => Ok(Some(credentials)),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "unreadable session file, treating as absent");
                Ok(None)
            }
        }
    }

    async fn save(&self, credentials: &Credentials) -> Result<()> {
        let json = serde_json::to_vec_pretty(credentials)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
