//! Model weight stores.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::weights::{ModelKind, ModelWeights};
use crate::shared::retry::{RetryRegistry, Retryable};

/// Weight table loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model file {path}: {reason}")]
    Invalid { path: String, reason: String },
}

impl Retryable for ModelError {
    /// Reads may fail transiently; a malformed file stays malformed.
    fn is_retryable(&self) -> bool {
        matches!(self, ModelError::Io { .. })
    }
}

/// Source of scoring weight tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelStore: Send + Sync {
    async fn load(&self, kind: ModelKind) -> Result<Arc<ModelWeights>, ModelError>;
}

/// Loads `<directory>/<model>.json`, falling back to built-in weights when
/// the file does not exist. Loaded tables are cached until invalidated.
pub struct FileModelStore {
    directory: PathBuf,
    cache: DashMap<ModelKind, Arc<ModelWeights>>,
}

impl FileModelStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            cache: DashMap::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Drop every cached table so the next load re-reads the files.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    async fn read(&self, kind: ModelKind) -> Result<ModelWeights, ModelError> {
        let path = self.directory.join(kind.file_name());
        let shown = path.display().to_string();

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(model = %kind, path = %shown, "No model file, using built-in weights");
                return Ok(ModelWeights::builtin(kind));
            }
            Err(source) => {
                return Err(ModelError::Io {
                    path: shown,
                    source,
                })
            }
        };

        let weights: ModelWeights =
            serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
                path: shown.clone(),
                source,
            })?;

        weights
            .check()
            .map_err(|reason| ModelError::Invalid {
                path: shown.clone(),
                reason,
            })?;

        tracing::info!(model = %kind, version = %weights.version, path = %shown, "Model weights loaded");
        Ok(weights)
    }
}

#[async_trait]
impl ModelStore for FileModelStore {
    async fn load(&self, kind: ModelKind) -> Result<Arc<ModelWeights>, ModelError> {
        if let Some(cached) = self.cache.get(&kind) {
            return Ok(cached.clone());
        }

        let weights = Arc::new(self.read(kind).await?);
        self.cache.insert(kind, weights.clone());
        Ok(weights)
    }
}

/// Decorates a store so every load runs under the retry rule matching
/// `models.load.<model>`.
pub struct RetryingModelStore<S> {
    inner: S,
    retry: Arc<RetryRegistry>,
}

impl<S: ModelStore> RetryingModelStore<S> {
    pub fn new(inner: S, retry: Arc<RetryRegistry>) -> Self {
        Self { inner, retry }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ModelStore> ModelStore for RetryingModelStore<S> {
    async fn load(&self, kind: ModelKind) -> Result<Arc<ModelWeights>, ModelError> {
        let operation = format!("models.load.{}", kind);
        self.retry
            .execute(&operation, || self.inner.load(kind))
            .await
    }
}
