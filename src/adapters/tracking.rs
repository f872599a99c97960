//! Tracking store clients.
//!
//! Both stores resolve `(run_id, artifact_path)` to the bytes of the
//! `model.json` stored under that run's artifact directory.

use crate::core::linear_model::{LinearPriceModel, MODEL_FILE_NAME};
use crate::domain::ports::{ModelHandle, ModelSource, TrackingStore};
use crate::utils::error::{PredictorError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Tracking server reached over its REST artifact endpoint.
#[derive(Debug, Clone)]
pub struct HttpTrackingStore {
    uri: String,
    base: Url,
    client: Client,
}

impl HttpTrackingStore {
    pub fn new(uri: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(uri).map_err(|e| PredictorError::InvalidConfigValueError {
            field: "tracking.uri".to_string(),
            value: uri.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            uri: uri.to_string(),
            base,
            client,
        })
    }

    fn artifact_url(&self, run_id: &str, artifact_path: &str) -> Result<Url> {
        let mut url = self
            .base
            .join("get-artifact")
            .map_err(|e| PredictorError::ConfigError {
                message: format!("Cannot build artifact URL from '{}': {}", self.uri, e),
            })?;
        url.query_pairs_mut()
            .append_pair("path", &format!("{}/{}", artifact_path, MODEL_FILE_NAME))
            .append_pair("run_uuid", run_id);
        Ok(url)
    }
}

#[async_trait]
impl TrackingStore for HttpTrackingStore {
    fn uri(&self) -> &str {
        &self.uri
    }

    async fn fetch_artifact(&self, run_id: &str, artifact_path: &str) -> Result<Vec<u8>> {
        let url = self.artifact_url(run_id, artifact_path)?;
        tracing::debug!("Requesting artifact from: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!("Tracking store response status: {}", response.status());

        if response.status() == StatusCode::NOT_FOUND {
            return Err(PredictorError::ArtifactNotFound {
                location: format!("runs:/{}/{} at {}", run_id, artifact_path, self.uri),
            });
        }

        let response = response.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// File based store laid out as `<root>/<experiment_id>/<run_id>/artifacts/...`.
#[derive(Debug, Clone)]
pub struct FileTrackingStore {
    uri: String,
    root: PathBuf,
}

impl FileTrackingStore {
    pub fn new(uri: &str, root: impl Into<PathBuf>) -> Self {
        Self {
            uri: uri.to_string(),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl TrackingStore for FileTrackingStore {
    fn uri(&self) -> &str {
        &self.uri
    }

    async fn fetch_artifact(&self, run_id: &str, artifact_path: &str) -> Result<Vec<u8>> {
        let not_found = || PredictorError::ArtifactNotFound {
            location: format!("runs:/{}/{} in {}", run_id, artifact_path, self.root.display()),
        };

        let mut experiments = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };

        // run id 唯一，不需要知道屬於哪個 experiment
        while let Some(entry) = experiments.next_entry().await? {
            let candidate = entry
                .path()
                .join(run_id)
                .join("artifacts")
                .join(artifact_path)
                .join(MODEL_FILE_NAME);

            match tokio::fs::read(&candidate).await {
                Ok(bytes) => {
                    tracing::debug!("Found artifact at {}", candidate.display());
                    return Ok(bytes);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) if e.kind() == std::io::ErrorKind::NotADirectory => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(not_found())
    }
}

/// Picks a store implementation from the URI scheme. `http(s)` URIs use the
/// REST client; `file:` URIs and bare paths use the filesystem layout.
pub fn tracking_store_from_uri(uri: &str, timeout: Duration) -> Result<Arc<dyn TrackingStore>> {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return Ok(Arc::new(HttpTrackingStore::new(uri, timeout)?));
    }

    Ok(Arc::new(FileTrackingStore::new(uri, file_store_root(uri))))
}

/// `file://` URIs are absolute; `file:./mlruns` and bare paths are relative
/// to the working directory.
fn file_store_root(uri: &str) -> PathBuf {
    if let Some(rest) = uri.strip_prefix("file://") {
        return Url::parse(uri)
            .ok()
            .and_then(|url| url.to_file_path().ok())
            .unwrap_or_else(|| PathBuf::from(rest));
    }

    match uri.strip_prefix("file:") {
        Some(rest) => PathBuf::from(rest),
        None => PathBuf::from(uri),
    }
}

/// `runs:/<run_id>/<artifact_path>` reference resolved through a tracking store.
pub struct TrackingRunSource {
    store: Arc<dyn TrackingStore>,
    run_id: String,
    artifact_path: String,
}

impl TrackingRunSource {
    pub fn new(store: Arc<dyn TrackingStore>, run_id: &str, artifact_path: &str) -> Self {
        Self {
            store,
            run_id: run_id.to_string(),
            artifact_path: artifact_path.to_string(),
        }
    }
}

#[async_trait]
impl ModelSource for TrackingRunSource {
    fn describe(&self) -> String {
        format!("runs:/{}/{}", self.run_id, self.artifact_path)
    }

    async fn load(&self) -> Result<ModelHandle> {
        let bytes = self
            .store
            .fetch_artifact(&self.run_id, &self.artifact_path)
            .await?;
        let model = LinearPriceModel::from_slice(&bytes, &self.describe())?;
        Ok(Arc::new(model))
    }
}
