use crate::adapters::tracking_store_from_uri;
use crate::core::linear_model::{ArtifactMetadata, LinearPriceModel};
use crate::domain::ports::{Storage, TrackingStore};
use crate::utils::error::{PredictorError, Result};
use chrono::Utc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub model_uri: String,
    pub output_path: String,
    pub bytes_written: usize,
}

impl ExportReport {
    pub fn size_mb(&self) -> f64 {
        self.bytes_written as f64 / (1024.0 * 1024.0)
    }
}

/// Copies a run's model out of a tracking store into a self-contained file.
pub struct ModelExporter<S: Storage> {
    storage: S,
    timeout: Duration,
}

impl<S: Storage> ModelExporter<S> {
    pub fn new(storage: S, timeout: Duration) -> Self {
        Self { storage, timeout }
    }

    pub async fn export(
        &self,
        tracking_uri: &str,
        run_id: &str,
        artifact_path: &str,
        output_path: &str,
    ) -> Result<ExportReport> {
        let store = tracking_store_from_uri(tracking_uri, self.timeout)?;
        self.export_from_store(store.as_ref(), run_id, artifact_path, output_path)
            .await
    }

    pub async fn export_from_store(
        &self,
        store: &dyn TrackingStore,
        run_id: &str,
        artifact_path: &str,
        output_path: &str,
    ) -> Result<ExportReport> {
        let model_uri = format!("runs:/{}/{}", run_id, artifact_path);
        tracing::info!(
            "Trying to load model from: {} at tracking URI: {}",
            model_uri,
            store.uri()
        );

        let bytes = store
            .fetch_artifact(run_id, artifact_path)
            .await
            .map_err(|e| PredictorError::ExportError {
                message: format!("failed to load {} from {}: {}", model_uri, store.uri(), e),
            })?;

        let mut model = LinearPriceModel::from_slice(&bytes, &model_uri).map_err(|e| {
            PredictorError::ExportError {
                message: e.to_string(),
            }
        })?;
        tracing::info!("✅ Successfully loaded model from {}", model_uri);

        model.metadata = Some(ArtifactMetadata {
            run_id: run_id.to_string(),
            tracking_uri: store.uri().to_string(),
            exported_at: Utc::now(),
        });

        let data = model.to_json_pretty()?;
        self.storage
            .write_file(output_path, &data)
            .await
            .map_err(|e| PredictorError::ExportError {
                message: format!("failed to write {}: {}", output_path, e),
            })?;

        tracing::info!("✅ Model saved to: {} ({} bytes)", output_path, data.len());
        Ok(ExportReport {
            model_uri,
            output_path: output_path.to_string(),
            bytes_written: data.len(),
        })
    }
}
