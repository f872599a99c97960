use crate::domain::model::FeatureRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A loaded model. Read-only once built, shared across requests.
pub trait Predictor: Send + Sync {
    /// Raw model output for one record.
    fn predict(&self, record: &FeatureRecord) -> Result<f64>;
}

pub type ModelHandle = Arc<dyn Predictor>;

/// One candidate location a model can be loaded from.
#[async_trait]
pub trait ModelSource: Send + Sync {
    fn describe(&self) -> String;
    async fn load(&self) -> Result<ModelHandle>;
}

/// External system mapping run identifiers to stored artifacts.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    fn uri(&self) -> &str;
    async fn fetch_artifact(&self, run_id: &str, artifact_path: &str) -> Result<Vec<u8>>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
