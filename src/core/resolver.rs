use crate::adapters::{tracking_store_from_uri, LocalFileSource, TrackingRunSource};
use crate::config::toml_config::TomlConfig;
use crate::domain::ports::{ModelHandle, ModelSource};
use crate::utils::error::{PredictorError, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;

#[derive(Clone)]
enum Resolution {
    Found(ModelHandle),
    NotFound { attempted: Vec<String> },
}

/// Tries model sources in order; the first one that loads wins and the
/// outcome, found or not, is kept for the life of the resolver.
pub struct ModelResolver {
    sources: Vec<Box<dyn ModelSource>>,
    strict: bool,
    resolution: OnceCell<Resolution>,
}

impl ModelResolver {
    pub fn new(sources: Vec<Box<dyn ModelSource>>) -> Self {
        Self {
            sources,
            strict: false,
            resolution: OnceCell::new(),
        }
    }

    /// Stop at a source that exists but cannot be loaded, instead of moving on.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Standard chain: local model file, tracking store run, local run artifacts.
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let model = &config.model;
        let store = tracking_store_from_uri(&config.tracking.uri, config.tracking_timeout())?;

        let sources: Vec<Box<dyn ModelSource>> = vec![
            Box::new(LocalFileSource::new(&model.file)),
            Box::new(TrackingRunSource::new(
                store,
                &model.run_id,
                &model.artifact_path,
            )),
            Box::new(LocalFileSource::new(config.local_artifact_dir())),
        ];

        Ok(Self::new(sources).strict(model.strict_sources))
    }

    pub fn candidates(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.describe()).collect()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.initialized()
    }

    pub async fn resolve(&self) -> Result<ModelHandle> {
        let resolution = self
            .resolution
            .get_or_init(|| self.attempt_sources())
            .await;

        match resolution {
            Resolution::Found(handle) => Ok(Arc::clone(handle)),
            Resolution::NotFound { attempted } => Err(PredictorError::ModelUnavailable {
                attempted: attempted.clone(),
            }),
        }
    }

    async fn attempt_sources(&self) -> Resolution {
        let mut attempted = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let name = source.describe();
            tracing::debug!("Trying model source: {}", name);

            match source.load().await {
                Ok(handle) => {
                    tracing::info!("✅ Model loaded from {}", name);
                    return Resolution::Found(handle);
                }
                Err(e) if e.is_source_absent() => {
                    tracing::debug!("Model source {} unavailable: {}", name, e);
                    attempted.push(format!("{} ({})", name, e));
                }
                Err(e) => {
                    tracing::warn!("Model source {} is present but failed to load: {}", name, e);
                    attempted.push(format!("{} ({})", name, e));
                    if self.strict {
                        tracing::error!("❌ Strict source mode: not trying remaining candidates");
                        break;
                    }
                }
            }
        }

        tracing::error!("❌ No model source succeeded ({} tried)", attempted.len());
        Resolution::NotFound { attempted }
    }
}
