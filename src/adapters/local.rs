use crate::core::linear_model::{LinearPriceModel, MODEL_FILE_NAME};
use crate::domain::ports::{ModelHandle, ModelSource, Storage};
use crate::utils::error::{PredictorError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Model artifact on the local filesystem. A directory path is treated as an
/// exported model directory containing `model.json`.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ModelSource for LocalFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<ModelHandle> {
        let file = if tokio::fs::metadata(&self.path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            self.path.join(MODEL_FILE_NAME)
        } else {
            self.path.clone()
        };

        let location = file.display().to_string();
        let bytes = tokio::fs::read(&file).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PredictorError::ArtifactNotFound {
                location: location.clone(),
            },
            _ => PredictorError::IoError(e),
        })?;

        let model = LinearPriceModel::from_slice(&bytes, &location)?;
        Ok(Arc::new(model))
    }
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}
