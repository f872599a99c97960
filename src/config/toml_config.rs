use crate::utils::error::{PredictorError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "predictor.toml";
pub const DEFAULT_RUN_ID: &str = "173084b4925743889a1348fd990f7dc5";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// 優先載入的本地模型檔
    pub file: String,
    pub run_id: String,
    pub artifact_path: String,
    pub local_artifact_root: String,
    pub experiment_id: String,
    pub strict_sources: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            file: "model.json".to_string(),
            run_id: DEFAULT_RUN_ID.to_string(),
            artifact_path: "model".to_string(),
            local_artifact_root: "mlruns".to_string(),
            experiment_id: "0".to_string(),
            strict_sources: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub uri: String,
    pub timeout_seconds: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            uri: "./mlruns".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PredictorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::debug!("Loading configuration from: {}", path.display());
            Self::from_file(path)
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PredictorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RUN_ID})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PredictorError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("model.file", &self.model.file)?;
        validation::validate_non_empty_string("model.run_id", &self.model.run_id)?;
        validation::validate_path("model.artifact_path", &self.model.artifact_path)?;
        validation::validate_path("model.local_artifact_root", &self.model.local_artifact_root)?;
        validation::validate_non_empty_string("model.experiment_id", &self.model.experiment_id)?;
        validation::validate_tracking_uri("tracking.uri", &self.tracking.uri)?;
        validation::validate_positive_number(
            "tracking.timeout_seconds",
            self.tracking.timeout_seconds as usize,
            1,
        )?;
        Ok(())
    }

    pub fn tracking_timeout(&self) -> Duration {
        Duration::from_secs(self.tracking.timeout_seconds)
    }

    /// `<root>/<experiment>/<run_id>/artifacts/<artifact_path>`
    pub fn local_artifact_dir(&self) -> PathBuf {
        Path::new(&self.model.local_artifact_root)
            .join(&self.model.experiment_id)
            .join(&self.model.run_id)
            .join("artifacts")
            .join(&self.model.artifact_path)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
