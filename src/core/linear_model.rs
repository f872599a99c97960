//! Portable linear regression artifact.
//!
//! The exported pipeline standardises numeric columns, one-hot encodes
//! categorical columns (unknown categories contribute nothing) and applies a
//! linear model trained on `log1p(SalePrice)`.

use crate::domain::model::FeatureRecord;
use crate::domain::ports::Predictor;
use crate::utils::error::{PredictorError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const FORMAT_VERSION: u32 = 1;
pub const MODEL_FILE_NAME: &str = "model.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericTerm {
    pub name: String,
    #[serde(default)]
    pub mean: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    pub coefficient: f64,
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalTerm {
    pub name: String,
    pub coefficients: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub run_id: String,
    pub tracking_uri: String,
    pub exported_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPriceModel {
    pub format_version: u32,
    #[serde(default = "default_model_type")]
    pub model_type: String,
    #[serde(default = "default_target_transform")]
    pub target_transform: String,
    pub intercept: f64,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub numeric: Vec<NumericTerm>,
    #[serde(default)]
    pub categorical: Vec<CategoricalTerm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ArtifactMetadata>,
}

fn default_model_type() -> String {
    "linear_regression".to_string()
}

fn default_target_transform() -> String {
    "log1p".to_string()
}

impl LinearPriceModel {
    /// 解析並驗證模型檔；`location` 只用於錯誤訊息
    pub fn from_slice(bytes: &[u8], location: &str) -> Result<Self> {
        let model: Self =
            serde_json::from_slice(bytes).map_err(|e| PredictorError::ArtifactInvalid {
                location: location.to_string(),
                reason: e.to_string(),
            })?;

        model
            .validate()
            .map_err(|reason| PredictorError::ArtifactInvalid {
                location: location.to_string(),
                reason,
            })?;

        Ok(model)
    }

    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.format_version != FORMAT_VERSION {
            return Err(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, FORMAT_VERSION
            ));
        }
        if self.model_type != "linear_regression" {
            return Err(format!("unsupported model_type '{}'", self.model_type));
        }
        if self.feature_names.is_empty() {
            return Err("feature_names is empty".to_string());
        }
        if !self.intercept.is_finite() {
            return Err("intercept is not finite".to_string());
        }

        let columns: HashSet<&str> = self.feature_names.iter().map(String::as_str).collect();
        if columns.len() != self.feature_names.len() {
            return Err("feature_names contains duplicates".to_string());
        }

        for term in &self.numeric {
            if !columns.contains(term.name.as_str()) {
                return Err(format!("numeric term '{}' is not an input column", term.name));
            }
            if term.scale == 0.0 || !term.scale.is_finite() {
                return Err(format!("numeric term '{}' has an invalid scale", term.name));
            }
        }
        for term in &self.categorical {
            if !columns.contains(term.name.as_str()) {
                return Err(format!(
                    "categorical term '{}' is not an input column",
                    term.name
                ));
            }
        }

        Ok(())
    }

    fn check_columns(&self, record: &FeatureRecord) -> Result<()> {
        if record.columns().eq(self.feature_names.iter().map(String::as_str)) {
            return Ok(());
        }

        let expected: HashSet<&str> = self.feature_names.iter().map(String::as_str).collect();
        let given: HashSet<&str> = record.columns().collect();

        let mut missing: Vec<&str> = expected.difference(&given).copied().collect();
        let mut unexpected: Vec<&str> = given.difference(&expected).copied().collect();
        missing.sort_unstable();
        unexpected.sort_unstable();

        let message = if missing.is_empty() && unexpected.is_empty() {
            "feature columns are not in the order seen at fit time".to_string()
        } else {
            format!(
                "columns are missing: {:?}, unexpected columns: {:?}",
                missing, unexpected
            )
        };
        Err(PredictorError::InferenceError { message })
    }
}

impl Predictor for LinearPriceModel {
    fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        self.check_columns(record)?;

        let mut raw = self.intercept;

        for term in &self.numeric {
            let value = record
                .get(&term.name)
                .and_then(|v| v.as_f64())
                .ok_or_else(|| PredictorError::InferenceError {
                    message: format!("column '{}' must be numeric", term.name),
                })?;
            raw += term.coefficient * (value - term.mean) / term.scale;
        }

        for term in &self.categorical {
            let category = record
                .get(&term.name)
                .and_then(|v| v.as_category())
                .ok_or_else(|| PredictorError::InferenceError {
                    message: format!("column '{}' must be categorical", term.name),
                })?;
            raw += term.coefficients.get(category).copied().unwrap_or(0.0);
        }

        Ok(raw)
    }
}
