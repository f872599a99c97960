use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Model unavailable: no candidate source produced a model (tried: {})", .attempted.join(", "))]
    ModelUnavailable { attempted: Vec<String> },

    #[error("Feature assembly failed: no value or default for field '{field}'")]
    AssemblyError { field: String },

    #[error("Inference failed: {message}")]
    InferenceError { message: String },

    #[error("Model export failed: {message}")]
    ExportError { message: String },

    #[error("Model artifact not found at {location}")]
    ArtifactNotFound { location: String },

    #[error("Model artifact at {location} is invalid: {reason}")]
    ArtifactInvalid { location: String, reason: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Model,
    Inference,
    Export,
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PredictorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ModelUnavailable { .. }
            | Self::ArtifactNotFound { .. }
            | Self::ArtifactInvalid { .. } => ErrorCategory::Model,
            Self::AssemblyError { .. } | Self::InferenceError { .. } => ErrorCategory::Inference,
            Self::ExportError { .. } => ErrorCategory::Export,
            Self::ApiError(_) => ErrorCategory::Network,
            Self::CsvError(_) | Self::SerializationError(_) | Self::ValidationError { .. } => {
                ErrorCategory::Data
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ValidationError { .. } => ErrorSeverity::Medium,
            Self::ApiError(_) | Self::ArtifactNotFound { .. } => ErrorSeverity::Medium,
            Self::ModelUnavailable { .. } | Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 來源「不存在」(可以往下一個候選繼續) 與「存在但損壞」的區分
    pub fn is_source_absent(&self) -> bool {
        match self {
            Self::ArtifactNotFound { .. } | Self::ApiError(_) => true,
            Self::IoError(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ModelUnavailable { attempted } => match attempted.first() {
                Some(first) => format!("Model not found. Primary model source missing: {}", first),
                None => "Model not found. No model sources are configured.".to_string(),
            },
            Self::InferenceError { message } => format!("Error making prediction: {}", message),
            Self::AssemblyError { field } => {
                format!("Error making prediction: missing input '{}'", field)
            }
            Self::ExportError { message } => format!("Failed to export model: {}", message),
            Self::ArtifactNotFound { location } => format!("No model artifact at {}", location),
            Self::ArtifactInvalid { location, .. } => {
                format!("The model artifact at {} could not be read", location)
            }
            Self::ApiError(_) => "Could not reach the tracking store".to_string(),
            Self::ValidationError { message } => format!("Invalid input: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Model => {
                "Run export-model to stage model.json, or check model.run_id and tracking.uri"
            }
            ErrorCategory::Inference => {
                "Make sure the model artifact was trained on the same feature schema"
            }
            ErrorCategory::Export => "Double-check the tracking URI and run identifier, then re-run",
            ErrorCategory::Network => "Check that the tracking store is running and reachable",
            ErrorCategory::Data => "Check the input values and file format",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_vs_invalid_classification() {
        let missing = PredictorError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "model.json",
        ));
        assert!(missing.is_source_absent());

        let denied = PredictorError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "model.json",
        ));
        assert!(!denied.is_source_absent());

        let corrupt = PredictorError::ArtifactInvalid {
            location: "model.json".to_string(),
            reason: "expected value".to_string(),
        };
        assert!(!corrupt.is_source_absent());
    }

    #[test]
    fn test_model_unavailable_is_critical() {
        let err = PredictorError::ModelUnavailable {
            attempted: vec!["model.json".to_string(), "runs:/abc/model".to_string()],
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::Model);
        assert!(err.to_string().contains("model.json, runs:/abc/model"));
        assert!(err.user_friendly_message().contains("missing"));
    }

    #[test]
    fn test_model_unavailable_message_names_first_candidate() {
        let err = PredictorError::ModelUnavailable {
            attempted: vec![
                "/srv/models/price.json (Model artifact not found at /srv/models/price.json)"
                    .to_string(),
                "runs:/abc/model (API request failed)".to_string(),
            ],
        };
        let message = err.user_friendly_message();
        assert!(message.contains("/srv/models/price.json"));
        assert!(!message.contains("'model.json'"));

        let empty = PredictorError::ModelUnavailable { attempted: vec![] };
        assert!(empty.user_friendly_message().contains("No model sources"));
    }
}
