use crate::domain::model::UserInputs;
use crate::domain::schema::{self, FieldSource};
use crate::utils::error::{PredictorError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Tracking URIs are `http(s)://`, `file:` or a bare filesystem path.
pub fn validate_tracking_uri(field_name: &str, uri: &str) -> Result<()> {
    if uri.trim().is_empty() {
        return Err(PredictorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: uri.to_string(),
            reason: "URI cannot be empty".to_string(),
        });
    }

    if !uri.contains("://") {
        // 非 URL 形式：視為路徑 (含 file:C:\... 這種寫法)
        return validate_path(field_name, uri);
    }

    match Url::parse(uri) {
        Ok(url) => match url.scheme() {
            "http" | "https" | "file" => Ok(()),
            scheme => Err(PredictorError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: uri.to_string(),
                reason: format!("Unsupported URI scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PredictorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: uri.to_string(),
            reason: format!("Invalid URI format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PredictorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PredictorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(PredictorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        match std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some(extension) if allowed_set.contains(extension) => {}
            Some(extension) => {
                return Err(PredictorError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
            None => {
                return Err(PredictorError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: "File has no extension or invalid filename".to_string(),
                });
            }
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PredictorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PredictorError::ValidationError {
            message: format!("{} = {}: value must be between {} and {}", field_name, value, min, max),
        });
    }
    Ok(())
}

/// Checks user inputs against the declared form bounds. This is the caller's
/// job; the feature assembler accepts whatever it is given.
pub fn validate_user_inputs(inputs: &UserInputs) -> Result<()> {
    for (name, &value) in inputs {
        let Some(spec) = schema::field(name) else {
            continue;
        };
        let FieldSource::User { bounds, label, .. } = spec.source else {
            continue;
        };

        if !value.is_finite() {
            return Err(PredictorError::ValidationError {
                message: format!("{} must be a finite number", label),
            });
        }
        match bounds.max {
            Some(max) => validate_range(label, value, bounds.min, max)?,
            None if value < bounds.min => {
                return Err(PredictorError::ValidationError {
                    message: format!("{} = {}: value must be at least {}", label, value, bounds.min),
                });
            }
            None => {}
        }
    }
    Ok(())
}
