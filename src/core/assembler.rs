use crate::domain::model::{FeatureRecord, FeatureValue, UserInputs};
use crate::domain::schema::{self, FieldSource, NumericKind, SCHEMA};
use crate::utils::error::{PredictorError, Result};

/// Builds model input records from user inputs, backfilling every field the
/// caller does not supply.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureAssembler;

impl FeatureAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, inputs: &UserInputs) -> Result<FeatureRecord> {
        for key in inputs.keys() {
            if !schema::field(key).is_some_and(|f| f.is_user_field()) {
                tracing::warn!("Ignoring input '{}': not a user-facing model field", key);
            }
        }

        let mut fields = Vec::with_capacity(SCHEMA.len());
        for spec in SCHEMA.iter() {
            let value = match spec.source {
                FieldSource::User { kind, default, .. } => {
                    coerce(spec.name, kind, inputs.get(spec.name).copied().unwrap_or(default))
                }
                FieldSource::Constant { kind, value } => coerce(spec.name, kind, value),
                FieldSource::Derived { kind, from } => {
                    let source = inputs
                        .get(from)
                        .copied()
                        .or_else(|| schema::user_default(from))
                        .ok_or_else(|| PredictorError::AssemblyError {
                            field: spec.name.to_string(),
                        })?;
                    coerce(spec.name, kind, source)
                }
                FieldSource::Categorical { default } => FeatureValue::Category(default.to_string()),
            };
            fields.push((spec.name, value));
        }

        tracing::debug!("Assembled feature record with {} fields", fields.len());
        Ok(FeatureRecord::from_fields(fields))
    }
}

fn coerce(name: &str, kind: NumericKind, value: f64) -> FeatureValue {
    if !value.is_finite() {
        tracing::warn!("Input '{}' is not a finite number: {}", name, value);
    }
    match kind {
        // 同 Python int()：向零截斷
        NumericKind::Int => FeatureValue::Int(value.trunc() as i64),
        NumericKind::Float => FeatureValue::Float(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, f64)]) -> UserInputs {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_empty_inputs_backfill_every_field() {
        let record = FeatureAssembler::new().assemble(&UserInputs::new()).unwrap();

        assert_eq!(record.len(), 81);
        assert!(record.columns().eq(schema::expected_columns()));
        assert_eq!(record.get("Lot Area"), Some(&FeatureValue::Int(9600)));
        assert_eq!(record.get("Gr Liv Area"), Some(&FeatureValue::Float(1710.0)));
        assert_eq!(record.get("Low Qual Fin SF"), Some(&FeatureValue::Int(0)));
        assert_eq!(
            record.get("Neighborhood"),
            Some(&FeatureValue::Category("NAmes".to_string()))
        );
    }

    #[test]
    fn test_user_values_override_defaults() {
        let record = FeatureAssembler::new()
            .assemble(&inputs(&[("Lot Area", 12000.0), ("Overall Qual", 8.0)]))
            .unwrap();

        assert_eq!(record.get("Lot Area"), Some(&FeatureValue::Int(12000)));
        assert_eq!(record.get("Overall Qual"), Some(&FeatureValue::Int(8)));
        assert_eq!(record.get("Overall Cond"), Some(&FeatureValue::Int(7)));
    }

    #[test]
    fn test_integer_fields_truncate() {
        let record = FeatureAssembler::new()
            .assemble(&inputs(&[("Lot Area", 9600.9), ("Lot Frontage", 65.5)]))
            .unwrap();

        assert_eq!(record.get("Lot Area"), Some(&FeatureValue::Int(9600)));
        assert_eq!(record.get("Lot Frontage"), Some(&FeatureValue::Float(65.5)));
    }

    #[test]
    fn test_garage_year_follows_year_built() {
        let record = FeatureAssembler::new()
            .assemble(&inputs(&[("Year Built", 1995.0)]))
            .unwrap();
        assert_eq!(record.get("Garage Yr Blt"), Some(&FeatureValue::Int(1995)));

        let record = FeatureAssembler::new().assemble(&UserInputs::new()).unwrap();
        assert_eq!(record.get("Garage Yr Blt"), Some(&FeatureValue::Int(1961)));
    }

    #[test]
    fn test_unknown_and_structural_keys_are_ignored() {
        let record = FeatureAssembler::new()
            .assemble(&inputs(&[("Pool Area", 500.0), ("Bogus", 1.0)]))
            .unwrap();

        assert_eq!(record.len(), 81);
        assert_eq!(record.get("Pool Area"), Some(&FeatureValue::Int(0)));
        assert!(record.get("Bogus").is_none());
    }

    #[test]
    fn test_non_finite_inputs_still_assemble() {
        let record = FeatureAssembler::new()
            .assemble(&inputs(&[("Lot Area", f64::NAN), ("Gr Liv Area", f64::INFINITY)]))
            .unwrap();

        assert_eq!(record.len(), 81);
        // NaN 轉整數為 0，呼叫端負責驗證
        assert_eq!(record.get("Lot Area"), Some(&FeatureValue::Int(0)));
        assert_eq!(
            record.get("Gr Liv Area"),
            Some(&FeatureValue::Float(f64::INFINITY))
        );
    }
}
