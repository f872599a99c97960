//! Input schema of the sale price model.
//!
//! Column names and order follow the Ames housing training frame exactly;
//! the model's column transformer rejects records that deviate from it.

/// Numeric storage type a field is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Int,
    Float,
}

/// Inclusive bounds of a user-facing field, enforced by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldSource {
    /// Collected from the user; `default` backfills an absent input.
    User {
        kind: NumericKind,
        default: f64,
        bounds: Bounds,
        label: &'static str,
    },
    /// Fixed structural value the caller never exposes.
    Constant { kind: NumericKind, value: f64 },
    /// Copied from another user field.
    Derived { kind: NumericKind, from: &'static str },
    /// Categorical "typical house" default.
    Categorical { default: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub source: FieldSource,
}

impl FieldSpec {
    pub fn is_user_field(&self) -> bool {
        matches!(self.source, FieldSource::User { .. })
    }
}

const fn at_least(min: f64) -> Bounds {
    Bounds { min, max: None }
}

const fn between(min: f64, max: f64) -> Bounds {
    Bounds {
        min,
        max: Some(max),
    }
}

const fn user(
    name: &'static str,
    kind: NumericKind,
    default: f64,
    bounds: Bounds,
    label: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        source: FieldSource::User {
            kind,
            default,
            bounds,
            label,
        },
    }
}

const fn constant(name: &'static str, value: f64) -> FieldSpec {
    FieldSpec {
        name,
        source: FieldSource::Constant {
            kind: NumericKind::Int,
            value,
        },
    }
}

const fn categorical(name: &'static str, default: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        source: FieldSource::Categorical { default },
    }
}

use NumericKind::{Float, Int};

pub const YEAR_BOUNDS: Bounds = between(1800.0, 2024.0);

/// All 81 model columns, in training order.
pub static SCHEMA: [FieldSpec; 81] = [
    constant("Order", 1.0),
    constant("PID", 5286.0),
    constant("MS SubClass", 20.0),
    user("Lot Frontage", Float, 80.0, at_least(0.0), "Lot Frontage (ft)"),
    user("Lot Area", Int, 9600.0, at_least(0.0), "Lot Area (sq ft)"),
    user("Overall Qual", Int, 5.0, between(1.0, 10.0), "Overall Quality (1-10)"),
    user("Overall Cond", Int, 7.0, between(1.0, 10.0), "Overall Condition (1-10)"),
    user("Year Built", Int, 1961.0, YEAR_BOUNDS, "Year Built"),
    user("Year Remod/Add", Int, 1961.0, YEAR_BOUNDS, "Year Remodeled"),
    user("Mas Vnr Area", Float, 0.0, at_least(0.0), "Masonry Veneer Area (sq ft)"),
    user("BsmtFin SF 1", Float, 700.0, at_least(0.0), "Basement Finished Area 1 (sq ft)"),
    user("BsmtFin SF 2", Float, 0.0, at_least(0.0), "Basement Finished Area 2 (sq ft)"),
    user("Bsmt Unf SF", Float, 150.0, at_least(0.0), "Basement Unfinished Area (sq ft)"),
    user("Total Bsmt SF", Float, 850.0, at_least(0.0), "Total Basement Area (sq ft)"),
    user("1st Flr SF", Int, 856.0, at_least(0.0), "1st Floor Area (sq ft)"),
    user("2nd Flr SF", Int, 854.0, at_least(0.0), "2nd Floor Area (sq ft)"),
    constant("Low Qual Fin SF", 0.0),
    user("Gr Liv Area", Float, 1710.0, at_least(0.0), "Above Grade Living Area (sq ft)"),
    constant("Bsmt Full Bath", 0.0),
    constant("Bsmt Half Bath", 0.0),
    user("Full Bath", Int, 1.0, at_least(0.0), "Full Bathrooms"),
    user("Half Bath", Int, 0.0, at_least(0.0), "Half Bathrooms"),
    user("Bedroom AbvGr", Int, 3.0, at_least(0.0), "Bedrooms Above Grade"),
    constant("Kitchen AbvGr", 1.0),
    user("TotRms AbvGrd", Int, 7.0, at_least(0.0), "Total Rooms Above Grade"),
    user("Fireplaces", Int, 2.0, at_least(0.0), "Fireplaces"),
    FieldSpec {
        name: "Garage Yr Blt",
        source: FieldSource::Derived {
            kind: Int,
            from: "Year Built",
        },
    },
    user("Garage Cars", Int, 2.0, at_least(0.0), "Garage Cars"),
    user("Garage Area", Float, 500.0, at_least(0.0), "Garage Area (sq ft)"),
    user("Wood Deck SF", Float, 210.0, at_least(0.0), "Wood Deck Area (sq ft)"),
    user("Open Porch SF", Float, 0.0, at_least(0.0), "Open Porch Area (sq ft)"),
    constant("Enclosed Porch", 0.0),
    constant("3Ssn Porch", 0.0),
    constant("Screen Porch", 0.0),
    constant("Pool Area", 0.0),
    constant("Misc Val", 0.0),
    user("Mo Sold", Int, 5.0, between(1.0, 12.0), "Month Sold"),
    user("Yr Sold", Int, 2010.0, between(2000.0, 2024.0), "Year Sold"),
    categorical("MS Zoning", "RL"),
    categorical("Street", "Pave"),
    categorical("Alley", "NA"),
    categorical("Lot Shape", "Reg"),
    categorical("Land Contour", "Lvl"),
    categorical("Utilities", "AllPub"),
    categorical("Lot Config", "Inside"),
    categorical("Land Slope", "Gtl"),
    categorical("Neighborhood", "NAmes"),
    categorical("Condition 1", "Norm"),
    categorical("Condition 2", "Norm"),
    categorical("Bldg Type", "1Fam"),
    categorical("House Style", "1Story"),
    categorical("Roof Style", "Gable"),
    categorical("Roof Matl", "CompShg"),
    categorical("Exterior 1st", "VinylSd"),
    categorical("Exterior 2nd", "VinylSd"),
    categorical("Mas Vnr Type", "None"),
    categorical("Exter Qual", "TA"),
    categorical("Exter Cond", "TA"),
    categorical("Foundation", "PConc"),
    categorical("Bsmt Qual", "TA"),
    categorical("Bsmt Cond", "TA"),
    categorical("Bsmt Exposure", "No"),
    categorical("BsmtFin Type 1", "GLQ"),
    categorical("BsmtFin Type 2", "Unf"),
    categorical("Heating", "GasA"),
    categorical("Heating QC", "Ex"),
    categorical("Central Air", "Y"),
    categorical("Electrical", "SBrkr"),
    categorical("Kitchen Qual", "TA"),
    categorical("Functional", "Typ"),
    categorical("Fireplace Qu", "NA"),
    categorical("Garage Type", "Attchd"),
    categorical("Garage Finish", "Unf"),
    categorical("Garage Qual", "TA"),
    categorical("Garage Cond", "TA"),
    categorical("Paved Drive", "Y"),
    categorical("Pool QC", "NA"),
    categorical("Fence", "NA"),
    categorical("Misc Feature", "NA"),
    categorical("Sale Type", "WD"),
    categorical("Sale Condition", "Normal"),
];

pub fn expected_columns() -> impl Iterator<Item = &'static str> {
    SCHEMA.iter().map(|f| f.name)
}

pub fn field(name: &str) -> Option<&'static FieldSpec> {
    SCHEMA.iter().find(|f| f.name == name)
}

pub fn user_fields() -> impl Iterator<Item = &'static FieldSpec> {
    SCHEMA.iter().filter(|f| f.is_user_field())
}

pub fn categorical_defaults() -> impl Iterator<Item = (&'static str, &'static str)> {
    SCHEMA.iter().filter_map(|f| match f.source {
        FieldSource::Categorical { default } => Some((f.name, default)),
        _ => None,
    })
}

/// Declared default of a user field.
pub fn user_default(name: &str) -> Option<f64> {
    match field(name)?.source {
        FieldSource::User { default, .. } => Some(default),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_schema_has_unique_names() {
        let names: HashSet<&str> = expected_columns().collect();
        assert_eq!(names.len(), SCHEMA.len());
    }

    #[test]
    fn test_schema_partitions() {
        assert_eq!(user_fields().count(), 25);
        assert_eq!(categorical_defaults().count(), 43);

        let constants = SCHEMA
            .iter()
            .filter(|f| matches!(f.source, FieldSource::Constant { .. }))
            .count();
        assert_eq!(constants, 12);
    }

    #[test]
    fn test_numeric_columns_precede_categoricals() {
        let first_categorical = SCHEMA
            .iter()
            .position(|f| matches!(f.source, FieldSource::Categorical { .. }))
            .unwrap();
        assert_eq!(SCHEMA[first_categorical].name, "MS Zoning");
        assert!(SCHEMA[first_categorical..]
            .iter()
            .all(|f| matches!(f.source, FieldSource::Categorical { .. })));
    }

    #[test]
    fn test_derived_field_points_at_user_field() {
        for spec in SCHEMA.iter() {
            if let FieldSource::Derived { from, .. } = spec.source {
                assert!(field(from).unwrap().is_user_field());
            }
        }
    }

    #[test]
    fn test_user_defaults_match_form() {
        assert_eq!(user_default("Lot Area"), Some(9600.0));
        assert_eq!(user_default("Gr Liv Area"), Some(1710.0));
        assert_eq!(user_default("Year Built"), Some(1961.0));
        assert_eq!(user_default("Order"), None);
    }
}
