use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::LedgerError;

/// Current canonical configuration schema.
///
/// v1 covers both historical shapes: a flat document with
/// `profitMarginPercentage`, and a document nesting the monthly amounts under
/// a `fixedCosts` object. v2 is the flattened, multiplier-based form below.
pub const SETTINGS_SCHEMA_VERSION: u32 = 2;

/// Singleton pricing configuration shared by the cost engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub labor_rate: f64,
    pub profit_margin_multiplier: f64,
    pub monthly_rent: f64,
    pub monthly_salaries: f64,
    pub monthly_utilities: f64,
}

fn default_schema_version() -> u32 {
    SETTINGS_SCHEMA_VERSION
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: SETTINGS_SCHEMA_VERSION,
            labor_rate: 150.0,
            profit_margin_multiplier: 3.0,
            monthly_rent: 0.0,
            monthly_salaries: 0.0,
            monthly_utilities: 0.0,
        }
    }
}

impl Settings {
    /// Monthly fixed-cost base used for amortization: rent, salaries, and
    /// utilities combined.
    pub fn monthly_fixed_costs(&self) -> f64 {
        self.monthly_rent + self.monthly_salaries + self.monthly_utilities
    }

    /// Canonicalizes any observed configuration document shape, reporting the
    /// migrations applied. Unknown or missing fields fall back to defaults;
    /// documents from a newer schema are rejected.
    pub fn migrate(value: Value) -> Result<(Self, Vec<String>), LedgerError> {
        let Value::Object(map) = value else {
            return Err(LedgerError::InvalidDocument(
                "configuration document must be a JSON object".into(),
            ));
        };

        if let Some(version) = number(&map, "schemaVersion") {
            let version = version as u32;
            if version > SETTINGS_SCHEMA_VERSION {
                return Err(LedgerError::InvalidDocument(format!(
                    "configuration schema v{} is newer than supported v{}",
                    version, SETTINGS_SCHEMA_VERSION
                )));
            }
        }

        let mut settings = Self::default();
        let mut migrations = Vec::new();

        if let Some(Value::Object(nested)) = map.get("fixedCosts") {
            if let Some(rate) = number(nested, "laborRate") {
                settings.labor_rate = rate;
            }
            if let Some(rent) = number(nested, "monthlyRent") {
                settings.monthly_rent = rent;
            }
            if let Some(salaries) = number(nested, "monthlySalaries") {
                settings.monthly_salaries = salaries;
            }
            if let Some(utilities) = number(nested, "monthlyUtilities") {
                settings.monthly_utilities = utilities;
            }
            migrations.push("flattened legacy `fixedCosts` object into top-level fields".into());
        }

        if let Some(rate) = number(&map, "laborRate") {
            settings.labor_rate = rate;
        }
        if let Some(rent) = number(&map, "monthlyRent") {
            settings.monthly_rent = rent;
        }
        if let Some(salaries) = number(&map, "monthlySalaries") {
            settings.monthly_salaries = salaries;
        }
        if let Some(utilities) = number(&map, "monthlyUtilities") {
            settings.monthly_utilities = utilities;
        }

        if let Some(multiplier) = number(&map, "profitMarginMultiplier") {
            settings.profit_margin_multiplier = multiplier;
        } else if let Some(percentage) = number(&map, "profitMarginPercentage") {
            settings.profit_margin_multiplier = 1.0 + percentage / 100.0;
            migrations.push(format!(
                "converted profitMarginPercentage {} into multiplier {}",
                percentage, settings.profit_margin_multiplier
            ));
        }

        settings.schema_version = SETTINGS_SCHEMA_VERSION;
        Ok((settings, migrations))
    }
}

fn number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key)? {
        Value::Number(value) => value.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn migrates_percentage_variant() {
        let document = json!({
            "laborRate": 150,
            "profitMarginPercentage": 60,
            "version": "1.0"
        });
        let (settings, migrations) = Settings::migrate(document).unwrap();
        assert_eq!(settings.labor_rate, 150.0);
        assert!((settings.profit_margin_multiplier - 1.6).abs() < 1e-9);
        assert_eq!(migrations.len(), 1);
    }

    #[test]
    fn migrates_nested_fixed_costs() {
        let document = json!({
            "fixedCosts": {
                "laborRate": 120,
                "monthlyRent": 1000,
                "monthlySalaries": 2000,
                "monthlyUtilities": 500
            },
            "profitMarginMultiplier": 2.5
        });
        let (settings, migrations) = Settings::migrate(document).unwrap();
        assert_eq!(settings.labor_rate, 120.0);
        assert_eq!(settings.monthly_fixed_costs(), 3500.0);
        assert_eq!(settings.profit_margin_multiplier, 2.5);
        assert!(migrations.iter().any(|note| note.contains("fixedCosts")));
    }

    #[test]
    fn canonical_document_migrates_without_notes() {
        let document = serde_json::to_value(Settings::default()).unwrap();
        let (settings, migrations) = Settings::migrate(document).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(migrations.is_empty());
    }

    #[test]
    fn rejects_newer_schema_versions() {
        let document = json!({ "schemaVersion": 99 });
        let err = Settings::migrate(document).expect_err("future schema should fail");
        match err {
            LedgerError::InvalidDocument(message) => {
                assert!(message.contains("newer"), "unexpected error: {message}");
            }
            other => panic!("expected invalid document error, got {other:?}"),
        }
    }
}
