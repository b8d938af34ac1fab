use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;

use crate::error::ReconError;

/// Which headers carry the reconciliation fields, and how timestamps are
/// written. Defaults match the upstream export tool; a TOML file overrides
/// them when the source system renames columns.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    pub columns: ColumnMapping,
    /// chrono format string for `Created On` values.
    pub timestamp_format: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub created_on: String,
    pub parent_id: String,
    pub record_type: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            created_on: "Created On".into(),
            parent_id: "ParentID".into(),
            record_type: "Record Type".into(),
        }
    }
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            // month/day/year, 24h clock, 4-digit year
            timestamp_format: "%m/%d/%Y %H:%M:%S".into(),
        }
    }
}

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for (field, value) in [
            ("columns.created_on", &self.columns.created_on),
            ("columns.parent_id", &self.columns.parent_id),
            ("columns.record_type", &self.columns.record_type),
        ] {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "{field} must not be blank"
                )));
            }
        }

        if self.timestamp_format.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "timestamp_format must not be blank".into(),
            ));
        }

        // A broken specifier (e.g. a trailing '%') would otherwise surface
        // only when a date-typed Excel cell is rendered, as a formatting
        // panic rather than an error.
        let mut items = StrftimeItems::new(&self.timestamp_format);
        if items.any(|item| matches!(item, Item::Error)) {
            return Err(ReconError::ConfigValidation(format!(
                "timestamp_format '{}' is not a valid strftime string",
                self.timestamp_format
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_export_tool() {
        let config = ReconConfig::default();
        assert_eq!(config.columns.created_on, "Created On");
        assert_eq!(config.columns.parent_id, "ParentID");
        assert_eq!(config.columns.record_type, "Record Type");
        assert_eq!(config.timestamp_format, "%m/%d/%Y %H:%M:%S");
    }

    #[test]
    fn parse_partial_override() {
        let config = ReconConfig::from_toml(
            r#"
[columns]
parent_id = "Parent Id"
"#,
        )
        .unwrap();
        assert_eq!(config.columns.parent_id, "Parent Id");
        // untouched fields keep their defaults
        assert_eq!(config.columns.created_on, "Created On");
        assert_eq!(config.timestamp_format, "%m/%d/%Y %H:%M:%S");
    }

    #[test]
    fn parse_timestamp_format_override() {
        let config = ReconConfig::from_toml(r#"timestamp_format = "%Y-%m-%d %H:%M:%S""#).unwrap();
        assert_eq!(config.timestamp_format, "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn reject_blank_column_name() {
        let err = ReconConfig::from_toml(
            r#"
[columns]
created_on = "  "
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("columns.created_on"));
    }

    #[test]
    fn reject_broken_strftime_format() {
        // trailing '%' cannot be parsed or rendered by chrono
        let err = ReconConfig::from_toml(r#"timestamp_format = "%m/%d/%Y %H:%M:%""#).unwrap_err();
        assert!(err.to_string().contains("not a valid strftime string"));
    }

    #[test]
    fn reject_blank_format() {
        let err = ReconConfig::from_toml(r#"timestamp_format = """#).unwrap_err();
        assert!(err.to_string().contains("timestamp_format"));
    }

    #[test]
    fn reject_unparseable_toml() {
        let err = ReconConfig::from_toml("columns = 3").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }
}
