use crate::error::{ConversionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How converted coordinates are written back into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Keep every original column and append four new ones
    #[default]
    Append,
    /// Overwrite the X and Y cells with Brazilian-format DMS strings
    InPlace,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Append => write!(f, "append"),
            OutputMode::InPlace => write!(f, "in-place"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "append" => Ok(OutputMode::Append),
            "in-place" | "inplace" | "in_place" => Ok(OutputMode::InPlace),
            other => Err(ConversionError::Config(format!(
                "Invalid output mode '{}'. Expected 'append' or 'in-place'",
                other
            ))),
        }
    }
}

/// Rendered coordinates of one successfully converted row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedRow {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub lon_dms: String,
    pub lat_dms: String,
    pub lon_dms_br: String,
    pub lat_dms_br: String,
    pub lon_dec: String,
    pub lat_dec: String,
}

/// Result of processing one data row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Row index 0, never attempted
    Header,
    Converted(ConvertedRow),
    Skipped { reason: String },
}

impl RowOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, RowOutcome::Converted(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RowOutcome::Skipped { .. })
    }

    pub fn converted(&self) -> Option<&ConvertedRow> {
        match self {
            RowOutcome::Converted(row) => Some(row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_mode_parsing() {
        assert_eq!("append".parse::<OutputMode>().unwrap(), OutputMode::Append);
        assert_eq!("In-Place".parse::<OutputMode>().unwrap(), OutputMode::InPlace);
        assert_eq!("inplace".parse::<OutputMode>().unwrap(), OutputMode::InPlace);
        assert!("replace".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_output_mode_display_round_trips() {
        for mode in [OutputMode::Append, OutputMode::InPlace] {
            assert_eq!(mode.to_string().parse::<OutputMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_outcome_predicates() {
        let skipped = RowOutcome::Skipped {
            reason: "empty value".to_string(),
        };
        assert!(skipped.is_skipped());
        assert!(!skipped.is_converted());
        assert!(skipped.converted().is_none());
        assert!(!RowOutcome::Header.is_skipped());
    }
}
