use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryWithoutMegacity {
    pub country_code: String,
    pub country_name: String,
}

impl CountryWithoutMegacity {
    pub fn new(country_code: impl Into<String>, country_name: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            country_name: country_name.into(),
        }
    }

    /// Build from one `(country_code, country_name_en)` result row
    pub fn from_values(values: &[Value]) -> Result<Self> {
        match values {
            [code, name, ..] => Ok(Self::new(value_to_text(code), value_to_text(name))),
            _ => Err(PipelineError::Store(rusqlite::Error::InvalidColumnIndex(
                values.len(),
            ))),
        }
    }

    pub fn as_record(&self) -> [&str; 2] {
        [&self.country_code, &self.country_name]
    }
}

/// Render a SQLite value the way it would appear in a text report.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}
