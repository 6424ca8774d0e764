use crate::error::{PipelineError, Result};
use crate::models::CityRecord;
use crate::utils::constants::{FEED_COLUMN_COUNT, FEED_DELIMITER};
use csv::{ReaderBuilder, StringRecord};

/// Turns semicolon-delimited feed text into [`CityRecord`]s.
pub struct RecordParser;

impl RecordParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a whole feed body.
    ///
    /// The first line is a header and is dropped without looking at it,
    /// even when it is blank. A body without any line at all is an error.
    /// Parsing stops at the first malformed record.
    pub fn parse_feed(&self, text: &str) -> Result<Vec<CityRecord>> {
        if text.is_empty() {
            return Err(PipelineError::parse(1, "feed has no header line"));
        }
        let body = text.split_once('\n').map(|(_, rest)| rest).unwrap_or("");

        let mut reader = ReaderBuilder::new()
            .delimiter(FEED_DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_reader(body.as_bytes());

        let mut records = Vec::new();
        let mut row = StringRecord::new();

        // Line numbers are reported against the full feed, header included
        while reader
            .read_record(&mut row)
            .map_err(|e| csv_to_parse_error(e, 1))?
        {
            let line = row.position().map(|p| p.line() + 1).unwrap_or(0);
            let fields: Vec<&str> = row.iter().collect();
            records.push(Self::parse_fields(&fields, line)?);
        }

        Ok(records)
    }

    /// Parse a single raw feed line (no header handling).
    pub fn parse_line(&self, line: &str) -> Result<CityRecord> {
        let mut reader = ReaderBuilder::new()
            .delimiter(FEED_DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());

        let mut row = StringRecord::new();
        if !reader
            .read_record(&mut row)
            .map_err(|e| csv_to_parse_error(e, 0))?
        {
            return Err(PipelineError::parse(1, "empty record"));
        }

        let fields: Vec<&str> = row.iter().collect();
        Self::parse_fields(&fields, 1)
    }

    /// Map positional fields onto a [`CityRecord`].
    ///
    /// Columns 0, 13 and 15 are integers; every other column is copied
    /// verbatim. Fields past the 20th are ignored.
    pub fn parse_fields(fields: &[&str], line: u64) -> Result<CityRecord> {
        if fields.len() < FEED_COLUMN_COUNT {
            return Err(PipelineError::parse(
                line,
                format!(
                    "expected {} fields, found {}",
                    FEED_COLUMN_COUNT,
                    fields.len()
                ),
            ));
        }

        let text = |i: usize| fields[i].to_string();

        Ok(CityRecord {
            geoname_id: parse_integer(fields[0], "geoname_id", line)?,
            name: text(1),
            ascii_name: text(2),
            alternate_names: text(3),
            feature_class: text(4),
            feature_code: text(5),
            country_code: text(6),
            country_name_en: text(7),
            country_code_2: text(8),
            admin1_code: text(9),
            admin2_code: text(10),
            admin3_code: text(11),
            admin4_code: text(12),
            population: parse_integer(fields[13], "population", line)?,
            elevation: text(14),
            digital_elevation_model: parse_integer(fields[15], "digital_elevation_model", line)?,
            timezone: text(16),
            modification_date: text(17),
            label_en: text(18),
            coordinates: text(19),
        })
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_integer(value: &str, column: &str, line: u64) -> Result<i64> {
    // Surrounding whitespace is tolerated, nothing else
    value.trim().parse::<i64>().map_err(|_| {
        PipelineError::parse(line, format!("invalid integer for {}: '{}'", column, value))
    })
}

fn csv_to_parse_error(err: csv::Error, line_offset: u64) -> PipelineError {
    let line = err.position().map(|p| p.line() + line_offset).unwrap_or(0);
    PipelineError::parse(line, err.to_string())
}
