use crate::error::Result;
use crate::models::CountryWithoutMegacity;
use crate::store::CityStore;
use crate::utils::constants::MEGACITY_THRESHOLD;
use crate::writers::TsvWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Countries present in the store that have no city at or above `threshold`,
/// ordered by English country name.
pub fn megacity_query(threshold: i64) -> String {
    format!(
        "SELECT DISTINCT country_code, country_name_en
         FROM city_data
         WHERE country_code NOT IN (
             SELECT DISTINCT country_code
             FROM city_data
             WHERE population >= {}
         )
         ORDER BY country_name_en",
        threshold
    )
}

#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub output_path: PathBuf,
    pub countries: usize,
    pub threshold: i64,
}

pub struct ReportGenerator {
    threshold: i64,
    writer: TsvWriter,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            threshold: MEGACITY_THRESHOLD,
            writer: TsvWriter::new(),
        }
    }

    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_writer(mut self, writer: TsvWriter) -> Self {
        self.writer = writer;
        self
    }

    pub fn countries_without_megacities(&self, store: &CityStore) -> Result<Vec<CountryWithoutMegacity>> {
        store
            .try_query(&megacity_query(self.threshold))?
            .iter()
            .map(|row| CountryWithoutMegacity::from_values(row))
            .collect()
    }

    /// Run the aggregation and write the report. When the query fails no
    /// file is created.
    pub fn generate(&self, store: &CityStore, output_path: &Path) -> Result<ReportSummary> {
        let countries = self.countries_without_megacities(store)?;
        debug!(
            "{} countries without a city of {} or more",
            countries.len(),
            self.threshold
        );

        let written = self.writer.write_countries(output_path, &countries)?;

        Ok(ReportSummary {
            output_path: output_path.to_path_buf(),
            countries: written,
            threshold: self.threshold,
        })
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn report_countries_without_megacities(store: &CityStore, output_path: &Path) -> Result<ReportSummary> {
    ReportGenerator::new().generate(store, output_path)
}
