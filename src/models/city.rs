use serde::{Deserialize, Serialize};

/// One populated place from the feed, in feed column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub geoname_id: i64,
    pub name: String,
    pub ascii_name: String,
    pub alternate_names: String,
    pub feature_class: String,
    pub feature_code: String,
    pub country_code: String,
    pub country_name_en: String,
    pub country_code_2: String,
    pub admin1_code: String,
    pub admin2_code: String,
    pub admin3_code: String,
    pub admin4_code: String,
    pub population: i64,
    /// Kept as raw text; the feed leaves it empty for most places.
    pub elevation: String,
    pub digital_elevation_model: i64,
    pub timezone: String,
    pub modification_date: String,
    pub label_en: String,
    pub coordinates: String,
}
