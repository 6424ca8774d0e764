/// Remote feed of populated places (GeoNames, population > 1000), semicolon delimited
pub const DEFAULT_SOURCE_URL: &str = "https://public.opendatasoft.com/api/explore/v2.1/catalog/datasets/geonames-all-cities-with-a-population-1000/exports/csv?lang=fr&timezone=Europe%2FBerlin&use_labels=true&delimiter=%3B";

/// File names
pub const DEFAULT_DATABASE_FILE: &str = "city_data.db";
pub const DEFAULT_REPORT_FILE: &str = "countries_without_megapolises.txt";
pub const DEFAULT_LOG_FILE: &str = "country_query.log";
pub const DEFAULT_CONFIG_FILE: &str = "megacity-report.toml";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "MEGACITY";

/// Feed layout
pub const FEED_DELIMITER: u8 = b';';
pub const FEED_COLUMN_COUNT: usize = 20;

/// Report layout
pub const REPORT_DELIMITER: u8 = b'\t';
pub const REPORT_HEADER: [&str; 2] = ["Country Code", "Country Name"];

/// A city at or above this population is a megacity
pub const MEGACITY_THRESHOLD: i64 = 10_000_000;
