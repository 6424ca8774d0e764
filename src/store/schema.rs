//! Table layout of the city store.

pub const TABLE: &str = "city_data";

/// Created only when absent. No primary key and no unique index:
/// ingesting the same feed twice keeps both copies.
pub const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS city_data (
    geoname_id INTEGER,
    name TEXT,
    ascii_name TEXT,
    alternate_names TEXT,
    feature_class TEXT,
    feature_code TEXT,
    country_code TEXT,
    country_name_en TEXT,
    country_code_2 TEXT,
    admin1_code TEXT,
    admin2_code TEXT,
    admin3_code TEXT,
    admin4_code TEXT,
    population INTEGER,
    elevation TEXT,
    digital_elevation_model INTEGER,
    timezone TEXT,
    modification_date TEXT,
    label_en TEXT,
    coordinates TEXT
)";

pub const INSERT_ROW: &str = "INSERT INTO city_data VALUES \
    (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)";

pub const SELECT_ALL: &str = "SELECT * FROM city_data";

pub const COUNT_ROWS: &str = "SELECT COUNT(*) FROM city_data";
