use crate::config::{ErrorPolicy, Settings};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "megacity-report")]
#[command(about = "Load the GeoNames city feed into SQLite and list countries without a megacity")]
#[command(version)]
pub struct Cli {
    #[arg(
        short,
        long,
        help = "Configuration file (TOML) [default: megacity-report.toml if present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Feed URL (semicolon-delimited export)")]
    pub source_url: Option<String>,

    #[arg(long, help = "SQLite database file [default: city_data.db]")]
    pub database: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Report file path [default: countries_without_megapolises.txt]"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Log file path [default: country_query.log]")]
    pub log_file: Option<PathBuf>,

    #[arg(long, help = "Population at which a city counts as a megacity")]
    pub threshold: Option<i64>,

    #[arg(long, help = "Stop at the first failing stage and exit non-zero")]
    pub strict: bool,
}

impl Cli {
    /// Command line flags take precedence over file and environment settings.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(url) = &self.source_url {
            settings.source_url = url.clone();
        }
        if let Some(path) = &self.database {
            settings.database_path = path.clone();
        }
        if let Some(path) = &self.output {
            settings.output_path = path.clone();
        }
        if let Some(path) = &self.log_file {
            settings.log_file = path.clone();
        }
        if let Some(threshold) = self.threshold {
            settings.megacity_threshold = threshold;
        }
        if self.strict {
            settings.error_policy = ErrorPolicy::Propagate;
        }
    }
}
