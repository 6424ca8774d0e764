use crate::cli::args::Cli;
use crate::config::{ErrorPolicy, Settings};
use crate::error::{PipelineError, Result};
use crate::logging;
use crate::processors::{FeedSource, HttpFeedSource, IngestionPipeline, ReportGenerator};
use crate::store::CityStore;
use tracing::{error, info};
use validator::Validate;

#[derive(Debug, Clone, Copy)]
enum Stage {
    Connect,
    Schema,
    Ingest,
    Report,
    Close,
}

impl Stage {
    fn failure_message(self, err: &PipelineError) -> &'static str {
        match (self, err) {
            (Stage::Connect, _) => "Error connecting to the database",
            (Stage::Schema, _) => "Error creating the city table",
            (Stage::Ingest, PipelineError::Network(_)) => "Error fetching data from the API",
            (Stage::Ingest, PipelineError::Decode { .. }) => "Error decoding the API response",
            (Stage::Ingest, PipelineError::Parse { .. }) => "Error reading CSV data",
            (Stage::Ingest, _) => "Error storing data in the database",
            (Stage::Report, PipelineError::Store(_)) => "Error executing the query",
            (Stage::Report, _) => "Error saving query results to TXT file",
            (Stage::Close, _) => "Error closing the database",
        }
    }
}

/// Log a failed stage, then either swallow the error or hand it back.
fn settle<T>(policy: ErrorPolicy, stage: Stage, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            error!(kind = e.kind(), "{}: {}", stage.failure_message(&e), e);
            match policy {
                ErrorPolicy::Suppress => Ok(None),
                ErrorPolicy::Propagate => Err(e),
            }
        }
    }
}

/// Settings from file, environment and flags. When those cannot be loaded
/// the built-in defaults are used with the flags applied, and the load
/// error is handed back for logging.
pub fn resolve_settings(cli: &Cli) -> (Settings, Option<PipelineError>) {
    let loaded = Settings::load(cli.config.as_deref()).and_then(|mut settings| {
        cli.apply_to(&mut settings);
        settings.validate()?;
        Ok(settings)
    });

    match loaded {
        Ok(settings) => (settings, None),
        Err(e) => {
            let mut settings = Settings::default();
            cli.apply_to(&mut settings);
            if settings.validate().is_err() {
                settings = Settings {
                    error_policy: settings.error_policy,
                    ..Settings::default()
                };
            }
            (settings, Some(e))
        }
    }
}

/// Nothing is written to the console: without a usable log file the run
/// proceeds unlogged.
pub fn run(cli: Cli) -> Result<()> {
    let (settings, config_error) = resolve_settings(&cli);

    let _ = logging::init_file_logging(&settings.log_file);

    if let Some(e) = config_error {
        error!(kind = e.kind(), "Error loading configuration, using defaults: {}", e);
        if settings.error_policy == ErrorPolicy::Propagate {
            return Err(e);
        }
    }

    let source = HttpFeedSource::new(settings.source_url.clone())
        .with_timeout(settings.request_timeout());

    run_pipeline(&settings, source)
}

/// Open the store, load the feed, write the report, release the store.
///
/// With [`ErrorPolicy::Suppress`] every failure is logged and the call
/// still succeeds. A failed ingestion does not skip the report.
pub fn run_pipeline<S: FeedSource>(settings: &Settings, source: S) -> Result<()> {
    let policy = settings.error_policy;

    let Some(mut store) = settle(
        policy,
        Stage::Connect,
        CityStore::open(&settings.database_path),
    )?
    else {
        return Ok(());
    };

    let outcome = run_stages(settings, source, &mut store);
    let closed = settle(policy, Stage::Close, store.close());

    outcome?;
    closed?;
    Ok(())
}

fn run_stages<S: FeedSource>(settings: &Settings, source: S, store: &mut CityStore) -> Result<()> {
    let policy = settings.error_policy;

    if settle(policy, Stage::Schema, store.ensure_schema())?.is_none() {
        return Ok(());
    }

    let ingested = settle(
        policy,
        Stage::Ingest,
        IngestionPipeline::new(source).ingest(store),
    )?;
    if let Some(summary) = ingested {
        info!(
            source = %summary.source,
            bytes = summary.bytes_fetched,
            rows = summary.rows_inserted,
            "Data fetched and stored successfully!"
        );
    }

    let generator = ReportGenerator::new().with_threshold(settings.megacity_threshold);
    let reported = settle(
        policy,
        Stage::Report,
        generator.generate(store, &settings.output_path),
    )?;
    if let Some(summary) = reported {
        info!(
            countries = summary.countries,
            threshold = summary.threshold,
            "Query results saved to {} successfully!",
            summary.output_path.display()
        );
    }

    Ok(())
}
