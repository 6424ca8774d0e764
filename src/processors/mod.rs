pub mod ingestion;
pub mod report;

pub use ingestion::{ingest, FeedSource, HttpFeedSource, IngestionPipeline, IngestionSummary, TextFeedSource};
pub use report::{megacity_query, report_countries_without_megacities, ReportGenerator, ReportSummary};
