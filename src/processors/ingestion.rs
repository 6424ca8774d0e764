use crate::error::{PipelineError, Result};
use crate::readers::RecordParser;
use crate::store::CityStore;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Where the raw feed text comes from.
pub trait FeedSource {
    /// Human readable origin, used in log lines.
    fn describe(&self) -> String;

    fn fetch_text(&self) -> Result<String>;
}

/// Fetches the feed with a single blocking HTTP GET.
pub struct HttpFeedSource {
    url: String,
    timeout: Option<Duration>,
    client: Option<Client>,
}

impl HttpFeedSource {
    /// No timeout is set: an unresponsive server blocks the caller.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            client: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a preconfigured client; the timeout setting is then ignored.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }
}

impl FeedSource for HttpFeedSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch_text(&self) -> Result<String> {
        let client = match &self.client {
            Some(client) => client.clone(),
            None => Client::builder().timeout(self.timeout).build()?,
        };
        let response = client.get(&self.url).send()?.error_for_status()?;
        let body = response.bytes()?;
        debug!("received {} bytes from {}", body.len(), self.url);
        decode_utf8(&body)
    }
}

/// A feed that is already in memory.
pub struct TextFeedSource {
    text: String,
}

impl TextFeedSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl FeedSource for TextFeedSource {
    fn describe(&self) -> String {
        format!("in-memory feed ({} bytes)", self.text.len())
    }

    fn fetch_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Strict UTF-8 decoding; a byte order mark is kept as part of the text.
pub fn decode_utf8(bytes: &[u8]) -> Result<String> {
    encoding_rs::UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or(PipelineError::Decode { bytes: bytes.len() })
}

#[derive(Debug, Clone)]
pub struct IngestionSummary {
    pub source: String,
    pub bytes_fetched: usize,
    pub rows_inserted: usize,
}

/// Fetch, parse and store the whole feed in one pass.
pub struct IngestionPipeline<S: FeedSource> {
    source: S,
    parser: RecordParser,
}

impl<S: FeedSource> IngestionPipeline<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            parser: RecordParser::new(),
        }
    }

    /// Every record is parsed before anything is written, then all rows go
    /// in with a single commit. Any failure leaves the store untouched.
    pub fn ingest(&self, store: &mut CityStore) -> Result<IngestionSummary> {
        let source = self.source.describe();
        info!("fetching feed from {}", source);

        let text = self.source.fetch_text()?;
        let records = self.parser.parse_feed(&text)?;
        debug!("parsed {} records", records.len());

        let rows_inserted = store.insert_many(&records)?;

        Ok(IngestionSummary {
            source,
            bytes_fetched: text.len(),
            rows_inserted,
        })
    }
}

/// Ingest the feed published at `source_url` into `store`.
pub fn ingest(source_url: &str, store: &mut CityStore) -> Result<IngestionSummary> {
    IngestionPipeline::new(HttpFeedSource::new(source_url)).ingest(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id;name;ascii;alt;fclass;fcode;cc;country;cc2;a1;a2;a3;a4;pop;elev;dem;tz;mod;label;coords";

    fn row(id: i64, cc: &str, country: &str, population: i64) -> String {
        format!(
            "{id};City {id};City {id};;P;PPL;{cc};{country};;01;;;;{population};;10;Europe/Paris;2024-01-01;{country};1.0, 2.0"
        )
    }

    fn store() -> CityStore {
        let store = CityStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store
    }

    #[test]
    fn test_ingest_inserts_every_record() -> Result<()> {
        let feed = [HEADER.to_string(), row(1, "FR", "France", 500), row(2, "MC", "Monaco", 100)].join("\n");
        let mut store = store();

        let summary = IngestionPipeline::new(TextFeedSource::new(feed)).ingest(&mut store)?;

        assert_eq!(summary.rows_inserted, 2);
        assert_eq!(store.row_count()?, 2);
        Ok(())
    }

    #[test]
    fn test_parse_failure_writes_nothing() {
        let feed = [HEADER.to_string(), row(1, "FR", "France", 500), "2;broken".to_string()].join("\n");
        let mut store = store();

        let err = IngestionPipeline::new(TextFeedSource::new(feed))
            .ingest(&mut store)
            .unwrap_err();

        assert_eq!(err.kind(), "ParseError");
        assert_eq!(store.row_count().unwrap(), 0);
    }

    #[test]
    fn test_empty_feed_is_a_failure() {
        let mut store = store();

        let err = IngestionPipeline::new(TextFeedSource::new(""))
            .ingest(&mut store)
            .unwrap_err();

        assert_eq!(err.kind(), "ParseError");
        assert_eq!(store.row_count().unwrap(), 0);
    }

    #[test]
    fn test_header_only_feed_inserts_nothing() -> Result<()> {
        let mut store = store();
        let summary = IngestionPipeline::new(TextFeedSource::new(HEADER)).ingest(&mut store)?;
        assert_eq!(summary.rows_inserted, 0);
        assert_eq!(summary.bytes_fetched, HEADER.len());
        Ok(())
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let err = decode_utf8(&[b'a', 0xff, b'b']).unwrap_err();
        assert_eq!(err.kind(), "DecodeError");
    }

    #[test]
    fn test_decode_keeps_non_ascii_text() -> Result<()> {
        let text = decode_utf8("Zürich;São Paulo".as_bytes())?;
        assert_eq!(text, "Zürich;São Paulo");
        Ok(())
    }
}
