use crate::error::Result;
use crate::models::CountryWithoutMegacity;
use crate::utils::constants::{REPORT_DELIMITER, REPORT_HEADER};
use csv::{Terminator, WriterBuilder};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Writes tab-separated text files with a header row.
pub struct TsvWriter {
    delimiter: u8,
    terminator: Terminator,
}

impl TsvWriter {
    pub fn new() -> Self {
        Self {
            delimiter: REPORT_DELIMITER,
            terminator: platform_terminator(),
        }
    }

    pub fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Write `header` followed by every row, replacing any existing file.
    /// Returns the number of data rows written.
    pub fn write_rows<I, R, F>(&self, path: &Path, header: &[&str], rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = F>,
        F: AsRef<[u8]>,
    {
        let file = File::create(path)?;
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(self.terminator)
            .flexible(true)
            .from_writer(BufWriter::new(file));

        writer.write_record(header)?;

        let mut written = 0;
        for row in rows {
            writer.write_record(row)?;
            written += 1;
        }

        writer.flush()?;
        Ok(written)
    }

    /// Write the countries-without-megacity report.
    pub fn write_countries(&self, path: &Path, countries: &[CountryWithoutMegacity]) -> Result<usize> {
        self.write_rows(path, &REPORT_HEADER, countries.iter().map(|c| c.as_record()))
    }
}

impl Default for TsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn platform_terminator() -> Terminator {
    if cfg!(windows) {
        Terminator::CRLF
    } else {
        Terminator::Any(b'\n')
    }
}
