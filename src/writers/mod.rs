pub mod tsv_writer;

pub use tsv_writer::TsvWriter;
