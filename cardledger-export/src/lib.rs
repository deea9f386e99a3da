//! cardledger-export: CSV output for parsed statements

pub mod csv_export;

pub use csv_export::{CsvExporter, default_filename, with_csv_extension};
