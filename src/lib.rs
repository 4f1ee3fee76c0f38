//! nearby-places - Collect points of interest from a places API and export them to a spreadsheet
//!
//! Two independent stages coupled only through JSON files on disk:
//! the collector writes one result set per search, the exporter combines
//! every result set in a directory into a single workbook.

pub mod api;
pub mod cli;
pub mod collector;
pub mod config;
pub mod domain;
pub mod error;
pub mod exporter;
pub mod parser;

pub use collector::{CollectOptions, collect, collect_to_file, collect_with_options};
pub use domain::{ApiKey, PlaceRecord, ResultSet, SearchRequest};
pub use error::{PlacesError, Result};
pub use exporter::{ExportOptions, ExportSummary, export};
