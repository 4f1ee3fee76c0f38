//! Combine result set files into one spreadsheet.
//!
//! Every input is parsed before anything is written, so a bad file fails
//! the export without leaving a partial workbook behind.

pub mod discover;
pub mod table;
pub mod xlsx;

use crate::domain::ResultSet;
use crate::domain::result_set::write_atomically;
use crate::error::{PlacesError, Result};
use std::path::{Path, PathBuf};

pub use discover::discover_json_files;
pub use table::{Cell, SpreadsheetRow, Table, build_table};
pub use xlsx::render_xlsx;

/// A parsed input file
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    /// File name without extension, used for the source column
    pub stem: String,
    pub results: ResultSet,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Append a `source_file` column naming each row's input file
    pub source_column: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            source_column: true,
        }
    }
}

/// What an export produced
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub output: PathBuf,
    /// (file stem, row count) per input, in discovery order
    pub files: Vec<(String, usize)>,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Discover and parse every result set file in `dir`.
///
/// Fails with `NoInput` when there are none and with `Schema` on the first
/// file that does not parse.
pub fn load_inputs(dir: &Path) -> Result<Vec<LoadedFile>> {
    let paths = discover_json_files(dir)?;
    if paths.is_empty() {
        return Err(PlacesError::NoInput(dir.to_path_buf()));
    }

    let mut inputs = Vec::with_capacity(paths.len());
    for path in paths {
        let results = ResultSet::read_from(&path)?;
        log::debug!("Loaded {} places from {}", results.len(), path.display());
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        inputs.push(LoadedFile {
            path,
            stem,
            results,
        });
    }
    Ok(inputs)
}

/// Export every result set in `dir` into one workbook at `output`.
pub fn export(dir: &Path, output: &Path, options: &ExportOptions) -> Result<ExportSummary> {
    let inputs = load_inputs(dir)?;
    export_loaded(&inputs, output, options)
}

/// Write already loaded inputs to `output`, replacing any existing file.
pub fn export_loaded(
    inputs: &[LoadedFile],
    output: &Path,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let table = build_table(inputs, options.source_column);
    export_table(inputs, &table, output)
}

/// Write a table already built from `inputs` to `output`.
pub fn export_table(inputs: &[LoadedFile], table: &Table, output: &Path) -> Result<ExportSummary> {
    let bytes = render_xlsx(table)?;
    write_atomically(output, &bytes)?;

    log::info!(
        "Wrote {} rows x {} columns to {}",
        table.rows.len(),
        table.columns.len(),
        output.display()
    );

    Ok(ExportSummary {
        output: output.to_path_buf(),
        files: inputs
            .iter()
            .map(|f| (f.stem.clone(), f.results.len()))
            .collect(),
        rows: table.rows.len(),
        columns: table.columns.clone(),
    })
}
