use super::table::{Cell, Table};
use crate::error::{PlacesError, Result};
use rust_xlsxwriter::Workbook;

pub const SHEET_NAME: &str = "Places";

/// Worksheet limits of the xlsx format
pub const MAX_ROWS: usize = 1_048_576;
pub const MAX_COLUMNS: usize = 16_384;
/// Characters a single cell can hold
pub const MAX_CELL_CHARS: usize = 32_767;

/// Render the table as a single-sheet workbook, header row first.
///
/// Empty cells are left unwritten. No styling is applied. Text longer than
/// a cell can hold is cut at `MAX_CELL_CHARS` with a warning.
pub fn render_xlsx(table: &Table) -> Result<Vec<u8>> {
    // One row is taken by the header.
    if table.rows.len() + 1 > MAX_ROWS {
        return Err(PlacesError::Spreadsheet(format!(
            "{} rows exceed the worksheet limit of {}",
            table.rows.len(),
            MAX_ROWS - 1
        )));
    }
    if table.columns.len() > MAX_COLUMNS {
        return Err(PlacesError::Spreadsheet(format!(
            "{} columns exceed the worksheet limit of {}",
            table.columns.len(),
            MAX_COLUMNS
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, name.as_str())?;
    }

    for (idx, row) in table.rows.iter().enumerate() {
        let row_num = (idx + 1) as u32;
        for (col, cell) in row.cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    let text = fit_cell(s);
                    if text.len() < s.len() {
                        log::warn!(
                            "Truncated {} in row {} to {} characters",
                            table.columns[col as usize],
                            row_num,
                            MAX_CELL_CHARS
                        );
                    }
                    worksheet.write_string(row_num, col, text)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row_num, col, *n)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn fit_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::table::SpreadsheetRow;

    #[test]
    fn test_render_produces_zip_container() {
        let table = Table {
            columns: vec!["name".to_string(), "rating".to_string()],
            rows: vec![SpreadsheetRow {
                cells: vec![Cell::Text("Pizza A".to_string()), Cell::Number(4.5)],
            }],
        };

        let bytes = render_xlsx(&table).unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_oversized_text_is_truncated() {
        let long = "é".repeat(MAX_CELL_CHARS + 5_000);
        assert_eq!(fit_cell(&long).chars().count(), MAX_CELL_CHARS);
        assert_eq!(fit_cell("short"), "short");

        let table = Table {
            columns: vec!["raw.photos".to_string()],
            rows: vec![SpreadsheetRow {
                cells: vec![Cell::Text("x".repeat(40_000))],
            }],
        };
        let bytes = render_xlsx(&table).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_too_many_columns() {
        let table = Table {
            columns: (0..=MAX_COLUMNS).map(|i| format!("c{}", i)).collect(),
            rows: Vec::new(),
        };

        let err = render_xlsx(&table).unwrap_err();
        assert!(matches!(err, PlacesError::Spreadsheet(_)));
    }
}
