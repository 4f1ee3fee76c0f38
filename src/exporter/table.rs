//! Flatten place records into spreadsheet rows.
//!
//! Column layout:
//!   name, place_id, address, latitude, longitude, rating
//!   raw.<path>...   first-seen order across all inputs
//!   source_file     when enabled
//!
//! Nested raw objects are flattened with `.` separators. Arrays are kept as
//! compact JSON text in a single cell. When two different field paths flatten
//! to the same name (`{"a.b": 1}` and `{"a": {"b": 2}}`), the later one gets a
//! `#2`, `#3`... suffix so neither value is lost.

use super::LoadedFile;
use crate::domain::PlaceRecord;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

pub const BASE_COLUMNS: [&str; 6] = [
    "name",
    "place_id",
    "address",
    "latitude",
    "longitude",
    "rating",
];
pub const RAW_PREFIX: &str = "raw";
pub const SOURCE_COLUMN: &str = "source_file";

/// A single spreadsheet cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => n
                .as_f64()
                .map(Cell::Number)
                .unwrap_or_else(|| Cell::Text(n.to_string())),
            Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// One place record projected onto the table's columns
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetRow {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<SpreadsheetRow>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Vec<&Cell> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().map(|r| &r.cells[idx]).collect(),
            None => Vec::new(),
        }
    }
}

/// Build one table covering every input, file order then record order.
///
/// No deduplication: a place present in two files yields two rows.
pub fn build_table(inputs: &[LoadedFile], include_source: bool) -> Table {
    let mut raw_columns: Vec<String> = Vec::new();
    let mut raw_index: HashMap<Vec<String>, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();

    // Pass 1: flatten raw fields and register columns in first-seen order.
    let mut flattened = Vec::new();
    for input in inputs {
        for place in &input.results {
            let mut fields = Vec::new();
            for (key, value) in &place.raw {
                flatten_value(vec![key.clone()], value, &mut fields);
            }

            let mut positioned = Vec::with_capacity(fields.len());
            for (path, cell) in fields {
                let idx = match raw_index.get(&path) {
                    Some(&idx) => idx,
                    None => {
                        let name = column_name(&path, &taken);
                        taken.insert(name.clone());
                        raw_columns.push(name);
                        raw_index.insert(path, raw_columns.len() - 1);
                        raw_columns.len() - 1
                    }
                };
                positioned.push((idx, cell));
            }
            flattened.push((place, positioned, input.stem.as_str()));
        }
    }

    let mut columns: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(raw_columns.iter().cloned());
    if include_source {
        columns.push(SOURCE_COLUMN.to_string());
    }

    // Pass 2: lay every record out across the full column set.
    let rows = flattened
        .into_iter()
        .map(|(place, raw_cells, source)| {
            let mut cells = base_cells(place);
            let mut raw = vec![Cell::Empty; raw_columns.len()];
            for (idx, cell) in raw_cells {
                raw[idx] = cell;
            }
            cells.extend(raw);
            if include_source {
                cells.push(Cell::Text(source.to_string()));
            }
            SpreadsheetRow { cells }
        })
        .collect();

    Table { columns, rows }
}

fn base_cells(place: &PlaceRecord) -> Vec<Cell> {
    vec![
        Cell::Text(place.name.clone()),
        Cell::Text(place.place_id.clone()),
        place.address.clone().map(Cell::Text).unwrap_or(Cell::Empty),
        Cell::Number(place.latitude),
        Cell::Number(place.longitude),
        place.rating.map(Cell::Number).unwrap_or(Cell::Empty),
    ]
}

/// `raw.<dotted path>`, suffixed when another field path already owns that name
fn column_name(path: &[String], taken: &HashSet<String>) -> String {
    let base = format!("{}.{}", RAW_PREFIX, path.join("."));
    if !taken.contains(&base) {
        return base;
    }
    let name = (2..)
        .map(|n| format!("{}#{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_default();
    log::warn!(
        "Field path {:?} collides with column {}; writing it as {}",
        path,
        base,
        name
    );
    name
}

fn flatten_value(path: Vec<String>, value: &Value, out: &mut Vec<(Vec<String>, Cell)>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let mut nested_path = path.clone();
                nested_path.push(key.clone());
                flatten_value(nested_path, nested, out);
            }
        }
        other => out.push((path, Cell::from(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResultSet;
    use serde_json::json;
    use std::path::PathBuf;

    fn file(stem: &str, places: Vec<PlaceRecord>) -> LoadedFile {
        LoadedFile {
            path: PathBuf::from(format!("{}.json", stem)),
            stem: stem.to_string(),
            results: ResultSet::new(places),
        }
    }

    #[test]
    fn test_base_columns_and_cells() {
        let inputs = vec![file(
            "nyc",
            vec![
                PlaceRecord::new("p1", "Pizza A", (40.7, -74.0))
                    .with_address("1 Main St")
                    .with_rating(4.5),
            ],
        )];

        let table = build_table(&inputs, false);
        assert_eq!(table.columns, BASE_COLUMNS.to_vec());
        assert_eq!(
            table.rows[0].cells,
            vec![
                Cell::Text("Pizza A".to_string()),
                Cell::Text("p1".to_string()),
                Cell::Text("1 Main St".to_string()),
                Cell::Number(40.7),
                Cell::Number(-74.0),
                Cell::Number(4.5),
            ]
        );
    }

    #[test]
    fn test_file_then_record_order_without_dedup() {
        let inputs = vec![
            file(
                "first",
                vec![
                    PlaceRecord::new("p1", "A", (0.0, 0.0)),
                    PlaceRecord::new("p2", "B", (0.0, 0.0)),
                ],
            ),
            file("second", vec![PlaceRecord::new("p1", "A", (0.0, 0.0))]),
        ];

        let table = build_table(&inputs, true);
        let ids: Vec<&str> = table
            .column("place_id")
            .into_iter()
            .filter_map(Cell::as_text)
            .collect();
        assert_eq!(ids, vec!["p1", "p2", "p1"]);

        let sources: Vec<&str> = table
            .column(SOURCE_COLUMN)
            .into_iter()
            .filter_map(Cell::as_text)
            .collect();
        assert_eq!(sources, vec!["first", "first", "second"]);
        assert_eq!(table.columns.last().unwrap(), SOURCE_COLUMN);
    }

    #[test]
    fn test_raw_fields_flattened_in_first_seen_order() {
        let inputs = vec![
            file(
                "a",
                vec![
                    PlaceRecord::new("p1", "A", (0.0, 0.0))
                        .with_raw("user_ratings_total", json!(12))
                        .with_raw("opening_hours", json!({"open_now": true}))
                        .with_raw("types", json!(["cafe", "food"])),
                ],
            ),
            file(
                "b",
                vec![
                    PlaceRecord::new("p2", "B", (0.0, 0.0))
                        .with_raw("price_level", json!(2))
                        .with_raw("user_ratings_total", Value::Null),
                ],
            ),
        ];

        let table = build_table(&inputs, false);
        assert_eq!(
            &table.columns[BASE_COLUMNS.len()..],
            &[
                "raw.user_ratings_total",
                "raw.opening_hours.open_now",
                "raw.types",
                "raw.price_level"
            ]
        );

        let first = &table.rows[0].cells[BASE_COLUMNS.len()..];
        assert_eq!(
            first,
            &[
                Cell::Number(12.0),
                Cell::Bool(true),
                Cell::Text(r#"["cafe","food"]"#.to_string()),
                Cell::Empty,
            ]
        );

        let second = &table.rows[1].cells[BASE_COLUMNS.len()..];
        assert_eq!(
            second,
            &[Cell::Empty, Cell::Empty, Cell::Empty, Cell::Number(2.0)]
        );
    }

    #[test]
    fn test_colliding_paths_keep_both_values() {
        let inputs = vec![file(
            "a",
            vec![
                PlaceRecord::new("p1", "A", (0.0, 0.0))
                    .with_raw("a.b", json!(1))
                    .with_raw("a", json!({"b": 2})),
                PlaceRecord::new("p2", "B", (0.0, 0.0)).with_raw("a", json!({"b": 3})),
            ],
        )];

        let table = build_table(&inputs, false);
        assert_eq!(&table.columns[BASE_COLUMNS.len()..], &["raw.a.b", "raw.a.b#2"]);
        assert_eq!(
            &table.rows[0].cells[BASE_COLUMNS.len()..],
            &[Cell::Number(1.0), Cell::Number(2.0)]
        );
        assert_eq!(
            &table.rows[1].cells[BASE_COLUMNS.len()..],
            &[Cell::Empty, Cell::Number(3.0)]
        );
    }

    #[test]
    fn test_every_row_spans_all_columns() {
        let inputs = vec![file(
            "a",
            vec![
                PlaceRecord::new("p1", "A", (0.0, 0.0)).with_raw("x", json!(1)),
                PlaceRecord::new("p2", "B", (0.0, 0.0)).with_raw("y", json!("z")),
            ],
        )];

        let table = build_table(&inputs, true);
        assert!(table.rows.iter().all(|r| r.cells.len() == table.columns.len()));
    }
}
