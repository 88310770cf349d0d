use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use tracing::{debug, warn};

use crate::error::ExtractError;

static EMPTY_CELL: Cell = Cell::Empty;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::Int(value) => Cell::Int(*value),
            Data::Float(value) => Cell::Float(*value),
            Data::String(value) => Cell::Text(value.clone()),
            Data::Bool(value) => Cell::Bool(*value),
            other => Cell::Text(other.to_string()),
        }
    }

    pub fn is_present(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Int(value) => *value != 0,
            Cell::Float(value) => *value != 0.0,
            Cell::Text(value) => !value.is_empty(),
            Cell::Bool(value) => *value,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Int(value) => Some(value.to_string()),
            Cell::Float(value) if value.fract() == 0.0 => Some(format!("{value:.0}")),
            Cell::Float(value) => Some(value.to_string()),
            Cell::Text(value) => Some(value.clone()),
            Cell::Bool(value) => Some(if *value { "TRUE" } else { "FALSE" }.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(value) => Some(*value as f64),
            Cell::Float(value) => Some(*value),
            Cell::Text(value) => value.trim().parse::<f64>().ok(),
            Cell::Empty | Cell::Bool(_) => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    fn from_range(name: String, range: &Range<Data>) -> Self {
        // calamine ranges start at the first used cell, not at A1.
        let (row_offset, column_offset) = range
            .start()
            .map(|(row, column)| (row as usize, column as usize))
            .unwrap_or((0, 0));

        let mut rows = vec![Vec::new(); row_offset];
        for row in range.rows() {
            let mut cells = vec![Cell::Empty; column_offset];
            cells.extend(row.iter().map(Cell::from_data));
            rows.push(cells);
        }

        Self { name, rows }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_row(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        if row == 0 || column == 0 {
            return &EMPTY_CELL;
        }
        self.rows
            .get(row - 1)
            .and_then(|cells| cells.get(column - 1))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn cell_at(&self, reference: &str) -> &Cell {
        match parse_cell_reference(reference) {
            Some((row, column)) => self.cell(row, column),
            None => &EMPTY_CELL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let mut reader =
            open_workbook_auto(path).map_err(|err| ExtractError::DocumentUnreadable {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;

        let names = reader.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            match reader.worksheet_range(&name) {
                Ok(range) => {
                    let sheet = Sheet::from_range(name, &range);
                    debug!(sheet = %sheet.name(), rows = sheet.max_row(), "loaded sheet");
                    sheets.push(sheet);
                }
                Err(err) => {
                    warn!(sheet = %name, error = %err, "skipping unreadable sheet");
                }
            }
        }

        Ok(Self { sheets })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets
            .iter()
            .map(|sheet| sheet.name.clone())
            .collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn find_sheet(&self, predicate: impl Fn(&str) -> bool) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| predicate(&sheet.name))
    }
}

fn parse_cell_reference(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.trim();
    let split_at = reference.find(|character: char| character.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split_at);
    if letters.is_empty() || !letters.chars().all(|character| character.is_ascii_alphabetic()) {
        return None;
    }

    let column = letters.chars().fold(0_usize, |acc, character| {
        acc * 26 + (character.to_ascii_uppercase() as usize - 'A' as usize + 1)
    });
    let row = digits.parse::<usize>().ok()?;

    Some((row, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sheet() -> Sheet {
        Sheet::new(
            "Basic Tunings",
            vec![
                vec![Cell::from("Keyword"), Cell::from(" roof replacement ")],
                vec![Cell::Empty, Cell::from("CP492"), Cell::Empty, Cell::Empty, Cell::from(1800_i64)],
            ],
        )
    }

    #[test]
    fn cell_access_is_one_indexed_and_total() {
        let sheet = sample_sheet();
        assert_eq!(sheet.cell(1, 1), &Cell::from("Keyword"));
        assert_eq!(sheet.cell(2, 5), &Cell::Int(1800));
        assert_eq!(sheet.cell(0, 1), &Cell::Empty);
        assert_eq!(sheet.cell(9, 9), &Cell::Empty);
    }

    #[test]
    fn a1_references_resolve_rows_and_columns() {
        let sheet = sample_sheet();
        assert_eq!(sheet.cell_at("B1"), &Cell::from(" roof replacement "));
        assert_eq!(sheet.cell_at("E2"), &Cell::Int(1800));
        assert_eq!(sheet.cell_at("2B"), &Cell::Empty);
        assert_eq!(parse_cell_reference("AA10"), Some((10, 27)));
    }

    #[test]
    fn ranges_not_starting_at_a1_keep_their_addresses() {
        let mut range = Range::new((2, 1), (3, 4));
        range.set_value((2, 1), Data::String("x".to_string()));
        range.set_value((3, 4), Data::Int(7));

        let sheet = Sheet::from_range("Offset".to_string(), &range);
        assert_eq!(sheet.cell_at("B3"), &Cell::from("x"));
        assert_eq!(sheet.cell_at("E4"), &Cell::Int(7));
        assert_eq!(sheet.cell(1, 1), &Cell::Empty);
        assert_eq!(sheet.cell(3, 1), &Cell::Empty);
        assert_eq!(sheet.max_row(), 4);
    }

    #[test]
    fn presence_follows_spreadsheet_truthiness() {
        assert!(!Cell::Empty.is_present());
        assert!(!Cell::from("").is_present());
        assert!(!Cell::Int(0).is_present());
        assert!(Cell::Float(0.5).is_present());
        assert!(Cell::from("x").is_present());
    }

    #[test]
    fn text_rendering_drops_integral_float_fraction() {
        assert_eq!(Cell::Float(12.0).as_text().as_deref(), Some("12"));
        assert_eq!(Cell::Float(1.5).as_text().as_deref(), Some("1.5"));
        assert_eq!(Cell::from(" 3.25 ").as_f64(), Some(3.25));
    }

    #[test]
    fn opening_a_non_workbook_is_document_unreadable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").expect("write fixture");

        let err = Workbook::open(&path).expect_err("garbage must not parse");
        assert!(matches!(err, ExtractError::DocumentUnreadable { .. }));
    }

    #[test]
    fn sheets_are_found_by_exact_name_or_predicate() {
        let workbook = Workbook::new(vec![
            Sheet::new("Roadmap", Vec::new()),
            Sheet::new("LSI Keywords (Top)", Vec::new()),
        ]);
        assert!(workbook.sheet("Roadmap").is_some());
        assert!(workbook.sheet("roadmap").is_none());
        let lsi = workbook.find_sheet(|name| name.contains("LSI") && name.contains("Keywords"));
        assert_eq!(lsi.map(Sheet::name), Some("LSI Keywords (Top)"));
    }
}
