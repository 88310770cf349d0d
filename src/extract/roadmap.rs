use regex::Regex;
use serde::Serialize;

use crate::workbook::Sheet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseRange {
    pub first_row: usize,
    pub end_row: usize,
    pub end_marker: Option<String>,
}

#[derive(Debug)]
pub struct RoadmapPatterns {
    phase_start: Regex,
    phase_end: Regex,
    add_more: Regex,
    assignment: Regex,
    trailing_digits: Regex,
    any_digits: Regex,
}

impl RoadmapPatterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            phase_start: Regex::new(r"(?i)Phase\s+1\b")?,
            // Report numbering has no usable phase 5 boundary.
            phase_end: Regex::new(r"(?i)Phase\s+(?:2|3|4|6|7|8|9|10)\b")?,
            add_more: Regex::new(r"(?i)Add\s+(\d+)\s+more")?,
            assignment: Regex::new(r"[:=]\s*(\d+)")?,
            trailing_digits: Regex::new(r"(\d+)\s*$")?,
            any_digits: Regex::new(r"(\d+)")?,
        })
    }

    pub fn locate_phase_range(&self, sheet: &Sheet) -> Option<PhaseRange> {
        let max_row = sheet.max_row();
        let marker_row = (1..=max_row).find(|row| {
            first_column_text(sheet, *row)
                .map(|text| self.phase_start.is_match(&text))
                .unwrap_or(false)
        })?;

        let first_row = marker_row + 1;
        let end = (first_row..=max_row).find_map(|row| {
            first_column_text(sheet, row)
                .filter(|text| self.phase_end.is_match(text))
                .map(|text| (row, text))
        });

        Some(match end {
            Some((row, marker)) => PhaseRange {
                first_row,
                end_row: row,
                end_marker: Some(marker),
            },
            None => PhaseRange {
                first_row,
                end_row: max_row + 1,
                end_marker: None,
            },
        })
    }

    pub fn parse_amount(&self, text: &str) -> Option<u32> {
        [
            &self.add_more,
            &self.assignment,
            &self.trailing_digits,
            &self.any_digits,
        ]
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(text)
                .and_then(|captures| captures.get(1))
                .and_then(|digits| digits.as_str().parse::<u32>().ok())
        })
    }
}

fn first_column_text(sheet: &Sheet, row: usize) -> Option<String> {
    let cell = sheet.cell(row, 1);
    if !cell.is_present() {
        return None;
    }
    cell.as_text().map(|text| text.trim().to_string())
}
