use tracing::debug;

use super::ExtractionDiagnostics;
use crate::requirements::RequirementModel;
use crate::workbook::Sheet;

const VARIATIONS_CELL: &str = "A2";

pub(super) const LSI_FIRST_ROW: usize = 7;
const LSI_KEYWORD_COLUMN: usize = 1;
const LSI_AVERAGE_COLUMN: usize = 2;
const LSI_RANKING_COLUMN: usize = 7;

pub(super) const ENTITY_FIRST_ROW: usize = 4;
pub(super) const CUSTOM_ENTITY_FIRST_ROW: usize = 2;

pub(super) fn is_lsi_sheet(name: &str) -> bool {
    name.contains("LSI") && name.contains("Keywords")
}

pub(super) fn read_variations(sheet: &Sheet) -> Vec<String> {
    let Some(raw) = sheet.cell_at(VARIATIONS_CELL).as_text() else {
        return Vec::new();
    };

    raw.split(',')
        .map(|variation| variation.trim_matches([' ', '"', '\'']))
        .filter(|variation| !variation.trim().is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

struct LsiRow {
    keyword: String,
    target: u32,
    ranking: f64,
}

pub(super) fn read_lsi_keywords(
    sheet: &Sheet,
    model: &mut RequirementModel,
    diagnostics: &mut ExtractionDiagnostics,
) {
    let mut rows = Vec::<LsiRow>::new();

    for row in LSI_FIRST_ROW..=sheet.max_row() {
        let keyword = sheet.cell(row, LSI_KEYWORD_COLUMN);
        let average = sheet.cell(row, LSI_AVERAGE_COLUMN);
        if !keyword.is_present() || !average.is_present() {
            continue;
        }

        let ranking_cell = sheet.cell(row, LSI_RANKING_COLUMN);
        let ranking = if ranking_cell.is_present() {
            ranking_cell.as_f64()
        } else {
            Some(0.0)
        };

        let (Some(_average), Some(ranking), Some(keyword)) =
            (average.as_f64(), ranking, keyword.as_text())
        else {
            diagnostics.lsi_rows_skipped += 1;
            continue;
        };

        let target = if ranking > 0.0 {
            ranking.ceil() as u32
        } else {
            1
        };
        rows.push(LsiRow {
            keyword,
            target,
            ranking,
        });
    }

    // Stable: equal rankings keep sheet order.
    rows.sort_by(|left, right| right.ranking.total_cmp(&left.ranking));

    diagnostics.lsi_rows_read = rows.len();
    for row in rows {
        model.insert_lsi_keyword(&row.keyword, row.target);
    }

    debug!(
        sheet = %sheet.name(),
        keywords = model.lsi_keywords.len(),
        skipped = diagnostics.lsi_rows_skipped,
        "read lsi keywords"
    );
}

pub(super) fn read_entity_column(sheet: &Sheet, first_row: usize) -> Vec<String> {
    (first_row..=sheet.max_row())
        .map(|row| sheet.cell(row, 1))
        .filter(|cell| cell.is_present())
        .filter_map(|cell| cell.as_text())
        .map(|entity| entity.trim().to_string())
        .filter(|entity| !entity.is_empty())
        .collect()
}
