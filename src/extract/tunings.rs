use tracing::debug;

use crate::requirements::{
    DEFAULT_DESCRIPTION_LENGTH, DEFAULT_H1_TARGET, DEFAULT_TITLE_LENGTH, DEFAULT_WORD_COUNT,
    HeadingLevel, RequirementModel,
};
use crate::workbook::{Cell, Sheet};

pub const CODE_COLUMN: usize = 2;
pub const VALUE_COLUMN: usize = 5;

const PRIMARY_KEYWORD_CELL: &str = "B1";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TuningField {
    WordCount,
    Heading(HeadingLevel),
    HeadingTags,
    Images,
    TitleLength,
    DescriptionLength,
}

#[derive(Copy, Clone, Debug)]
pub struct Tuning {
    pub code: &'static str,
    pub field: TuningField,
    pub default: u32,
}

pub const TUNING_CODES: [Tuning; 11] = [
    Tuning { code: "CP492", field: TuningField::WordCount, default: DEFAULT_WORD_COUNT },
    Tuning { code: "CPXR004", field: TuningField::Heading(HeadingLevel::H1), default: DEFAULT_H1_TARGET },
    Tuning { code: "CPXR005", field: TuningField::Heading(HeadingLevel::H2), default: 0 },
    Tuning { code: "CPXR006", field: TuningField::Heading(HeadingLevel::H3), default: 0 },
    Tuning { code: "CPXR007", field: TuningField::Heading(HeadingLevel::H4), default: 0 },
    Tuning { code: "CPXR008", field: TuningField::Heading(HeadingLevel::H5), default: 0 },
    Tuning { code: "CPXR009", field: TuningField::Heading(HeadingLevel::H6), default: 0 },
    Tuning { code: "CP426", field: TuningField::Images, default: 0 },
    Tuning { code: "CPXR003", field: TuningField::HeadingTags, default: 0 },
    Tuning { code: "CP480", field: TuningField::TitleLength, default: DEFAULT_TITLE_LENGTH },
    Tuning { code: "CP380", field: TuningField::DescriptionLength, default: DEFAULT_DESCRIPTION_LENGTH },
];

/// Value column of the first row whose code column equals `code`.
/// Missing codes and non-numeric values read as `default`.
pub fn lookup_value(sheet: &Sheet, code: &str, default: u32) -> u32 {
    let Some(row) = (1..=sheet.max_row()).find(|row| {
        matches!(sheet.cell(*row, CODE_COLUMN), Cell::Text(value) if value == code)
    }) else {
        return default;
    };

    match sheet.cell(row, VALUE_COLUMN) {
        cell if !cell.is_present() => default,
        Cell::Int(value) => u32::try_from((*value).max(0)).unwrap_or(u32::MAX),
        Cell::Float(value) => value.trunc().max(0.0) as u32,
        Cell::Text(value) => {
            let trimmed = value.trim();
            if !trimmed.is_empty() && trimmed.chars().all(|character| character.is_ascii_digit()) {
                trimmed.parse::<u32>().unwrap_or(default)
            } else {
                default
            }
        }
        Cell::Empty | Cell::Bool(_) => default,
    }
}

pub(super) fn apply_tunings(sheet: &Sheet, model: &mut RequirementModel) {
    model.primary_keyword = sheet
        .cell_at(PRIMARY_KEYWORD_CELL)
        .as_text()
        .map(|keyword| keyword.trim().to_string())
        .unwrap_or_default();

    for tuning in TUNING_CODES {
        let value = lookup_value(sheet, tuning.code, tuning.default);
        match tuning.field {
            TuningField::WordCount => model.word_count_target = value,
            TuningField::Heading(level) => model.heading_targets.set(level, value),
            TuningField::HeadingTags => model.heading_tag_target = value,
            TuningField::Images => model.image_target = value,
            TuningField::TitleLength => model.title_length_target = value,
            TuningField::DescriptionLength => model.description_length_target = value,
        }
    }

    debug!(
        sheet = %sheet.name(),
        word_count = model.word_count_target,
        headings = model.heading_targets.total(),
        images = model.image_target,
        "applied basic tunings"
    );
}
