use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ExtractError, ExtractWarning};
use crate::requirements::RequirementModel;
use crate::workbook::{Sheet, Workbook};

mod keywords;
mod roadmap;
#[cfg(test)]
mod tests;
mod tunings;

pub use roadmap::{PhaseRange, RoadmapPatterns};
pub use tunings::{CODE_COLUMN, TUNING_CODES, Tuning, TuningField, VALUE_COLUMN, lookup_value};

pub const ROADMAP_SHEET: &str = "Roadmap";
pub const TUNINGS_SHEET: &str = "Basic Tunings";
pub const ENTITIES_SHEET: &str = "Entities";
pub const CUSTOM_ENTITIES_SHEET: &str = "Custom Entities";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionDiagnostics {
    pub sheets_found: Vec<String>,
    pub phase_range: Option<PhaseRange>,
    pub roadmap_rows_parsed: usize,
    pub lsi_rows_read: usize,
    pub lsi_rows_skipped: usize,
    pub entity_rows_read: usize,
    pub custom_entity_rows_read: usize,
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractionDiagnostics {
    fn missing_sheet(&mut self, name: &str) {
        debug!(sheet = name, "optional sheet missing");
        self.warnings.push(ExtractWarning::MissingSheet {
            name: name.to_string(),
        });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub requirements: RequirementModel,
    pub diagnostics: ExtractionDiagnostics,
}

#[derive(Debug)]
pub struct RequirementExtractor {
    roadmap: RoadmapPatterns,
}

impl RequirementExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            roadmap: RoadmapPatterns::new()?,
        })
    }

    pub fn extract_path(&self, path: &Path) -> Result<Extraction, ExtractError> {
        info!(path = %path.display(), "reading audit workbook");
        let workbook = Workbook::open(path)?;
        Ok(self.extract(&workbook))
    }

    pub fn extract(&self, workbook: &Workbook) -> Extraction {
        let mut model = RequirementModel::default();
        let mut diagnostics = ExtractionDiagnostics {
            sheets_found: workbook.sheet_names(),
            ..ExtractionDiagnostics::default()
        };

        match workbook.sheet(ROADMAP_SHEET) {
            Some(sheet) => {
                model.variations = keywords::read_variations(sheet);
                self.read_roadmap(sheet, &mut model, &mut diagnostics);
            }
            None => diagnostics.missing_sheet(ROADMAP_SHEET),
        }

        match workbook.sheet(TUNINGS_SHEET) {
            Some(sheet) => tunings::apply_tunings(sheet, &mut model),
            None => diagnostics.missing_sheet(TUNINGS_SHEET),
        }

        match workbook.find_sheet(keywords::is_lsi_sheet) {
            Some(sheet) => keywords::read_lsi_keywords(sheet, &mut model, &mut diagnostics),
            None => diagnostics.missing_sheet("LSI Keywords"),
        }

        match workbook.sheet(ENTITIES_SHEET) {
            Some(sheet) => {
                model.entities = keywords::read_entity_column(sheet, keywords::ENTITY_FIRST_ROW);
                diagnostics.entity_rows_read = model.entities.len();
            }
            None => diagnostics.missing_sheet(ENTITIES_SHEET),
        }

        // Custom entities are optional by nature; no diagnostic when absent.
        if let Some(sheet) = workbook.sheet(CUSTOM_ENTITIES_SHEET) {
            model.custom_entities =
                keywords::read_entity_column(sheet, keywords::CUSTOM_ENTITY_FIRST_ROW);
            diagnostics.custom_entity_rows_read = model.custom_entities.len();
        }

        info!(
            primary_keyword = %model.primary_keyword,
            variations = model.variations.len(),
            lsi_keywords = model.lsi_keywords.len(),
            entities = model.entities.len(),
            custom_entities = model.custom_entities.len(),
            roadmap_requirements = model.supplementary_requirements.len(),
            warnings = diagnostics.warnings.len(),
            "extracted requirements"
        );

        Extraction {
            requirements: model,
            diagnostics,
        }
    }

    fn read_roadmap(
        &self,
        sheet: &Sheet,
        model: &mut RequirementModel,
        diagnostics: &mut ExtractionDiagnostics,
    ) {
        let Some(range) = self.roadmap.locate_phase_range(sheet) else {
            debug!(sheet = %sheet.name(), "no phase 1 marker in roadmap");
            return;
        };

        for row in range.first_row..range.end_row {
            let description = sheet.cell(row, 1);
            let amount = sheet.cell(row, 2);
            if !description.is_present() || !amount.is_present() {
                continue;
            }

            let name = description.as_text().unwrap_or_default().trim().to_string();
            let amount_text = amount.as_text().unwrap_or_default().trim().to_string();
            match self.roadmap.parse_amount(&amount_text) {
                Some(value) => {
                    model.supplementary_requirements.insert(name, value);
                    diagnostics.roadmap_rows_parsed += 1;
                }
                None => {
                    warn!(row, text = %amount_text, "no number found in roadmap requirement");
                    diagnostics
                        .warnings
                        .push(ExtractWarning::MalformedRequirementRow {
                            row,
                            text: amount_text,
                        });
                }
            }
        }

        diagnostics.phase_range = Some(range);
    }
}
