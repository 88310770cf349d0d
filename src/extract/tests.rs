use super::*;
use crate::requirements::{HeadingLevel, HeadingTally};
use crate::workbook::Cell;

fn text(value: &str) -> Cell {
    Cell::from(value)
}

fn blank_rows(count: usize) -> Vec<Vec<Cell>> {
    vec![Vec::new(); count]
}

fn tuning_row(code: &str, value: Cell) -> Vec<Cell> {
    vec![Cell::Empty, text(code), text("label"), Cell::Empty, value]
}

fn roadmap_sheet() -> Sheet {
    Sheet::new(
        ROADMAP_SHEET,
        vec![
            vec![text("Variations")],
            vec![text("roof replacement, \"new roof\", 'roofers' ,  , reroofing")],
            vec![text("phase 1: Title & Headings")],
            vec![text("Internal links"), text("Add 4 more internal links")],
            vec![text("Number of H2 tags"), text("Target: 12")],
            vec![text("Keyword in title"), text("At least 7")],
            vec![text("Free-text advice"), text("no number here")],
            vec![text("Empty amount"), Cell::Empty],
            vec![text("Phase 5: Schema")],
            vec![text("Images with alt"), Cell::Int(3)],
            vec![text("Phase 6: Links")],
            vec![text("Outside the phase"), text("Add 9 more")],
        ],
    )
}

fn tunings_sheet() -> Sheet {
    Sheet::new(
        TUNINGS_SHEET,
        vec![
            vec![text("Primary keyword"), text("  roof replacement  ")],
            tuning_row("CP492", Cell::Float(1834.6)),
            tuning_row("CPXR004", Cell::Int(1)),
            tuning_row("CPXR005", text(" 4 ")),
            tuning_row("CPXR006", text("about 8")),
            tuning_row("CP426", Cell::Int(3)),
            tuning_row("CPXR003", Cell::Int(11)),
            tuning_row("CP480", Cell::Int(0)),
        ],
    )
}

fn lsi_sheet() -> Sheet {
    let mut rows = blank_rows(6);
    rows.push(vec![text("shingles"), Cell::Float(2.0), Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty, Cell::Float(1.2)]);
    rows.push(vec![text("underlayment"), Cell::Float(1.5), Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty, Cell::Float(3.7)]);
    rows.push(vec![text("flashing"), Cell::Float(0.5), Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty]);
    rows.push(vec![text("bad average"), text("n/a"), Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty, Cell::Float(9.0)]);
    rows.push(vec![text("bad ranking"), Cell::Float(1.0), Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty, text("high")]);
    rows.push(vec![text("gutters"), Cell::Float(1.0), Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty, Cell::Float(1.2)]);
    Sheet::new("LSI Keywords (Top 50)", rows)
}

fn entity_sheet(name: &str, header_rows: usize, entities: &[&str]) -> Sheet {
    let mut rows = blank_rows(header_rows);
    rows.extend(entities.iter().map(|entity| vec![text(entity)]));
    Sheet::new(name, rows)
}

fn full_workbook() -> Workbook {
    Workbook::new(vec![
        roadmap_sheet(),
        tunings_sheet(),
        lsi_sheet(),
        entity_sheet(ENTITIES_SHEET, 3, &["  asphalt shingles ", "Garden Grove", "   ", "HOA"]),
        entity_sheet(CUSTOM_ENTITIES_SHEET, 1, &["Garden Grove", "Acme Roofing"]),
    ])
}

fn extractor() -> RequirementExtractor {
    RequirementExtractor::new().expect("extractor patterns compile")
}

#[test]
fn roadmap_amounts_follow_fallback_precedence() {
    let patterns = RoadmapPatterns::new().expect("patterns compile");
    assert_eq!(patterns.parse_amount("Add 4 more internal links"), Some(4));
    assert_eq!(patterns.parse_amount("Target: 12"), Some(12));
    assert_eq!(patterns.parse_amount("At least 7"), Some(7));
    assert_eq!(patterns.parse_amount("use 3 of them = 5 total"), Some(5));
    assert_eq!(patterns.parse_amount("between 2 and 6 times per page"), Some(2));
    assert_eq!(patterns.parse_amount("no number here"), None);
}

#[test]
fn phase_range_stops_at_next_boundary_but_not_phase_five() {
    let patterns = RoadmapPatterns::new().expect("patterns compile");
    let range = patterns
        .locate_phase_range(&roadmap_sheet())
        .expect("phase 1 marker present");
    assert_eq!(range.first_row, 4);
    assert_eq!(range.end_row, 11);
    assert_eq!(range.end_marker.as_deref(), Some("Phase 6: Links"));
}

#[test]
fn phase_range_runs_to_last_row_without_end_marker() {
    let patterns = RoadmapPatterns::new().expect("patterns compile");
    let sheet = Sheet::new(
        ROADMAP_SHEET,
        vec![
            vec![text("Phase  1 - Title")],
            vec![text("Word count"), text("= 900")],
            vec![text("Phase 5 notes"), text("Add 2 more")],
        ],
    );
    let range = patterns.locate_phase_range(&sheet).expect("marker present");
    assert_eq!(range.first_row, 2);
    assert_eq!(range.end_row, 4);
    assert!(range.end_marker.is_none());

    let unmarked = Sheet::new(ROADMAP_SHEET, vec![vec![text("Phase 10")]]);
    assert!(patterns.locate_phase_range(&unmarked).is_none());
}

#[test]
fn roadmap_rows_become_supplementary_requirements() {
    let extraction = extractor().extract(&full_workbook());
    let requirements = &extraction.requirements.supplementary_requirements;

    assert_eq!(requirements.get("Internal links"), Some(&4));
    assert_eq!(requirements.get("Number of H2 tags"), Some(&12));
    assert_eq!(requirements.get("Keyword in title"), Some(&7));
    assert_eq!(requirements.get("Images with alt"), Some(&3));
    assert!(!requirements.contains_key("Free-text advice"));
    assert!(!requirements.contains_key("Empty amount"));
    assert!(!requirements.contains_key("Outside the phase"));

    assert_eq!(
        extraction.diagnostics.warnings,
        vec![ExtractWarning::MalformedRequirementRow {
            row: 7,
            text: "no number here".to_string(),
        }]
    );
    assert_eq!(extraction.diagnostics.roadmap_rows_parsed, 4);
}

#[test]
fn variations_are_split_and_unquoted() {
    let extraction = extractor().extract(&full_workbook());
    assert_eq!(
        extraction.requirements.variations,
        vec!["roof replacement", "new roof", "roofers", "reroofing"]
    );
}

#[test]
fn cell_accessor_reads_value_column_for_first_matching_code() {
    let sheet = Sheet::new(
        TUNINGS_SHEET,
        vec![
            tuning_row("CP492", Cell::Int(900)),
            tuning_row("CP492", Cell::Int(1200)),
            tuning_row("CP426", Cell::Int(-2)),
            tuning_row("CPXR005", text("4 headings")),
        ],
    );
    assert_eq!(lookup_value(&sheet, "CP492", 1500), 900);
    assert_eq!(lookup_value(&sheet, "CP426", 5), 0);
    assert_eq!(lookup_value(&sheet, "CPXR005", 0), 0);
    assert_eq!(lookup_value(&sheet, "CPXR009", 2), 2);
    assert_eq!(lookup_value(&sheet, "cp492", 1500), 1500);
}

#[test]
fn tunings_populate_targets_with_defaults_for_missing_codes() {
    let model = extractor().extract(&full_workbook()).requirements;

    assert_eq!(model.primary_keyword, "roof replacement");
    assert_eq!(model.word_count_target, 1834);
    assert_eq!(model.heading_targets, HeadingTally::new([1, 4, 0, 0, 0, 0]));
    assert_eq!(model.heading_tag_target, 11);
    assert_eq!(model.image_target, 3);
    // A zero value cell counts as absent.
    assert_eq!(model.title_length_target, 60);
    assert_eq!(model.description_length_target, 160);
}

#[test]
fn lsi_keywords_are_ranked_by_raw_ranking_value() {
    let extraction = extractor().extract(&full_workbook());
    let lsi = &extraction.requirements.lsi_keywords;

    let order = lsi.keys().cloned().collect::<Vec<String>>();
    assert_eq!(order, vec!["underlayment", "shingles", "gutters", "flashing"]);
    assert_eq!(lsi["underlayment"], 4);
    assert_eq!(lsi["shingles"], 2);
    assert_eq!(lsi["flashing"], 1);
    assert_eq!(extraction.diagnostics.lsi_rows_read, 4);
    assert_eq!(extraction.diagnostics.lsi_rows_skipped, 2);
}

#[test]
fn entity_sheets_are_read_in_row_order() {
    let extraction = extractor().extract(&full_workbook());
    let model = &extraction.requirements;

    assert_eq!(model.entities, vec!["asphalt shingles", "Garden Grove", "HOA"]);
    assert_eq!(model.custom_entities, vec!["Garden Grove", "Acme Roofing"]);
    assert_eq!(
        model.merged_entities(),
        vec!["Garden Grove", "Acme Roofing", "asphalt shingles", "HOA"]
    );
    assert_eq!(extraction.diagnostics.entity_rows_read, 3);
    assert_eq!(extraction.diagnostics.custom_entity_rows_read, 2);
}

#[test]
fn empty_workbook_degrades_to_defaults() {
    let extraction = extractor().extract(&Workbook::default());
    assert_eq!(extraction.requirements, RequirementModel::default());
    assert_eq!(
        extraction.requirements.heading_targets.get(HeadingLevel::H1),
        1
    );

    let missing = extraction
        .diagnostics
        .warnings
        .iter()
        .filter(|warning| matches!(warning, ExtractWarning::MissingSheet { .. }))
        .count();
    assert_eq!(missing, 4);
}

#[test]
fn unreadable_file_is_the_only_extraction_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing.xlsx");
    let err = extractor()
        .extract_path(&path)
        .expect_err("missing file must fail");
    assert!(matches!(err, ExtractError::DocumentUnreadable { .. }));
}
