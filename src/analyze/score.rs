use crate::report::{COMPONENT_MAX, ScoreComponent};

pub const WORD_COUNT: &str = "Word Count";
pub const PRIMARY_KEYWORD: &str = "Primary Keyword";
pub const HEADING_STRUCTURE: &str = "Heading Structure";
pub const LSI_KEYWORDS: &str = "LSI Keywords";
pub const ENTITIES: &str = "Entities";

const HEADING_LEVELS: usize = 6;

#[derive(Debug, Clone, Copy)]
pub(super) struct ScoreInputs {
    pub word_count: usize,
    pub word_count_target: u32,
    pub word_count_met: bool,
    pub primary_keyword_count: usize,
    pub heading_levels_met: usize,
    pub lsi_met: usize,
    pub lsi_total: usize,
    pub entities_met: usize,
    pub entities_total: usize,
}

pub(super) fn score_breakdown(inputs: &ScoreInputs) -> Vec<ScoreComponent> {
    let word_count = if inputs.word_count_met || inputs.word_count_target == 0 {
        COMPONENT_MAX
    } else {
        scaled(inputs.word_count, inputs.word_count_target as usize)
    };
    let primary_keyword = if inputs.primary_keyword_count > 0 {
        COMPONENT_MAX
    } else {
        0
    };

    vec![
        component(WORD_COUNT, word_count),
        component(PRIMARY_KEYWORD, primary_keyword),
        component(
            HEADING_STRUCTURE,
            scaled(inputs.heading_levels_met, HEADING_LEVELS),
        ),
        component(LSI_KEYWORDS, share_met(inputs.lsi_met, inputs.lsi_total)),
        component(ENTITIES, share_met(inputs.entities_met, inputs.entities_total)),
    ]
}

pub(super) fn total(components: &[ScoreComponent]) -> u32 {
    components.iter().map(|component| component.earned).sum()
}

fn component(name: &'static str, earned: u32) -> ScoreComponent {
    ScoreComponent {
        name,
        earned,
        max: COMPONENT_MAX,
    }
}

fn share_met(met: usize, total: usize) -> u32 {
    if total == 0 {
        COMPONENT_MAX
    } else {
        scaled(met, total)
    }
}

/// `20 * part / whole`, rounded half to even and capped at 20.
fn scaled(part: usize, whole: usize) -> u32 {
    let ratio = part as f64 / whole as f64;
    let points = (f64::from(COMPONENT_MAX) * ratio).round_ties_even();
    points.clamp(0.0, f64::from(COMPONENT_MAX)) as u32
}
