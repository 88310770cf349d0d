use indexmap::IndexMap;
use serde::Serialize;

use crate::requirements::HeadingTally;

pub const COMPONENT_MAX: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseUsage {
    pub count: usize,
    pub density: f64,
    pub met: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LsiUsage {
    pub count: usize,
    pub target: u32,
    pub met: bool,
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreComponent {
    pub name: &'static str,
    pub earned: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub word_count: usize,
    pub word_count_target: u32,
    pub word_count_met: bool,

    pub primary_keyword: String,
    pub primary_keyword_count: usize,
    pub primary_keyword_density: f64,

    pub variations: IndexMap<String, PhraseUsage>,
    pub total_variation_count: usize,
    pub total_variation_density: f64,

    pub lsi_keywords: IndexMap<String, LsiUsage>,
    pub total_lsi_count: usize,
    pub total_lsi_density: f64,

    pub entities: IndexMap<String, PhraseUsage>,
    pub total_entity_count: usize,
    pub total_entity_density: f64,

    pub heading_counts: HeadingTally,
    pub heading_targets: HeadingTally,
    pub heading_levels_met: usize,

    pub image_count: usize,
    pub image_target: u32,
    pub images_met: bool,

    pub score: u32,
    pub score_breakdown: Vec<ScoreComponent>,
}

impl ComplianceReport {
    pub fn lsi_keywords_met(&self) -> usize {
        self.lsi_keywords.values().filter(|usage| usage.met).count()
    }

    pub fn entities_met(&self) -> usize {
        self.entities.values().filter(|usage| usage.met).count()
    }

    pub fn shortfalls(&self) -> impl Iterator<Item = &ScoreComponent> {
        self.score_breakdown
            .iter()
            .filter(|component| component.earned < component.max)
    }
}

/// Percentage of `count` in `word_count`, rounded to two decimals.
pub fn density(count: usize, word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let percent = count as f64 / word_count as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_is_a_two_decimal_percentage() {
        assert_eq!(density(2, 1000), 0.2);
        assert_eq!(density(1, 3), 33.33);
        assert_eq!(density(5, 0), 0.0);
    }
}
