use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::clean::{CleanedContent, ContentCleaner};
use crate::error::RequirementsError;
use crate::matcher::PhraseMatcher;
use crate::report::{ComplianceReport, LsiUsage, PhraseUsage, density};
use crate::requirements::{HeadingLevel, HeadingTally, RequirementModel, normalize_phrase};

mod score;

pub use score::{ENTITIES, HEADING_STRUCTURE, LSI_KEYWORDS, PRIMARY_KEYWORD, WORD_COUNT};

#[derive(Debug)]
pub struct ComplianceAnalyzer {
    cleaner: ContentCleaner,
    headings: Vec<(HeadingLevel, Regex)>,
    image: Regex,
    matcher: PhraseMatcher,
}

impl ComplianceAnalyzer {
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_matcher(PhraseMatcher::new())
    }

    pub fn with_matcher(matcher: PhraseMatcher) -> Result<Self, regex::Error> {
        let headings = HeadingLevel::ALL
            .iter()
            .map(|level| {
                let pattern = format!("(?m)^#{{{}}} ", level.depth());
                Regex::new(&pattern).map(|regex| (*level, regex))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            cleaner: ContentCleaner::new()?,
            headings,
            image: Regex::new(r"!\[.*?\]\(.*?\)")?,
            matcher,
        })
    }

    pub fn matcher(&self) -> &PhraseMatcher {
        &self.matcher
    }

    pub fn analyze_payload(
        &self,
        content: &str,
        payload: &Value,
    ) -> Result<ComplianceReport, RequirementsError> {
        let requirements = RequirementModel::from_value(payload)?;
        Ok(self.analyze(content, &requirements))
    }

    pub fn analyze(&self, content: &str, requirements: &RequirementModel) -> ComplianceReport {
        let cleaned = self.cleaner.clean(content);
        let word_count = cleaned.word_count();
        let word_count_target = requirements.word_count_target;
        let word_count_met = word_count >= word_count_target as usize;

        let entities = requirements.merged_entities();
        let phrases = requirements
            .variations
            .iter()
            .chain(requirements.lsi_keywords.keys())
            .chain(entities.iter())
            .map(String::as_str)
            .collect::<Vec<&str>>();
        let delimited = self.matcher.count_phrases(&cleaned.raw_text, &phrases);
        let phrase_count = |phrase: &str| {
            let normalized = normalize_phrase(phrase);
            let substring = delimited.get(&normalized).copied().unwrap_or(0);
            substring.max(boundary_count(&cleaned.raw_text, &normalized))
        };

        let primary_keyword = normalize_phrase(&requirements.primary_keyword);
        let primary_keyword_count = self.primary_keyword_count(&cleaned, &primary_keyword);

        let mut variations = IndexMap::new();
        for variation in &requirements.variations {
            let count = phrase_count(variation);
            variations.insert(
                variation.clone(),
                PhraseUsage {
                    count,
                    density: density(count, word_count),
                    met: count > 0,
                },
            );
        }
        let total_variation_count = variations.values().map(|usage| usage.count).sum();

        let mut lsi_keywords = IndexMap::new();
        for (keyword, target) in &requirements.lsi_keywords {
            let count = phrase_count(keyword);
            lsi_keywords.insert(
                keyword.clone(),
                LsiUsage {
                    count,
                    target: *target,
                    met: count >= *target as usize,
                    density: density(count, word_count),
                },
            );
        }
        let total_lsi_count = lsi_keywords.values().map(|usage| usage.count).sum();

        let mut entity_usage = IndexMap::new();
        for entity in &entities {
            let count = phrase_count(entity);
            entity_usage.insert(
                entity.clone(),
                PhraseUsage {
                    count,
                    density: density(count, word_count),
                    met: count > 0,
                },
            );
        }
        let total_entity_count = entity_usage.values().map(|usage| usage.count).sum();

        let heading_counts = self.count_headings(content);
        let heading_targets = requirements.heading_targets;
        let heading_levels_met = heading_counts.levels_meeting(&heading_targets);

        let image_count = self.image.find_iter(content).count();
        let image_target = requirements.image_target;

        let mut report = ComplianceReport {
            word_count,
            word_count_target,
            word_count_met,
            primary_keyword: requirements.primary_keyword.clone(),
            primary_keyword_count,
            primary_keyword_density: density(primary_keyword_count, word_count),
            variations,
            total_variation_count,
            total_variation_density: density(total_variation_count, word_count),
            lsi_keywords,
            total_lsi_count,
            total_lsi_density: density(total_lsi_count, word_count),
            entities: entity_usage,
            total_entity_count,
            total_entity_density: density(total_entity_count, word_count),
            heading_counts,
            heading_targets,
            heading_levels_met,
            image_count,
            image_target,
            images_met: image_count >= image_target as usize,
            score: 0,
            score_breakdown: Vec::new(),
        };

        let inputs = score::ScoreInputs {
            word_count,
            word_count_target,
            word_count_met,
            primary_keyword_count,
            heading_levels_met,
            lsi_met: report.lsi_keywords_met(),
            lsi_total: report.lsi_keywords.len(),
            entities_met: report.entities_met(),
            entities_total: report.entities.len(),
        };
        report.score_breakdown = score::score_breakdown(&inputs);
        report.score = score::total(&report.score_breakdown);

        info!(
            score = report.score,
            word_count,
            word_count_target,
            primary_keyword_count,
            headings_met = heading_levels_met,
            strategy = self.matcher.strategy_name(),
            "analyzed content"
        );
        report
    }

    fn primary_keyword_count(&self, cleaned: &CleanedContent, keyword: &str) -> usize {
        if keyword.is_empty() {
            return 0;
        }

        let substring = self
            .matcher
            .count_phrases(&cleaned.raw_text, std::slice::from_ref(&keyword))
            .get(keyword)
            .copied()
            .unwrap_or(0);
        let boundary = boundary_count(&cleaned.raw_text, keyword);
        let tokens = if keyword.contains(' ') {
            0
        } else {
            cleaned.token_frequency(keyword)
        };

        debug!(keyword, substring, boundary, tokens, "primary keyword counts");
        substring.max(boundary).max(tokens)
    }

    fn count_headings(&self, content: &str) -> HeadingTally {
        let mut counts = HeadingTally::default();
        for (level, pattern) in &self.headings {
            let found = pattern.find_iter(content).count();
            counts.set(*level, u32::try_from(found).unwrap_or(u32::MAX));
        }
        counts
    }
}

fn boundary_count(text: &str, phrase: &str) -> usize {
    if phrase.is_empty() {
        return 0;
    }
    let pattern = format!(r"\b{}\b", regex::escape(phrase));
    match Regex::new(&pattern) {
        Ok(regex) => regex.find_iter(text).count(),
        Err(err) => {
            debug!(phrase, error = %err, "boundary pattern rejected");
            0
        }
    }
}
