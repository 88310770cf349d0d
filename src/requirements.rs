use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const DEFAULT_WORD_COUNT: u32 = 1500;
pub const DEFAULT_TITLE_LENGTH: u32 = 60;
pub const DEFAULT_DESCRIPTION_LENGTH: u32 = 160;
pub const DEFAULT_H1_TARGET: u32 = 1;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    pub const ALL: [HeadingLevel; 6] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
        HeadingLevel::H6,
    ];

    pub fn depth(self) -> usize {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
            Self::H5 => 5,
            Self::H6 => 6,
        }
    }

    pub fn from_depth(depth: usize) -> Option<Self> {
        Self::ALL.get(depth.checked_sub(1)?).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::H3 => "H3",
            Self::H4 => "H4",
            Self::H5 => "H5",
            Self::H6 => "H6",
        }
    }

    pub fn tuning_key(self) -> &'static str {
        match self {
            Self::H1 => "Number of H1 tags",
            Self::H2 => "Number of H2 tags",
            Self::H3 => "Number of H3 tags",
            Self::H4 => "Number of H4 tags",
            Self::H5 => "Number of H5 tags",
            Self::H6 => "Number of H6 tags",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct HeadingTally {
    levels: [u32; 6],
}

impl HeadingTally {
    pub fn new(levels: [u32; 6]) -> Self {
        Self { levels }
    }

    pub fn default_targets() -> Self {
        Self::new([DEFAULT_H1_TARGET, 0, 0, 0, 0, 0])
    }

    pub fn get(&self, level: HeadingLevel) -> u32 {
        self.levels[level.depth() - 1]
    }

    pub fn set(&mut self, level: HeadingLevel, value: u32) {
        self.levels[level.depth() - 1] = value;
    }

    pub fn total(&self) -> u32 {
        self.levels.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HeadingLevel, u32)> + '_ {
        HeadingLevel::ALL
            .iter()
            .map(move |level| (*level, self.get(*level)))
    }

    pub fn levels_meeting(&self, targets: &HeadingTally) -> usize {
        self.iter()
            .filter(|(level, count)| *count >= targets.get(*level))
            .count()
    }
}

impl Serialize for HeadingTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for (level, value) in self.iter() {
            map.serialize_entry(level.as_str(), &value)?;
        }
        map.serialize_entry("total", &self.total())?;
        map.end()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequirementModel {
    pub primary_keyword: String,
    pub variations: Vec<String>,
    pub lsi_keywords: IndexMap<String, u32>,
    pub entities: Vec<String>,
    pub custom_entities: Vec<String>,
    #[serde(rename = "heading_structure")]
    pub heading_targets: HeadingTally,
    #[serde(rename = "heading_tags")]
    pub heading_tag_target: u32,
    #[serde(rename = "word_count")]
    pub word_count_target: u32,
    #[serde(rename = "images")]
    pub image_target: u32,
    #[serde(rename = "title_length")]
    pub title_length_target: u32,
    #[serde(rename = "description_length")]
    pub description_length_target: u32,
    #[serde(rename = "roadmap_requirements")]
    pub supplementary_requirements: IndexMap<String, u32>,
}

impl Default for RequirementModel {
    fn default() -> Self {
        Self {
            primary_keyword: String::new(),
            variations: Vec::new(),
            lsi_keywords: IndexMap::new(),
            entities: Vec::new(),
            custom_entities: Vec::new(),
            heading_targets: HeadingTally::default_targets(),
            heading_tag_target: 0,
            word_count_target: DEFAULT_WORD_COUNT,
            image_target: 0,
            title_length_target: DEFAULT_TITLE_LENGTH,
            description_length_target: DEFAULT_DESCRIPTION_LENGTH,
            supplementary_requirements: IndexMap::new(),
        }
    }
}

impl RequirementModel {
    pub fn insert_lsi_keyword(&mut self, keyword: &str, target: u32) {
        let normalized = normalize_phrase(keyword);
        let existing = self
            .lsi_keywords
            .keys()
            .position(|key| normalize_phrase(key) == normalized);

        match existing {
            Some(index) => {
                self.lsi_keywords.shift_remove_index(index);
                self.lsi_keywords
                    .shift_insert(index, keyword.to_string(), target);
            }
            None => {
                self.lsi_keywords.insert(keyword.to_string(), target);
            }
        }
    }

    pub fn merged_entities(&self) -> Vec<String> {
        let mut merged = Vec::with_capacity(self.custom_entities.len() + self.entities.len());
        for entity in self.custom_entities.iter().chain(self.entities.iter()) {
            if !merged.contains(entity) {
                merged.push(entity.clone());
            }
        }
        merged
    }

    pub fn with_overrides(&self, overrides: &RequirementOverrides) -> Self {
        let mut model = self.clone();
        for level in HeadingLevel::ALL {
            if let Some(value) = overrides.heading_target(level) {
                model.heading_targets.set(level, value);
            }
        }
        if let Some(custom_entities) = &overrides.custom_entities {
            model.custom_entities = custom_entities.clone();
        }
        if let Some(word_count) = overrides.word_count_target {
            model.word_count_target = word_count;
        }
        model
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequirementOverrides {
    pub heading_targets: [Option<u32>; 6],
    pub custom_entities: Option<Vec<String>>,
    pub word_count_target: Option<u32>,
}

impl RequirementOverrides {
    pub fn set_heading_target(&mut self, level: HeadingLevel, value: u32) {
        self.heading_targets[level.depth() - 1] = Some(value);
    }

    pub fn heading_target(&self, level: HeadingLevel) -> Option<u32> {
        self.heading_targets[level.depth() - 1]
    }

    pub fn is_empty(&self) -> bool {
        self.heading_targets.iter().all(Option::is_none)
            && self.custom_entities.is_none()
            && self.word_count_target.is_none()
    }
}

pub fn normalize_phrase(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_entities_put_custom_first_without_repeats() {
        let model = RequirementModel {
            entities: vec!["A".to_string(), "B".to_string()],
            custom_entities: vec!["B".to_string(), "C".to_string()],
            ..RequirementModel::default()
        };
        assert_eq!(model.merged_entities(), vec!["B", "C", "A"]);
    }

    #[test]
    fn merged_entities_dedup_is_exact_match_only() {
        let model = RequirementModel {
            entities: vec!["roofing".to_string(), "Roofing".to_string()],
            custom_entities: vec!["roofing".to_string()],
            ..RequirementModel::default()
        };
        assert_eq!(model.merged_entities(), vec!["roofing", "Roofing"]);
    }

    #[test]
    fn defaults_match_documented_targets() {
        let model = RequirementModel::default();
        assert_eq!(model.word_count_target, 1500);
        assert_eq!(model.title_length_target, 60);
        assert_eq!(model.description_length_target, 160);
        assert_eq!(model.heading_targets.get(HeadingLevel::H1), 1);
        assert_eq!(model.heading_targets.get(HeadingLevel::H4), 0);
        assert_eq!(model.heading_targets.total(), 1);
    }

    #[test]
    fn lsi_insert_replaces_normalized_duplicate_in_place() {
        let mut model = RequirementModel::default();
        model.insert_lsi_keyword("shingles", 4);
        model.insert_lsi_keyword("Hardwood", 2);
        model.insert_lsi_keyword("gutters", 1);
        model.insert_lsi_keyword(" hardwood ", 7);

        let keys = model.lsi_keywords.keys().cloned().collect::<Vec<String>>();
        assert_eq!(keys, vec!["shingles", " hardwood ", "gutters"]);
        assert_eq!(model.lsi_keywords.get(" hardwood "), Some(&7));
    }

    #[test]
    fn overrides_replace_only_supplied_fields() {
        let base = RequirementModel {
            heading_targets: HeadingTally::new([1, 4, 8, 0, 0, 0]),
            custom_entities: vec!["old".to_string()],
            word_count_target: 1200,
            ..RequirementModel::default()
        };

        let mut overrides = RequirementOverrides::default();
        assert!(overrides.is_empty());
        overrides.set_heading_target(HeadingLevel::H2, 6);
        overrides.custom_entities = Some(vec!["new".to_string()]);

        let merged = base.with_overrides(&overrides);
        assert_eq!(merged.heading_targets, HeadingTally::new([1, 6, 8, 0, 0, 0]));
        assert_eq!(merged.heading_targets.total(), 15);
        assert_eq!(merged.custom_entities, vec!["new"]);
        assert_eq!(merged.word_count_target, 1200);
        assert_eq!(base.heading_targets.get(HeadingLevel::H2), 4);
    }

    #[test]
    fn heading_tally_serializes_levels_and_total() {
        let tally = HeadingTally::new([1, 2, 3, 0, 0, 0]);
        let value = serde_json::to_value(tally).expect("serialize tally");
        assert_eq!(value["H2"], 2);
        assert_eq!(value["total"], 6);
    }

    #[test]
    fn levels_meeting_compares_each_level_to_its_target() {
        let targets = HeadingTally::new([1, 2, 0, 0, 0, 0]);
        assert_eq!(HeadingTally::new([1, 1, 0, 0, 0, 0]).levels_meeting(&targets), 5);
        assert_eq!(HeadingTally::new([1, 3, 0, 0, 0, 0]).levels_meeting(&targets), 6);
        assert_eq!(HeadingTally::new([0, 0, 0, 0, 0, 0]).levels_meeting(&targets), 4);
    }
}
