use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{RequirementsError, json_kind};
use crate::requirements::{
    DEFAULT_DESCRIPTION_LENGTH, DEFAULT_H1_TARGET, DEFAULT_TITLE_LENGTH, DEFAULT_WORD_COUNT,
    HeadingLevel, HeadingTally, RequirementModel,
};

#[derive(Debug)]
pub struct TargetRule {
    pub field: &'static str,
    pub sources: &'static [&'static [&'static str]],
    pub default: u32,
}

pub const HEADING_RULES: [TargetRule; 6] = [
    TargetRule {
        field: "H1",
        sources: &[
            &["Number of H1 tags"],
            &["requirements", "Number of H1 tags"],
            &["heading_structure", "H1"],
            &["headings", "h1"],
        ],
        default: DEFAULT_H1_TARGET,
    },
    TargetRule {
        field: "H2",
        sources: &[
            &["Number of H2 tags"],
            &["requirements", "Number of H2 tags"],
            &["heading_structure", "H2"],
            &["headings", "h2"],
        ],
        default: 0,
    },
    TargetRule {
        field: "H3",
        sources: &[
            &["Number of H3 tags"],
            &["requirements", "Number of H3 tags"],
            &["heading_structure", "H3"],
            &["headings", "h3"],
        ],
        default: 0,
    },
    TargetRule {
        field: "H4",
        sources: &[
            &["Number of H4 tags"],
            &["requirements", "Number of H4 tags"],
            &["heading_structure", "H4"],
            &["headings", "h4"],
        ],
        default: 0,
    },
    TargetRule {
        field: "H5",
        sources: &[
            &["Number of H5 tags"],
            &["requirements", "Number of H5 tags"],
            &["heading_structure", "H5"],
            &["headings", "h5"],
        ],
        default: 0,
    },
    TargetRule {
        field: "H6",
        sources: &[
            &["Number of H6 tags"],
            &["requirements", "Number of H6 tags"],
            &["heading_structure", "H6"],
            &["headings", "h6"],
        ],
        default: 0,
    },
];

pub const WORD_COUNT_RULE: TargetRule = TargetRule {
    field: "word_count",
    sources: &[
        &["word_count"],
        &["Word Count"],
        &["basic_tunings", "Word Count"],
    ],
    default: DEFAULT_WORD_COUNT,
};

pub const IMAGE_RULE: TargetRule = TargetRule {
    field: "images",
    sources: &[
        &["images"],
        &["Number of Images"],
        &["basic_tunings", "Number of Images"],
    ],
    default: 0,
};

pub const HEADING_TAGS_RULE: TargetRule = TargetRule {
    field: "heading_tags",
    sources: &[
        &["heading_tags"],
        &["Number of heading tags"],
        &["basic_tunings", "Number of heading tags"],
    ],
    default: 0,
};

pub const TITLE_LENGTH_RULE: TargetRule = TargetRule {
    field: "title_length",
    sources: &[
        &["title_length"],
        &["Title Length"],
        &["roadmap_requirements", "Title Length"],
    ],
    default: DEFAULT_TITLE_LENGTH,
};

pub const DESCRIPTION_LENGTH_RULE: TargetRule = TargetRule {
    field: "description_length",
    sources: &[
        &["description_length"],
        &["Description Length"],
        &["roadmap_requirements", "Description Length"],
    ],
    default: DEFAULT_DESCRIPTION_LENGTH,
};

const PRIMARY_KEYWORD_SOURCES: &[&[&str]] =
    &[&["primary_keyword"], &["basic_tunings", "primary_keyword"]];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LsiTarget {
    Count(u32),
    Structured {
        #[serde(default)]
        count: Option<u32>,
    },
    Other(Value),
}

impl LsiTarget {
    pub fn resolve(&self) -> u32 {
        match self {
            LsiTarget::Count(count) => *count,
            LsiTarget::Structured { count } => count.unwrap_or(1),
            LsiTarget::Other(_) => 1,
        }
    }
}

impl TargetRule {
    /// First present source wins; absent everywhere yields the default.
    pub fn resolve(&self, payload: &Map<String, Value>) -> Result<u32, RequirementsError> {
        for path in self.sources {
            let Some(value) = lookup_path(payload, path) else {
                continue;
            };
            return integer_target(value).ok_or_else(|| RequirementsError::InvalidField {
                field: path.join("."),
                reason: format!("expected a non-negative integer, found {}", json_kind(value)),
            });
        }
        Ok(self.default)
    }
}

pub fn resolve_heading_targets(
    payload: &Map<String, Value>,
) -> Result<HeadingTally, RequirementsError> {
    let mut targets = HeadingTally::default();
    for (level, rule) in HeadingLevel::ALL.iter().zip(HEADING_RULES.iter()) {
        targets.set(*level, rule.resolve(payload)?);
    }
    Ok(targets)
}

impl RequirementModel {
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn from_value(value: &Value) -> Result<Self, RequirementsError> {
        let Value::Object(payload) = value else {
            return Err(RequirementsError::NotAnObject {
                found: json_kind(value),
            });
        };

        let primary_keyword = PRIMARY_KEYWORD_SOURCES
            .iter()
            .find_map(|path| lookup_path(payload, path))
            .map(|value| string_field("primary_keyword", value))
            .transpose()?
            .map(|keyword| keyword.trim().to_string())
            .unwrap_or_default();

        let mut model = Self {
            primary_keyword,
            variations: string_list(payload, "variations")?,
            lsi_keywords: IndexMap::new(),
            entities: string_list(payload, "entities")?,
            custom_entities: string_list(payload, "custom_entities")?,
            heading_targets: resolve_heading_targets(payload)?,
            heading_tag_target: HEADING_TAGS_RULE.resolve(payload)?,
            word_count_target: WORD_COUNT_RULE.resolve(payload)?,
            image_target: IMAGE_RULE.resolve(payload)?,
            title_length_target: TITLE_LENGTH_RULE.resolve(payload)?,
            description_length_target: DESCRIPTION_LENGTH_RULE.resolve(payload)?,
            supplementary_requirements: supplementary_map(payload)?,
        };

        match payload.get("lsi_keywords") {
            None | Some(Value::Null) => {}
            Some(Value::Object(entries)) => {
                for (keyword, raw_target) in entries {
                    let target = LsiTarget::deserialize(raw_target)
                        .map(|target| target.resolve())
                        .unwrap_or(1);
                    model.insert_lsi_keyword(keyword, target);
                }
            }
            Some(Value::Array(entries)) => {
                for entry in entries {
                    model.insert_lsi_keyword(&string_field("lsi_keywords", entry)?, 1);
                }
            }
            Some(other) => {
                return Err(RequirementsError::InvalidField {
                    field: "lsi_keywords".to_string(),
                    reason: format!("expected an object or array, found {}", json_kind(other)),
                });
            }
        }

        Ok(model)
    }
}

fn lookup_path<'a>(payload: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = payload.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    if current.is_null() { None } else { Some(current) }
}

fn integer_target(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => {
            if let Some(unsigned) = number.as_u64() {
                Some(u32::try_from(unsigned).unwrap_or(u32::MAX))
            } else if number.as_i64().is_some() {
                Some(0)
            } else {
                number.as_f64().map(|float| float.trunc().max(0.0) as u32)
            }
        }
        Value::String(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() && trimmed.chars().all(|character| character.is_ascii_digit()) {
                trimmed.parse::<u32>().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

fn string_field(field: &str, value: &Value) -> Result<String, RequirementsError> {
    value
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| RequirementsError::InvalidField {
            field: field.to_string(),
            reason: format!("expected a string, found {}", json_kind(value)),
        })
}

fn string_list(
    payload: &Map<String, Value>,
    field: &str,
) -> Result<Vec<String>, RequirementsError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| string_field(field, entry))
            .collect(),
        Some(other) => Err(RequirementsError::InvalidField {
            field: field.to_string(),
            reason: format!("expected an array of strings, found {}", json_kind(other)),
        }),
    }
}

fn supplementary_map(
    payload: &Map<String, Value>,
) -> Result<IndexMap<String, u32>, RequirementsError> {
    let Some(entries) = payload.get("roadmap_requirements").and_then(Value::as_object) else {
        return Ok(IndexMap::new());
    };

    let mut out = IndexMap::with_capacity(entries.len());
    for (name, value) in entries {
        let amount = integer_target(value).ok_or_else(|| RequirementsError::InvalidField {
            field: format!("roadmap_requirements.{name}"),
            reason: format!("expected a non-negative integer, found {}", json_kind(value)),
        })?;
        out.insert(name.clone(), amount);
    }
    Ok(out)
}
