use regex::Regex;
use serde::Serialize;

use crate::requirements::HeadingLevel;

const FENCE_LABEL: &str = "markdown";
const HEADING_SECTION_MARKER: &str = "HEADING STRUCTURE:\n";

const POSTAMBLES: [&str; 3] = [
    "Let me know if you need any revisions.",
    "Let me know if you would like any changes.",
    "Is there anything else you'd like me to help with?",
];

pub fn extract_markdown_body(response: &str) -> String {
    response
        .split('\n')
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && trimmed != FENCE_LABEL && !POSTAMBLES.contains(&trimmed)
        })
        .collect::<Vec<&str>>()
        .join("\n")
        .trim()
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub level: u8,
    pub text: String,
}

impl OutlineEntry {
    pub fn heading_level(&self) -> Option<HeadingLevel> {
        HeadingLevel::from_depth(usize::from(self.level))
    }
}

#[derive(Debug)]
pub struct OutlineReader {
    markdown_heading: Regex,
    labelled_heading: Regex,
}

impl OutlineReader {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            markdown_heading: Regex::new(r"(?m)^(#{1,6})[ \t]+(.+?)[ \t]*$")?,
            labelled_heading: Regex::new(r"(?m)^H([1-6]):[ \t]*(.+?)[ \t]*$")?,
        })
    }

    pub fn extract_headings(&self, content: &str) -> Vec<OutlineEntry> {
        if let Some(index) = content.find(HEADING_SECTION_MARKER) {
            let section = &content[index + HEADING_SECTION_MARKER.len()..];
            return section
                .lines()
                .filter_map(|line| self.parse_line(line.trim()))
                .collect();
        }

        let markdown = outline_matches(&self.markdown_heading, content, |marks| marks.len());
        if !markdown.is_empty() {
            return markdown;
        }
        outline_matches(&self.labelled_heading, content, |digit| {
            digit.parse::<usize>().unwrap_or(1)
        })
    }

    fn parse_line(&self, line: &str) -> Option<OutlineEntry> {
        if line.is_empty() {
            return None;
        }
        if let Some(captures) = self.markdown_heading.captures(line) {
            return entry(captures[1].len(), &captures[2]);
        }
        let captures = self.labelled_heading.captures(line)?;
        entry(captures[1].parse::<usize>().ok()?, &captures[2])
    }
}

fn outline_matches(
    pattern: &Regex,
    content: &str,
    level_of: impl Fn(&str) -> usize,
) -> Vec<OutlineEntry> {
    pattern
        .captures_iter(content)
        .filter_map(|captures| entry(level_of(&captures[1]), &captures[2]))
        .collect()
}

fn entry(depth: usize, text: &str) -> Option<OutlineEntry> {
    let level = HeadingLevel::from_depth(depth)?;
    Some(OutlineEntry {
        level: level.depth() as u8,
        text: text.trim().to_string(),
    })
}
