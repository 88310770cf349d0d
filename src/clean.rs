use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedContent {
    pub tokens: Vec<String>,
    pub raw_text: String,
}

impl CleanedContent {
    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn token_frequency(&self, word: &str) -> usize {
        self.tokens
            .iter()
            .filter(|token| token.as_str() == word)
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct ContentCleaner {
    markup_noise: Regex,
    non_alphanumeric: Regex,
}

impl ContentCleaner {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // Heading lines go entirely, then emphasis/code markers, tags,
            // URLs and sentence punctuation.
            markup_noise: Regex::new(
                r#"(?m)^#+.*$|[*_`~]|<[^>]+>|https?://\S+|[\n\r.,;:!?()\[\]{}"'-]"#,
            )?,
            non_alphanumeric: Regex::new(r"[^a-z0-9\s]")?,
        })
    }

    pub fn clean(&self, content: &str) -> CleanedContent {
        let lowered = content.to_lowercase();

        let stripped = self.markup_noise.replace_all(&lowered, " ");
        let tokens = stripped
            .split_whitespace()
            .map(ToOwned::to_owned)
            .collect::<Vec<String>>();

        let blanked = self.non_alphanumeric.replace_all(&lowered, " ");
        let raw_text = collapse_whitespace(&blanked);

        CleanedContent { tokens, raw_text }
    }
}

pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}
