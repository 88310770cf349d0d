use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::requirements::normalize_phrase;

pub const DEFAULT_CACHE_CAPACITY: usize = 128;

pub trait MatchStrategy: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn count(&self, text: &str, phrases: &[String]) -> Vec<usize>;

    fn cached_phrase_sets(&self) -> usize {
        0
    }
}

#[derive(Debug)]
pub struct PhraseMatcher {
    strategy: Box<dyn MatchStrategy>,
}

impl Default for PhraseMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PhraseMatcher {
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    #[cfg(feature = "accelerated")]
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            strategy: Box::new(AutomatonScan::new(capacity)),
        }
    }

    #[cfg(not(feature = "accelerated"))]
    pub fn with_cache_capacity(_capacity: usize) -> Self {
        Self::naive()
    }

    pub fn naive() -> Self {
        Self {
            strategy: Box::new(NaiveScan),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn cached_phrase_sets(&self) -> usize {
        self.strategy.cached_phrase_sets()
    }

    pub fn count_phrases<S: AsRef<str>>(&self, text: &str, phrases: &[S]) -> IndexMap<String, usize> {
        let mut normalized = Vec::<String>::with_capacity(phrases.len());
        for phrase in phrases {
            let phrase = normalize_phrase(phrase.as_ref());
            if !phrase.is_empty() && !normalized.contains(&phrase) {
                normalized.push(phrase);
            }
        }
        if normalized.is_empty() {
            return IndexMap::new();
        }

        let lowered = text.to_lowercase();
        let counts = self.strategy.count(&lowered, &normalized);
        normalized.into_iter().zip(counts).collect()
    }
}

#[derive(Debug, Default)]
pub struct NaiveScan;

impl MatchStrategy for NaiveScan {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn count(&self, text: &str, phrases: &[String]) -> Vec<usize> {
        let padded = format!(" {text} ");
        phrases
            .iter()
            .map(|phrase| count_delimited(&padded, phrase))
            .collect()
    }
}

fn count_delimited(text: &str, phrase: &str) -> usize {
    let step = phrase.chars().next().map(char::len_utf8).unwrap_or(1);
    let mut count = 0;
    let mut from = 0;
    while let Some(offset) = text[from..].find(phrase) {
        let start = from + offset;
        let end = start + phrase.len();
        if is_delimited(text, start, end) {
            count += 1;
            // Next match may reuse the trailing delimiter, never the phrase.
            from = end;
        } else {
            from = start + step;
        }
    }
    count
}

fn is_delimited(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start]
        .chars()
        .next_back()
        .is_none_or(char::is_whitespace);
    let after = text[end..].chars().next().is_none_or(char::is_whitespace);
    before && after
}

#[cfg(feature = "accelerated")]
pub use accelerated::AutomatonScan;

#[cfg(feature = "accelerated")]
mod accelerated {
    use std::sync::{Arc, Mutex, PoisonError};

    use aho_corasick::AhoCorasick;
    use tracing::{debug, warn};

    use super::{LruCache, MatchStrategy, NaiveScan, is_delimited};

    #[derive(Debug)]
    pub struct AutomatonScan {
        cache: Mutex<LruCache<Vec<String>, Arc<AhoCorasick>>>,
    }

    impl AutomatonScan {
        pub fn new(capacity: usize) -> Self {
            Self {
                cache: Mutex::new(LruCache::new(capacity)),
            }
        }

        fn automaton(&self, phrases: &[String]) -> Option<Arc<AhoCorasick>> {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            let key = phrases.to_vec();
            if let Some(automaton) = cache.get(&key) {
                return Some(automaton);
            }

            match AhoCorasick::new(phrases) {
                Ok(automaton) => {
                    let automaton = Arc::new(automaton);
                    debug!(phrases = phrases.len(), "built phrase automaton");
                    cache.insert(key, Arc::clone(&automaton));
                    Some(automaton)
                }
                Err(err) => {
                    warn!(error = %err, "phrase automaton unavailable; scanning phrases one by one");
                    None
                }
            }
        }
    }

    impl MatchStrategy for AutomatonScan {
        fn name(&self) -> &'static str {
            "aho-corasick"
        }

        fn count(&self, text: &str, phrases: &[String]) -> Vec<usize> {
            let Some(automaton) = self.automaton(phrases) else {
                return NaiveScan.count(text, phrases);
            };

            let mut counts = vec![0_usize; phrases.len()];
            let mut last_end = vec![0_usize; phrases.len()];
            for found in automaton.find_overlapping_iter(text) {
                let pattern = found.pattern().as_usize();
                if found.start() >= last_end[pattern]
                    && is_delimited(text, found.start(), found.end())
                {
                    counts[pattern] += 1;
                    last_end[pattern] = found.end();
                }
            }
            counts
        }

        fn cached_phrase_sets(&self) -> usize {
            self.cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }
    }
}

#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: usize,
    entries: IndexMap<K, V>,
}

impl<K: Hash + Eq, V: Clone> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: IndexMap::new(),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        let index = self.entries.get_index_of(key)?;
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        self.entries.get_index(last).map(|(_, value)| value.clone())
    }

    pub fn insert(&mut self, key: K, value: V) {
        if let Some(index) = self.entries.get_index_of(&key) {
            let last = self.entries.len() - 1;
            self.entries.move_index(index, last);
            if let Some((_, slot)) = self.entries.get_index_mut(last) {
                *slot = value;
            }
            return;
        }

        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }
}
