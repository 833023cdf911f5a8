//! Word frequency counting with stable ranking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A word and how many times it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Occurrence counts, remembering the order in which words first appeared.
///
/// Ranking sorts by descending count and breaks ties by first occurrence.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: Vec<WordCount>,
    index: HashMap<String, usize>,
    total: usize,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every word in `words`.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for word in words {
            table.add(word.as_ref());
        }
        table
    }

    pub fn add(&mut self, word: &str) {
        self.total += 1;
        if let Some(&idx) = self.index.get(word) {
            self.entries[idx].count += 1;
        } else {
            self.index.insert(word.to_string(), self.entries.len());
            self.entries.push(WordCount {
                word: word.to_string(),
                count: 1,
            });
        }
    }

    pub fn count(&self, word: &str) -> usize {
        self.index
            .get(word)
            .map(|&idx| self.entries[idx].count)
            .unwrap_or(0)
    }

    /// Number of distinct words.
    pub fn unique(&self) -> usize {
        self.entries.len()
    }

    /// Number of words counted, including repeats.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Words that occurred exactly once.
    pub fn singletons(&self) -> usize {
        self.entries.iter().filter(|e| e.count == 1).count()
    }

    /// The `n` most frequent words.
    pub fn top(&self, n: usize) -> Vec<WordCount> {
        self.ranked_where(n, |_| true)
    }

    /// The `n` most frequent words satisfying `predicate`.
    pub fn ranked_where<F>(&self, n: usize, predicate: F) -> Vec<WordCount>
    where
        F: Fn(&str) -> bool,
    {
        let mut ranked: Vec<&WordCount> = self
            .entries
            .iter()
            .filter(|e| predicate(&e.word))
            .collect();
        // sort_by is stable, so equal counts keep first-occurrence order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.into_iter().take(n).cloned().collect()
    }
}
