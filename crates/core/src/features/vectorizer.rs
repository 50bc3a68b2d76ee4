//! Frequency-weighted text vectorizer over entry notes.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Characters that survive normalization: letters and spaces.
fn non_letter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z ]+").expect("static regex"))
}

/// Normalizes free-text note/merchant text into a stable key:
/// lowercased, digits and punctuation stripped, whitespace collapsed.
///
/// "STARBUCKS #1234 - SEATTLE" and "Starbucks 9876 Seattle" normalize to the
/// same key, which is what makes the note-frequency feature useful.
pub fn normalize_note(note: &str) -> String {
    let lowered = note.to_lowercase();
    let stripped = non_letter_regex().replace_all(&lowered, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tokenize(note: &str) -> Vec<String> {
    normalize_note(note)
        .split_whitespace()
        .filter(|t| t.len() > 1)
        .map(str::to_string)
        .collect()
}

/// Text vectorizer with a fixed vocabulary chosen at fit time.
///
/// Vocabulary is the `max_vocabulary` tokens with the highest document
/// frequency; per-entry weights are term frequency scaled by inverse document
/// frequency. Tokens unseen at fit time are ignored at transform time, so the
/// output width never changes after fitting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextVectorizer {
    max_vocabulary: usize,
    /// token -> (column index, inverse document frequency)
    vocabulary: HashMap<String, (usize, f64)>,
    document_count: usize,
}

impl TextVectorizer {
    pub fn new(max_vocabulary: usize) -> Self {
        Self {
            max_vocabulary,
            vocabulary: HashMap::new(),
            document_count: 0,
        }
    }

    /// Builds the vocabulary from the training notes.
    pub fn fit(&mut self, notes: &[&str]) {
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for note in notes {
            let mut seen: Vec<String> = tokenize(note);
            seen.sort();
            seen.dedup();
            for token in seen {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = document_frequency.into_iter().collect();
        // Highest document frequency first; ties broken alphabetically so the
        // fitted vocabulary is deterministic.
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_vocabulary);

        self.document_count = notes.len();
        self.vocabulary = ranked
            .into_iter()
            .enumerate()
            .map(|(index, (token, df))| {
                let idf = ((1.0 + notes.len() as f64) / (1.0 + df as f64)).ln() + 1.0;
                (token, (index, idf))
            })
            .collect();
    }

    /// Width of the text section of the feature vector.
    pub fn width(&self) -> usize {
        self.vocabulary.len()
    }

    /// Transforms a note into tf-idf weights over the fitted vocabulary.
    pub fn transform(&self, note: &str) -> Vec<f64> {
        let mut weights = vec![0.0; self.vocabulary.len()];
        let tokens = tokenize(note);
        if tokens.is_empty() {
            return weights;
        }
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in &tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
        for (token, count) in counts {
            if let Some(&(index, idf)) = self.vocabulary.get(token) {
                let tf = count as f64 / tokens.len() as f64;
                weights[index] = tf * idf;
            }
        }
        weights
    }
}
