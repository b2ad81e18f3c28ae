//! Mapping free text to intent names.
//!
//! [`IntentClassifier`] is the seam where a natural-language classifier plugs
//! in. [`KeywordClassifier`] is the offline default: it scores each candidate
//! intent by the trigger phrases found in the input.

use std::collections::HashMap;

/// Name returned when no candidate fits.
pub const UNKNOWN_INTENT: &str = "unknown";

/// Chooses the intent a line of user input should run.
pub trait IntentClassifier {
    /// Returns one of `candidates`, or [`UNKNOWN_INTENT`].
    ///
    /// `prior_replies` holds the agent's most recent replies, oldest first.
    fn recognize_intent(
        &self,
        user_input: &str,
        candidates: &[String],
        prior_replies: &[String],
    ) -> String;
}

/// Case-insensitive trigger-phrase matching.
///
/// An intent without explicit triggers is triggered by the words of its
/// name, so `check_order` responds to "check" and "order". A phrase matches
/// when its words appear consecutively in the input; the score of an intent
/// is the number of words across all its matched phrases. The highest score
/// wins, ties go to the earlier candidate.
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    triggers: HashMap<String, Vec<Vec<String>>>,
}

impl KeywordClassifier {
    /// Creates a classifier that relies on intent names only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the trigger phrases of `intent`.
    #[must_use]
    pub fn with_triggers<I, S>(mut self, intent: impl Into<String>, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = phrases
            .into_iter()
            .map(|phrase| words(phrase.as_ref()))
            .filter(|phrase| !phrase.is_empty())
            .collect();
        self.triggers.insert(intent.into(), phrases);
        self
    }

    fn score(&self, input: &[String], intent: &str) -> usize {
        let matched = |phrase: &Vec<String>| {
            input
                .windows(phrase.len())
                .any(|window| window == phrase.as_slice())
        };

        match self.triggers.get(intent) {
            Some(phrases) => phrases
                .iter()
                .filter(|phrase| matched(phrase))
                .map(Vec::len)
                .sum(),
            None => words(intent)
                .into_iter()
                .filter(|word| input.contains(word))
                .count(),
        }
    }
}

impl IntentClassifier for KeywordClassifier {
    fn recognize_intent(
        &self,
        user_input: &str,
        candidates: &[String],
        _prior_replies: &[String],
    ) -> String {
        let input = words(user_input);
        let mut best: Option<(&str, usize)> = None;

        for candidate in candidates {
            if candidate == UNKNOWN_INTENT {
                continue;
            }
            let score = self.score(&input, candidate);
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((candidate.as_str(), score));
            }
        }

        best.map_or_else(|| UNKNOWN_INTENT.to_string(), |(name, _)| name.to_string())
    }
}

/// Lowercased alphanumeric runs; `_` and `-` separate words.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}
