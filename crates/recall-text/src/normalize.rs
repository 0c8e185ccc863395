//! Query normalization: cleaning, stopword removal and intent detection.

use std::collections::HashSet;

use recall_core::types::{Intent, NormalizedQuery};

/// Function words dropped from queries and from the lexical index.
pub const STOPWORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "in", "with", "to", "for",
];

const INTERROGATIVES: &[&str] = &["how", "what", "why", "who", "where", "when"];
const TRANSACTIONAL: &[&str] = &["buy", "purchase", "order", "download"];
const NAVIGATIONAL: &[&str] = &["login", "homepage", "open", "go to"];

#[derive(Debug, Clone)]
pub struct QueryNormalizer {
    stopwords: HashSet<String>,
}

impl Default for QueryNormalizer {
    fn default() -> Self {
        Self::with_stopwords(STOPWORDS.iter().copied())
    }
}

impl QueryNormalizer {
    pub fn new() -> Self { Self::default() }

    pub fn with_stopwords<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { stopwords: words.into_iter().map(Into::into).collect() }
    }

    /// Pure and idempotent: normalizing an already-cleaned query yields the
    /// same cleaned text and intent.
    pub fn normalize(&self, raw: &str) -> NormalizedQuery {
        let cleaned = self.clean(raw);
        let intent = detect_intent(&cleaned);
        NormalizedQuery { raw: raw.to_string(), cleaned, intent }
    }

    fn clean(&self, raw: &str) -> String {
        let stripped: String = raw
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
            .collect();
        stripped
            .split_whitespace()
            .filter(|token| !self.stopwords.contains(*token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Ordered keyword rules, first match wins. Keywords match as substrings of
/// the cleaned query; interrogatives only as its prefix.
pub fn detect_intent(cleaned: &str) -> Intent {
    if INTERROGATIVES.iter().any(|w| cleaned.starts_with(w)) {
        Intent::Informational
    } else if TRANSACTIONAL.iter().any(|w| cleaned.contains(w)) {
        Intent::Transactional
    } else if NAVIGATIONAL.iter().any(|w| cleaned.contains(w)) {
        Intent::Navigational
    } else {
        Intent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn n(raw: &str) -> NormalizedQuery {
        QueryNormalizer::new().normalize(raw)
    }

    #[test]
    fn cleans_punctuation_case_and_whitespace() {
        let q = n("  Best   COFFEE-shops, in   Paris!! ");
        assert_eq!(q.cleaned, "best coffeeshops paris");
        assert_eq!(q.raw, "  Best   COFFEE-shops, in   Paris!! ");
    }

    #[test]
    fn removes_stopwords_by_whole_token() {
        assert_eq!(n("the theory of an island").cleaned, "theory of island");
    }

    #[test]
    fn empty_and_all_stopword_inputs() {
        for raw in ["", "   ", "the and or", "?!..."] {
            let q = n(raw);
            assert_eq!(q.cleaned, "", "raw={raw:?}");
            assert_eq!(q.intent, Intent::Unknown);
        }
    }

    #[test]
    fn intent_rules_in_order() {
        assert_eq!(n("How do I brew coffee?").intent, Intent::Informational);
        assert_eq!(n("where to buy beans").intent, Intent::Informational, "interrogative wins");
        assert_eq!(n("buy espresso machine").intent, Intent::Transactional);
        assert_eq!(n("Download the manual").intent, Intent::Transactional);
        assert_eq!(n("open settings page").intent, Intent::Navigational);
        assert_eq!(n("account LOGIN").intent, Intent::Navigational);
        assert_eq!(n("espresso crema").intent, Intent::Unknown);
    }

    #[test]
    fn go_to_phrase_survives_only_without_stopword_removal() {
        // "to" is a stopword, so the phrase never reaches the intent rules.
        assert_eq!(n("go to settings").intent, Intent::Unknown);
        assert_eq!(detect_intent("go to settings"), Intent::Navigational);
    }

    #[test]
    fn custom_stopwords() {
        let normalizer = QueryNormalizer::with_stopwords(["coffee"]);
        assert_eq!(normalizer.normalize("the coffee shop").cleaned, "the shop");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in "\\PC{0,60}") {
            let normalizer = QueryNormalizer::new();
            let once = normalizer.normalize(&raw);
            let twice = normalizer.normalize(&once.cleaned);
            prop_assert_eq!(&twice.cleaned, &once.cleaned);
            prop_assert_eq!(twice.intent, once.intent);
        }

        #[test]
        fn cleaned_is_ascii_words_single_spaced(raw in "[ -~\\t\\n]{0,80}") {
            let cleaned = QueryNormalizer::new().normalize(&raw).cleaned;
            prop_assert!(cleaned.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
            prop_assert!(!cleaned.contains("  "));
            prop_assert_eq!(cleaned.trim(), cleaned.as_str());
        }
    }
}
