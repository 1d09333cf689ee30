//! Topic keywords for a summary, steered toward the vault's vocabulary

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::llm::{prompts, LanguageModel};

/// Numbered list items: `1. foo`, `2: bar`, `3) baz`, ended by `,` `;` or end of line
static LIST_ITEM: OnceLock<Option<Regex>> = OnceLock::new();

fn list_item_regex() -> Option<&'static Regex> {
    LIST_ITEM
        .get_or_init(|| match Regex::new(r"(?m)\d+[.:)]\s?(.+?)(?:[,;]|$)") {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to compile list item regex");
                None
            }
        })
        .as_ref()
}

/// Maps known variants of a keyword onto the form the vault uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCanonicalizer {
    table: BTreeMap<String, String>,
}

impl KeywordCanonicalizer {
    pub fn new(table: BTreeMap<String, String>) -> Self {
        Self { table }
    }

    /// A table that leaves every keyword untouched
    pub fn identity() -> Self {
        Self::new(BTreeMap::new())
    }

    pub fn canonical(&self, keyword: &str) -> String {
        self.table
            .get(keyword)
            .cloned()
            .unwrap_or_else(|| keyword.to_string())
    }
}

impl Default for KeywordCanonicalizer {
    fn default() -> Self {
        let table = [
            "Artificial Intelligence",
            "Artificial intelligence",
            "artificial intelligence",
            "Artificial Intelligence (AI)",
            "Artificial intelligence (AI)",
            "artificial intelligence (AI)",
        ]
        .into_iter()
        .map(|variant| (variant.to_string(), "AI".to_string()))
        .collect();

        Self::new(table)
    }
}

/// Pull the raw item texts out of a numbered-list response
pub fn extract_items(response: &str) -> Vec<&str> {
    let Some(re) = list_item_regex() else {
        return Vec::new();
    };
    re.captures_iter(response)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .collect()
}

fn strip_item(item: &str) -> &str {
    item.trim_matches(|c: char| matches!(c, '.' | ',' | ';' | ':') || c.is_whitespace())
}

/// Turn a model response into at most `limit` clean, canonical, distinct keywords
pub fn parse_keywords(
    response: &str,
    canonicalizer: &KeywordCanonicalizer,
    limit: usize,
) -> Vec<String> {
    let mut seen = HashSet::new();
    extract_items(response)
        .into_iter()
        .map(strip_item)
        .filter(|item| !item.is_empty())
        .map(|item| canonicalizer.canonical(item))
        .filter(|keyword| seen.insert(keyword.clone()))
        .take(limit)
        .collect()
}

pub struct KeywordExtractor<'a, M: ?Sized> {
    model: &'a M,
    canonicalizer: &'a KeywordCanonicalizer,
    count: usize,
}

impl<'a, M: LanguageModel + ?Sized> KeywordExtractor<'a, M> {
    pub fn new(model: &'a M, canonicalizer: &'a KeywordCanonicalizer, count: usize) -> Self {
        Self {
            model,
            canonicalizer,
            count,
        }
    }

    /// Ask for `count` keywords, offering the existing vocabulary as hints.
    ///
    /// A response with fewer parseable items yields a shorter list, not an error.
    #[tracing::instrument(skip_all, fields(vocabulary = vocabulary.len()))]
    pub fn keywords(&self, summary: &str, vocabulary: &[String]) -> Result<Vec<String>> {
        let response = self.model.complete(
            &prompts::keywords_system(self.count),
            &prompts::keywords_prompt(summary, vocabulary, self.count),
        )?;

        let keywords = parse_keywords(&response, self.canonicalizer, self.count);
        if keywords.len() < self.count {
            tracing::warn!(
                parsed = keywords.len(),
                expected = self.count,
                "model returned fewer keywords than requested"
            );
        }
        tracing::info!(keywords = ?keywords, "keywords");
        Ok(keywords)
    }
}
