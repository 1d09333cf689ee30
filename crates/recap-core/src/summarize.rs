//! Map-reduce summarization of a transcript
//!
//! The map stage turns every fragment into a bullet list, one call per
//! fragment in document order. The reduce stage rewrites the bullets as an
//! essay when they are small enough to fit a single call, and otherwise
//! keeps them as they are.

use std::time::Instant;

use crate::chunk::chunk;
use crate::config::SummaryConfig;
use crate::error::Result;
use crate::llm::{prompts, LanguageModel};
use crate::tokens::TokenCounter;
use crate::trace_time;

/// Result of the reduce decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    /// Prose written from the bullets by one extra model call
    Essay(String),
    /// The newline-joined bullets, returned verbatim
    BulletConcatenation(String),
}

impl Summary {
    pub fn text(&self) -> &str {
        match self {
            Summary::Essay(text) | Summary::BulletConcatenation(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Summary::Essay(text) | Summary::BulletConcatenation(text) => text,
        }
    }

    /// Short label used in logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            Summary::Essay(_) => "essay",
            Summary::BulletConcatenation(_) => "bullets",
        }
    }
}

pub struct Summarizer<'a, M: ?Sized, C: ?Sized> {
    model: &'a M,
    counter: &'a C,
    fragment_budget: usize,
    reduce_threshold: usize,
}

impl<'a, M, C> Summarizer<'a, M, C>
where
    M: LanguageModel + ?Sized,
    C: TokenCounter + ?Sized,
{
    pub fn new(model: &'a M, counter: &'a C, settings: &SummaryConfig) -> Self {
        Self {
            model,
            counter,
            fragment_budget: settings.fragment_budget,
            reduce_threshold: settings.reduce_threshold,
        }
    }

    /// Summarize a whole document. Any service failure aborts the document.
    #[tracing::instrument(skip_all, fields(len = document.len()))]
    pub fn summarize(&self, document: &str) -> Result<Summary> {
        let start = Instant::now();
        let bullets = self.map(document)?;
        let summary = self.reduce(bullets)?;
        trace_time!(start, "summarize", kind = summary.kind());
        Ok(summary)
    }

    /// One bullet-list call per fragment, in fragment order
    fn map(&self, document: &str) -> Result<Vec<String>> {
        let fragments = chunk(document, self.fragment_budget, self.counter);
        let total = fragments.len();

        let mut bullets = Vec::with_capacity(total);
        for (i, fragment) in fragments.iter().enumerate() {
            tracing::info!(fragment = i + 1, total, cost = fragment.cost, "summarizing fragment");
            let reply = self
                .model
                .complete(prompts::BULLET_SYSTEM, &prompts::bullet_prompt(&fragment.text))?;
            bullets.push(reply);
        }
        Ok(bullets)
    }

    fn reduce(&self, bullets: Vec<String>) -> Result<Summary> {
        let aggregate = bullets.join("\n");
        let cost = self.counter.cost(&aggregate);

        if cost < self.reduce_threshold {
            tracing::info!(cost, threshold = self.reduce_threshold, "writing essay");
            let essay = self
                .model
                .complete(prompts::ESSAY_SYSTEM, &prompts::essay_prompt(&aggregate))?;
            Ok(Summary::Essay(essay))
        } else {
            tracing::info!(
                cost,
                threshold = self.reduce_threshold,
                "bullets too long for an essay, keeping them"
            );
            Ok(Summary::BulletConcatenation(aggregate))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::tests::PerWord;
    use crate::error::RecapError;
    use crate::llm::fake::ScriptedModel;

    fn settings(fragment_budget: usize, reduce_threshold: usize) -> SummaryConfig {
        SummaryConfig {
            fragment_budget,
            reduce_threshold,
            ..SummaryConfig::default()
        }
    }

    /// Bullet replies are `n` words long so the aggregate cost is controlled
    fn bullets_of(words: usize) -> impl Fn(&str, &str) -> Result<String> {
        move |system, _| {
            if system == prompts::BULLET_SYSTEM {
                Ok(vec!["w"; words].join(" "))
            } else {
                Ok("An essay.".to_string())
            }
        }
    }

    #[test]
    fn test_one_call_per_fragment_in_order() {
        let model = ScriptedModel::new(|system: &str, prompt: &str| {
            if system == prompts::BULLET_SYSTEM {
                let fragment = prompt.split("\n\n").nth(1).unwrap_or_default();
                Ok(format!("- {fragment}"))
            } else {
                Ok("essay".to_string())
            }
        });
        let summarizer = Summarizer::new(&model, &PerWord, &settings(2, 10_000));

        let summary = summarizer.summarize("a b c d e").unwrap();

        let calls = model.calls.borrow();
        assert_eq!(calls.len(), 4);
        assert!(calls[0].prompt.contains("\n\na b\n\n"));
        assert!(calls[1].prompt.contains("\n\nc d\n\n"));
        assert!(calls[2].prompt.contains("\n\ne\n\n"));
        assert_eq!(calls[3].system, prompts::ESSAY_SYSTEM);
        assert!(calls[3].prompt.ends_with("- a b\n- c d\n- e"));
        assert_eq!(summary, Summary::Essay("essay".to_string()));
    }

    #[test]
    fn test_reduce_runs_just_below_threshold() {
        // One fragment, bullet aggregate of 9 words against a threshold of 10
        let model = ScriptedModel::new(bullets_of(9));
        let summarizer = Summarizer::new(&model, &PerWord, &settings(100, 10));

        let summary = summarizer.summarize("short transcript").unwrap();
        assert_eq!(summary, Summary::Essay("An essay.".to_string()));
        assert_eq!(
            model.systems(),
            vec![prompts::BULLET_SYSTEM, prompts::ESSAY_SYSTEM]
        );
    }

    #[test]
    fn test_reduce_skipped_at_threshold() {
        let model = ScriptedModel::new(bullets_of(10));
        let summarizer = Summarizer::new(&model, &PerWord, &settings(100, 10));

        let summary = summarizer.summarize("short transcript").unwrap();
        assert_eq!(
            summary,
            Summary::BulletConcatenation(vec!["w"; 10].join(" "))
        );
        assert_eq!(model.call_count(), 1);
    }

    #[test]
    fn test_large_aggregate_returned_verbatim() {
        // Two fragments of 1500 bullet words each: 3000 against 2800
        let model = ScriptedModel::new(bullets_of(1500));
        let summarizer = Summarizer::new(&model, &PerWord, &settings(1, 2800));

        let summary = summarizer.summarize("first second").unwrap();
        let one = vec!["w"; 1500].join(" ");
        assert_eq!(summary, Summary::BulletConcatenation(format!("{one}\n{one}")));
        assert_eq!(summary.kind(), "bullets");
        assert_eq!(model.call_count(), 2);
    }

    #[test]
    fn test_empty_document_still_makes_one_map_call() {
        let model = ScriptedModel::new(bullets_of(1));
        let summarizer = Summarizer::new(&model, &PerWord, &settings(10, 10));

        summarizer.summarize("").unwrap();
        assert_eq!(model.call_count(), 2);
    }

    #[test]
    fn test_service_failure_propagates() {
        let model = ScriptedModel::new(|_: &str, _: &str| -> Result<String> {
            Err(RecapError::service("quota exceeded"))
        });
        let summarizer = Summarizer::new(&model, &PerWord, &settings(1, 10));

        let err = summarizer.summarize("a b c").unwrap_err();
        assert!(matches!(err, RecapError::ServiceCall(_)));
        // The first failure stops the map stage
        assert_eq!(model.call_count(), 1);
    }

    #[test]
    fn test_summary_text_accessors() {
        let essay = Summary::Essay("prose".to_string());
        assert_eq!(essay.text(), "prose");
        assert_eq!(essay.kind(), "essay");
        assert_eq!(essay.into_text(), "prose");
    }
}
