//! Sequential, resumable batch over the transcript directory
//!
//! Each document moves `pending -> processing -> done | failed`. A document
//! is only `done` once its note is written and the ledger entry appended.
//! Failures are logged and the document stays pending for the next run;
//! an interrupt ends the whole batch without touching the ledger.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;

use crate::config::{RecapConfig, SummaryConfig};
use crate::error::{RecapError, Result};
use crate::interrupt::Interrupt;
use crate::keywords::{KeywordCanonicalizer, KeywordExtractor};
use crate::ledger::ProcessingLedger;
use crate::llm::{InterruptibleModel, LanguageModel};
use crate::summarize::Summarizer;
use crate::title::generate_title;
use crate::tokens::TokenCounter;
use crate::{trace_time, vault};

/// Lifecycle of one input document within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Pending,
    Processing,
    Done,
    Failed,
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentState::Pending => "pending",
            DocumentState::Processing => "processing",
            DocumentState::Done => "done",
            DocumentState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How the input directory splits against the ledger and exclusion list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchPlan {
    pub pending: Vec<String>,
    pub done: Vec<String>,
    pub excluded: Vec<String>,
}

/// A document that reached `done`
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    pub source: String,
    pub title: String,
    pub path: PathBuf,
    pub summary_kind: &'static str,
    pub keywords: Vec<String>,
}

/// A document that failed and stays pending
#[derive(Debug, Clone, Serialize)]
pub struct FailedDocument {
    pub source: String,
    pub error_type: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub processed: Vec<ProcessedDocument>,
    pub failed: Vec<FailedDocument>,
    pub skipped_done: usize,
    pub skipped_excluded: usize,
    /// Pending documents left for later because of `--limit`
    pub deferred: usize,
}

pub struct BatchDriver<'a, M: ?Sized, C: ?Sized> {
    config: &'a RecapConfig,
    ledger: ProcessingLedger,
    model: &'a M,
    counter: &'a C,
    interrupt: Interrupt,
    canonicalizer: KeywordCanonicalizer,
    limit: Option<usize>,
    /// Notes written so far this run
    written: HashSet<PathBuf>,
}

impl<'a, M, C> BatchDriver<'a, M, C>
where
    M: LanguageModel + ?Sized,
    C: TokenCounter + ?Sized,
{
    pub fn new(
        config: &'a RecapConfig,
        ledger: ProcessingLedger,
        model: &'a M,
        counter: &'a C,
        interrupt: Interrupt,
    ) -> Self {
        Self {
            config,
            ledger,
            model,
            counter,
            interrupt,
            canonicalizer: config.canonicalizer(),
            limit: None,
            written: HashSet::new(),
        }
    }

    /// Attempt at most `limit` pending documents this run
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Replace the canonicalization table taken from the config
    pub fn with_canonicalizer(mut self, canonicalizer: KeywordCanonicalizer) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    pub fn ledger(&self) -> &ProcessingLedger {
        &self.ledger
    }

    /// Classify the input directory without calling the model
    pub fn plan(&self) -> Result<BatchPlan> {
        plan_inputs(self.config, &self.ledger)
    }

    /// Process every pending document in filename order.
    ///
    /// `progress` is called after each document that reaches `done`.
    #[tracing::instrument(skip_all, fields(input = %self.config.input_path().display()))]
    pub fn run(
        &mut self,
        mut progress: Option<&mut dyn FnMut(&ProcessedDocument)>,
    ) -> Result<BatchReport> {
        let start = Instant::now();

        let vocabulary = vault::keyword_vocabulary(&self.config.vault_dir)?;
        let plan = self.plan()?;

        let attempt = self.limit.unwrap_or(plan.pending.len()).min(plan.pending.len());
        let mut report = BatchReport {
            skipped_done: plan.done.len(),
            skipped_excluded: plan.excluded.len(),
            deferred: plan.pending.len() - attempt,
            ..BatchReport::default()
        };

        tracing::info!(
            pending = plan.pending.len(),
            done = plan.done.len(),
            excluded = plan.excluded.len(),
            vocabulary = vocabulary.len(),
            "batch_start"
        );

        let model = InterruptibleModel::new(self.model, self.interrupt.clone());

        for filename in plan.pending.iter().take(attempt) {
            if self.interrupt.is_set() {
                tracing::warn!(source = %filename, "Batch interrupted before document");
                return Err(RecapError::Interrupted);
            }

            tracing::info!(source = %filename, state = %DocumentState::Processing, "document");
            match self.complete_document(&model, &vocabulary, filename) {
                Ok(processed) => {
                    tracing::info!(
                        source = %filename,
                        state = %DocumentState::Done,
                        title = %processed.title,
                        "document"
                    );
                    if let Some(cb) = progress.as_mut() {
                        cb(&processed);
                    }
                    report.processed.push(processed);
                }
                Err(e) if e.is_per_item() => {
                    tracing::error!(
                        source = %filename,
                        state = %DocumentState::Failed,
                        error = %e,
                        "Error processing document; it stays {}",
                        DocumentState::Pending
                    );
                    report.failed.push(FailedDocument {
                        source: filename.clone(),
                        error_type: e.error_type(),
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!(source = %filename, error = %e, "Batch aborted");
                    return Err(e);
                }
            }
        }

        trace_time!(start, "batch", processed = report.processed.len());
        Ok(report)
    }

    /// Everything needed to move one document to `done`
    fn complete_document<L: LanguageModel + ?Sized>(
        &mut self,
        model: &L,
        vocabulary: &[String],
        filename: &str,
    ) -> Result<ProcessedDocument> {
        let settings: SummaryConfig = self.config.summary;
        let source = self.config.input_path().join(filename);
        let content = fs::read_to_string(&source)
            .map_err(|e| RecapError::io_operation("read", source.display(), e))?;

        let summary = Summarizer::new(model, self.counter, &settings).summarize(&content)?;
        let title = generate_title(model, summary.text())?;
        let keywords = KeywordExtractor::new(model, &self.canonicalizer, settings.keyword_count)
            .keywords(summary.text(), vocabulary)?;

        let note = vault::render_note(filename, summary.text(), &keywords);

        if self.interrupt.is_set() {
            return Err(RecapError::Interrupted);
        }

        let path = vault::write_note(&self.config.output_path(), &title, &note, &self.written)?;
        self.written.insert(path.clone());
        self.ledger.mark_done(filename)?;

        Ok(ProcessedDocument {
            source: filename.to_string(),
            title,
            path,
            summary_kind: summary.kind(),
            keywords,
        })
    }
}

/// Split the input directory into pending, done and excluded filenames
pub fn plan_inputs(config: &RecapConfig, ledger: &ProcessingLedger) -> Result<BatchPlan> {
    let mut plan = BatchPlan::default();

    for filename in vault::list_inputs(&config.input_path())? {
        if config.is_excluded(&filename) {
            plan.excluded.push(filename);
        } else if ledger.is_done(&filename) {
            plan.done.push(filename);
        } else {
            plan.pending.push(filename);
        }
    }

    Ok(plan)
}
