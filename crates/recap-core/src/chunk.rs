//! Token-budgeted chunking of transcripts into fragments

use crate::tokens::TokenCounter;

/// An ordered run of whitespace-delimited words from one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Words joined by single spaces
    pub text: String,
    /// Sum of the per-word costs of `text`
    pub cost: usize,
}

impl Fragment {
    fn empty() -> Self {
        Self {
            text: String::new(),
            cost: 0,
        }
    }

    fn push(&mut self, word: &str, cost: usize) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(word);
        self.cost += cost;
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Split `text` into fragments whose cost stays within `budget`.
///
/// Words are never split: a word that alone exceeds the budget becomes its
/// own oversized fragment. An empty document yields a single empty fragment.
/// Joining the fragments with single spaces gives back the document's words.
pub fn chunk<C: TokenCounter + ?Sized>(text: &str, budget: usize, counter: &C) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut current = Fragment::empty();

    for word in text.split_whitespace() {
        let cost = counter.cost(word);
        if current.cost + cost > budget && !current.is_empty() {
            fragments.push(std::mem::replace(&mut current, Fragment::empty()));
        }
        current.push(word, cost);
    }

    fragments.push(current);

    tracing::debug!(
        fragments = fragments.len(),
        budget,
        oversized = fragments.iter().filter(|f| f.cost > budget).count(),
        "chunked"
    );

    fragments
}
