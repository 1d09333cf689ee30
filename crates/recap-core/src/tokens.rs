//! Token cost estimation for language-model context budgets

use tiktoken_rs::CoreBPE;

use crate::error::{RecapError, Result};

/// Estimates how many context units a piece of text costs.
///
/// Implementations must be deterministic for a fixed input. Costs are not
/// required to be additive under concatenation.
pub trait TokenCounter {
    fn cost(&self, text: &str) -> usize;
}

/// Byte-pair encoding counter matching the `gpt-3.5-turbo` family
pub struct BpeTokenCounter {
    bpe: CoreBPE,
}

impl BpeTokenCounter {
    /// Load the `cl100k_base` encoding.
    ///
    /// Failure here means no budget can be enforced, so callers treat it as
    /// fatal for the whole run.
    pub fn cl100k() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| RecapError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for BpeTokenCounter {
    fn cost(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

impl std::fmt::Debug for BpeTokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BpeTokenCounter").finish_non_exhaustive()
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn cost(&self, text: &str) -> usize {
        (**self).cost(text)
    }
}
