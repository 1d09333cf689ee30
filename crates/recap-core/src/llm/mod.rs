//! Language model service abstraction
//!
//! Every call site issues one blocking request made of a fixed system
//! instruction and a user prompt; the first textual choice is returned.

pub mod openai;
pub mod prompts;

use crate::error::{RecapError, Result};
use crate::interrupt::Interrupt;

pub use openai::OpenAiClient;

/// A chat-style completion service
pub trait LanguageModel {
    /// Send one system instruction plus prompt and return the reply text
    fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

impl<T: LanguageModel + ?Sized> LanguageModel for &T {
    fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        (**self).complete(system, prompt)
    }
}

impl<T: LanguageModel + ?Sized> LanguageModel for Box<T> {
    fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        (**self).complete(system, prompt)
    }
}

/// Wraps a model so no call starts, or is handed back, once the run has
/// been cancelled.
pub struct InterruptibleModel<M> {
    inner: M,
    interrupt: Interrupt,
}

impl<M: LanguageModel> InterruptibleModel<M> {
    pub fn new(inner: M, interrupt: Interrupt) -> Self {
        Self { inner, interrupt }
    }
}

impl<M: LanguageModel> LanguageModel for InterruptibleModel<M> {
    fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        if self.interrupt.is_set() {
            return Err(RecapError::Interrupted);
        }
        let reply = self.inner.complete(system, prompt)?;
        if self.interrupt.is_set() {
            return Err(RecapError::Interrupted);
        }
        Ok(reply)
    }
}
