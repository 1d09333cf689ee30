//! Short note titles derived from a summary

use crate::bail_parse;
use crate::error::Result;
use crate::llm::{prompts, LanguageModel};

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\u{201C}' | '\u{201D}')
}

/// Take the text between the first and second quotation marks.
///
/// A response with fewer than two quotation marks, or with nothing but
/// whitespace between them, is a parse failure.
pub fn parse_title(response: &str) -> Result<String> {
    let mut parts = response.split(is_quote);
    parts.next();

    match (parts.next(), parts.next()) {
        (Some(title), Some(_)) if !title.trim().is_empty() => Ok(title.trim().to_string()),
        _ => bail_parse!("title", response),
    }
}

/// Ask the model for a title of three words or fewer
#[tracing::instrument(skip_all)]
pub fn generate_title<M: LanguageModel + ?Sized>(model: &M, summary: &str) -> Result<String> {
    let response = model.complete(prompts::TITLE_SYSTEM, &prompts::title_prompt(summary))?;
    let title = parse_title(&response)?;
    tracing::info!(title = %title, "title");
    Ok(title)
}
