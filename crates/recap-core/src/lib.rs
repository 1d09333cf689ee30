//! Recap Core Library
//!
//! Summarization pipeline that distills conversation transcripts into
//! linked notes: chunking, map-reduce summarization, titles, keywords,
//! and a resumable batch driver.

pub mod batch;
pub mod chunk;
pub mod config;
pub mod error;
pub mod interrupt;
pub mod keywords;
pub mod ledger;
pub mod link;
pub mod llm;
pub mod logging;
pub mod summarize;
pub mod title;
pub mod tokens;
pub mod vault;
