//! doclens - interactive document analysis.
//!
//! Loads PDF and text documents and either analyzes them locally (word
//! frequencies, contextual search, descriptive statistics) or answers
//! questions about them with a remote language model.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod documents;
pub mod export;
pub mod history;
pub mod llm;
pub mod models;
