//! plainpolicy - plain-English summaries of government policy documents.
//!
//! Turns an uploaded policy document (plain text, PDF, or Word) or pasted text
//! into a short summary plus three pros and three cons, generated by a hosted
//! language model.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod extract;
pub mod llm;
pub mod markup;
pub mod server;
pub mod upload;
