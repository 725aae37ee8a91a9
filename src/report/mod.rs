//! Report rendering.
//!
//! Consumes the finished [`crate::models::ContractReport`] read-only
//! and renders it as Markdown or JSON.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};
