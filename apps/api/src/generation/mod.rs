//! Résumé and cover-letter generation.
//!
//! `prompts` holds the templates and builders, `schema` the declared output
//! shape for schema-constrained calls, and `pipeline` the gate → prompt →
//! LLM → parse → record sequence behind each generation route.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod schema;
