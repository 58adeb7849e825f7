//! Command implementations
//!
//! - `porcelain`: User-facing operations, one `impl Repository` block each
//! - `intent`: Request/response surface over the porcelain
//! - `parser`: Terminal command grammar
//! - `shell`: Line-oriented terminal driving a shared repository

pub mod intent;
pub mod parser;
pub mod porcelain;
pub mod shell;
