//! Common utilities for the Kotoba markup parser.
//!
//! This crate provides shared infrastructure used by the tokenizer, the tree
//! builder and the command-line driver:
//! - **Warning System** - deduplicated warnings routed through the `log` facade

pub mod warning;
