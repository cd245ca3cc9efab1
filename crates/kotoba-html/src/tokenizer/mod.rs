//! Markup tokenizer.
//!
//! Turns a complete document into a flat sequence of classified tokens:
//! data, open tags, close tags, self-closing tags and irregular tags.

/// Attribute span decomposition.
mod attributes;
/// The tokenizer driver and fragment classification.
pub mod core;
/// Tag splitting and raw-text close-tag search.
mod helpers;
/// Line-ending normalization and comment/declaration stripping.
mod normalize;
/// Jumping fragment scanner.
mod scanner;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::core::{DEFAULT_MAX_TAG_LENGTH, MarkupTokenizer, tokenize};
pub use token::{TagData, Token, TokenKind};
