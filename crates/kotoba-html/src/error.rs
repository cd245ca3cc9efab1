//! Error kinds surfaced by tokenization and tree building.

use thiserror::Error;

/// Attribute-syntax errors raised while decomposing a tag.
///
/// Any of these aborts the whole `tokenize` call; a fragment is never
/// half-tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// The same attribute name appears twice in one tag.
    #[error("attribute syntax error in <{tag}> at byte {offset}: duplicate attribute `{name}`")]
    DuplicateAttribute {
        /// Element name of the offending tag.
        tag: String,
        /// The repeated attribute name.
        name: String,
        /// Byte offset of the repeat in the normalized input.
        offset: usize,
    },

    /// The attribute cursor could not advance.
    #[error("attribute syntax error in <{tag}> at byte {offset}: {reason}")]
    MalformedAttribute {
        /// Element name of the offending tag.
        tag: String,
        /// Byte offset in the normalized input where decomposition stalled.
        offset: usize,
        /// What was expected at `offset`.
        reason: &'static str,
    },
}

/// Structural errors raised by the tree builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A close tag does not match the innermost open element.
    #[error("unbalanced markup: expected close of `<{expected}>`, found `</{found}>` (token {token_index})")]
    UnbalancedMarkup {
        /// Name of the innermost open element.
        expected: String,
        /// Name carried by the close tag.
        found: String,
        /// Index of the close tag in the token sequence.
        token_index: usize,
    },

    /// A close tag appeared while no element was open.
    #[error("unbalanced markup: found `</{found}>` with no open element (token {token_index})")]
    UnexpectedCloseTag {
        /// Name carried by the close tag.
        found: String,
        /// Index of the close tag in the token sequence.
        token_index: usize,
    },

    /// Elements were still open at end of input (strict mode only).
    #[error("unclosed tags at end of input: {}", .open.join(", "))]
    UnclosedTags {
        /// Names of the open elements, outermost first.
        open: Vec<String>,
    },
}

/// Any failure from [`crate::parse_document`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Tokenization failed.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    /// Tree building failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
