use super::attributes::decompose;
use super::helpers::{is_irregular_name, split_tag};
use super::normalize::normalize;
use super::scanner::{Fragment, FragmentKind, segment};
use super::token::{TagData, Token};
use crate::definition;
use crate::error::TokenizeError;

/// Default lookahead budget for finding the `>` that closes a `<`.
pub const DEFAULT_MAX_TAG_LENGTH: usize = 64 * 1024;

/// Converts a complete document into an ordered sequence of [`Token`]s.
///
/// Tokenization runs in three passes over a fully buffered input:
/// normalization (line endings, comments, declarations), fragment
/// segmentation, and classification of each fragment.
pub struct MarkupTokenizer {
    input: String,
    normalized: String,
    max_tag_length: Option<usize>,
    keep_whitespace: bool,
    token_stream: Vec<Token>,
}

impl MarkupTokenizer {
    /// Create a tokenizer over `input`.
    #[must_use]
    pub const fn new(input: String) -> Self {
        Self {
            input,
            normalized: String::new(),
            max_tag_length: Some(DEFAULT_MAX_TAG_LENGTH),
            keep_whitespace: false,
            token_stream: Vec::new(),
        }
    }

    /// Bound how far past a `<` the scanner looks for its `>`.
    ///
    /// A `<` whose `>` lies beyond the budget is treated as literal text.
    /// `None` removes the bound.
    #[must_use]
    pub const fn with_max_tag_length(mut self, limit: Option<usize>) -> Self {
        self.max_tag_length = limit;
        self
    }

    /// Keep whitespace-only content between tags as [`Token::Data`].
    ///
    /// Off by default. With it on, the tokens' source text concatenates back
    /// to the normalized input exactly.
    #[must_use]
    pub const fn with_whitespace_data(mut self, keep: bool) -> Self {
        self.keep_whitespace = keep;
        self
    }

    /// Run the tokenizer to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenizeError`] if any tag's attributes cannot be
    /// decomposed. No tokens are kept in that case.
    pub fn run(&mut self) -> Result<(), TokenizeError> {
        self.normalized = normalize(&self.input);
        self.token_stream.clear();

        let fragments = segment(&self.normalized, self.max_tag_length);
        let mut tokens = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            if let Some(token) = self.classify(fragment)? {
                log::debug!("{} [{}]", token.kind(), token.raw().trim());
                tokens.push(token);
            }
        }

        self.token_stream = tokens;
        Ok(())
    }

    /// The input after line-ending normalization and comment stripping.
    ///
    /// Token spans index into this string. Empty until [`Self::run`].
    #[must_use]
    pub fn normalized_input(&self) -> &str {
        &self.normalized
    }

    /// Tokens produced by the last [`Self::run`].
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.token_stream
    }

    /// Consume the tokenizer and return its tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Classify one fragment, in precedence order:
    /// empty, irregular, close, solo, open, data.
    fn classify(&self, fragment: Fragment<'_>) -> Result<Option<Token>, TokenizeError> {
        let trimmed = fragment.text.trim();
        if trimmed.is_empty() && !self.keep_whitespace {
            return Ok(None);
        }

        let parts = match fragment.kind {
            FragmentKind::Tag => split_tag(fragment.text),
            FragmentKind::Content => None,
        };
        let Some(parts) = parts else {
            return Ok(Some(Token::Data {
                text: fragment.text.to_string(),
                span: fragment.span,
            }));
        };

        let attributes = decompose(
            parts.attributes,
            parts.name,
            fragment.span.start + parts.attributes_offset,
        )?;
        let tag = TagData {
            name: parts.name.to_string(),
            attributes,
            raw: fragment.text.to_string(),
            span: fragment.span,
        };

        let token = if is_irregular_name(parts.name) {
            Token::IrregularTag(tag)
        } else if parts.closing {
            Token::CloseTag(tag)
        } else if parts.self_closing || definition::is_self_closing(parts.name) {
            Token::SoloTag(tag)
        } else {
            Token::OpenTag(tag)
        };
        Ok(Some(token))
    }
}

/// Tokenize `input` with default settings.
///
/// # Errors
///
/// Returns a [`TokenizeError`] on malformed attribute syntax.
pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizeError> {
    let mut tokenizer = MarkupTokenizer::new(input.to_string());
    tokenizer.run()?;
    Ok(tokenizer.into_tokens())
}
