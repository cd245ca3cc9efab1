use std::fmt;
use std::ops::Range;

use kotoba_dom::AttributesMap;
use strum_macros::Display;

/// A tag fragment decomposed into its name and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagData {
    /// Element name, case as written, without `<`, `/` or `>`.
    pub name: String,
    /// Attributes in declaration order.
    pub attributes: AttributesMap,
    /// The fragment exactly as it appeared, `<` to `>` inclusive.
    pub raw: String,
    /// Byte range of `raw` in the normalized input.
    pub span: Range<usize>,
}

/// The kind of a [`Token`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    /// Content between tags.
    Data,
    /// `<name ...>`
    OpenTag,
    /// `</name>`
    CloseTag,
    /// `<name .../>` or a void element.
    SoloTag,
    /// A tag whose name contains `-`, `:`, `_` or `?`.
    IrregularTag,
}

/// A classified fragment of the input.
///
/// Tokens are independent of one another; their order is the only structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Content between tags, carried verbatim.
    Data {
        /// The fragment text, untrimmed.
        text: String,
        /// Byte range of `text` in the normalized input.
        span: Range<usize>,
    },
    /// Opens an element that may have children.
    OpenTag(TagData),
    /// Closes the innermost open element.
    CloseTag(TagData),
    /// A self-closing element: explicit `/>` syntax or a registered void element.
    SoloTag(TagData),
    /// A custom or processing-instruction-like element. Never has children.
    IrregularTag(TagData),
}

impl Token {
    /// The variant of this token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::Data { .. } => TokenKind::Data,
            Self::OpenTag(_) => TokenKind::OpenTag,
            Self::CloseTag(_) => TokenKind::CloseTag,
            Self::SoloTag(_) => TokenKind::SoloTag,
            Self::IrregularTag(_) => TokenKind::IrregularTag,
        }
    }

    /// The tag payload, for every variant except [`Token::Data`].
    #[must_use]
    pub const fn tag(&self) -> Option<&TagData> {
        match self {
            Self::Data { .. } => None,
            Self::OpenTag(tag) | Self::CloseTag(tag) | Self::SoloTag(tag) | Self::IrregularTag(tag) => {
                Some(tag)
            }
        }
    }

    /// Element name, or `None` for data.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.tag().map(|t| t.name.as_str())
    }

    /// Attributes, or `None` for data.
    #[must_use]
    pub fn attributes(&self) -> Option<&AttributesMap> {
        self.tag().map(|t| &t.attributes)
    }

    /// The literal source text this token was built from.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::Data { text, .. } => text,
            Self::OpenTag(tag) | Self::CloseTag(tag) | Self::SoloTag(tag) | Self::IrregularTag(tag) => {
                &tag.raw
            }
        }
    }

    /// Byte range of [`Token::raw`] in the normalized input.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Data { span, .. } => span.clone(),
            Self::OpenTag(tag) | Self::CloseTag(tag) | Self::SoloTag(tag) | Self::IrregularTag(tag) => {
                tag.span.clone()
            }
        }
    }

    /// Returns true for any element variant.
    #[must_use]
    pub const fn is_element(&self) -> bool {
        !matches!(self, Self::Data { .. })
    }
}

/// Writes the token's source text, so joining tokens re-serializes them.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}
