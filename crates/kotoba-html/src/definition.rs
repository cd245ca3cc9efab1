//! Static element definitions.
//!
//! Elements that can never contain children ("void" elements) are
//! classified as self-closing even when written without a trailing `/`.
//! Raw-text elements have bodies that are carried as opaque content and
//! never re-scanned for tags.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// How an element behaves during tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definition {
    /// The element never has children or a closing tag.
    pub self_closing: bool,
    /// The element's body is opaque text up to its own closing tag.
    pub raw_text: bool,
}

/// Every element with a non-default [`Definition`].
///
/// Names parse ASCII case-insensitively (`<BR>` is a `br`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum KnownElement {
    /// `<area>`
    Area,
    /// `<base>`
    Base,
    /// `<br>`
    Br,
    /// `<col>`
    Col,
    /// `<embed>`
    Embed,
    /// `<hr>`
    Hr,
    /// `<img>`
    Img,
    /// `<input>`
    Input,
    /// `<link>`
    Link,
    /// `<meta>`
    Meta,
    /// `<param>`
    Param,
    /// `<source>`
    Source,
    /// `<track>`
    Track,
    /// `<wbr>`
    Wbr,
    /// `<script>`
    Script,
    /// `<style>`
    Style,
}

impl KnownElement {
    /// The definition registered for this element.
    #[must_use]
    pub const fn definition(self) -> Definition {
        match self {
            Self::Script | Self::Style => Definition {
                self_closing: false,
                raw_text: true,
            },
            _ => Definition {
                self_closing: true,
                raw_text: false,
            },
        }
    }
}

/// Look up the definition for an element name, if it has one.
#[must_use]
pub fn lookup(name: &str) -> Option<Definition> {
    name.parse::<KnownElement>().ok().map(KnownElement::definition)
}

/// Returns true if `name` is a void element.
#[must_use]
pub fn is_self_closing(name: &str) -> bool {
    lookup(name).is_some_and(|d| d.self_closing)
}

/// Returns true if `name` is a raw-text element (`script`, `style`).
#[must_use]
pub fn is_raw_text(name: &str) -> bool {
    lookup(name).is_some_and(|d| d.raw_text)
}
