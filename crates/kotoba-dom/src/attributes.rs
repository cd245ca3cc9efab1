//! Insertion-ordered attribute storage for element tokens and nodes.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// The value of a single attribute.
///
/// Markup allows an attribute to be written without a value (`<input disabled>`),
/// which is distinct from an explicitly empty value (`<input value="">`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    /// A quoted value, without its delimiters.
    Text(String),
    /// The attribute was written as a bare name.
    Present,
}

impl AttributeValue {
    /// Returns the textual value, or `None` for a bare attribute.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Present => None,
        }
    }

    /// Returns true if the attribute was written without a value.
    #[must_use]
    pub const fn is_present_marker(&self) -> bool {
        matches!(self, Self::Present)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => write!(f, "\"{value}\""),
            Self::Present => write!(f, "(present)"),
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(value) => serializer.serialize_str(value),
            Self::Present => serializer.serialize_bool(true),
        }
    }
}

/// Map of attribute names to values, preserving the order in which names
/// were first set.
///
/// Elements rarely carry more than a handful of attributes, so lookups are a
/// linear scan over a vector rather than a hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributesMap {
    entries: Vec<(String, AttributeValue)>,
}

impl AttributesMap {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set `name` to `value`.
    ///
    /// A name that is already present keeps its original position and has its
    /// value replaced; the previous value is returned.
    pub fn set(&mut self, name: impl Into<String>, value: AttributeValue) -> Option<AttributeValue> {
        let name = name.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((name, value));
        None
    }

    /// Look up the value stored for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Returns true if `name` has been set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no attributes are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Iterate over attribute names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<N: Into<String>> FromIterator<(N, AttributeValue)> for AttributesMap {
    fn from_iter<I: IntoIterator<Item = (N, AttributeValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            let _ = map.set(name, value);
        }
        map
    }
}

impl fmt::Display for AttributesMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match value {
                AttributeValue::Text(text) => write!(f, "{name}=\"{text}\"")?,
                AttributeValue::Present => write!(f, "{name}")?,
            }
        }
        Ok(())
    }
}

impl Serialize for AttributesMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
