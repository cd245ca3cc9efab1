//! Decomposition of a tag's raw attribute span into an [`AttributesMap`].

use kotoba_dom::{AttributeValue, AttributesMap};

use crate::error::TokenizeError;

/// Cursor over the attribute span of one tag.
struct AttributeCursor<'a> {
    span: &'a str,
    pos: usize,
    /// Element name, for error messages.
    tag: &'a str,
    /// Offset of `span` in the normalized input.
    base_offset: usize,
}

impl<'a> AttributeCursor<'a> {
    fn current(&self) -> Option<char> {
        self.span[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.span[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Advance over `[^\s='"]*` and return what was consumed.
    fn take_while_unquoted(&mut self, stop_at_equals: bool) -> &'a str {
        let span = self.span;
        let rest = &span[self.pos..];
        let len = rest
            .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || (stop_at_equals && c == '='))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn malformed(&self, reason: &'static str) -> TokenizeError {
        TokenizeError::MalformedAttribute {
            tag: self.tag.to_string(),
            offset: self.base_offset + self.pos,
            reason,
        }
    }

    /// Parse the value after `=`. The cursor sits just past the `=`.
    fn value(&mut self) -> Result<AttributeValue, TokenizeError> {
        self.skip_whitespace();
        match self.current() {
            Some(quote @ ('"' | '\'')) => {
                let start = self.pos + quote.len_utf8();
                let Some(len) = self.span[start..].find(quote) else {
                    return Err(self.malformed("unterminated quoted value"));
                };
                self.pos = start + len + quote.len_utf8();
                Ok(AttributeValue::Text(self.span[start..start + len].to_string()))
            }
            Some(_) => {
                let value = self.take_while_unquoted(false);
                if value.is_empty() {
                    return Err(self.malformed("expected attribute value"));
                }
                Ok(AttributeValue::Text(value.to_string()))
            }
            None => Err(self.malformed("expected attribute value after `=`")),
        }
    }
}

/// Decompose `span` into attributes.
///
/// Every attribute is either `name="value"`, `name='value'`, `name=value` or a
/// bare `name`, separated by whitespace. A repeated name, or text at which no
/// attribute can start, is an error: the cursor never silently skips input.
pub(crate) fn decompose(
    span: &str,
    tag: &str,
    base_offset: usize,
) -> Result<AttributesMap, TokenizeError> {
    let mut attributes = AttributesMap::new();
    let mut cursor = AttributeCursor {
        span,
        pos: 0,
        tag,
        base_offset,
    };

    loop {
        cursor.skip_whitespace();
        if cursor.current().is_none() {
            break;
        }

        let name_offset = cursor.pos;
        let name = cursor.take_while_unquoted(true);
        if name.is_empty() {
            return Err(cursor.malformed("expected attribute name"));
        }

        cursor.skip_whitespace();
        let value = if cursor.current() == Some('=') {
            cursor.pos += 1;
            cursor.value()?
        } else {
            AttributeValue::Present
        };

        if attributes.contains(name) {
            return Err(TokenizeError::DuplicateAttribute {
                tag: tag.to_string(),
                name: name.to_string(),
                offset: base_offset + name_offset,
            });
        }
        let _ = attributes.set(name, value);
    }

    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(attributes: &AttributesMap) -> Vec<(&str, Option<&str>)> {
        attributes.iter().map(|(n, v)| (n, v.as_str())).collect()
    }

    #[test]
    fn test_empty_span() {
        assert!(decompose("", "div", 0).unwrap().is_empty());
    }

    #[test]
    fn test_quoted_and_bare_attributes_keep_order() {
        let attrs = decompose(r#"href="x" data-y class='a b'"#, "a", 0).unwrap();
        assert_eq!(
            pairs(&attrs),
            [("href", Some("x")), ("data-y", None), ("class", Some("a b"))]
        );
        assert!(attrs.get("data-y").unwrap().is_present_marker());
    }

    #[test]
    fn test_quote_of_other_kind_is_literal() {
        let attrs = decompose(r#"title="it's" alt='say "hi"'"#, "img", 0).unwrap();
        assert_eq!(
            pairs(&attrs),
            [("title", Some("it's")), ("alt", Some(r#"say "hi""#))]
        );
    }

    #[test]
    fn test_whitespace_around_equals() {
        let attrs = decompose(r#"id = "main""#, "div", 0).unwrap();
        assert_eq!(pairs(&attrs), [("id", Some("main"))]);
    }

    #[test]
    fn test_unquoted_value() {
        let attrs = decompose("width=100 hidden", "td", 0).unwrap();
        assert_eq!(pairs(&attrs), [("width", Some("100")), ("hidden", None)]);
    }

    #[test]
    fn test_empty_quoted_value_is_not_present_marker() {
        let attrs = decompose(r#"value="""#, "input", 0).unwrap();
        assert_eq!(pairs(&attrs), [("value", Some(""))]);
    }

    #[test]
    fn test_duplicate_attribute_is_an_error() {
        let err = decompose(r#"id="a" id="b""#, "p", 10).unwrap_err();
        assert_eq!(
            err,
            TokenizeError::DuplicateAttribute {
                tag: "p".to_string(),
                name: "id".to_string(),
                offset: 17,
            }
        );
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        let err = decompose(r#"title="open"#, "a", 0).unwrap_err();
        assert!(matches!(err, TokenizeError::MalformedAttribute { offset: 6, .. }));
    }

    #[test]
    fn test_stray_quote_stalls_cursor() {
        let err = decompose(r#""orphan""#, "a", 3).unwrap_err();
        assert!(matches!(
            err,
            TokenizeError::MalformedAttribute { offset: 3, reason: "expected attribute name", .. }
        ));
    }

    #[test]
    fn test_missing_value_after_equals() {
        let err = decompose("alt=", "img", 0).unwrap_err();
        assert!(matches!(err, TokenizeError::MalformedAttribute { offset: 4, .. }));
    }

    #[test]
    fn test_stray_equals_is_an_error() {
        let err = decompose(r#"="x""#, "a", 0).unwrap_err();
        assert!(matches!(err, TokenizeError::MalformedAttribute { offset: 0, .. }));
    }
}
