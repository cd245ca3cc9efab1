//! Helpers shared by the fragment scanner and the classifier.

use memchr::memchr;

/// Characters that mark a tag name as irregular (custom elements,
/// namespaced names, processing instructions).
const IRREGULAR_NAME_CHARS: [char; 4] = ['-', ':', '_', '?'];

/// The pieces of a `<...>` fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TagParts<'a> {
    /// Leading name, without `<` or `/`.
    pub name: &'a str,
    /// Everything between the name and the closing `>` / `/>`, trimmed.
    pub attributes: &'a str,
    /// Byte offset of `attributes` within the fragment.
    pub attributes_offset: usize,
    /// The fragment starts with `</`.
    pub closing: bool,
    /// The fragment ends with `/>`.
    pub self_closing: bool,
}

/// Split a tag fragment into name and attribute span.
///
/// Returns `None` unless the fragment starts with `<`, ends with `>`, and has
/// a name directly after `<` (or `</`). Text such as `a < b > c` therefore
/// never yields a tag.
pub(crate) fn split_tag(fragment: &str) -> Option<TagParts<'_>> {
    let inner = fragment.strip_prefix('<')?.strip_suffix('>')?;
    let mut start = 1;

    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => {
            start += 1;
            (true, rest)
        }
        None => (false, inner),
    };
    let (self_closing, mut inner) = match inner.strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };

    let name_end = inner
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = &inner[..name_end];
    if name.is_empty() {
        return None;
    }

    // `<?xml ... ?>`: the trailing `?` closes the instruction, it is not an attribute.
    if name.starts_with('?') && inner.len() > name_end {
        inner = inner.strip_suffix('?').unwrap_or(inner);
    }

    let rest = &inner[name_end..];
    let attributes = rest.trim();
    let leading = rest.len() - rest.trim_start().len();

    Some(TagParts {
        name,
        attributes,
        attributes_offset: start + name_end + leading,
        closing,
        self_closing,
    })
}

/// Returns true if a tag name contains one of `- : _ ?`.
pub(crate) fn is_irregular_name(name: &str) -> bool {
    name.contains(IRREGULAR_NAME_CHARS)
}

/// Find the `>` that ends a tag, given the bytes after its `<`.
///
/// A quote that follows `=` (whitespace allowed between) opens a value, and a
/// `>` inside that value does not end the tag. If the value's closing quote is
/// missing, the first `>` is used. Returns `None` only when `after_lt` holds
/// no `>` at all.
pub(crate) fn find_tag_end(after_lt: &[u8]) -> Option<usize> {
    let first = memchr(b'>', after_lt)?;
    let mut expecting_value = false;
    let mut i = 0;
    while i < after_lt.len() {
        match after_lt[i] {
            b'>' => return Some(i),
            b'=' => expecting_value = true,
            quote @ (b'"' | b'\'') if expecting_value => {
                let Some(rel) = memchr(quote, &after_lt[i + 1..]) else {
                    return Some(first);
                };
                i += rel + 1;
                expecting_value = false;
            }
            byte if byte.is_ascii_whitespace() => {}
            _ => expecting_value = false,
        }
        i += 1;
    }
    Some(first)
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

/// Find `</name>` (ASCII case-insensitive, optional whitespace before `>`).
///
/// Returns the byte range of the closing tag within `haystack`.
pub(crate) fn find_raw_text_close_tag(haystack: &str, name: &str) -> Option<(usize, usize)> {
    let hay_bytes = haystack.as_bytes();
    let len = hay_bytes.len();
    let name_bytes = name.as_bytes();
    let mut i = 0;
    while i < len {
        // `<` cannot appear in a UTF-8 continuation byte, so every match is a
        // char boundary.
        let rel = memchr(b'<', &hay_bytes[i..])?;
        i += rel;
        if hay_bytes.get(i + 1) == Some(&b'/')
            && starts_with_ignore_ascii_case_at(hay_bytes, i + 2, name_bytes)
        {
            let mut k = i + 2 + name_bytes.len();
            while k < len && hay_bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && hay_bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_open_tag() {
        let parts = split_tag(r#"<a href="x" data-y>"#).unwrap();
        assert_eq!(parts.name, "a");
        assert_eq!(parts.attributes, r#"href="x" data-y"#);
        assert_eq!(parts.attributes_offset, 3);
        assert!(!parts.closing);
        assert!(!parts.self_closing);
    }

    #[test]
    fn test_split_close_tag() {
        let parts = split_tag("</div >").unwrap();
        assert_eq!(parts.name, "div");
        assert!(parts.attributes.is_empty());
        assert!(parts.closing);
    }

    #[test]
    fn test_split_self_closing_tag() {
        let parts = split_tag("<br/>").unwrap();
        assert_eq!(parts.name, "br");
        assert!(parts.self_closing);

        let parts = split_tag(r#"<img src="a.png" />"#).unwrap();
        assert_eq!(parts.name, "img");
        assert_eq!(parts.attributes, r#"src="a.png""#);
        assert!(parts.self_closing);
    }

    #[test]
    fn test_split_processing_instruction() {
        let parts = split_tag(r#"<?xml version="1.0"?>"#).unwrap();
        assert_eq!(parts.name, "?xml");
        assert_eq!(parts.attributes, r#"version="1.0""#);
    }

    #[test]
    fn test_split_rejects_nameless_fragments() {
        assert!(split_tag("< b and c >").is_none());
        assert!(split_tag("<>").is_none());
        assert!(split_tag("plain").is_none());
    }

    #[test]
    fn test_irregular_names() {
        assert!(is_irregular_name("ng-app"));
        assert!(is_irregular_name("svg:rect"));
        assert!(is_irregular_name("my_tag"));
        assert!(is_irregular_name("?php"));
        assert!(!is_irregular_name("div"));
    }

    #[test]
    fn test_tag_end_skips_quoted_values() {
        assert_eq!(find_tag_end(br#"a title="x > y">rest"#), Some(15));
        assert_eq!(find_tag_end(b"a title = 'a>b' >"), Some(16));
        assert_eq!(find_tag_end(b"p>x"), Some(1));
    }

    #[test]
    fn test_tag_end_ignores_quotes_outside_values() {
        assert_eq!(find_tag_end(br#"a "x>y">"#), Some(4));
        assert_eq!(find_tag_end(br#"a w=1"x>"#), Some(7));
    }

    #[test]
    fn test_tag_end_with_unclosed_value_uses_first_bracket() {
        assert_eq!(find_tag_end(br#"a title="oops>x</a>"#), Some(13));
        assert_eq!(find_tag_end(b"no bracket"), None);
    }

    #[test]
    fn test_find_raw_text_close_tag() {
        let body = "if (a < b) { x = '</scriptx>'; }</SCRIPT >tail";
        let (start, end) = find_raw_text_close_tag(body, "script").unwrap();
        assert_eq!(&body[start..end], "</SCRIPT >");
        assert_eq!(&body[end..], "tail");
    }

    #[test]
    fn test_find_raw_text_close_tag_missing() {
        assert_eq!(find_raw_text_close_tag("a < b", "style"), None);
        assert_eq!(find_raw_text_close_tag("</styl", "style"), None);
    }
}
