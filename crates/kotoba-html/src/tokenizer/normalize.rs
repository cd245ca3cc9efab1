//! Input normalization ahead of fragment scanning.
//!
//! Line endings are unified and markup that never produces a token
//! (comments and `<!...>` declarations) is removed, so that the scanner only
//! ever sees tags and content.

use std::sync::LazyLock;

use regex::Regex;

/// A comment, or a `<!...>` declaration such as a doctype.
///
/// The comment alternative is tried first at each position, so a comment body
/// containing `>` or `<!x>` is removed as one unit. An unterminated comment
/// or declaration runs to the end of input.
static MARKUP_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?(?:-->|\z)|<![^>]*(?:>|\z)").expect("declaration pattern is valid")
});

/// Unify line endings to `\n` and strip comments and declarations.
pub(crate) fn normalize(input: &str) -> String {
    let unified = input.replace("\r\n", "\n");
    let stripped = MARKUP_DECLARATION.replace_all(&unified, "");
    if stripped.len() != unified.len() {
        log::trace!(
            "stripped {} bytes of comments and declarations",
            unified.len() - stripped.len()
        );
    }
    stripped.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_becomes_lf() {
        assert_eq!(normalize("a\r\nb\nc"), "a\nb\nc");
    }

    #[test]
    fn test_lone_carriage_return_is_kept() {
        assert_eq!(normalize("a\rb"), "a\rb");
    }

    #[test]
    fn test_comment_is_removed() {
        assert_eq!(normalize("<p>a<!-- note -->b</p>"), "<p>ab</p>");
    }

    #[test]
    fn test_comment_containing_markup_is_removed_whole() {
        assert_eq!(
            normalize("<p><!-- <b>x</b> -> <!y> --></p>"),
            "<p></p>"
        );
    }

    #[test]
    fn test_multiline_comment_is_removed() {
        assert_eq!(normalize("a<!--\r\nline\r\n-->b"), "ab");
    }

    #[test]
    fn test_doctype_is_removed() {
        assert_eq!(normalize("<!DOCTYPE html>\n<html></html>"), "\n<html></html>");
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        assert_eq!(normalize("<p>a</p><!-- never closed <b>"), "<p>a</p>");
    }

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(normalize("a < b > c"), "a < b > c");
    }
}
