//! Fragment segmentation.
//!
//! The scanner jumps from one `<` to the next instead of stepping through the
//! input a character at a time, then extends the window to the `>` that
//! ends the tag, skipping quoted attribute values. Text between tags accumulates and is flushed as a content fragment
//! just before the tag that ends it. Fragments cover the input in order,
//! with no gaps or overlaps.

use std::ops::Range;

use memchr::memchr;

use super::helpers::{find_raw_text_close_tag, find_tag_end, split_tag};
use crate::definition;

/// Whether a fragment is a `<...>` candidate or text between tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FragmentKind {
    Tag,
    Content,
}

/// A contiguous slice of the normalized input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fragment<'a> {
    pub kind: FragmentKind,
    pub text: &'a str,
    pub span: Range<usize>,
}

pub(crate) struct FragmentScanner<'a> {
    input: &'a str,
    /// Start of the pending (not yet flushed) text.
    pos: usize,
    /// Where the next search for `<` begins. May run ahead of `pos` when a
    /// `<` turned out to be literal text.
    search_from: usize,
    /// Set while inside a raw-text element: the name whose close tag ends it.
    raw_text_element: Option<&'a str>,
    /// Maximum distance from a `<` to its `>`; `None` is unbounded.
    max_tag_length: Option<usize>,
    fragments: Vec<Fragment<'a>>,
}

impl<'a> FragmentScanner<'a> {
    pub(crate) const fn new(input: &'a str, max_tag_length: Option<usize>) -> Self {
        Self {
            input,
            pos: 0,
            search_from: 0,
            raw_text_element: None,
            max_tag_length,
            fragments: Vec::new(),
        }
    }

    /// Segment the whole input.
    pub(crate) fn run(mut self) -> Vec<Fragment<'a>> {
        while self.pos < self.input.len() {
            let more = match self.raw_text_element {
                Some(name) => self.scan_raw_text(name),
                None => self.scan_next_tag(),
            };
            if !more {
                break;
            }
        }
        self.fragments
    }

    fn flush(&mut self, kind: FragmentKind, span: Range<usize>) {
        if span.is_empty() {
            return;
        }
        let input = self.input;
        let text = &input[span.clone()];
        log::trace!("{kind:?} fragment at {span:?}");
        self.fragments.push(Fragment { kind, text, span });
    }

    fn flush_tail(&mut self) {
        self.flush(FragmentKind::Content, self.pos..self.input.len());
        self.pos = self.input.len();
    }

    /// Emit everything up to the raw-text element's own close tag as one
    /// content fragment, followed by the close tag.
    fn scan_raw_text(&mut self, name: &'a str) -> bool {
        let input = self.input;
        match find_raw_text_close_tag(&input[self.pos..], name) {
            Some((start, end)) => {
                let (start, end) = (self.pos + start, self.pos + end);
                self.flush(FragmentKind::Content, self.pos..start);
                self.flush(FragmentKind::Tag, start..end);
                self.pos = end;
                self.search_from = end;
                self.raw_text_element = None;
                true
            }
            None => {
                log::debug!("raw-text <{name}> is never closed; remaining input is content");
                self.flush_tail();
                false
            }
        }
    }

    /// Jump to the next `<` and extend to the `>` that ends it.
    fn scan_next_tag(&mut self) -> bool {
        let input = self.input;
        let bytes = input.as_bytes();
        let Some(rel) = memchr(b'<', &bytes[self.search_from..]) else {
            self.flush_tail();
            return false;
        };
        let lt = self.search_from + rel;

        let window_end = self.max_tag_length.map_or(bytes.len(), |limit| {
            lt.saturating_add(1).saturating_add(limit).min(bytes.len())
        });
        let Some(rel) = find_tag_end(&bytes[lt + 1..window_end]) else {
            if window_end == bytes.len() {
                // No `>` anywhere after this point, so no later `<` can close either.
                self.flush_tail();
                return false;
            }
            log::trace!("no `>` within {window_end} bytes of `<` at {lt}; treating it as text");
            self.search_from = lt + 1;
            return true;
        };
        let gt = lt + 1 + rel;

        self.flush(FragmentKind::Content, self.pos..lt);
        self.flush(FragmentKind::Tag, lt..gt + 1);
        self.raw_text_element = opens_raw_text(&input[lt..=gt]);
        self.pos = gt + 1;
        self.search_from = self.pos;
        true
    }
}

/// If `tag` opens a raw-text element, return its name.
fn opens_raw_text(tag: &str) -> Option<&str> {
    let parts = split_tag(tag)?;
    (!parts.closing && !parts.self_closing && definition::is_raw_text(parts.name))
        .then_some(parts.name)
}

/// Segment `input` into tag and content fragments.
pub(crate) fn segment(input: &str, max_tag_length: Option<usize>) -> Vec<Fragment<'_>> {
    FragmentScanner::new(input, max_tag_length).run()
}
