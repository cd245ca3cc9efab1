//! Once-per-message warnings for the tree builder.
//!
//! Kotoba reports unclosed elements at end of input through this module. The
//! same element name left open in many documents (or many times in a batch
//! run of the CLI) produces one `warn` record, while each parse still gets the
//! full list in its `ParseIssue`s.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// `"[component] message"` keys already sent to the logger.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Log `message` at `warn` level, tagged with the reporting `component`,
/// unless the same pair was logged before in this process.
///
/// Returns `true` if a record was emitted.
///
/// # Example
/// ```ignore
/// let _ = warn_once("Tree Builder", "unclosed <body> at end of input");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time {
        log::warn!("[Kotoba {component}] {message}");
    }
    first_time
}

/// Forget every message logged so far, so the next occurrence of each is
/// logged again.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_is_suppressed() {
        let message = "test_duplicate_message_is_suppressed";
        assert!(warn_once("Test", message));
        assert!(!warn_once("Test", message));
    }

    #[test]
    fn test_same_message_from_other_component_is_logged() {
        let message = "test_same_message_from_other_component_is_logged";
        assert!(warn_once("Tokenizer", message));
        assert!(warn_once("Tree Builder", message));
    }
}
