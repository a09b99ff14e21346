//! Text-mutation classification
//!
//! Pure and total: every event maps to exactly one [`ChangeCategory`] with
//! no side effects.

use feedback_types::{labels, ChangeCategory, Classification, TextMutationEvent};

/// Classifies a raw text-mutation event into a semantic category.
///
/// Rules, in order:
/// 1. Insertion beginning with `'\n'` or `'\r'` is a [`ChangeCategory::Newline`].
/// 2. Any other non-empty insertion is an [`ChangeCategory::Insert`], labeled
///    by its **first character only** (multi-character insertions such as
///    paste are labeled by their first character).
/// 3. An empty insertion with removed characters is a [`ChangeCategory::Delete`].
/// 4. Anything else carries no information and maps to [`ChangeCategory::None`].
///
/// When `labels_enabled` is false the label is skipped entirely; the category
/// is unaffected.
pub fn classify(event: &TextMutationEvent, labels_enabled: bool) -> Classification {
    match event.inserted_text.chars().next() {
        Some('\n') | Some('\r') => Classification::bare(ChangeCategory::Newline),
        Some(first) => Classification {
            category: ChangeCategory::Insert,
            label: if labels_enabled { char_label(first) } else { None },
        },
        None if event.removed_len > 0 => Classification {
            category: ChangeCategory::Delete,
            label: if labels_enabled {
                Some(labels::BACKSPACE.to_string())
            } else {
                None
            },
        },
        None => Classification::bare(ChangeCategory::None),
    }
}

/// Label for a single inserted character
///
/// Newlines produce an empty label, which is suppressed to `None`.
fn char_label(ch: char) -> Option<String> {
    match ch {
        '\n' => None,
        '\t' => Some(labels::TAB.to_string()),
        c if c.is_whitespace() => Some(labels::SPACE.to_string()),
        c => Some(c.to_string()),
    }
}
