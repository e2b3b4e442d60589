//! Checklist item validation.
//!
//! Models happily emit filler such as `- 없음` or a lone dash under the
//! checklist heading. [`is_valid_checklist_item`] decides whether a candidate
//! is a real preparation item. It is used by the result parser and again by
//! the database layer whenever an item is created or renamed.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

static DASH_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-—─–\s]+$").expect("valid dash regex"));

static NOTHING_NEEDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:없음|없습니다|none\b|n/a\b|nothing\b|no\s+items?\b)|준비물\s*없|(?:nothing|no\s+items?)\s+(?:needed|required)",
    )
    .expect("valid nothing-needed regex")
});

static MARKER_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-•]\s*|\.+|_+|\s*)$").expect("valid marker regex"));

static MEANINGFUL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[가-힣a-zA-Z0-9]+").expect("valid meaningful regex"));

/// Minimum number of letters/digits a valid item must contain.
const MIN_MEANINGFUL_CHARS: usize = 3;

/// Returns `true` if `candidate` looks like an actual item to prepare.
///
/// Rejects empty strings, anything of two characters or less, dash-only
/// separators, "nothing needed" phrasings (`없음`, `준비물 없음`, `none`),
/// lone bullet markers, dots, underscores, and strings with fewer than three
/// Hangul/ASCII letters or digits.
pub fn is_valid_checklist_item(candidate: &str) -> bool {
    let cleaned = candidate.trim();
    if cleaned.chars().count() <= 2 {
        trace!(?candidate, "checklist candidate too short");
        return false;
    }
    if DASH_ONLY.is_match(cleaned) || MARKER_ONLY.is_match(cleaned) {
        trace!(?candidate, "checklist candidate is only markers");
        return false;
    }
    if NOTHING_NEEDED.is_match(cleaned) {
        trace!(?candidate, "checklist candidate says nothing is needed");
        return false;
    }

    let meaningful: usize = MEANINGFUL
        .find_iter(cleaned)
        .map(|m| m.as_str().chars().count())
        .sum();
    meaningful >= MIN_MEANINGFUL_CHARS
}

/// Splits `candidates` into accepted and rejected items, preserving order.
///
/// Accepted items are trimmed; rejected ones are returned as given so callers
/// can show the user exactly what was dropped.
pub fn partition_checklist<I, S>(candidates: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for candidate in candidates {
        let candidate = candidate.as_ref();
        if is_valid_checklist_item(candidate) {
            accepted.push(candidate.trim().to_string());
        } else {
            rejected.push(candidate.to_string());
        }
    }
    (accepted, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_real_items() {
        assert!(is_valid_checklist_item("도시락"));
        assert!(is_valid_checklist_item("  운동화  "));
        assert!(is_valid_checklist_item("Gym shoes"));
        assert!(is_valid_checklist_item("색연필 12색"));
        assert!(is_valid_checklist_item("Traktatie (verjaardag)"));
    }

    #[test]
    fn rejects_short_and_empty() {
        assert!(!is_valid_checklist_item(""));
        assert!(!is_valid_checklist_item("   "));
        assert!(!is_valid_checklist_item("물통"));
        assert!(!is_valid_checklist_item("ab"));
        assert!(!is_valid_checklist_item(" x "));
    }

    #[test]
    fn rejects_dashes_and_markers() {
        assert!(!is_valid_checklist_item("-"));
        assert!(!is_valid_checklist_item("---"));
        assert!(!is_valid_checklist_item("— – ─"));
        assert!(!is_valid_checklist_item("_"));
        assert!(!is_valid_checklist_item("____"));
        assert!(!is_valid_checklist_item("..."));
        assert!(!is_valid_checklist_item("•  "));
    }

    #[test]
    fn rejects_nothing_needed_phrases() {
        assert!(!is_valid_checklist_item("없음"));
        assert!(!is_valid_checklist_item("없습니다"));
        assert!(!is_valid_checklist_item("없음 (특별한 준비물 없음)"));
        assert!(!is_valid_checklist_item("별도 준비물 없음"));
        assert!(!is_valid_checklist_item("준비물없음"));
        assert!(!is_valid_checklist_item("None"));
        assert!(!is_valid_checklist_item("NONE needed"));
        assert!(!is_valid_checklist_item("N/A"));
        assert!(!is_valid_checklist_item("Nothing needed"));
    }

    #[test]
    fn accepts_words_that_only_start_like_none() {
        assert!(is_valid_checklist_item("Notebook"));
        assert!(is_valid_checklist_item("Nonstick pan"));
    }

    #[test]
    fn rejects_too_few_meaningful_chars() {
        assert!(!is_valid_checklist_item("a.b"));
        assert!(!is_valid_checklist_item("!!??"));
        assert!(!is_valid_checklist_item("(1)"));
        assert!(is_valid_checklist_item("(12)3"));
    }

    #[test]
    fn partition_keeps_order() {
        let (accepted, rejected) = partition_checklist(["도시락", "-", " 운동화 ", "없음", "색연필"]);
        assert_eq!(accepted, vec!["도시락", "운동화", "색연필"]);
        assert_eq!(rejected, vec!["-", "없음"]);
    }

    proptest! {
        #[test]
        fn prop_validation_is_stable(s in "(?s).{0,40}") {
            let first = is_valid_checklist_item(&s);
            prop_assert_eq!(first, is_valid_checklist_item(&s));
            prop_assert_eq!(first, is_valid_checklist_item(s.trim()));
        }

        #[test]
        fn prop_two_chars_always_rejected(s in ".{0,2}") {
            prop_assert!(!is_valid_checklist_item(&s));
        }
    }
}
