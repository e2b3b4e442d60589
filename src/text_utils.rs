use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

/// Telegram's per-message limit, counted in UTF-16 code units.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

const ELLIPSIS: &str = "…";

/// Shortens `text` to fit one Telegram message.
///
/// Cuts on grapheme boundaries so emoji and Hangul syllables stay intact, and
/// ends a shortened text with an ellipsis.
pub fn truncate_for_telegram(text: &str) -> String {
    truncate_graphemes(text, TELEGRAM_MESSAGE_LIMIT)
}

pub fn truncate_graphemes(text: &str, limit: usize) -> String {
    if text.encode_utf16().count() <= limit {
        return text.to_string();
    }

    let budget = limit.saturating_sub(ELLIPSIS.encode_utf16().count());
    let mut used = 0;
    let mut out = String::new();
    for grapheme in text.graphemes(true) {
        let width = grapheme.encode_utf16().count();
        if used + width > budget {
            break;
        }
        used += width;
        out.push_str(grapheme);
    }
    trace!(original = text.len(), kept = out.len(), "Truncated message");
    out.push_str(ELLIPSIS);
    out
}
