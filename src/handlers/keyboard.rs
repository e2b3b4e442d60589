use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::db::StoredEvent;

/// Callback data prefix for checklist toggles.
pub const CHECK_PREFIX: &str = "chk:";

pub fn build_item_buttons<T, F, G>(
    items: &[T],
    label: F,
    callback: G,
) -> Vec<Vec<InlineKeyboardButton>>
where
    F: Fn(&T) -> String,
    G: Fn(&T) -> String,
{
    items
        .iter()
        .map(|item| vec![InlineKeyboardButton::callback(label(item), callback(item))])
        .collect()
}

pub fn check_callback(item_id: i64) -> String {
    format!("{CHECK_PREFIX}{item_id}")
}

pub fn parse_check_callback(data: &str) -> Option<i64> {
    data.strip_prefix(CHECK_PREFIX)?.parse().ok()
}

/// One toggle button per checklist item.
pub fn checklist_keyboard(event: &StoredEvent) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(build_item_buttons(
        &event.checklist,
        |item| {
            let mark = if item.is_checked { "✅" } else { "⬜" };
            format!("{mark} {}", item.item_name)
        },
        |item| check_callback(item.id),
    ))
}
