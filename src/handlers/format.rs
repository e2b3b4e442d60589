use crate::db::{StoredEvent, NO_CHILD_TAG};
use crate::messages::{UNDATED, UNNAMED_EVENT};
use crate::text_utils::truncate_for_telegram;

fn when(event: &StoredEvent) -> String {
    let date = &event.event.event_date;
    let time = &event.event.event_time;
    match (date.is_empty(), time.is_empty()) {
        (true, true) => UNDATED.to_string(),
        (true, false) => format!("{UNDATED} {time}"),
        (false, true) => date.clone(),
        (false, false) => format!("{date} {time}"),
    }
}

fn name(event: &StoredEvent) -> &str {
    match event.event.event_name.as_str() {
        "" => UNNAMED_EVENT,
        name => name,
    }
}

/// Full event message. Checklist items are rendered as buttons, so only the
/// progress is shown here.
pub fn format_event(event: &StoredEvent) -> String {
    let record = &event.event;
    let mut text = format!("📌 {} (#{})\n📅 {}\n", name(event), record.id, when(event));
    if record.child_tag != NO_CHILD_TAG && !record.child_tag.is_empty() {
        text.push_str(&format!("👶 {}\n", record.child_tag));
    }
    if !event.checklist.is_empty() {
        text.push_str(&format!(
            "✅ 준비물 {}/{}\n",
            event.checked_count(),
            event.checklist.len()
        ));
    }

    let sections = [
        ("🌐 원문 번역", &record.translation),
        ("🌍 문화적 배경", &record.cultural_context),
        ("💡 실용적인 팁", &record.tips),
        ("📝 메모", &record.memo),
    ];
    for (title, body) in sections {
        if !body.is_empty() {
            text.push_str(&format!("\n{title}\n{body}\n"));
        }
    }
    truncate_for_telegram(text.trim_end())
}

/// One line per event, for `/events` and `/all`.
pub fn format_event_list(events: &[StoredEvent]) -> String {
    let lines: Vec<String> = events
        .iter()
        .map(|event| {
            let mut line = format!("#{} {} · {}", event.event.id, when(event), name(event));
            if !event.checklist.is_empty() {
                line.push_str(&format!(
                    " (준비물 {}/{})",
                    event.checked_count(),
                    event.checklist.len()
                ));
            }
            line
        })
        .collect();
    truncate_for_telegram(&lines.join("\n"))
}
