//! Recovers structured events from the model's markdown reply.
//!
//! The reply is split on [`EVENT_SEPARATOR`] and every segment is tokenized
//! into heading sections (see [`sections`]). Each field is read from its own
//! section, so missing or reordered headings only leave that field empty.
//! Parsing never fails: garbage in yields an empty list.

mod datetime;
mod event;
mod sections;

pub use datetime::{extract_date, extract_time};
pub use event::{EventDiagnostics, ParseOutcome, ParsedEvent};
pub use sections::{split_sections, HeadingKind, Section};

use tracing::{debug, trace};

use crate::checklist::is_valid_checklist_item;
use sections::find_section;

/// Line the model must place between two event blocks.
pub const EVENT_SEPARATOR: &str = "---EVENT_SEPARATOR---";

/// Parses `raw` into events, discarding diagnostics.
pub fn parse_analysis_result(raw: &str, country_key: &str) -> Vec<ParsedEvent> {
    parse_with_diagnostics(raw, country_key).events
}

/// Parses `raw` into events and reports what was dropped along the way.
pub fn parse_with_diagnostics(raw: &str, country_key: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (segment_index, segment) in raw
        .split(EVENT_SEPARATOR)
        .filter(|s| !s.trim().is_empty())
        .enumerate()
    {
        let (event, mut diagnostics) = parse_segment(segment, country_key);
        if !event.has_signal() {
            debug!(segment_index, "Dropping segment without event data");
            outcome.dropped_segments += 1;
            continue;
        }

        diagnostics.event_index = outcome.events.len();
        if !diagnostics.is_empty() {
            outcome.diagnostics.push(diagnostics);
        }
        outcome.events.push(event);
    }

    debug!(
        events = outcome.events.len(),
        dropped = outcome.dropped_segments,
        rejected_items = outcome.rejected_item_count(),
        "Parsed analysis result"
    );
    outcome
}

fn parse_segment(segment: &str, country_key: &str) -> (ParsedEvent, EventDiagnostics) {
    let sections = split_sections(segment);
    trace!(count = sections.len(), "Segment sections");

    let mut event = ParsedEvent {
        country: country_key.to_string(),
        ..Default::default()
    };
    let mut diagnostics = EventDiagnostics::default();

    if let Some(body) = find_section(&sections, HeadingKind::EventName) {
        event.event_name = strip_bold(first_line(body)).to_string();
    }

    if let Some(body) = find_section(&sections, HeadingKind::DateTime) {
        let line = first_line(body);
        match extract_date(line) {
            Some(date) => event.event_date = date,
            None if !line.is_empty() => {
                trace!(line, "No recognizable date under date heading");
                diagnostics.unparsed_date = Some(line.to_string());
            }
            None => {}
        }
        if let Some(time) = extract_time(line) {
            event.event_time = time;
        }
    }

    if let Some(body) = find_section(&sections, HeadingKind::Checklist) {
        for candidate in bullet_candidates(body) {
            if is_valid_checklist_item(candidate) {
                event.checklist_items.push(candidate.to_string());
            } else if !candidate.is_empty() {
                trace!(candidate, "Rejected checklist candidate");
                diagnostics.rejected_items.push(candidate.to_string());
            }
        }
    }

    if let Some(body) = find_section(&sections, HeadingKind::Translation) {
        event.translation = clean_block(body);
    }
    if let Some(body) = find_section(&sections, HeadingKind::CulturalContext) {
        event.cultural_context = clean_block(body);
    }
    if let Some(body) = find_section(&sections, HeadingKind::Tips) {
        event.tips = clean_block(body);
    }

    (event, diagnostics)
}

/// First line of a section body, trimmed. Leading blank lines are skipped.
fn first_line(body: &str) -> &str {
    body.trim_start().lines().next().unwrap_or("").trim()
}

fn strip_bold(text: &str) -> &str {
    text.strip_prefix("**")
        .and_then(|t| t.strip_suffix("**"))
        .map(str::trim)
        .unwrap_or(text)
}

/// Text after a bullet marker (`-`, `•`, `·` or `* `) on each bulleted line.
fn bullet_candidates(body: &str) -> impl Iterator<Item = &str> {
    body.lines().filter_map(|line| {
        let line = line.trim_start();
        line.strip_prefix('-')
            .or_else(|| line.strip_prefix('•'))
            .or_else(|| line.strip_prefix('·'))
            .or_else(|| line.strip_prefix("* "))
            .map(str::trim)
    })
}

/// Trims a free-text block and drops trailing markdown rules (`---`, `***`).
fn clean_block(body: &str) -> String {
    let mut text = body.trim();
    while let Some((head, last)) = text.rsplit_once('\n') {
        if is_rule(last) {
            text = head.trim_end();
        } else {
            break;
        }
    }
    if is_rule(text) {
        return String::new();
    }
    text.to_string()
}

fn is_rule(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 3
        && (line.chars().all(|c| c == '-')
            || line.chars().all(|c| c == '*')
            || line.chars().all(|c| c == '_'))
}
