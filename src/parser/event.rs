use serde::{Deserialize, Serialize};

/// One event recovered from a model reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEvent {
    pub event_name: String,
    /// `YYYY-MM-DD`, or empty when no date could be recognized.
    pub event_date: String,
    pub event_time: String,
    pub country: String,
    pub checklist_items: Vec<String>,
    pub translation: String,
    pub cultural_context: String,
    pub tips: String,
    /// Filled in later by the user; always empty after parsing.
    pub memo: String,
}

impl ParsedEvent {
    /// Whether the record carries anything worth keeping.
    pub fn has_signal(&self) -> bool {
        !self.event_name.is_empty()
            || !self.event_date.is_empty()
            || !self.checklist_items.is_empty()
            || !self.translation.is_empty()
    }
}

/// Per-event notes about what the parser dropped or could not interpret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDiagnostics {
    /// Index into [`ParseOutcome::events`].
    pub event_index: usize,
    pub rejected_items: Vec<String>,
    /// Text under the date heading when no date pattern matched.
    pub unparsed_date: Option<String>,
}

impl EventDiagnostics {
    pub fn is_empty(&self) -> bool {
        self.rejected_items.is_empty() && self.unparsed_date.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub events: Vec<ParsedEvent>,
    pub diagnostics: Vec<EventDiagnostics>,
    /// Segments that produced no signal and were discarded.
    pub dropped_segments: usize,
}

impl ParseOutcome {
    pub fn rejected_item_count(&self) -> usize {
        self.diagnostics.iter().map(|d| d.rejected_items.len()).sum()
    }

    pub fn diagnostics_for(&self, event_index: usize) -> Option<&EventDiagnostics> {
        self.diagnostics
            .iter()
            .find(|d| d.event_index == event_index)
    }
}
