use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::parser::ParsedEvent;

/// Child tag for events not assigned to any child.
pub const NO_CHILD_TAG: &str = "없음";

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    pub chat_id: i64,
    pub event_name: String,
    pub event_date: String,
    pub event_time: String,
    pub country: String,
    pub child_tag: String,
    pub translation: String,
    pub cultural_context: String,
    pub tips: String,
    pub memo: String,
    pub created_at: i64,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: i64,
    pub event_id: i64,
    pub item_name: String,
    pub is_checked: bool,
}

/// An event together with its checklist, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    #[serde(flatten)]
    pub event: EventRecord,
    pub checklist: Vec<ChecklistItem>,
}

impl StoredEvent {
    pub fn checked_count(&self) -> usize {
        self.checklist.iter().filter(|i| i.is_checked).count()
    }
}

/// Data for a new event row. Checklist items are validated on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewEvent {
    pub event_name: String,
    pub event_date: String,
    pub event_time: String,
    pub country: String,
    pub child_tag: String,
    pub translation: String,
    pub cultural_context: String,
    pub tips: String,
    pub memo: String,
    pub checklist_items: Vec<String>,
}

impl Default for NewEvent {
    fn default() -> Self {
        Self {
            event_name: String::new(),
            event_date: String::new(),
            event_time: String::new(),
            country: String::new(),
            child_tag: NO_CHILD_TAG.to_string(),
            translation: String::new(),
            cultural_context: String::new(),
            tips: String::new(),
            memo: String::new(),
            checklist_items: Vec::new(),
        }
    }
}

impl From<ParsedEvent> for NewEvent {
    fn from(event: ParsedEvent) -> Self {
        Self {
            event_name: event.event_name,
            event_date: event.event_date,
            event_time: event.event_time,
            country: event.country,
            child_tag: NO_CHILD_TAG.to_string(),
            translation: event.translation,
            cultural_context: event.cultural_context,
            tips: event.tips,
            memo: event.memo,
            checklist_items: event.checklist_items,
        }
    }
}

/// Partial update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventUpdate {
    pub event_name: Option<String>,
    pub event_date: Option<String>,
    pub event_time: Option<String>,
    pub country: Option<String>,
    pub child_tag: Option<String>,
    pub memo: Option<String>,
}

impl EventUpdate {
    pub fn is_empty(&self) -> bool {
        self.event_name.is_none()
            && self.event_date.is_none()
            && self.event_time.is_none()
            && self.country.is_none()
            && self.child_tag.is_none()
            && self.memo.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    All,
    /// Events dated on or after the given day. Undated events are excluded.
    Upcoming(NaiveDate),
}

/// Result of a checklist mutation that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecklistChange {
    Applied,
    /// The new text did not pass checklist validation.
    Rejected,
    NotFound,
}
