//! Created-event representation and the tool-result view.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// The event as created by the provider. Read-only, consumed by the
/// presenters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub id: String,
    pub summary: Option<String>,
    pub status: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Attendee email addresses as echoed by the provider.
    pub attendees: Vec<String>,
    /// Link to view the event in the provider's UI.
    pub html_link: Option<String>,
    /// Conferencing link, when the provider attached one.
    pub hangout_link: Option<String>,
}

/// Structured tool result with a fixed key set.
///
/// Every key is always serialized; absent values are `null`, never omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutcome {
    pub summary: Option<String>,
    pub status: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub hangout_link: Option<String>,
    pub html_link: Option<String>,
    pub event_id: Option<String>,
}

impl ToolOutcome {
    /// Build the tool result, rendering instants in the invite timezone.
    pub fn from_event(event: &CreatedEvent, tz: Tz) -> Self {
        ToolOutcome {
            summary: event.summary.clone(),
            status: event.status.clone(),
            start: event.start.map(|dt| dt.with_timezone(&tz).to_rfc3339()),
            end: event.end.map(|dt| dt.with_timezone(&tz).to_rfc3339()),
            hangout_link: event.hangout_link.clone(),
            html_link: event.html_link.clone(),
            event_id: if event.id.is_empty() {
                None
            } else {
                Some(event.id.clone())
            },
        }
    }
}
