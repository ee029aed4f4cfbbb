//! Console output for created events.

use calinvite_core::created::CreatedEvent;
use chrono_tz::Tz;
use owo_colors::OwoColorize;

/// Render the created-event summary block, instants in the invite timezone.
pub fn created_summary(event: &CreatedEvent, tz: Tz) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Summary: {}",
        event.summary.as_deref().unwrap_or("(No title)")
    ));

    let start = render_instant(event.start, tz);
    let end = render_instant(event.end, tz);
    lines.push(format!("When: {} -> {}", start, end));

    lines.push(format!("Guest count: {}", event.attendees.len()));

    if let Some(link) = &event.html_link {
        lines.push(format!("View at: {}", link));
    }

    lines.join("\n")
}

fn render_instant(instant: Option<chrono::DateTime<chrono::Utc>>, tz: Tz) -> String {
    instant
        .map(|dt| dt.with_timezone(&tz).to_rfc3339())
        .unwrap_or_else(|| "(unknown)".to_string())
}

/// Print the full console result for a created event.
pub fn print_created(event: &CreatedEvent, tz: Tz) {
    println!("{}", "Event created.".green());
    println!("{}", created_summary(event, tz));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Kolkata;

    fn created_event() -> CreatedEvent {
        CreatedEvent {
            id: "evt123".to_string(),
            summary: Some("Sync".to_string()),
            status: Some("confirmed".to_string()),
            start: Some(chrono::Utc.with_ymd_and_hms(2024, 3, 1, 4, 30, 0).unwrap()),
            end: Some(chrono::Utc.with_ymd_and_hms(2024, 3, 1, 5, 0, 0).unwrap()),
            attendees: vec!["b@y.com".to_string(), "a@x.com".to_string()],
            html_link: Some("https://calendar.example/view/evt123".to_string()),
            hangout_link: None,
        }
    }

    #[test]
    fn summary_block_lists_the_fixed_lines() {
        let block = created_summary(&created_event(), Kolkata);
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines[0], "Summary: Sync");
        assert_eq!(
            lines[1],
            "When: 2024-03-01T10:00:00+05:30 -> 2024-03-01T10:30:00+05:30"
        );
        assert_eq!(lines[2], "Guest count: 2");
        assert_eq!(lines[3], "View at: https://calendar.example/view/evt123");
    }

    #[test]
    fn view_link_line_is_skipped_when_absent() {
        let mut event = created_event();
        event.html_link = None;

        let block = created_summary(&event, Kolkata);
        assert!(!block.contains("View at:"));
        assert_eq!(block.lines().count(), 3);
    }

    #[test]
    fn missing_summary_falls_back_to_placeholder() {
        let mut event = created_event();
        event.summary = None;

        let block = created_summary(&event, Kolkata);
        assert!(block.starts_with("Summary: (No title)"));
    }
}
