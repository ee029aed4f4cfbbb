//! Meeting start-time parsing.
//!
//! A fixed, ordered list of local-time layouts is tried against the input;
//! the first layout that parses wins. The resulting naive timestamp is bound
//! to the configured timezone, never to the system locale or any offset in
//! the input.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::error::InviteError;

/// Accepted meeting time layouts, tried in order.
pub const MEETING_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Parse a meeting time string into a timezone-bound instant.
///
/// Ambiguous local times resolve to the earlier instant.
pub fn parse_meeting_time(input: &str, tz: Tz) -> Result<DateTime<Tz>, InviteError> {
    for format in MEETING_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            if let Some(local) = tz.from_local_datetime(&naive).earliest() {
                return Ok(local);
            }
        }
    }

    Err(InviteError::InvalidTimeFormat {
        input: input.to_string(),
        formats: MEETING_TIME_FORMATS.iter().map(|f| f.to_string()).collect(),
    })
}
