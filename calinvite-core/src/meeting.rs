//! Meeting requests and their resolution.
//!
//! Both input surfaces (CLI flags and tool params) build a [`MeetingRequest`]
//! and funnel it through [`MeetingRequest::resolve`], so validation lives in
//! exactly one place.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::InviteError;
use crate::meeting_time::parse_meeting_time;

/// Title applied when none is given.
pub const DEFAULT_MEETING_TITLE: &str = "Meeting";

/// Meeting length in minutes applied when none is given.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Raw meeting inputs, as gathered from either surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub title: String,
    /// Start time as entered by the user, not yet parsed.
    pub start_time: String,
    pub other_email: String,
    pub host_email: String,
    pub notes: String,
    pub duration_minutes: i64,
}

/// A fully computed, ready-to-submit meeting. Immutable once built.
#[derive(Debug, Clone)]
pub struct ResolvedMeeting {
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// Host first; the other attendee follows unless it repeats the host.
    pub attendees: Vec<String>,
    pub notes: String,
}

impl MeetingRequest {
    /// Validate the request and compute the submission-ready meeting.
    ///
    /// The other attendee is dropped only on an exact string match with the
    /// host; emails are deliberately not normalized.
    pub fn resolve(&self, tz: Tz) -> Result<ResolvedMeeting, InviteError> {
        if self.duration_minutes <= 0 {
            return Err(InviteError::InvalidDuration(self.duration_minutes));
        }

        let start = parse_meeting_time(&self.start_time, tz)?;
        let end = start + Duration::minutes(self.duration_minutes);

        let mut attendees = vec![self.host_email.clone()];
        if self.other_email != self.host_email {
            attendees.push(self.other_email.clone());
        }

        Ok(ResolvedMeeting {
            title: self.title.clone(),
            start,
            end,
            attendees,
            notes: self.notes.clone(),
        })
    }
}
