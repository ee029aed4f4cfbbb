//! Google Calendar submission.
//!
//! Builds the provider payload from a resolved meeting and performs the
//! single insert call on the user's primary calendar. Also hosts the shared
//! pipeline both input surfaces run through.

use google_calendar::types::{Event, EventAttendee, EventDateTime, Reminders, SendUpdates};
use google_calendar::Client;

use calinvite_core::created::CreatedEvent;
use calinvite_core::error::InviteError;
use calinvite_core::meeting::{MeetingRequest, ResolvedMeeting};

use crate::config::{ClientSecrets, Config};
use crate::google_auth::{self, redirect_uri, Credential, OAuthFlow};

/// Google's alias for the user's main calendar
const DEFAULT_CALENDAR_ID: &str = "primary";

/// Resolve, authorize, submit. Shared by the CLI and tool surfaces.
pub async fn create_meeting_invite(
    config: &Config,
    flow: &dyn OAuthFlow,
    request: &MeetingRequest,
) -> Result<CreatedEvent, InviteError> {
    // Resolve before touching credentials so bad input never opens a socket
    let meeting = request.resolve(config.timezone)?;

    let credential = google_auth::get_credentials(config, flow).await?;
    let secrets = config.load_client_secrets()?;
    let client = authed_client(&secrets, &credential);

    insert_event(&client, &meeting, config.timezone.name()).await
}

/// Calendar client bound to stored credentials.
fn authed_client(secrets: &ClientSecrets, credential: &Credential) -> Client {
    Client::new(
        secrets.client_id.clone(),
        secrets.client_secret.clone(),
        redirect_uri(),
        credential.access_token.clone(),
        credential.refresh_token.clone(),
    )
}

/// Insert the event on the primary calendar, notifying all attendees.
async fn insert_event(
    client: &Client,
    meeting: &ResolvedMeeting,
    timezone_id: &str,
) -> Result<CreatedEvent, InviteError> {
    let google_event = to_google_event(meeting, timezone_id);

    let response = client
        .events()
        .insert(
            DEFAULT_CALENDAR_ID,
            0,     // conference_data_version
            0,     // max_attendees
            false, // send_notifications (superseded by send_updates)
            SendUpdates::All,
            false, // supports_attachments
            &google_event,
        )
        .await
        .map_err(|e| InviteError::SubmissionFailed(e.to_string()))?;

    Ok(from_google_event(response.body))
}

/// Convert the resolved meeting into the provider payload.
fn to_google_event(meeting: &ResolvedMeeting, timezone_id: &str) -> Event {
    let attendees: Vec<EventAttendee> = meeting
        .attendees
        .iter()
        .map(|email| EventAttendee {
            email: email.clone(),
            display_name: String::new(),
            response_status: String::new(),
            additional_guests: 0,
            comment: String::new(),
            id: String::new(),
            optional: false,
            organizer: false,
            resource: false,
            self_: false,
        })
        .collect();

    Event {
        summary: meeting.title.clone(),
        description: meeting.notes.clone(),
        start: Some(EventDateTime {
            date: None,
            date_time: Some(meeting.start.with_timezone(&chrono::Utc)),
            time_zone: timezone_id.to_string(),
        }),
        end: Some(EventDateTime {
            date: None,
            date_time: Some(meeting.end.with_timezone(&chrono::Utc)),
            time_zone: timezone_id.to_string(),
        }),
        attendees,
        // Provider-default reminder policy, no per-invite overrides
        reminders: Some(Reminders {
            overrides: vec![],
            use_default: true,
        }),
        ..Default::default()
    }
}

/// Map the provider response; empty provider strings become `None`.
fn from_google_event(event: Event) -> CreatedEvent {
    CreatedEvent {
        id: event.id,
        summary: non_empty(event.summary),
        status: non_empty(event.status),
        start: event.start.and_then(|s| s.date_time),
        end: event.end.and_then(|e| e.date_time),
        attendees: event.attendees.into_iter().map(|a| a.email).collect(),
        html_link: non_empty(event.html_link),
        hangout_link: non_empty(event.hangout_link),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
