use anyhow::Result;
use calinvite_core::meeting::MeetingRequest;

use crate::config::Config;
use crate::google;
use crate::google_auth::InteractiveFlow;
use crate::render;

/// Create a meeting invite from CLI flags and print the result.
pub async fn run(
    title: String,
    time: String,
    other_email: String,
    host_email: Option<String>,
    notes: String,
    duration_minutes: i64,
) -> Result<()> {
    let config = Config::load()?;

    let request = MeetingRequest {
        title,
        start_time: time,
        other_email,
        host_email: host_email.unwrap_or_else(|| config.default_host_email.clone()),
        notes,
        duration_minutes,
    };

    let created = google::create_meeting_invite(&config, &InteractiveFlow, &request).await?;

    render::print_created(&created, config.timezone);

    Ok(())
}
