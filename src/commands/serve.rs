//! Line-oriented tool server.
//!
//! Exposes `create_meeting_invite` over stdin/stdout: one JSON request per
//! line in, one JSON response per line out. Progress and auth prompts go to
//! stderr so stdout stays protocol-clean.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use serde::Deserialize;

use calinvite_core::created::ToolOutcome;
use calinvite_core::meeting::{MeetingRequest, DEFAULT_DURATION_MINUTES, DEFAULT_MEETING_TITLE};
use calinvite_core::protocol::{Command, Request, Response};

use crate::config::Config;
use crate::google;
use crate::google_auth::InteractiveFlow;

/// Fields accepted by the `create_meeting_invite` tool.
#[derive(Debug, Deserialize)]
struct CreateMeetingInviteParams {
    meeting_time: String,
    other_email: String,
    #[serde(default)]
    meeting_title: Option<String>,
    #[serde(default)]
    host_email: Option<String>,
    #[serde(default)]
    meeting_notes: Option<String>,
    #[serde(default)]
    duration_minutes: Option<i64>,
}

pub async fn run() -> Result<()> {
    let config = Config::load()?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = Response::error(&format!("Failed to parse request: {}", e));
                writeln!(stdout, "{}", response)?;
                stdout.flush()?;
                continue;
            }
        };

        let response = handle_request(&config, request).await;

        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }

    Ok(())
}

async fn handle_request(config: &Config, request: Request) -> String {
    match request.command {
        Command::CreateMeetingInvite => {
            handle_create_meeting_invite(config, &request.params).await
        }
    }
}

async fn handle_create_meeting_invite(config: &Config, params: &serde_json::Value) -> String {
    let params: CreateMeetingInviteParams = match serde_json::from_value(params.clone()) {
        Ok(p) => p,
        Err(e) => return Response::error(&format!("Invalid params: {}", e)),
    };

    let request = meeting_request_from_params(config, params);

    match google::create_meeting_invite(config, &InteractiveFlow, &request).await {
        Ok(event) => Response::success(ToolOutcome::from_event(&event, config.timezone)),
        Err(e) => Response::error(&e.to_string()),
    }
}

/// Apply tool-surface defaults; validation happens during resolution.
fn meeting_request_from_params(
    config: &Config,
    params: CreateMeetingInviteParams,
) -> MeetingRequest {
    MeetingRequest {
        title: params
            .meeting_title
            .unwrap_or_else(|| DEFAULT_MEETING_TITLE.to_string()),
        start_time: params.meeting_time,
        other_email: params.other_email,
        host_email: params
            .host_email
            .unwrap_or_else(|| config.default_host_email.clone()),
        notes: params.meeting_notes.unwrap_or_default(),
        duration_minutes: params.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
    }
}
