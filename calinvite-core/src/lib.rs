//! Core types for calinvite.
//!
//! This crate provides the types shared by the CLI and tool surfaces:
//! - `meeting` for raw requests and their resolution into submittable meetings
//! - `meeting_time` for fixed-layout start-time parsing
//! - `created` for the provider's created-event representation
//! - `protocol` for the stdin/stdout tool protocol

pub mod created;
pub mod error;
pub mod meeting;
pub mod meeting_time;
pub mod protocol;

pub use created::{CreatedEvent, ToolOutcome};
pub use error::{InviteError, InviteResult};
pub use meeting::{MeetingRequest, ResolvedMeeting};
