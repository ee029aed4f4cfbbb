mod commands;
mod config;
mod google;
mod google_auth;
mod render;

use anyhow::Result;
use calinvite_core::meeting::{DEFAULT_DURATION_MINUTES, DEFAULT_MEETING_TITLE};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "calinvite")]
#[command(about = "Create Google Calendar meeting invites with minimal inputs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a meeting invite and notify the attendees
    New {
        /// Title for the calendar event
        #[arg(long, default_value = DEFAULT_MEETING_TITLE)]
        title: String,

        /// Start time, "YYYY-MM-DD HH:MM" or "YYYY-MM-DDTHH:MM", in the configured timezone
        #[arg(long)]
        time: String,

        /// Email address of the other attendee
        #[arg(long)]
        other_email: String,

        /// Your email address (defaults to the configured host address)
        #[arg(long)]
        host_email: Option<String>,

        /// Notes/links to include in the invite body
        #[arg(long, default_value = "")]
        notes: String,

        /// Meeting length in minutes
        #[arg(long, default_value_t = DEFAULT_DURATION_MINUTES)]
        duration_minutes: i64,
    },
    /// Run the OAuth consent flow and cache the token
    Auth,
    /// Serve the invite tool over stdin/stdout
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::New {
            title,
            time,
            other_email,
            host_email,
            notes,
            duration_minutes,
        } => commands::new::run(title, time, other_email, host_email, notes, duration_minutes).await,
        Commands::Auth => commands::auth::run().await,
        Commands::Serve => commands::serve::run().await,
    }
}
