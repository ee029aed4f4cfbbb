use anyhow::Result;

use crate::config::Config;
use crate::google_auth::{self, InteractiveFlow, OAuthFlow};

/// Run the consent flow eagerly and cache the resulting token.
pub async fn run() -> Result<()> {
    let config = Config::load()?;

    println!("Authenticating with Google Calendar...");

    let secrets = config.load_client_secrets()?;
    let credential = InteractiveFlow.authorize(&secrets).await?;
    google_auth::save_token(&config, &credential)?;

    println!("Token cached at {}", config.token_path.display());

    Ok(())
}
