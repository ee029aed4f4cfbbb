//! Configuration for the invite pipeline.
//!
//! Every fixed setting (timezone, default host address, storage paths) lives
//! in an explicit [`Config`] value built once at startup and passed down, so
//! tests can run the pipeline against alternate values. Storage paths are
//! relative to the executable's own directory.

use anyhow::{Context, Result};
use calinvite_core::error::InviteError;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Host address used when none is given.
pub const DEFAULT_HOST_EMAIL: &str = "arjuntheprogrammer@gmail.com";

const CREDENTIALS_FILE: &str = "credentials.json";
const TOKEN_FILE: &str = "token.json";
const CONFIG_FILE: &str = "calinvite.toml";

/// OAuth client credentials (user-provisioned, read-only).
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
}

/// Optional overrides read from `calinvite.toml` beside the executable.
#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    timezone: Option<String>,
    host_email: Option<String>,
}

/// Fixed configuration for one run of the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Timezone meeting times are interpreted in.
    pub timezone: Tz,
    pub default_host_email: String,
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
}

impl Config {
    /// Build the configuration rooted beside the executable, applying
    /// `calinvite.toml` overrides when the file exists.
    pub fn load() -> Result<Self> {
        let exe = std::env::current_exe().context("Could not determine executable path")?;
        let base_dir = exe
            .parent()
            .context("Executable has no parent directory")?
            .to_path_buf();

        let mut config = Config::with_base_dir(&base_dir);

        let overrides_path = base_dir.join(CONFIG_FILE);
        if overrides_path.exists() {
            let contents = std::fs::read_to_string(&overrides_path)
                .with_context(|| format!("Failed to read {}", overrides_path.display()))?;
            let overrides: ConfigOverrides = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", overrides_path.display()))?;

            if let Some(tz) = overrides.timezone {
                config.timezone = tz.parse().map_err(|_| {
                    anyhow::anyhow!("Unknown timezone '{}' in {}", tz, overrides_path.display())
                })?;
            }
            if let Some(host) = overrides.host_email {
                config.default_host_email = host;
            }
        }

        Ok(config)
    }

    /// Built-in defaults with storage rooted at `base_dir`.
    pub fn with_base_dir(base_dir: &Path) -> Self {
        Config {
            timezone: chrono_tz::Asia::Kolkata,
            default_host_email: DEFAULT_HOST_EMAIL.to_string(),
            credentials_path: base_dir.join(CREDENTIALS_FILE),
            token_path: base_dir.join(TOKEN_FILE),
        }
    }

    /// Load the OAuth client secrets, or fail with a setup hint.
    pub fn load_client_secrets(&self) -> Result<ClientSecrets, InviteError> {
        if !self.credentials_path.exists() {
            return Err(InviteError::MissingClientSecret(
                self.credentials_path.clone(),
            ));
        }

        let contents = std::fs::read_to_string(&self.credentials_path)?;

        parse_client_secrets(&contents).ok_or_else(|| {
            InviteError::Config(format!(
                "Failed to parse client secrets from {}",
                self.credentials_path.display()
            ))
        })
    }
}

/// Google's downloaded client-secret files wrap the credentials in an
/// "installed" (or "web") object; bare `{client_id, client_secret}` files
/// are accepted too.
fn parse_client_secrets(contents: &str) -> Option<ClientSecrets> {
    #[derive(Deserialize)]
    struct Wrapped {
        installed: Option<ClientSecrets>,
        web: Option<ClientSecrets>,
    }

    if let Ok(wrapped) = serde_json::from_str::<Wrapped>(contents) {
        if let Some(secrets) = wrapped.installed.or(wrapped.web) {
            return Some(secrets);
        }
    }

    serde_json::from_str::<ClientSecrets>(contents).ok()
}
