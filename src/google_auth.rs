//! OAuth credential handling.
//!
//! Returns the cached token when still valid, refreshes it when expired, and
//! falls back to the interactive consent flow (browser + local callback
//! listener) when there is nothing usable. The two network legs live behind
//! [`OAuthFlow`] so the branching can be exercised without a real OAuth
//! round trip.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use calinvite_core::error::InviteError;

use crate::config::{ClientSecrets, Config};

/// OAuth scopes requested during consent.
pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar.events"];

const REDIRECT_PORT: u16 = 8085;

pub fn redirect_uri() -> String {
    format!("http://localhost:{}/callback", REDIRECT_PORT)
}

fn redirect_address() -> String {
    format!("127.0.0.1:{}", REDIRECT_PORT)
}

/// An OAuth2 token set authorizing calendar calls on the user's behalf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scope: String,
}

impl Credential {
    /// A credential with no expiry constraint is taken at face value.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }
}

/// The two network legs of the OAuth dance.
#[async_trait]
pub trait OAuthFlow {
    /// Run the authorization-code exchange and return a fresh credential.
    async fn authorize(&self, secrets: &ClientSecrets) -> Result<Credential, InviteError>;

    /// Exchange a refresh token for a new access token.
    async fn refresh(
        &self,
        secrets: &ClientSecrets,
        credential: &Credential,
    ) -> Result<Credential, InviteError>;
}

/// Load, refresh, or create the credential for this run.
///
/// The token file is read once and unconditionally overwritten after any
/// refresh or consent. An unreadable or corrupt token file is treated as
/// absent.
pub async fn get_credentials(
    config: &Config,
    flow: &dyn OAuthFlow,
) -> Result<Credential, InviteError> {
    let secrets = config.load_client_secrets()?;

    if let Some(credential) = load_token(config) {
        if !credential.is_expired() {
            return Ok(credential);
        }

        if !credential.refresh_token.is_empty() {
            let refreshed = flow.refresh(&secrets, &credential).await?;
            save_token(config, &refreshed)?;
            return Ok(refreshed);
        }
    }

    let credential = flow.authorize(&secrets).await?;
    save_token(config, &credential)?;
    Ok(credential)
}

/// Read the cached token, if any.
pub fn load_token(config: &Config) -> Option<Credential> {
    let contents = std::fs::read_to_string(&config.token_path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Persist the token, creating parent directories as needed.
pub fn save_token(config: &Config, credential: &Credential) -> Result<(), InviteError> {
    if let Some(parent) = config.token_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = serde_json::to_string_pretty(credential)
        .map_err(|e| InviteError::Config(format!("Failed to serialize token: {}", e)))?;

    std::fs::write(&config.token_path, contents)?;

    // Owner-only since the file contains OAuth tokens
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&config.token_path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Interactive flow: consent in the browser, callback on a local port.
pub struct InteractiveFlow;

#[async_trait]
impl OAuthFlow for InteractiveFlow {
    async fn authorize(&self, secrets: &ClientSecrets) -> Result<Credential, InviteError> {
        let mut client = Client::new(
            secrets.client_id.clone(),
            secrets.client_secret.clone(),
            redirect_uri(),
            String::new(),
            String::new(),
        );

        let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();
        let auth_url = client.user_consent_url(&scopes);

        eprintln!("\nOpen this URL in your browser to authorize access:\n");
        eprintln!("{}\n", auth_url);

        // Try to open the browser automatically
        if open::that(&auth_url).is_err() {
            eprintln!("(Could not open browser automatically, please copy the URL above)");
        }

        let (code, state) = wait_for_callback().await?;

        eprintln!("\nReceived authorization code, exchanging for tokens...");

        let access_token = client.get_access_token(&code, &state).await.map_err(|e| {
            InviteError::AuthorizationFailed(format!("Code exchange failed: {}", e))
        })?;

        Ok(credential_from_access_token(access_token, None))
    }

    async fn refresh(
        &self,
        secrets: &ClientSecrets,
        credential: &Credential,
    ) -> Result<Credential, InviteError> {
        let client = Client::new(
            secrets.client_id.clone(),
            secrets.client_secret.clone(),
            redirect_uri(),
            credential.access_token.clone(),
            credential.refresh_token.clone(),
        );

        let access_token = client.refresh_access_token().await.map_err(|e| {
            InviteError::AuthorizationFailed(format!("Token refresh failed: {}", e))
        })?;

        Ok(credential_from_access_token(access_token, Some(credential)))
    }
}

/// Map the provider's token response, keeping the previous refresh token
/// when the provider omits one (Google usually does on refresh).
fn credential_from_access_token(token: AccessToken, previous: Option<&Credential>) -> Credential {
    let expires_at = if token.expires_in > 0 {
        Some(Utc::now() + Duration::seconds(token.expires_in))
    } else {
        None
    };

    let refresh_token = if token.refresh_token.is_empty() {
        previous.map(|c| c.refresh_token.clone()).unwrap_or_default()
    } else {
        token.refresh_token
    };

    Credential {
        access_token: token.access_token,
        refresh_token,
        expires_at,
        scope: SCOPES.join(" "),
    }
}

/// Listen for the OAuth callback and extract the code/state pair.
async fn wait_for_callback() -> Result<(String, String), InviteError> {
    let listener = TcpListener::bind(redirect_address()).await?;

    eprintln!("Waiting for OAuth callback on port {}...", REDIRECT_PORT);

    let (stream, _) = listener.accept().await?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    // Request line looks like: GET /callback?code=xxx&state=yyy HTTP/1.1
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| InviteError::AuthorizationFailed("Invalid callback request".to_string()))?;

    let url = url::Url::parse(&format!("http://localhost{}", url_part))
        .map_err(|e| InviteError::AuthorizationFailed(format!("Invalid callback URL: {}", e)))?;

    let code = url
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
        .ok_or_else(|| {
            InviteError::AuthorizationFailed("No authorization code in callback".to_string())
        })?;

    let state = url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string())
        .ok_or_else(|| InviteError::AuthorizationFailed("No state in callback".to_string()))?;

    // Send a response to the browser
    let response = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>\
        <h1>Authorization successful!</h1>\
        <p>You can close this window and return to the terminal.</p>\
        </body></html>";

    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    Ok((code, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeFlow {
        authorize_calls: AtomicUsize,
        refresh_calls: AtomicUsize,
        fail_refresh: bool,
    }

    impl FakeFlow {
        fn new() -> Self {
            FakeFlow {
                authorize_calls: AtomicUsize::new(0),
                refresh_calls: AtomicUsize::new(0),
                fail_refresh: false,
            }
        }

        fn failing_refresh() -> Self {
            FakeFlow {
                fail_refresh: true,
                ..FakeFlow::new()
            }
        }
    }

    #[async_trait]
    impl OAuthFlow for FakeFlow {
        async fn authorize(&self, _secrets: &ClientSecrets) -> Result<Credential, InviteError> {
            self.authorize_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Credential {
                access_token: "consented-access".to_string(),
                refresh_token: "consented-refresh".to_string(),
                expires_at: Some(Utc::now() + Duration::hours(1)),
                scope: SCOPES.join(" "),
            })
        }

        async fn refresh(
            &self,
            _secrets: &ClientSecrets,
            credential: &Credential,
        ) -> Result<Credential, InviteError> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_refresh {
                return Err(InviteError::AuthorizationFailed(
                    "refresh rejected".to_string(),
                ));
            }
            Ok(Credential {
                access_token: "refreshed-access".to_string(),
                refresh_token: credential.refresh_token.clone(),
                expires_at: Some(Utc::now() + Duration::hours(1)),
                scope: credential.scope.clone(),
            })
        }
    }

    fn test_config(dir: &tempfile::TempDir) -> Config {
        let config = Config::with_base_dir(dir.path());
        std::fs::write(
            &config.credentials_path,
            r#"{"client_id":"id","client_secret":"shh"}"#,
        )
        .unwrap();
        config
    }

    fn expired_credential() -> Credential {
        Credential {
            access_token: "stale-access".to_string(),
            refresh_token: "old-refresh".to_string(),
            expires_at: Some(Utc::now() - Duration::hours(1)),
            scope: SCOPES.join(" "),
        }
    }

    #[tokio::test]
    async fn missing_secrets_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_base_dir(dir.path());
        let flow = FakeFlow::new();

        let err = get_credentials(&config, &flow).await.unwrap_err();
        assert!(matches!(err, InviteError::MissingClientSecret(_)));
        assert_eq!(flow.authorize_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_cached_token_is_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let flow = FakeFlow::new();

        let cached = Credential {
            access_token: "live-access".to_string(),
            refresh_token: "live-refresh".to_string(),
            expires_at: Some(Utc::now() + Duration::hours(1)),
            scope: SCOPES.join(" "),
        };
        save_token(&config, &cached).unwrap();

        let credential = get_credentials(&config, &flow).await.unwrap();
        assert_eq!(credential.access_token, "live-access");
        assert_eq!(flow.authorize_calls.load(Ordering::SeqCst), 0);
        assert_eq!(flow.refresh_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn token_without_expiry_is_treated_as_valid() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let flow = FakeFlow::new();

        let cached = Credential {
            access_token: "live-access".to_string(),
            refresh_token: "live-refresh".to_string(),
            expires_at: None,
            scope: String::new(),
        };
        save_token(&config, &cached).unwrap();

        let credential = get_credentials(&config, &flow).await.unwrap();
        assert_eq!(credential.access_token, "live-access");
        assert_eq!(flow.refresh_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn expired_token_refreshes_once_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let flow = FakeFlow::new();

        save_token(&config, &expired_credential()).unwrap();

        let credential = get_credentials(&config, &flow).await.unwrap();
        assert_eq!(credential.access_token, "refreshed-access");
        assert_eq!(credential.refresh_token, "old-refresh");
        assert_eq!(flow.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(flow.authorize_calls.load(Ordering::SeqCst), 0);

        // Persisted before the caller can submit anything
        let persisted = load_token(&config).unwrap();
        assert_eq!(persisted.access_token, "refreshed-access");
    }

    #[tokio::test]
    async fn refresh_failure_propagates_without_consent_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let flow = FakeFlow::failing_refresh();

        save_token(&config, &expired_credential()).unwrap();

        let err = get_credentials(&config, &flow).await.unwrap_err();
        assert!(matches!(err, InviteError::AuthorizationFailed(_)));
        assert_eq!(flow.authorize_calls.load(Ordering::SeqCst), 0);

        // The stale token stays on disk untouched
        let persisted = load_token(&config).unwrap();
        assert_eq!(persisted.access_token, "stale-access");
    }

    #[tokio::test]
    async fn missing_token_runs_consent_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let flow = FakeFlow::new();

        let credential = get_credentials(&config, &flow).await.unwrap();
        assert_eq!(credential.access_token, "consented-access");
        assert_eq!(flow.authorize_calls.load(Ordering::SeqCst), 1);
        assert_eq!(flow.refresh_calls.load(Ordering::SeqCst), 0);

        let persisted = load_token(&config).unwrap();
        assert_eq!(persisted.access_token, "consented-access");
    }

    #[tokio::test]
    async fn expired_token_without_refresh_token_runs_consent() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let flow = FakeFlow::new();

        let mut stale = expired_credential();
        stale.refresh_token = String::new();
        save_token(&config, &stale).unwrap();

        let credential = get_credentials(&config, &flow).await.unwrap();
        assert_eq!(credential.access_token, "consented-access");
        assert_eq!(flow.refresh_calls.load(Ordering::SeqCst), 0);
        assert_eq!(flow.authorize_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn corrupt_token_file_runs_consent() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let flow = FakeFlow::new();

        std::fs::write(&config.token_path, "{ not a token").unwrap();

        let credential = get_credentials(&config, &flow).await.unwrap();
        assert_eq!(credential.access_token, "consented-access");
        assert_eq!(flow.authorize_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn refresh_response_without_refresh_token_keeps_the_old_one() {
        let token = AccessToken {
            access_token: "new-access".to_string(),
            refresh_token: String::new(),
            expires_in: 3600,
            ..Default::default()
        };

        let previous = expired_credential();
        let credential = credential_from_access_token(token, Some(&previous));
        assert_eq!(credential.access_token, "new-access");
        assert_eq!(credential.refresh_token, "old-refresh");
        assert!(credential.expires_at.unwrap() > Utc::now());
    }
}
