//! Cached OAuth credentials for the forms service.
//!
//! The token file uses the "authorized user" JSON layout:
//!
//! ```json
//! {
//!   "token": "ya29…",
//!   "refresh_token": "1//0g…",
//!   "client_id": "….apps.googleusercontent.com",
//!   "client_secret": "…",
//!   "token_uri": "https://oauth2.googleapis.com/token",
//!   "expiry": "2026-01-01T00:00:00Z"
//! }
//! ```
//!
//! An access token with more than a minute left is used as is. Otherwise the
//! refresh token is exchanged for a new one and the file is rewritten.
//! Obtaining the first refresh token (the browser consent flow) is left to
//! other tooling.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use formsync_sync::state_store::tmp_path;

/// Environment variable holding a ready-to-use access token.
pub const ACCESS_TOKEN_ENV: &str = "FORMSYNC_ACCESS_TOKEN";

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens closer than this to expiry are refreshed.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Contents of the token file. Unknown keys are kept when rewriting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl AuthorizedUser {
    /// The cached access token, if it is still usable at `now`.
    ///
    /// A token without a recorded expiry is assumed usable.
    pub fn usable_token(&self, now: DateTime<Utc>) -> Option<&str> {
        let token = self.token.as_deref().filter(|t| !t.is_empty())?;
        match self.expiry {
            Some(expiry) if expiry <= now + Duration::seconds(EXPIRY_MARGIN_SECS) => None,
            _ => Some(token),
        }
    }

    fn can_refresh(&self) -> bool {
        self.refresh_token.is_some() && self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Exchange the refresh token for a new access token.
    fn refresh(&mut self, agent: &ureq::Agent, now: DateTime<Utc>) -> Result<()> {
        let (Some(refresh_token), Some(client_id), Some(client_secret)) = (
            self.refresh_token.as_deref(),
            self.client_id.as_deref(),
            self.client_secret.as_deref(),
        ) else {
            bail!("token file has no refresh_token/client_id/client_secret");
        };
        let token_uri = self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);

        tracing::info!("refreshing access token via {token_uri}");
        let response: TokenResponse = agent
            .post(token_uri)
            .send_form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .map_err(describe_ureq_error)
            .context("token refresh failed")?
            .into_json()
            .context("token endpoint returned an unexpected response")?;

        self.expiry = response.expires_in.map(|secs| now + Duration::seconds(secs));
        self.token = Some(response.access_token);
        Ok(())
    }
}

/// Load the token file; `None` if it does not exist.
pub fn load(path: &Path) -> Result<Option<AuthorizedUser>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read token file {}", path.display()))?;
    let creds = serde_json::from_str(&contents)
        .with_context(|| format!("token file {} is not valid JSON credentials", path.display()))?;
    Ok(Some(creds))
}

/// Save the token file atomically (`.tmp` sibling + rename, mode 0600 on unix).
pub fn save(path: &Path, creds: &AuthorizedUser) -> Result<()> {
    let json = serde_json::to_string_pretty(creds)?;
    let tmp = tmp_path(path);
    std::fs::write(&tmp, json).with_context(|| format!("cannot write {}", tmp.display()))?;
    set_file_permissions(&tmp)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("cannot replace {}", path.display()));
    }
    Ok(())
}

/// Access token for the forms service.
///
/// `FORMSYNC_ACCESS_TOKEN` wins over the token file.
pub fn access_token(token_file: &Path, agent: &ureq::Agent) -> Result<String> {
    let from_env = std::env::var(ACCESS_TOKEN_ENV).ok().filter(|t| !t.is_empty());
    resolve(from_env, token_file, agent, Utc::now())
}

fn resolve(
    from_env: Option<String>,
    token_file: &Path,
    agent: &ureq::Agent,
    now: DateTime<Utc>,
) -> Result<String> {
    if let Some(token) = from_env {
        tracing::debug!("using access token from {ACCESS_TOKEN_ENV}");
        return Ok(token);
    }

    let Some(mut creds) = load(token_file)? else {
        bail!(
            "no credentials found: set {ACCESS_TOKEN_ENV} or create {}",
            token_file.display()
        );
    };

    if let Some(token) = creds.usable_token(now) {
        tracing::debug!("using cached access token from {}", token_file.display());
        return Ok(token.to_string());
    }

    if !creds.can_refresh() {
        bail!(
            "access token in {} has expired and cannot be refreshed",
            token_file.display()
        );
    }
    creds.refresh(agent, now)?;
    save(token_file, &creds)?;
    creds
        .token
        .context("token endpoint did not return an access token")
}

/// Flatten a ureq error into something with the response body attached.
fn describe_ureq_error(err: ureq::Error) -> anyhow::Error {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            anyhow::anyhow!("HTTP {status}: {body}")
        }
        ureq::Error::Transport(transport) => anyhow::anyhow!("{transport}"),
    }
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("cannot chmod {}", path.display()))
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
