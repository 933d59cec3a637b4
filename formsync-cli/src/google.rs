//! Google Forms REST v1 client.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use formsync_sync::{request::Request, FormsClient, RemoteError, RemoteForm};

pub const DEFAULT_API_BASE: &str = "https://forms.googleapis.com/v1";

/// Overrides [`DEFAULT_API_BASE`], e.g. for a local stub server.
pub const API_BASE_ENV: &str = "FORMSYNC_API_BASE";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP agent for token refresh and API calls.
pub fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build()
}

/// Blocking client authenticated with a bearer token.
pub struct GoogleFormsClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedForm {
    form_id: String,
}

impl GoogleFormsClient {
    pub fn new(agent: ureq::Agent, token: String) -> Self {
        let base_url = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self::with_base_url(agent, token, base_url)
    }

    pub fn with_base_url(agent: ureq::Agent, token: String, base_url: impl Into<String>) -> Self {
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl FormsClient for GoogleFormsClient {
    fn create(&mut self, title: &str) -> Result<String, RemoteError> {
        let url = format!("{}/forms", self.base_url);
        tracing::debug!("POST {url}");
        let created: CreatedForm = self
            .agent
            .post(&url)
            .set("Authorization", &self.authorization())
            .send_json(json!({ "info": { "title": title, "documentTitle": title } }))
            .map_err(remote_error)?
            .into_json()
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(created.form_id)
    }

    fn get(&mut self, form_id: &str) -> Result<RemoteForm, RemoteError> {
        let url = format!("{}/forms/{form_id}", self.base_url);
        tracing::debug!("GET {url}");
        self.agent
            .get(&url)
            .set("Authorization", &self.authorization())
            .call()
            .map_err(remote_error)?
            .into_json()
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    fn batch_update(&mut self, form_id: &str, requests: &[Request]) -> Result<(), RemoteError> {
        let url = format!("{}/forms/{form_id}:batchUpdate", self.base_url);
        tracing::debug!("POST {url} ({} requests)", requests.len());
        let response = self
            .agent
            .post(&url)
            .set("Authorization", &self.authorization())
            .send_json(json!({ "requests": requests }))
            .map_err(remote_error)?;
        // Drain the body so the connection goes back to the pool.
        response
            .into_string()
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(())
    }
}

fn remote_error(err: ureq::Error) -> RemoteError {
    match err {
        ureq::Error::Status(status @ (401 | 403), response) => RemoteError::Auth(format!(
            "HTTP {status}: {}",
            response.into_string().unwrap_or_default()
        )),
        ureq::Error::Status(status, response) => RemoteError::Status {
            status,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => RemoteError::Transport(transport.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client =
            GoogleFormsClient::with_base_url(agent(), "t".to_string(), "http://localhost:1/v1/");
        assert_eq!(client.base_url, "http://localhost:1/v1");
        assert_eq!(client.authorization(), "Bearer t");
    }

    #[test]
    fn unreachable_service_is_a_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let mut client =
            GoogleFormsClient::with_base_url(agent(), "t".to_string(), "http://127.0.0.1:9/v1");
        let err = client.get("abc").unwrap_err();
        assert!(matches!(err, RemoteError::Transport(_)), "got: {err}");
    }
}
