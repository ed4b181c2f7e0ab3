//! reqwest-backed [`ActionClient`].

use crate::kernel::services::ports::{
    ActionClient, ActionFuture, ActionPayload, ActionResponse, RemoteError,
};

pub struct HttpActionClient {
    client: reqwest::Client,
    base_url: String,
    health_path: String,
}

impl HttpActionClient {
    pub fn new(
        base_url: impl Into<String>,
        health_path: impl Into<String>,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ide-workspace/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            health_path: health_path.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// `GET {health_path}`; the body is returned as text.
    pub async fn health(&self) -> Result<String, RemoteError> {
        let url = self.url(&self.health_path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(RemoteError::Transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }
        Ok(body)
    }
}

impl ActionClient for HttpActionClient {
    fn execute(&self, endpoint: &str, payload: ActionPayload) -> ActionFuture {
        let client = self.client.clone();
        let url = self.url(endpoint);
        Box::pin(async move {
            tracing::debug!(url = %url, action = %payload.action, "POST");
            let response = client
                .post(&url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| RemoteError::Transport(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| RemoteError::Transport(e.to_string()))?;
            if !status.is_success() {
                return Err(RemoteError::Transport(format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    body
                )));
            }

            serde_json::from_str::<ActionResponse>(&body)
                .map_err(|e| RemoteError::Decode(e.to_string()))
        })
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/http.rs"]
mod tests;
