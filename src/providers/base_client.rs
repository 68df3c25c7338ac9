use crate::core::error::GlowError;
use reqwest::{Client, Response};
use serde::Serialize;
use std::collections::HashMap;

/// Thin JSON-over-HTTP client shared by the completion providers.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    auth_header: Option<(String, String)>,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(
        base_url: String,
        auth_header: Option<(String, String)>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Result<Self, GlowError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GlowError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
            extra_headers: extra_headers.unwrap_or_default(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POSTs `payload` as JSON. Non-success statuses are returned as errors
    /// carrying the response body.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, GlowError> {
        let url = self.url(path);
        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        if let Some((name, value)) = &self.auth_header {
            request = request.header(name, value);
        }
        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        tracing::debug!(%url, "sending completion request");
        let response = request.json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GlowError::Api(format!(
                "{} returned {}: {}",
                url,
                status,
                body.trim()
            )));
        }

        Ok(response)
    }
}
