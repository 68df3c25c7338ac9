use super::{CompletionRequest, LLMProvider};
use crate::core::error::GlowError;
use crate::providers::base_client::HttpClient;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

/// Extracts `choices[0].message.content` from a response body.
pub(crate) fn parse_completion(body: &str) -> Result<String, GlowError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)?;

    let first = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GlowError::Api("No choices in API response".to_string()))?;

    let content = first.message.content.unwrap_or_default();
    let content = content.trim();
    if content.is_empty() {
        return Err(GlowError::Api("Empty content in API response".to_string()));
    }

    Ok(content.to_string())
}

/// Provider for any endpoint speaking the OpenAI chat-completions shape.
#[derive(Clone)]
pub struct OpenAICompatibleProvider {
    name: String,
    client: HttpClient,
}

impl OpenAICompatibleProvider {
    pub fn new(
        name: &str,
        base_url: String,
        api_key: String,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Result<Self, GlowError> {
        let auth_header = Some(("Authorization".to_string(), format!("Bearer {}", api_key)));

        Ok(Self {
            name: name.to_string(),
            client: HttpClient::new(base_url, auth_header, extra_headers)?,
        })
    }
}

#[async_trait::async_trait]
impl LLMProvider for OpenAICompatibleProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GlowError> {
        let response = self.client.post("chat/completions", request).await?;
        let body = response.text().await?;
        parse_completion(&body)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
