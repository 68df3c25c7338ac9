use crate::core::error::GlowError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Body of a single chat-completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Sampling parameters for one kind of request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionParams {
    pub const ROUTINE: CompletionParams = CompletionParams {
        temperature: 0.7,
        max_tokens: 500,
    };

    pub const QUESTION: CompletionParams = CompletionParams {
        temperature: 0.7,
        max_tokens: 300,
    };
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Sends one request and returns the first choice's content.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GlowError>;

    fn name(&self) -> &str;
}

pub mod base_client;
pub mod factory;
pub mod openai_compatible;
