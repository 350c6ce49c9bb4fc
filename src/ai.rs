use async_trait::async_trait;
use async_openai::{
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use std::error::Error;
use std::sync::Arc;

use crate::config::AppConfig;

// Extensible AI backend trait
#[async_trait]
pub trait AiBackend: Send + Sync {
    async fn chat(&self, message: &str) -> Result<String, Box<dyn Error + Send + Sync>>;
    fn name(&self) -> &'static str;
}

// OpenAI ChatGPT implementation using async-openai SDK
pub struct OpenAiBackend {
    client: Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAiBackend {
    pub fn new(api_key: String, model: String) -> Self {
        let config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);
        Self { client, model }
    }
}

#[async_trait]
impl AiBackend for OpenAiBackend {
    async fn chat(&self, message: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .max_tokens(300u32)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(message)
                    .build()?
                    .into()
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        if let Some(choice) = response.choices.first() {
            if let Some(content) = &choice.message.content {
                Ok(content.trim().to_string())
            } else {
                Err("No content in OpenAI response".into())
            }
        } else {
            Err("No response from OpenAI".into())
        }
    }

    fn name(&self) -> &'static str {
        "OpenAI ChatGPT"
    }
}

/// Build the configured backend, or `None` when no key is set
pub fn create_ai_backend(config: &AppConfig) -> Option<Arc<dyn AiBackend>> {
    match &config.openai_api_key {
        Some(api_key) => {
            log::info!("🤖 AI backend enabled with model: {}", config.ai_model);
            Some(Arc::new(OpenAiBackend::new(api_key.clone(), config.ai_model.clone())))
        }
        None => {
            log::warn!("⚠️ OPENAI_API_KEY not set, satire will use canned lines");
            None
        }
    }
}
