use async_openai::{
    config::OpenAIConfig,
    types::{CreateChatCompletionRequestArgs, ResponseFormat},
    Client,
};
use async_trait::async_trait;

use crate::{
    config::LooperConfig,
    error::ModelError,
    mapping::transcript::openai_completions::to_request_messages,
    services::ChatHandler,
    types::Transcript,
};

pub struct OpenAIChatHandler {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIChatHandler {
    pub fn new(config: &LooperConfig) -> Self {
        let mut openai = OpenAIConfig::new().with_api_key(config.api_key.clone());
        if let Some(base) = &config.api_base {
            openai = openai.with_api_base(base.clone());
        }

        OpenAIChatHandler {
            client: Client::with_config(openai),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl ChatHandler for OpenAIChatHandler {
    async fn complete(&mut self, transcript: &Transcript) -> Result<String, ModelError> {
        // JSON mode keeps every reply a single object.
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .response_format(ResponseFormat::JsonObject)
            .messages(to_request_messages(transcript)?)
            .build()?;

        tracing::debug!(model = %self.model, messages = transcript.len(), "requesting completion");
        let response = self.client.chat().create(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ModelError::EmptyReply)
    }
}
