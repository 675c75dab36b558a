use async_openai::{
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    },
};

use crate::types::{Entry, Role, Transcript};

impl TryFrom<&Entry> for ChatCompletionRequestMessage {
    type Error = OpenAIError;

    fn try_from(entry: &Entry) -> Result<Self, Self::Error> {
        let content = entry.content.as_str();
        let message: ChatCompletionRequestMessage = match entry.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()?
                .into(),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()?
                .into(),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(content)
                .build()?
                .into(),
        };
        Ok(message)
    }
}

pub fn to_request_messages(transcript: &Transcript) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
    transcript.iter().map(ChatCompletionRequestMessage::try_from).collect()
}
