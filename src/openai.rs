use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
};
use async_trait::async_trait;
use serde_json::Value;
use tokio::time::{Duration, timeout};

use crate::error::ProviderError;
use crate::provider::{ModelProvider, ModelRequest, OutputSchema};
use crate::settings::Settings;

/// Model provider backed by the OpenAI chat completions API, or any server
/// speaking the same protocol.
pub struct OpenAiProvider {
    client: Option<Client<OpenAIConfig>>,
    model: String,
    temperature: f32,
    request_timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(settings: &Settings) -> Self {
        let client = settings
            .api_key()
            .map(|api_key| Client::with_config(settings.openai_config(&api_key)));
        if client.is_none() {
            log::warn!("No API key configured; model calls will fail until one is provided");
        }

        Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
        }
    }
}

fn response_format(schema: &OutputSchema) -> ResponseFormat {
    ResponseFormat::JsonSchema {
        json_schema: ResponseFormatJsonSchema {
            description: None,
            name: schema.name.into(),
            schema: Some(schema.to_json_schema()),
            strict: Some(schema.is_strict()),
        },
    }
}

/// Reads the message content as the structured reply. Blank content means the
/// model produced nothing.
fn parse_content(content: Option<&str>) -> Result<Option<Value>, ProviderError> {
    let Some(content) = content.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };

    match serde_json::from_str::<Value>(content)? {
        Value::Object(fields) => Ok(Some(Value::Object(fields))),
        other => Err(ProviderError::MalformedOutput(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    async fn invoke(&self, request: ModelRequest) -> Result<Option<Value>, ProviderError> {
        let client = self.client.as_ref().ok_or(ProviderError::MissingApiKey)?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(request.prompt)
                    .build()?
                    .into(),
            ])
            .response_format(response_format(&request.output))
            .build()?;

        log::debug!("Sending {} request to {}", request.flow, self.model);

        let response = match timeout(self.request_timeout, client.chat().create(chat_request)).await
        {
            Ok(response) => response?,
            Err(_) => {
                log::error!("{} request timed out", request.flow);
                return Err(ProviderError::Timeout(self.request_timeout.as_secs()));
            }
        };

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref());
        parse_content(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_content_is_no_output() {
        assert_eq!(parse_content(None).unwrap(), None);
        assert_eq!(parse_content(Some("  ")).unwrap(), None);
    }

    #[test]
    fn content_must_be_an_object() {
        assert_eq!(
            parse_content(Some(r#"{"characterResponse":"Hi"}"#)).unwrap(),
            Some(json!({ "characterResponse": "Hi" }))
        );
        assert!(matches!(
            parse_content(Some(r#"["Hi"]"#)),
            Err(ProviderError::MalformedOutput(_))
        ));
        assert!(parse_content(Some("Hi there")).is_err());
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let settings = Settings {
            openai_api_key: None,
            ..Settings::default()
        };
        // Only meaningful when the environment carries no key either.
        if settings.api_key().is_some() {
            return;
        }

        let provider = OpenAiProvider::new(&settings);
        let request = ModelRequest {
            flow: "test",
            prompt: "Hello".into(),
            output: crate::narrative::NarrativeEngine::output_schema(),
        };
        assert!(matches!(
            provider.invoke(request).await,
            Err(ProviderError::MissingApiKey)
        ));
    }
}
