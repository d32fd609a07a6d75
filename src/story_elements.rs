use serde_json::Value;
use std::sync::Arc;

use crate::error::AIError;
use crate::prompts::story_elements_prompt;
use crate::provider::{ModelProvider, ModelRequest, OutputSchema, SchemaField};

pub const STORY_ELEMENTS_FIELD: &str = "storyElements";

/// Brainstorms plot points, dialogue snippets and character interactions
/// from a persona definition.
#[derive(Clone)]
pub struct StoryElementsGenerator {
    provider: Arc<dyn ModelProvider>,
}

impl StoryElementsGenerator {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    pub fn output_schema() -> OutputSchema {
        OutputSchema::new(
            "story_elements",
            vec![SchemaField::required(
                STORY_ELEMENTS_FIELD,
                "The generated story elements (plot points, dialogue snippets, character interactions).",
            )],
        )
    }

    pub async fn generate_story_elements(&self, character_prompt: &str) -> Result<String, AIError> {
        let request = ModelRequest {
            flow: "generate_story_elements",
            prompt: story_elements_prompt(character_prompt),
            output: Self::output_schema(),
        };

        match self.provider.invoke(request).await? {
            Some(Value::Object(mut fields)) => match fields.remove(STORY_ELEMENTS_FIELD) {
                Some(Value::String(elements)) if !elements.trim().is_empty() => Ok(elements),
                _ => Err(AIError::InvalidResponse(
                    "AI failed to generate story elements.".to_string(),
                )),
            },
            _ => Err(AIError::InvalidResponse(
                "AI failed to generate story elements.".to_string(),
            )),
        }
    }
}
