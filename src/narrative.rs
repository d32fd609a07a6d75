use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::AIError;
use crate::prompts::narrative_prompt;
use crate::provider::{ModelProvider, ModelRequest, OutputSchema, SchemaField};
use crate::transcript::{Transcript, Turn};

pub const CHARACTER_RESPONSE_FIELD: &str = "characterResponse";

/// The reply to show and the story to send on the next turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeTurn {
    pub ai_reply: String,
    pub updated_story: String,
}

#[derive(Clone)]
pub struct NarrativeEngine {
    provider: Arc<dyn ModelProvider>,
}

impl NarrativeEngine {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    pub fn output_schema() -> OutputSchema {
        OutputSchema::new(
            "character_response",
            vec![SchemaField::required(
                CHARACTER_RESPONSE_FIELD,
                "The AI character's direct textual response to the user input. This response should be in character, engaging, and aim to progress the narrative based on the story so far and the user's latest input.",
            )],
        )
    }

    /// Plays one turn: asks the model for an in-character reply and appends
    /// the exchange to `story_so_far`.
    pub async fn advance_narrative(
        &self,
        character_name: &str,
        user_input: &str,
        story_so_far: &str,
    ) -> Result<NarrativeTurn, AIError> {
        let request = ModelRequest {
            flow: "narrative_engine",
            prompt: narrative_prompt(character_name, story_so_far, user_input),
            output: Self::output_schema(),
        };

        let output = self.provider.invoke(request).await?;
        let ai_reply = extract_reply(output)?;

        let turn = Turn::new(character_name, user_input, ai_reply);
        let updated_story = Transcript::new(story_so_far).append(&turn).into_string();
        log::debug!(
            "{} replied with {} characters",
            character_name,
            turn.reply.chars().count()
        );

        Ok(NarrativeTurn {
            ai_reply: turn.reply,
            updated_story,
        })
    }
}

fn extract_reply(output: Option<Value>) -> Result<String, AIError> {
    let Some(output) = output else {
        log::error!("The model did not return a structured response");
        return Err(AIError::InvalidResponse(
            "AI failed to generate a meaningful response.".to_string(),
        ));
    };

    match output.get(CHARACTER_RESPONSE_FIELD) {
        Some(Value::String(reply)) if !reply.trim().is_empty() => Ok(reply.clone()),
        _ => {
            log::error!("The model did not return a valid {CHARACTER_RESPONSE_FIELD}. Output: {output}");
            Err(AIError::InvalidResponse(
                "AI failed to generate a meaningful response.".to_string(),
            ))
        }
    }
}
