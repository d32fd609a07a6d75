//! Operations exposed to the presentation layer.
//!
//! Each one runs a single flow and folds the outcome into an
//! [`ActionResponse`], so the UI only ever deals with a success flag, the
//! data, or a message it can show as is.

use serde::{Deserialize, Serialize};

use crate::conjure::{CharacterConjurer, ProvisioningResult};
use crate::error::AIError;
use crate::narrative::{NarrativeEngine, NarrativeTurn};
use crate::story_elements::StoryElementsGenerator;

pub const AI_RESPONSE_FAILED: &str = "Failed to get AI response.";
pub const CONJURE_FAILED: &str = "Could not generate AI story. Please try again.";
pub const STORY_ELEMENTS_FAILED: &str = "Failed to generate story elements.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionResponse<T> {
    pub fn ok(data: T) -> Self {
        ActionResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        ActionResponse {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    fn from_result(result: Result<T, AIError>, context: &str, message: &str) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                log::error!("Error in {context}: {e}");
                Self::failed(message)
            }
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self
                .error
                .unwrap_or_else(|| "An unexpected error occurred with the AI.".to_string())),
        }
    }
}

pub async fn get_ai_response(
    engine: &NarrativeEngine,
    character_name: &str,
    user_input: &str,
    story_so_far: &str,
) -> ActionResponse<NarrativeTurn> {
    let result = engine
        .advance_narrative(character_name, user_input, story_so_far)
        .await;
    ActionResponse::from_result(result, "narrative engine", AI_RESPONSE_FAILED)
}

pub async fn conjure_new_character_story(
    conjurer: &CharacterConjurer,
    theme_keywords: Option<&str>,
) -> ActionResponse<ProvisioningResult> {
    let result = conjurer.conjure_character(theme_keywords).await;
    ActionResponse::from_result(result, "character conjuring", CONJURE_FAILED)
}

pub async fn generate_story_elements(
    generator: &StoryElementsGenerator,
    character_prompt: &str,
) -> ActionResponse<String> {
    let result = generator.generate_story_elements(character_prompt).await;
    ActionResponse::from_result(result, "story elements", STORY_ELEMENTS_FAILED)
}
