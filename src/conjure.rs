use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::AIError;
use crate::prompts::conjure_prompt;
use crate::provider::{ModelProvider, ModelRequest, OutputSchema, SchemaField};

/// A generated character bundle, waiting for human review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvisioningResult {
    pub character_name: String,
    pub story_teaser: String,
    pub player_quest: String,
    pub ai_definition: String,
    pub initial_greeting: String,
    pub suggested_question1: String,
    pub suggested_question2: String,
    pub suggested_question3: String,
    pub image_hint: String,
}

// What the model actually sends back: the questions may be missing or null.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProvisioning {
    character_name: String,
    story_teaser: String,
    player_quest: String,
    ai_definition: String,
    initial_greeting: String,
    #[serde(default)]
    suggested_question1: Option<String>,
    #[serde(default)]
    suggested_question2: Option<String>,
    #[serde(default)]
    suggested_question3: Option<String>,
    image_hint: String,
}

impl From<RawProvisioning> for ProvisioningResult {
    fn from(raw: RawProvisioning) -> Self {
        ProvisioningResult {
            character_name: raw.character_name,
            story_teaser: raw.story_teaser,
            player_quest: raw.player_quest,
            ai_definition: raw.ai_definition,
            initial_greeting: raw.initial_greeting,
            suggested_question1: raw.suggested_question1.unwrap_or_default(),
            suggested_question2: raw.suggested_question2.unwrap_or_default(),
            suggested_question3: raw.suggested_question3.unwrap_or_default(),
            image_hint: raw.image_hint,
        }
    }
}

/// A field of a reviewed bundle that falls outside the creation form's bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: &'static str,
}

struct FieldRule {
    field: &'static str,
    min: usize,
    max: usize,
    too_short: &'static str,
    too_long: &'static str,
}

const REVIEW_RULES: [FieldRule; 5] = [
    FieldRule {
        field: "characterName",
        min: 3,
        max: 50,
        too_short: "Character name must be at least 3 characters.",
        too_long: "Character name cannot exceed 50 characters.",
    },
    FieldRule {
        field: "storyTeaser",
        min: 10,
        max: 250,
        too_short: "Story teaser must be at least 10 characters.",
        too_long: "Story teaser cannot exceed 250 characters.",
    },
    FieldRule {
        field: "playerQuest",
        min: 10,
        max: 500,
        too_short: "Player's quest must be at least 10 characters.",
        too_long: "Player's quest cannot exceed 500 characters.",
    },
    FieldRule {
        field: "aiDefinition",
        min: 50,
        max: 5000,
        too_short: "AI definition must be at least 50 characters.",
        too_long: "AI definition cannot exceed 5000 characters.",
    },
    FieldRule {
        field: "initialGreeting",
        min: 5,
        max: 300,
        too_short: "Initial greeting must be at least 5 characters.",
        too_long: "Initial greeting cannot exceed 300 characters.",
    },
];

const MAX_SUGGESTED_QUESTION_CHARS: usize = 150;

impl ProvisioningResult {
    /// Every field with its wire key, in the order the creation form lists
    /// them.
    pub fn fields(&self) -> [(&'static str, &str); 9] {
        [
            ("characterName", self.character_name.as_str()),
            ("storyTeaser", self.story_teaser.as_str()),
            ("playerQuest", self.player_quest.as_str()),
            ("aiDefinition", self.ai_definition.as_str()),
            ("initialGreeting", self.initial_greeting.as_str()),
            ("suggestedQuestion1", self.suggested_question1.as_str()),
            ("suggestedQuestion2", self.suggested_question2.as_str()),
            ("suggestedQuestion3", self.suggested_question3.as_str()),
            ("imageHint", self.image_hint.as_str()),
        ]
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "characterName" => Some(&mut self.character_name),
            "storyTeaser" => Some(&mut self.story_teaser),
            "playerQuest" => Some(&mut self.player_quest),
            "aiDefinition" => Some(&mut self.ai_definition),
            "initialGreeting" => Some(&mut self.initial_greeting),
            "suggestedQuestion1" => Some(&mut self.suggested_question1),
            "suggestedQuestion2" => Some(&mut self.suggested_question2),
            "suggestedQuestion3" => Some(&mut self.suggested_question3),
            "imageHint" => Some(&mut self.image_hint),
            _ => None,
        }
    }

    fn required_fields(&self) -> [&str; 5] {
        [
            self.character_name.as_str(),
            self.story_teaser.as_str(),
            self.player_quest.as_str(),
            self.ai_definition.as_str(),
            self.initial_greeting.as_str(),
        ]
    }

    /// Checks the bundle against the bounds a reviewer must respect before
    /// the character can be saved. The generator never calls this: the
    /// length guidance it gives the model is advisory.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations: Vec<FieldViolation> = REVIEW_RULES
            .iter()
            .zip(self.required_fields())
            .filter_map(|(rule, value)| {
                let len = value.chars().count();
                if len < rule.min {
                    Some(FieldViolation {
                        field: rule.field,
                        message: rule.too_short,
                    })
                } else if len > rule.max {
                    Some(FieldViolation {
                        field: rule.field,
                        message: rule.too_long,
                    })
                } else {
                    None
                }
            })
            .collect();

        for (field, question) in [
            ("suggestedQuestion1", &self.suggested_question1),
            ("suggestedQuestion2", &self.suggested_question2),
            ("suggestedQuestion3", &self.suggested_question3),
        ] {
            if question.chars().count() > MAX_SUGGESTED_QUESTION_CHARS {
                violations.push(FieldViolation {
                    field,
                    message: "Suggested question cannot exceed 150 characters.",
                });
            }
        }

        violations
    }
}

#[derive(Clone)]
pub struct CharacterConjurer {
    provider: Arc<dyn ModelProvider>,
}

impl CharacterConjurer {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }

    pub fn output_schema() -> OutputSchema {
        OutputSchema::new(
            "full_story_character",
            vec![
                SchemaField::required("characterName", "The generated AI character's name."),
                SchemaField::required(
                    "storyTeaser",
                    "A brief, enticing summary for the story feed card (max 250 characters).",
                ),
                SchemaField::required(
                    "playerQuest",
                    "The player's quest or goal when interacting with this AI (max 500 characters).",
                ),
                SchemaField::required(
                    "aiDefinition",
                    "The detailed base prompt defining the AI's personality, knowledge, conversational style, and goals (min 150 words).",
                ),
                SchemaField::required(
                    "initialGreeting",
                    "The AI's first message to the user (max 300 characters).",
                ),
                SchemaField::optional(
                    "suggestedQuestion1",
                    "An optional insightful question the player could ask the AI to get started (max 150 characters).",
                ),
                SchemaField::optional(
                    "suggestedQuestion2",
                    "A second optional suggested question (max 150 characters).",
                ),
                SchemaField::optional(
                    "suggestedQuestion3",
                    "A third optional suggested question (max 150 characters).",
                ),
                SchemaField::required(
                    "imageHint",
                    "A two-word hint for the main story image (e.g., 'fantasy character', 'space nebula').",
                ),
            ],
        )
    }

    /// Asks the model for a complete character bundle. Blank or missing
    /// theme keywords mean no thematic constraint.
    pub async fn conjure_character(
        &self,
        theme_keywords: Option<&str>,
    ) -> Result<ProvisioningResult, AIError> {
        let theme = theme_keywords
            .map(str::trim)
            .filter(|theme| !theme.is_empty());

        let request = ModelRequest {
            flow: "generate_full_story_character",
            prompt: conjure_prompt(theme),
            output: Self::output_schema(),
        };

        let output = self.provider.invoke(request).await?;
        let bundle = parse_bundle(output)?;
        log::info!("Conjured a new character: {}", bundle.character_name);
        Ok(bundle)
    }
}

fn parse_bundle(output: Option<Value>) -> Result<ProvisioningResult, AIError> {
    let output = output.ok_or_else(|| {
        AIError::GenerationFailed("AI failed to generate character story details.".to_string())
    })?;

    let raw: RawProvisioning = serde_json::from_value(output).map_err(|e| {
        AIError::GenerationFailed(format!("Unreadable character story details: {e}"))
    })?;

    Ok(raw.into())
}
