// Character records and the catalog that serves them.
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::conjure::ProvisioningResult;

pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/600x400.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPersona {
    pub id: String,
    pub name: String,
    // Short description for the catalog card.
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_hint: Option<String>,
    // Persona instructions and transcript seed are fixed once provisioned.
    story_prompt: String,
    pub initial_greeting: String,
    initial_story_context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest_objective: Option<String>,
}

impl CharacterPersona {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
        story_prompt: impl Into<String>,
        initial_greeting: impl Into<String>,
        initial_story_context: impl Into<String>,
    ) -> Self {
        CharacterPersona {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            long_description: None,
            image_url: image_url.into(),
            image_hint: None,
            story_prompt: story_prompt.into(),
            initial_greeting: initial_greeting.into(),
            initial_story_context: initial_story_context.into(),
            quest_objective: None,
        }
    }

    pub fn with_long_description(mut self, long_description: impl Into<String>) -> Self {
        self.long_description = Some(long_description.into());
        self
    }

    pub fn with_image_hint(mut self, image_hint: impl Into<String>) -> Self {
        self.image_hint = Some(image_hint.into());
        self
    }

    pub fn with_quest_objective(mut self, quest_objective: impl Into<String>) -> Self {
        self.quest_objective = Some(quest_objective.into());
        self
    }

    /// Turns a reviewed bundle into a character record. The persona
    /// definition doubles as the transcript seed, since that is how it
    /// reaches the model.
    pub fn from_provisioning(
        id: impl Into<String>,
        bundle: ProvisioningResult,
        image_url: impl Into<String>,
    ) -> Self {
        let non_empty = |value: String| (!value.trim().is_empty()).then_some(value);

        CharacterPersona {
            id: id.into(),
            name: bundle.character_name,
            description: bundle.story_teaser,
            long_description: None,
            image_url: image_url.into(),
            image_hint: non_empty(bundle.image_hint),
            story_prompt: bundle.ai_definition.clone(),
            initial_greeting: bundle.initial_greeting,
            initial_story_context: bundle.ai_definition,
            quest_objective: non_empty(bundle.player_quest),
        }
    }

    pub fn story_prompt(&self) -> &str {
        &self.story_prompt
    }

    pub fn initial_story_context(&self) -> &str {
        &self.initial_story_context
    }
}

/// Read-only lookup of character records.
pub trait CharacterRepository: Send + Sync {
    fn find_by_id(&self, id: &str) -> Option<CharacterPersona>;
    fn list(&self) -> Vec<CharacterPersona>;
}

/// Session-only catalog. Nothing here outlives the process.
#[derive(Debug, Default)]
pub struct InMemoryCharacterRepository {
    characters: RwLock<Vec<CharacterPersona>>,
}

impl InMemoryCharacterRepository {
    pub fn new(characters: Vec<CharacterPersona>) -> Self {
        Self {
            characters: RwLock::new(characters),
        }
    }

    pub fn with_placeholders() -> Self {
        Self::new(placeholder_characters())
    }

    /// Adds a character, replacing any record that already uses its id.
    pub fn insert(&self, character: CharacterPersona) {
        let mut characters = match self.characters.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        characters.retain(|existing| existing.id != character.id);
        characters.push(character);
    }
}

impl CharacterRepository for InMemoryCharacterRepository {
    fn find_by_id(&self, id: &str) -> Option<CharacterPersona> {
        let characters = match self.characters.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        characters.iter().find(|c| c.id == id).cloned()
    }

    fn list(&self) -> Vec<CharacterPersona> {
        match self.characters.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Builds a catalog id from a display name: lowercase words joined by dashes
/// plus a short random suffix.
pub fn character_id_for(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    let suffix = uuid::Uuid::new_v4().simple().to_string();

    if slug.is_empty() {
        format!("character-{}", &suffix[..8])
    } else {
        format!("{slug}-{}", &suffix[..8])
    }
}

pub fn placeholder_characters() -> Vec<CharacterPersona> {
    vec![
        CharacterPersona::new(
            "elara",
            "Elara",
            "Unravel cosmic mysteries with an ancient celestial guide.",
            PLACEHOLDER_IMAGE_URL,
            "Elara is an ancient, wise, mystical being who guides the player to find the Heart of the Cosmos. She speaks poetically, knows much about celestial events, and tests the player's worthiness with riddles about constellations. She avoids direct answers but offers cryptic clues, and refers to the player as 'Seeker of Truths'.",
            "Greetings, traveler. The stars have foretold your arrival. What secrets of the cosmos do you seek?",
            "Elara, an ancient celestial guide who speaks in riddles about the constellations, waits atop a crumbling observatory for a Seeker of Truths worthy of the Heart of the Cosmos.",
        )
        .with_long_description(
            "Beneath a sky that never fully darkens, Elara has kept watch for a thousand years. She knows where the Heart of the Cosmos lies, but she will only lead those who can read the stars as she does.",
        )
        .with_image_hint("celestial woman")
        .with_quest_objective("Discover the location of the legendary Heart of the Cosmos."),
        CharacterPersona::new(
            "grimsby",
            "Grimsby",
            "A clockwork librarian guards a book that rewrites itself.",
            PLACEHOLDER_IMAGE_URL,
            "Grimsby is a fussy, kind-hearted clockwork librarian who ticks when thinking. He is obsessed with order, quotes imaginary books, and wants the player's help to find out who keeps changing the ending of the Ever-Turning Tome.",
            "Ah! A visitor. Mind the shelves, they bite. Have you come about the book?",
            "Grimsby, a ticking clockwork librarian, tends the Library of Unwritten Things, where the Ever-Turning Tome has begun to rewrite its own final chapter.",
        )
        .with_image_hint("clockwork robot")
        .with_quest_objective("Find out who is rewriting the ending of the Ever-Turning Tome."),
        CharacterPersona::new(
            "captain-vey",
            "Captain Vey",
            "Sail a storm-wrecked sky ship with a captain who lost her map.",
            PLACEHOLDER_IMAGE_URL,
            "Captain Vey is a brash, witty sky pirate who hides her worry behind bravado. She trusts the player only after they prove useful, speaks in nautical slang, and needs to reach the Floating Archipelago before the storm season closes the skies.",
            "You! Deckhand! Can you read wind charts, or are you just ballast?",
            "Captain Vey's sky ship, the Gilded Gull, limps through thunderheads after losing its only chart to the Floating Archipelago.",
        )
        .with_image_hint("sky pirate"),
    ]
}
