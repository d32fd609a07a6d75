pub mod actions;
pub mod app;
pub mod character;
pub mod conjure;
pub mod context;
pub mod error;
pub mod logging;
pub mod message;
pub mod narrative;
pub mod openai;
pub mod prompts;
pub mod provider;
pub mod settings;
pub mod story_elements;
pub mod transcript;
pub mod tui;
pub mod ui;

// Re-export commonly used items for easier access
pub use actions::{
    ActionResponse, conjure_new_character_story, generate_story_elements, get_ai_response,
};
pub use character::{CharacterPersona, CharacterRepository, InMemoryCharacterRepository};
pub use conjure::{CharacterConjurer, ProvisioningResult};
pub use error::{AIError, AppError, ProviderError};
pub use narrative::{NarrativeEngine, NarrativeTurn};
pub use openai::OpenAiProvider;
pub use provider::{ModelProvider, ModelRequest, OutputSchema};
pub use story_elements::StoryElementsGenerator;
pub use transcript::{Transcript, Turn};
