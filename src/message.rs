use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::character::CharacterPersona;

pub const MAX_CHAT_INPUT_CHARS: usize = 500;

pub const TROUBLE_RESPONDING: &str =
    "I'm having a bit of trouble responding right now. Please try again in a moment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    System,
}

// What the chat log displays. The transcript, not this, is what the model sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        ChatMessage {
            id: Uuid::new_v4(),
            sender,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    pub fn greeting(character: &CharacterPersona) -> Self {
        Self::new(Sender::System, character.initial_greeting.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChatInputError {
    #[error("Message cannot be empty")]
    Empty,
    #[error("Message too long")]
    TooLong,
}

/// Checks a chat line fits the chat form's bounds. The line is returned as
/// typed: whitespace-only input is rejected, but nothing is trimmed.
pub fn validate_chat_input(input: &str) -> Result<&str, ChatInputError> {
    if input.trim().is_empty() {
        Err(ChatInputError::Empty)
    } else if input.chars().count() > MAX_CHAT_INPUT_CHARS {
        Err(ChatInputError::TooLong)
    } else {
        Ok(input)
    }
}
