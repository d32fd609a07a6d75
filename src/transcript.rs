use serde::{Deserialize, Serialize};
use std::fmt;

/// One user utterance and the character's reply to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub character_name: String,
    pub user_input: String,
    pub reply: String,
}

impl Turn {
    pub fn new(
        character_name: impl Into<String>,
        user_input: impl Into<String>,
        reply: impl Into<String>,
    ) -> Self {
        Turn {
            character_name: character_name.into(),
            user_input: user_input.into(),
            reply: reply.into(),
        }
    }

    /// The text this turn adds to the story so far.
    pub fn segment(&self) -> String {
        format!(
            "\nUser: {}\n{}: {}",
            self.user_input, self.character_name, self.reply
        )
    }
}

/// The story so far, as sent to the model on every turn.
///
/// Append-only: [`Transcript::append`] is the only way to grow it and it never
/// rewrites what is already there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(String);

impl Transcript {
    pub fn new(seed: impl Into<String>) -> Self {
        Transcript(seed.into())
    }

    pub fn append(&self, turn: &Turn) -> Transcript {
        let mut text = self.0.clone();
        text.push_str(&turn.segment());
        Transcript(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Transcript {
    fn from(text: String) -> Self {
        Transcript(text)
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
