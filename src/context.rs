use crate::{character::CharacterPersona, settings::Settings, ui::spinner::Spinner};

/// Shared state lent to the active component for one key press or frame.
#[derive(Debug)]
pub struct Context<'a> {
    pub characters: &'a [CharacterPersona],
    pub settings: &'a Settings,
    pub spinner: &'a Spinner,
    pub notice: Option<&'a str>,
}
