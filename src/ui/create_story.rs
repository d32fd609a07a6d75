// ui/create_story.rs

use super::{
    Catalog, Component,
    constants::{EDIT_KEYS, REVIEW_KEYS, THEME_KEYS},
    spinner::spinner_frame,
    utils::{render_input, render_status, render_too_small},
};
use crate::{
    app::{Action, ModelResponse},
    conjure::{FieldViolation, ProvisioningResult},
    context::Context,
};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::*,
};
use tui_input::{Input, backend::crossterm::EventHandler};

const REVIEW_REJECTED: &str =
    "This story does not pass review. Edit the marked fields or press r to regenerate.";

const FIELD_LABELS: [&str; 9] = [
    "Name",
    "Teaser",
    "Quest",
    "Persona",
    "Greeting",
    "Question 1",
    "Question 2",
    "Question 3",
    "Image hint",
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Focus {
    #[default]
    Theme,
    Review,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Conjure,
    StoryElements,
}

/// Theme entry, then review of a bundle before it joins the catalog. The
/// bundle is either conjured or written by hand, and any field can be edited
/// during review.
#[derive(Debug, Default)]
pub struct CreateStory {
    theme: Input,
    focus: Focus,
    bundle: Option<ProvisioningResult>,
    violations: Vec<FieldViolation>,
    story_elements: Option<String>,
    pending: Option<Pending>,
    error: Option<String>,
    // Index into `ProvisioningResult::fields`
    selected: usize,
    editor: Input,
}

impl CreateStory {
    fn review(&mut self, bundle: ProvisioningResult) {
        self.violations = bundle.validate();
        self.bundle = Some(bundle);
        self.story_elements = None;
        self.focus = Focus::Review;
        self.selected = 0;
    }

    fn conjure(&mut self) -> Option<Action> {
        let theme = Some(self.theme.value().trim())
            .filter(|theme| !theme.is_empty())
            .map(str::to_string);
        self.pending = Some(Pending::Conjure);
        self.error = None;
        Some(Action::Conjure(theme))
    }

    fn on_theme_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => self.conjure(),
            KeyCode::Tab if self.bundle.is_some() => {
                self.focus = Focus::Review;
                None
            }
            KeyCode::Tab => {
                log::info!("Starting a handwritten story");
                self.error = None;
                self.review(ProvisioningResult::default());
                None
            }
            _ => {
                self.theme.handle_event(&Event::Key(key));
                None
            }
        }
    }

    fn on_review_key(&mut self, key: KeyEvent) -> Option<Action> {
        let bundle = self.bundle.as_ref()?;
        match key.code {
            KeyCode::Char('a') => {
                if self.violations.is_empty() {
                    Some(Action::AcceptCharacter(bundle.clone()))
                } else {
                    self.error = Some(REVIEW_REJECTED.to_string());
                    None
                }
            }
            KeyCode::Char('r') => {
                self.bundle = None;
                self.violations.clear();
                self.story_elements = None;
                self.conjure()
            }
            KeyCode::Char('e') => {
                let prompt = bundle.ai_definition.clone();
                self.pending = Some(Pending::StoryElements);
                self.error = None;
                Some(Action::GenerateStoryElements(prompt))
            }
            KeyCode::Char('t') | KeyCode::Tab => {
                self.focus = Focus::Theme;
                None
            }
            KeyCode::Enter => {
                let (_, value) = bundle.fields()[self.selected];
                self.editor = Input::new(value.to_string());
                self.focus = Focus::Editing;
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(FIELD_LABELS.len() - 1);
                None
            }
            _ => None,
        }
    }

    fn on_edit_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => {
                let bundle = self.bundle.as_mut()?;
                let (field, _) = bundle.fields()[self.selected];
                if let Some(value) = bundle.field_mut(field) {
                    *value = self.editor.value().to_string();
                }
                self.violations = bundle.validate();
                self.error = None;
                self.focus = Focus::Review;
            }
            KeyCode::Esc => self.focus = Focus::Review,
            _ => {
                self.editor.handle_event(&Event::Key(key));
            }
        }
        None
    }

    // Fields above the selected one are folded away so the selection is
    // always on screen.
    fn review_lines(&self, bundle: &ProvisioningResult) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if self.selected > 0 {
            lines.push(Line::from(Span::styled(
                format!("↑ {} more", self.selected),
                Style::default().fg(Color::DarkGray),
            )));
        }

        let fields = bundle.fields().into_iter().zip(FIELD_LABELS).enumerate();
        for (index, ((field, value), label)) in fields.skip(self.selected) {
            let mut label_style = Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD);
            if index == self.selected && self.focus != Focus::Theme {
                label_style = label_style.add_modifier(Modifier::REVERSED);
            }
            lines.push(Line::from(Span::styled(label, label_style)));
            let value = if value.is_empty() { "(none)" } else { value };
            for line in value.lines() {
                lines.push(Line::from(line.to_string()));
            }
            for violation in self.violations.iter().filter(|v| v.field == field) {
                lines.push(Line::from(Span::styled(
                    format!("✗ {}", violation.message),
                    Style::default().fg(Color::Red),
                )));
            }
            lines.push(Line::default());
        }

        if let Some(elements) = &self.story_elements {
            lines.push(Line::from(Span::styled(
                "Story elements",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            for line in elements.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        lines
    }

    fn render_review(&self, area: Rect, buffer: &mut Buffer, context: &Context) {
        let border_color = if self.focus != Focus::Theme {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .title(" Review ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let lines = match (&self.bundle, self.pending) {
            (_, Some(Pending::Conjure)) => vec![Line::from(Span::styled(
                spinner_frame(context.spinner, "The storyteller"),
                Style::default().fg(Color::Green),
            ))],
            (Some(bundle), pending) => {
                let mut lines = self.review_lines(bundle);
                if pending == Some(Pending::StoryElements) {
                    lines.push(Line::from(Span::styled(
                        spinner_frame(context.spinner, "The storyteller"),
                        Style::default().fg(Color::Green),
                    )));
                }
                lines
            }
            (None, _) => vec![Line::from(Span::styled(
                "Enter a few theme keywords, or leave it blank for a surprise, then press Enter. Press Tab to write your own.",
                Style::default().fg(Color::Gray),
            ))],
        };

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block)
            .render(area, buffer);
    }
}

impl Component for CreateStory {
    fn on_key(&mut self, key: KeyEvent, _context: Context) -> Option<Action> {
        if self.focus == Focus::Editing {
            return self.on_edit_key(key);
        }
        if key.code == KeyCode::Esc {
            return Some(Action::SwitchComponent(Box::new(Catalog::default())));
        }
        if self.pending.is_some() {
            return None;
        }
        match self.focus {
            Focus::Theme => self.on_theme_key(key),
            Focus::Review => self.on_review_key(key),
            Focus::Editing => None,
        }
    }

    fn on_response(&mut self, response: ModelResponse) -> Option<Action> {
        match (response, self.pending) {
            (ModelResponse::Conjured(response), Some(Pending::Conjure)) => {
                self.pending = None;
                match response.into_result() {
                    Ok(bundle) => {
                        self.review(bundle);
                        if !self.violations.is_empty() {
                            log::info!(
                                "Conjured story has {} review violations",
                                self.violations.len()
                            );
                        }
                    }
                    Err(message) => self.error = Some(message),
                }
            }
            (ModelResponse::StoryElements(response), Some(Pending::StoryElements)) => {
                self.pending = None;
                match response.into_result() {
                    Ok(elements) => self.story_elements = Some(elements),
                    Err(message) => self.error = Some(message),
                }
            }
            _ => {}
        }
        None
    }

    fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    fn render(&self, area: Rect, buffer: &mut Buffer, context: &Context) {
        if render_too_small(area, buffer) {
            return;
        }

        let [title, theme, console, review, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        Paragraph::new("Conjure a new story")
            .style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )
            .render(title, buffer);

        if self.focus == Focus::Editing {
            let title = format!("Editing {}", FIELD_LABELS[self.selected]);
            render_input(&self.editor, &title, true, theme, buffer);
        } else {
            render_input(
                &self.theme,
                "Theme keywords",
                self.focus == Focus::Theme && self.pending.is_none(),
                theme,
                buffer,
            );
        }

        if let Some(error) = &self.error {
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .render(console, buffer);
        }

        self.render_review(review, buffer, context);

        let keys = match self.focus {
            Focus::Theme => THEME_KEYS,
            Focus::Review => REVIEW_KEYS,
            Focus::Editing => EDIT_KEYS,
        };
        render_status(keys, status, buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{actions::ActionResponse, settings::Settings, ui::spinner::Spinner};
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key(screen: &mut CreateStory, code: KeyCode) -> Option<Action> {
        let settings = Settings::default();
        let spinner = Spinner::new();
        screen.on_key(
            press(code),
            Context {
                characters: &[],
                settings: &settings,
                spinner: &spinner,
                notice: None,
            },
        )
    }

    fn valid_bundle() -> ProvisioningResult {
        ProvisioningResult {
            character_name: "Captain Mirelle".into(),
            story_teaser: "A smuggler captain with a map nobody else can read.".into(),
            player_quest: "Help Mirelle reach the drowned lighthouse before dawn.".into(),
            ai_definition: "You are Captain Mirelle, a sharp-tongued smuggler who trusts the sea more than people.".into(),
            initial_greeting: "Welcome aboard, deckhand.".into(),
            suggested_question1: "Where are we sailing?".into(),
            ..ProvisioningResult::default()
        }
    }

    fn conjured(screen: &mut CreateStory, bundle: ProvisioningResult) {
        screen.on_response(ModelResponse::Conjured(ActionResponse::ok(bundle)));
    }

    #[test]
    fn blank_theme_conjures_without_keywords() {
        let mut screen = CreateStory::default();
        key(&mut screen, KeyCode::Char(' '));
        match key(&mut screen, KeyCode::Enter) {
            Some(Action::Conjure(theme)) => assert_eq!(theme, None),
            _ => panic!("expected Conjure"),
        }
        assert!(screen.is_waiting());
        // Keys are ignored while the model works.
        assert!(key(&mut screen, KeyCode::Enter).is_none());
    }

    #[test]
    fn theme_keywords_are_trimmed() {
        let mut screen = CreateStory::default();
        for c in " pirates ".chars() {
            key(&mut screen, KeyCode::Char(c));
        }
        match key(&mut screen, KeyCode::Enter) {
            Some(Action::Conjure(theme)) => assert_eq!(theme.as_deref(), Some("pirates")),
            _ => panic!("expected Conjure"),
        }
    }

    #[test]
    fn valid_bundle_can_be_accepted() {
        let mut screen = CreateStory::default();
        key(&mut screen, KeyCode::Enter);
        conjured(&mut screen, valid_bundle());

        assert!(screen.violations.is_empty());
        match key(&mut screen, KeyCode::Char('a')) {
            Some(Action::AcceptCharacter(bundle)) => assert_eq!(bundle, valid_bundle()),
            _ => panic!("expected AcceptCharacter"),
        }
    }

    #[test]
    fn bundle_with_violations_is_not_accepted() {
        let mut screen = CreateStory::default();
        key(&mut screen, KeyCode::Enter);
        conjured(
            &mut screen,
            ProvisioningResult {
                character_name: "Al".into(),
                ..valid_bundle()
            },
        );

        assert_eq!(screen.violations.len(), 1);
        assert!(key(&mut screen, KeyCode::Char('a')).is_none());
        assert_eq!(screen.error.as_deref(), Some(REVIEW_REJECTED));
    }

    #[test]
    fn edited_field_can_then_be_accepted() {
        let mut screen = CreateStory::default();
        key(&mut screen, KeyCode::Enter);
        conjured(
            &mut screen,
            ProvisioningResult {
                story_teaser: "x".repeat(251),
                ..valid_bundle()
            },
        );
        assert!(key(&mut screen, KeyCode::Char('a')).is_none());

        key(&mut screen, KeyCode::Down);
        key(&mut screen, KeyCode::Enter);
        assert_eq!(screen.editor.value().chars().count(), 251);
        for _ in 0..251 {
            key(&mut screen, KeyCode::Backspace);
        }
        let teaser = "A smuggler owes the sea a debt.";
        for c in teaser.chars() {
            key(&mut screen, KeyCode::Char(c));
        }
        key(&mut screen, KeyCode::Enter);

        assert!(screen.violations.is_empty());
        match key(&mut screen, KeyCode::Char('a')) {
            Some(Action::AcceptCharacter(bundle)) => {
                assert_eq!(bundle.story_teaser, teaser);
                assert_eq!(bundle.character_name, "Captain Mirelle");
            }
            _ => panic!("expected AcceptCharacter"),
        }
    }

    #[test]
    fn escape_while_editing_keeps_the_field() {
        let mut screen = CreateStory::default();
        key(&mut screen, KeyCode::Enter);
        conjured(&mut screen, valid_bundle());

        key(&mut screen, KeyCode::Enter);
        key(&mut screen, KeyCode::Char('!'));
        // Esc leaves the editor, not the screen.
        assert!(key(&mut screen, KeyCode::Esc).is_none());
        assert_eq!(screen.bundle, Some(valid_bundle()));
        assert_eq!(screen.focus, Focus::Review);
    }

    #[test]
    fn tab_without_a_bundle_starts_a_blank_story() {
        let mut screen = CreateStory::default();
        assert!(key(&mut screen, KeyCode::Tab).is_none());

        assert_eq!(screen.bundle, Some(ProvisioningResult::default()));
        assert_eq!(screen.violations.len(), 5);
        assert_eq!(screen.focus, Focus::Review);

        key(&mut screen, KeyCode::Enter);
        for c in "Old Tamsin".chars() {
            key(&mut screen, KeyCode::Char(c));
        }
        key(&mut screen, KeyCode::Enter);
        assert_eq!(screen.violations.len(), 4);
        assert!(screen.violations.iter().all(|v| v.field != "characterName"));
    }

    #[test]
    fn failed_conjure_shows_message() {
        let mut screen = CreateStory::default();
        key(&mut screen, KeyCode::Enter);
        screen.on_response(ModelResponse::Conjured(ActionResponse::failed(
            "Could not generate AI story. Please try again.",
        )));

        assert!(!screen.is_waiting());
        assert!(screen.bundle.is_none());
        assert_eq!(
            screen.error.as_deref(),
            Some("Could not generate AI story. Please try again.")
        );
    }

    #[test]
    fn story_elements_use_the_persona_definition() {
        let mut screen = CreateStory::default();
        key(&mut screen, KeyCode::Enter);
        conjured(&mut screen, valid_bundle());

        match key(&mut screen, KeyCode::Char('e')) {
            Some(Action::GenerateStoryElements(prompt)) => {
                assert_eq!(prompt, valid_bundle().ai_definition)
            }
            _ => panic!("expected GenerateStoryElements"),
        }
        screen.on_response(ModelResponse::StoryElements(ActionResponse::ok(
            "A drowned lighthouse.".to_string(),
        )));
        assert_eq!(screen.story_elements.as_deref(), Some("A drowned lighthouse."));
    }
}
