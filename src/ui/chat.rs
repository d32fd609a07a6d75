// ui/chat.rs

use super::{
    Catalog, Component,
    constants::CHAT_KEYS,
    spinner::spinner_frame,
    utils::{render_input, render_status, render_too_small},
};
use crate::{
    app::{Action, ModelResponse, TurnRequest},
    character::CharacterPersona,
    context::Context,
    message::{ChatInputError, ChatMessage, Sender, TROUBLE_RESPONDING, validate_chat_input},
    transcript::Transcript,
};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::*,
};
use std::cell::Cell;
use tui_input::{Input, backend::crossterm::EventHandler};
use uuid::Uuid;

/// Conversation with one character. The transcript is replaced only when a
/// turn succeeds, so a failed turn leaves it as it was.
#[derive(Debug)]
pub struct ChatView {
    character: CharacterPersona,
    session: Uuid,
    transcript: Transcript,
    messages: Vec<ChatMessage>,
    input: Input,
    input_error: Option<ChatInputError>,
    pending: bool,
    // Lines scrolled up from the bottom, never past the first line.
    scroll: u16,
    // Set on each render, once the wrapped height is known.
    max_scroll: Cell<u16>,
}

impl ChatView {
    pub fn new(character: CharacterPersona) -> Self {
        let transcript = Transcript::new(character.initial_story_context());
        let messages = vec![ChatMessage::greeting(&character)];
        Self {
            character,
            session: Uuid::new_v4(),
            transcript,
            messages,
            input: Input::default(),
            input_error: None,
            pending: false,
            scroll: 0,
            max_scroll: Cell::new(0),
        }
    }

    fn submit(&mut self) -> Option<Action> {
        if self.pending {
            return None;
        }
        let user_input = match validate_chat_input(self.input.value()) {
            Ok(text) => text.to_string(),
            Err(e) => {
                self.input_error = Some(e);
                return None;
            }
        };

        self.messages
            .push(ChatMessage::new(Sender::User, user_input.clone()));
        self.input.reset();
        self.input_error = None;
        self.pending = true;
        self.scroll = 0;

        Some(Action::SubmitTurn(TurnRequest {
            session: self.session,
            character_name: self.character.name.clone(),
            user_input,
            story_so_far: self.transcript.as_str().to_string(),
        }))
    }

    fn render_header(&self, area: Rect, buffer: &mut Buffer) {
        let mut lines = vec![
            Line::from(Span::styled(
                self.character.name.as_str(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.character.description.as_str(),
                Style::default().fg(Color::Gray),
            )),
        ];
        if let Some(quest) = &self.character.quest_objective {
            lines.push(Line::from(vec![
                Span::styled("Quest: ", Style::default().fg(Color::Yellow)),
                Span::raw(quest.as_str()),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .render(area, buffer);
    }

    fn message_lines(&self, width: usize) -> Vec<Line<'_>> {
        let mut lines = Vec::new();
        for message in &self.messages {
            let (label, style) = match message.sender {
                Sender::User => ("You", Style::default().fg(Color::Cyan)),
                Sender::Ai => (self.character.name.as_str(), Style::default().fg(Color::Magenta)),
                Sender::System => ("", Style::default().fg(Color::Yellow)),
            };

            if !label.is_empty() {
                lines.push(Line::from(vec![
                    Span::styled(label.to_string(), style.add_modifier(Modifier::BOLD)),
                    Span::styled(
                        format!("  {}", message.timestamp.format("%H:%M")),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
            }
            let text_style = match message.sender {
                Sender::System => style.add_modifier(Modifier::ITALIC),
                _ => Style::default().fg(Color::White),
            };
            for paragraph in message.text.lines() {
                for wrapped in textwrap::wrap(paragraph, width.max(1)) {
                    lines.push(Line::from(Span::styled(wrapped.into_owned(), text_style)));
                }
            }
            lines.push(Line::default());
        }
        lines
    }

    fn render_messages(&self, area: Rect, buffer: &mut Buffer, context: &Context) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buffer);

        let mut lines = self.message_lines(inner.width as usize);
        if self.pending {
            lines.push(Line::from(Span::styled(
                spinner_frame(context.spinner, &self.character.name),
                Style::default().fg(Color::Green),
            )));
        }

        let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let bottom = total.saturating_sub(inner.height);
        self.max_scroll.set(bottom);
        let offset = bottom - self.scroll.min(bottom);
        Paragraph::new(lines)
            .scroll((offset, 0))
            .render(inner, buffer);
    }
}

impl Component for ChatView {
    fn on_key(&mut self, key: KeyEvent, _context: Context) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::SwitchComponent(Box::new(Catalog::default()))),
            KeyCode::Enter => self.submit(),
            KeyCode::PageUp | KeyCode::Up => {
                self.scroll = self.scroll.saturating_add(3).min(self.max_scroll.get());
                None
            }
            KeyCode::PageDown | KeyCode::Down => {
                self.scroll = self.scroll.saturating_sub(3);
                None
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                self.input_error = None;
                None
            }
        }
    }

    fn on_response(&mut self, response: ModelResponse) -> Option<Action> {
        let ModelResponse::Turn { session, response } = response else {
            return None;
        };
        if session != self.session {
            log::debug!("Dropping a reply meant for an earlier conversation");
            return None;
        }

        self.pending = false;
        self.scroll = 0;
        match response.into_result() {
            Ok(turn) => {
                self.messages.push(ChatMessage::new(Sender::Ai, turn.ai_reply));
                self.transcript = Transcript::from(turn.updated_story);
            }
            Err(_) => {
                self.messages
                    .push(ChatMessage::new(Sender::System, TROUBLE_RESPONDING));
            }
        }
        None
    }

    fn is_waiting(&self) -> bool {
        self.pending
    }

    fn render(&self, area: Rect, buffer: &mut Buffer, context: &Context) {
        if render_too_small(area, buffer) {
            return;
        }

        let header_height = if self.character.quest_objective.is_some() { 4 } else { 3 };
        let [header, messages, input, status] = Layout::vertical([
            Constraint::Length(header_height),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(header, buffer);
        self.render_messages(messages, buffer, context);

        let title = match self.input_error {
            Some(error) => error.to_string(),
            None => format!("Message {}", self.character.name),
        };
        render_input(&self.input, &title, !self.pending, input, buffer);

        let status_text = context.notice.unwrap_or(CHAT_KEYS);
        render_status(status_text, status, buffer);
    }
}
