// ui/catalog.rs

use super::{
    Component, CreateStory,
    constants::{CATALOG_KEYS, TITLE},
    utils::{center_rect, render_status, render_too_small},
};
use crate::{app::Action, context::Context};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::*,
};

/// Character picker shown at startup.
#[derive(Debug, Default)]
pub struct Catalog {
    selected: usize,
}

impl Component for Catalog {
    fn on_key(&mut self, key: KeyEvent, context: Context) -> Option<Action> {
        let count = context.characters.len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char('n') => Some(Action::SwitchComponent(Box::new(CreateStory::default()))),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < count {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Enter => context
                .characters
                .get(self.selected)
                .map(|character| Action::OpenChat(character.id.clone())),
            _ => None,
        }
    }

    fn render(&self, area: Rect, buffer: &mut Buffer, context: &Context) {
        if render_too_small(area, buffer) {
            return;
        }

        let [header, title, console, list, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(8),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .areas(area);

        Paragraph::new(format!(
            "Magic Tales v{} · {}",
            env!("CARGO_PKG_VERSION"),
            context.settings.model
        ))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .render(header, buffer);

        let title_area = center_rect(title, Constraint::Length(56), Constraint::Length(7));
        Paragraph::new(TITLE)
            .style(Style::default().fg(Color::Magenta))
            .render(title_area, buffer);

        if let Some(notice) = context.notice {
            Paragraph::new(notice)
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center)
                .render(console, buffer);
        }

        self.render_list(list, buffer, context);
        render_status(CATALOG_KEYS, status, buffer);
    }
}

impl Catalog {
    fn render_list(&self, area: Rect, buffer: &mut Buffer, context: &Context) {
        let block = Block::default()
            .title(" Choose a companion ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        if context.characters.is_empty() {
            Paragraph::new("No characters yet. Press n to conjure one.")
                .alignment(Alignment::Center)
                .block(block)
                .render(area, buffer);
            return;
        }

        let items: Vec<ListItem> = context
            .characters
            .iter()
            .enumerate()
            .map(|(i, character)| {
                let name_style = if i == self.selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(vec![
                    Line::from(Span::styled(format!("{}. {}", i + 1, character.name), name_style)),
                    Line::from(Span::styled(
                        format!("   {}", character.description),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);
        let mut state = ListState::default().with_selected(Some(self.selected));
        StatefulWidget::render(list, area, buffer, &mut state);
    }
}
