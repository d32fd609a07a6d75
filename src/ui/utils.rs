use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use tui_input::Input;

use super::{MIN_HEIGHT, MIN_WIDTH};

pub fn center_rect(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    area
}

/// Draws the resize warning and returns true when the area is too small for
/// any screen.
pub fn render_too_small(area: Rect, buffer: &mut Buffer) -> bool {
    if area.width >= MIN_WIDTH && area.height >= MIN_HEIGHT {
        return false;
    }
    Paragraph::new("Terminal too small. Please resize.")
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .render(area, buffer);
    true
}

pub fn render_status(message: &str, area: Rect, buffer: &mut Buffer) {
    Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .render(area, buffer);
}

/// Single-line input with a block cursor. The buffer API has no terminal
/// cursor, so the cell under it is drawn reversed.
pub fn render_input(
    input: &Input,
    title: &str,
    focused: bool,
    area: Rect,
    buffer: &mut Buffer,
) {
    let border_color = if focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    block.render(area, buffer);

    let width = inner.width.max(1) as usize;
    let scroll = input.visual_scroll(width.saturating_sub(1));
    Paragraph::new(input.value())
        .style(Style::default().fg(Color::White))
        .scroll((0, scroll as u16))
        .render(inner, buffer);

    if focused {
        let x = inner.x + (input.visual_cursor().saturating_sub(scroll)) as u16;
        if x < inner.right() {
            if let Some(cell) = buffer.cell_mut((x, inner.y)) {
                cell.set_style(Style::default().add_modifier(Modifier::REVERSED));
            }
        }
    }
}
