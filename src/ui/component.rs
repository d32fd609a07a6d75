use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect};
use std::fmt::Debug;

use crate::{
    app::{Action, ModelResponse},
    context::Context,
};

pub trait Component: Debug {
    fn on_key(&mut self, key: KeyEvent, context: Context) -> Option<Action>;

    /// Results of model calls land on whichever screen is active; screens
    /// that did not ask for them ignore them.
    fn on_response(&mut self, response: ModelResponse) -> Option<Action> {
        let _ = response;
        None
    }

    fn is_waiting(&self) -> bool {
        false
    }

    fn render(&self, area: Rect, buffer: &mut Buffer, context: &Context);
}
