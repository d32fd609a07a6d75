// ui/mod.rs

mod catalog;
mod chat;
mod component;
mod constants;
mod create_story;
pub mod spinner;
mod utils;

pub use catalog::Catalog;
pub use chat::ChatView;
pub use component::Component;
pub use create_story::CreateStory;

pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 20;
