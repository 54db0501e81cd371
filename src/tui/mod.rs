//! Terminal user interface for the chat archive, built on Ratatui.

pub mod avatar;
mod app;
mod backend;
mod help;
pub mod messages;
mod sidebar;
mod ui;

pub use app::run;
