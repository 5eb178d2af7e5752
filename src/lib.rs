//! Libris - a terminal bookshelf manager
//!
//! Libris keeps a personal book collection: add, edit, search, and mark
//! books finished, with the whole shelf mirrored to a single JSON slot
//! on disk after every change.

pub mod app;
pub mod book;
pub mod config;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
