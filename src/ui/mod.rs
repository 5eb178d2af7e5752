//! UI rendering components

pub mod browse;
pub mod form;
pub mod help;
pub mod shelves;
pub mod status_bar;

use ratatui::Frame;

use crate::app::state::{AppState, Screen};
use crate::book::Bookshelf;
use crate::config::Config;

/// Main draw function
pub fn draw(frame: &mut Frame, shelf: &Bookshelf, state: &mut AppState, config: &Config) {
    let theme = config.active_theme();

    match state.screen {
        Screen::Browse => browse::draw(frame, shelf, state, &theme),
        Screen::Help => help::draw(frame, &theme),
    }
}
