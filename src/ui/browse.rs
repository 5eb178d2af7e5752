//! Browse screen with the two shelf panels

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use super::{form, shelves, status_bar};
use crate::app::state::{AppState, Shelf};
use crate::book::Bookshelf;
use crate::theme::Theme;

/// Draw the browse screen
pub fn draw(frame: &mut Frame, shelf: &Bookshelf, state: &mut AppState, theme: &Theme) {
    let area = frame.area();

    // Split vertically: shelf panels and status line
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let shelves_area = vertical_chunks[0];
    let status_area = vertical_chunks[1];

    let panels = split_shelves(shelves_area);

    shelves::draw(
        frame,
        panels[0],
        shelf,
        state,
        Shelf::Reading,
        theme,
        state.focused_shelf == Shelf::Reading,
    );
    shelves::draw(
        frame,
        panels[1],
        shelf,
        state,
        Shelf::Finished,
        theme,
        state.focused_shelf == Shelf::Finished,
    );

    status_bar::draw(frame, status_area, &state.status, shelf.is_persistent(), theme);

    // Overlay, drawn last so it sits on top of the panels
    form::draw(frame, area, &state.form, theme);
}

/// Split the shelves area into the two panels
fn split_shelves(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area)
        .to_vec()
}
