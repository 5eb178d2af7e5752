//! Shelf panel component

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::state::{AppState, Shelf};
use crate::book::{Book, Bookshelf};
use crate::theme::Theme;

/// Draw one shelf panel
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    shelf: &Bookshelf,
    state: &mut AppState,
    which: Shelf,
    theme: &Theme,
    focused: bool,
) {
    let books = state.visible_books(shelf, which);

    let border_color = if focused { theme.border_focused } else { theme.border };
    let block = Block::default()
        .title(panel_title(which, books.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Update scroll bookkeeping for this panel
    let view = state.shelf_view_mut(which);
    view.visible_height = inner.height as usize;
    view.ensure_selection_visible();

    if books.is_empty() {
        let msg = if state.status.query.is_empty() {
            "No books on this shelf\n\nPress a to add one"
        } else {
            "No matches on this shelf"
        };
        let empty = Paragraph::new(msg)
            .style(Style::default().fg(theme.fg_muted))
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, inner);
        return;
    }

    let view = state.shelf_view(which);
    let lines: Vec<Line> = books
        .iter()
        .enumerate()
        .map(|(row, book)| book_line(book, row == view.selected, focused, theme))
        .collect();

    // Window the rows to the scroll offset
    let start = view.scroll_offset.min(lines.len().saturating_sub(1));
    let end = (start + view.visible_height).min(lines.len());
    let visible: Vec<Line> = lines.into_iter().skip(start).take(end - start).collect();

    frame.render_widget(Paragraph::new(visible), inner);
}

/// Panel title with the visible book count
fn panel_title(which: Shelf, count: usize) -> String {
    match which {
        Shelf::Reading => format!(" Reading ({count}) "),
        Shelf::Finished => format!(" Finished ({count}) "),
    }
}

/// One shelf row: the title, then author and year
fn book_line(book: &Book, selected: bool, focused: bool, theme: &Theme) -> Line<'static> {
    if selected && focused {
        let text = format!(" {}  {} ({}) ", book.title, book.author, book.year);
        Line::from(Span::styled(
            text,
            Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD),
        ))
    } else if selected {
        let text = format!(" {}  {} ({}) ", book.title, book.author, book.year);
        Line::from(Span::styled(text, Style::default().fg(theme.fg_primary).bg(theme.selection)))
    } else {
        Line::from(vec![
            Span::styled(format!(" {}", book.title), Style::default().fg(theme.fg_primary)),
            Span::styled(
                format!("  {} ({})", book.author, book.year),
                Style::default().fg(theme.fg_muted),
            ),
        ])
    }
}
