//! Search and status line at the bottom of the screen

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::{StatusLine, StatusTone};
use crate::theme::Theme;

const MEMORY_BADGE: &str = " memory only ";

/// Draw the status line
pub fn draw(frame: &mut Frame, area: Rect, status: &StatusLine, persistent: bool, theme: &Theme) {
    let (text_area, badge_area) = if persistent {
        (area, None)
    } else {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(MEMORY_BADGE.len() as u16)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    };

    let line = if status.searching {
        // Live search input with a visible cursor, +1 for the / prefix
        let text = format!("/{}", status.query.value());
        build_line_with_cursor(&text, status.query.cursor() + 1, Style::default().fg(theme.info), theme)
    } else if let Some(ref msg) = status.message {
        let style = match status.tone {
            StatusTone::Neutral => Style::default().fg(theme.fg_muted),
            StatusTone::Success => Style::default().fg(theme.success),
            StatusTone::Error => Style::default().fg(theme.error),
        };
        Line::from(Span::styled(msg.clone(), style))
    } else if !status.query.is_empty() {
        // A committed filter stays visible until cleared
        Line::from(vec![
            Span::styled(format!("/{}", status.query.value()), Style::default().fg(theme.info)),
            Span::styled("  [Esc] clear", Style::default().fg(theme.fg_muted)),
        ])
    } else {
        Line::from(Span::styled(
            "[a] add  [e] edit  [d] delete  [Space] toggle  [/] search  [?] help  [q] quit",
            Style::default().fg(theme.fg_muted),
        ))
    };

    frame.render_widget(Paragraph::new(line), text_area);

    if let Some(badge) = badge_area {
        let warning = Paragraph::new(Span::styled(MEMORY_BADGE, Style::default().fg(theme.warning)));
        frame.render_widget(warning, badge);
    }
}

/// Build a line with a block cursor at the given character position.
/// A cursor past the end renders as a highlighted space.
fn build_line_with_cursor(
    text: &str,
    cursor_pos: usize,
    base_style: Style,
    theme: &Theme,
) -> Line<'static> {
    let cursor_byte = text.char_indices().nth(cursor_pos).map_or(text.len(), |(i, _)| i);
    let (before, rest) = text.split_at(cursor_byte);

    let mut rest_chars = rest.chars();
    let under_cursor = rest_chars.next().unwrap_or(' ');
    let after = rest_chars.as_str();

    let cursor_style =
        Style::default().fg(theme.bg_primary).bg(theme.cursor).add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    if !before.is_empty() {
        spans.push(Span::styled(before.to_string(), base_style));
    }
    spans.push(Span::styled(under_cursor.to_string(), cursor_style));
    if !after.is_empty() {
        spans.push(Span::styled(after.to_string(), base_style));
    }

    Line::from(spans)
}
