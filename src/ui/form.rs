//! Add/edit form overlay component

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::state::{FormField, FormState, TextInput};
use crate::theme::Theme;

/// Draw the form as a centered overlay
pub fn draw(frame: &mut Frame, area: Rect, form: &FormState, theme: &Theme) {
    // Don't draw if the form is not open
    if !form.active {
        return;
    }

    // Calculate centered overlay area (60% width, 60% height)
    let overlay_area = centered_rect(60, 60, area);

    // Clear the background area
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(overlay_title(form.editing.is_some(), theme))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = vec![Line::from("")];
    lines.push(field_line("Title", &form.title, form.field == FormField::Title, theme));
    lines.push(Line::from(""));
    lines.push(field_line("Author", &form.author, form.field == FormField::Author, theme));
    lines.push(Line::from(""));
    lines.push(field_line("Year", &form.year, form.field == FormField::Year, theme));
    lines.push(Line::from(""));
    lines.push(checkbox_line("Finished", form.complete, form.field == FormField::Complete, theme));
    lines.push(Line::from(""));

    if let Some(ref error) = form.error {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(theme.error),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "  [Tab] next field  [Enter] save  [Esc] cancel",
        Style::default().fg(theme.fg_muted),
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// A labelled text field; the focused field carries a block cursor
fn field_line(label: &str, input: &TextInput, focused: bool, theme: &Theme) -> Line<'static> {
    let mut spans = vec![label_span(label, focused, theme)];

    if focused {
        let chars: Vec<char> = input.value().chars().collect();
        let cursor = input.cursor();

        if cursor > 0 {
            let before: String = chars.iter().take(cursor).collect();
            spans.push(Span::styled(before, Style::default().fg(theme.fg_primary)));
        }

        let cursor_char = chars.get(cursor).copied().unwrap_or(' ');
        spans.push(Span::styled(
            cursor_char.to_string(),
            Style::default().fg(theme.bg_primary).bg(theme.cursor),
        ));

        if cursor + 1 < chars.len() {
            let after: String = chars.iter().skip(cursor + 1).collect();
            spans.push(Span::styled(after, Style::default().fg(theme.fg_primary)));
        }
    } else {
        spans.push(Span::styled(
            input.value().to_string(),
            Style::default().fg(theme.fg_primary),
        ));
    }

    Line::from(spans)
}

/// The completion checkbox row
fn checkbox_line(label: &str, checked: bool, focused: bool, theme: &Theme) -> Line<'static> {
    let mark = if checked { "[x]" } else { "[ ]" };
    let mark_style = if checked {
        Style::default().fg(theme.success)
    } else {
        Style::default().fg(theme.fg_primary)
    };

    let mut spans = vec![label_span(label, focused, theme), Span::styled(mark.to_string(), mark_style)];
    if focused {
        spans.push(Span::styled("  [Space] toggle", Style::default().fg(theme.fg_muted)));
    }

    Line::from(spans)
}

/// The overlay heading for the current mode
fn overlay_title(editing: bool, theme: &Theme) -> Span<'static> {
    let text = if editing { " Edit Book " } else { " Add Book " };
    Span::styled(text, Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD))
}

fn label_span(label: &str, focused: bool, theme: &Theme) -> Span<'static> {
    let style = if focused {
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg_muted)
    };
    Span::styled(format!("  {label:<10}"), style)
}

/// Create a centered rectangle with the given percentage of width and height
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
