//! Help screen

use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::theme::Theme;

/// Key bindings shown on the help screen
const BINDINGS: &[(&str, &str)] = &[
    ("j / Down", "move selection down"),
    ("k / Up", "move selection up"),
    ("g / Home", "first book"),
    ("G / End", "last book"),
    ("h / l / Tab", "switch shelf"),
    ("a", "add a book"),
    ("e / Enter", "edit the selected book"),
    ("Space / m", "toggle finished"),
    ("d / Delete", "delete the selected book"),
    ("/", "search titles (Enter keeps the filter)"),
    ("Esc", "clear the active search"),
    ("?", "toggle this help"),
    ("q", "quit"),
];

/// Draw the help screen
pub fn draw(frame: &mut Frame, theme: &Theme) {
    let area = frame.area();

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from("")];
    for (key, description) in BINDINGS {
        lines.push(binding_line(key, description, theme));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Vim keys (j/k/h/l/g/G) can be turned off in config.json",
        Style::default().fg(theme.fg_muted),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  [Esc] back", Style::default().fg(theme.fg_muted))));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn binding_line(key: &str, description: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {key:<14}"),
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(description.to_string(), Style::default().fg(theme.fg_primary)),
    ])
}
