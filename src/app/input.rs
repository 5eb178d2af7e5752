//! Event handling utilities

use crossterm::event::KeyCode;

/// Map a key in browse mode to an action. Vim letter keys are only
/// active when vim mode is on; arrows, Tab, and the mutation keys work
/// regardless.
pub fn browse_key_to_action(key: KeyCode, vim_mode: bool) -> Option<Action> {
    if vim_mode {
        match key {
            KeyCode::Char('j') => return Some(Action::Down),
            KeyCode::Char('k') => return Some(Action::Up),
            KeyCode::Char('h') => return Some(Action::FocusReading),
            KeyCode::Char('l') => return Some(Action::FocusFinished),
            KeyCode::Char('g') => return Some(Action::Top),
            KeyCode::Char('G') => return Some(Action::Bottom),
            _ => {}
        }
    }

    match key {
        KeyCode::Down => Some(Action::Down),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Left => Some(Action::FocusReading),
        KeyCode::Right => Some(Action::FocusFinished),
        KeyCode::Home => Some(Action::Top),
        KeyCode::End => Some(Action::Bottom),
        KeyCode::Tab => Some(Action::SwitchShelf),
        KeyCode::Char('a') => Some(Action::AddBook),
        KeyCode::Char('e') | KeyCode::Enter => Some(Action::EditBook),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeleteBook),
        KeyCode::Char(' ') | KeyCode::Char('m') => Some(Action::ToggleComplete),
        KeyCode::Char('/') => Some(Action::Search),
        KeyCode::Char('?') => Some(Action::Help),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Esc => Some(Action::Back),
        _ => None,
    }
}

/// Actions that can be taken in browse mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Top,
    Bottom,
    FocusReading,
    FocusFinished,
    SwitchShelf,

    // Mutations
    AddBook,
    EditBook,
    DeleteBook,
    ToggleComplete,

    // Modes
    Search,
    Back,
    Help,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vim_j_maps_to_down() {
        assert_eq!(browse_key_to_action(KeyCode::Char('j'), true), Some(Action::Down));
    }

    #[test]
    fn vim_keys_are_inert_without_vim_mode() {
        assert_eq!(browse_key_to_action(KeyCode::Char('j'), false), None);
        assert_eq!(browse_key_to_action(KeyCode::Char('g'), false), None);
    }

    #[test]
    fn arrows_work_in_both_modes() {
        assert_eq!(browse_key_to_action(KeyCode::Down, true), Some(Action::Down));
        assert_eq!(browse_key_to_action(KeyCode::Down, false), Some(Action::Down));
    }

    #[test]
    fn tab_switches_shelf() {
        assert_eq!(browse_key_to_action(KeyCode::Tab, false), Some(Action::SwitchShelf));
    }

    #[test]
    fn space_and_m_toggle_completion() {
        assert_eq!(browse_key_to_action(KeyCode::Char(' '), false), Some(Action::ToggleComplete));
        assert_eq!(browse_key_to_action(KeyCode::Char('m'), false), Some(Action::ToggleComplete));
    }

    #[test]
    fn slash_starts_a_search() {
        assert_eq!(browse_key_to_action(KeyCode::Char('/'), false), Some(Action::Search));
    }

    #[test]
    fn unknown_key_returns_none() {
        assert_eq!(browse_key_to_action(KeyCode::Char('x'), true), None);
    }
}
