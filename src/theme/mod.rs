//! Theming system for Libris

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// A color theme for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
    pub cursor: Color,
}

/// Tokyo Night color palette
pub const TOKYO_NIGHT: Theme = Theme {
    name: String::new(), // Will be set properly with const fn when stabilized

    // Background colors
    bg_primary: Color::Rgb(26, 27, 38),   // #1a1b26
    bg_secondary: Color::Rgb(36, 40, 59), // #24283b

    // Foreground colors
    fg_primary: Color::Rgb(192, 202, 245), // #c0caf5
    fg_muted: Color::Rgb(86, 95, 137),     // #565f89

    // Accent colors
    accent_primary: Color::Rgb(122, 162, 247),   // #7aa2f7
    accent_secondary: Color::Rgb(187, 154, 247), // #bb9af7

    // Semantic colors
    success: Color::Rgb(158, 206, 106), // #9ece6a
    warning: Color::Rgb(224, 175, 104), // #e0af68
    error: Color::Rgb(247, 118, 142),   // #f7768e
    info: Color::Rgb(125, 207, 255),    // #7dcfff

    // UI elements
    border: Color::Rgb(65, 72, 104),           // #414868
    border_focused: Color::Rgb(122, 162, 247), // #7aa2f7
    selection: Color::Rgb(40, 52, 87),         // #283457
    cursor: Color::Rgb(192, 202, 245),         // #c0caf5
};

// Workaround for const String
impl Theme {
    pub fn tokyo_night() -> Self {
        Theme { name: "Tokyo Night".to_string(), ..TOKYO_NIGHT }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_tokyo_night() {
        let theme = Theme::default();
        assert_eq!(theme.name, "Tokyo Night");
    }

    #[test]
    fn tokyo_night_colors_are_rgb() {
        let theme = Theme::tokyo_night();
        assert!(matches!(theme.bg_primary, Color::Rgb(_, _, _)));
        assert!(matches!(theme.accent_primary, Color::Rgb(_, _, _)));
    }
}
