//! src/view/theme.rs
//! ============================================================================
//! # Catppuccin Mocha Theme Color Palette
//!
//! This module defines the color constants for the Catppuccin Mocha theme.
//! Colors are from the official Catppuccin theme specification:
//! https://github.com/catppuccin/catppuccin

use ratatui::style::{Color, Modifier, Style};
use tracing::{debug, instrument};

/// Initialize theme colors - logs color palette information
#[instrument(level = "debug")]
pub fn init_theme() {
    debug!("Initializing Catppuccin Mocha theme");
    debug!("Background: {:?}", BACKGROUND);
    debug!("Foreground: {:?}", FOREGROUND);
    debug!("Current line: {:?}", CURRENT_LINE);
}

pub const BACKGROUND: Color = Color::Rgb(30, 30, 46); // Base
pub const CURRENT_LINE: Color = Color::Rgb(69, 71, 90); // Surface1
pub const FOREGROUND: Color = Color::Rgb(81, 224, 81); // #51E051
pub const COMMENT: Color = Color::Rgb(127, 132, 156); // Overlay1
pub const CYAN: Color = Color::Rgb(137, 220, 235); // Sky
pub const GREEN: Color = Color::Rgb(166, 227, 161); // Green
pub const ORANGE: Color = Color::Rgb(250, 179, 135); // Peach
pub const PINK: Color = Color::Rgb(245, 194, 231); // Pink
pub const PURPLE: Color = Color::Rgb(203, 166, 247); // Mauve
pub const RED: Color = Color::Rgb(243, 139, 168); // Red
pub const YELLOW: Color = Color::Rgb(249, 226, 175); // Yellow

pub fn table_style() -> Style {
    Style::default().bg(BACKGROUND).fg(FOREGROUND)
}

pub fn table_border_style() -> Style {
    Style::default().fg(COMMENT)
}

pub fn title_style() -> Style {
    Style::default().fg(PURPLE).add_modifier(Modifier::BOLD)
}

pub fn header_style() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
}

pub fn highlight_style() -> Style {
    Style::default().bg(CURRENT_LINE).add_modifier(Modifier::BOLD)
}

/// Delta column: growth is red, shrinkage green, unchanged dimmed.
pub fn delta_style(delta: i64) -> Style {
    match delta {
        d if d > 0 => Style::default().fg(RED),
        d if d < 0 => Style::default().fg(GREEN),
        _ => Style::default().fg(COMMENT),
    }
}

pub fn missing_style() -> Style {
    Style::default().fg(COMMENT).add_modifier(Modifier::ITALIC)
}

pub fn dir_style() -> Style {
    Style::default().fg(CYAN)
}

pub fn slot_style() -> Style {
    Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)
}

pub fn status_style() -> Style {
    Style::default().fg(FOREGROUND).bg(BACKGROUND)
}

pub fn overlay_border_style() -> Style {
    Style::default().fg(PURPLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_colors_by_sign() {
        assert_eq!(delta_style(10).fg, Some(RED));
        assert_eq!(delta_style(-10).fg, Some(GREEN));
        assert_eq!(delta_style(0).fg, Some(COMMENT));
    }
}
