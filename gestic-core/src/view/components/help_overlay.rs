//! Key reference for both screens
use crate::view::theme;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub struct HelpOverlay;

impl HelpOverlay {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Clear, area);

        let help = Paragraph::new(Text::from(help_lines()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" gestic help ")
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(theme::CYAN))
                    .style(Style::default().bg(theme::BACKGROUND)),
            )
            .style(Style::default().fg(theme::FOREGROUND))
            .wrap(Wrap { trim: false });

        frame.render_widget(help, area);
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().fg(theme::YELLOW).add_modifier(Modifier::BOLD),
    ))
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        section("Movement"),
        Line::from("  ↑↓ / j k       Move selection"),
        Line::from("  PgUp/PgDn      Page up/down (also Ctrl+B/F, Ctrl+U/D)"),
        Line::from("  Home/End       First/last row (also g g, G)"),
        Line::from(""),
        section("Snapshots"),
        Line::from("  Space          Put row into the next free slot"),
        Line::from("  1 / 2          Put row into slot 1 / slot 2"),
        Line::from("  Backspace      Clear both slots"),
        Line::from("  Enter          Compare the two slots"),
        Line::from(""),
        section("Comparison"),
        Line::from("  l → Enter      Enter the selected directory"),
        Line::from("  h ← Backspace  Back to the parent directory"),
        Line::from("  1 / 2 / 3      Copy newer path / older path / relative path"),
        Line::from("  Esc            Back to the snapshot list"),
        Line::from(""),
        section("Application"),
        Line::from("  ?              Toggle this help"),
        Line::from("  Esc            Close overlay, cancel a running scan"),
        Line::from("  q / Ctrl+C     Quit"),
    ]
}
