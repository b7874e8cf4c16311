//! src/view/components/loading_overlay.rs
//! ============================================================
//! Loading box for background jobs. Tree builds have no useful
//! total to measure against, so it shows a spinner and the
//! elapsed time instead of a gauge.

use crate::model::ui_state::LoadingState;
use crate::view::theme;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub struct LoadingOverlay;

impl LoadingOverlay {
    pub fn new() -> Self {
        Self
    }

    /// `frame_count` advances the spinner.
    pub fn render(&self, frame: &mut Frame<'_>, loading: &LoadingState, frame_count: u64, rect: Rect) {
        let elapsed = loading.elapsed();
        let spinner = SPINNER[(frame_count % SPINNER.len() as u64) as usize];

        frame.render_widget(Clear, rect);

        let chrome = Block::default()
            .title(" Loading ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(theme::overlay_border_style())
            .style(Style::default().bg(theme::BACKGROUND).fg(theme::FOREGROUND));

        let text = Text::from(vec![
            Line::from(Span::styled(
                format!("{spinner} {}", loading.message),
                Style::default()
                    .fg(theme::YELLOW)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Elapsed: {:.1}s", elapsed.as_secs_f64())),
            Line::from(Span::styled("esc to cancel", Style::default().fg(theme::COMMENT))),
        ]);

        frame.render_widget(
            Paragraph::new(text)
                .block(chrome)
                .alignment(Alignment::Center),
            rect,
        );
    }
}

impl Default for LoadingOverlay {
    fn default() -> Self {
        Self::new()
    }
}
