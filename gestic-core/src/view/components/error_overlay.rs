//! src/view/components/error_overlay.rs
use crate::{model::ui_state::ErrorState, view::theme};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub struct ErrorOverlay<'a> {
    error: &'a ErrorState,
}

impl<'a> ErrorOverlay<'a> {
    pub fn new(error: &'a ErrorState) -> Self {
        Self { error }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ", self.error.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::RED));

        let dismiss = if self.error.fatal { "enter to quit" } else { "enter to close" };

        let text = Text::from(vec![
            Line::from(self.error.message.as_str()),
            Line::from(""),
            Line::from(Span::styled(dismiss, Style::default().fg(theme::COMMENT))),
        ]);

        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center);

        frame.render_widget(Clear, area);
        frame.render_widget(paragraph, area);
    }
}
