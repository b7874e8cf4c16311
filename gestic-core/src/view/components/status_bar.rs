//! src/view/components/status_bar.rs
//!
//! One-line status bar: the active notification on the left when there is
//! one, otherwise a key hint for the current screen; slot or stack summary
//! on the right.

use crate::{
    model::{
        app_state::{AppState, Screen},
        selector::Slot,
        ui_state::NotificationLevel,
    },
    view::theme,
};
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

pub struct StatusBar;

impl StatusBar {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, app: &AppState, area: Rect) {
        let left = match &app.ui.notification {
            Some(n) => {
                let color = match n.level {
                    NotificationLevel::Info => theme::CYAN,
                    NotificationLevel::Success => theme::GREEN,
                    NotificationLevel::Warning => theme::YELLOW,
                };
                Span::styled(n.message.to_string(), Style::default().fg(color))
            }
            None => Span::styled(hint(app), Style::default().fg(theme::COMMENT)),
        };

        let right = match app.screen {
            Screen::Selector => {
                let slot = |s: Slot| {
                    app.selector
                        .slot(s)
                        .map_or_else(|| "-".to_string(), |snap| snap.id.to_string())
                };
                format!("[1] {} [2] {}", slot(Slot::First), slot(Slot::Second))
            }
            Screen::Compare => app.compare.as_ref().map_or_else(String::new, |session| {
                let frame = session.nav.current();
                let rows = frame.rows().len();
                let position = if rows == 0 { 0 } else { frame.cursor() + 1 };
                format!("{position}/{rows}")
            }),
        };

        let [left_area, right_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(30)]).areas(area);

        Paragraph::new(Line::from(left))
            .style(theme::status_style())
            .alignment(Alignment::Left)
            .render(left_area, frame.buffer_mut());

        Paragraph::new(right)
            .style(theme::status_style())
            .alignment(Alignment::Right)
            .render(right_area, frame.buffer_mut());
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

fn hint(app: &AppState) -> &'static str {
    match app.screen {
        Screen::Selector => "space select  1/2 assign  enter compare  ? help  q quit",
        Screen::Compare if app.direct_mode => "l enter  h back  1-3 copy  ? help  q quit",
        Screen::Compare => "l enter  h back  1-3 copy  esc snapshots  ? help  q quit",
    }
}
