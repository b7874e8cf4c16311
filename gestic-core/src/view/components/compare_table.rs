//! src/view/components/compare_table.rs
//!
//! Compare screen: the diffed rows of the active navigation frame, and a
//! footer listing the clipboard fields of the selected row.

use crate::{
    fs::dir_node::{DirNode, MISSING_LABEL},
    model::app_state::CompareSession,
    util::humanize::{delta_label, human_readable_size},
    view::{icons, theme},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState},
};

/// Lines of the export footer including its border.
pub const EXPORT_FOOTER_HEIGHT: u16 = 5;

pub struct CompareTable;

impl CompareTable {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, session: &CompareSession, area: Rect) {
        let [table_area, footer_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(EXPORT_FOOTER_HEIGHT)])
                .areas(area);

        self.render_rows(frame, session, table_area);
        self.render_export(frame, session, footer_area);
    }

    fn render_rows(&self, frame: &mut Frame<'_>, session: &CompareSession, area: Rect) {
        let nav = &session.nav;
        let current = nav.current();

        let header = Row::new(vec!["Newer", "Size", "Older", "Size", "Delta"]).style(theme::header_style());

        let rows: Vec<Row> = current
            .rows()
            .iter()
            .map(|row| {
                Row::new(vec![
                    name_cell(&row.newer),
                    size_cell(&row.newer),
                    name_cell(&row.older),
                    size_cell(&row.older),
                    Cell::from(delta_label(row.signed_delta)).style(theme::delta_style(row.signed_delta)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Length(11),
        ];

        let mut table_state = TableState::default()
            .with_selected((!current.rows().is_empty()).then_some(current.cursor()));

        let title = format!(
            " {} vs {} | {} | depth {} ",
            session.pair.newer_id,
            session.pair.older_id,
            nav.current_relative_path(),
            nav.stack().depth(),
        );

        let totals = format!(
            " {} → {} ({}) ",
            human_readable_size(current.older().size),
            human_readable_size(current.newer().size),
            delta_label(size_delta(current.newer(), current.older())),
        );

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .title_bottom(Line::from(totals).right_aligned())
                    .title_style(theme::title_style())
                    .border_style(theme::table_border_style())
                    .style(theme::table_style()),
            )
            .row_highlight_style(theme::highlight_style())
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn render_export(&self, frame: &mut Frame<'_>, session: &CompareSession, area: Rect) {
        let exported = session.nav.export_selected().unwrap_or_default();

        let lines: Vec<Line> = exported
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let text = field.as_deref().unwrap_or(MISSING_LABEL);
                Line::from(vec![
                    Span::styled(format!("[{}] ", i + 1), theme::slot_style()),
                    Span::raw(text.to_owned()),
                ])
            })
            .collect();

        let footer = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Copy ")
                .title_style(theme::title_style())
                .border_style(theme::table_border_style())
                .style(theme::table_style()),
        );

        frame.render_widget(footer, area);
    }
}

impl Default for CompareTable {
    fn default() -> Self {
        Self::new()
    }
}

fn name_cell(node: &DirNode) -> Cell<'static> {
    if node.is_missing() {
        return Cell::from(node.label().to_owned()).style(theme::missing_style());
    }

    let text = format!("{} {}", icons::for_kind(node.kind), node.label());
    if node.is_dir() {
        Cell::from(text).style(theme::dir_style())
    } else {
        Cell::from(text)
    }
}

fn size_cell(node: &DirNode) -> Cell<'static> {
    if node.is_missing() {
        Cell::from("").style(theme::missing_style())
    } else {
        Cell::from(human_readable_size(node.size))
    }
}

fn size_delta(newer: &DirNode, older: &DirNode) -> i64 {
    let delta = i128::from(newer.size) - i128::from(older.size);
    i64::try_from(delta).unwrap_or(if delta > 0 { i64::MAX } else { i64::MIN })
}
