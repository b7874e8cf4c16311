//! src/view/components/snapshot_table.rs
//!
//! Selector screen: one row per mounted snapshot, oldest first, with the
//! slot marker of the rows picked for comparison.

use crate::{
    model::{selector::SelectorState, snapshot::TIMESTAMP_LAYOUT},
    view::theme,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, HighlightSpacing, Row, Table, TableState},
};

pub struct SnapshotTable;

impl SnapshotTable {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, selector: &SelectorState, area: Rect) {
        let header = Row::new(vec!["Slot", "ID", "Date", "Size"]).style(theme::header_style());

        let rows: Vec<Row> = selector
            .snapshots()
            .iter()
            .enumerate()
            .map(|(index, snapshot)| {
                let slot = selector
                    .slot_of(index)
                    .map(|s| format!("[{}]", s.number()))
                    .unwrap_or_default();

                Row::new(vec![
                    Cell::from(slot).style(theme::slot_style()),
                    Cell::from(snapshot.id.as_str()),
                    Cell::from(snapshot.timestamp.format(TIMESTAMP_LAYOUT).to_string()),
                    Cell::from(snapshot.size_label.as_str()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(5),
            Constraint::Length(10),
            Constraint::Length(20),
            Constraint::Fill(1),
        ];

        let mut table_state = TableState::default().with_selected(
            (!selector.is_empty()).then_some(selector.cursor()),
        );

        let title = format!(" Snapshots ({}) ", selector.snapshots().len());

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .title_style(theme::title_style())
                    .border_style(theme::table_border_style())
                    .style(theme::table_style()),
            )
            .row_highlight_style(theme::highlight_style())
            .highlight_symbol("▶ ")
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(table, area, &mut table_state);
    }
}

impl Default for SnapshotTable {
    fn default() -> Self {
        Self::new()
    }
}
