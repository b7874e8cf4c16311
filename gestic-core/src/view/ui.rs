//! src/view/ui.rs
//! ============================================================
//! Frame renderer that draws the whole TUI from a borrowed
//! `AppState`. Rendering never mutates application state.

use std::time::{Duration, Instant};

use ratatui::prelude::*;
use tracing::{instrument, trace};

use crate::{
    model::{
        app_state::{AppState, Screen},
        ui_state::UIOverlay,
    },
    view::components::{
        compare_table::CompareTable, error_overlay::ErrorOverlay, help_overlay::HelpOverlay,
        loading_overlay::LoadingOverlay, snapshot_table::SnapshotTable, status_bar::StatusBar,
    },
};

const SLOW_FRAME: Duration = Duration::from_millis(16);

/// ---------------------------------------------------------------------------
/// Renderer struct (layout cache + stats)
/// ---------------------------------------------------------------------------
#[derive(Default)]
pub struct UIRenderer {
    cache: LayoutCache,
    stats: RenderStats,
}

#[derive(Default)]
struct LayoutCache {
    screen: Rect,
    main: [Rect; 2],
    hit: u64,
    miss: u64,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
}

impl UIRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render(&mut self, f: &mut Frame<'_>, app: &AppState) {
        let start = Instant::now();
        self.update_layout_cache(f.area());
        let [content, status] = self.cache.main;

        match (app.screen, &app.compare) {
            (Screen::Compare, Some(session)) => CompareTable::new().render(f, session, content),
            _ => SnapshotTable::new().render(f, &app.selector, content),
        }
        StatusBar::new().render(f, app, status);

        self.draw_overlay(f, app);

        let dur = start.elapsed();
        self.stats.total += dur;
        if dur > SLOW_FRAME {
            self.stats.slow += 1;
            trace!(duration_ms = dur.as_millis(), "slow frame");
        }
        self.stats.frames += 1;
    }

    fn draw_overlay(&self, f: &mut Frame<'_>, app: &AppState) {
        let scr = f.area();
        match app.ui.overlay() {
            UIOverlay::None => {}
            UIOverlay::Help => HelpOverlay::new().render(f, centered(scr, 70, 80)),
            UIOverlay::Loading => {
                if let Some(loading) = &app.ui.loading {
                    LoadingOverlay::new().render(f, loading, app.ui.frame_count, fixed_height(scr, 50, 5));
                }
            }
            UIOverlay::Error => {
                if let Some(error) = &app.ui.error {
                    ErrorOverlay::new(error).render(f, centered(scr, 60, 40));
                }
            }
        }
    }

    fn update_layout_cache(&mut self, scr: Rect) {
        if self.cache.screen == scr {
            self.cache.hit += 1;
            return;
        }

        self.cache.screen = scr;
        self.cache.miss += 1;
        self.cache.main = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(scr);
    }
}

/// ---------------------------------------------------------------------------
/// util: rectangles
/// ---------------------------------------------------------------------------
fn centered(r: Rect, w_pct: u16, h_pct: u16) -> Rect {
    let w = (r.width * w_pct / 100).min(r.width);
    let h = (r.height * h_pct / 100).min(r.height);
    Rect {
        x: r.x + (r.width - w) / 2,
        y: r.y + (r.height - h) / 2,
        width: w,
        height: h,
    }
}

fn fixed_height(r: Rect, w_pct: u16, height: u16) -> Rect {
    let h = height.min(r.height);
    Rect {
        height: h,
        y: r.y + (r.height - h) / 2,
        ..centered(r, w_pct, 100)
    }
}
