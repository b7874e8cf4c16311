pub mod error;

pub mod config;

pub mod logging;
pub use logging::Logger;

pub mod fs {
    pub mod dir_node;
    pub use dir_node::{DirNode, NodeKind};

    pub mod dir_reader;

    pub mod tree_builder;
}

pub mod model {
    pub mod app_state;

    pub mod diff;
    pub use diff::{ComparisonRow, RowMatch};

    pub mod navigation;
    pub use navigation::{NavCommand, NavigationController, NavigationStack, Transition};

    pub mod selector;

    pub mod snapshot;
    pub use snapshot::{Snapshot, SnapshotPair};

    pub mod ui_state;
    pub use ui_state::{LoadingState, Notification, NotificationLevel, UIOverlay, UIState};
}

pub mod restic;

pub mod tasks {
    pub mod compare_task;

    pub mod snapshot_task;
}

pub mod controller {

    pub mod actions;
    pub use actions::Action;

    pub mod action_dispatcher;

    pub mod event_loop;
    pub use event_loop::{EventLoop, TaskResult};

    pub mod handlers;
}

pub mod view {
    pub mod icons;

    pub mod theme;

    pub mod ui;

    pub mod components {
        pub mod compare_table;
        pub mod error_overlay;
        pub mod help_overlay;
        pub mod loading_overlay;
        pub mod snapshot_table;
        pub mod status_bar;
    }
}

pub mod util {
    pub mod clipboard;

    pub mod humanize;
}

pub use error::AppError;

pub use model::{app_state::AppState, ui_state::UIState};
