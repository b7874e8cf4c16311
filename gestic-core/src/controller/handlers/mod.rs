pub mod compare_handler;
pub mod key_handler_orchestrator;
pub mod navigation_handler;
pub mod selector_handler;
pub mod system_handler;

pub mod utils;
pub use utils::*;
