// ============================================================================
// Module : ui
// ============================================================================
// Terminal user interface: event handling and rendering.
// ============================================================================

pub mod chart;
pub mod dashboard;
pub mod events;
pub mod sell_dialog;

pub use dashboard::render;
pub use events::{Event, EventHandler};
