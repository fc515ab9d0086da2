// ============================================================================
// FolioView - Library
// ============================================================================
// Terminal dashboard client for a portfolio-tracker backend.
// ============================================================================

pub mod api;    // Portfolio backend HTTP client
pub mod app;    // Application state
pub mod models; // Data structures
pub mod ui;     // Terminal user interface
