// ============================================================================
// Module : models
// ============================================================================
// Data structures shared by the UI and the API client.
// ============================================================================

pub mod allocation;
pub mod holding;

pub use allocation::{format_fixed2, format_thousands, AllocationSeries, SliceColor};
pub use holding::{AssetType, Holding};
