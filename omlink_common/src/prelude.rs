//! Prelude module for common re-exports.
//!
//! Consumers can do `use omlink_common::prelude::*;` and get the most
//! important types without listing individual paths.

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};

// ─── Capacities ─────────────────────────────────────────────────────
pub use crate::consts::{
    MAX_BEDS, MAX_CHAMBERS, MAX_HEATERS_PER_TOOL, MAX_INDEX_DEPTH, MAX_SLOTS, MAX_SPINDLES,
    MAX_TOOLS, MAX_TOTAL_AXES,
};

// ─── Wire tables ────────────────────────────────────────────────────
pub use crate::features::FirmwareFeatures;
pub use crate::lookup::{cmp_ignore_ascii_case, find_ignore_case, find_sorted_by, Keyed};
pub use crate::status::{HeaterCombineType, HeaterStatus, PrinterStatus, SpindleState, ToolStatus};

/// Monotonic millisecond tick counter used for every timing decision.
///
/// Wraps after ~49 days; all comparisons use `wrapping_sub`.
pub type Ticks = u32;

/// Elapsed milliseconds from `since` to `now`, robust to wrap-around.
#[inline]
pub const fn elapsed(now: Ticks, since: Ticks) -> u32 {
    now.wrapping_sub(since)
}
