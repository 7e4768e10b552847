//! System-wide constants for the omlink workspace.
//!
//! Single source of truth for pool capacities and default timings.
//! Imported by all crates; do not duplicate these values elsewhere.

use static_assertions::const_assert;

/// Maximum number of axes mirrored from the remote machine.
pub const MAX_TOTAL_AXES: usize = 15;

/// Number of workplace coordinate systems (G54..G59.3).
pub const MAX_TOTAL_WORKPLACES: usize = 9;

/// Number of display slots. A slot value of `MAX_SLOTS` means "unassigned".
pub const MAX_SLOTS: usize = 6;

/// Maximum number of tools kept in the tool pool.
pub const MAX_TOOLS: usize = 16;

/// Maximum number of heaters a single tool can reference.
pub const MAX_HEATERS_PER_TOOL: usize = 8;

/// Capacity of the shared tool-heater arena.
pub const MAX_TOOL_HEATERS: usize = MAX_TOOLS * 2;

/// Maximum number of spindles.
pub const MAX_SPINDLES: usize = 8;

/// Maximum number of beds.
pub const MAX_BEDS: usize = 12;

/// Maximum number of chambers.
pub const MAX_CHAMBERS: usize = 4;

/// Maximum number of extruders whose factors are mirrored.
pub const MAX_EXTRUDERS: usize = 16;

/// Nesting depth of array indices carried with every dispatched value.
pub const MAX_INDEX_DEPTH: usize = 2;

/// Maximum length of an outbound command line (including the newline).
pub const MAX_COMMAND_LEN: usize = 96;

/// Maximum length of an alert title.
pub const ALERT_TITLE_LEN: usize = 50;

/// Maximum length of an alert text.
pub const ALERT_TEXT_LEN: usize = 165;

/// Maximum length of short mirrored strings (machine name, file names).
pub const SHORT_TEXT_LEN: usize = 100;

/// Default minimum interval between two polls [ms].
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1000;

/// Default quiet period after a response before the next poll [ms].
pub const DEFAULT_RESPONSE_QUIET_MS: u32 = 700;

/// Default absolute poll timeout [ms].
pub const DEFAULT_POLL_TIMEOUT_MS: u32 = 8000;

/// Default retry delay of a category fetch channel [ms].
pub const DEFAULT_CATEGORY_RETRY_MS: u32 = 8000;

// Slot numbers are stored in a u8 with MAX_SLOTS as the unassigned marker.
const_assert!(MAX_SLOTS < u8::MAX as usize);
// Arena slot handles are u16.
const_assert!(MAX_TOOL_HEATERS <= u16::MAX as usize);
const_assert!(MAX_TOOL_HEATERS >= MAX_HEATERS_PER_TOOL);
const_assert!(MAX_INDEX_DEPTH >= 2);
