//! Status values reported by the remote machine and their wire names.
//!
//! Each name table must stay in case-insensitive alphabetical order; the
//! tests below enforce it.

use crate::lookup::find_ignore_case;

// ─── PrinterStatus ──────────────────────────────────────────────────

/// Machine status as mirrored from `state.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PrinterStatus {
    /// No status received yet.
    #[default]
    Connecting = 0,
    Idle = 1,
    Printing = 2,
    Stopped = 3,
    Configuring = 4,
    Paused = 5,
    Busy = 6,
    Pausing = 7,
    Resuming = 8,
    Flashing = 9,
    ToolChange = 10,
    Simulating = 11,
    Off = 12,
    Cancelling = 13,
}

const PRINTER_STATUS_NAMES: &[(&str, PrinterStatus)] = &[
    ("busy", PrinterStatus::Busy),
    ("cancelling", PrinterStatus::Cancelling),
    ("changingTool", PrinterStatus::ToolChange),
    ("halted", PrinterStatus::Stopped),
    ("idle", PrinterStatus::Idle),
    ("off", PrinterStatus::Off),
    ("paused", PrinterStatus::Paused),
    ("pausing", PrinterStatus::Pausing),
    ("processing", PrinterStatus::Printing),
    ("resuming", PrinterStatus::Resuming),
    ("simulating", PrinterStatus::Simulating),
    ("starting", PrinterStatus::Configuring),
    ("updating", PrinterStatus::Flashing),
];

impl PrinterStatus {
    /// Resolve a wire name (`"processing"`, `"halted"`, ...).
    pub fn from_wire(name: &str) -> Option<Self> {
        find_ignore_case(PRINTER_STATUS_NAMES, name).map(|e| e.1)
    }

    /// True when the machine accepts commands and fetch requests.
    #[inline]
    pub const fn accepts_commands(self) -> bool {
        matches!(self, Self::Idle | Self::Printing | Self::Paused | Self::Off)
    }

    /// True while a job is running or suspended.
    #[inline]
    pub const fn is_printing(self) -> bool {
        matches!(
            self,
            Self::Printing | Self::Paused | Self::Pausing | Self::Resuming
        )
    }
}

// ─── HeaterStatus ───────────────────────────────────────────────────

/// Heater state as mirrored from `heat.heaters^.state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HeaterStatus {
    #[default]
    Off = 0,
    Standby,
    Active,
    Fault,
    Tuning,
    Offline,
}

const HEATER_STATUS_NAMES: &[(&str, HeaterStatus)] = &[
    ("active", HeaterStatus::Active),
    ("fault", HeaterStatus::Fault),
    ("off", HeaterStatus::Off),
    ("offline", HeaterStatus::Offline),
    ("standby", HeaterStatus::Standby),
    ("tuning", HeaterStatus::Tuning),
];

impl HeaterStatus {
    /// Resolve a wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        find_ignore_case(HEATER_STATUS_NAMES, name).map(|e| e.1)
    }
}

// ─── ToolStatus ─────────────────────────────────────────────────────

/// Tool state as mirrored from `tools^.state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ToolStatus {
    #[default]
    Off = 0,
    Active = 1,
    Standby = 2,
}

const TOOL_STATUS_NAMES: &[(&str, ToolStatus)] = &[
    ("active", ToolStatus::Active),
    ("off", ToolStatus::Off),
    ("standby", ToolStatus::Standby),
];

impl ToolStatus {
    /// Resolve a wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        find_ignore_case(TOOL_STATUS_NAMES, name).map(|e| e.1)
    }
}

// ─── SpindleState ───────────────────────────────────────────────────

/// Spindle rotation state as mirrored from `spindles^.state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SpindleState {
    #[default]
    Stopped = 0,
    Forward,
    Reverse,
}

const SPINDLE_STATE_NAMES: &[(&str, SpindleState)] = &[
    ("forward", SpindleState::Forward),
    ("reverse", SpindleState::Reverse),
    ("stopped", SpindleState::Stopped),
];

impl SpindleState {
    /// Resolve a wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        find_ignore_case(SPINDLE_STATE_NAMES, name).map(|e| e.1)
    }
}

// ─── HeaterCombineType ──────────────────────────────────────────────

/// How the heaters of a multi-heater tool are laid out on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaterCombineType {
    /// One display slot per tool heater.
    #[default]
    NotCombined,
    /// One display slot per tool, showing its first heater.
    Combined,
}
