//! Field path grammar and lookup tables.
//!
//! A field path is a dot-separated key into the remote object model. A
//! segment ending in `^` is an array element and consumes the next entry of
//! the index list passed alongside the value (at most `MAX_INDEX_DEPTH`).
//!
//! Two tables live here:
//! - the field path table, mapping a full path to a [`FieldTag`]
//! - the category table, mapping a category key (`"heat"`) to a [`Category`]
//!
//! Both are searched with the shared case-insensitive binary search.

use omlink_common::consts::MAX_INDEX_DEPTH;
use omlink_common::lookup::{find_ignore_case, is_strictly_sorted_ignore_case, sort_ignore_case};
use static_assertions::const_assert_eq;

/// Array indices carried with every dispatched value.
pub type Indices = [usize; MAX_INDEX_DEPTH];

// ─── Category ───────────────────────────────────────────────────────

/// Section of remote state with its own sequence number.
///
/// Declaration order is the polling priority: earlier variants are fetched
/// first when several are dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Category {
    Network = 0,
    Boards,
    Move,
    Heat,
    Tools,
    Spindles,
    Directories,
    Fans,
    Inputs,
    Job,
    Scanner,
    Sensors,
    State,
    Volumes,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 14;

    /// Every category in polling priority order.
    pub const ALL: [Category; Self::COUNT] = [
        Self::Network,
        Self::Boards,
        Self::Move,
        Self::Heat,
        Self::Tools,
        Self::Spindles,
        Self::Directories,
        Self::Fans,
        Self::Inputs,
        Self::Job,
        Self::Scanner,
        Self::Sensors,
        Self::State,
        Self::Volumes,
    ];

    /// Position in [`Self::ALL`].
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Key used on the wire.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Boards => "boards",
            Self::Move => "move",
            Self::Heat => "heat",
            Self::Tools => "tools",
            Self::Spindles => "spindles",
            Self::Directories => "directories",
            Self::Fans => "fans",
            Self::Inputs => "inputs",
            Self::Job => "job",
            Self::Scanner => "scanner",
            Self::Sensors => "sensors",
            Self::State => "state",
            Self::Volumes => "volumes",
        }
    }

    /// Fetch command for this category, without the trailing newline.
    pub const fn fetch_command(self) -> &'static str {
        match self {
            Self::Network => "M409 K\"network\" F\"v\"",
            Self::Boards => "M409 K\"boards\" F\"v\"",
            Self::Move => "M409 K\"move\" F\"v\"",
            Self::Heat => "M409 K\"heat\" F\"v\"",
            Self::Tools => "M409 K\"tools\" F\"v\"",
            Self::Spindles => "M409 K\"spindles\" F\"v\"",
            Self::Directories => "M409 K\"directories\" F\"v\"",
            Self::Fans => "M409 K\"fans\" F\"v\"",
            Self::Inputs => "M409 K\"inputs\" F\"v\"",
            Self::Job => "M409 K\"job\" F\"v\"",
            Self::Scanner => "M409 K\"scanner\" F\"v\"",
            Self::Sensors => "M409 K\"sensors\" F\"v\"",
            Self::State => "M409 K\"state\" F\"v\"",
            Self::Volumes => "M409 K\"volumes\" F\"v\"",
        }
    }

    /// Resolve a category key, case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        find_ignore_case(CATEGORY_KEYS, key).map(|e| e.1)
    }
}

/// Generic live snapshot request, without the trailing newline.
pub const LIVE_POLL_COMMAND: &str = "M409 F\"d99f\"";

const CATEGORY_KEYS: &[(&str, Category)] = &[
    ("boards", Category::Boards),
    ("directories", Category::Directories),
    ("fans", Category::Fans),
    ("heat", Category::Heat),
    ("inputs", Category::Inputs),
    ("job", Category::Job),
    ("move", Category::Move),
    ("network", Category::Network),
    ("scanner", Category::Scanner),
    ("sensors", Category::Sensors),
    ("spindles", Category::Spindles),
    ("state", Category::State),
    ("tools", Category::Tools),
    ("volumes", Category::Volumes),
];

const_assert_eq!(CATEGORY_KEYS.len(), Category::COUNT);

// ─── FieldTag ───────────────────────────────────────────────────────

/// Semantic tag of a field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTag {
    /// Path not in the table; the value is dropped.
    Unrecognized,

    // Response framing
    Key,
    Resp,
    Seq,
    Seqs(Category),

    // Boards, directories, fans
    BoardFirmwareName,
    BoardFirmwareVersion,
    DirectoryGCodes,
    DirectoryMacros,
    FanRequestedValue,

    // Heat
    BedHeaters,
    ChamberHeaters,
    HeaterActive,
    HeaterCurrent,
    HeaterStandby,
    HeaterState,

    // Job
    JobFileName,
    JobFileSize,
    JobFilePosition,
    JobDuration,
    JobLayer,
    JobTimeLeftFile,
    JobTimeLeftFilament,
    JobTimeLeftSlicer,

    // Move
    Axes,
    AxisBabystep,
    AxisHomed,
    AxisLetter,
    AxisMachinePosition,
    AxisUserPosition,
    AxisVisible,
    AxisWorkplaceOffsets,
    ExtruderFactor,
    KinematicsName,
    SpeedFactor,
    WorkplaceNumber,

    // Network
    NetworkName,

    // Spindles
    Spindles,
    SpindleActive,
    SpindleCurrent,
    SpindleMax,
    SpindleMin,
    SpindleState,

    // State
    AtxPower,
    CurrentTool,
    DisplayMessage,
    MessageBox,
    MessageBoxAxisControls,
    MessageBoxMessage,
    MessageBoxMode,
    MessageBoxSeq,
    MessageBoxTimeout,
    MessageBoxTitle,
    Status,
    UpTime,

    // Tools
    Tools,
    ToolActive,
    ToolExtruders,
    ToolFans,
    ToolHeaters,
    ToolNumber,
    ToolOffsets,
    ToolSpindle,
    ToolSpindleRpm,
    ToolStandby,
    ToolState,

    // Volumes
    Volumes,
    VolumeMounted,
}

/// Registered paths, grouped by category. Sorted at table construction.
const FIELD_PATHS: &[(&str, FieldTag)] = &[
    ("key", FieldTag::Key),
    ("resp", FieldTag::Resp),
    ("seq", FieldTag::Seq),
    ("seqs.boards", FieldTag::Seqs(Category::Boards)),
    ("seqs.directories", FieldTag::Seqs(Category::Directories)),
    ("seqs.fans", FieldTag::Seqs(Category::Fans)),
    ("seqs.heat", FieldTag::Seqs(Category::Heat)),
    ("seqs.inputs", FieldTag::Seqs(Category::Inputs)),
    ("seqs.job", FieldTag::Seqs(Category::Job)),
    ("seqs.move", FieldTag::Seqs(Category::Move)),
    ("seqs.network", FieldTag::Seqs(Category::Network)),
    ("seqs.scanner", FieldTag::Seqs(Category::Scanner)),
    ("seqs.sensors", FieldTag::Seqs(Category::Sensors)),
    ("seqs.spindles", FieldTag::Seqs(Category::Spindles)),
    ("seqs.state", FieldTag::Seqs(Category::State)),
    ("seqs.tools", FieldTag::Seqs(Category::Tools)),
    ("seqs.volumes", FieldTag::Seqs(Category::Volumes)),
    // boards, directories, fans
    ("boards^.firmwareName", FieldTag::BoardFirmwareName),
    ("boards^.firmwareVersion", FieldTag::BoardFirmwareVersion),
    ("directories.gCodes", FieldTag::DirectoryGCodes),
    ("directories.macros", FieldTag::DirectoryMacros),
    ("fans^.requestedValue", FieldTag::FanRequestedValue),
    // heat
    ("heat.bedHeaters^", FieldTag::BedHeaters),
    ("heat.chamberHeaters^", FieldTag::ChamberHeaters),
    ("heat.heaters^.active", FieldTag::HeaterActive),
    ("heat.heaters^.current", FieldTag::HeaterCurrent),
    ("heat.heaters^.standby", FieldTag::HeaterStandby),
    ("heat.heaters^.state", FieldTag::HeaterState),
    // job
    ("job.duration", FieldTag::JobDuration),
    ("job.file.fileName", FieldTag::JobFileName),
    ("job.file.size", FieldTag::JobFileSize),
    ("job.filePosition", FieldTag::JobFilePosition),
    ("job.layer", FieldTag::JobLayer),
    ("job.timesLeft.filament", FieldTag::JobTimeLeftFilament),
    ("job.timesLeft.file", FieldTag::JobTimeLeftFile),
    ("job.timesLeft.slicer", FieldTag::JobTimeLeftSlicer),
    // move
    ("move.axes^", FieldTag::Axes),
    ("move.axes^.babystep", FieldTag::AxisBabystep),
    ("move.axes^.homed", FieldTag::AxisHomed),
    ("move.axes^.letter", FieldTag::AxisLetter),
    ("move.axes^.machinePosition", FieldTag::AxisMachinePosition),
    ("move.axes^.userPosition", FieldTag::AxisUserPosition),
    ("move.axes^.visible", FieldTag::AxisVisible),
    ("move.axes^.workplaceOffsets^", FieldTag::AxisWorkplaceOffsets),
    ("move.extruders^.factor", FieldTag::ExtruderFactor),
    ("move.kinematics.name", FieldTag::KinematicsName),
    ("move.speedFactor", FieldTag::SpeedFactor),
    ("move.workplaceNumber", FieldTag::WorkplaceNumber),
    // network
    ("network.name", FieldTag::NetworkName),
    // spindles
    ("spindles^", FieldTag::Spindles),
    ("spindles^.active", FieldTag::SpindleActive),
    ("spindles^.current", FieldTag::SpindleCurrent),
    ("spindles^.max", FieldTag::SpindleMax),
    ("spindles^.min", FieldTag::SpindleMin),
    ("spindles^.state", FieldTag::SpindleState),
    // state
    ("state.atxPower", FieldTag::AtxPower),
    ("state.currentTool", FieldTag::CurrentTool),
    ("state.displayMessage", FieldTag::DisplayMessage),
    ("state.messageBox", FieldTag::MessageBox),
    ("state.messageBox.axisControls", FieldTag::MessageBoxAxisControls),
    ("state.messageBox.message", FieldTag::MessageBoxMessage),
    ("state.messageBox.mode", FieldTag::MessageBoxMode),
    ("state.messageBox.seq", FieldTag::MessageBoxSeq),
    ("state.messageBox.timeout", FieldTag::MessageBoxTimeout),
    ("state.messageBox.title", FieldTag::MessageBoxTitle),
    ("state.status", FieldTag::Status),
    ("state.upTime", FieldTag::UpTime),
    // tools
    ("tools^", FieldTag::Tools),
    ("tools^.active^", FieldTag::ToolActive),
    ("tools^.extruders^", FieldTag::ToolExtruders),
    ("tools^.fans^", FieldTag::ToolFans),
    ("tools^.heaters^", FieldTag::ToolHeaters),
    ("tools^.number", FieldTag::ToolNumber),
    ("tools^.offsets^", FieldTag::ToolOffsets),
    ("tools^.spindle", FieldTag::ToolSpindle),
    ("tools^.spindleRpm", FieldTag::ToolSpindleRpm),
    ("tools^.standby^", FieldTag::ToolStandby),
    ("tools^.state", FieldTag::ToolState),
    // volumes
    ("volumes^", FieldTag::Volumes),
    ("volumes^.mounted", FieldTag::VolumeMounted),
];

/// Number of array markers in a path.
pub fn index_depth(path: &str) -> usize {
    path.bytes().filter(|&b| b == b'^').count()
}

/// Sorted path → tag table, built once at startup.
#[derive(Debug, Clone)]
pub struct FieldPathTable {
    entries: Vec<(&'static str, FieldTag)>,
}

impl FieldPathTable {
    pub fn new() -> Self {
        let mut entries = FIELD_PATHS.to_vec();
        sort_ignore_case(&mut entries);
        debug_assert!(is_strictly_sorted_ignore_case(&entries));
        Self { entries }
    }

    /// Tag of `path`, or [`FieldTag::Unrecognized`].
    pub fn lookup(&self, path: &str) -> FieldTag {
        find_ignore_case(&self.entries, path).map_or(FieldTag::Unrecognized, |e| e.1)
    }

    /// Every registered `(path, tag)` pair, sorted.
    pub fn entries(&self) -> &[(&'static str, FieldTag)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FieldPathTable {
    fn default() -> Self {
        Self::new()
    }
}
