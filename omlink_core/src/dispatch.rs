//! Response dispatcher.
//!
//! Receives `(path, value, indices)` events and array-end notifications
//! from the tokenizer, resolves the path through the [`FieldPathTable`] and
//! applies the value to the [`ModelContext`] or forwards it to the
//! [`ModelObserver`].
//!
//! Array reconciliation: while a category listing streams in, the highest
//! index seen per array is remembered. On array end everything above it is
//! removed, which drops entities left over from a previous, longer listing.

pub mod value;

use crate::alert::{AlertChange, AlertTracker, copy_truncated};
use crate::context::ModelContext;
use crate::field::{Category, FieldPathTable, FieldTag, Indices};
use crate::link::{ModelObserver, TimeLeftSource};
use crate::model::bed::set_heater_status;
use crate::model::{BedOrChamber, Pool, SetPoint, Tool};
use heapless::String;
use omlink_common::consts::ALERT_TEXT_LEN;
use omlink_common::status::{HeaterCombineType, HeaterStatus, PrinterStatus, SpindleState, ToolStatus};
use tracing::{debug, trace};
use value::*;

/// Reply text buffered until message end.
pub type ResponseText = String<ALERT_TEXT_LEN>;

/// Highest array index seen per tracked array, -1 for none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArrayCounters {
    axis: isize,
    bed: isize,
    chamber: isize,
    spindle: isize,
    tool: isize,
    volume: isize,
    /// Tool whose heaters `tool_heater` refers to.
    heater_tool: Option<usize>,
    tool_heater: isize,
    mounted: usize,
}

impl ArrayCounters {
    const RESET: Self = Self {
        axis: -1,
        bed: -1,
        chamber: -1,
        spindle: -1,
        tool: -1,
        volume: -1,
        heater_tool: None,
        tool_heater: -1,
        mounted: 0,
    };

    fn reset_category(&mut self, category: Category) {
        match category {
            Category::Move => self.axis = -1,
            Category::Heat => {
                self.bed = -1;
                self.chamber = -1;
            }
            Category::Spindles => self.spindle = -1,
            Category::Tools => {
                self.tool = -1;
                self.heater_tool = None;
                self.tool_heater = -1;
            }
            Category::Volumes => {
                self.volume = -1;
                self.mounted = 0;
            }
            _ => {}
        }
    }
}

/// First index past `last`.
#[inline]
fn next_index(last: isize) -> usize {
    (last + 1) as usize
}

/// Applies wire events to the model.
#[derive(Debug)]
pub struct Dispatcher {
    table: FieldPathTable,
    counters: ArrayCounters,
    alert: AlertTracker,
    message_seq: Option<u32>,
    new_message_seq: Option<u32>,
    /// A `seq` field arrived in the current message.
    seq_reported: bool,
    response: ResponseText,
    layout_changed: bool,
    combine: HeaterCombineType,
}

impl Dispatcher {
    pub fn new(combine: HeaterCombineType) -> Self {
        Self {
            table: FieldPathTable::new(),
            counters: ArrayCounters::RESET,
            alert: AlertTracker::new(),
            message_seq: None,
            new_message_seq: None,
            seq_reported: false,
            response: ResponseText::new(),
            layout_changed: false,
            combine,
        }
    }

    #[inline]
    pub fn table(&self) -> &FieldPathTable {
        &self.table
    }

    #[inline]
    pub fn alerts(&self) -> &AlertTracker {
        &self.alert
    }

    /// Message sequence of the last surfaced reply.
    #[inline]
    pub fn message_seq(&self) -> Option<u32> {
        self.message_seq
    }

    #[inline]
    pub fn combine(&self) -> HeaterCombineType {
        self.combine
    }

    // ─── Message brackets ───────────────────────────────────────────

    /// Start of one response message.
    pub fn begin_message<O: ModelObserver + ?Sized>(&mut self, observer: &mut O) {
        self.new_message_seq = self.message_seq;
        self.seq_reported = false;
        self.response.clear();
        self.alert.begin();
        self.counters = ArrayCounters::RESET;
        observer.on_message_begin();
    }

    /// End of one response message: commit what was collected.
    pub fn end_message<O: ModelObserver + ?Sized>(
        &mut self,
        ctx: &mut ModelContext,
        observer: &mut O,
    ) {
        match self.alert.commit() {
            AlertChange::Shown => {
                if let Some(alert) = self.alert.shown() {
                    debug!(seq = alert.seq, title = alert.title.as_str(), "alert shown");
                    observer.on_alert(alert);
                }
            }
            AlertChange::Cleared => observer.on_alert_cleared(),
            AlertChange::None => {}
        }

        // A reply without a sequence number is always new.
        let seq_changed = self.new_message_seq != self.message_seq;
        if seq_changed {
            self.message_seq = self.new_message_seq;
        }
        if !self.response.is_empty() && (seq_changed || !self.seq_reported) {
            observer.on_response(&self.response);
        }

        if self.layout_changed {
            self.layout_changed = false;
            let used = ctx.assign_slots(self.combine);
            debug!(slots = used, "display layout reassigned");
            observer.on_layout_changed();
        }
        observer.on_message_end();
    }

    // ─── Values ─────────────────────────────────────────────────────

    /// Apply one value. Unknown paths and malformed values are dropped.
    pub fn on_value<O: ModelObserver + ?Sized>(
        &mut self,
        ctx: &mut ModelContext,
        path: &str,
        value: &str,
        indices: &Indices,
        observer: &mut O,
    ) {
        let tag = self.table.lookup(path);
        if !self.apply(ctx, tag, value, indices, observer) {
            trace!(path, value, ?tag, "value dropped");
        }
    }

    /// Returns false when the value was not applied.
    fn apply<O: ModelObserver + ?Sized>(
        &mut self,
        ctx: &mut ModelContext,
        tag: FieldTag,
        value: &str,
        indices: &Indices,
        observer: &mut O,
    ) -> bool {
        let [i0, i1] = *indices;
        match tag {
            FieldTag::Unrecognized => false,

            // ── Response framing ──
            FieldTag::Key => {
                let Some(category) = Category::from_key(value.trim()) else {
                    return false;
                };
                self.counters.reset_category(category);
                ctx.tracker.consume(category);
                true
            }
            FieldTag::Resp => {
                copy_truncated(&mut self.response, value);
                true
            }
            FieldTag::Seq => {
                let Some(seq) = parse_u32(value) else {
                    return false;
                };
                self.new_message_seq = Some(seq);
                self.seq_reported = true;
                true
            }
            FieldTag::Seqs(category) => parse_u32(value)
                .map(|seq| ctx.tracker.update(category, seq))
                .is_some(),

            // ── Boards, directories, fans ──
            FieldTag::BoardFirmwareName | FieldTag::BoardFirmwareVersion => {
                if i0 != 0 {
                    return false;
                }
                let target = if tag == FieldTag::BoardFirmwareName {
                    &mut ctx.state.firmware_name
                } else {
                    &mut ctx.state.firmware_version
                };
                copy_truncated(target, value);
                observer.on_firmware(&ctx.state.firmware_name, &ctx.state.firmware_version);
                true
            }
            FieldTag::DirectoryGCodes => {
                copy_truncated(&mut ctx.state.gcodes_dir, value);
                true
            }
            FieldTag::DirectoryMacros => {
                copy_truncated(&mut ctx.state.macros_dir, value);
                true
            }
            FieldTag::FanRequestedValue => {
                if i0 != 0 {
                    return false;
                }
                let Some(percent) = parse_percent(value) else {
                    return false;
                };
                ctx.state.fan_percent = percent.clamp(0, 100) as u8;
                observer.on_fan_percent(ctx.state.fan_percent);
                true
            }

            // ── Heat ──
            FieldTag::BedHeaters => {
                let Some(heater) = parse_optional_index(value) else {
                    return false;
                };
                self.counters.bed = i0 as isize;
                self.assign_heater(&mut ctx.beds, i0, heater);
                true
            }
            FieldTag::ChamberHeaters => {
                let Some(heater) = parse_optional_index(value) else {
                    return false;
                };
                self.counters.chamber = i0 as isize;
                self.assign_heater(&mut ctx.chambers, i0, heater);
                true
            }
            FieldTag::HeaterActive | FieldTag::HeaterCurrent | FieldTag::HeaterStandby => {
                let (Ok(heater), Some(temp)) = (u8::try_from(i0), parse_f32(value)) else {
                    return false;
                };
                match tag {
                    FieldTag::HeaterActive => observer.on_heater_active(heater, temp),
                    FieldTag::HeaterCurrent => observer.on_heater_current(heater, temp),
                    _ => observer.on_heater_standby(heater, temp),
                }
                true
            }
            FieldTag::HeaterState => {
                let (Ok(heater), Some(status)) = (u8::try_from(i0), HeaterStatus::from_wire(value.trim()))
                else {
                    return false;
                };
                set_heater_status(&mut ctx.beds, heater, status);
                set_heater_status(&mut ctx.chambers, heater, status);
                observer.on_heater_status(heater, status);
                true
            }

            // ── Job ──
            FieldTag::JobFileName => {
                if is_null(value) {
                    ctx.state.job_file.clear();
                } else {
                    copy_truncated(&mut ctx.state.job_file, value);
                }
                observer.on_job_file(&ctx.state.job_file);
                true
            }
            FieldTag::JobFileSize => parse_u32(value)
                .map(|size| ctx.state.job_size = size)
                .is_some(),
            FieldTag::JobFilePosition => {
                let Some(position) = parse_u32(value) else {
                    return false;
                };
                ctx.state.job_position = position;
                observer.on_job_progress(ctx.state.job_progress());
                true
            }
            FieldTag::JobDuration => parse_u32(value)
                .map(|d| ctx.state.job_duration = d)
                .is_some(),
            FieldTag::JobLayer => parse_u32(value)
                .map(|l| ctx.state.job_layer = l)
                .is_some(),
            FieldTag::JobTimeLeftFile | FieldTag::JobTimeLeftFilament | FieldTag::JobTimeLeftSlicer => {
                let (slot, source) = match tag {
                    FieldTag::JobTimeLeftFile => (0, TimeLeftSource::File),
                    FieldTag::JobTimeLeftFilament => (1, TimeLeftSource::Filament),
                    _ => (2, TimeLeftSource::Slicer),
                };
                let seconds = if is_null(value) {
                    None
                } else {
                    match parse_f32(value) {
                        Some(s) if s >= 0.0 => Some(s as u32),
                        _ => return false,
                    }
                };
                ctx.state.times_left[slot] = seconds;
                observer.on_time_left(source, seconds);
                true
            }

            // ── Move ──
            FieldTag::Axes => false,
            FieldTag::AxisBabystep
            | FieldTag::AxisHomed
            | FieldTag::AxisLetter
            | FieldTag::AxisMachinePosition
            | FieldTag::AxisUserPosition
            | FieldTag::AxisVisible
            | FieldTag::AxisWorkplaceOffsets => self.apply_axis(ctx, tag, value, i0, i1, observer),
            FieldTag::ExtruderFactor => {
                let Some(percent) = parse_percent(value) else {
                    return false;
                };
                let Some(factor) = ctx.state.extrusion_factors.get_mut(i0) else {
                    return false;
                };
                *factor = percent;
                observer.on_extrusion_factor(i0, percent);
                true
            }
            FieldTag::KinematicsName => {
                copy_truncated(&mut ctx.state.kinematics, value);
                true
            }
            FieldTag::SpeedFactor => {
                let Some(percent) = parse_percent(value) else {
                    return false;
                };
                ctx.state.speed_factor = percent;
                observer.on_speed_factor(percent);
                true
            }
            FieldTag::WorkplaceNumber => parse_u32(value)
                .map(|w| ctx.state.workplace = w as usize)
                .is_some(),

            // ── Network ──
            FieldTag::NetworkName => {
                copy_truncated(&mut ctx.state.machine_name, value);
                observer.on_machine_name(&ctx.state.machine_name);
                true
            }

            // ── Spindles ──
            FieldTag::Spindles => false,
            FieldTag::SpindleActive
            | FieldTag::SpindleCurrent
            | FieldTag::SpindleMax
            | FieldTag::SpindleMin
            | FieldTag::SpindleState => self.apply_spindle(ctx, tag, value, i0, observer),

            // ── State ──
            FieldTag::AtxPower => {
                ctx.state.atx_power = if is_null(value) {
                    None
                } else {
                    match parse_bool(value) {
                        Some(on) => Some(on),
                        None => return false,
                    }
                };
                true
            }
            FieldTag::CurrentTool => {
                let Some(tool) = parse_optional_index(value) else {
                    return false;
                };
                ctx.state.current_tool = tool;
                observer.on_current_tool(tool);
                true
            }
            FieldTag::DisplayMessage => {
                copy_truncated(&mut ctx.state.display_message, value);
                observer.on_display_message(&ctx.state.display_message);
                true
            }
            FieldTag::MessageBox => {
                if !is_null(value) {
                    return false;
                }
                self.alert.request_clear();
                true
            }
            FieldTag::MessageBoxAxisControls => parse_u32(value)
                .map(|c| self.alert.set_controls(c))
                .is_some(),
            FieldTag::MessageBoxMessage => {
                self.alert.set_text(value);
                true
            }
            FieldTag::MessageBoxMode => parse_i32(value)
                .map(|m| self.alert.set_mode(m))
                .is_some(),
            FieldTag::MessageBoxSeq => parse_u32(value)
                .map(|s| self.alert.set_seq(s))
                .is_some(),
            FieldTag::MessageBoxTimeout => parse_f32(value)
                .map(|t| self.alert.set_timeout(t))
                .is_some(),
            FieldTag::MessageBoxTitle => {
                self.alert.set_title(value);
                true
            }
            FieldTag::Status => {
                let Some(status) = PrinterStatus::from_wire(value.trim()) else {
                    return false;
                };
                if status != ctx.state.status {
                    debug!(?status, "printer status changed");
                    ctx.state.status = status;
                    observer.on_status(status);
                }
                true
            }
            FieldTag::UpTime => {
                let Some(uptime) = parse_u32(value) else {
                    return false;
                };
                if ctx.tracker.observe_uptime(uptime) {
                    ctx.reset_after_restart();
                    self.alert.reset();
                    self.message_seq = None;
                    self.new_message_seq = None;
                    self.layout_changed = true;
                    observer.on_restart();
                }
                true
            }

            // ── Tools ──
            FieldTag::Tools => false,
            FieldTag::ToolActive
            | FieldTag::ToolExtruders
            | FieldTag::ToolFans
            | FieldTag::ToolHeaters
            | FieldTag::ToolNumber
            | FieldTag::ToolOffsets
            | FieldTag::ToolSpindle
            | FieldTag::ToolSpindleRpm
            | FieldTag::ToolStandby
            | FieldTag::ToolState => self.apply_tool(ctx, tag, value, i0, i1, observer),

            // ── Volumes ──
            FieldTag::Volumes => false,
            FieldTag::VolumeMounted => {
                let Some(mounted) = parse_bool(value) else {
                    return false;
                };
                self.counters.volume = i0 as isize;
                if mounted {
                    self.counters.mounted += 1;
                }
                true
            }
        }
    }

    /// Set or clear the heater of a bed or chamber.
    fn assign_heater<const N: usize>(
        &mut self,
        pool: &mut Pool<BedOrChamber, N>,
        index: usize,
        heater: Option<usize>,
    ) {
        let heater = heater.and_then(|h| u8::try_from(h).ok());
        match heater {
            Some(heater) => {
                let existed = pool.get(index).is_some();
                if let Some(entity) = pool.get_or_create(index, true) {
                    if !existed || entity.heater != Some(heater) {
                        entity.heater = Some(heater);
                        self.layout_changed = true;
                    }
                }
            }
            None => {
                if pool.remove(index, false) > 0 {
                    self.layout_changed = true;
                }
            }
        }
    }

    fn apply_axis<O: ModelObserver + ?Sized>(
        &mut self,
        ctx: &mut ModelContext,
        tag: FieldTag,
        value: &str,
        index: usize,
        sub: usize,
        observer: &mut O,
    ) -> bool {
        let Some(axis) = ctx.axes.get_or_create(index, true) else {
            return false;
        };
        self.counters.axis = index as isize;
        match tag {
            FieldTag::AxisBabystep => parse_f32(value).map(|v| axis.babystep = v).is_some(),
            FieldTag::AxisHomed => {
                let Some(homed) = parse_bool(value) else {
                    return false;
                };
                axis.homed = homed;
                observer.on_axis_homed(index, homed);
                true
            }
            FieldTag::AxisLetter => {
                let Some(letter) = value.trim().chars().next() else {
                    return false;
                };
                axis.letter = letter;
                true
            }
            FieldTag::AxisMachinePosition => {
                let Some(pos) = parse_f32(value) else {
                    return false;
                };
                axis.machine_position = pos;
                observer.on_axis_machine_position(index, axis.letter, pos);
                true
            }
            FieldTag::AxisUserPosition => {
                let Some(pos) = parse_f32(value) else {
                    return false;
                };
                axis.user_position = pos;
                observer.on_axis_user_position(index, axis.letter, pos);
                true
            }
            FieldTag::AxisVisible => {
                let Some(visible) = parse_bool(value) else {
                    return false;
                };
                if axis.visible != visible {
                    axis.visible = visible;
                    self.layout_changed = true;
                }
                true
            }
            FieldTag::AxisWorkplaceOffsets => parse_f32(value)
                .is_some_and(|offset| axis.set_workplace_offset(sub, offset)),
            _ => false,
        }
    }

    fn apply_spindle<O: ModelObserver + ?Sized>(
        &mut self,
        ctx: &mut ModelContext,
        tag: FieldTag,
        value: &str,
        index: usize,
        observer: &mut O,
    ) -> bool {
        let Some(spindle) = ctx.spindles.get_or_create(index, true) else {
            return false;
        };
        self.counters.spindle = index as isize;
        let applied = match tag {
            FieldTag::SpindleActive => parse_i32(value).map(|v| spindle.set_active_rpm(v)).is_some(),
            FieldTag::SpindleCurrent => parse_i32(value).map(|v| spindle.set_current_rpm(v)).is_some(),
            FieldTag::SpindleMax => parse_i32(value).map(|v| spindle.max = v).is_some(),
            FieldTag::SpindleMin => parse_i32(value).map(|v| spindle.min = v).is_some(),
            FieldTag::SpindleState => SpindleState::from_wire(value.trim())
                .map(|s| spindle.set_state(s))
                .is_some(),
            _ => false,
        };
        if applied && tag != FieldTag::SpindleMax && tag != FieldTag::SpindleMin {
            observer.on_spindle_rpm(index, spindle.active, spindle.current);
        }
        applied
    }

    /// Tool `index`, created on first reference.
    fn tool<'c>(&mut self, ctx: &'c mut ModelContext, index: usize) -> Option<&'c mut Tool> {
        if ctx.tools.get(index).is_none() {
            self.layout_changed = true;
        }
        self.counters.tool = index as isize;
        ctx.tools.get_or_create(index, true)
    }

    fn apply_tool<O: ModelObserver + ?Sized>(
        &mut self,
        ctx: &mut ModelContext,
        tag: FieldTag,
        value: &str,
        index: usize,
        sub: usize,
        observer: &mut O,
    ) -> bool {
        let Some(tool) = self.tool(ctx, index) else {
            return false;
        };
        match tag {
            FieldTag::ToolNumber => true,
            FieldTag::ToolExtruders => {
                let Some(extruder) = parse_i32(value).and_then(|v| i8::try_from(v).ok()) else {
                    return false;
                };
                if sub == 0 {
                    tool.extruder = extruder;
                }
                true
            }
            FieldTag::ToolFans => {
                let Some(fan) = parse_i32(value).and_then(|v| i8::try_from(v).ok()) else {
                    return false;
                };
                if sub == 0 {
                    tool.fan = fan;
                }
                true
            }
            FieldTag::ToolOffsets => parse_f32(value).is_some_and(|offset| tool.set_offset(sub, offset)),
            FieldTag::ToolSpindle => match parse_optional_index(value) {
                Some(spindle) => {
                    tool.spindle = spindle.and_then(|s| u8::try_from(s).ok());
                    true
                }
                None => false,
            },
            FieldTag::ToolSpindleRpm => parse_i32(value).map(|rpm| tool.spindle_rpm = rpm).is_some(),
            FieldTag::ToolState => {
                let Some(status) = ToolStatus::from_wire(value.trim()) else {
                    return false;
                };
                tool.status = status;
                observer.on_tool_status(index, status);
                true
            }
            FieldTag::ToolHeaters => {
                let Some(heater) = parse_index_u8(value) else {
                    return false;
                };
                if self.counters.heater_tool != Some(index) {
                    self.counters.heater_tool = Some(index);
                    self.counters.tool_heater = -1;
                }
                let previous = ctx.tools.heater(index, sub).map(|h| h.heater);
                if ctx.tools.heater_or_create(index, sub, heater).is_none() {
                    return false;
                }
                self.counters.tool_heater = sub as isize;
                if previous != Some(heater) {
                    self.layout_changed = true;
                }
                true
            }
            FieldTag::ToolActive | FieldTag::ToolStandby => {
                let Some(temp) = parse_f32(value) else {
                    return false;
                };
                let (set_point, active) = if tag == FieldTag::ToolActive {
                    (SetPoint::Active, true)
                } else {
                    (SetPoint::Standby, false)
                };
                match ctx.tools.update_temperature(index, sub, set_point, temp) {
                    Some(heater) => {
                        observer.on_tool_temperature(index, heater, active, temp);
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    // ─── Array ends ─────────────────────────────────────────────────

    /// End of an array: drop entities above the last index seen.
    pub fn on_array_end<O: ModelObserver + ?Sized>(
        &mut self,
        ctx: &mut ModelContext,
        path: &str,
        indices: &Indices,
        observer: &mut O,
    ) {
        let tag = self.table.lookup(path);
        let c = self.counters;
        let removed = match tag {
            FieldTag::Tools => ctx.tools.remove(next_index(c.tool), true),
            FieldTag::ToolHeaters => {
                let tool = indices[0];
                let from = match c.heater_tool {
                    Some(t) if t == tool => next_index(c.tool_heater),
                    _ => 0,
                };
                ctx.tools.remove_heaters_from(tool, from)
            }
            FieldTag::Axes => ctx.axes.remove(next_index(c.axis), true),
            FieldTag::Spindles => ctx.spindles.remove(next_index(c.spindle), true),
            FieldTag::BedHeaters => ctx.beds.remove(next_index(c.bed), true),
            FieldTag::ChamberHeaters => ctx.chambers.remove(next_index(c.chamber), true),
            FieldTag::Volumes => {
                ctx.state.volumes = next_index(c.volume);
                ctx.state.mounted_volumes = c.mounted;
                observer.on_volumes(ctx.state.volumes, c.mounted);
                0
            }
            _ => {
                trace!(path, "array end ignored");
                return;
            }
        };
        if removed > 0 {
            debug!(path, removed, "stale entries removed");
            if tag != FieldTag::Spindles {
                self.layout_changed = true;
            }
        }
    }
}
