//! Model context: the one owner of every pool and the sequence tracker.
//!
//! Constructed once at startup and mutated only through `&mut` borrows from
//! the tick thread.

use crate::model::slots::{self, SlotSources};
use crate::model::{AxisPool, BedPool, ChamberPool, SpindlePool, ToolPool};
use crate::sequence::SequenceTracker;
use heapless::String;
use omlink_common::consts::{MAX_EXTRUDERS, MAX_SLOTS, SHORT_TEXT_LEN};
use omlink_common::status::{HeaterCombineType, PrinterStatus};
use tracing::info;

/// Short text mirrored from the remote.
pub type ShortText = String<SHORT_TEXT_LEN>;

/// Scalar values mirrored from the remote model.
#[derive(Debug, Clone, Default)]
pub struct MirroredState {
    pub status: PrinterStatus,
    pub current_tool: Option<usize>,
    pub machine_name: ShortText,
    pub firmware_name: ShortText,
    pub firmware_version: ShortText,
    pub kinematics: ShortText,
    pub display_message: ShortText,
    pub gcodes_dir: ShortText,
    pub macros_dir: ShortText,
    pub atx_power: Option<bool>,
    pub speed_factor: i32,
    pub extrusion_factors: [i32; MAX_EXTRUDERS],
    pub fan_percent: u8,
    /// Active workplace, 0 = G54.
    pub workplace: usize,
    pub job_file: ShortText,
    pub job_size: u32,
    pub job_position: u32,
    pub job_duration: u32,
    pub job_layer: u32,
    /// Remaining time estimates [s]: file, filament, slicer.
    pub times_left: [Option<u32>; 3],
    pub volumes: usize,
    pub mounted_volumes: usize,
}

impl MirroredState {
    /// Job progress from file position, 0..=100.
    pub fn job_progress(&self) -> f32 {
        if self.job_size == 0 {
            return 0.0;
        }
        (self.job_position as f32 * 100.0 / self.job_size as f32).min(100.0)
    }
}

#[derive(Debug, Default)]
pub struct ModelContext {
    pub axes: AxisPool,
    pub spindles: SpindlePool,
    pub tools: ToolPool,
    pub beds: BedPool,
    pub chambers: ChamberPool,
    pub tracker: SequenceTracker,
    pub state: MirroredState,
}

impl ModelContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn status(&self) -> PrinterStatus {
        self.state.status
    }

    /// Drop everything that depends on the remote's runtime state after a
    /// restart: sequence numbers, dirty flags and bed/chamber heaters.
    pub fn reset_after_restart(&mut self) {
        info!("remote restart detected, forcing full resync");
        self.tracker.reset_all();
        self.beds.for_each_from(0, |bed| bed.clear_heater());
        self.chambers.for_each_from(0, |chamber| chamber.clear_heater());
    }

    /// Reassign display slots. Returns the number of slots in use.
    pub fn assign_slots(&mut self, combine: HeaterCombineType) -> usize {
        let used = slots::assign_slots(&mut self.tools, &mut self.beds, &mut self.chambers, combine);
        crate::model::axis::assign_axis_slots(&mut self.axes);
        used
    }

    /// Display slots currently showing heater `heater`.
    pub fn heater_slots(
        &self,
        heater: u8,
        sources: SlotSources,
        combine: HeaterCombineType,
    ) -> heapless::Vec<u8, MAX_SLOTS> {
        slots::heater_slots(
            heater,
            sources,
            &self.tools,
            &self.beds,
            &self.chambers,
            combine,
        )
    }
}
