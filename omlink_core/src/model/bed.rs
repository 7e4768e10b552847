//! Bed and chamber entities (`heat.bedHeaters^`, `heat.chamberHeaters^`).

use super::pool::{Pool, PoolEntity};
use omlink_common::consts::{MAX_BEDS, MAX_CHAMBERS, MAX_SLOTS};
use omlink_common::status::HeaterStatus;

/// A heated bed or chamber. Both share one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct BedOrChamber {
    pub index: usize,
    /// Heater number driving this bed or chamber.
    pub heater: Option<u8>,
    pub heater_status: HeaterStatus,
    /// Display slot, `MAX_SLOTS` when unassigned.
    pub slot: u8,
}

impl PoolEntity for BedOrChamber {
    fn with_index(index: usize) -> Self {
        Self {
            index,
            heater: None,
            heater_status: HeaterStatus::Off,
            slot: MAX_SLOTS as u8,
        }
    }

    #[inline]
    fn index(&self) -> usize {
        self.index
    }
}

impl BedOrChamber {
    /// Forget the heater association (after a remote restart).
    pub fn clear_heater(&mut self) {
        self.heater = None;
        self.heater_status = HeaterStatus::Off;
    }
}

pub type BedPool = Pool<BedOrChamber, MAX_BEDS>;
pub type ChamberPool = Pool<BedOrChamber, MAX_CHAMBERS>;

/// Update the status of every bed or chamber driven by `heater`.
/// Returns true when at least one matched.
pub fn set_heater_status<const N: usize>(
    pool: &mut Pool<BedOrChamber, N>,
    heater: u8,
    status: HeaterStatus,
) -> bool {
    let mut matched = false;
    pool.for_each_from(0, |bed| {
        if bed.heater == Some(heater) {
            bed.heater_status = status;
            matched = true;
        }
    });
    matched
}
