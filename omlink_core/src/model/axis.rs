//! Axis entity (`move.axes^`).

use super::pool::{Pool, PoolEntity};
use omlink_common::consts::{MAX_SLOTS, MAX_TOTAL_AXES, MAX_TOTAL_WORKPLACES};

/// One machine axis as mirrored from the remote model.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub index: usize,
    /// Axis letter, `'\0'` until reported.
    pub letter: char,
    pub babystep: f32,
    pub user_position: f32,
    pub machine_position: f32,
    /// Offsets for G54..G59.3.
    pub workplace_offsets: [f32; MAX_TOTAL_WORKPLACES],
    pub homed: bool,
    pub visible: bool,
    /// Display slot, `MAX_SLOTS` when unassigned.
    pub slot: u8,
}

impl PoolEntity for Axis {
    const INDEX_LIMIT: usize = MAX_TOTAL_AXES;

    fn with_index(index: usize) -> Self {
        Self {
            index,
            letter: '\0',
            babystep: 0.0,
            user_position: 0.0,
            machine_position: 0.0,
            workplace_offsets: [0.0; MAX_TOTAL_WORKPLACES],
            homed: false,
            visible: false,
            slot: MAX_SLOTS as u8,
        }
    }

    #[inline]
    fn index(&self) -> usize {
        self.index
    }
}

impl Axis {
    /// Store the offset of one workplace; out-of-range workplaces are ignored.
    pub fn set_workplace_offset(&mut self, workplace: usize, offset: f32) -> bool {
        match self.workplace_offsets.get_mut(workplace) {
            Some(slot) => {
                *slot = offset;
                true
            }
            None => false,
        }
    }
}

pub type AxisPool = Pool<Axis, MAX_TOTAL_AXES>;

/// Lay out visible axes on consecutive display slots.
pub fn assign_axis_slots(axes: &mut AxisPool) {
    let mut next = 0u8;
    axes.for_each_from(0, |axis| {
        if axis.visible && (next as usize) < MAX_SLOTS {
            axis.slot = next;
            next += 1;
        } else {
            axis.slot = MAX_SLOTS as u8;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let axis = Axis::with_index(2);
        assert_eq!(axis.index, 2);
        assert_eq!(axis.letter, '\0');
        assert!(!axis.homed);
        assert_eq!(axis.slot as usize, MAX_SLOTS);
    }

    #[test]
    fn rejects_out_of_range_index() {
        let mut axes = AxisPool::new();
        assert!(axes.get_or_create(MAX_TOTAL_AXES, true).is_none());
        assert!(axes.get_or_create(MAX_TOTAL_AXES - 1, true).is_some());
    }

    #[test]
    fn workplace_offsets_bounded() {
        let mut axis = Axis::with_index(0);
        assert!(axis.set_workplace_offset(8, 1.5));
        assert!(!axis.set_workplace_offset(9, 2.0));
        assert_eq!(axis.workplace_offsets[8], 1.5);
    }

    #[test]
    fn hidden_axes_get_no_slot() {
        let mut axes = AxisPool::new();
        for i in 0..4 {
            axes.get_or_create(i, true).unwrap().visible = i != 1;
        }
        assign_axis_slots(&mut axes);
        let slots: Vec<u8> = axes.iter().map(|a| a.slot).collect();
        assert_eq!(slots, [0, MAX_SLOTS as u8, 1, 2]);
    }
}
