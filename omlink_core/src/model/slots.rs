//! Display slot layout for heated entities.
//!
//! Slots are handed out in order beds, chambers, tools. Without heater
//! combining, a tool takes one slot per heater (at least one); with it, a
//! tool takes exactly one slot showing its first heater. Anything past
//! `MAX_SLOTS` is left unassigned.

use super::bed::{BedOrChamber, BedPool, ChamberPool};
use super::pool::Pool;
use super::tool::ToolPool;
use bitflags::bitflags;
use heapless::Vec;
use omlink_common::consts::MAX_SLOTS;
use omlink_common::status::HeaterCombineType;

const UNASSIGNED: u8 = MAX_SLOTS as u8;

bitflags! {
    /// Entity kinds included in a [`heater_slots`] query.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SlotSources: u8 {
        const BEDS     = 0x01;
        const CHAMBERS = 0x02;
        const TOOLS    = 0x04;
    }
}

/// Slots a tool occupies under the given combine mode.
fn tool_width(heater_count: usize, combine: HeaterCombineType) -> usize {
    match combine {
        HeaterCombineType::Combined => 1,
        HeaterCombineType::NotCombined => heater_count.max(1),
    }
}

fn assign_heated<const N: usize>(pool: &mut Pool<BedOrChamber, N>, next: &mut usize) {
    pool.for_each_from(0, |entity| {
        if entity.heater.is_some() && *next < MAX_SLOTS {
            entity.slot = *next as u8;
            *next += 1;
        } else {
            entity.slot = UNASSIGNED;
        }
    });
}

/// Lay out beds, chambers and tools on the display slots.
/// Returns the number of slots in use.
pub fn assign_slots(
    tools: &mut ToolPool,
    beds: &mut BedPool,
    chambers: &mut ChamberPool,
    combine: HeaterCombineType,
) -> usize {
    let mut next = 0usize;
    assign_heated(beds, &mut next);
    assign_heated(chambers, &mut next);
    tools.for_each_from(0, |tool| {
        let width = tool_width(tool.heater_count(), combine);
        if next + width <= MAX_SLOTS {
            tool.slot = next as u8;
            next += width;
        } else {
            tool.slot = UNASSIGNED;
        }
    });
    next
}

/// Display slots currently showing heater number `heater`.
pub fn heater_slots(
    heater: u8,
    sources: SlotSources,
    tools: &ToolPool,
    beds: &BedPool,
    chambers: &ChamberPool,
    combine: HeaterCombineType,
) -> Vec<u8, MAX_SLOTS> {
    let mut slots = Vec::new();
    let mut push = |slot: usize| {
        if slot < MAX_SLOTS && !slots.contains(&(slot as u8)) {
            let _ = slots.push(slot as u8);
        }
    };

    if sources.contains(SlotSources::BEDS) {
        beds.iter()
            .filter(|b| b.heater == Some(heater))
            .for_each(|b| push(b.slot as usize));
    }
    if sources.contains(SlotSources::CHAMBERS) {
        chambers
            .iter()
            .filter(|c| c.heater == Some(heater))
            .for_each(|c| push(c.slot as usize));
    }
    if sources.contains(SlotSources::TOOLS) {
        for tool in tools.iter() {
            if tool.slot == UNASSIGNED {
                continue;
            }
            let Some(position) = tools.has_heater(tool.index, heater) else {
                continue;
            };
            let rank = tool.heater_rank(position);
            match combine {
                HeaterCombineType::NotCombined => push(tool.slot as usize + rank),
                HeaterCombineType::Combined if rank == 0 => push(tool.slot as usize),
                HeaterCombineType::Combined => {}
            }
        }
    }
    slots
}
