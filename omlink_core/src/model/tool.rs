//! Tool entity (`tools^`) and its heaters.
//!
//! Tool heaters live in one arena shared by all tools. A [`Tool`] only
//! holds handles into it, one per heater position, so removing a tool must
//! go through [`ToolPool`], which returns the heaters to the arena.

use super::arena::{SlotArena, SlotHandle};
use super::pool::{Pool, PoolEntity};
use omlink_common::consts::{
    MAX_HEATERS_PER_TOOL, MAX_SLOTS, MAX_TOOL_HEATERS, MAX_TOOLS, MAX_TOTAL_AXES,
};
use omlink_common::status::ToolStatus;

/// One heater of a tool, with the tool's set-points for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolHeater {
    /// Heater number on the remote machine.
    pub heater: u8,
    pub active_temp: f32,
    pub standby_temp: f32,
}

impl ToolHeater {
    pub const fn new(heater: u8) -> Self {
        Self {
            heater,
            active_temp: 0.0,
            standby_temp: 0.0,
        }
    }
}

/// Which set-point a temperature update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetPoint {
    Active,
    Standby,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    pub index: usize,
    /// Heater handles by position; `None` until first referenced.
    heaters: [Option<SlotHandle>; MAX_HEATERS_PER_TOOL],
    /// First extruder, -1 when none.
    pub extruder: i8,
    pub spindle: Option<u8>,
    pub spindle_rpm: i32,
    /// First fan, -1 when none.
    pub fan: i8,
    pub offsets: [f32; MAX_TOTAL_AXES],
    pub status: ToolStatus,
    /// Display slot, `MAX_SLOTS` when unassigned.
    pub slot: u8,
}

impl PoolEntity for Tool {
    fn with_index(index: usize) -> Self {
        Self {
            index,
            heaters: [None; MAX_HEATERS_PER_TOOL],
            extruder: -1,
            spindle: None,
            spindle_rpm: 0,
            fan: -1,
            offsets: [0.0; MAX_TOTAL_AXES],
            status: ToolStatus::Off,
            slot: MAX_SLOTS as u8,
        }
    }

    #[inline]
    fn index(&self) -> usize {
        self.index
    }
}

impl Tool {
    /// Number of heater positions in use.
    pub fn heater_count(&self) -> usize {
        self.heaters.iter().filter(|h| h.is_some()).count()
    }

    /// Filled heater positions below `position`; the display offset of
    /// that heater within the tool's slots.
    pub fn heater_rank(&self, position: usize) -> usize {
        self.heaters.iter().take(position).filter(|h| h.is_some()).count()
    }

    pub fn set_offset(&mut self, axis: usize, offset: f32) -> bool {
        match self.offsets.get_mut(axis) {
            Some(slot) => {
                *slot = offset;
                true
            }
            None => false,
        }
    }
}

/// Tool pool plus the arena holding every tool's heaters.
#[derive(Debug, Default)]
pub struct ToolPool {
    tools: Pool<Tool, MAX_TOOLS>,
    heaters: SlotArena<ToolHeater, MAX_TOOL_HEATERS>,
}

impl ToolPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the tools themselves.
    #[inline]
    pub fn tools(&self) -> &Pool<Tool, MAX_TOOLS> {
        &self.tools
    }

    pub fn get(&self, index: usize) -> Option<&Tool> {
        self.tools.get(index)
    }

    pub fn get_or_create(&mut self, index: usize, create: bool) -> Option<&mut Tool> {
        self.tools.get_or_create(index, create)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> + '_ {
        self.tools.iter()
    }

    pub fn for_each_from<F>(&mut self, from_index: usize, visitor: F)
    where
        F: FnMut(&mut Tool),
    {
        self.tools.for_each_from(from_index, visitor);
    }

    /// Heater at `position` of tool `tool`.
    pub fn heater(&self, tool: usize, position: usize) -> Option<&ToolHeater> {
        let handle = (*self.tools.get(tool)?.heaters.get(position)?)?;
        self.heaters.get(handle)
    }

    /// Heater at `position` of tool `tool`, created for heater number
    /// `heater` when missing. The tool itself is created as needed.
    /// Returns `None` if the tool pool or the heater arena is full.
    pub fn heater_or_create(
        &mut self,
        tool: usize,
        position: usize,
        heater: u8,
    ) -> Option<&mut ToolHeater> {
        let Self { tools, heaters } = self;
        let slot = tools.get_or_create(tool, true)?.heaters.get_mut(position)?;
        let handle = match *slot {
            Some(handle) if heaters.contains(handle) => handle,
            _ => {
                let handle = heaters.insert(ToolHeater::new(heater)).ok()?;
                *slot = Some(handle);
                handle
            }
        };
        let entry = heaters.get_mut(handle)?;
        entry.heater = heater;
        Some(entry)
    }

    /// Position of heater number `heater` within tool `tool`.
    pub fn has_heater(&self, tool: usize, heater: u8) -> Option<usize> {
        let tool = self.tools.get(tool)?;
        tool.heaters.iter().position(|h| {
            h.and_then(|h| self.heaters.get(h))
                .is_some_and(|th| th.heater == heater)
        })
    }

    /// Visit `(position, heater)` of every heater of tool `tool`.
    pub fn iterate_heaters<F>(&self, tool: usize, mut visitor: F)
    where
        F: FnMut(usize, &ToolHeater),
    {
        let Some(tool) = self.tools.get(tool) else {
            return;
        };
        for (position, handle) in tool.heaters.iter().enumerate() {
            if let Some(th) = handle.and_then(|h| self.heaters.get(h)) {
                visitor(position, th);
            }
        }
    }

    /// First tool (ascending index) using heater number `heater`.
    pub fn find_by_heater(&self, heater: u8) -> Option<&Tool> {
        self.tools
            .find(|tool| tool.heaters.iter().flatten().any(|h| self.heater_is(*h, heater)))
    }

    fn heater_is(&self, handle: SlotHandle, heater: u8) -> bool {
        self.heaters.get(handle).is_some_and(|th| th.heater == heater)
    }

    /// Release heaters of tool `tool` from `position` upwards.
    /// Returns how many heaters were released.
    pub fn remove_heaters_from(&mut self, tool: usize, position: usize) -> usize {
        let Self { tools, heaters } = self;
        let Some(tool) = tools.get_mut(tool) else {
            return 0;
        };
        let mut released = 0;
        for slot in tool.heaters.iter_mut().skip(position) {
            if let Some(handle) = slot.take() {
                if heaters.remove(handle).is_some() {
                    released += 1;
                }
            }
        }
        released
    }

    /// Update a set-point of the heater at `position` of tool `tool`.
    /// Returns the heater number on success.
    pub fn update_temperature(
        &mut self,
        tool: usize,
        position: usize,
        set_point: SetPoint,
        temp: f32,
    ) -> Option<u8> {
        let handle = (*self.tools.get(tool)?.heaters.get(position)?)?;
        let th = self.heaters.get_mut(handle)?;
        match set_point {
            SetPoint::Active => th.active_temp = temp,
            SetPoint::Standby => th.standby_temp = temp,
        }
        Some(th.heater)
    }

    /// Remove tool `index`, or every tool from `index` up with `cascade`.
    /// The removed tools' heaters go back to the heater arena.
    pub fn remove(&mut self, index: usize, cascade: bool) -> usize {
        let Self { tools, heaters } = self;
        tools.remove_with(index, cascade, |tool| {
            for handle in tool.heaters.into_iter().flatten() {
                heaters.remove(handle);
            }
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Heaters currently held by all tools.
    #[inline]
    pub fn heaters_in_use(&self) -> usize {
        self.heaters.len()
    }
}
