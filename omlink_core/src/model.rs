//! Mirrored entity model.
//!
//! Every entity category lives in a bounded [`pool::Pool`] backed by a
//! [`arena::SlotArena`]. Nothing here allocates after construction.

pub mod arena;
pub mod axis;
pub mod bed;
pub mod pool;
pub mod slots;
pub mod spindle;
pub mod tool;

pub use arena::{SlotArena, SlotHandle};
pub use axis::{Axis, AxisPool};
pub use bed::{BedOrChamber, BedPool, ChamberPool};
pub use pool::{Pool, PoolEntity};
pub use slots::SlotSources;
pub use spindle::{Spindle, SpindlePool};
pub use tool::{SetPoint, Tool, ToolHeater, ToolPool};
