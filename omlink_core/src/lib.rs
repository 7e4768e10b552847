//! # omlink Core Library
//!
//! Client-side object-model synchronization engine. Keeps a bounded,
//! in-memory mirror of a remote machine (axes, tools and their heaters,
//! beds, chambers, spindles) current by polling, and decides what to
//! refresh next from remote-reported sequence numbers.
//!
//! ## Data flow per tick
//!
//! 1. **Inbound**: tokenizer events → [`dispatch::Dispatcher`] → pools,
//!    [`sequence::SequenceTracker`], [`link::ModelObserver`]
//! 2. **Outbound**: [`scheduler::PollScheduler`] reads the tracker and the
//!    link's readiness → [`link::PrinterLink::send`]
//!
//! ## No allocation after construction
//!
//! Pools are fixed-capacity [`model::SlotArena`]s, text and command buffers
//! are `heapless` strings. Only the field path table is built on the heap,
//! once, at startup.

pub mod alert;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod engine;
pub mod field;
pub mod link;
pub mod model;
pub mod replay;
pub mod request;
pub mod scheduler;
pub mod sequence;

pub use engine::Engine;
