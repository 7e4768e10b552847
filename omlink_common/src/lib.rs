//! omlink Common Library
//!
//! This crate provides shared constants, configuration loading utilities and
//! the wire-name tables used by every omlink crate.
//!
//! # Module Structure
//!
//! - [`consts`] - Capacity limits and default timings
//! - [`config`] - Configuration loading traits and types
//! - [`lookup`] - Binary search over case-insensitively sorted tables
//! - [`status`] - Printer, heater, tool and spindle status name tables
//! - [`features`] - Firmware feature flags
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use omlink_common::prelude::*;
//!
//! assert_eq!(PrinterStatus::from_wire("processing"), Some(PrinterStatus::Printing));
//! ```

pub mod config;
pub mod consts;
pub mod features;
pub mod lookup;
pub mod prelude;
pub mod status;
