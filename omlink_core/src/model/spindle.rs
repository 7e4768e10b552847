//! Spindle entity (`spindles^`).
//!
//! RPM values are signed: negative means reverse rotation. The wire reports
//! magnitudes and the state separately, so the setters keep the sign in
//! step with [`SpindleState`].

use super::pool::{Pool, PoolEntity};
use omlink_common::consts::MAX_SPINDLES;
use omlink_common::status::SpindleState;

/// Default maximum RPM until the remote reports one.
pub const DEFAULT_SPINDLE_MAX_RPM: i32 = 16_000;

/// Default minimum RPM until the remote reports one.
pub const DEFAULT_SPINDLE_MIN_RPM: i32 = -16_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Spindle {
    pub index: usize,
    pub active: i32,
    pub current: i32,
    pub max: i32,
    pub min: i32,
    pub state: SpindleState,
}

impl PoolEntity for Spindle {
    fn with_index(index: usize) -> Self {
        Self {
            index,
            active: 0,
            current: 0,
            max: DEFAULT_SPINDLE_MAX_RPM,
            min: DEFAULT_SPINDLE_MIN_RPM,
            state: SpindleState::Stopped,
        }
    }

    #[inline]
    fn index(&self) -> usize {
        self.index
    }
}

impl Spindle {
    const fn signed(&self, rpm: i32) -> i32 {
        match self.state {
            SpindleState::Reverse => -rpm.saturating_abs(),
            _ => rpm.saturating_abs(),
        }
    }

    /// Set the requested RPM, keeping the current rotation direction.
    pub fn set_active_rpm(&mut self, rpm: i32) {
        self.active = self.signed(rpm);
    }

    /// Set the measured RPM, keeping the current rotation direction.
    pub fn set_current_rpm(&mut self, rpm: i32) {
        self.current = self.signed(rpm);
    }

    /// Change state; rewrites the sign of both RPM values, or zeroes them
    /// when the spindle stops.
    pub fn set_state(&mut self, state: SpindleState) {
        self.state = state;
        match state {
            SpindleState::Stopped => {
                self.active = 0;
                self.current = 0;
            }
            SpindleState::Forward | SpindleState::Reverse => {
                self.active = self.signed(self.active);
                self.current = self.signed(self.current);
            }
        }
    }
}

pub type SpindlePool = Pool<Spindle, MAX_SPINDLES>;
