//! Alert (message box) reconciliation.
//!
//! `state.messageBox.*` fields arrive one by one. They are collected into a
//! pending [`Alert`] and only committed at message end when every field was
//! received and the sequence number is new, so a torn message box is never
//! shown. A `null` message box clears the alert on display.

use bitflags::bitflags;
use heapless::String;
use omlink_common::consts::{ALERT_TEXT_LEN, ALERT_TITLE_LEN};

bitflags! {
    /// Message box fields received in the current message.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AlertFields: u8 {
        const MODE     = 1 << 0;
        const SEQ      = 1 << 1;
        const TIMEOUT  = 1 << 2;
        const TITLE    = 1 << 3;
        const TEXT     = 1 << 4;
        const CONTROLS = 1 << 5;
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Alert {
    pub mode: i32,
    pub seq: u32,
    /// Seconds until auto-close, 0 for none.
    pub timeout: f32,
    pub title: String<ALERT_TITLE_LEN>,
    pub text: String<ALERT_TEXT_LEN>,
    /// Bitmap of axes offered for jogging.
    pub controls: u32,
}

/// Copy `src` into `dst`, truncating at a character boundary when full.
pub fn copy_truncated<const N: usize>(dst: &mut String<N>, src: &str) {
    dst.clear();
    for ch in src.chars() {
        if dst.push(ch).is_err() {
            break;
        }
    }
}

/// Outcome of [`AlertTracker::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertChange {
    None,
    Shown,
    Cleared,
}

/// Pending and displayed alert state.
#[derive(Debug, Clone, Default)]
pub struct AlertTracker {
    pending: Alert,
    got: AlertFields,
    clear_requested: bool,
    shown: Option<Alert>,
    last_seq: Option<u32>,
}

impl AlertTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start collecting a new message.
    pub fn begin(&mut self) {
        self.pending = Alert::default();
        self.got = AlertFields::empty();
        self.clear_requested = false;
    }

    pub fn set_mode(&mut self, mode: i32) {
        self.pending.mode = mode;
        self.got |= AlertFields::MODE;
    }

    pub fn set_seq(&mut self, seq: u32) {
        self.pending.seq = seq;
        self.got |= AlertFields::SEQ;
    }

    pub fn set_timeout(&mut self, timeout: f32) {
        self.pending.timeout = timeout;
        self.got |= AlertFields::TIMEOUT;
    }

    pub fn set_title(&mut self, title: &str) {
        copy_truncated(&mut self.pending.title, title);
        self.got |= AlertFields::TITLE;
    }

    pub fn set_text(&mut self, text: &str) {
        copy_truncated(&mut self.pending.text, text);
        self.got |= AlertFields::TEXT;
    }

    pub fn set_controls(&mut self, controls: u32) {
        self.pending.controls = controls;
        self.got |= AlertFields::CONTROLS;
    }

    /// The message box was reported as `null`.
    pub fn request_clear(&mut self) {
        self.clear_requested = true;
    }

    #[inline]
    pub fn received(&self) -> AlertFields {
        self.got
    }

    /// Alert currently on display.
    #[inline]
    pub fn shown(&self) -> Option<&Alert> {
        self.shown.as_ref()
    }

    /// Reconcile at message end.
    pub fn commit(&mut self) -> AlertChange {
        if self.clear_requested {
            self.clear_requested = false;
            return match self.shown.take() {
                Some(_) => AlertChange::Cleared,
                None => AlertChange::None,
            };
        }
        if !self.got.is_all() || self.last_seq == Some(self.pending.seq) {
            return AlertChange::None;
        }
        self.last_seq = Some(self.pending.seq);
        self.shown = Some(core::mem::take(&mut self.pending));
        self.got = AlertFields::empty();
        AlertChange::Shown
    }

    /// Forget the displayed alert and its sequence (remote restart).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
