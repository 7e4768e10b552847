//! Per-category sequence numbers and dirty flags.
//!
//! The remote bumps a category's sequence number whenever its data changes.
//! A changed number marks the category dirty; the scheduler fetches dirty
//! categories in [`Category`] priority order and the dispatcher consumes the
//! flag once the fetch response arrives.

use crate::field::Category;
use tracing::debug;

/// Stored value before a category has reported; never sent by the remote.
pub const SEQ_INVALID: u32 = u32::MAX;

#[derive(Debug, Clone)]
pub struct SequenceTracker {
    seqs: [u32; Category::COUNT],
    dirty: [bool; Category::COUNT],
    uptime: Option<u32>,
}

impl SequenceTracker {
    pub const fn new() -> Self {
        Self {
            seqs: [SEQ_INVALID; Category::COUNT],
            dirty: [false; Category::COUNT],
            uptime: None,
        }
    }

    /// Record a reported sequence number. Returns true when it differs from
    /// the stored one, in which case the category is now dirty.
    pub fn update(&mut self, category: Category, seq: u32) -> bool {
        let i = category.ordinal();
        if self.seqs[i] == seq {
            return false;
        }
        debug!(
            category = category.key(),
            old = self.seqs[i],
            new = seq,
            "sequence changed"
        );
        self.seqs[i] = seq;
        self.dirty[i] = true;
        true
    }

    /// Fetch of `category` completed; clear its dirty flag.
    pub fn consume(&mut self, category: Category) {
        self.dirty[category.ordinal()] = false;
    }

    #[inline]
    pub fn is_dirty(&self, category: Category) -> bool {
        self.dirty[category.ordinal()]
    }

    /// Last sequence number stored for `category`.
    #[inline]
    pub fn seq(&self, category: Category) -> u32 {
        self.seqs[category.ordinal()]
    }

    pub fn any_dirty(&self) -> bool {
        self.dirty.iter().any(|&d| d)
    }

    /// Highest-priority dirty category.
    pub fn next_to_poll(&self) -> Option<Category> {
        Category::ALL.into_iter().find(|c| self.is_dirty(*c))
    }

    /// Fetch command of [`Self::next_to_poll`].
    pub fn next_command(&self) -> Option<&'static str> {
        self.next_to_poll().map(Category::fetch_command)
    }

    /// Forget every sequence number and dirty flag.
    pub fn reset_all(&mut self) {
        self.seqs = [SEQ_INVALID; Category::COUNT];
        self.dirty = [false; Category::COUNT];
    }

    /// Record the remote uptime. Returns true when it went backwards, which
    /// means the remote restarted. Resetting is left to the caller.
    pub fn observe_uptime(&mut self, uptime: u32) -> bool {
        let restarted = self.uptime.is_some_and(|previous| uptime < previous);
        self.uptime = Some(uptime);
        restarted
    }

    /// Last reported uptime in seconds.
    #[inline]
    pub fn uptime(&self) -> Option<u32> {
        self.uptime
    }
}

impl Default for SequenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
