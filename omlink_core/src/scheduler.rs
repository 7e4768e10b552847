//! Poll scheduler.
//!
//! Owns the live snapshot channel and one fetch channel per category, and
//! decides each tick whether (and what) to send. At most one request is
//! outstanding:
//!
//! 1. A request in flight past the absolute timeout is abandoned and the
//!    live snapshot is forced, bypassing the other gates. The timeout runs
//!    from the first send of the request; retries do not extend it.
//! 2. A request in flight otherwise only retries after its own delay.
//! 3. With nothing in flight, the minimum poll interval and the quiet period
//!    after the last response must both have elapsed. Then, if the link
//!    accepts commands, a queued file request goes first and the highest
//!    priority dirty category next; otherwise the live snapshot is polled.

use crate::config::PollConfig;
use crate::field::{Category, LIVE_POLL_COMMAND};
use crate::link::PrinterLink;
use crate::request::{ChannelState, RequestChannel};
use crate::sequence::SequenceTracker;
use omlink_common::features::FirmwareFeatures;
use omlink_common::prelude::{Ticks, elapsed};
use omlink_common::status::PrinterStatus;
use tracing::{debug, warn};

/// Identifies one channel of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    Live,
    Category(Category),
    /// File-manager listing or file-info request.
    File,
}

/// What a file-manager request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRequest {
    /// Entries of a directory.
    List,
    /// Information block of one file.
    Info,
}

#[derive(Debug, Clone)]
pub struct PollScheduler {
    live: RequestChannel,
    categories: [RequestChannel; Category::COUNT],
    file: RequestChannel,
    in_flight: Option<ChannelId>,
    /// First send of the request in flight.
    outstanding_since: Option<Ticks>,
    last_poll: Option<Ticks>,
    last_response: Option<Ticks>,
    timing: PollConfig,
}

impl PollScheduler {
    pub fn new(timing: PollConfig) -> Self {
        Self {
            live: RequestChannel::new(timing.timeout_ms, LIVE_POLL_COMMAND),
            categories: Category::ALL
                .map(|c| RequestChannel::new(timing.category_retry_ms, c.fetch_command())),
            file: RequestChannel::new(timing.category_retry_ms, ""),
            in_flight: None,
            outstanding_since: None,
            last_poll: None,
            last_response: None,
            timing,
        }
    }

    #[inline]
    pub fn timing(&self) -> &PollConfig {
        &self.timing
    }

    /// Channel awaiting a response.
    #[inline]
    pub fn in_flight(&self) -> Option<ChannelId> {
        self.in_flight
    }

    pub fn channel(&self, id: ChannelId) -> &RequestChannel {
        match id {
            ChannelId::Live => &self.live,
            ChannelId::Category(c) => &self.categories[c.ordinal()],
            ChannelId::File => &self.file,
        }
    }

    fn channel_mut(&mut self, id: ChannelId) -> &mut RequestChannel {
        match id {
            ChannelId::Live => &mut self.live,
            ChannelId::Category(c) => &mut self.categories[c.ordinal()],
            ChannelId::File => &mut self.file,
        }
    }

    /// Queue a file-manager request for `path`. The verb and quoting follow
    /// `features`. It is sent on a later tick, ahead of category fetches.
    /// Returns false (nothing queued) when `path` does not fit a command line.
    pub fn request_file(
        &mut self,
        kind: FileRequest,
        path: &str,
        features: FirmwareFeatures,
    ) -> bool {
        if !self.file.set_argument(path, features.quotes_filenames()) {
            return false;
        }
        self.file.set_command(match kind {
            FileRequest::List => features.file_list_command(),
            FileRequest::Info => features.file_info_command(),
        });
        if self.in_flight == Some(ChannelId::File) {
            debug!("file request replaced while in flight");
            self.in_flight = None;
            self.outstanding_since = None;
        }
        self.file.set_pending();
        true
    }

    /// Run one scheduling step. Returns the channel that sent, if any.
    pub fn tick<L: PrinterLink + ?Sized>(
        &mut self,
        now: Ticks,
        tracker: &SequenceTracker,
        status: PrinterStatus,
        link: &mut L,
    ) -> Option<ChannelId> {
        if let Some(id) = self.in_flight {
            let waited = self.outstanding_since.map_or(u32::MAX, |t| elapsed(now, t));
            if waited >= self.timing.timeout_ms {
                warn!(?id, waited, "no response, forcing live poll");
                self.channel_mut(id).stop();
                self.in_flight = None;
                self.outstanding_since = None;
                self.live.set_pending();
                return self.send(ChannelId::Live, now, true, link);
            }
            let gate = match id {
                ChannelId::Live => true,
                ChannelId::Category(_) | ChannelId::File => link.ok_to_send(status),
            };
            return self.send(id, now, gate, link);
        }

        if self.last_poll.is_some_and(|t| elapsed(now, t) < self.timing.interval_ms) {
            return None;
        }
        if self
            .last_response
            .is_some_and(|t| elapsed(now, t) < self.timing.response_quiet_ms)
        {
            return None;
        }

        let id = if !link.ok_to_send(status) {
            ChannelId::Live
        } else if self.file.state() == ChannelState::Ready {
            ChannelId::File
        } else {
            tracker
                .next_to_poll()
                .map_or(ChannelId::Live, ChannelId::Category)
        };
        self.channel_mut(id).set_pending();
        self.send(id, now, true, link)
    }

    fn send<L: PrinterLink + ?Sized>(
        &mut self,
        id: ChannelId,
        now: Ticks,
        gate: bool,
        link: &mut L,
    ) -> Option<ChannelId> {
        if !self.channel_mut(id).process(now, gate, link) {
            return None;
        }
        debug!(?id, now, "request sent");
        if self.in_flight != Some(id) {
            self.outstanding_since = Some(now);
        }
        self.last_poll = Some(now);
        self.in_flight = Some(id);
        Some(id)
    }

    /// A complete response arrived; it answers the request in flight.
    pub fn response_received(&mut self, now: Ticks) {
        if let Some(id) = self.in_flight.take() {
            self.channel_mut(id).stop();
        }
        self.outstanding_since = None;
        self.last_response = Some(now);
    }

    /// True when no channel is running.
    pub fn is_idle(&self) -> bool {
        self.live.state() != ChannelState::Running
            && self.file.state() != ChannelState::Running
            && self
                .categories
                .iter()
                .all(|c| c.state() != ChannelState::Running)
    }
}
