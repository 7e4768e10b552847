//! Engine façade: the single entry point called from the control loop.
//!
//! Binds the [`ModelContext`], the [`Dispatcher`] and the [`PollScheduler`].
//! Inbound events go through `begin_message` / `on_value` /
//! `on_array_end` / `end_message`; `tick` runs the outbound side.

use crate::config::SyncConfig;
use crate::context::ModelContext;
use crate::dispatch::Dispatcher;
use crate::field::{Category, Indices};
use crate::link::{ModelObserver, PrinterLink};
use crate::model::SlotSources;
use crate::scheduler::{ChannelId, FileRequest, PollScheduler};
use heapless::Vec;
use omlink_common::consts::MAX_SLOTS;
use omlink_common::prelude::Ticks;
use tracing::info;

#[derive(Debug)]
pub struct Engine {
    context: ModelContext,
    dispatcher: Dispatcher,
    scheduler: PollScheduler,
}

impl Engine {
    pub fn new(config: &SyncConfig) -> Self {
        info!(
            interval_ms = config.poll.interval_ms,
            timeout_ms = config.poll.timeout_ms,
            combine = ?config.display.heater_combine,
            "engine configured"
        );
        Self {
            context: ModelContext::new(),
            dispatcher: Dispatcher::new(config.display.heater_combine),
            scheduler: PollScheduler::new(config.poll),
        }
    }

    #[inline]
    pub fn context(&self) -> &ModelContext {
        &self.context
    }

    /// Mutable pool access for consumers (e.g. removing a tool locally).
    #[inline]
    pub fn context_mut(&mut self) -> &mut ModelContext {
        &mut self.context
    }

    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    #[inline]
    pub fn scheduler(&self) -> &PollScheduler {
        &self.scheduler
    }

    pub fn begin_message<O: ModelObserver + ?Sized>(&mut self, observer: &mut O) {
        self.dispatcher.begin_message(observer);
    }

    pub fn on_value<O: ModelObserver + ?Sized>(
        &mut self,
        path: &str,
        value: &str,
        indices: &Indices,
        observer: &mut O,
    ) {
        self.dispatcher
            .on_value(&mut self.context, path, value, indices, observer);
    }

    pub fn on_array_end<O: ModelObserver + ?Sized>(
        &mut self,
        path: &str,
        indices: &Indices,
        observer: &mut O,
    ) {
        self.dispatcher
            .on_array_end(&mut self.context, path, indices, observer);
    }

    /// Commit the message and mark the outstanding request answered.
    pub fn end_message<O: ModelObserver + ?Sized>(&mut self, now: Ticks, observer: &mut O) {
        self.dispatcher.end_message(&mut self.context, observer);
        self.scheduler.response_received(now);
    }

    /// Outbound step; returns the channel that sent, if any.
    pub fn tick<L: PrinterLink + ?Sized>(&mut self, now: Ticks, link: &mut L) -> Option<ChannelId> {
        self.scheduler
            .tick(now, &self.context.tracker, self.context.status(), link)
    }

    /// Queue a file-manager request for `path`, worded for the firmware
    /// behind `link`. See [`PollScheduler::request_file`].
    pub fn request_file<L: PrinterLink + ?Sized>(
        &mut self,
        kind: FileRequest,
        path: &str,
        link: &L,
    ) -> bool {
        self.scheduler.request_file(kind, path, link.firmware_features())
    }

    /// Whether `category` has changed data not yet fetched.
    #[inline]
    pub fn category_dirty(&self, category: Category) -> bool {
        self.context.tracker.is_dirty(category)
    }

    /// Display slots showing heater `heater` under the configured layout.
    pub fn heater_slots(&self, heater: u8, sources: SlotSources) -> Vec<u8, MAX_SLOTS> {
        self.context
            .heater_slots(heater, sources, self.dispatcher.combine())
    }
}
