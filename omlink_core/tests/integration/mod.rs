//! Shared fixtures for the integration scenarios.

mod field_table_props;
mod replay_script;
mod restart;
mod scheduling;
mod tool_listing;

use omlink_common::features::FirmwareFeatures;
use omlink_core::Engine;
use omlink_core::alert::Alert;
use omlink_core::config::SyncConfig;
use omlink_core::link::{ModelObserver, PrinterLink};

/// Counts the callbacks the scenarios assert on.
#[derive(Debug, Default)]
pub struct Recorder {
    pub alerts: Vec<u32>,
    pub cleared: usize,
    pub responses: Vec<String>,
    pub restarts: usize,
    pub layout_changes: usize,
    pub messages: usize,
}

impl ModelObserver for Recorder {
    fn on_alert(&mut self, alert: &Alert) {
        self.alerts.push(alert.seq);
    }

    fn on_alert_cleared(&mut self) {
        self.cleared += 1;
    }

    fn on_response(&mut self, text: &str) {
        self.responses.push(text.to_owned());
    }

    fn on_restart(&mut self) {
        self.restarts += 1;
    }

    fn on_layout_changed(&mut self) {
        self.layout_changes += 1;
    }

    fn on_message_end(&mut self) {
        self.messages += 1;
    }
}

/// Link that records every line and can refuse category fetches.
#[derive(Debug, Default)]
pub struct MockLink {
    pub sent: Vec<String>,
    pub refuse: bool,
    pub features: FirmwareFeatures,
}

impl PrinterLink for MockLink {
    fn send(&mut self, line: &str) {
        self.sent.push(line.to_owned());
    }

    fn ok_to_send(&self, status: omlink_common::status::PrinterStatus) -> bool {
        !self.refuse && status.accepts_commands()
    }

    fn firmware_features(&self) -> FirmwareFeatures {
        self.features
    }
}

pub fn engine() -> Engine {
    Engine::new(&SyncConfig::default())
}

/// One event of a scripted message.
#[derive(Debug, Clone, Copy)]
pub enum Ev<'a> {
    /// `(path, value, indices)`
    Val(&'a str, &'a str, [usize; 2]),
    /// `(path, indices)` of an array that just closed.
    ArrayEnd(&'a str, [usize; 2]),
}

/// Feed one complete message.
pub fn message(engine: &mut Engine, obs: &mut Recorder, now: u32, events: &[Ev<'_>]) {
    engine.begin_message(obs);
    for event in events {
        match *event {
            Ev::Val(path, value, indices) => engine.on_value(path, value, &indices, obs),
            Ev::ArrayEnd(path, indices) => engine.on_array_end(path, &indices, obs),
        }
    }
    engine.end_message(now, obs);
}
