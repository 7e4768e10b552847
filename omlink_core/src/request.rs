//! Request channel: one command with time-based retry.
//!
//! State machine: `Stopped → Ready → Running → Ready → …`
//!
//! A running channel becomes ready again once its delay has elapsed without
//! a `stop()`; a ready channel sends as soon as its gate is open. There is
//! no response correlation: a response is assumed to belong to the one
//! request in flight.

use crate::link::PrinterLink;
use core::fmt::Write;
use heapless::String;
use omlink_common::consts::MAX_COMMAND_LEN;
use omlink_common::prelude::{Ticks, elapsed};
use tracing::{trace, warn};

/// Outbound command line buffer.
pub type CommandLine = String<MAX_COMMAND_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Stopped,
    Ready,
    Running,
}

#[derive(Debug, Clone)]
pub struct RequestChannel {
    state: ChannelState,
    delay_ms: u32,
    sent_at: Ticks,
    command: &'static str,
    argument: Option<CommandLine>,
    quote_argument: bool,
}

impl RequestChannel {
    /// Stopped channel sending `command` with retry delay `delay_ms`.
    pub const fn new(delay_ms: u32, command: &'static str) -> Self {
        Self {
            state: ChannelState::Stopped,
            delay_ms,
            sent_at: 0,
            command,
            argument: None,
            quote_argument: false,
        }
    }

    pub fn set_command(&mut self, command: &'static str) {
        self.command = command;
    }

    #[inline]
    pub fn command(&self) -> &'static str {
        self.command
    }

    /// Set the argument appended after the command. Returns false (and
    /// leaves the previous argument) if it does not fit a command line.
    pub fn set_argument(&mut self, argument: &str, quote: bool) -> bool {
        let mut buf = CommandLine::new();
        if buf.push_str(argument).is_err() {
            warn!(len = argument.len(), "request argument too long");
            return false;
        }
        self.argument = Some(buf);
        self.quote_argument = quote;
        true
    }

    pub fn clear_argument(&mut self) {
        self.argument = None;
        self.quote_argument = false;
    }

    /// Force the next `process()` to send.
    pub fn set_pending(&mut self) {
        self.state = ChannelState::Ready;
    }

    pub fn stop(&mut self) {
        self.state = ChannelState::Stopped;
    }

    #[inline]
    pub fn state(&self) -> ChannelState {
        self.state
    }

    #[inline]
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn set_delay_ms(&mut self, delay_ms: u32) {
        self.delay_ms = delay_ms;
    }

    /// Tick of the last send.
    #[inline]
    pub fn sent_at(&self) -> Ticks {
        self.sent_at
    }

    /// Full line that a send would transmit.
    pub fn line(&self) -> Option<CommandLine> {
        let mut line = CommandLine::new();
        let q = if self.quote_argument { "\"" } else { "" };
        let written = match &self.argument {
            Some(arg) => write!(line, "{}{q}{arg}{q}\n", self.command),
            None => write!(line, "{}\n", self.command),
        };
        written.ok().map(|_| line)
    }

    /// Advance the state machine. Sends through `link` when ready and
    /// `gate` is open; returns true if a line was sent.
    pub fn process<L: PrinterLink + ?Sized>(&mut self, now: Ticks, gate: bool, link: &mut L) -> bool {
        if self.state == ChannelState::Running && elapsed(now, self.sent_at) > self.delay_ms {
            trace!(command = self.command, "retry delay elapsed");
            self.state = ChannelState::Ready;
        }
        if self.state != ChannelState::Ready || !gate {
            return false;
        }
        let Some(line) = self.line() else {
            warn!(command = self.command, "command line overflow, dropped");
            self.state = ChannelState::Stopped;
            return false;
        };
        link.send(&line);
        self.sent_at = now;
        self.state = ChannelState::Running;
        true
    }
}
