//! Line-oriented event scripts.
//!
//! Stands in for the byte-level tokenizer: each line is one event fed to
//! the [`Engine`]. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! begin
//! value <i0> <i1> <path> <text...>
//! array_end <i0> <i1> <path>
//! end
//! tick <ms>
//! ```
//!
//! `tick` advances the clock by `<ms>` and runs one scheduling step.

use crate::engine::Engine;
use crate::field::Indices;
use crate::link::{ModelObserver, PrinterLink};
use omlink_common::prelude::Ticks;
use std::io::BufRead;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unknown directive '{directive}'")]
    UnknownDirective { line: usize, directive: String },

    #[error("line {line}: missing {what}")]
    Missing { line: usize, what: &'static str },

    #[error("line {line}: invalid number '{text}'")]
    InvalidNumber { line: usize, text: String },
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayEvent<'a> {
    Begin,
    End,
    Value {
        indices: Indices,
        path: &'a str,
        text: &'a str,
    },
    ArrayEnd {
        indices: Indices,
        path: &'a str,
    },
    Tick(u32),
}

/// Split off the first whitespace-separated token.
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    Some(match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    })
}

fn number<T: core::str::FromStr>(line: usize, text: &str) -> Result<T, ReplayError> {
    text.parse().map_err(|_| ReplayError::InvalidNumber {
        line,
        text: text.to_string(),
    })
}

fn token<'a>(line: usize, rest: &'a str, what: &'static str) -> Result<(&'a str, &'a str), ReplayError> {
    next_token(rest).ok_or(ReplayError::Missing { line, what })
}

fn indices_and_path(line: usize, rest: &str) -> Result<(Indices, &str, &str), ReplayError> {
    let (i0, rest) = token(line, rest, "first index")?;
    let (i1, rest) = token(line, rest, "second index")?;
    let (path, rest) = token(line, rest, "path")?;
    Ok(([number(line, i0)?, number(line, i1)?], path, rest))
}

/// Parse one script line; `Ok(None)` for blanks and comments.
pub fn parse_line(line: usize, text: &str) -> Result<Option<ReplayEvent<'_>>, ReplayError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let Some((directive, rest)) = next_token(trimmed) else {
        return Ok(None);
    };
    let event = match directive {
        "begin" => ReplayEvent::Begin,
        "end" => ReplayEvent::End,
        "value" => {
            let (indices, path, rest) = indices_and_path(line, rest)?;
            ReplayEvent::Value {
                indices,
                path,
                text: rest.trim_start(),
            }
        }
        "array_end" => {
            let (indices, path, _) = indices_and_path(line, rest)?;
            ReplayEvent::ArrayEnd { indices, path }
        }
        "tick" => {
            let (ms, _) = token(line, rest, "milliseconds")?;
            ReplayEvent::Tick(number(line, ms)?)
        }
        other => {
            return Err(ReplayError::UnknownDirective {
                line,
                directive: other.to_string(),
            });
        }
    };
    Ok(Some(event))
}

/// Counters of one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub messages: usize,
    pub requests_sent: usize,
    /// Clock at the end of the run [ms].
    pub now: Ticks,
}

/// Feed a script to `engine`, sending requests through `link`.
pub fn run<R, L, O>(
    reader: R,
    engine: &mut Engine,
    link: &mut L,
    observer: &mut O,
) -> Result<ReplayStats, ReplayError>
where
    R: BufRead,
    L: PrinterLink + ?Sized,
    O: ModelObserver + ?Sized,
{
    let mut stats = ReplayStats::default();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(event) = parse_line(n + 1, &line)? else {
            continue;
        };
        trace!(?event, "replay");
        stats.events += 1;
        match event {
            ReplayEvent::Begin => engine.begin_message(observer),
            ReplayEvent::End => {
                engine.end_message(stats.now, observer);
                stats.messages += 1;
            }
            ReplayEvent::Value {
                indices,
                path,
                text,
            } => engine.on_value(path, text, &indices, observer),
            ReplayEvent::ArrayEnd { indices, path } => engine.on_array_end(path, &indices, observer),
            ReplayEvent::Tick(ms) => {
                stats.now = stats.now.wrapping_add(ms);
                if engine.tick(stats.now, link).is_some() {
                    stats.requests_sent += 1;
                }
            }
        }
    }
    Ok(stats)
}
