//! Integration test: sequence-driven polling.
//!
//! Validates: a category is fetched once per sequence change → unchanged
//! sequence numbers cost nothing → fetches wait for the link to accept
//! commands and the remote reports a status that accepts them → a silent
//! remote is re-polled after the timeout, even while a fetch is retried.

use omlink_common::features::FirmwareFeatures;
use omlink_core::Engine;
use omlink_core::config::SyncConfig;
use omlink_core::field::Category;
use omlink_core::scheduler::{ChannelId, FileRequest};

use super::{engine, message, Ev, MockLink, Recorder};

const LIVE: &str = "M409 F\"d99f\"\n";
const HEAT: &str = "M409 K\"heat\" F\"v\"\n";
const TOOLS: &str = "M409 K\"tools\" F\"v\"\n";

fn live_report(seq: &str) -> [Ev<'_>; 2] {
    [
        Ev::Val("state.status", "idle", [0, 0]),
        Ev::Val("seqs.heat", seq, [0, 0]),
    ]
}

#[test]
fn one_fetch_per_sequence_change() {
    let mut engine = engine();
    let mut obs = Recorder::default();
    let mut link = MockLink::default();

    // Establish heat seq 5 and fetch it.
    assert_eq!(engine.tick(0, &mut link), Some(ChannelId::Live));
    message(&mut engine, &mut obs, 100, &live_report("5"));
    assert!(engine.category_dirty(Category::Heat));
    assert_eq!(
        engine.tick(1000, &mut link),
        Some(ChannelId::Category(Category::Heat))
    );
    message(&mut engine, &mut obs, 1100, &[Ev::Val("key", "heat", [0, 0])]);
    assert!(!engine.category_dirty(Category::Heat));
    link.sent.clear();

    // Live polls reporting 5, 5, 6: only the change marks heat dirty.
    let mut now = 2000;
    for seq in ["5", "5", "6"] {
        assert_eq!(engine.tick(now, &mut link), Some(ChannelId::Live));
        message(&mut engine, &mut obs, now + 100, &live_report(seq));
        assert_eq!(engine.category_dirty(Category::Heat), seq == "6", "after seq {seq}");
        now += 1000;
    }
    assert!(!link.sent.iter().any(|l| l == HEAT));

    assert_eq!(
        engine.tick(now, &mut link),
        Some(ChannelId::Category(Category::Heat))
    );
    message(&mut engine, &mut obs, now + 100, &[Ev::Val("key", "heat", [0, 0])]);

    assert_eq!(link.sent.iter().filter(|l| *l == HEAT).count(), 1);
    assert_eq!(link.sent.iter().filter(|l| *l == LIVE).count(), 3);
    assert!(!engine.category_dirty(Category::Heat));

    // Quiet afterwards: the next live poll repeats 6 and nothing is fetched.
    now += 1000;
    assert_eq!(engine.tick(now, &mut link), Some(ChannelId::Live));
    message(&mut engine, &mut obs, now + 100, &live_report("6"));
    assert!(!engine.category_dirty(Category::Heat));
}

#[test]
fn fetch_waits_for_link() {
    let mut engine = engine();
    let mut obs = Recorder::default();
    let mut link = MockLink {
        refuse: true,
        ..Default::default()
    };

    assert_eq!(engine.tick(0, &mut link), Some(ChannelId::Live));
    message(
        &mut engine,
        &mut obs,
        100,
        &[
            Ev::Val("state.status", "idle", [0, 0]),
            Ev::Val("seqs.tools", "1", [0, 0]),
        ],
    );

    assert_eq!(engine.tick(1000, &mut link), Some(ChannelId::Live));
    message(&mut engine, &mut obs, 1100, &[]);
    assert!(engine.category_dirty(Category::Tools));

    link.refuse = false;
    assert_eq!(
        engine.tick(2000, &mut link),
        Some(ChannelId::Category(Category::Tools))
    );
    assert_eq!(link.sent.last().map(String::as_str), Some(TOOLS));
}

#[test]
fn busy_remote_only_gets_live_polls() {
    let mut engine = engine();
    let mut obs = Recorder::default();
    let mut link = MockLink::default();

    engine.tick(0, &mut link);
    message(
        &mut engine,
        &mut obs,
        100,
        &[
            Ev::Val("state.status", "busy", [0, 0]),
            Ev::Val("seqs.heat", "1", [0, 0]),
        ],
    );
    assert_eq!(engine.tick(1000, &mut link), Some(ChannelId::Live));
    message(&mut engine, &mut obs, 1100, &[Ev::Val("state.status", "idle", [0, 0])]);
    assert_eq!(
        engine.tick(2000, &mut link),
        Some(ChannelId::Category(Category::Heat))
    );
}

#[test]
fn higher_priority_category_first() {
    let mut engine = engine();
    let mut obs = Recorder::default();
    let mut link = MockLink::default();

    engine.tick(0, &mut link);
    message(
        &mut engine,
        &mut obs,
        100,
        &[
            Ev::Val("state.status", "idle", [0, 0]),
            Ev::Val("seqs.job", "1", [0, 0]),
            Ev::Val("seqs.heat", "1", [0, 0]),
        ],
    );
    assert_eq!(
        engine.tick(1000, &mut link),
        Some(ChannelId::Category(Category::Heat))
    );
    message(&mut engine, &mut obs, 1100, &[Ev::Val("key", "heat", [0, 0])]);
    assert_eq!(
        engine.tick(2000, &mut link),
        Some(ChannelId::Category(Category::Job))
    );
}

#[test]
fn silent_remote_is_polled_again_after_timeout() {
    let mut engine = engine();
    let mut link = MockLink::default();

    assert_eq!(engine.tick(0, &mut link), Some(ChannelId::Live));
    for now in (500..8000).step_by(500) {
        assert_eq!(engine.tick(now, &mut link), None, "at {now}");
    }
    assert_eq!(engine.tick(8000, &mut link), Some(ChannelId::Live));
    assert_eq!(link.sent, [LIVE, LIVE]);
}

#[test]
fn unanswered_fetch_falls_back_to_live_poll() {
    let mut config = SyncConfig::default();
    config.poll.category_retry_ms = 3000;
    config.validate().unwrap();
    let mut engine = Engine::new(&config);
    let mut obs = Recorder::default();
    let mut link = MockLink::default();

    engine.tick(0, &mut link);
    message(
        &mut engine,
        &mut obs,
        100,
        &[
            Ev::Val("state.status", "idle", [0, 0]),
            Ev::Val("seqs.move", "1", [0, 0]),
        ],
    );

    // The move fetch goes out at 1000, then the remote falls silent.
    let mut sent = Vec::new();
    for now in (1000..60_000).step_by(100) {
        if let Some(id) = engine.tick(now, &mut link) {
            sent.push((now, id));
        }
    }
    let fetches = sent
        .iter()
        .take_while(|(_, id)| *id == ChannelId::Category(Category::Move))
        .count();
    assert_eq!(fetches, 3, "{sent:?}");
    assert_eq!(sent[fetches], (9000, ChannelId::Live));
}

#[test]
fn quiet_period_after_response() {
    let mut engine = engine();
    let mut obs = Recorder::default();
    let mut link = MockLink::default();

    engine.tick(0, &mut link);
    message(&mut engine, &mut obs, 900, &[]);
    // Interval elapsed but the response is only 300 ms old.
    assert_eq!(engine.tick(1200, &mut link), None);
    assert_eq!(engine.tick(1600, &mut link), Some(ChannelId::Live));
}

#[test]
fn file_listing_worded_for_firmware() {
    let mut engine = engine();
    let mut obs = Recorder::default();
    let mut link = MockLink {
        features: FirmwareFeatures::NO_M20_M36 | FirmwareFeatures::QUOTE_FILENAMES,
        ..Default::default()
    };

    engine.tick(0, &mut link);
    message(&mut engine, &mut obs, 100, &[Ev::Val("state.status", "idle", [0, 0])]);

    assert!(engine.request_file(FileRequest::List, "0:/macros", &link));
    assert_eq!(engine.tick(1000, &mut link), Some(ChannelId::File));
    assert_eq!(link.sent.last().map(String::as_str), Some("M408 S20 P\"0:/macros\"\n"));

    // Answered like any other request.
    message(&mut engine, &mut obs, 1100, &[]);
    assert!(engine.scheduler().is_idle());
    assert_eq!(engine.tick(2000, &mut link), Some(ChannelId::Live));
}
