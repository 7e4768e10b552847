//! Integration test: tool listings growing and shrinking.
//!
//! Validates: tools created on first reference → trailing tools removed at
//! array end → their heaters released → display slots reassigned once per
//! message.

use omlink_common::status::HeaterCombineType;
use omlink_core::Engine;
use omlink_core::config::SyncConfig;
use omlink_core::model::SlotSources;

use super::{engine, message, Ev, Recorder};

const NUMBERS: [&str; 6] = ["0", "1", "2", "3", "4", "5"];

/// A `tools` fetch listing `count` tools, tool `i` using heater `i + 1`.
fn listing(count: usize) -> Vec<Ev<'static>> {
    let mut events = vec![Ev::Val("key", "tools", [0, 0])];
    for i in 0..count {
        events.push(Ev::Val("tools^.number", NUMBERS[i], [i, 0]));
        events.push(Ev::Val("tools^.heaters^", NUMBERS[i + 1], [i, 0]));
        events.push(Ev::ArrayEnd("tools^.heaters^", [i, 0]));
        events.push(Ev::Val("tools^.state", "off", [i, 0]));
    }
    events.push(Ev::ArrayEnd("tools^", [0, 0]));
    events
}

#[test]
fn shrinking_listing_releases_tools_and_heaters() {
    let mut engine = engine();
    let mut obs = Recorder::default();

    message(&mut engine, &mut obs, 0, &listing(4));
    assert_eq!(engine.context().tools.len(), 4);
    assert_eq!(engine.context().tools.heaters_in_use(), 4);
    assert_eq!(obs.layout_changes, 1);
    assert_eq!(engine.heater_slots(3, SlotSources::TOOLS).as_slice(), &[2]);

    message(&mut engine, &mut obs, 1000, &listing(2));
    let tools = &engine.context().tools;
    assert_eq!(tools.len(), 2);
    assert_eq!(tools.heaters_in_use(), 2);
    assert!(tools.get(2).is_none());
    assert!(tools.get(3).is_none());
    assert_eq!(obs.layout_changes, 2);
    assert!(engine.heater_slots(3, SlotSources::TOOLS).is_empty());
    assert_eq!(engine.heater_slots(2, SlotSources::TOOLS).as_slice(), &[1]);
}

#[test]
fn identical_listing_keeps_layout() {
    let mut engine = engine();
    let mut obs = Recorder::default();

    message(&mut engine, &mut obs, 0, &listing(3));
    message(&mut engine, &mut obs, 1000, &listing(3));
    assert_eq!(engine.context().tools.len(), 3);
    assert_eq!(obs.layout_changes, 1);
    assert_eq!(obs.messages, 2);
}

#[test]
fn empty_listing_removes_everything() {
    let mut engine = engine();
    let mut obs = Recorder::default();

    message(&mut engine, &mut obs, 0, &listing(3));
    message(
        &mut engine,
        &mut obs,
        1000,
        &[Ev::Val("key", "tools", [0, 0]), Ev::ArrayEnd("tools^", [0, 0])],
    );
    assert!(engine.context().tools.is_empty());
    assert_eq!(engine.context().tools.heaters_in_use(), 0);
}

#[test]
fn tool_losing_a_heater() {
    let mut engine = engine();
    let mut obs = Recorder::default();

    message(
        &mut engine,
        &mut obs,
        0,
        &[
            Ev::Val("key", "tools", [0, 0]),
            Ev::Val("tools^.heaters^", "1", [0, 0]),
            Ev::Val("tools^.heaters^", "2", [0, 1]),
            Ev::ArrayEnd("tools^.heaters^", [0, 0]),
            Ev::ArrayEnd("tools^", [0, 0]),
        ],
    );
    assert_eq!(engine.context().tools.get(0).map(|t| t.heater_count()), Some(2));

    message(
        &mut engine,
        &mut obs,
        1000,
        &[
            Ev::Val("key", "tools", [0, 0]),
            Ev::Val("tools^.heaters^", "1", [0, 0]),
            Ev::ArrayEnd("tools^.heaters^", [0, 0]),
            Ev::ArrayEnd("tools^", [0, 0]),
        ],
    );
    assert_eq!(engine.context().tools.get(0).map(|t| t.heater_count()), Some(1));
    assert_eq!(engine.context().tools.heaters_in_use(), 1);
    assert!(engine.heater_slots(2, SlotSources::TOOLS).is_empty());
    assert_eq!(obs.layout_changes, 2);
}

/// Bed on heater 0, tool 0 with heaters 1 and 2, tool 1 with heater 3.
fn mixed_layout(engine: &mut Engine) {
    let mut obs = Recorder::default();
    message(
        engine,
        &mut obs,
        0,
        &[
            Ev::Val("key", "heat", [0, 0]),
            Ev::Val("heat.bedHeaters^", "0", [0, 0]),
            Ev::ArrayEnd("heat.bedHeaters^", [0, 0]),
        ],
    );
    message(
        engine,
        &mut obs,
        1000,
        &[
            Ev::Val("key", "tools", [0, 0]),
            Ev::Val("tools^.heaters^", "1", [0, 0]),
            Ev::Val("tools^.heaters^", "2", [0, 1]),
            Ev::ArrayEnd("tools^.heaters^", [0, 0]),
            Ev::Val("tools^.heaters^", "3", [1, 0]),
            Ev::ArrayEnd("tools^.heaters^", [1, 0]),
            Ev::ArrayEnd("tools^", [0, 0]),
        ],
    );
}

#[test]
fn slots_per_heater_when_not_combined() {
    let mut engine = engine();
    mixed_layout(&mut engine);

    let all = SlotSources::all();
    assert_eq!(engine.heater_slots(0, all).as_slice(), &[0]);
    assert_eq!(engine.heater_slots(1, all).as_slice(), &[1]);
    assert_eq!(engine.heater_slots(2, all).as_slice(), &[2]);
    assert_eq!(engine.heater_slots(3, all).as_slice(), &[3]);
    assert!(engine.heater_slots(0, SlotSources::TOOLS).is_empty());
}

#[test]
fn one_slot_per_tool_when_combined() {
    let mut config = SyncConfig::default();
    config.display.heater_combine = HeaterCombineType::Combined;
    let mut engine = Engine::new(&config);
    mixed_layout(&mut engine);

    let all = SlotSources::all();
    assert_eq!(engine.heater_slots(1, all).as_slice(), &[1]);
    assert!(engine.heater_slots(2, all).is_empty());
    assert_eq!(engine.heater_slots(3, all).as_slice(), &[2]);
}
