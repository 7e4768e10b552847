//! Integration test: remote restart detection.
//!
//! Validates: uptime going backwards → sequence numbers forgotten → bed
//! heater associations cleared → alert history dropped so a repeated
//! message box sequence is shown again.

use omlink_core::field::Category;
use omlink_core::sequence::SEQ_INVALID;

use super::{engine, message, Ev, Recorder};

const MESSAGE_BOX: [Ev<'static>; 6] = [
    Ev::Val("state.messageBox.mode", "2", [0, 0]),
    Ev::Val("state.messageBox.seq", "4", [0, 0]),
    Ev::Val("state.messageBox.timeout", "0", [0, 0]),
    Ev::Val("state.messageBox.title", "Load filament", [0, 0]),
    Ev::Val("state.messageBox.message", "Insert filament and press OK", [0, 0]),
    Ev::Val("state.messageBox.axisControls", "0", [0, 0]),
];

#[test]
fn uptime_going_backwards_resets_model() {
    let mut engine = engine();
    let mut obs = Recorder::default();

    let mut first = vec![
        Ev::Val("state.upTime", "1000", [0, 0]),
        Ev::Val("seqs.heat", "3", [0, 0]),
        Ev::Val("key", "heat", [0, 0]),
        Ev::Val("heat.bedHeaters^", "0", [0, 0]),
        Ev::ArrayEnd("heat.bedHeaters^", [0, 0]),
    ];
    first.extend_from_slice(&MESSAGE_BOX);
    message(&mut engine, &mut obs, 0, &first);

    assert_eq!(obs.alerts, [4]);
    assert_eq!(engine.context().tracker.seq(Category::Heat), 3);
    assert_eq!(engine.context().beds.get(0).and_then(|b| b.heater), Some(0));

    // Still counting up: nothing happens.
    message(&mut engine, &mut obs, 1000, &[Ev::Val("state.upTime", "1001", [0, 0])]);
    assert_eq!(obs.restarts, 0);

    message(&mut engine, &mut obs, 2000, &[Ev::Val("state.upTime", "10", [0, 0])]);
    assert_eq!(obs.restarts, 1);
    let ctx = engine.context();
    assert_eq!(ctx.tracker.uptime(), Some(10));
    assert_eq!(ctx.tracker.seq(Category::Heat), SEQ_INVALID);
    assert!(!ctx.tracker.any_dirty());
    assert_eq!(ctx.beds.get(0).and_then(|b| b.heater), None);
    assert!(engine.dispatcher().alerts().shown().is_none());

    // Same message box sequence after the restart is a new alert.
    message(&mut engine, &mut obs, 3000, &MESSAGE_BOX);
    assert_eq!(obs.alerts, [4, 4]);
}

#[test]
fn restart_marks_reported_categories_dirty_again() {
    let mut engine = engine();
    let mut obs = Recorder::default();

    message(
        &mut engine,
        &mut obs,
        0,
        &[
            Ev::Val("state.upTime", "500", [0, 0]),
            Ev::Val("seqs.tools", "7", [0, 0]),
        ],
    );
    message(&mut engine, &mut obs, 1000, &[Ev::Val("key", "tools", [0, 0])]);
    assert!(!engine.category_dirty(Category::Tools));

    // The same sequence number is news once the remote restarted.
    message(
        &mut engine,
        &mut obs,
        2000,
        &[
            Ev::Val("state.upTime", "2", [0, 0]),
            Ev::Val("seqs.tools", "7", [0, 0]),
        ],
    );
    assert!(engine.category_dirty(Category::Tools));
    assert_eq!(obs.restarts, 1);
}
