//! Integration test: replaying a recorded event script.
//!
//! Validates: script lines drive the engine end to end → requests reach
//! the link in order → errors carry the offending line number.

use omlink_core::replay::{self, ReplayError};

use super::{engine, MockLink, Recorder};

const SCRIPT: &str = r#"
# live poll answered with a changed heat sequence
tick 0
begin
value 0 0 state.status idle
value 0 0 state.upTime 42
value 0 0 seqs.heat 3
value 0 0 network.name Bench Printer
end

tick 1000
begin
value 0 0 key heat
value 0 0 heat.bedHeaters^ 0
array_end 0 0 heat.bedHeaters^
value 0 0 heat.heaters^.current 59.5
value 0 0 heat.heaters^.state active
end

tick 1000
"#;

#[test]
fn script_drives_engine() {
    let mut engine = engine();
    let mut link = MockLink::default();
    let mut obs = Recorder::default();

    let stats = replay::run(SCRIPT.as_bytes(), &mut engine, &mut link, &mut obs).unwrap();
    assert_eq!(stats.messages, 2);
    assert_eq!(stats.requests_sent, 3);
    assert_eq!(stats.now, 2000);
    assert_eq!(
        link.sent,
        [
            "M409 F\"d99f\"\n",
            "M409 K\"heat\" F\"v\"\n",
            "M409 F\"d99f\"\n",
        ]
    );

    let ctx = engine.context();
    assert_eq!(ctx.state.machine_name.as_str(), "Bench Printer");
    assert_eq!(ctx.beds.get(0).and_then(|b| b.heater), Some(0));
    assert_eq!(obs.layout_changes, 1);
}

#[test]
fn bad_line_reports_position() {
    let mut engine = engine();
    let mut link = MockLink::default();
    let mut obs = Recorder::default();

    let script = "begin\nvalue 0 0 state.status idle\nvalue zero 0 seqs.heat 1\nend\n";
    let err = replay::run(script.as_bytes(), &mut engine, &mut link, &mut obs).unwrap_err();
    assert!(matches!(err, ReplayError::InvalidNumber { line: 3, .. }));
}
