//! Collaborator interfaces.
//!
//! [`PrinterLink`] is the outbound side (transport and readiness), and
//! [`ModelObserver`] receives one callback per observable attribute while a
//! response is dispatched. Observer callbacks default to no-ops so a
//! consumer only implements what it displays.

use crate::alert::Alert;
use omlink_common::features::FirmwareFeatures;
use omlink_common::status::{HeaterStatus, PrinterStatus, ToolStatus};

/// Outbound transport to the remote machine.
pub trait PrinterLink {
    /// Queue one complete command line (including the trailing newline).
    fn send(&mut self, line: &str);

    /// Whether category fetches may be sent while the remote is in `status`.
    fn ok_to_send(&self, status: PrinterStatus) -> bool {
        status.accepts_commands()
    }

    /// Selects the file-manager verbs and argument quoting.
    fn firmware_features(&self) -> FirmwareFeatures {
        FirmwareFeatures::empty()
    }
}

/// Remaining-time estimate reported for a running job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeftSource {
    File,
    Filament,
    Slicer,
}

/// Receiver of model updates.
#[allow(unused_variables)]
pub trait ModelObserver {
    fn on_status(&mut self, status: PrinterStatus) {}

    fn on_axis_user_position(&mut self, axis: usize, letter: char, position: f32) {}

    fn on_axis_machine_position(&mut self, axis: usize, letter: char, position: f32) {}

    fn on_axis_homed(&mut self, axis: usize, homed: bool) {}

    fn on_heater_current(&mut self, heater: u8, temp: f32) {}

    fn on_heater_active(&mut self, heater: u8, temp: f32) {}

    fn on_heater_standby(&mut self, heater: u8, temp: f32) {}

    fn on_heater_status(&mut self, heater: u8, status: HeaterStatus) {}

    /// A tool set-point changed (`tools^.active^` / `tools^.standby^`).
    fn on_tool_temperature(&mut self, tool: usize, heater: u8, active: bool, temp: f32) {}

    fn on_tool_status(&mut self, tool: usize, status: ToolStatus) {}

    fn on_current_tool(&mut self, tool: Option<usize>) {}

    fn on_spindle_rpm(&mut self, spindle: usize, active: i32, current: i32) {}

    fn on_fan_percent(&mut self, percent: u8) {}

    fn on_speed_factor(&mut self, percent: i32) {}

    fn on_extrusion_factor(&mut self, extruder: usize, percent: i32) {}

    fn on_machine_name(&mut self, name: &str) {}

    fn on_firmware(&mut self, name: &str, version: &str) {}

    fn on_job_file(&mut self, name: &str) {}

    fn on_job_progress(&mut self, percent: f32) {}

    fn on_time_left(&mut self, source: TimeLeftSource, seconds: Option<u32>) {}

    fn on_display_message(&mut self, message: &str) {}

    fn on_volumes(&mut self, total: usize, mounted: usize) {}

    fn on_alert(&mut self, alert: &Alert) {}

    fn on_alert_cleared(&mut self) {}

    /// Reply text of a command, surfaced once per message sequence.
    fn on_response(&mut self, text: &str) {}

    /// Remote restart detected; everything cached was dropped.
    fn on_restart(&mut self) {}

    /// Display slots were reassigned.
    fn on_layout_changed(&mut self) {}

    fn on_message_begin(&mut self) {}

    fn on_message_end(&mut self) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ModelObserver for NullObserver {}
