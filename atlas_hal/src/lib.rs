//! # Atlas HAL
//!
//! Hardware abstraction for the Atlas robot. The control layer talks to
//! hardware exclusively through the [`RobotHal`] trait: one sensor/pad read
//! and one actuator write per control tick, plus the two-line diagnostic
//! display. Backends are pluggable; [`sim::SimRig`] is the software backend
//! used by tests and the demo loop.
//!
//! # Lifecycle
//!
//! A backend is constructed once at startup, owned by the cycle runner for
//! the process lifetime, and dropped at shutdown. There is no per-device
//! handle management above the backend.

pub mod sim;

use atlas_common::command::ActuatorCommands;
use atlas_common::input::GamepadSnapshot;
use thiserror::Error;

/// Error types for HAL operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// A motor command reached the HAL outside [-1, 1].
    ///
    /// The control layer clamps before writing, so seeing this indicates a
    /// control bug, not an operator mistake.
    #[error("command out of range: {device} = {value}")]
    CommandOutOfRange {
        /// Which actuator received the command.
        device: &'static str,
        /// The offending value.
        value: f64,
    },

    /// A device write failed.
    #[error("device write failed: {0}")]
    WriteFailed(String),
}

/// Raw sensor levels for one tick.
///
/// Digital inputs are reported at their electrical level; polarity
/// interpretation (e.g. the active-low top switch) belongs to the control
/// layer.
#[derive(Debug, Clone, Copy)]
pub struct SensorSnapshot {
    /// Arm encoder count. Positive counts accumulate as the arm lowers.
    pub arm_encoder: i32,
    /// Raw top-of-travel switch level. Reads `false` while pressed
    /// (normally-closed wiring).
    pub top_arm_switch: bool,
    /// Line-break sensor level. Reads `true` while the beam is clear.
    pub line_break: bool,
    /// Winch travel limit switch. Reads `true` while tripped.
    pub winch_switch: bool,
    /// Compressor pressure switch. Reads `true` at working pressure.
    pub pressure_switch: bool,
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self {
            arm_encoder: 0,
            // Electrical idle levels: switch released, beam clear.
            top_arm_switch: true,
            line_break: true,
            winch_switch: false,
            pressure_switch: false,
        }
    }
}

/// Everything the control layer reads in one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct RobotInputs {
    /// Operator gamepad state.
    pub pad: GamepadSnapshot,
    /// Sensor levels.
    pub sensors: SensorSnapshot,
}

/// Two-line diagnostic text display, updated once per tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLines {
    pub line1: String,
    pub line2: String,
}

/// Interface between the control layer and the robot hardware.
///
/// # Timing
///
/// All three operations are synchronous and must complete well inside the
/// tick budget (20 ms at the default 50 Hz). Backends must not block.
pub trait RobotHal {
    /// Poll all sensors and the gamepad. Never fails by design: a sensor
    /// that cannot be read reports its electrical idle level.
    fn read(&mut self) -> RobotInputs;

    /// Apply a full actuator command set.
    ///
    /// # Errors
    /// Returns [`HalError::CommandOutOfRange`] if any motor power is outside
    /// [-1, 1]; no partial write is performed in that case.
    fn write(&mut self, commands: &ActuatorCommands) -> Result<(), HalError>;

    /// Zero the arm encoder. Level-triggered by the control layer every tick
    /// the top switch holds.
    fn reset_arm_encoder(&mut self);

    /// Update the two-line diagnostic display.
    fn display(&mut self, lines: &DisplayLines);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_idle_levels() {
        let s = SensorSnapshot::default();
        // Released active-low switch reads high; clear beam reads high.
        assert!(s.top_arm_switch);
        assert!(s.line_break);
        assert!(!s.winch_switch);
    }

    #[test]
    fn hal_error_display() {
        let err = HalError::CommandOutOfRange {
            device: "winch",
            value: -1.3,
        };
        let msg = format!("{err}");
        assert!(msg.contains("winch"));
        assert!(msg.contains("-1.3"));
    }
}
