//! # Atlas Control
//!
//! Per-tick control logic for the Atlas competition robot. Each fixed-rate
//! tick reads one sensor/pad snapshot through the HAL, runs the active
//! mode's logic (drive ramp → arm position → auxiliary actuators), and
//! writes one actuator command set back — no queues, no cross-tick state
//! beyond the drive ramp.
//!
//! ## Layout
//!
//! - [`control`] — the three control-law modules (drive, arm, auxiliary)
//! - [`teleop`] — teleop tick: composes the control laws into one command set
//! - [`auton`] — timer-gated autonomous routines
//! - [`cycle`] — fixed-rate cycle runner, mode dispatch, cycle statistics

pub mod auton;
pub mod control;
pub mod cycle;
pub mod teleop;
