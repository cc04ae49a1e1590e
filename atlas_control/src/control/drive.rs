//! Slew-rate-limited arcade drive.
//!
//! Forward speed may change by at most `max_delta_speed` per tick, where
//! `max_delta_speed = 1 / (tick_rate_hz × time_to_max_speed)`. The turn rate
//! is deliberately not ramped — it passes straight through to the mixer.
//! Ramp state is an explicit value passed in and returned; nothing here
//! mutates hidden instance fields.

use atlas_common::command::{WheelSpeeds, clamp_power};

/// Previous tick's drive command, carried across ticks by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RampState {
    /// Forward speed committed last tick.
    pub speed: f64,
    /// Turn rate committed last tick. Tracked but never used to limit;
    /// kept so diagnostics can show the full previous command.
    pub turn: f64,
}

/// One tick's ramped drive command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveCommand {
    pub speed: f64,
    pub turn: f64,
}

/// Limit `target` so it differs from `previous` by at most `max_delta`.
///
/// The result always lies between `previous` and `target` — the ramp never
/// overshoots the demand.
#[inline]
pub fn slew_limit(target: f64, previous: f64, max_delta: f64) -> f64 {
    if target > previous + max_delta {
        previous + max_delta
    } else if target < previous - max_delta {
        previous - max_delta
    } else {
        target
    }
}

/// Compute this tick's drive command from raw axis demands.
///
/// `forward` and `turn` are the already sign-corrected axis readings
/// (stick-up = positive forward). Returns the command to mix plus the state
/// to carry into the next tick.
pub fn ramp(forward: f64, turn: f64, previous: RampState, max_delta: f64) -> (DriveCommand, RampState) {
    let speed = slew_limit(clamp_power(forward), previous.speed, max_delta);
    let turn = clamp_power(turn);
    let cmd = DriveCommand { speed, turn };
    (cmd, RampState { speed, turn })
}

/// Standard arcade mix: `left = speed + turn`, `right = speed − turn`,
/// each side clamped to [-1, 1] and fanned out to both wheels.
pub fn arcade_mix(speed: f64, turn: f64) -> WheelSpeeds {
    let left = clamp_power(speed + turn);
    let right = clamp_power(speed - turn);
    WheelSpeeds {
        front_left: left,
        rear_left: left,
        front_right: right,
        rear_right: right,
    }
}
