//! Actuator command set written through the HAL each tick.
//!
//! Every numeric field is a motor power in [-1, 1]; the control layer clamps
//! before the HAL boundary because physical controllers clip out-of-range
//! commands unpredictably. `Default` is the all-stop safe state: motors at
//! zero, clutch engaged, high gear, compressor off.

use serde::{Deserialize, Serialize};

/// Clamp a motor power command to the legal [-1, 1] range.
///
/// NaN is treated as zero demand.
#[inline]
pub fn clamp_power(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) }
}

/// Gear shifter double-solenoid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GearPosition {
    /// Solenoid forward — low gear.
    Low,
    /// Solenoid reverse — high gear. Default drive state.
    #[default]
    High,
}

/// Clutch single-solenoid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClutchPosition {
    /// Solenoid energized — clutch holds. Safe default.
    #[default]
    Engaged,
    /// Solenoid released — free to fire.
    Disengaged,
}

/// Individual wheel powers after arcade mixing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelSpeeds {
    pub front_left: f64,
    pub rear_left: f64,
    pub front_right: f64,
    pub rear_right: f64,
}

impl WheelSpeeds {
    /// True if every wheel command is inside [-1, 1].
    pub fn in_range(&self) -> bool {
        [
            self.front_left,
            self.rear_left,
            self.front_right,
            self.rear_right,
        ]
        .iter()
        .all(|p| (-1.0..=1.0).contains(p))
    }
}

/// Complete per-tick actuator command set.
///
/// Recomputed from scratch every tick; only the drive ramp carries state
/// between ticks, and it lives in the control layer, not here.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActuatorCommands {
    /// Four-wheel drive powers.
    pub drive: WheelSpeeds,
    /// Arm motor power.
    pub arm: f64,
    /// Roller intake motor power.
    pub roller: f64,
    /// Winch motor power.
    pub winch: f64,
    /// Gear shifter position.
    pub gear_shift: GearPosition,
    /// Clutch position.
    pub clutch: ClutchPosition,
    /// Compressor enable.
    pub compressor: bool,
}

impl ActuatorCommands {
    /// True if every motor power is inside [-1, 1].
    pub fn in_range(&self) -> bool {
        self.drive.in_range()
            && (-1.0..=1.0).contains(&self.arm)
            && (-1.0..=1.0).contains(&self.roller)
            && (-1.0..=1.0).contains(&self.winch)
    }
}
