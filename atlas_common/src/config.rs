//! Robot configuration loading and validation.
//!
//! A single TOML file describes the control-law tuning, the channel wiring
//! and the gamepad button layout. Every field has a default reproducing the
//! competition robot, so an empty file is a valid configuration.
//!
//! ```toml
//! tick_rate_hz = 50.0
//! time_to_max_speed_s = 1.0
//!
//! [arm]
//! bottom_threshold = 64
//!
//! [auton]
//! routine = "drive_forward"
//!
//! [buttons]
//! intake = 1
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::consts;
use crate::input::{Buttons, GamepadSnapshot};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parsing failed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// Semantic validation failed.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

// ─── Sub-sections ───────────────────────────────────────────────────

/// Arm position-control tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArmConfig {
    /// Encoder counts below this are "near top".
    pub near_top_count: i32,
    /// Encoder counts above this are "near bottom".
    pub near_bottom_count: i32,
    /// Encoder count at/above which the arm is at bottom (lowering blocked).
    pub bottom_threshold: i32,
    /// Lowering power per band: [near bottom, middle, near top].
    pub lower_power: [f64; 3],
    /// Raising power per band: [near bottom, middle, near top].
    pub raise_power: [f64; 3],
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            near_top_count: consts::ARM_NEAR_TOP_COUNT,
            near_bottom_count: consts::ARM_NEAR_BOTTOM_COUNT,
            bottom_threshold: consts::ARM_BOTTOM_THRESHOLD,
            lower_power: [0.1, 0.2, 0.4],
            raise_power: [-0.8, -0.6, -0.5],
        }
    }
}

/// Autonomous routine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutonRoutine {
    /// Drive forward for a fixed window, then stop.
    #[default]
    DriveForward,
    /// Run the roller for the whole autonomous period.
    RollerFeed,
}

/// Autonomous sequence tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutonConfig {
    /// Which routine to run.
    pub routine: AutonRoutine,
    /// Drive-forward window [s].
    pub drive_seconds: f64,
    /// Drive-forward speed.
    pub drive_speed: f64,
    /// Roller-feed power.
    pub roller_power: f64,
}

impl Default for AutonConfig {
    fn default() -> Self {
        Self {
            routine: AutonRoutine::DriveForward,
            drive_seconds: consts::AUTON_DRIVE_SECONDS,
            drive_speed: consts::AUTON_DRIVE_SPEED,
            roller_power: consts::AUTON_ROLLER_POWER,
        }
    }
}

/// Physical channel wiring (PWM / DIO / solenoid numbers).
///
/// Construction-time device addressing only — no control logic reads these
/// beyond handing them to the HAL backend at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    pub roller_motor_pwm: u8,
    pub arm_pwm: u8,
    pub front_left_pwm: u8,
    pub rear_left_pwm: u8,
    pub front_right_pwm: u8,
    pub rear_right_pwm: u8,
    pub winch_pwm: u8,
    pub encoder_a_dio: u8,
    pub encoder_b_dio: u8,
    pub winch_switch_dio: u8,
    pub top_arm_switch_dio: u8,
    pub line_break_dio: u8,
    pub gear_shift_forward: u8,
    pub gear_shift_reverse: u8,
    pub clutch_solenoid: u8,
    pub pressure_switch_channel: u8,
    pub compressor_relay_channel: u8,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            roller_motor_pwm: consts::ROLLER_MOTOR_PWM,
            arm_pwm: consts::ARM_PWM,
            front_left_pwm: consts::FRONT_LEFT_PWM,
            rear_left_pwm: consts::REAR_LEFT_PWM,
            front_right_pwm: consts::FRONT_RIGHT_PWM,
            rear_right_pwm: consts::REAR_RIGHT_PWM,
            winch_pwm: consts::WINCH_PWM,
            encoder_a_dio: consts::ENCODER_A_DIO,
            encoder_b_dio: consts::ENCODER_B_DIO,
            winch_switch_dio: consts::WINCH_SWITCH_DIO,
            top_arm_switch_dio: consts::TOP_ARM_SWITCH_DIO,
            line_break_dio: consts::LINE_BREAK_DIO,
            gear_shift_forward: consts::GEAR_SHIFT_FORWARD,
            gear_shift_reverse: consts::GEAR_SHIFT_REVERSE,
            clutch_solenoid: consts::CLUTCH_SOLENOID,
            pressure_switch_channel: consts::PRESSURE_SWITCH_CHANNEL,
            compressor_relay_channel: consts::COMPRESSOR_RELAY_CHANNEL,
        }
    }
}

/// Gamepad button layout: numbered button (1-based) per named action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ButtonConfig {
    pub intake: u8,
    pub eject: u8,
    pub clutch_release: u8,
    pub shift_low: u8,
    pub arm_raise: u8,
    pub arm_lower: u8,
    pub winch_fire: u8,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            intake: 1,
            eject: 2,
            clutch_release: 4,
            shift_low: 5,
            arm_raise: 6,
            arm_lower: 8,
            winch_fire: 9,
        }
    }
}

impl ButtonConfig {
    /// Decode a raw pad snapshot into named action flags.
    pub fn decode(&self, pad: &GamepadSnapshot) -> Buttons {
        let mut set = Buttons::empty();
        set.set(Buttons::INTAKE, pad.numbered(self.intake));
        set.set(Buttons::EJECT, pad.numbered(self.eject));
        set.set(Buttons::CLUTCH_RELEASE, pad.numbered(self.clutch_release));
        set.set(Buttons::SHIFT_LOW, pad.numbered(self.shift_low));
        set.set(Buttons::ARM_RAISE, pad.numbered(self.arm_raise));
        set.set(Buttons::ARM_LOWER, pad.numbered(self.arm_lower));
        set.set(Buttons::WINCH_FIRE, pad.numbered(self.winch_fire));
        set
    }

    fn assignments(&self) -> [(&'static str, u8); 7] {
        [
            ("intake", self.intake),
            ("eject", self.eject),
            ("clutch_release", self.clutch_release),
            ("shift_low", self.shift_low),
            ("arm_raise", self.arm_raise),
            ("arm_lower", self.arm_lower),
            ("winch_fire", self.winch_fire),
        ]
    }
}

// ─── Top-level config ───────────────────────────────────────────────

/// Complete robot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotConfig {
    /// Control tick rate [Hz].
    pub tick_rate_hz: f64,
    /// Time for the drive ramp to sweep 0 → full speed [s].
    pub time_to_max_speed_s: f64,
    /// Arm position-control tuning.
    pub arm: ArmConfig,
    /// Autonomous sequence tuning.
    pub auton: AutonConfig,
    /// Physical channel wiring.
    pub channels: ChannelConfig,
    /// Gamepad button layout.
    pub buttons: ButtonConfig,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: consts::TICK_RATE_HZ,
            time_to_max_speed_s: consts::TIME_TO_MAX_SPEED_S,
            arm: ArmConfig::default(),
            auton: AutonConfig::default(),
            channels: ChannelConfig::default(),
            buttons: ButtonConfig::default(),
        }
    }
}

impl RobotConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Per-tick drive ramp limit: `1 / (tick_rate_hz * time_to_max_speed_s)`.
    #[inline]
    pub fn max_delta_speed(&self) -> f64 {
        1.0 / (self.tick_rate_hz * self.time_to_max_speed_s)
    }

    /// Semantic validation beyond what serde can express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "tick_rate_hz must be positive, got {}",
                self.tick_rate_hz
            )));
        }
        if self.time_to_max_speed_s <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "time_to_max_speed_s must be positive, got {}",
                self.time_to_max_speed_s
            )));
        }

        let arm = &self.arm;
        if arm.near_top_count >= arm.near_bottom_count {
            return Err(ConfigError::Validation(format!(
                "arm zone bounds out of order: near_top_count {} >= near_bottom_count {}",
                arm.near_top_count, arm.near_bottom_count
            )));
        }
        if arm.bottom_threshold <= arm.near_bottom_count {
            return Err(ConfigError::Validation(format!(
                "arm bottom_threshold {} must exceed near_bottom_count {}",
                arm.bottom_threshold, arm.near_bottom_count
            )));
        }
        for p in arm.lower_power.iter().chain(arm.raise_power.iter()) {
            if !(-1.0..=1.0).contains(p) {
                return Err(ConfigError::Validation(format!(
                    "arm power {p} outside [-1, 1]"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.auton.drive_speed.abs())
            || self.auton.drive_speed.is_nan()
        {
            return Err(ConfigError::Validation(format!(
                "auton drive_speed {} outside [-1, 1]",
                self.auton.drive_speed
            )));
        }
        if self.auton.drive_seconds < 0.0 {
            return Err(ConfigError::Validation(format!(
                "auton drive_seconds must be non-negative, got {}",
                self.auton.drive_seconds
            )));
        }

        // Distinct devices must not share a channel within a bank.
        let ch = &self.channels;
        check_unique(
            "PWM",
            &[
                ch.roller_motor_pwm,
                ch.arm_pwm,
                ch.front_left_pwm,
                ch.rear_left_pwm,
                ch.front_right_pwm,
                ch.rear_right_pwm,
                ch.winch_pwm,
            ],
        )?;
        check_unique(
            "DIO",
            &[
                ch.encoder_a_dio,
                ch.encoder_b_dio,
                ch.winch_switch_dio,
                ch.top_arm_switch_dio,
                ch.line_break_dio,
            ],
        )?;

        let mut seen = HashSet::new();
        for (name, n) in self.buttons.assignments() {
            if n < 1 || n > 16 {
                return Err(ConfigError::Validation(format!(
                    "button {name} = {n} outside 1..=16"
                )));
            }
            if !seen.insert(n) {
                return Err(ConfigError::Validation(format!(
                    "button {n} assigned to more than one action ({name})"
                )));
            }
        }

        Ok(())
    }
}

fn check_unique(bank: &str, channels: &[u8]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for &c in channels {
        if !seen.insert(c) {
            return Err(ConfigError::Validation(format!(
                "{bank} channel {c} assigned twice"
            )));
        }
    }
    Ok(())
}
