//! System-wide constants for the Atlas workspace.
//!
//! Single source of truth for the default channel map and the control-law
//! numbers. The channel numbers reproduce the competition wiring harness;
//! changing one here without re-pinning the robot will move a motor.

// ─── Control loop ───────────────────────────────────────────────────

/// Default control tick rate [Hz].
pub const TICK_RATE_HZ: f64 = 50.0;

/// Default time for the drive ramp to sweep 0 → full speed [s].
pub const TIME_TO_MAX_SPEED_S: f64 = 1.0;

/// Autonomous drive-forward window [s].
pub const AUTON_DRIVE_SECONDS: f64 = 5.0;

/// Autonomous drive-forward speed.
pub const AUTON_DRIVE_SPEED: f64 = 0.5;

/// Autonomous roller-feed power (alternate routine).
pub const AUTON_ROLLER_POWER: f64 = 0.5;

// ─── Arm position bands ─────────────────────────────────────────────

/// Encoder counts below this are "near top".
pub const ARM_NEAR_TOP_COUNT: i32 = 20;

/// Encoder counts above this are "near bottom".
pub const ARM_NEAR_BOTTOM_COUNT: i32 = 40;

/// Encoder count at/above which the arm is considered at bottom.
pub const ARM_BOTTOM_THRESHOLD: i32 = 64;

// ─── PWM channels ───────────────────────────────────────────────────

/// Roller intake motor PWM channel.
pub const ROLLER_MOTOR_PWM: u8 = 1;
/// Arm motor PWM channel.
pub const ARM_PWM: u8 = 2;
/// Front-left drive motor PWM channel.
pub const FRONT_LEFT_PWM: u8 = 3;
/// Rear-left drive motor PWM channel.
pub const REAR_LEFT_PWM: u8 = 4;
/// Front-right drive motor PWM channel.
pub const FRONT_RIGHT_PWM: u8 = 7;
/// Rear-right drive motor PWM channel.
pub const REAR_RIGHT_PWM: u8 = 8;
/// Winch motor PWM channel.
pub const WINCH_PWM: u8 = 9;

// ─── Digital I/O channels ───────────────────────────────────────────

/// Arm encoder quadrature channel A.
pub const ENCODER_A_DIO: u8 = 1;
/// Arm encoder quadrature channel B.
pub const ENCODER_B_DIO: u8 = 2;
/// Winch travel limit switch.
pub const WINCH_SWITCH_DIO: u8 = 4;
/// Arm top-of-travel limit switch (active-low).
pub const TOP_ARM_SWITCH_DIO: u8 = 7;
/// Intake line-break sensor (reads true while the beam is clear).
pub const LINE_BREAK_DIO: u8 = 9;

// ─── Pneumatics ─────────────────────────────────────────────────────

/// Gear shift double-solenoid forward channel (low gear).
pub const GEAR_SHIFT_FORWARD: u8 = 8;
/// Gear shift double-solenoid reverse channel (high gear).
pub const GEAR_SHIFT_REVERSE: u8 = 1;
/// Clutch single-solenoid channel.
pub const CLUTCH_SOLENOID: u8 = 2;
/// Compressor pressure switch channel.
pub const PRESSURE_SWITCH_CHANNEL: u8 = 6;
/// Compressor relay channel.
pub const COMPRESSOR_RELAY_CHANNEL: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_bands_are_ordered() {
        assert!(ARM_NEAR_TOP_COUNT < ARM_NEAR_BOTTOM_COUNT);
        assert!(ARM_NEAR_BOTTOM_COUNT < ARM_BOTTOM_THRESHOLD);
    }

    #[test]
    fn ramp_constants_are_positive() {
        assert!(TICK_RATE_HZ > 0.0);
        assert!(TIME_TO_MAX_SPEED_S > 0.0);
        assert!(AUTON_DRIVE_SECONDS > 0.0);
    }

    #[test]
    fn default_max_delta_speed_is_two_percent() {
        let d = 1.0 / (TICK_RATE_HZ * TIME_TO_MAX_SPEED_S);
        assert!((d - 0.02).abs() < 1e-12);
    }
}
