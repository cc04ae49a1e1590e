//! Arm position controller.
//!
//! A three-band speed profile keyed off the signed encoder count, gated by
//! two travel limits. Counts grow as the arm lowers; the top switch re-zeroes
//! the count every tick it holds (continuous re-zeroing, not edge-triggered).
//!
//! Polarity convention: the top switch is wired normally-closed, so the raw
//! digital input reads `false` while pressed. `at_top` inverts the raw level.
//! The banded powers are reproduced exactly from the tuned robot; do not
//! "fix" the asymmetry between the lowering and raising profiles.

use atlas_common::config::ArmConfig;

/// Position band derived from the encoder count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmZone {
    /// count < near_top_count
    NearTop,
    /// near_top_count ≤ count ≤ near_bottom_count
    Middle,
    /// count > near_bottom_count
    NearBottom,
}

/// Classify an encoder count into its band.
pub fn zone(cfg: &ArmConfig, count: i32) -> ArmZone {
    if count > cfg.near_bottom_count {
        ArmZone::NearBottom
    } else if count >= cfg.near_top_count {
        ArmZone::Middle
    } else {
        ArmZone::NearTop
    }
}

/// Interpret the raw top-switch level (active-low).
#[inline]
pub fn at_top(raw_switch: bool) -> bool {
    !raw_switch
}

/// True once the count reaches the bottom threshold.
#[inline]
pub fn at_bottom(cfg: &ArmConfig, count: i32) -> bool {
    count >= cfg.bottom_threshold
}

/// One tick's arm decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmTick {
    /// Arm motor power in [-1, 1]. Positive lowers.
    pub power: f64,
    /// True when the encoder must be zeroed this tick.
    pub reset_encoder: bool,
}

/// Compute the arm motor power for this tick.
///
/// Lowering wins when both directions are held (checked first). Either
/// direction is silently blocked at its travel limit; with no input or a
/// blocked input the motor idles at 0.
pub fn tick(
    cfg: &ArmConfig,
    count: i32,
    raw_top_switch: bool,
    lower_held: bool,
    raise_held: bool,
) -> ArmTick {
    let top = at_top(raw_top_switch);

    let power = if lower_held && !at_bottom(cfg, count) {
        match zone(cfg, count) {
            ArmZone::NearBottom => cfg.lower_power[0],
            ArmZone::Middle => cfg.lower_power[1],
            ArmZone::NearTop => cfg.lower_power[2],
        }
    } else if raise_held && !top {
        match zone(cfg, count) {
            ArmZone::NearBottom => cfg.raise_power[0],
            ArmZone::Middle => cfg.raise_power[1],
            ArmZone::NearTop => cfg.raise_power[2],
        }
    } else {
        0.0
    };

    ArmTick {
        power,
        reset_encoder: top,
    }
}
