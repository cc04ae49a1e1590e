//! Auxiliary actuators: roller, gear shift, winch, clutch.
//!
//! Four independent stateless branches, each one or two inputs to one
//! output. Only the winch has an ordering constraint: its limit switch is
//! evaluated after the fire button and therefore always wins.

use atlas_common::command::{ClutchPosition, GearPosition};

/// Roller power while feeding in.
pub const ROLLER_INTAKE_POWER: f64 = 0.3;
/// Roller power while ejecting.
pub const ROLLER_EJECT_POWER: f64 = -0.3;
/// Winch power while firing.
pub const WINCH_FIRE_POWER: f64 = -0.7;

/// Roller intake command.
///
/// Intake is suppressed once the line-break sensor reports an object in the
/// path (`line_break_clear == false`), preventing over-feeding. Eject is
/// always allowed.
pub fn roller(intake_held: bool, eject_held: bool, line_break_clear: bool) -> f64 {
    if intake_held && line_break_clear {
        ROLLER_INTAKE_POWER
    } else if eject_held {
        ROLLER_EJECT_POWER
    } else {
        0.0
    }
}

/// Gear shifter: held ⇒ low gear, released ⇒ high gear. Level-triggered.
pub fn gear_shift(shift_held: bool) -> GearPosition {
    if shift_held { GearPosition::Low } else { GearPosition::High }
}

/// Winch drive. The limit switch overrides the button unconditionally.
pub fn winch(fire_held: bool, limit_tripped: bool) -> f64 {
    let mut power = if fire_held { WINCH_FIRE_POWER } else { 0.0 };
    if limit_tripped {
        power = 0.0;
    }
    power
}

/// Clutch: trigger held ⇒ disengaged (fire), else engaged (safe default).
pub fn clutch(trigger_held: bool) -> ClutchPosition {
    if trigger_held {
        ClutchPosition::Disengaged
    } else {
        ClutchPosition::Engaged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roller_feeds_while_clear() {
        assert_eq!(roller(true, false, true), ROLLER_INTAKE_POWER);
    }

    #[test]
    fn intake_never_issued_with_object_present() {
        // All button combinations with the beam broken.
        for eject in [false, true] {
            let p = roller(true, eject, false);
            assert_ne!(p, ROLLER_INTAKE_POWER);
        }
    }

    #[test]
    fn eject_runs_when_intake_suppressed() {
        assert_eq!(roller(true, true, false), ROLLER_EJECT_POWER);
    }

    #[test]
    fn intake_outranks_eject_while_clear() {
        assert_eq!(roller(true, true, true), ROLLER_INTAKE_POWER);
    }

    #[test]
    fn roller_idles_without_input() {
        assert_eq!(roller(false, false, true), 0.0);
        assert_eq!(roller(false, false, false), 0.0);
    }

    #[test]
    fn gear_defaults_high() {
        assert_eq!(gear_shift(false), GearPosition::High);
        assert_eq!(gear_shift(true), GearPosition::Low);
    }

    #[test]
    fn winch_limit_always_wins() {
        for fire in [false, true] {
            assert_eq!(winch(fire, true), 0.0);
        }
        assert_eq!(winch(true, false), WINCH_FIRE_POWER);
        assert_eq!(winch(false, false), 0.0);
    }

    #[test]
    fn clutch_defaults_engaged() {
        assert_eq!(clutch(false), ClutchPosition::Engaged);
        assert_eq!(clutch(true), ClutchPosition::Disengaged);
    }
}
