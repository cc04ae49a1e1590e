//! Timer-gated autonomous routines.
//!
//! Not a sequencer: each routine is a single branch on elapsed time since
//! autonomous entry, recomputed every tick from scratch.

use atlas_common::command::{ActuatorCommands, clamp_power};
use atlas_common::config::{AutonConfig, AutonRoutine};
use std::time::Duration;

use crate::control::drive;

/// Run one autonomous tick.
///
/// `elapsed` is the time since autonomous entry, as accumulated by the cycle
/// runner. The compressor is on for the whole period.
pub fn tick(cfg: &AutonConfig, elapsed: Duration) -> ActuatorCommands {
    let mut commands = ActuatorCommands {
        compressor: true,
        ..Default::default()
    };

    match cfg.routine {
        AutonRoutine::DriveForward => {
            if elapsed.as_secs_f64() < cfg.drive_seconds {
                commands.drive = drive::arcade_mix(clamp_power(cfg.drive_speed), 0.0);
            }
            // Past the window the default zero drive stands.
        }
        AutonRoutine::RollerFeed => {
            commands.roller = clamp_power(cfg.roller_power);
        }
    }

    commands
}
