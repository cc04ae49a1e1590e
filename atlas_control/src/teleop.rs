//! Teleop tick: composes the control laws into one actuator command set.
//!
//! Evaluation order per tick mirrors the read-compute-write contract:
//! roller → drive ramp → arm → gear → winch → clutch. Branches are
//! independent except where noted in [`control::auxiliary`](crate::control::auxiliary).

use atlas_common::command::{ActuatorCommands, clamp_power};
use atlas_common::config::RobotConfig;
use atlas_common::input::Buttons;
use atlas_hal::{DisplayLines, RobotInputs};
use tracing::debug;

use crate::control::{arm, auxiliary, drive};

/// Everything one teleop tick produces.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    /// Actuator commands, pre-clamped to [-1, 1].
    pub commands: ActuatorCommands,
    /// True when the arm encoder must be zeroed this tick.
    pub reset_encoder: bool,
    /// Diagnostic display content.
    pub display: DisplayLines,
}

/// Run one teleop tick.
///
/// Pure except for a debug trace: same inputs and ramp state always produce
/// the same output. The returned [`drive::RampState`] must be carried into
/// the next tick.
pub fn tick(
    cfg: &RobotConfig,
    inputs: &RobotInputs,
    ramp: drive::RampState,
) -> (TickOutput, drive::RampState) {
    let buttons = cfg.buttons.decode(&inputs.pad);
    let sensors = &inputs.sensors;

    // Roller intake / eject.
    let roller = auxiliary::roller(
        buttons.contains(Buttons::INTAKE),
        buttons.contains(Buttons::EJECT),
        sensors.line_break,
    );

    // Drive ramp + arcade mix.
    let max_delta = cfg.max_delta_speed();
    let (cmd, next_ramp) = drive::ramp(inputs.pad.forward(), inputs.pad.turn(), ramp, max_delta);
    let wheels = drive::arcade_mix(cmd.speed, cmd.turn);
    debug!(max_delta, speed = cmd.speed, turn = cmd.turn, "drive ramp");

    // Arm position control.
    let arm_tick = arm::tick(
        &cfg.arm,
        sensors.arm_encoder,
        sensors.top_arm_switch,
        buttons.contains(Buttons::ARM_LOWER),
        buttons.contains(Buttons::ARM_RAISE),
    );

    // Remaining auxiliary branches.
    let gear = auxiliary::gear_shift(buttons.contains(Buttons::SHIFT_LOW));
    let winch = auxiliary::winch(
        buttons.contains(Buttons::WINCH_FIRE),
        sensors.winch_switch,
    );
    let clutch = auxiliary::clutch(buttons.contains(Buttons::CLUTCH_RELEASE));

    let commands = ActuatorCommands {
        drive: wheels,
        arm: clamp_power(arm_tick.power),
        roller: clamp_power(roller),
        winch: clamp_power(winch),
        gear_shift: gear,
        clutch,
        // Compressor runs throughout teleop; its pressure switch cuts it out
        // at the hardware level.
        compressor: true,
    };

    let firing = clutch == atlas_common::command::ClutchPosition::Disengaged;
    let display = DisplayLines {
        line1: if firing { "firing".into() } else { "not firing!".into() },
        line2: format!(
            "enc={} arm_at_top={}",
            sensors.arm_encoder,
            arm::at_top(sensors.top_arm_switch) as i32
        ),
    };

    (
        TickOutput {
            commands,
            reset_encoder: arm_tick.reset_encoder,
            display,
        },
        next_ramp,
    )
}
