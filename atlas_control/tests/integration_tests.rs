//! Whole-tick integration tests: control logic driven through the cycle
//! runner against the simulated rig, exactly as the binary runs it.

use atlas_common::command::{ClutchPosition, GearPosition};
use atlas_common::config::RobotConfig;
use atlas_control::cycle::{CycleRunner, RobotMode};
use atlas_hal::RobotHal;
use atlas_hal::sim::SimRig;

fn teleop_runner() -> CycleRunner<SimRig> {
    let mut r = CycleRunner::new(RobotConfig::default(), SimRig::new());
    r.set_mode(RobotMode::Teleop);
    r
}

/// Default button numbers, so tests read like the driver station sheet.
const BTN_INTAKE: u8 = 1;
const BTN_EJECT: u8 = 2;
const BTN_CLUTCH: u8 = 4;
const BTN_SHIFT: u8 = 5;
const BTN_RAISE: u8 = 6;
const BTN_LOWER: u8 = 8;
const BTN_WINCH: u8 = 9;

#[test]
fn drive_ramps_to_full_speed_in_one_second() {
    let mut r = teleop_runner();
    r.hal_mut().set_axes(-1.0, 0.0);

    // 50 ticks at 50 Hz = 1.0 s ramp time.
    for _ in 0..50 {
        r.tick().unwrap();
    }
    let cmd = r.hal().last_commands().unwrap();
    assert!((cmd.drive.front_left - 1.0).abs() < 1e-9);
    assert!((cmd.drive.rear_right - 1.0).abs() < 1e-9);

    // Every intermediate step obeyed the ramp; final state is saturated.
    for _ in 0..10 {
        r.tick().unwrap();
    }
    assert!((r.hal().last_commands().unwrap().drive.front_left - 1.0).abs() < 1e-9);
}

#[test]
fn releasing_stick_ramps_down_not_cuts() {
    let mut r = teleop_runner();
    r.hal_mut().set_axes(-1.0, 0.0);
    for _ in 0..50 {
        r.tick().unwrap();
    }
    r.hal_mut().set_axes(0.0, 0.0);
    r.tick().unwrap();
    let cmd = r.hal().last_commands().unwrap();
    assert!((cmd.drive.front_left - 0.98).abs() < 1e-9);
}

#[test]
fn lowering_arm_stops_at_bottom_threshold() {
    let mut r = teleop_runner();
    // Start clear of the top switch so the count is not re-zeroed.
    r.hal_mut().set_encoder(10);
    r.hal_mut().set_button(BTN_LOWER, true);

    // Plenty of ticks: the sim integrates arm power into counts.
    for _ in 0..500 {
        r.tick().unwrap();
    }
    let enc = r.hal().encoder();
    assert!(enc >= 64, "arm should reach the bottom threshold, got {enc}");
    // Once at bottom the commanded power is zero.
    assert_eq!(r.hal().last_commands().unwrap().arm, 0.0);
    // And the count stops growing.
    let settled = r.hal().encoder();
    r.tick().unwrap();
    assert_eq!(r.hal().encoder(), settled);
}

#[test]
fn raising_arm_rezeros_encoder_at_top() {
    let mut r = teleop_runner();
    r.hal_mut().set_encoder(50);
    r.hal_mut().set_button(BTN_RAISE, true);

    for _ in 0..500 {
        r.tick().unwrap();
    }
    // Arm reached the top: switch pressed, encoder re-zeroed, motor idle.
    let inputs = r.hal_mut().read();
    assert!(!inputs.sensors.top_arm_switch);
    assert_eq!(inputs.sensors.arm_encoder, 0);
    assert_eq!(r.hal().last_commands().unwrap().arm, 0.0);
}

#[test]
fn encoder_rezeroed_every_tick_the_switch_holds() {
    let mut r = teleop_runner();
    r.hal_mut().set_encoder(42);
    r.hal_mut().force_top_switch(Some(false));
    r.tick().unwrap();
    assert_eq!(r.hal().encoder(), 0);
    // Inject drift; the next tick clears it again while the switch holds.
    r.hal_mut().set_encoder(7);
    r.tick().unwrap();
    assert_eq!(r.hal().encoder(), 0);
}

#[test]
fn intake_stops_when_object_arrives() {
    let mut r = teleop_runner();
    r.hal_mut().set_button(BTN_INTAKE, true);
    r.tick().unwrap();
    assert_eq!(r.hal().last_commands().unwrap().roller, 0.3);

    // Object breaks the beam mid-feed.
    r.hal_mut().set_line_break(false);
    r.tick().unwrap();
    assert_eq!(r.hal().last_commands().unwrap().roller, 0.0);

    // Eject still allowed with the object present.
    r.hal_mut().set_button(BTN_EJECT, true);
    r.tick().unwrap();
    assert_eq!(r.hal().last_commands().unwrap().roller, -0.3);
}

#[test]
fn winch_limit_overrides_fire_button() {
    let mut r = teleop_runner();
    r.hal_mut().set_button(BTN_WINCH, true);
    r.tick().unwrap();
    assert_eq!(r.hal().last_commands().unwrap().winch, -0.7);

    r.hal_mut().set_winch_switch(true);
    r.tick().unwrap();
    assert_eq!(r.hal().last_commands().unwrap().winch, 0.0);
}

#[test]
fn gear_and_clutch_follow_their_buttons() {
    let mut r = teleop_runner();
    r.tick().unwrap();
    let cmd = *r.hal().last_commands().unwrap();
    assert_eq!(cmd.gear_shift, GearPosition::High);
    assert_eq!(cmd.clutch, ClutchPosition::Engaged);

    r.hal_mut().set_button(BTN_SHIFT, true);
    r.hal_mut().set_button(BTN_CLUTCH, true);
    r.tick().unwrap();
    let cmd = *r.hal().last_commands().unwrap();
    assert_eq!(cmd.gear_shift, GearPosition::Low);
    assert_eq!(cmd.clutch, ClutchPosition::Disengaged);
    assert_eq!(r.hal().last_display().line1, "firing");
}

#[test]
fn autonomous_runs_window_then_stops() {
    let mut r = CycleRunner::new(RobotConfig::default(), SimRig::new());
    r.set_mode(RobotMode::Autonomous);

    // 250 ticks = 5.0 s at 50 Hz.
    for _ in 0..250 {
        r.tick().unwrap();
        assert_eq!(r.hal().last_commands().unwrap().drive.front_left, 0.5);
        assert!(r.hal().last_commands().unwrap().compressor);
    }
    for _ in 0..20 {
        r.tick().unwrap();
        assert_eq!(r.hal().last_commands().unwrap().drive.front_left, 0.0);
    }
}

#[test]
fn mode_change_overwrites_commands_next_tick() {
    let mut r = CycleRunner::new(RobotConfig::default(), SimRig::new());
    r.set_mode(RobotMode::Autonomous);
    r.tick().unwrap();
    assert_eq!(r.hal().last_commands().unwrap().drive.front_left, 0.5);

    r.set_mode(RobotMode::Disabled);
    r.tick().unwrap();
    let cmd = r.hal().last_commands().unwrap();
    assert_eq!(cmd.drive.front_left, 0.0);
    assert!(!cmd.compressor);
}

#[test]
fn display_tracks_arm_state_each_tick() {
    let mut r = teleop_runner();
    r.hal_mut().set_encoder(25);
    r.tick().unwrap();
    assert_eq!(r.hal().last_display().line2, "enc=25 arm_at_top=0");

    r.hal_mut().set_encoder(0);
    r.tick().unwrap();
    assert_eq!(r.hal().last_display().line2, "enc=0 arm_at_top=1");
}

#[test]
fn every_written_command_is_in_range() {
    // Hammer the runner with extreme inputs; nothing out of range may reach
    // the HAL (SimRig::write would error).
    let mut r = teleop_runner();
    r.hal_mut().set_axes(-1.0, 1.0);
    for n in [BTN_INTAKE, BTN_EJECT, BTN_RAISE, BTN_LOWER, BTN_WINCH] {
        r.hal_mut().set_button(n, true);
    }
    for _ in 0..200 {
        r.tick().unwrap();
        assert!(r.hal().last_commands().unwrap().in_range());
    }
}
