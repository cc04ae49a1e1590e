//! Software simulation backend.
//!
//! `SimRig` stands in for the full robot: tests inject pad and sensor state,
//! the control layer runs unmodified against it, and assertions read back
//! the last committed command set. The arm is given just enough physics to
//! exercise the position controller — commanded arm power integrates into
//! encoder counts, and the top switch trips when the count reaches zero.

use atlas_common::command::ActuatorCommands;
use atlas_common::input::GamepadSnapshot;
use tracing::trace;

use crate::{DisplayLines, HalError, RobotHal, RobotInputs, SensorSnapshot};

/// Encoder counts moved per tick at full lowering power.
///
/// Coarse by intent: the sim only needs the controller to sweep through all
/// three position bands within a few dozen ticks.
pub const COUNTS_PER_FULL_POWER_TICK: f64 = 5.0;

/// Simulated robot rig.
pub struct SimRig {
    // ── Injected operator/sensor state ──
    pad: GamepadSnapshot,
    line_break: bool,
    winch_switch: bool,
    pressure_switch: bool,
    /// When set, overrides the encoder-derived top switch level.
    top_switch_forced: Option<bool>,

    // ── Simulated arm ──
    /// Encoder accumulator; exposed truncated to i32.
    encoder_accum: f64,

    // ── Last write, for assertions ──
    last_commands: Option<ActuatorCommands>,
    last_display: DisplayLines,
    write_count: u64,
}

impl Default for SimRig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimRig {
    /// Create a rig at electrical idle: sticks centered, no buttons, beam
    /// clear, arm resting at the top.
    pub fn new() -> Self {
        Self {
            pad: GamepadSnapshot::default(),
            line_break: true,
            winch_switch: false,
            pressure_switch: false,
            top_switch_forced: None,
            encoder_accum: 0.0,
            last_commands: None,
            last_display: DisplayLines::default(),
            write_count: 0,
        }
    }

    // ── Injection ──

    /// Set both stick axes (raw levels, stick-up is negative left_y).
    pub fn set_axes(&mut self, left_y: f64, right_x: f64) {
        self.pad.left_y = left_y;
        self.pad.right_x = right_x;
    }

    /// Hold or release numbered button `n` (1-based).
    pub fn set_button(&mut self, n: u8, held: bool) {
        debug_assert!((1..=16).contains(&n));
        let bit = 1u16 << (n - 1);
        if held {
            self.pad.raw_buttons |= bit;
        } else {
            self.pad.raw_buttons &= !bit;
        }
    }

    /// Release every button and center both sticks.
    pub fn clear_pad(&mut self) {
        self.pad = GamepadSnapshot::default();
    }

    /// Set the line-break level (`true` = beam clear, no object).
    pub fn set_line_break(&mut self, clear: bool) {
        self.line_break = clear;
    }

    /// Set the winch limit switch level.
    pub fn set_winch_switch(&mut self, tripped: bool) {
        self.winch_switch = tripped;
    }

    /// Set the compressor pressure switch level.
    pub fn set_pressure_switch(&mut self, at_pressure: bool) {
        self.pressure_switch = at_pressure;
    }

    /// Place the arm at a specific encoder count.
    pub fn set_encoder(&mut self, count: i32) {
        self.encoder_accum = count as f64;
    }

    /// Force the raw top switch level, bypassing the encoder model.
    /// `None` restores the derived level.
    pub fn force_top_switch(&mut self, level: Option<bool>) {
        self.top_switch_forced = level;
    }

    // ── Assertions ──

    /// The last command set committed via `write`, if any.
    pub fn last_commands(&self) -> Option<&ActuatorCommands> {
        self.last_commands.as_ref()
    }

    /// The last display update.
    pub fn last_display(&self) -> &DisplayLines {
        &self.last_display
    }

    /// Current simulated encoder count.
    pub fn encoder(&self) -> i32 {
        self.encoder_accum as i32
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    /// True if the compressor is actually running: commanded on and the
    /// pressure switch has not cut it out.
    pub fn compressor_running(&self) -> bool {
        self.last_commands
            .map(|c| c.compressor && !self.pressure_switch)
            .unwrap_or(false)
    }

    /// Raw top switch level: active-low, pressed once the arm reaches the
    /// top of travel (count ≤ 0).
    fn top_switch_level(&self) -> bool {
        match self.top_switch_forced {
            Some(level) => level,
            None => self.encoder_accum > 0.0,
        }
    }

    fn check_range(device: &'static str, value: f64) -> Result<(), HalError> {
        if (-1.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(HalError::CommandOutOfRange { device, value })
        }
    }
}

impl RobotHal for SimRig {
    fn read(&mut self) -> RobotInputs {
        RobotInputs {
            pad: self.pad,
            sensors: SensorSnapshot {
                arm_encoder: self.encoder_accum as i32,
                top_arm_switch: self.top_switch_level(),
                line_break: self.line_break,
                winch_switch: self.winch_switch,
                pressure_switch: self.pressure_switch,
            },
        }
    }

    fn write(&mut self, commands: &ActuatorCommands) -> Result<(), HalError> {
        Self::check_range("front_left", commands.drive.front_left)?;
        Self::check_range("rear_left", commands.drive.rear_left)?;
        Self::check_range("front_right", commands.drive.front_right)?;
        Self::check_range("rear_right", commands.drive.rear_right)?;
        Self::check_range("arm", commands.arm)?;
        Self::check_range("roller", commands.roller)?;
        Self::check_range("winch", commands.winch)?;

        // Integrate arm motion: positive power lowers the arm, counts grow.
        self.encoder_accum += commands.arm * COUNTS_PER_FULL_POWER_TICK;
        if self.encoder_accum < 0.0 {
            self.encoder_accum = 0.0;
        }

        self.last_commands = Some(*commands);
        self.write_count += 1;
        trace!(
            arm = commands.arm,
            roller = commands.roller,
            winch = commands.winch,
            encoder = self.encoder(),
            "sim write"
        );
        Ok(())
    }

    fn reset_arm_encoder(&mut self) {
        self.encoder_accum = 0.0;
    }

    fn display(&mut self, lines: &DisplayLines) {
        self.last_display = lines.clone();
    }
}
