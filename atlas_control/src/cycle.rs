//! Fixed-rate cycle runner: read → compute → write.
//!
//! One tick per fixed period (50 Hz default). Each tick reads a full
//! sensor/pad snapshot from the HAL, dispatches to the active mode's logic,
//! and writes the resulting command set back. The runner owns the HAL
//! backend for the process lifetime and is the only thread of control —
//! no locking anywhere.
//!
//! Pacing: `Instant` + `thread::sleep` by default; the `rt` feature swaps in
//! `clock_nanosleep(TIMER_ABSTIME)` on `CLOCK_MONOTONIC` with `mlockall` and
//! `SCHED_FIFO`, for drift-free timing on the robot. Overruns are counted
//! and logged, never fatal: a late actuator command still beats no command.

use atlas_common::command::ActuatorCommands;
use atlas_common::config::RobotConfig;
use atlas_hal::{HalError, RobotHal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::auton;
use crate::control::drive::RampState;
use crate::teleop;

/// Errors during cycle setup or execution.
#[derive(Debug, Error)]
pub enum CycleError {
    /// RT system call failed during setup.
    #[error("rt setup failed: {0}")]
    RtSetup(String),

    /// HAL write rejected a command.
    #[error(transparent)]
    Hal(#[from] HalError),
}

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-tick timing statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total ticks executed.
    pub tick_count: u64,
    /// Last tick duration [ns].
    pub last_tick_ns: i64,
    /// Minimum tick duration [ns].
    pub min_tick_ns: i64,
    /// Maximum tick duration [ns].
    pub max_tick_ns: i64,
    /// Running sum for average computation.
    pub sum_tick_ns: i64,
    /// Number of ticks that exceeded the period.
    pub overruns: u64,
}

impl CycleStats {
    /// Create a new zeroed stats instance.
    pub const fn new() -> Self {
        Self {
            tick_count: 0,
            last_tick_ns: 0,
            min_tick_ns: i64::MAX,
            max_tick_ns: 0,
            sum_tick_ns: 0,
            overruns: 0,
        }
    }

    /// Record a tick duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64) {
        self.tick_count += 1;
        self.last_tick_ns = duration_ns;
        if duration_ns < self.min_tick_ns {
            self.min_tick_ns = duration_ns;
        }
        if duration_ns > self.max_tick_ns {
            self.max_tick_ns = duration_ns;
        }
        self.sum_tick_ns += duration_ns;
    }

    /// Average tick time [ns] (0 before the first tick).
    #[inline]
    pub fn avg_tick_ns(&self) -> i64 {
        if self.tick_count == 0 {
            0
        } else {
            self.sum_tick_ns / self.tick_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Modes ──────────────────────────────────────────────────────────

/// Operating mode, owned by the external mode driver in competition and by
/// the CLI here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RobotMode {
    /// All actuators at the safe default state.
    #[default]
    Disabled,
    /// Timer-gated open-loop routine.
    Autonomous,
    /// Operator control.
    Teleop,
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Owns the HAL backend and all cross-tick state, and drives the fixed-rate
/// loop.
pub struct CycleRunner<H: RobotHal> {
    config: RobotConfig,
    hal: H,
    mode: RobotMode,
    /// Drive ramp memory — the only control state carried across ticks.
    ramp: RampState,
    /// Ticks spent in autonomous since the last autonomous entry.
    auton_ticks: u64,
    tick_period: Duration,
    /// Timing statistics.
    pub stats: CycleStats,
}

impl<H: RobotHal> CycleRunner<H> {
    /// Create a runner in `Disabled` mode.
    pub fn new(config: RobotConfig, hal: H) -> Self {
        let tick_period = Duration::from_secs_f64(1.0 / config.tick_rate_hz);
        Self {
            config,
            hal,
            mode: RobotMode::Disabled,
            ramp: RampState::default(),
            auton_ticks: 0,
            tick_period,
            stats: CycleStats::new(),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> RobotMode {
        self.mode
    }

    /// Borrow the HAL backend (sim assertions in tests).
    pub fn hal(&self) -> &H {
        &self.hal
    }

    /// Mutably borrow the HAL backend (sim injection in tests).
    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    /// Configured tick period.
    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Switch mode, running the new mode's entry actions.
    ///
    /// Autonomous entry restarts the autonomous timer. No safing is done
    /// here: the first tick of the new mode overwrites every actuator.
    pub fn set_mode(&mut self, mode: RobotMode) {
        if mode == self.mode {
            return;
        }
        info!(?mode, "mode change");
        if mode == RobotMode::Autonomous {
            self.auton_ticks = 0;
        }
        self.mode = mode;
    }

    /// Elapsed autonomous time, derived from the tick count so it advances
    /// in lockstep with the control logic.
    pub fn auton_elapsed(&self) -> Duration {
        self.tick_period * self.auton_ticks as u32
    }

    /// Execute one tick: read, compute for the active mode, write.
    pub fn tick(&mut self) -> Result<(), CycleError> {
        let inputs = self.hal.read();

        match self.mode {
            RobotMode::Disabled => {
                self.hal.write(&ActuatorCommands::default())?;
            }
            RobotMode::Autonomous => {
                let commands = auton::tick(&self.config.auton, self.auton_elapsed());
                self.auton_ticks += 1;
                self.hal.write(&commands)?;
            }
            RobotMode::Teleop => {
                let (out, next_ramp) = teleop::tick(&self.config, &inputs, self.ramp);
                self.ramp = next_ramp;
                self.hal.write(&out.commands)?;
                if out.reset_encoder {
                    self.hal.reset_arm_encoder();
                }
                self.hal.display(&out.display);
            }
        }

        Ok(())
    }

    /// Enter the fixed-rate loop until `running` clears or the tick budget
    /// `max_ticks` (if nonzero) is spent.
    pub fn run(&mut self, running: &AtomicBool, max_ticks: u64) -> Result<(), CycleError> {
        let period_ns = self.tick_period.as_nanos() as i64;

        #[cfg(feature = "rt")]
        let mut pacer = rt::Pacer::new()?;
        #[cfg(not(feature = "rt"))]
        let mut pacer = SleepPacer::new();

        while running.load(Ordering::SeqCst) {
            let started = std::time::Instant::now();
            self.tick()?;
            let duration_ns = started.elapsed().as_nanos() as i64;
            self.stats.record(duration_ns);

            if duration_ns > period_ns {
                self.stats.overruns += 1;
                warn!(duration_ns, period_ns, "tick overrun");
            }

            if max_ticks != 0 && self.stats.tick_count >= max_ticks {
                break;
            }

            pacer.wait(self.tick_period);
        }
        Ok(())
    }
}

// ─── Pacing ─────────────────────────────────────────────────────────

/// Drift-tolerant pacer for simulation: sleeps out the remainder of each
/// period relative to its own last wake.
#[cfg(not(feature = "rt"))]
struct SleepPacer {
    last_wake: std::time::Instant,
}

#[cfg(not(feature = "rt"))]
impl SleepPacer {
    fn new() -> Self {
        Self {
            last_wake: std::time::Instant::now(),
        }
    }

    fn wait(&mut self, period: Duration) {
        if let Some(remaining) = period.checked_sub(self.last_wake.elapsed()) {
            std::thread::sleep(remaining);
        }
        self.last_wake = std::time::Instant::now();
    }
}

/// Perform RT setup: lock memory pages and request SCHED_FIFO.
///
/// No-op without the `rt` feature.
#[cfg(feature = "rt")]
pub fn rt_setup(priority: i32) -> Result<(), CycleError> {
    use nix::sys::mman::{MlockallFlags, mlockall};

    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| CycleError::RtSetup(format!("mlockall failed: {e}")))?;

    let param = libc::sched_param {
        sched_priority: priority,
    };
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(CycleError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
pub fn rt_setup(_priority: i32) -> Result<(), CycleError> {
    Ok(())
}

/// Absolute-time pacer on `CLOCK_MONOTONIC` for drift-free robot timing.
#[cfg(feature = "rt")]
mod rt {
    use super::CycleError;
    use nix::sys::time::TimeSpec;
    use nix::time::{ClockId, ClockNanosleepFlags, clock_gettime, clock_nanosleep};
    use std::time::Duration;

    pub(super) struct Pacer {
        next_wake: TimeSpec,
    }

    impl Pacer {
        pub(super) fn new() -> Result<Self, CycleError> {
            let now = clock_gettime(ClockId::CLOCK_MONOTONIC)
                .map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))?;
            Ok(Self { next_wake: now })
        }

        pub(super) fn wait(&mut self, period: Duration) {
            self.next_wake = add_ns(self.next_wake, period.as_nanos() as i64);
            let _ = clock_nanosleep(
                ClockId::CLOCK_MONOTONIC,
                ClockNanosleepFlags::TIMER_ABSTIME,
                &self.next_wake,
            );
        }
    }

    fn add_ns(ts: TimeSpec, ns: i64) -> TimeSpec {
        let mut secs = ts.tv_sec();
        let mut nanos = ts.tv_nsec() + ns;
        while nanos >= 1_000_000_000 {
            secs += 1;
            nanos -= 1_000_000_000;
        }
        TimeSpec::new(secs, nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_hal::sim::SimRig;

    fn runner() -> CycleRunner<SimRig> {
        CycleRunner::new(RobotConfig::default(), SimRig::new())
    }

    #[test]
    fn cycle_stats_basic() {
        let mut stats = CycleStats::new();
        assert_eq!(stats.avg_tick_ns(), 0);

        stats.record(500_000);
        assert_eq!(stats.tick_count, 1);
        assert_eq!(stats.min_tick_ns, 500_000);
        assert_eq!(stats.max_tick_ns, 500_000);

        stats.record(700_000);
        assert_eq!(stats.min_tick_ns, 500_000);
        assert_eq!(stats.max_tick_ns, 700_000);
        assert_eq!(stats.avg_tick_ns(), 600_000);
    }

    #[test]
    fn starts_disabled_with_safe_commands() {
        let mut r = runner();
        r.tick().unwrap();
        let cmd = r.hal().last_commands().copied().unwrap();
        assert_eq!(cmd, ActuatorCommands::default());
    }

    #[test]
    fn autonomous_entry_resets_timer() {
        let mut r = runner();
        r.set_mode(RobotMode::Autonomous);
        for _ in 0..10 {
            r.tick().unwrap();
        }
        assert_eq!(r.auton_elapsed(), r.tick_period() * 10);
        // Re-entry after teleop starts the window over.
        r.set_mode(RobotMode::Teleop);
        r.set_mode(RobotMode::Autonomous);
        assert_eq!(r.auton_elapsed(), Duration::ZERO);
    }

    #[test]
    fn setting_same_mode_keeps_timer() {
        let mut r = runner();
        r.set_mode(RobotMode::Autonomous);
        for _ in 0..5 {
            r.tick().unwrap();
        }
        r.set_mode(RobotMode::Autonomous);
        assert_eq!(r.auton_elapsed(), r.tick_period() * 5);
    }

    #[test]
    fn autonomous_drive_window_at_50hz() {
        // 5.0 s window at 50 Hz = 250 ticks of drive, then stop.
        let mut r = runner();
        r.set_mode(RobotMode::Autonomous);
        for _ in 0..250 {
            r.tick().unwrap();
            let cmd = r.hal().last_commands().unwrap();
            assert_eq!(cmd.drive.front_left, 0.5);
        }
        r.tick().unwrap();
        let cmd = r.hal().last_commands().unwrap();
        assert_eq!(cmd.drive.front_left, 0.0);
    }

    #[test]
    fn teleop_ramp_accumulates_across_ticks() {
        let mut r = runner();
        r.set_mode(RobotMode::Teleop);
        r.hal_mut().set_axes(-1.0, 0.0); // stick up, full demand
        for _ in 0..3 {
            r.tick().unwrap();
        }
        let cmd = r.hal().last_commands().unwrap();
        assert!((cmd.drive.front_left - 0.06).abs() < 1e-12);
    }
}
