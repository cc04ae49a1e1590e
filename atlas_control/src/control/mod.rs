//! Control-law modules, one per actuator group.
//!
//! All three are pure per-tick functions: current sensor values in, motor
//! commands out. Only the drive ramp carries state between ticks, and that
//! state is passed in and returned explicitly.

pub mod arm;
pub mod auxiliary;
pub mod drive;
