//! Atlas Common Library
//!
//! Shared constants, configuration loading and the operator-input /
//! actuator-command types used by all Atlas workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Default channel wiring and control-law constants
//! - [`config`] - TOML configuration loading and validation
//! - [`input`] - Gamepad snapshot and named button mapping
//! - [`command`] - Actuator command set written through the HAL each tick

pub mod command;
pub mod config;
pub mod consts;
pub mod input;
