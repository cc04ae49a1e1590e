//! Operator input: gamepad snapshot and named button mapping.
//!
//! The HAL delivers the pad exactly as polled — raw axis levels and a bitmask
//! of numbered momentary buttons. The control layer never branches on a
//! button *number*; it decodes the raw mask into named [`Buttons`] flags via
//! the configured [`ButtonConfig`](crate::config::ButtonConfig) so the pad
//! layout can be rewired in TOML without touching control code.

use bitflags::bitflags;

bitflags! {
    /// Named operator actions, decoded from numbered pad buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u16 {
        /// Run the roller inward (feed).
        const INTAKE        = 0x0001;
        /// Run the roller outward (eject).
        const EJECT         = 0x0002;
        /// Release the clutch (fire).
        const CLUTCH_RELEASE = 0x0004;
        /// Hold low gear.
        const SHIFT_LOW     = 0x0008;
        /// Raise the arm.
        const ARM_RAISE     = 0x0010;
        /// Lower the arm.
        const ARM_LOWER     = 0x0020;
        /// Drive the winch.
        const WINCH_FIRE    = 0x0040;
    }
}

/// One tick's worth of gamepad state, as read from the HAL.
///
/// Axes are stored with the raw sign convention of the physical stick
/// (pushing the stick up reads negative). Use [`forward`](Self::forward) and
/// [`turn`](Self::turn) for the control-law convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct GamepadSnapshot {
    /// Left stick Y axis, raw, in [-1, 1].
    pub left_y: f64,
    /// Right stick X axis, raw, in [-1, 1].
    pub right_x: f64,
    /// Bitmask of numbered buttons: bit N-1 set ⇔ button N held.
    pub raw_buttons: u16,
}

impl GamepadSnapshot {
    /// Forward-axis demand: stick-up maps to positive forward.
    #[inline]
    pub fn forward(&self) -> f64 {
        -self.left_y
    }

    /// Turn-rate demand, sign-inverted to match the drive mixing convention.
    #[inline]
    pub fn turn(&self) -> f64 {
        -self.right_x
    }

    /// Returns true if numbered button `n` (1-based) is held.
    #[inline]
    pub fn numbered(&self, n: u8) -> bool {
        n >= 1 && n <= 16 && self.raw_buttons & (1 << (n - 1)) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_up_is_positive_forward() {
        let pad = GamepadSnapshot {
            left_y: -0.75,
            ..Default::default()
        };
        assert_eq!(pad.forward(), 0.75);
    }

    #[test]
    fn numbered_buttons_are_one_based() {
        let pad = GamepadSnapshot {
            raw_buttons: 0b0000_0001_0010_0001,
            ..Default::default()
        };
        assert!(pad.numbered(1));
        assert!(!pad.numbered(2));
        assert!(pad.numbered(6));
        assert!(pad.numbered(9));
        assert!(!pad.numbered(0));
        assert!(!pad.numbered(17));
    }

    #[test]
    fn buttons_flags_are_disjoint() {
        assert_eq!(Buttons::all().bits().count_ones(), 7);
    }
}
