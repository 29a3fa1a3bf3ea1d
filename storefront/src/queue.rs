//! Queue decay math.
//!
//! Each tick consumes one "step" of wall-clock time and moves the line
//! forward by a fixed decrement. The ETA models how many steps remain for
//! the current position.

/// Estimated wait in whole minutes for a queue position
///
/// `steps = ceil(position / decrement)`, each step lasting `tick_seconds`.
/// The result rounds half-up to minutes, floored at 1 while any wait
/// remains; position 0 always yields 0.
#[must_use]
pub fn eta_minutes(position: u32, decrement: u32, tick_seconds: u32) -> u32 {
    if position == 0 {
        return 0;
    }
    let steps = position.div_ceil(decrement.max(1));
    let minutes = (u64::from(steps) * u64::from(tick_seconds) + 30) / 60;
    u32::try_from(minutes).unwrap_or(u32::MAX).max(1)
}

/// Position after one unheld tick
#[must_use]
pub const fn next_position(position: u32, decrement: u32) -> u32 {
    position.saturating_sub(decrement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn eta_is_zero_at_front() {
        assert_eq!(eta_minutes(0, 2, 10), 0);
    }

    #[test]
    fn eta_floors_at_one_minute_while_waiting() {
        // 1 step of 10s rounds to 0 minutes but the floor keeps it at 1
        assert_eq!(eta_minutes(2, 2, 10), 1);
        assert_eq!(eta_minutes(1, 2, 10), 1);
    }

    #[test]
    fn eta_rounds_half_up() {
        // 745 steps * 10s = 7450s = 124.17 min -> 124
        assert_eq!(eta_minutes(1490, 2, 10), 124);
        // 750 steps * 10s = 7500s = 125 min exactly
        assert_eq!(eta_minutes(1500, 2, 10), 125);
        // 13 -> 7 steps * 10s = 70s = 1.17 min -> 1
        assert_eq!(eta_minutes(13, 2, 10), 1);
    }

    #[test]
    fn eta_survives_zero_decrement_config() {
        // Degenerate config clamps to a decrement of 1
        assert_eq!(eta_minutes(6, 0, 10), 1);
    }

    #[test]
    fn decay_floors_at_zero() {
        assert_eq!(next_position(1500, 2), 1498);
        assert_eq!(next_position(1, 2), 0);
        assert_eq!(next_position(0, 2), 0);
    }

    proptest! {
        #[test]
        fn eta_is_zero_iff_front(position in 0u32..5_000) {
            let eta = eta_minutes(position, 2, 10);
            prop_assert_eq!(eta == 0, position == 0);
        }

        #[test]
        fn eta_never_grows_as_position_falls(position in 1u32..5_000) {
            let before = eta_minutes(position, 2, 10);
            let after = eta_minutes(next_position(position, 2), 2, 10);
            prop_assert!(after <= before);
        }
    }
}
