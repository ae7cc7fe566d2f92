//! Event durations at a given speed
//!
//! The unit length is `1000 / ((5 * wpm) / 6)` milliseconds, with both
//! divisions truncating. Keep the order of operations: regrouping the
//! arithmetic changes results for many speeds.

use std::time::Duration;

use tracing::warn;

use crate::event::Event;

/// Slowest speed whose unit divisor is non-zero
pub const MIN_WPM: u32 = 2;

/// Length of one timing unit in milliseconds
///
/// Returns `None` when the speed is too slow for the formula (`wpm < 2`).
pub fn unit_millis(wpm: u32) -> Option<u64> {
    let divisor = (5 * u64::from(wpm)) / 6;
    1000u64.checked_div(divisor)
}

/// Duration of an event at the given speed in words per minute
pub fn event_length(event: Event, wpm: u32) -> Duration {
    let unit = match unit_millis(wpm) {
        Some(unit) => unit,
        None => {
            warn!(wpm, min = MIN_WPM, "event_length: speed below minimum, clamping");
            1000 / ((5 * u64::from(MIN_WPM)) / 6)
        }
    };
    Duration::from_millis(event.units() * unit)
}
