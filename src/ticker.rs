use std::time::Duration;

/// Main loop tick interval in milliseconds. Each tick polls the save
/// scheduler and settles any finished visibility transition.
pub const DEFAULT_TICK_MS: u64 = 250;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        let duration = tick_duration();
        assert_eq!(duration, Duration::from_millis(250));
    }

    #[test]
    fn test_tick_is_finer_than_debounce_window() {
        assert!(tick_duration() < crate::scheduler::NOTES_DEBOUNCE);
    }
}
