//! Property-based tests for the status classifier and the polling policy.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::time::Duration;

use proptest::prelude::*;

use diagpull::domain::CollectionStatus;
use diagpull::domain::artifact::parse_reported_size;
use diagpull::domain::policy::{POLL_GRACE, next_poll_delay, poll_deadline_exceeded};
use diagpull::domain::status::{StatusMarkers, classify};

const MARKERS: StatusMarkers<'static> = StatusMarkers {
    collecting: "Data collection in progress",
    standby: "Standby",
};

/// Simulated time spent polling a job that never finishes.
fn worst_case_polling(timeout: Duration, interval: Duration) -> Duration {
    let mut elapsed = Duration::ZERO;
    while !poll_deadline_exceeded(elapsed, timeout) {
        elapsed += next_poll_delay(elapsed, timeout, interval);
    }
    elapsed
}

// ============================================================================
// classify() property tests
// ============================================================================

proptest! {
    /// The collecting marker wins wherever the standby marker appears.
    #[test]
    fn prop_collecting_marker_has_priority(
        prefix in ".{0,40}",
        middle in ".{0,40}",
        suffix in ".{0,40}",
        standby_first in any::<bool>(),
    ) {
        let body = if standby_first {
            format!("{prefix}Standby{middle}Data collection in progress{suffix}")
        } else {
            format!("{prefix}Data collection in progress{middle}Standby{suffix}")
        };
        prop_assert_eq!(classify(&body, &MARKERS), CollectionStatus::Collecting);
    }

    /// Classification is deterministic for arbitrary text.
    #[test]
    fn prop_classify_is_deterministic(body in ".{0,200}") {
        prop_assert_eq!(classify(&body, &MARKERS), classify(&body, &MARKERS));
    }

    /// Text without either marker is always unknown.
    #[test]
    fn prop_unmarked_text_is_unknown(body in "[a-z0-9 ]{0,200}") {
        prop_assert_eq!(classify(&body, &MARKERS), CollectionStatus::Unknown);
    }
}

// ============================================================================
// Polling policy property tests
// ============================================================================

proptest! {
    /// Polling never runs more than the grace period past the bound.
    #[test]
    fn prop_polling_ends_within_grace(timeout_s in 1u64..3_600, interval_s in 1u64..120) {
        let timeout = Duration::from_secs(timeout_s);
        let spent = worst_case_polling(timeout, Duration::from_secs(interval_s));
        prop_assert!(spent > timeout);
        prop_assert!(spent <= timeout + POLL_GRACE, "spent {:?} for bound {:?}", spent, timeout);
    }

    /// A shorter bound never makes the worst case longer.
    #[test]
    fn prop_shorter_timeout_never_polls_longer(
        shorter in 1u64..1_800,
        extra in 0u64..1_800,
        interval_s in 1u64..60,
    ) {
        let interval = Duration::from_secs(interval_s);
        let short = worst_case_polling(Duration::from_secs(shorter), interval);
        let long = worst_case_polling(Duration::from_secs(shorter + extra), interval);
        prop_assert!(short <= long);
    }

    /// The delay is never longer than the configured interval.
    #[test]
    fn prop_delay_never_exceeds_interval(
        elapsed_ms in 0u64..10_000_000,
        timeout_ms in 0u64..10_000_000,
        interval_ms in 1u64..600_000,
    ) {
        let interval = Duration::from_millis(interval_ms);
        let delay = next_poll_delay(
            Duration::from_millis(elapsed_ms),
            Duration::from_millis(timeout_ms),
            interval,
        );
        prop_assert!(delay <= interval);
        prop_assert!(delay > Duration::ZERO);
    }
}

// ============================================================================
// parse_reported_size() property tests
// ============================================================================

proptest! {
    /// Thousands separators do not change the parsed value.
    #[test]
    fn prop_size_ignores_separators(bytes in any::<u64>()) {
        let plain = bytes.to_string();
        let grouped: String = plain
            .chars()
            .rev()
            .collect::<Vec<_>>()
            .chunks(3)
            .map(|c| c.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(",")
            .chars()
            .rev()
            .collect();
        prop_assert_eq!(parse_reported_size(&plain), Some(bytes));
        prop_assert_eq!(parse_reported_size(&grouped), Some(bytes));
    }
}
