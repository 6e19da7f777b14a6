//! Decision rules of the collection workflow that do not touch the UI.
//!
//! The two soft paths (optimistic login after a redirect timeout, and a
//! trigger that did not visibly start a collection) live here as explicit
//! verdicts so each can be tested on its own.

use std::time::Duration;

use crate::domain::status::CollectionStatus;

/// Extra time past the collection bound that one final poll may take.
pub const POLL_GRACE: Duration = Duration::from_secs(1);

/// Case-insensitive check that `address` contains `fragment`.
#[must_use]
pub fn address_matches(address: &str, fragment: &str) -> bool {
    !fragment.is_empty() && address.to_lowercase().contains(&fragment.to_lowercase())
}

/// What to conclude when the post-login address never showed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginVerdict {
    /// Still on the login page: the credentials were not accepted.
    Rejected,
    /// Somewhere else: assume login worked and the landing page differs.
    ProceedOptimistically,
}

/// Inputs for [`login_timeout_verdict`].
#[derive(Debug, Clone, Copy)]
pub struct LoginProbe<'a> {
    pub current_address: &'a str,
    pub body_text: &'a str,
    pub login_address: &'a str,
    pub login_text: Option<&'a str>,
}

/// Classify the page reached after the login redirect bound expired.
#[must_use]
pub fn login_timeout_verdict(probe: &LoginProbe<'_>) -> LoginVerdict {
    let on_login_address = address_matches(probe.current_address, probe.login_address);
    let shows_login_text = probe
        .login_text
        .is_some_and(|marker| !marker.is_empty() && probe.body_text.contains(marker));
    if on_login_address || shows_login_text {
        LoginVerdict::Rejected
    } else {
        LoginVerdict::ProceedOptimistically
    }
}

/// Result of re-reading the status after clicking the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerVerdict {
    /// The console reports a running collection.
    Started,
    /// The console did not (yet) show a running collection.
    SoftFailure(CollectionStatus),
}

#[must_use]
pub fn trigger_verdict(status_after_trigger: CollectionStatus) -> TriggerVerdict {
    match status_after_trigger {
        CollectionStatus::Collecting => TriggerVerdict::Started,
        other => TriggerVerdict::SoftFailure(other),
    }
}

/// Whether polling has run past its bound. Equal is still within bounds.
#[must_use]
pub fn poll_deadline_exceeded(elapsed: Duration, timeout: Duration) -> bool {
    elapsed > timeout
}

/// Delay before the next status read.
///
/// The regular interval, capped so the next deadline check happens at most
/// [`POLL_GRACE`] after the bound.
#[must_use]
pub fn next_poll_delay(elapsed: Duration, timeout: Duration, interval: Duration) -> Duration {
    interval.min(timeout.saturating_sub(elapsed) + POLL_GRACE)
}
