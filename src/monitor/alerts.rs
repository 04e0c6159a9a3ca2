// Failure / recovery tracking for error notifications
//
// Transient single-cycle errors must not page anyone; a sustained outage
// alerts exactly once until the cooldown elapses, and recovery is
// announced exactly once per incident. The tracker itself never talks to
// the sink: the cycle driver asks `should_alert`, sends, and only then
// calls `mark_alerted`, so an alert that never reached the operator does
// not arm a recovery notification.

use chrono::{DateTime, Utc};

/// Consecutive-failure tracker with threshold + cooldown gating.
#[derive(Debug)]
pub struct ErrorTracker {
    threshold: u32,
    cooldown_secs: u64,
    consecutive_failures: u32,
    last_error_alert_time: Option<DateTime<Utc>>,
    last_error_type: Option<String>,
    was_in_error_state: bool,
}

impl ErrorTracker {
    pub fn new(threshold: u32, cooldown_secs: u64) -> Self {
        Self {
            threshold,
            cooldown_secs,
            consecutive_failures: 0,
            last_error_alert_time: None,
            last_error_type: None,
            was_in_error_state: false,
        }
    }

    /// Record one failed cycle.
    pub fn note_failure(&mut self, error_type: &str) {
        self.consecutive_failures += 1;
        self.last_error_type = Some(error_type.to_string());
    }

    /// Whether an error alert should be emitted right now: the failure
    /// streak has reached the threshold and the cooldown since the last
    /// emitted alert has elapsed (a tracker that never alerted has no
    /// cooldown to wait out).
    pub fn should_alert(&self, now: DateTime<Utc>) -> bool {
        if self.consecutive_failures < self.threshold {
            return false;
        }
        match self.last_error_alert_time {
            Some(last) => {
                let elapsed = now.signed_duration_since(last).num_seconds();
                elapsed >= 0 && elapsed as u64 >= self.cooldown_secs
            }
            None => true,
        }
    }

    /// Record that an alert was actually delivered.
    pub fn mark_alerted(&mut self, now: DateTime<Utc>) {
        self.last_error_alert_time = Some(now);
        self.was_in_error_state = true;
    }

    /// Record one successful cycle. Returns the failure count to announce
    /// if an alert had fired during the streak that just ended; counters
    /// reset either way, silently when no alert ever went out.
    pub fn note_success(&mut self) -> Option<u32> {
        let recovered = if self.was_in_error_state && self.consecutive_failures > 0 {
            Some(self.consecutive_failures)
        } else {
            None
        };

        self.consecutive_failures = 0;
        self.last_error_type = None;
        self.was_in_error_state = false;

        recovered
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn last_error_type(&self) -> Option<&str> {
        self.last_error_type.as_deref()
    }
}
