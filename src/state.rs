use chrono::{DateTime, Duration, Utc};

use crate::models::ProbeResult;

/// What one observation reported: the composite down state and the outage
/// clock as of that instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub is_down: bool,
    pub down_since: Option<DateTime<Utc>>,
    pub time_down: Duration,
}

/// Downtime tracker for one monitored port. The outage clock starts on the
/// up-to-down edge and is never reset while the outage persists; it clears
/// the instant the stack comes back up.
#[derive(Debug, Clone)]
pub struct AvailabilityState {
    down_since: Option<DateTime<Utc>>,
    time_down: Duration,
}

impl Default for AvailabilityState {
    fn default() -> Self {
        Self {
            down_since: None,
            time_down: Duration::zero(),
        }
    }
}

impl AvailabilityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one probe outcome through the transition table. Safe to call
    /// repeatedly: re-observing an ongoing outage advances the duration
    /// without touching `down_since`.
    pub fn observe(&mut self, probe: &ProbeResult) -> Observation {
        self.observe_at(probe, Utc::now())
    }

    pub fn observe_at(&mut self, probe: &ProbeResult, now: DateTime<Utc>) -> Observation {
        let is_down = probe.is_down();
        if is_down {
            let since = *self.down_since.get_or_insert(now);
            self.time_down = now - since;
        } else {
            self.down_since = None;
            self.time_down = Duration::zero();
        }
        Observation {
            is_down,
            down_since: self.down_since,
            time_down: self.time_down,
        }
    }

    pub fn down_since(&self) -> Option<DateTime<Utc>> {
        self.down_since
    }

    pub fn time_down(&self) -> Duration {
        self.time_down
    }
}
