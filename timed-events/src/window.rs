//! Validity windows for timed events
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The span of time during which an event is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EventWindow {
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether `now` falls strictly inside the window.
    ///
    /// Both boundaries are exclusive: an event is never live at the exact
    /// instant it starts or ends.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.start < now && now < self.end
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Absolute distance from `now` to the end of the window.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.end - now).abs()
    }

    #[must_use]
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now >= self.end
    }
}
