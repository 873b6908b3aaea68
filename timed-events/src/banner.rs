//! Presentation state derived from the active event
use chrono::Duration;
use serde::{Deserialize, Serialize};

const DEFAULT_BANNER_SCALE: f64 = 0.18;
const FALLBACK_LANG: &str = "en";

/// Banner asset description for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBanner {
    pub key: String,
    #[serde(default)]
    pub x_offset: f64,
    #[serde(default)]
    pub y_offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_langs: Vec<String>,
}

impl EventBanner {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            x_offset: 0.0,
            y_offset: 0.0,
            scale: None,
            available_langs: Vec::new(),
        }
    }

    /// Asset key for the requested language.
    ///
    /// Banners without a language list use the bare key. Otherwise the
    /// language is appended when listed, and English is used when it is not.
    #[must_use]
    pub fn resolved_key(&self, lang: Option<&str>) -> String {
        let Some(lang) = lang else {
            return self.key.clone();
        };
        if self.available_langs.is_empty() {
            return self.key.clone();
        }
        let suffix = if self.available_langs.iter().any(|l| l == lang) {
            lang
        } else {
            FALLBACK_LANG
        };
        format!("{}{suffix}", self.key)
    }

    #[must_use]
    pub fn scale_or_default(&self) -> f64 {
        self.scale.unwrap_or(DEFAULT_BANNER_SCALE)
    }
}

/// Time left on an event, split into display components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Round a duration to the nearest second, then split it into days,
    /// hours, minutes and seconds. Rounding can carry into every component.
    #[must_use]
    pub fn from_duration(remaining: Duration) -> Self {
        let total = (remaining.num_milliseconds().abs() + 500) / 1_000;
        let days = total / 86_400;
        let hours = total % 86_400 / 3_600;
        let minutes = total % 3_600 / 60;
        let seconds = total % 60;
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}
