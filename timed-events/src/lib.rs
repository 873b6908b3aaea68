//! Timed Events
//!
//! Time-windowed configuration overlays for game modifiers. A static catalog
//! of events, each live only inside its window, is folded into single
//! effective values (shiny rate, luck boost, boosted species, tier overrides
//! and so on) for whatever instant the caller asks about.
//! This crate has no rendering, scheduling or persistence of its own.

pub mod banner;
pub mod catalog;
pub mod clock;
pub mod engine;
pub mod error;
pub mod event;
pub mod roster;
pub mod window;

// Re-export commonly used types
pub use banner::{Countdown, EventBanner};
pub use catalog::{EventCatalog, default_catalog};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{ActiveEvents, EventEngine};
pub use error::CatalogError;
pub use event::{
    BoostField, EncounterTier, EncounterTierChange, EventCategory, EventDefinition,
    EventEncounter, FlagField, FloorField, ListField, MultiplierField, TierOverride,
    WeatherPoolEntry,
};
pub use roster::Roster;
pub use window::EventWindow;

/// Engine over the bundled catalog and the system clock.
#[must_use]
pub fn default_engine() -> EventEngine<SystemClock> {
    EventEngine::new(default_catalog().clone(), SystemClock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn default_engine_uses_bundled_catalog() {
        let engine = default_engine();
        assert_eq!(engine.catalog().len(), default_catalog().len());
        assert!(engine.catalog().iter().any(|e| e.name == "Jen Day 2025"));
    }

    #[test]
    fn bundled_event_is_live_mid_window() {
        let engine = default_engine();
        let active = engine.at(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert!(active.is_any_active());
        assert!((active.luck_boost() - 3.0).abs() < f64::EPSILON);
        assert_eq!(
            active.banner().map(|b| b.resolved_key(Some("fr"))),
            Some(String::from("jen-header-en"))
        );
        let after = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
        assert!(!engine.at(after).is_any_active());
    }
}
