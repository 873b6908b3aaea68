//! The static catalog of timed events
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::error::CatalogError;
use crate::event::EventDefinition;

const DEFAULT_EVENTS_DATA: &str = include_str!("../assets/events.json");

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    events: Vec<EventDefinition>,
}

/// Ordered, validated list of event definitions.
///
/// Order matters: it decides which event owns singular presentation state
/// and which keyed override lands last.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct EventCatalog {
    events: Vec<EventDefinition>,
}

impl EventCatalog {
    /// Build a catalog, validating every definition.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found, in catalog order.
    pub fn new(events: Vec<EventDefinition>) -> Result<Self, CatalogError> {
        for (index, event) in events.iter().enumerate() {
            event.validate(index)?;
        }

        let mut seen = HashSet::new();
        for event in &events {
            if !seen.insert(event.name.as_str()) {
                log::warn!(
                    "duplicate event name `{}`; queries will aggregate across both",
                    event.name
                );
            }
        }

        log::debug!("loaded event catalog with {} events", events.len());
        Ok(Self { events })
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Load a catalog from JSON text of the form `{ "events": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or any event is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.events)
    }

    /// Load the catalog bundled with the crate, falling back to an empty one.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_EVENTS_DATA).unwrap_or_else(|err| {
            log::error!("bundled event catalog is invalid: {err}");
            Self::empty()
        })
    }

    /// Whether `event` is live at `now` (both window edges exclusive).
    #[must_use]
    pub fn is_active(event: &EventDefinition, now: DateTime<Utc>) -> bool {
        event.window.contains(now)
    }

    #[must_use]
    pub fn events(&self) -> &[EventDefinition] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventDefinition> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a EventCatalog {
    type Item = &'a EventDefinition;
    type IntoIter = std::slice::Iter<'a, EventDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Shared, lazily loaded copy of the bundled catalog.
#[must_use]
pub fn default_catalog() -> &'static EventCatalog {
    static CATALOG: OnceLock<EventCatalog> = OnceLock::new();
    CATALOG.get_or_init(EventCatalog::load_from_static)
}
