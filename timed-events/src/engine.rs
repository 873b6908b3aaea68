//! Aggregate queries over the events active at one instant
//!
//! [`EventEngine`] pairs a catalog with a clock. Every query goes through an
//! [`ActiveEvents`] view, which filters the catalog once for a single instant
//! so that a caller touching several fields sees one consistent moment.
//!
//! Combination rules per field kind:
//!
//! | kind        | rule                         | empty result     |
//! |-------------|------------------------------|------------------|
//! | multiplier  | product                      | `1.0`            |
//! | boost       | sum                          | `0.0`            |
//! | floor       | max from caller baseline     | baseline         |
//! | flag        | logical OR                   | `false`          |
//! | list        | ordered union, first seen    | empty            |
//! | weather     | concatenation                | empty            |
//! | keyed       | disable dominates, else last | caller default   |
//! | banner      | first active event           | `None`           |
//!
//! Catalog order sets the order of lists and weather, and picks the winner of
//! the last two rows. Numeric folds do not depend on it.
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::hash::Hash;

use crate::banner::{Countdown, EventBanner};
use crate::catalog::EventCatalog;
use crate::clock::Clock;
use crate::error::CatalogError;
use crate::event::{
    BoostField, EncounterTier, EncounterTierChange, EventCategory, EventDefinition,
    EventEncounter, FlagField, FloorField, ListField, MultiplierField, TierOverride,
    WeatherPoolEntry,
};
use crate::roster::Roster;

/// Query front-end for a catalog and a time source.
#[derive(Debug, Clone)]
pub struct EventEngine<C: Clock> {
    catalog: EventCatalog,
    clock: C,
}

impl<C: Clock> EventEngine<C> {
    pub const fn new(catalog: EventCatalog, clock: C) -> Self {
        Self { catalog, clock }
    }

    #[must_use]
    pub const fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Evaluate the active set for the clock's current instant.
    ///
    /// The clock is read exactly once.
    #[must_use]
    pub fn current(&self) -> ActiveEvents<'_> {
        self.at(self.clock.now())
    }

    /// Evaluate the active set for an explicit instant.
    #[must_use]
    pub fn at(&self, now: DateTime<Utc>) -> ActiveEvents<'_> {
        ActiveEvents::evaluate(&self.catalog, now)
    }
}

/// The catalog events live at one instant, in catalog order.
#[derive(Debug, Clone)]
pub struct ActiveEvents<'a> {
    now: DateTime<Utc>,
    events: Vec<&'a EventDefinition>,
}

impl<'a> ActiveEvents<'a> {
    #[must_use]
    pub fn evaluate(catalog: &'a EventCatalog, now: DateTime<Utc>) -> Self {
        let events: Vec<_> = catalog
            .iter()
            .filter(|event| EventCatalog::is_active(event, now))
            .collect();
        log::trace!(
            "{} of {} events active at {now}",
            events.len(),
            catalog.len()
        );
        Self { now, events }
    }

    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    #[must_use]
    pub fn events(&self) -> &[&'a EventDefinition] {
        &self.events
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'a str> {
        self.events.iter().map(|e| e.name.as_str()).collect()
    }

    #[must_use]
    pub fn is_any_active(&self) -> bool {
        !self.events.is_empty()
    }

    /// First active event in catalog order; owner of the banner and timer.
    #[must_use]
    pub fn first(&self) -> Option<&'a EventDefinition> {
        self.events.first().copied()
    }

    #[must_use]
    pub fn has_category(&self, category: EventCategory) -> bool {
        self.events.iter().any(|e| e.category == category)
    }

    #[must_use]
    pub fn product_multiplier(&self, field: MultiplierField) -> f64 {
        self.events
            .iter()
            .filter_map(|e| field.extract(e))
            .product()
    }

    #[must_use]
    pub fn sum_boost(&self, field: BoostField) -> f64 {
        self.events.iter().filter_map(|e| field.extract(e)).sum()
    }

    #[must_use]
    pub fn max_floor(&self, field: FloorField, baseline: f64) -> f64 {
        self.events
            .iter()
            .filter_map(|e| field.extract(e))
            .fold(baseline, f64::max)
    }

    #[must_use]
    pub fn any_flag(&self, field: FlagField) -> bool {
        self.events.iter().any(|e| field.extract(e))
    }

    /// Union of an identifier list across active events.
    ///
    /// Order is first-seen: catalog order, then order within each list.
    #[must_use]
    pub fn union_list(&self, field: ListField) -> Vec<String> {
        self.union_by(|e| field.extract(e))
    }

    fn union_by<T, F>(&self, extract: F) -> Vec<T>
    where
        T: Clone + Eq + Hash + 'a,
        F: Fn(&'a EventDefinition) -> &'a [T],
    {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for &event in &self.events {
            for value in extract(event) {
                if seen.insert(value) {
                    merged.push(value.clone());
                }
            }
        }
        merged
    }

    /// Resolve a keyed override for `key`.
    ///
    /// A disable from any active event wins outright. Otherwise the last
    /// matching entry in catalog order decides; an entry without a tier, or
    /// no match at all, yields `default`.
    #[must_use]
    pub fn resolve_keyed_override(&self, key: &str, default: EncounterTier) -> TierOverride {
        let mut resolved = TierOverride::Tier(default);
        for change in self.keyed_entries().filter(|c| c.encounter == key) {
            if change.disable {
                return TierOverride::Disabled;
            }
            resolved = TierOverride::Tier(change.tier.unwrap_or(default));
        }
        resolved
    }

    /// Distinct keys with at least one active entry matching `predicate`,
    /// in first-seen order.
    #[must_use]
    pub fn distinct_keys_with_flag<P>(&self, predicate: P) -> Vec<String>
    where
        P: Fn(&EncounterTierChange) -> bool,
    {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for change in self.keyed_entries() {
            if predicate(change) && seen.insert(change.encounter.as_str()) {
                keys.push(change.encounter.clone());
            }
        }
        keys
    }

    fn keyed_entries(&self) -> impl Iterator<Item = &'a EncounterTierChange> + '_ {
        self.events
            .iter()
            .copied()
            .flat_map(|e| e.encounter_tier_changes.iter())
    }

    /// Product of every active shiny multiplier.
    ///
    /// All active events count, whatever their category; the category only
    /// gates [`Self::has_category`] and the countdown.
    #[must_use]
    pub fn shiny_multiplier(&self) -> f64 {
        self.product_multiplier(MultiplierField::ShinyRate)
    }

    #[must_use]
    pub fn luck_boost(&self) -> f64 {
        self.sum_boost(BoostField::Luck)
    }

    #[must_use]
    pub fn classic_friendship_multiplier(&self, baseline: f64) -> f64 {
        self.max_floor(FloorField::ClassicFriendship, baseline)
    }

    #[must_use]
    pub fn upgrade_unlocked_vouchers(&self) -> bool {
        self.any_flag(FlagField::UpgradeUnlockedVouchers)
    }

    #[must_use]
    pub fn fusions_boosted(&self) -> bool {
        self.any_flag(FlagField::BoostFusions)
    }

    #[must_use]
    pub fn bonus_items(&self) -> Vec<String> {
        self.union_list(ListField::BonusItems)
    }

    #[must_use]
    pub fn luck_boosted_species(&self) -> Vec<String> {
        self.union_list(ListField::LuckBoostedSpecies)
    }

    #[must_use]
    pub fn event_encounters(&self) -> Vec<EventEncounter> {
        self.union_by(|e| e.encounters.as_slice())
    }

    /// Every active weather entry, in catalog order.
    ///
    /// Weighted pools are concatenated rather than de-duplicated: two events
    /// listing the same entry both contribute their weight.
    #[must_use]
    pub fn weather_pool(&self) -> Vec<WeatherPoolEntry> {
        self.events
            .iter()
            .flat_map(|e| e.weather.iter().cloned())
            .collect()
    }

    /// Every keyed entry of the active set, in catalog order.
    #[must_use]
    pub fn encounter_tier_changes(&self) -> Vec<EncounterTierChange> {
        self.keyed_entries().cloned().collect()
    }

    #[must_use]
    pub fn disabled_encounters(&self) -> Vec<String> {
        self.distinct_keys_with_flag(|c| c.disable)
    }

    #[must_use]
    pub fn encounter_tier(&self, encounter: &str, normal: EncounterTier) -> TierOverride {
        self.resolve_keyed_override(encounter, normal)
    }

    /// Banner of the first active event, if that event has one.
    #[must_use]
    pub fn banner(&self) -> Option<&'a EventBanner> {
        self.first().and_then(|e| e.banner.as_ref())
    }

    #[must_use]
    pub fn has_banner(&self) -> bool {
        self.banner().is_some()
    }

    /// Time left on the first active event, unless it hides its timer.
    #[must_use]
    pub fn countdown(&self) -> Option<Countdown> {
        let event = self.first()?;
        if !event.category.shows_timer() {
            return None;
        }
        Some(Countdown::from_duration(event.window.remaining(self.now)))
    }

    /// Roster of the active event encounters, or `None` if there are none.
    #[must_use]
    pub fn encounter_roster(&self) -> Option<Roster<EventEncounter>> {
        match Roster::new(self.event_encounters()) {
            Ok(roster) => Some(roster),
            Err(CatalogError::EmptyRoster) => None,
            Err(err) => {
                log::error!("unexpected roster error: {err}");
                None
            }
        }
    }
}
