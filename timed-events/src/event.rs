//! Event definitions and their sparse override fields
use serde::{Deserialize, Serialize};

use crate::banner::EventBanner;
use crate::error::CatalogError;
use crate::window::EventWindow;

/// Tag used by category queries and timer display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Shiny,
    NoTimerDisplay,
    #[default]
    Luck,
}

impl EventCategory {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shiny => "shiny",
            Self::NoTimerDisplay => "no_timer_display",
            Self::Luck => "luck",
        }
    }

    /// Whether a countdown should be shown for events of this category.
    #[must_use]
    pub const fn shows_timer(self) -> bool {
        !matches!(self, Self::NoTimerDisplay)
    }
}

/// A species featured as a special encounter while the event runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventEncounter {
    pub species: String,
    #[serde(default)]
    pub block_evolution: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_index: Option<u32>,
}

impl EventEncounter {
    #[must_use]
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            block_evolution: false,
            form_index: None,
        }
    }
}

/// Weighted weather entry added to the event weather pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeatherPoolEntry {
    pub weather: String,
    pub weight: u32,
}

/// Rarity tier of a special encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterTier {
    Common,
    Great,
    Ultra,
    Rogue,
    Master,
}

impl EncounterTier {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Great => "great",
            Self::Ultra => "ultra",
            Self::Rogue => "rogue",
            Self::Master => "master",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "common" => Some(Self::Common),
            "great" => Some(Self::Great),
            "ultra" => Some(Self::Ultra),
            "rogue" => Some(Self::Rogue),
            "master" => Some(Self::Master),
            _ => None,
        }
    }
}

/// Per-encounter tier adjustment carried by an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncounterTierChange {
    pub encounter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<EncounterTier>,
    #[serde(default)]
    pub disable: bool,
}

/// Outcome of resolving an encounter's tier against the active events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierOverride {
    Tier(EncounterTier),
    Disabled,
}

impl TierOverride {
    #[must_use]
    pub const fn is_disabled(self) -> bool {
        matches!(self, Self::Disabled)
    }

    #[must_use]
    pub const fn tier(self) -> Option<EncounterTier> {
        match self {
            Self::Tier(tier) => Some(tier),
            Self::Disabled => None,
        }
    }
}

/// One catalog entry: a named window plus whichever overrides it sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub name: String,
    #[serde(default)]
    pub category: EventCategory,
    pub window: EventWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shiny_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub luck_boost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classic_friendship_multiplier: Option<f64>,
    #[serde(default)]
    pub upgrade_unlocked_vouchers: bool,
    #[serde(default)]
    pub boost_fusions: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bonus_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub luck_boosted_species: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub encounters: Vec<EventEncounter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weather: Vec<WeatherPoolEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub encounter_tier_changes: Vec<EncounterTierChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<EventBanner>,
}

impl EventDefinition {
    /// Create an event with no overrides set.
    #[must_use]
    pub fn new(name: impl Into<String>, category: EventCategory, window: EventWindow) -> Self {
        Self {
            name: name.into(),
            category,
            window,
            shiny_multiplier: None,
            luck_boost: None,
            classic_friendship_multiplier: None,
            upgrade_unlocked_vouchers: false,
            boost_fusions: false,
            bonus_items: Vec::new(),
            luck_boosted_species: Vec::new(),
            encounters: Vec::new(),
            weather: Vec::new(),
            encounter_tier_changes: Vec::new(),
            banner: None,
        }
    }

    /// Check the construction-time invariants of this definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the window is inverted, a
    /// numeric override is non-finite, or any identifier is empty. Boosts are
    /// signed; multipliers, floors and the banner scale must not be negative.
    pub fn validate(&self, index: usize) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::MissingName { index });
        }
        if !self.window.is_valid() {
            return Err(CatalogError::InvertedWindow {
                name: self.name.clone(),
                start: self.window.start,
                end: self.window.end,
            });
        }

        for (field, value, signed) in [
            ("shiny_multiplier", self.shiny_multiplier, false),
            ("luck_boost", self.luck_boost, true),
            (
                "classic_friendship_multiplier",
                self.classic_friendship_multiplier,
                false,
            ),
            (
                "banner.scale",
                self.banner.as_ref().and_then(|b| b.scale),
                false,
            ),
        ] {
            if let Some(value) = value {
                self.check_value(field, value, signed)?;
            }
        }

        self.check_ids("bonus_items", self.bonus_items.iter().map(String::as_str))?;
        self.check_ids(
            "luck_boosted_species",
            self.luck_boosted_species.iter().map(String::as_str),
        )?;
        self.check_ids(
            "encounters",
            self.encounters.iter().map(|e| e.species.as_str()),
        )?;
        self.check_ids("weather", self.weather.iter().map(|w| w.weather.as_str()))?;
        self.check_ids(
            "encounter_tier_changes",
            self.encounter_tier_changes
                .iter()
                .map(|c| c.encounter.as_str()),
        )?;
        if let Some(banner) = &self.banner {
            self.check_ids("banner.key", std::iter::once(banner.key.as_str()))?;
        }

        if let Some(entry) = self.weather.iter().find(|w| w.weight == 0) {
            return Err(CatalogError::InvalidValue {
                event: self.name.clone(),
                field: "weather.weight",
                value: f64::from(entry.weight),
            });
        }

        Ok(())
    }

    fn check_value(
        &self,
        field: &'static str,
        value: f64,
        signed: bool,
    ) -> Result<(), CatalogError> {
        if value.is_finite() && (signed || value >= 0.0) {
            Ok(())
        } else {
            Err(CatalogError::InvalidValue {
                event: self.name.clone(),
                field,
                value,
            })
        }
    }

    fn check_ids<'a>(
        &self,
        field: &'static str,
        mut ids: impl Iterator<Item = &'a str>,
    ) -> Result<(), CatalogError> {
        if ids.any(|id| id.trim().is_empty()) {
            return Err(CatalogError::MissingIdentifier {
                event: self.name.clone(),
                field,
            });
        }
        Ok(())
    }
}

/// Multiplier fields, folded by product with identity 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiplierField {
    ShinyRate,
}

impl MultiplierField {
    #[must_use]
    pub const fn extract(self, event: &EventDefinition) -> Option<f64> {
        match self {
            Self::ShinyRate => event.shiny_multiplier,
        }
    }
}

/// Additive boost fields, folded by sum with identity 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoostField {
    Luck,
}

impl BoostField {
    #[must_use]
    pub const fn extract(self, event: &EventDefinition) -> Option<f64> {
        match self {
            Self::Luck => event.luck_boost,
        }
    }
}

/// "Best wins" fields, folded by max starting from a caller baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloorField {
    ClassicFriendship,
}

impl FloorField {
    #[must_use]
    pub const fn extract(self, event: &EventDefinition) -> Option<f64> {
        match self {
            Self::ClassicFriendship => event.classic_friendship_multiplier,
        }
    }
}

/// Feature toggles, folded by logical OR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagField {
    UpgradeUnlockedVouchers,
    BoostFusions,
}

impl FlagField {
    #[must_use]
    pub const fn extract(self, event: &EventDefinition) -> bool {
        match self {
            Self::UpgradeUnlockedVouchers => event.upgrade_unlocked_vouchers,
            Self::BoostFusions => event.boost_fusions,
        }
    }
}

/// Identifier lists, folded by ordered union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    BonusItems,
    LuckBoostedSpecies,
}

impl ListField {
    #[must_use]
    pub fn extract(self, event: &EventDefinition) -> &[String] {
        match self {
            Self::BonusItems => &event.bonus_items,
            Self::LuckBoostedSpecies => &event.luck_boosted_species,
        }
    }
}
