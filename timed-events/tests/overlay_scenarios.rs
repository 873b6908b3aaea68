use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use timed_events::{
    CatalogError, EncounterTier, EncounterTierChange, EventCatalog, EventCategory,
    EventDefinition, EventEncounter, EventEngine, EventWindow, FixedClock, ListField,
    MultiplierField, TierOverride,
};

fn ts(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, 0, 0, 0).unwrap()
}

fn event(name: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> EventDefinition {
    EventDefinition::new(name, EventCategory::Luck, EventWindow::new(start, end))
}

fn engine_at(events: Vec<EventDefinition>, now: DateTime<Utc>) -> EventEngine<FixedClock> {
    EventEngine::new(EventCatalog::new(events).expect("valid catalog"), FixedClock(now))
}

#[test]
fn empty_catalog_has_no_active_events() {
    let engine = engine_at(Vec::new(), ts(6, 1));
    let active = engine.current();
    assert!(!active.is_any_active());
    let shiny = active.product_multiplier(MultiplierField::ShinyRate);
    assert!((shiny - 1.0).abs() < f64::EPSILON);
}

#[test]
fn single_shiny_event_doubles_rate() {
    let mut shiny = event("Shiny Week", ts(6, 1), ts(6, 8));
    shiny.category = EventCategory::Shiny;
    shiny.shiny_multiplier = Some(2.0);
    let engine = engine_at(vec![shiny], ts(6, 3));
    let active = engine.current();
    let shiny = active.product_multiplier(MultiplierField::ShinyRate);
    assert!((shiny - 2.0).abs() < f64::EPSILON);
    assert!(active.has_category(EventCategory::Shiny));
}

#[test]
fn luck_boosts_add_up() {
    let mut a = event("A", ts(6, 1), ts(6, 30));
    a.luck_boost = Some(3.0);
    let mut b = event("B", ts(6, 10), ts(7, 10));
    b.luck_boost = Some(2.0);
    let engine = engine_at(vec![a, b], ts(6, 15));
    assert!((engine.current().luck_boost() - 5.0).abs() < f64::EPSILON);
}

#[test]
fn negative_luck_boost_offsets_positive_ones() {
    let mut a = event("Festival", ts(6, 1), ts(6, 30));
    a.luck_boost = Some(3.0);
    let mut b = event("Black Cat", ts(6, 10), ts(7, 10));
    b.luck_boost = Some(-1.0);
    let engine = engine_at(vec![a, b], ts(6, 15));
    assert!((engine.current().luck_boost() - 2.0).abs() < f64::EPSILON);
}

#[test]
fn luck_sum_ignores_catalog_order() {
    let mut events = Vec::new();
    for (i, boost) in [1.5, 2.0, 0.25, 4.0].into_iter().enumerate() {
        let mut e = event(&format!("E{i}"), ts(6, 1), ts(6, 30));
        e.luck_boost = Some(boost);
        events.push(e);
    }
    let forward = engine_at(events.clone(), ts(6, 2)).current().luck_boost();
    events.reverse();
    let backward = engine_at(events.clone(), ts(6, 2)).current().luck_boost();
    events.rotate_left(1);
    let rotated = engine_at(events, ts(6, 2)).current().luck_boost();
    assert!((forward - 7.75).abs() < 1e-9);
    assert!((forward - backward).abs() < 1e-9);
    assert!((forward - rotated).abs() < 1e-9);
}

#[test]
fn boosted_species_union_keeps_first_seen_order() {
    let mut a = event("A", ts(6, 1), ts(6, 30));
    a.luck_boosted_species = vec!["a".into(), "b".into()];
    let mut b = event("B", ts(6, 1), ts(6, 30));
    b.luck_boosted_species = vec!["b".into(), "c".into()];
    let engine = engine_at(vec![a, b], ts(6, 5));
    assert_eq!(
        engine.current().union_list(ListField::LuckBoostedSpecies),
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
}

#[test]
fn shared_bonus_item_appears_once() {
    let mut a = event("A", ts(6, 1), ts(6, 30));
    a.bonus_items = vec!["hyper_potion".into(), "rare_candy".into(), "hyper_potion".into()];
    let mut b = event("B", ts(6, 1), ts(6, 30));
    b.bonus_items = vec!["rare_candy".into()];
    let engine = engine_at(vec![a, b], ts(6, 5));
    let items = engine.current().bonus_items();
    assert_eq!(items, vec!["hyper_potion".to_string(), "rare_candy".to_string()]);
}

#[test]
fn zero_length_window_is_rejected() {
    let jan_first = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let err = EventCatalog::new(vec![event("Instant", jan_first, jan_first)]).unwrap_err();
    assert!(matches!(err, CatalogError::InvertedWindow { .. }));
}

#[test]
fn outside_every_window_looks_the_same() {
    let mut first = event("First", ts(3, 1), ts(3, 10));
    first.shiny_multiplier = Some(3.0);
    first.luck_boost = Some(1.0);
    first.boost_fusions = true;
    first.luck_boosted_species = vec!["x".into()];
    first.encounter_tier_changes = vec![EncounterTierChange {
        encounter: "k".into(),
        tier: None,
        disable: true,
    }];
    let mut second = event("Second", ts(5, 1), ts(5, 10));
    second.classic_friendship_multiplier = Some(9.0);
    let events = vec![first, second];

    for now in [ts(1, 1), ts(4, 1), ts(12, 1), ts(3, 10), ts(5, 1)] {
        let engine = engine_at(events.clone(), now);
        let active = engine.current();
        assert!(!active.is_any_active(), "no event should be live at {now}");
        assert!((active.shiny_multiplier() - 1.0).abs() < f64::EPSILON);
        assert!(active.luck_boost().abs() < f64::EPSILON);
        assert!((active.classic_friendship_multiplier(2.0) - 2.0).abs() < f64::EPSILON);
        assert!(!active.fusions_boosted());
        assert!(active.luck_boosted_species().is_empty());
        assert!(active.disabled_encounters().is_empty());
        assert_eq!(
            active.encounter_tier("k", EncounterTier::Common),
            TierOverride::Tier(EncounterTier::Common)
        );
    }
}

#[test]
fn window_edges_are_never_active() {
    let e = event("Edges", ts(8, 1), ts(8, 2));
    let engine = engine_at(vec![e], ts(8, 1));
    assert!(!engine.at(ts(8, 1)).is_any_active());
    assert!(!engine.at(ts(8, 2)).is_any_active());
    assert!(engine.at(ts(8, 1) + Duration::milliseconds(1)).is_any_active());
    assert!(engine.at(ts(8, 2) - Duration::milliseconds(1)).is_any_active());
}

#[test]
fn disable_beats_an_earlier_enable() {
    let mut a = event("A", ts(6, 1), ts(6, 30));
    a.encounter_tier_changes = vec![EncounterTierChange {
        encounter: "safari_zone".into(),
        tier: Some(EncounterTier::Great),
        disable: false,
    }];
    let mut b = event("B", ts(6, 1), ts(6, 30));
    b.encounter_tier_changes = vec![EncounterTierChange {
        encounter: "safari_zone".into(),
        tier: None,
        disable: true,
    }];
    let engine = engine_at(vec![a, b], ts(6, 5));
    assert_eq!(
        engine
            .current()
            .resolve_keyed_override("safari_zone", EncounterTier::Ultra),
        TierOverride::Disabled
    );
}

#[test]
fn overlapping_banners_follow_catalog_order() {
    let mut spring = event("Spring", ts(4, 1), ts(4, 30));
    spring.banner = Some(timed_events::EventBanner::new("spring-"));
    let mut summer = event("Summer", ts(4, 20), ts(8, 1));
    summer.banner = Some(timed_events::EventBanner::new("summer-"));

    let engine = engine_at(vec![spring.clone(), summer.clone()], ts(4, 25));
    assert_eq!(engine.current().banner().map(|b| b.key.clone()), Some("spring-".into()));

    let engine = engine_at(vec![summer, spring], ts(4, 25));
    assert_eq!(engine.current().banner().map(|b| b.key.clone()), Some("summer-".into()));
}

#[test]
fn encounter_roster_draws_only_event_species() {
    let mut e = event("Roster", ts(6, 1), ts(6, 30));
    e.encounters = vec![EventEncounter::new("pikachu"), EventEncounter::new("dragonite")];
    let engine = engine_at(vec![e], ts(6, 5));
    let roster = engine.current().encounter_roster().expect("roster");
    let mut rng = ChaCha20Rng::seed_from_u64(0x00C0_FFEE);
    for _ in 0..20 {
        let pick = roster.pick(&mut rng);
        assert!(pick.species == "pikachu" || pick.species == "dragonite");
    }
}

#[test]
fn results_track_the_clock_without_invalidation() {
    let mut e = event("Weekend", ts(9, 6), ts(9, 8));
    e.luck_boost = Some(2.0);
    let engine = engine_at(vec![e], ts(9, 7));
    assert!((engine.current().luck_boost() - 2.0).abs() < f64::EPSILON);
    assert!(engine.at(ts(9, 9)).luck_boost().abs() < f64::EPSILON);
}
