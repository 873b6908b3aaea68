use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use rand::Rng;
use serde::Serialize;
use std::io::Write;

use timed_events::{
    ActiveEvents, Countdown, EncounterTier, EventCatalog, EventDefinition, EventEncounter,
    TierOverride, WeatherPoolEntry,
};

/// One requested keyed-override lookup and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierQuery {
    pub encounter: String,
    pub normal: EncounterTier,
    pub resolved: TierOverride,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveEventSummary {
    pub name: String,
    pub category: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ActiveEventSummary {
    fn from_event(event: &EventDefinition) -> Self {
        Self {
            name: event.name.clone(),
            category: event.category.label().to_string(),
            start: event.window.start,
            end: event.window.end,
        }
    }
}

/// Everything the engine answers at one instant, as plain values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventReport {
    pub evaluated_at: DateTime<Utc>,
    pub catalog_size: usize,
    pub active_events: Vec<ActiveEventSummary>,
    pub shiny_multiplier: f64,
    pub luck_boost: f64,
    pub classic_friendship_multiplier: f64,
    pub upgrade_unlocked_vouchers: bool,
    pub fusions_boosted: bool,
    pub bonus_items: Vec<String>,
    pub luck_boosted_species: Vec<String>,
    pub encounters: Vec<EventEncounter>,
    pub weather: Vec<WeatherPoolEntry>,
    pub disabled_encounters: Vec<String>,
    pub tier_queries: Vec<TierQuery>,
    pub banner_key: Option<String>,
    pub banner_scale: Option<f64>,
    pub countdown: Option<Countdown>,
    pub picked_encounter: Option<EventEncounter>,
}

pub struct ReportOptions<'a, R: Rng + ?Sized> {
    pub friendship_baseline: f64,
    pub lang: Option<&'a str>,
    pub tier_queries: &'a [(String, EncounterTier)],
    pub rng: Option<&'a mut R>,
}

impl EventReport {
    pub fn build<R>(
        catalog: &EventCatalog,
        active: &ActiveEvents<'_>,
        options: ReportOptions<'_, R>,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let tier_queries = options
            .tier_queries
            .iter()
            .map(|(encounter, normal)| TierQuery {
                encounter: encounter.clone(),
                normal: *normal,
                resolved: active.encounter_tier(encounter, *normal),
            })
            .collect();

        let picked_encounter = match (options.rng, active.encounter_roster()) {
            (Some(rng), Some(roster)) => Some(roster.pick(rng).clone()),
            _ => None,
        };

        let banner = active.banner();

        Self {
            evaluated_at: active.now(),
            catalog_size: catalog.len(),
            active_events: active
                .events()
                .iter()
                .map(|e| ActiveEventSummary::from_event(e))
                .collect(),
            shiny_multiplier: active.shiny_multiplier(),
            luck_boost: active.luck_boost(),
            classic_friendship_multiplier: active
                .classic_friendship_multiplier(options.friendship_baseline),
            upgrade_unlocked_vouchers: active.upgrade_unlocked_vouchers(),
            fusions_boosted: active.fusions_boosted(),
            bonus_items: active.bonus_items(),
            luck_boosted_species: active.luck_boosted_species(),
            encounters: active.event_encounters(),
            weather: active.weather_pool(),
            disabled_encounters: active.disabled_encounters(),
            tier_queries,
            banner_key: banner.map(|b| b.resolved_key(options.lang)),
            banner_scale: banner.map(timed_events::EventBanner::scale_or_default),
            countdown: active.countdown(),
            picked_encounter,
        }
    }
}

/// Zero-padded `DDd HHh MMm SSs` rendering of a countdown, or `ended`.
pub fn format_countdown(countdown: &Countdown) -> String {
    if countdown.is_zero() {
        return String::from("ended");
    }
    format!(
        "{:02}d {:02}h {:02}m {:02}s",
        countdown.days, countdown.hours, countdown.minutes, countdown.seconds
    )
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

fn encounter_label(encounter: &EventEncounter) -> String {
    match encounter.form_index {
        Some(form) => format!("{} (form {form})", encounter.species),
        None => encounter.species.clone(),
    }
}

fn tier_label(resolved: TierOverride) -> &'static str {
    match resolved {
        TierOverride::Tier(tier) => tier.label(),
        TierOverride::Disabled => "disabled",
    }
}

pub fn generate_console_report(out: &mut dyn Write, report: &EventReport) -> Result<()> {
    writeln!(out, "{}", "📅 Timed Event Report".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;
    writeln!(out, "Evaluated at: {}", report.evaluated_at.to_rfc3339())?;
    writeln!(out, "Catalog events: {}", report.catalog_size)?;
    writeln!(out)?;

    if report.active_events.is_empty() {
        writeln!(out, "{}", "No events active.".yellow())?;
    } else {
        writeln!(out, "{}", "Active events".bright_green().bold())?;
        for event in &report.active_events {
            writeln!(
                out,
                "  • {} [{}] until {}",
                event.name.green(),
                event.category,
                event.end.to_rfc3339()
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "{}", "Modifiers".bright_yellow().bold())?;
    writeln!(out, "  Shiny multiplier: {}", report.shiny_multiplier)?;
    writeln!(out, "  Luck boost: {}", report.luck_boost)?;
    writeln!(
        out,
        "  Classic friendship multiplier: {}",
        report.classic_friendship_multiplier
    )?;
    writeln!(
        out,
        "  Upgrade unlocked vouchers: {}",
        report.upgrade_unlocked_vouchers
    )?;
    writeln!(out, "  Fusions boosted: {}", report.fusions_boosted)?;
    writeln!(out, "  Bonus items: {}", join_or_none(&report.bonus_items))?;
    writeln!(
        out,
        "  Luck boosted species: {}",
        join_or_none(&report.luck_boosted_species)
    )?;
    let encounters: Vec<String> = report.encounters.iter().map(encounter_label).collect();
    writeln!(out, "  Event encounters: {}", join_or_none(&encounters))?;
    let weather: Vec<String> = report
        .weather
        .iter()
        .map(|w| format!("{} x{}", w.weather, w.weight))
        .collect();
    writeln!(out, "  Weather pool: {}", join_or_none(&weather))?;
    writeln!(
        out,
        "  Disabled encounters: {}",
        join_or_none(&report.disabled_encounters)
    )?;

    for query in &report.tier_queries {
        let resolved = tier_label(query.resolved);
        let resolved = if query.resolved.is_disabled() {
            resolved.red()
        } else {
            resolved.normal()
        };
        writeln!(
            out,
            "  Tier {} (normally {}): {}",
            query.encounter,
            query.normal.label(),
            resolved
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{}", "Display".bright_blue().bold())?;
    match (&report.banner_key, report.banner_scale) {
        (Some(key), Some(scale)) => writeln!(out, "  Banner: {key} (scale {scale})")?,
        _ => writeln!(out, "  Banner: none")?,
    }
    match &report.countdown {
        Some(countdown) => writeln!(out, "  Ends in: {}", format_countdown(countdown))?,
        None => writeln!(out, "  Ends in: hidden")?,
    }
    if let Some(encounter) = &report.picked_encounter {
        writeln!(out, "  Picked encounter: {}", encounter_label(encounter).bold())?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &EventReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &EventReport) -> Result<()> {
    writeln!(out, "# Timed Event Report\n")?;
    writeln!(
        out,
        "_Evaluated at {} against {} catalog events._\n",
        report.evaluated_at.to_rfc3339(),
        report.catalog_size
    )?;

    writeln!(out, "## Active events\n")?;
    if report.active_events.is_empty() {
        writeln!(out, "_None._\n")?;
    } else {
        writeln!(out, "| Event | Category | Start | End |")?;
        writeln!(out, "|-------|----------|-------|-----|")?;
        for event in &report.active_events {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                event.name,
                event.category,
                event.start.to_rfc3339(),
                event.end.to_rfc3339()
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Modifiers\n")?;
    writeln!(out, "| Modifier | Value |")?;
    writeln!(out, "|----------|-------|")?;
    writeln!(out, "| Shiny multiplier | {} |", report.shiny_multiplier)?;
    writeln!(out, "| Luck boost | {} |", report.luck_boost)?;
    writeln!(
        out,
        "| Classic friendship multiplier | {} |",
        report.classic_friendship_multiplier
    )?;
    writeln!(
        out,
        "| Upgrade unlocked vouchers | {} |",
        report.upgrade_unlocked_vouchers
    )?;
    writeln!(out, "| Fusions boosted | {} |", report.fusions_boosted)?;
    writeln!(out, "| Bonus items | {} |", join_or_none(&report.bonus_items))?;
    writeln!(
        out,
        "| Luck boosted species | {} |",
        join_or_none(&report.luck_boosted_species)
    )?;
    writeln!(
        out,
        "| Disabled encounters | {} |",
        join_or_none(&report.disabled_encounters)
    )?;
    for query in &report.tier_queries {
        writeln!(
            out,
            "| Tier of {} | {} |",
            query.encounter,
            tier_label(query.resolved)
        )?;
    }
    if let Some(countdown) = &report.countdown {
        writeln!(out, "| Ends in | {} |", format_countdown(countdown))?;
    }
    Ok(())
}

/// Catalog listing with each event's status at `now`.
pub fn generate_event_list(
    out: &mut dyn Write,
    catalog: &EventCatalog,
    now: DateTime<Utc>,
) -> Result<()> {
    writeln!(out, "Catalog events:")?;
    for event in catalog {
        let status = if EventCatalog::is_active(event, now) {
            "active"
        } else if event.window.has_ended(now) {
            "ended"
        } else {
            "upcoming"
        };
        writeln!(
            out,
            "  {:25} {:18} {} -> {} ({status})",
            event.name,
            event.category.label(),
            event.window.start.to_rfc3339(),
            event.window.end.to_rfc3339()
        )?;
    }
    Ok(())
}
