//! Aggregates a player's shot and swing-flaw history into [`PersonalTendencies`].
//!
//! Tendencies are always rebuilt from the complete sample handed in. Nothing
//! here patches a previous snapshot, so callers must pass the full history
//! (the service merges new batches into the stored history first).

use crate::model::{
    CourseScore, HistoricalShot, LieType, MissPattern, PersonalTendencies, ShotResult, SwingFlaw,
    find_club, format_data_age, round1, round2,
};
use ahash::RandomState;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

pub const MIN_SHOTS_FOR_TENDENCIES: usize = 10;
const DEFAULT_CONFIDENCE: f64 = 0.1;
const MIN_SHOTS_PER_CLUB: usize = 3;
const MIN_BIAS_YARDS: f64 = 2.0;
const MIN_DIRECTIONAL_RESULTS: usize = 5;
const DOMINANT_MISS_FRACTION: f64 = 0.4;
const RECENT_FLAW_WINDOW: usize = 20;
const MIN_FLAW_SEVERITY: u8 = 2;
const MIN_FLAW_OCCURRENCES: usize = 2;
const MAX_RECURRING_FLAWS: usize = 3;
const MIN_SHOTS_PER_LIE: usize = 3;
const FULL_CONFIDENCE_SHOTS: f64 = 100.0;
const SMALL_SAMPLE_SHOTS: usize = 20;
const REFRESH_AFTER_DAYS: i64 = 7;
const MIN_FRESH_CONFIDENCE: f64 = 0.2;
const TREND_SHIFT_YARDS: i32 = 3;

/// Placeholder tendencies for players without enough history.
#[must_use]
pub fn default_tendencies(shot_count: usize, now: DateTime<Utc>) -> PersonalTendencies {
    PersonalTendencies {
        club_bias: BTreeMap::new(),
        miss_pattern: MissPattern::Inconsistent,
        recurring_flaws: Vec::new(),
        lie_preferences: BTreeMap::new(),
        course_performance: BTreeMap::new(),
        confidence_level: DEFAULT_CONFIDENCE,
        shot_count,
        last_updated: now,
    }
}

#[must_use]
pub fn calculate_tendencies(
    shots: &[HistoricalShot],
    flaws: &[SwingFlaw],
    course_scores: Option<&[CourseScore]>,
    now: DateTime<Utc>,
) -> PersonalTendencies {
    if shots.len() < MIN_SHOTS_FOR_TENDENCIES {
        debug!(
            shots = shots.len(),
            "not enough shots for tendencies, using defaults"
        );
        return default_tendencies(shots.len(), now);
    }

    let tendencies = PersonalTendencies {
        club_bias: club_bias(shots),
        miss_pattern: miss_pattern(shots),
        recurring_flaws: recurring_flaws(flaws),
        lie_preferences: lie_preferences(shots),
        course_performance: course_scores.map(course_performance).unwrap_or_default(),
        confidence_level: confidence_level(shots.len()),
        shot_count: shots.len(),
        last_updated: now,
    };
    debug!(
        shots = tendencies.shot_count,
        biased_clubs = tendencies.club_bias.len(),
        miss = %tendencies.miss_pattern,
        confidence = tendencies.confidence_level,
        "tendencies recomputed"
    );
    tendencies
}

/// Mean `actual - intended` per club, kept only for clubs with at least three
/// shots whose average miss exceeds two yards. Catalog clubs are keyed by their
/// catalog name whatever case the history used.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn club_bias(shots: &[HistoricalShot]) -> BTreeMap<String, i32> {
    let mut by_club: HashMap<&str, Vec<f64>, RandomState> = HashMap::default();
    for shot in shots {
        by_club
            .entry(find_club(&shot.club).map_or(shot.club.as_str(), |c| c.name))
            .or_default()
            .push(shot.actual_distance - shot.intended_distance);
    }

    by_club
        .into_iter()
        .filter(|(_, diffs)| diffs.len() >= MIN_SHOTS_PER_CLUB)
        .filter_map(|(club, diffs)| {
            let mean = diffs.iter().sum::<f64>() / diffs.len() as f64;
            (mean.abs() > MIN_BIAS_YARDS).then(|| (club.to_string(), mean.round() as i32))
        })
        .collect()
}

/// Dominant direction among left/right/good results; short, long and poor are ignored.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn miss_pattern(shots: &[HistoricalShot]) -> MissPattern {
    let (mut left, mut right, mut straight) = (0usize, 0usize, 0usize);
    for shot in shots {
        match shot.result {
            ShotResult::Left => left += 1,
            ShotResult::Right => right += 1,
            ShotResult::Good => straight += 1,
            ShotResult::Short | ShotResult::Long | ShotResult::Poor => {}
        }
    }

    let total = left + right + straight;
    if total < MIN_DIRECTIONAL_RESULTS {
        return MissPattern::Inconsistent;
    }
    let total = total as f64;
    if left as f64 / total > DOMINANT_MISS_FRACTION {
        MissPattern::Left
    } else if right as f64 / total > DOMINANT_MISS_FRACTION {
        MissPattern::Right
    } else {
        MissPattern::Straight
    }
}

/// Up to three flaw codes that show up at least twice (severity 2+) in the 20 most recent records.
#[must_use]
pub fn recurring_flaws(flaws: &[SwingFlaw]) -> Vec<String> {
    let mut recent: Vec<&SwingFlaw> = flaws.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));

    let mut counts: HashMap<&str, usize, RandomState> = HashMap::default();
    for flaw in recent
        .into_iter()
        .take(RECENT_FLAW_WINDOW)
        .filter(|f| f.severity >= MIN_FLAW_SEVERITY)
    {
        *counts.entry(flaw.flaw_code.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(_, n)| *n >= MIN_FLAW_OCCURRENCES)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(MAX_RECURRING_FLAWS)
        .map(|(code, _)| code.to_string())
        .collect()
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn lie_preferences(shots: &[HistoricalShot]) -> BTreeMap<LieType, f64> {
    let mut by_lie: HashMap<LieType, (usize, usize), RandomState> = HashMap::default();
    for shot in shots {
        let entry = by_lie.entry(shot.lie_type).or_insert((0, 0));
        if shot.result == ShotResult::Good {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    by_lie
        .into_iter()
        .filter(|(_, (_, total))| *total >= MIN_SHOTS_PER_LIE)
        .map(|(lie, (good, total))| (lie, round2(good as f64 / total as f64)))
        .collect()
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn course_performance(scores: &[CourseScore]) -> BTreeMap<String, f64> {
    let mut by_course: HashMap<&str, (f64, usize), RandomState> = HashMap::default();
    for score in scores {
        let entry = by_course.entry(score.course_id.as_str()).or_insert((0.0, 0));
        entry.0 += score.score;
        entry.1 += 1;
    }

    by_course
        .into_iter()
        .map(|(course, (sum, n))| (course.to_string(), round1(sum / n as f64)))
        .collect()
}

/// `min(n/100, 1)`, halved below 20 shots.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn confidence_level(shot_count: usize) -> f64 {
    let base = (shot_count as f64 / FULL_CONFIDENCE_SHOTS).min(1.0);
    let scaled = if shot_count < SMALL_SAMPLE_SHOTS {
        base * 0.5
    } else {
        base
    };
    round2(scaled)
}

#[must_use]
pub fn needs_refresh(tendencies: &PersonalTendencies, now: DateTime<Utc>) -> bool {
    now - tendencies.last_updated > Duration::days(REFRESH_AFTER_DAYS)
        || tendencies.confidence_level < MIN_FRESH_CONFIDENCE
}

pub(crate) fn bias_direction(bias: i32) -> &'static str {
    if bias < 0 { "short" } else { "long" }
}

#[must_use]
pub fn generate_personal_reasoning(tendencies: &PersonalTendencies, club: &str) -> String {
    let mut parts = Vec::new();
    if let Some(&bias) = tendencies.club_bias.get(club) {
        parts.push(format!(
            "Your {club} tends to finish {} yards {}.",
            bias.abs(),
            bias_direction(bias)
        ));
    }
    match tendencies.miss_pattern {
        MissPattern::Left | MissPattern::Right => {
            parts.push(format!(
                "Your misses tend to go {}.",
                tendencies.miss_pattern
            ));
        }
        MissPattern::Straight => parts.push("Your ball flight is usually straight.".to_string()),
        MissPattern::Inconsistent => {}
    }
    if parts.is_empty() {
        format!("Not enough personal data yet to adjust your {club}.")
    } else {
        parts.join(" ")
    }
}

#[must_use]
pub fn get_confidence_description(confidence_level: f64) -> &'static str {
    if confidence_level >= 0.8 {
        "High confidence - based on extensive shot history"
    } else if confidence_level >= 0.5 {
        "Moderate confidence - based on a solid shot history"
    } else if confidence_level >= 0.2 {
        "Building confidence - more shots will sharpen these recommendations"
    } else {
        "Limited data - recommendations are mostly general"
    }
}

/// Human-readable differences between two tendency snapshots, in a stable order:
/// miss pattern, then club bias by club name, then flaws.
#[must_use]
pub fn detect_trend_changes(
    previous: &PersonalTendencies,
    current: &PersonalTendencies,
) -> Vec<String> {
    let mut changes = Vec::new();

    if previous.miss_pattern != current.miss_pattern {
        changes.push(format!(
            "Miss pattern changed from {} to {}",
            previous.miss_pattern, current.miss_pattern
        ));
    }

    for (club, &bias) in &current.club_bias {
        match previous.club_bias.get(club) {
            None => changes.push(format!(
                "New tendency: {club} finishing {} yards {}",
                bias.abs(),
                bias_direction(bias)
            )),
            Some(&old) if (bias - old).abs() >= TREND_SHIFT_YARDS => changes.push(format!(
                "{club} bias moved from {old:+} to {bias:+} yards"
            )),
            Some(_) => {}
        }
    }
    for club in previous.club_bias.keys() {
        if !current.club_bias.contains_key(club) {
            changes.push(format!("{club} distance is now on target"));
        }
    }

    for flaw in &current.recurring_flaws {
        if !previous.recurring_flaws.contains(flaw) {
            changes.push(format!("New recurring flaw: {flaw}"));
        }
    }
    for flaw in &previous.recurring_flaws {
        if !current.recurring_flaws.contains(flaw) {
            changes.push(format!("Resolved flaw: {flaw}"));
        }
    }

    changes
}

#[must_use]
pub fn summarize_tendencies(tendencies: &PersonalTendencies, now: DateTime<Utc>) -> String {
    format!(
        "{} shots analyzed, miss pattern {}, updated {} ago",
        tendencies.shot_count,
        tendencies.miss_pattern,
        format_data_age(now - tendencies.last_updated)
    )
}
