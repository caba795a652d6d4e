mod common;
use crate::common::{base_date, course, flaw, repeat_shot, shot, shot_on, tendencies_with_bias};

use chrono::Duration;
use rusty_caddy::caddy::{
    calculate_tendencies, club_bias, confidence_level, detect_trend_changes,
    generate_personal_reasoning, get_confidence_description, miss_pattern, needs_refresh,
    recurring_flaws, summarize_tendencies,
};
use rusty_caddy::model::{LieType, MissPattern, ShotResult};

#[test]
fn test2_scenario_c_seven_iron_plays_short() {
    let shots = repeat_shot(12, "7-Iron", 150.0, 142.0, ShotResult::Good);
    let t = calculate_tendencies(&shots, &[], None, base_date());
    assert_eq!(t.club_bias.get("7-Iron"), Some(&-8));
    assert_eq!(t.shot_count, 12);
    assert_eq!(t.last_updated, base_date());
}

#[test]
fn test2_small_samples_get_defaults() {
    let shots = repeat_shot(9, "7-Iron", 150.0, 130.0, ShotResult::Right);
    let flaws = [flaw("sway", 3, 1), flaw("sway", 3, 2)];
    let t = calculate_tendencies(&shots, &flaws, None, base_date());
    assert!(t.club_bias.is_empty());
    assert_eq!(t.miss_pattern, MissPattern::Inconsistent);
    assert!(t.recurring_flaws.is_empty());
    assert!(t.lie_preferences.is_empty());
    assert!(t.course_performance.is_empty());
    assert!((t.confidence_level - 0.1).abs() < 1e-9);
}

#[test]
fn test2_club_bias_needs_three_shots_and_two_yards() {
    let mut shots = repeat_shot(2, "5-Iron", 170.0, 150.0, ShotResult::Good);
    shots.extend(repeat_shot(3, "8-Iron", 140.0, 142.0, ShotResult::Good));
    shots.push(shot("9-Iron", 130.0, 132.0, ShotResult::Good));
    shots.push(shot("9-Iron", 130.0, 133.0, ShotResult::Good));
    shots.push(shot("9-Iron", 130.0, 133.0, ShotResult::Good));

    let bias = club_bias(&shots);
    assert!(!bias.contains_key("5-Iron"), "only two 5-Iron shots");
    assert!(!bias.contains_key("8-Iron"), "exactly two yards is not a bias");
    assert_eq!(bias.get("9-Iron"), Some(&3));
    assert_eq!(bias.len(), 1);
}

#[test]
fn test2_club_bias_uses_catalog_names() {
    let mut shots = repeat_shot(6, "7-iron", 150.0, 142.0, ShotResult::Good);
    shots.extend(repeat_shot(6, " 7-IRON ", 150.0, 142.0, ShotResult::Good));
    shots.extend(repeat_shot(3, "Chipper", 30.0, 40.0, ShotResult::Good));

    let bias = club_bias(&shots);
    assert_eq!(bias.get("7-Iron"), Some(&-8));
    assert!(!bias.contains_key("7-iron"));
    assert_eq!(bias.get("Chipper"), Some(&10));
}

#[test]
fn test2_miss_pattern_needs_five_directional_results() {
    let mut shots = repeat_shot(4, "7-Iron", 150.0, 150.0, ShotResult::Left);
    shots.extend(repeat_shot(20, "7-Iron", 150.0, 140.0, ShotResult::Short));
    assert_eq!(miss_pattern(&shots), MissPattern::Inconsistent);

    let mut shots = repeat_shot(3, "7-Iron", 150.0, 150.0, ShotResult::Left);
    shots.push(shot("7-Iron", 150.0, 150.0, ShotResult::Right));
    shots.push(shot("7-Iron", 150.0, 150.0, ShotResult::Good));
    assert_eq!(miss_pattern(&shots), MissPattern::Left);

    let mut shots = repeat_shot(3, "7-Iron", 150.0, 150.0, ShotResult::Right);
    shots.extend(repeat_shot(4, "7-Iron", 150.0, 150.0, ShotResult::Good));
    assert_eq!(miss_pattern(&shots), MissPattern::Right);

    // 2 of 5 is exactly 0.4, not above it
    let mut shots = repeat_shot(2, "7-Iron", 150.0, 150.0, ShotResult::Left);
    shots.extend(repeat_shot(3, "7-Iron", 150.0, 150.0, ShotResult::Good));
    assert_eq!(miss_pattern(&shots), MissPattern::Straight);
}

#[test]
fn test2_recurring_flaws_ranked_and_capped() {
    let flaws = vec![
        flaw("early_extension", 3, 1),
        flaw("early_extension", 3, 2),
        flaw("early_extension", 2, 3),
        flaw("over_the_top", 2, 4),
        flaw("over_the_top", 2, 5),
        flaw("casting", 4, 6),
        flaw("casting", 2, 7),
        flaw("chicken_wing", 1, 8),
        flaw("chicken_wing", 1, 9),
        flaw("sway", 3, 10),
    ];
    assert_eq!(
        recurring_flaws(&flaws),
        vec!["early_extension", "casting", "over_the_top"]
    );
}

#[test]
fn test2_recurring_flaws_only_look_at_recent_twenty() {
    let mut flaws: Vec<_> = (0..20).map(|d| flaw("grip", 1, d)).collect();
    flaws.extend((30..35).map(|d| flaw("reverse_pivot", 3, d)));
    assert!(recurring_flaws(&flaws).is_empty());
}

#[test]
fn test2_lie_preferences_and_course_performance() {
    use LieType::{Fairway, Rough, Sand, Tee};
    use ShotResult::{Good, Poor, Short};

    let mut shots = Vec::new();
    shots.extend((0..3).map(|d| shot_on("7-Iron", 150.0, 150.0, Good, Fairway, d)));
    shots.push(shot_on("7-Iron", 150.0, 150.0, Poor, Fairway, 4));
    shots.push(shot_on("8-Iron", 140.0, 130.0, Good, Rough, 5));
    shots.extend((6..8).map(|d| shot_on("8-Iron", 140.0, 125.0, Short, Rough, d)));
    shots.extend((8..11).map(|d| shot_on("Sand Wedge", 60.0, 40.0, Poor, Sand, d)));
    shots.extend((11..13).map(|d| shot_on("Driver", 240.0, 240.0, Good, Tee, d)));

    let scores = vec![course("pebble", 72.0), course("pebble", 75.0), course("torrey", 80.0)];
    let t = calculate_tendencies(&shots, &[], Some(scores.as_slice()), base_date());

    assert_eq!(t.lie_preferences.get(&LieType::Fairway), Some(&0.75));
    assert_eq!(t.lie_preferences.get(&LieType::Rough), Some(&0.33));
    assert_eq!(t.lie_preferences.get(&LieType::Sand), Some(&0.0));
    assert!(!t.lie_preferences.contains_key(&LieType::Tee));
    assert_eq!(t.course_performance.get("pebble"), Some(&73.5));
    assert_eq!(t.course_performance.get("torrey"), Some(&80.0));
}

#[test]
fn test2_confidence_level_scaling() {
    assert!((confidence_level(10) - 0.05).abs() < 1e-9);
    assert!((confidence_level(12) - 0.06).abs() < 1e-9);
    assert!((confidence_level(20) - 0.2).abs() < 1e-9);
    assert!((confidence_level(50) - 0.5).abs() < 1e-9);
    assert!((confidence_level(100) - 1.0).abs() < 1e-9);
    assert!((confidence_level(250) - 1.0).abs() < 1e-9);

    let levels: Vec<f64> = (20..=100).map(confidence_level).collect();
    assert!(levels.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test2_needs_refresh_on_age_or_low_confidence() {
    let now = base_date();
    let mut t = tendencies_with_bias("7-Iron", -8, 0.5);

    t.last_updated = now - Duration::days(1);
    assert!(!needs_refresh(&t, now));

    t.last_updated = now - Duration::days(8);
    assert!(needs_refresh(&t, now));

    t.last_updated = now - Duration::days(1);
    t.confidence_level = 0.1;
    assert!(needs_refresh(&t, now));
}

#[test]
fn test2_text_helpers_are_stable() {
    let mut t = tendencies_with_bias("7-Iron", -8, 0.5);
    t.miss_pattern = MissPattern::Right;
    assert_eq!(
        generate_personal_reasoning(&t, "7-Iron"),
        "Your 7-Iron tends to finish 8 yards short. Your misses tend to go right."
    );

    t.miss_pattern = MissPattern::Inconsistent;
    assert_eq!(
        generate_personal_reasoning(&t, "Driver"),
        "Not enough personal data yet to adjust your Driver."
    );

    assert_eq!(
        get_confidence_description(0.85),
        "High confidence - based on extensive shot history"
    );
    assert_eq!(
        get_confidence_description(0.5),
        "Moderate confidence - based on a solid shot history"
    );
    assert_eq!(
        get_confidence_description(0.2),
        "Building confidence - more shots will sharpen these recommendations"
    );
    assert_eq!(
        get_confidence_description(0.05),
        "Limited data - recommendations are mostly general"
    );

    t.shot_count = 12;
    t.miss_pattern = MissPattern::Right;
    t.last_updated = base_date() - Duration::days(3);
    assert_eq!(
        summarize_tendencies(&t, base_date()),
        "12 shots analyzed, miss pattern right, updated 3 days ago"
    );
}

#[test]
fn test2_detect_trend_changes() {
    let mut previous = tendencies_with_bias("7-Iron", -8, 0.5);
    previous.club_bias.insert("Driver".to_string(), 10);
    previous.club_bias.insert("5-Iron".to_string(), -4);
    previous.recurring_flaws = vec!["sway".to_string()];
    previous.miss_pattern = MissPattern::Right;

    let mut current = tendencies_with_bias("7-Iron", -3, 0.6);
    current.club_bias.insert("5-Iron".to_string(), -5);
    current.club_bias.insert("Pitching Wedge".to_string(), 4);
    current.recurring_flaws = vec!["casting".to_string()];
    current.miss_pattern = MissPattern::Straight;

    assert_eq!(
        detect_trend_changes(&previous, &current),
        vec![
            "Miss pattern changed from right to straight",
            "7-Iron bias moved from -8 to -3 yards",
            "New tendency: Pitching Wedge finishing 4 yards long",
            "Driver distance is now on target",
            "New recurring flaw: casting",
            "Resolved flaw: sway",
        ]
    );
    assert!(detect_trend_changes(&current, &current).is_empty());
}
