use super::adjuster::{Conditions, adjusted_distance};
use super::personalization::bias_direction;
use super::selector::{alternatives_for, select_by_distance};
use crate::model::{
    AnalysisFactor, ClubRecommendation, ClubType, Impact, LieType, MissPattern,
    PersonalTendencies, ShotContext, WeatherContext, WindDirection, round2,
};
use tracing::debug;

const BASE_CONFIDENCE: f64 = 0.7;
const PERSONAL_CONFIDENCE_WEIGHT: f64 = 0.3;
pub const MAX_CONFIDENCE: f64 = 0.95;
const TROUBLE_LIE_FACTOR: f64 = 0.9;
const EXTREME_DISTANCE_FACTOR: f64 = 0.85;
const SWAP_CLUB_BIAS_YARDS: i32 = 5;
const MINOR_BIAS_YARDS: i32 = 2;
const BIAS_COMPENSATION: f64 = 0.8;
const LONG_SHOT_YARDS: f64 = 180.0;
const WINDY_MPH: f64 = 10.0;

/// Pick a club for the shot, corrected for conditions and, when available, the player's tendencies.
#[must_use]
pub fn recommend(
    context: &ShotContext,
    tendencies: Option<&PersonalTendencies>,
    weather: Option<&WeatherContext>,
) -> ClubRecommendation {
    let adjusted = adjusted_distance(context, weather);
    let base = select_by_distance(f64::from(adjusted));
    let bias = tendencies
        .and_then(|t| t.club_bias.get(base.name).copied())
        .unwrap_or(0);

    let (club, distance_adjustment, reasoning) = if bias.abs() > SWAP_CLUB_BIAS_YARDS {
        let compensated = f64::from(adjusted) - f64::from(bias) * BIAS_COMPENSATION;
        let swapped = select_by_distance(compensated);
        let reasoning = if swapped.name == base.name {
            format!(
                "{} still fits after allowing for your {}-yard {} tendency",
                base.name,
                bias.abs(),
                bias_direction(bias)
            )
        } else {
            format!(
                "Switched from {} to {}: you typically hit your {} {} yards {}",
                base.name,
                swapped.name,
                base.name,
                bias.abs(),
                bias_direction(bias)
            )
        };
        debug!(
            base = base.name,
            club = swapped.name,
            bias,
            compensated,
            "club swapped for personal bias"
        );
        (swapped, bias, reasoning)
    } else if bias.abs() > MINOR_BIAS_YARDS {
        let reasoning = format!(
            "{} recommended; you tend to hit it {} yards {}",
            base.name,
            bias.abs(),
            bias_direction(bias)
        );
        (base, bias, reasoning)
    } else {
        (base, 0, format!("{} fits your typical distance", base.name))
    };

    ClubRecommendation {
        primary_club: club.name.to_string(),
        alternative_clubs: alternatives_for(club)
            .into_iter()
            .map(|c| c.name.to_string())
            .collect(),
        reasoning,
        confidence: recommendation_confidence(context, tendencies),
        distance_adjustment,
        adjusted_distance: adjusted,
        aim_adjustment: tendencies.map(|t| aim_adjustment(t.miss_pattern).to_string()),
        swing_thought: Some(swing_thought(context.lie_type, club.club_type).to_string()),
    }
}

/// Always within `[0, 0.95]`.
#[must_use]
pub fn recommendation_confidence(
    context: &ShotContext,
    tendencies: Option<&PersonalTendencies>,
) -> f64 {
    let mut confidence = BASE_CONFIDENCE;
    if let Some(t) = tendencies {
        let level = if t.confidence_level.is_finite() {
            t.confidence_level.clamp(0.0, 1.0)
        } else {
            0.0
        };
        confidence = (confidence + level * PERSONAL_CONFIDENCE_WEIGHT).min(MAX_CONFIDENCE);
    }
    if context.lie_type.is_trouble() {
        confidence *= TROUBLE_LIE_FACTOR;
    }
    if context.distance_to_target > 200.0 || context.distance_to_target < 50.0 {
        confidence *= EXTREME_DISTANCE_FACTOR;
    }
    round2(confidence).clamp(0.0, MAX_CONFIDENCE)
}

#[must_use]
pub fn aim_adjustment(miss_pattern: MissPattern) -> &'static str {
    match miss_pattern {
        MissPattern::Right => "aim slightly left",
        MissPattern::Left => "aim slightly right",
        MissPattern::Straight | MissPattern::Inconsistent => "aim at target",
    }
}

#[must_use]
pub fn swing_thought(lie: LieType, club_type: ClubType) -> &'static str {
    match (lie, club_type) {
        (LieType::Rough, _) => "commit through the rough",
        (LieType::Sand, _) => "accelerate through impact",
        (_, ClubType::Driver | ClubType::Wood) => "smooth tempo",
        _ => "trust your swing",
    }
}

fn wind_label(direction: Option<WindDirection>) -> &'static str {
    match direction {
        Some(WindDirection::Headwind) => "headwind",
        Some(WindDirection::Tailwind) => "tailwind",
        Some(WindDirection::Crosswind) => "crosswind",
        None => "wind",
    }
}

/// Factors behind the analysis, always in the order distance, lie, weather, personal.
#[must_use]
pub fn analysis_factors(
    context: &ShotContext,
    tendencies: Option<&PersonalTendencies>,
    weather: Option<&WeatherContext>,
) -> Vec<AnalysisFactor> {
    let mut factors = Vec::with_capacity(4);
    let distance = context.distance_to_target;

    factors.push(AnalysisFactor {
        factor: "distance".to_string(),
        impact: if distance > LONG_SHOT_YARDS {
            Impact::Negative
        } else {
            Impact::Neutral
        },
        weight: 1.0,
        description: if distance > LONG_SHOT_YARDS {
            format!("Long shot of {distance:.0} yards")
        } else {
            format!("{distance:.0} yards to the target")
        },
    });

    if !matches!(context.lie_type, LieType::Tee | LieType::Fairway) {
        factors.push(AnalysisFactor {
            factor: "lie".to_string(),
            impact: Impact::Negative,
            weight: 0.8,
            description: format!("Playing from the {}", context.lie_type),
        });
    }

    let conditions = Conditions::resolve(context, weather);
    if conditions.wind_mph() > WINDY_MPH {
        factors.push(AnalysisFactor {
            factor: "weather".to_string(),
            impact: if conditions.is_headwind() {
                Impact::Negative
            } else {
                Impact::Positive
            },
            weight: 0.6,
            description: format!(
                "{:.0} mph {}",
                conditions.wind_mph(),
                wind_label(conditions.wind_direction)
            ),
        });
    }

    if tendencies.is_some() {
        factors.push(AnalysisFactor {
            factor: "personal".to_string(),
            impact: Impact::Positive,
            weight: 0.9,
            description: "Adjusted for your personal tendencies".to_string(),
        });
    }

    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swing_thoughts() {
        assert_eq!(swing_thought(LieType::Rough, ClubType::Driver), "commit through the rough");
        assert_eq!(swing_thought(LieType::Sand, ClubType::Wedge), "accelerate through impact");
        assert_eq!(swing_thought(LieType::Tee, ClubType::Wood), "smooth tempo");
        assert_eq!(swing_thought(LieType::Fairway, ClubType::Iron), "trust your swing");
    }

    #[test]
    fn aim_follows_miss() {
        assert_eq!(aim_adjustment(MissPattern::Right), "aim slightly left");
        assert_eq!(aim_adjustment(MissPattern::Left), "aim slightly right");
        assert_eq!(aim_adjustment(MissPattern::Inconsistent), "aim at target");
    }
}
