use crate::model::{LieType, ShotContext, WeatherContext, WindDirection};
use tracing::debug;

const HEADWIND_YARDS_PER_MPH: f64 = -1.5;
const TAILWIND_YARDS_PER_MPH: f64 = 1.0;
const COLD_THRESHOLD_F: f64 = 70.0;
const COLD_YARDS_PER_DEGREE: f64 = -0.2;
const HOT_THRESHOLD_F: f64 = 80.0;
const HOT_YARDS_PER_DEGREE: f64 = 0.1;
/// Applied to the signed elevation change as-is, uphill and downhill alike.
const ELEVATION_YARDS_PER_UNIT: f64 = -2.0;

/// Wind and temperature as they apply to this shot. Values on the shot context
/// win over the round-level weather report.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Conditions {
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<WindDirection>,
    pub temperature: Option<f64>,
}

impl Conditions {
    #[must_use]
    pub fn resolve(context: &ShotContext, weather: Option<&WeatherContext>) -> Self {
        Self {
            wind_speed: context
                .wind_speed
                .or_else(|| weather.map(|w| w.wind_speed)),
            wind_direction: context
                .wind_direction
                .or_else(|| weather.map(|w| w.wind_direction)),
            temperature: context
                .temperature
                .or_else(|| weather.map(|w| w.temperature)),
        }
    }

    #[must_use]
    pub fn wind_mph(&self) -> f64 {
        self.wind_speed.unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_headwind(&self) -> bool {
        self.wind_direction == Some(WindDirection::Headwind)
    }
}

#[must_use]
pub fn wind_effect(conditions: &Conditions) -> f64 {
    let speed = conditions.wind_mph();
    match conditions.wind_direction {
        Some(WindDirection::Headwind) => HEADWIND_YARDS_PER_MPH * speed,
        Some(WindDirection::Tailwind) => TAILWIND_YARDS_PER_MPH * speed,
        Some(WindDirection::Crosswind) | None => 0.0,
    }
}

#[must_use]
pub fn temperature_effect(conditions: &Conditions) -> f64 {
    match conditions.temperature {
        Some(t) if t < COLD_THRESHOLD_F => COLD_YARDS_PER_DEGREE * (COLD_THRESHOLD_F - t),
        Some(t) if t > HOT_THRESHOLD_F => HOT_YARDS_PER_DEGREE * (t - HOT_THRESHOLD_F),
        _ => 0.0,
    }
}

#[must_use]
pub fn elevation_effect(context: &ShotContext) -> f64 {
    context.elevation_change.unwrap_or(0.0) * ELEVATION_YARDS_PER_UNIT
}

#[must_use]
pub fn lie_adjustment(lie: LieType) -> f64 {
    match lie {
        LieType::Rough => -5.0,
        LieType::Sand => -10.0,
        LieType::Tee | LieType::Fairway | LieType::Greenside | LieType::Green => 0.0,
    }
}

/// Target distance corrected for wind, temperature, elevation and lie, to the nearest yard.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn adjusted_distance(context: &ShotContext, weather: Option<&WeatherContext>) -> i32 {
    let conditions = Conditions::resolve(context, weather);
    let wind = wind_effect(&conditions);
    let temp = temperature_effect(&conditions);
    let elevation = elevation_effect(context);
    let lie = lie_adjustment(context.lie_type);
    let adjusted = context.distance_to_target + wind + temp + elevation + lie;
    debug!(
        distance = context.distance_to_target,
        wind, temp, elevation, lie, adjusted, "adjusted distance"
    );
    adjusted.round() as i32
}
