use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "snake_case")]
pub enum LieType {
    Tee,
    #[default]
    Fairway,
    Rough,
    Sand,
    Greenside,
    Green,
}

impl LieType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LieType::Tee => "tee",
            LieType::Fairway => "fairway",
            LieType::Rough => "rough",
            LieType::Sand => "sand",
            LieType::Greenside => "greenside",
            LieType::Green => "green",
        }
    }

    /// Rough and sand both cost control; confidence and difficulty treat them as trouble lies.
    #[must_use]
    pub fn is_trouble(self) -> bool {
        matches!(self, LieType::Rough | LieType::Sand)
    }
}

impl fmt::Display for LieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LieType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tee" => Ok(LieType::Tee),
            "fairway" => Ok(LieType::Fairway),
            "rough" => Ok(LieType::Rough),
            "sand" | "bunker" => Ok(LieType::Sand),
            "greenside" => Ok(LieType::Greenside),
            "green" => Ok(LieType::Green),
            other => Err(format!("unknown lie type '{other}'")),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WindDirection {
    Headwind,
    Tailwind,
    Crosswind,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ShotContext {
    pub distance_to_target: f64,
    pub lie_type: LieType,
    #[serde(default)]
    pub elevation_change: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub wind_direction: Option<WindDirection>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub pin_position: Option<String>,
    #[serde(default)]
    pub hazards: Option<Vec<String>>,
}

impl ShotContext {
    #[must_use]
    pub fn new(distance_to_target: f64, lie_type: LieType) -> Self {
        Self {
            distance_to_target,
            lie_type,
            ..Self::default()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WeatherContext {
    pub temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: WindDirection,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    pub conditions: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShotResult {
    Good,
    Short,
    Long,
    Left,
    Right,
    Poor,
}

impl ShotResult {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ShotResult::Good => "good",
            ShotResult::Short => "short",
            ShotResult::Long => "long",
            ShotResult::Left => "left",
            ShotResult::Right => "right",
            ShotResult::Poor => "poor",
        }
    }
}

impl std::str::FromStr for ShotResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(ShotResult::Good),
            "short" => Ok(ShotResult::Short),
            "long" => Ok(ShotResult::Long),
            "left" => Ok(ShotResult::Left),
            "right" => Ok(ShotResult::Right),
            "poor" => Ok(ShotResult::Poor),
            other => Err(format!("unknown shot result '{other}'")),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HistoricalShot {
    pub club: String,
    pub intended_distance: f64,
    pub actual_distance: f64,
    pub lie_type: LieType,
    pub result: ShotResult,
    pub date: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SwingFlaw {
    pub flaw_code: String,
    pub severity: u8,
    pub frequency: u32,
    pub date: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CourseScore {
    pub course_id: String,
    pub score: f64,
}

/// Everything the store knows about a player; tendencies are derived from the whole of it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PlayerHistory {
    #[serde(default)]
    pub shots: Vec<HistoricalShot>,
    #[serde(default)]
    pub flaws: Vec<SwingFlaw>,
    #[serde(default)]
    pub course_scores: Vec<CourseScore>,
}

impl PlayerHistory {
    pub fn merge(&mut self, update: PersonalizationUpdate) {
        self.shots.extend(update.shots);
        self.flaws.extend(update.flaws);
        self.course_scores.extend(update.course_scores);
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PersonalizationUpdate {
    #[serde(default)]
    pub shots: Vec<HistoricalShot>,
    #[serde(default)]
    pub flaws: Vec<SwingFlaw>,
    #[serde(default)]
    pub course_scores: Vec<CourseScore>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissPattern {
    Left,
    Right,
    Straight,
    Inconsistent,
}

impl fmt::Display for MissPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MissPattern::Left => "left",
            MissPattern::Right => "right",
            MissPattern::Straight => "straight",
            MissPattern::Inconsistent => "inconsistent",
        };
        write!(f, "{s}")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersonalTendencies {
    pub club_bias: BTreeMap<String, i32>,
    pub miss_pattern: MissPattern,
    pub recurring_flaws: Vec<String>,
    pub lie_preferences: BTreeMap<LieType, f64>,
    pub course_performance: BTreeMap<String, f64>,
    pub confidence_level: f64,
    #[serde(default)]
    pub shot_count: usize,
    pub last_updated: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClubRecommendation {
    pub primary_club: String,
    pub alternative_clubs: Vec<String>,
    pub reasoning: String,
    pub confidence: f64,
    pub distance_adjustment: i32,
    pub adjusted_distance: i32,
    pub aim_adjustment: Option<String>,
    pub swing_thought: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnalysisFactor {
    pub factor: String,
    pub impact: Impact,
    pub weight: f64,
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        write!(f, "{s}")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShotAnalysis {
    pub difficulty_rating: u8,
    pub expected_strokes: f64,
    pub recommended_strokes: f64,
    pub risk_assessment: RiskLevel,
    pub factors: Vec<AnalysisFactor>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CaddyAdvice {
    pub recommendation: ClubRecommendation,
    pub analysis: ShotAnalysis,
    pub alternative_strategy: Option<String>,
    pub personal_note: Option<String>,
    pub personal_insight: Option<String>,
    pub confidence_description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UserStats {
    #[serde(default)]
    pub handicap: Option<f64>,
    #[serde(default)]
    pub rounds_played: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CaddyRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub shot_context: ShotContext,
    #[serde(default)]
    pub weather: Option<WeatherContext>,
    #[serde(default)]
    pub user_stats: Option<UserStats>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CaddyResponse {
    pub advice: CaddyAdvice,
    pub personalized: bool,
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QuickAdvice {
    pub club: String,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QuotaStatus {
    pub can_get_advice: bool,
    pub quota_reached: bool,
    pub saved_strokes: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShotOutcome {
    Good,
    Poor,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StrokesSaved {
    pub strokes_saved: f64,
    pub outcome: ShotOutcome,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersonalizationResult {
    pub tendencies: PersonalTendencies,
    pub trend_changes: Vec<String>,
    pub summary: String,
}
