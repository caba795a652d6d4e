use super::adjuster::Conditions;
use super::personalization::{
    calculate_tendencies, detect_trend_changes, generate_personal_reasoning,
    get_confidence_description, needs_refresh, summarize_tendencies,
};
use super::recommend::{analysis_factors, recommend};
use crate::error::{CaddyError, ErrorCode};
use crate::model::{
    CaddyAdvice, CaddyRequest, CaddyResponse, ClubRecommendation, LieType, MissPattern,
    PersonalTendencies, PersonalizationResult, PersonalizationUpdate, QuickAdvice, QuotaStatus,
    RiskLevel, ShotAnalysis, ShotContext, ShotOutcome, StrokesSaved, WeatherContext, round1,
};
use crate::storage::{StorageError, TendencyStore};
use ahash::RandomState;
use chrono::Utc;
use std::future::Future;
use std::hash::BuildHasher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const FREE_ADVICE_LIMIT: u32 = 3;
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(1500);
const FALLBACK_CONFIDENCE: f64 = 0.5;
const LOCK_SHARDS: usize = 64;

#[derive(Debug, Clone, Copy)]
pub struct CaddyConfig {
    pub store_timeout: Duration,
    pub free_advice_limit: u32,
}

impl Default for CaddyConfig {
    fn default() -> Self {
        Self {
            store_timeout: DEFAULT_STORE_TIMEOUT,
            free_advice_limit: FREE_ADVICE_LIMIT,
        }
    }
}

/// Fixed table of write locks. A user id always hashes to the same shard, so
/// writes for one player never interleave and the table never grows.
struct UserLocks {
    hasher: RandomState,
    shards: Vec<tokio::sync::Mutex<()>>,
}

impl UserLocks {
    fn new() -> Self {
        Self {
            hasher: RandomState::new(),
            shards: (0..LOCK_SHARDS)
                .map(|_| tokio::sync::Mutex::new(()))
                .collect(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn shard_index(&self, user_id: &str) -> usize {
        (self.hasher.hash_one(user_id) as usize) % self.shards.len()
    }

    fn for_user(&self, user_id: &str) -> &tokio::sync::Mutex<()> {
        &self.shards[self.shard_index(user_id)]
    }
}

/// Entry point for callers. Holds no advice state of its own: the store is
/// injected and the only shared data is the write lock table.
#[derive(Clone)]
pub struct CaddyService {
    store: Arc<dyn TendencyStore>,
    config: CaddyConfig,
    write_locks: Arc<UserLocks>,
}

impl CaddyService {
    #[must_use]
    pub fn new(store: Arc<dyn TendencyStore>, config: CaddyConfig) -> Self {
        Self {
            store,
            config,
            write_locks: Arc::new(UserLocks::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> CaddyConfig {
        self.config
    }

    async fn timed<T>(
        &self,
        fut: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<T, StorageError> {
        tokio::time::timeout(self.config.store_timeout, fut)
            .await
            .map_err(|_| {
                StorageError::timeout(format!(
                    "store call timed out after {}ms",
                    self.config.store_timeout.as_millis()
                ))
            })?
    }

    /// Full advice for one shot.
    ///
    /// # Errors
    /// Returns a `PROCESSING_ERROR` when the shot context is unusable. Store
    /// problems never fail the request; advice is then simply not personalized.
    pub async fn get_advice(&self, request: &CaddyRequest) -> Result<CaddyResponse, CaddyError> {
        validate_request(request)?;

        let tendencies = match request.user_id.as_deref() {
            Some(user_id) if !user_id.trim().is_empty() => {
                let budget = self.config.store_timeout;
                tokio::time::timeout(budget, self.load_tendencies(user_id))
                    .await
                    .unwrap_or_else(|_| {
                        warn!(
                            user_id,
                            timeout_ms = budget.as_millis(),
                            "personalization load timed out, continuing without it"
                        );
                        None
                    })
            }
            _ => None,
        };

        let advice = advise(
            &request.shot_context,
            tendencies.as_ref(),
            request.weather.as_ref(),
        );
        debug!(
            club = %advice.recommendation.primary_club,
            confidence = advice.recommendation.confidence,
            risk = %advice.analysis.risk_assessment,
            personalized = tendencies.is_some(),
            "advice ready"
        );
        Ok(CaddyResponse {
            advice,
            personalized: tendencies.is_some(),
            generated_at: Utc::now(),
        })
    }

    /// Cached tendencies when fresh, otherwise a best-effort rebuild from history.
    /// Every failure path degrades to `None` (or the stale snapshot). The rebuild
    /// is skipped while an update holds the user's write lock, and when the
    /// history has no shots the snapshot has not already counted.
    pub async fn load_tendencies(&self, user_id: &str) -> Option<PersonalTendencies> {
        let now = Utc::now();
        let cached = match self.timed(self.store.load_tendencies(user_id)).await {
            Ok(Some(t)) if !needs_refresh(&t, now) => return Some(t),
            Ok(cached) => cached,
            Err(e) => {
                warn!(
                    user_id,
                    error = %e,
                    "tendency load failed, continuing without personalization"
                );
                return None;
            }
        };

        let Ok(_guard) = self.write_locks.for_user(user_id).try_lock() else {
            debug!(user_id, "update in progress, serving cached tendencies");
            return cached;
        };
        match self.timed(self.store.load_history(user_id)).await {
            Ok(Some(history))
                if cached
                    .as_ref()
                    .is_some_and(|t| t.shot_count == history.shots.len()) =>
            {
                debug!(
                    user_id,
                    shots = history.shots.len(),
                    "no new shots since the cached tendencies"
                );
                cached
            }
            Ok(Some(history)) => {
                let fresh = calculate_tendencies(
                    &history.shots,
                    &history.flaws,
                    Some(history.course_scores.as_slice()),
                    now,
                );
                if let Err(e) = self.timed(self.store.save_tendencies(user_id, &fresh)).await {
                    warn!(user_id, error = %e, "could not save refreshed tendencies");
                }
                Some(fresh)
            }
            Ok(None) => cached,
            Err(e) => {
                warn!(user_id, error = %e, "history load failed, using cached tendencies");
                cached
            }
        }
    }

    /// Club-only advice that never fails: any error falls back to a static rule.
    pub async fn get_quick_advice(
        &self,
        distance: f64,
        lie_type: LieType,
        user_id: Option<&str>,
    ) -> QuickAdvice {
        let request = CaddyRequest {
            user_id: user_id.map(str::to_string),
            shot_context: ShotContext::new(distance, lie_type),
            weather: None,
            user_stats: None,
        };
        match self.get_advice(&request).await {
            Ok(response) => {
                let ClubRecommendation {
                    primary_club,
                    confidence,
                    reasoning,
                    ..
                } = response.advice.recommendation;
                QuickAdvice {
                    club: primary_club,
                    confidence,
                    reasoning,
                }
            }
            Err(e) => {
                warn!(error = %e, distance, "quick advice falling back to static rule");
                fallback_quick_advice(distance)
            }
        }
    }

    #[must_use]
    pub fn check_quota_status(&self, advice_count: u32, is_plus_user: bool) -> QuotaStatus {
        quota_status(advice_count, is_plus_user, self.config.free_advice_limit)
    }

    /// Merge a new batch into the player's stored history and rebuild tendencies from all of it.
    ///
    /// The history is read before anything is written, and the append is the
    /// only write that can fail the call. A failed tendency save is logged and
    /// the recomputed result is still returned.
    ///
    /// # Errors
    /// Returns a `PROCESSING_ERROR` if the user id is blank, the history cannot
    /// be read, or the store does not confirm the append.
    pub async fn update_personalization(
        &self,
        user_id: &str,
        update: PersonalizationUpdate,
    ) -> Result<PersonalizationResult, CaddyError> {
        if user_id.trim().is_empty() {
            return Err(CaddyError::processing("user id is required"));
        }

        let _guard = self.write_locks.for_user(user_id).lock().await;

        let previous = self
            .timed(self.store.load_tendencies(user_id))
            .await
            .unwrap_or_else(|e| {
                warn!(user_id, error = %e, "previous tendencies unavailable, skipping trend check");
                None
            });

        let mut history = self
            .timed(self.store.load_history(user_id))
            .await?
            .unwrap_or_default();

        let added = update.shots.len();
        if let Err(e) = self.timed(self.store.append_history(user_id, &update)).await {
            return Err(append_error(&e));
        }
        history.merge(update);

        let now = Utc::now();
        let tendencies = calculate_tendencies(
            &history.shots,
            &history.flaws,
            Some(history.course_scores.as_slice()),
            now,
        );
        if let Err(e) = self
            .timed(self.store.save_tendencies(user_id, &tendencies))
            .await
        {
            warn!(
                user_id,
                error = %e,
                "history stored but tendencies not saved, returning recomputed result"
            );
        }

        let trend_changes = previous
            .as_ref()
            .map(|p| detect_trend_changes(p, &tendencies))
            .unwrap_or_default();
        info!(
            user_id,
            shots = tendencies.shot_count,
            added,
            changes = trend_changes.len(),
            "personalization updated"
        );
        Ok(PersonalizationResult {
            summary: summarize_tendencies(&tendencies, now),
            tendencies,
            trend_changes,
        })
    }
}

fn append_error(e: &StorageError) -> CaddyError {
    if e.is_timeout() {
        CaddyError::new(
            ErrorCode::ProcessingError,
            format!("history append not confirmed: {e}"),
            "The batch may already be recorded; check the player's history before resending it.",
        )
    } else {
        CaddyError::new(
            ErrorCode::ProcessingError,
            format!("history append failed: {e}"),
            "Nothing was recorded; the batch can be resent.",
        )
    }
}

fn check_finite(name: &str, value: Option<f64>) -> Result<(), CaddyError> {
    match value {
        Some(v) if !v.is_finite() => Err(CaddyError::processing(format!(
            "{name} must be a finite number"
        ))),
        _ => Ok(()),
    }
}

/// # Errors
/// Returns a `PROCESSING_ERROR` describing the first unusable field.
pub fn validate_request(request: &CaddyRequest) -> Result<(), CaddyError> {
    let ctx = &request.shot_context;
    if !ctx.distance_to_target.is_finite() || ctx.distance_to_target < 0.0 {
        return Err(CaddyError::processing(format!(
            "distance_to_target must be a non-negative number, got {}",
            ctx.distance_to_target
        )));
    }
    check_finite("elevation_change", ctx.elevation_change)?;
    check_finite("wind_speed", ctx.wind_speed)?;
    check_finite("temperature", ctx.temperature)?;
    if ctx.wind_speed.is_some_and(|w| w < 0.0) {
        return Err(CaddyError::processing("wind_speed cannot be negative"));
    }
    if let Some(weather) = &request.weather {
        check_finite("weather.temperature", Some(weather.temperature))?;
        check_finite("weather.wind_speed", Some(weather.wind_speed))?;
        if weather.wind_speed < 0.0 {
            return Err(CaddyError::processing("weather.wind_speed cannot be negative"));
        }
    }
    Ok(())
}

/// The synchronous core of [`CaddyService::get_advice`].
#[must_use]
pub fn advise(
    context: &ShotContext,
    tendencies: Option<&PersonalTendencies>,
    weather: Option<&WeatherContext>,
) -> CaddyAdvice {
    let recommendation = recommend(context, tendencies, weather);
    let factors = analysis_factors(context, tendencies, weather);

    let expected = expected_strokes(context.distance_to_target);
    let difficulty = difficulty_rating(context, weather);
    let analysis = ShotAnalysis {
        difficulty_rating: difficulty,
        expected_strokes: expected,
        recommended_strokes: round1(expected - recommendation.confidence * 0.3),
        risk_assessment: risk_assessment(difficulty, recommendation.confidence),
        factors,
    };

    CaddyAdvice {
        alternative_strategy: alternative_strategy(context),
        personal_note: personal_note(tendencies),
        personal_insight: tendencies
            .map(|t| generate_personal_reasoning(t, &recommendation.primary_club)),
        confidence_description: tendencies
            .map(|t| get_confidence_description(t.confidence_level).to_string()),
        recommendation,
        analysis,
    }
}

#[must_use]
pub fn expected_strokes(distance: f64) -> f64 {
    if distance <= 100.0 {
        2.5
    } else if distance <= 150.0 {
        2.8
    } else if distance <= 200.0 {
        3.1
    } else {
        3.5
    }
}

/// 5 for a stock shot, up to 10.
#[must_use]
pub fn difficulty_rating(context: &ShotContext, weather: Option<&WeatherContext>) -> u8 {
    let mut rating: u8 = 5;
    if context.distance_to_target > 180.0 {
        rating += 1;
    }
    if context.distance_to_target < 60.0 {
        rating += 1;
    }
    match context.lie_type {
        LieType::Rough => rating += 2,
        LieType::Sand => rating += 3,
        _ => {}
    }
    if Conditions::resolve(context, weather).wind_mph() > 15.0 {
        rating += 2;
    }
    if context.elevation_change.is_some_and(|e| e.abs() > 20.0) {
        rating += 1;
    }
    rating.min(10)
}

#[must_use]
pub fn risk_assessment(difficulty: u8, confidence: f64) -> RiskLevel {
    if difficulty <= 4 && confidence >= 0.8 {
        RiskLevel::Low
    } else if difficulty <= 7 && confidence >= 0.6 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

#[must_use]
pub fn alternative_strategy(context: &ShotContext) -> Option<String> {
    if context.lie_type == LieType::Sand {
        Some("Consider a safe layup out of the sand to your favorite wedge distance".to_string())
    } else if context.distance_to_target > 180.0 {
        Some("Play to the center of the green rather than attacking the pin".to_string())
    } else {
        None
    }
}

#[must_use]
pub fn personal_note(tendencies: Option<&PersonalTendencies>) -> Option<String> {
    let t = tendencies?;
    let mut parts = Vec::new();
    if matches!(t.miss_pattern, MissPattern::Left | MissPattern::Right) {
        parts.push(format!("You tend to miss {}.", t.miss_pattern));
    }
    if let Some(flaw) = t.recurring_flaws.first() {
        parts.push(format!("Watch for your recurring {flaw}."));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

#[must_use]
pub fn fallback_quick_advice(distance: f64) -> QuickAdvice {
    let club = if distance > 150.0 { "7-Iron" } else { "9-Iron" };
    QuickAdvice {
        club: club.to_string(),
        confidence: FALLBACK_CONFIDENCE,
        reasoning: "General recommendation; detailed analysis was unavailable".to_string(),
    }
}

/// Plus users are never limited. `saved_strokes` is left empty here; see
/// [`QuotaStatus::with_strokes_history`].
#[must_use]
pub fn quota_status(advice_count: u32, is_plus_user: bool, free_limit: u32) -> QuotaStatus {
    if is_plus_user {
        return QuotaStatus {
            can_get_advice: true,
            quota_reached: false,
            saved_strokes: None,
        };
    }
    let quota_reached = advice_count >= free_limit;
    QuotaStatus {
        can_get_advice: !quota_reached,
        quota_reached,
        saved_strokes: None,
    }
}

#[must_use]
pub fn check_quota_status(advice_count: u32, is_plus_user: bool) -> QuotaStatus {
    quota_status(advice_count, is_plus_user, FREE_ADVICE_LIMIT)
}

impl QuotaStatus {
    #[must_use]
    pub fn with_strokes_history(mut self, history: &[StrokesSaved]) -> Self {
        self.saved_strokes = Some(round1(history.iter().map(|s| s.strokes_saved).sum()));
        self
    }
}

#[must_use]
pub fn calculate_strokes_saved(expected: f64, actual: f64, followed_advice: bool) -> StrokesSaved {
    StrokesSaved {
        strokes_saved: if followed_advice {
            (expected - actual).max(0.0)
        } else {
            0.0
        },
        outcome: if actual <= expected {
            ShotOutcome::Good
        } else {
            ShotOutcome::Poor
        },
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_table_is_fixed_size() {
        let locks = UserLocks::new();
        for n in 0..10_000 {
            let user = format!("golfer-{n}");
            let idx = locks.shard_index(&user);
            assert!(idx < LOCK_SHARDS);
            assert_eq!(idx, locks.shard_index(&user));
        }
        assert_eq!(locks.shards.len(), LOCK_SHARDS);
    }

    #[test]
    fn append_errors_say_whether_the_batch_landed() {
        let err = append_error(&StorageError::timeout("store call timed out after 50ms"));
        assert_eq!(err.code, ErrorCode::ProcessingError);
        assert!(err.suggestion.contains("may already be recorded"));

        let err = append_error(&StorageError::new("disk full"));
        assert!(err.suggestion.contains("Nothing was recorded"));
    }

    #[tokio::test]
    async fn same_user_shares_a_lock() {
        let locks = UserLocks::new();
        let _held = locks.for_user("golfer-1").lock().await;
        assert!(locks.for_user("golfer-1").try_lock().is_err());
    }
}
