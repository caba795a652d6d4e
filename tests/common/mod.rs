#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rusty_caddy::caddy::{CaddyConfig, CaddyService};
use rusty_caddy::model::{
    CourseScore, HistoricalShot, LieType, MissPattern, PersonalTendencies, PersonalizationUpdate,
    PlayerHistory, ShotResult, SwingFlaw,
};
use rusty_caddy::storage::{MemoryStore, StorageError, TendencyStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0)
        .single()
        .expect("valid fixture date")
}

pub fn shot(club: &str, intended: f64, actual: f64, result: ShotResult) -> HistoricalShot {
    shot_on(club, intended, actual, result, LieType::Fairway, 0)
}

pub fn shot_on(
    club: &str,
    intended: f64,
    actual: f64,
    result: ShotResult,
    lie_type: LieType,
    days_ago: i64,
) -> HistoricalShot {
    HistoricalShot {
        club: club.to_string(),
        intended_distance: intended,
        actual_distance: actual,
        lie_type,
        result,
        date: base_date() - Duration::days(days_ago),
    }
}

pub fn repeat_shot(
    n: usize,
    club: &str,
    intended: f64,
    actual: f64,
    result: ShotResult,
) -> Vec<HistoricalShot> {
    (0..n).map(|_| shot(club, intended, actual, result)).collect()
}

pub fn flaw(code: &str, severity: u8, days_ago: i64) -> SwingFlaw {
    SwingFlaw {
        flaw_code: code.to_string(),
        severity,
        frequency: 1,
        date: base_date() - Duration::days(days_ago),
    }
}

pub fn course(course_id: &str, score: f64) -> CourseScore {
    CourseScore {
        course_id: course_id.to_string(),
        score,
    }
}

pub fn tendencies_with_bias(club: &str, bias: i32, confidence_level: f64) -> PersonalTendencies {
    let mut club_bias = BTreeMap::new();
    club_bias.insert(club.to_string(), bias);
    PersonalTendencies {
        club_bias,
        miss_pattern: MissPattern::Straight,
        recurring_flaws: Vec::new(),
        lie_preferences: BTreeMap::new(),
        course_performance: BTreeMap::new(),
        confidence_level,
        shot_count: 50,
        last_updated: Utc::now(),
    }
}

pub fn update_of(shots: Vec<HistoricalShot>, flaws: Vec<SwingFlaw>) -> PersonalizationUpdate {
    PersonalizationUpdate {
        shots,
        flaws,
        course_scores: Vec::new(),
    }
}

pub fn memory_service() -> (CaddyService, MemoryStore) {
    let store = MemoryStore::new();
    let service = CaddyService::new(Arc::new(store.clone()), CaddyConfig::default());
    (service, store)
}

/// Every call fails, as a store behind a dead connection would.
pub struct FailingStore;

#[async_trait]
impl TendencyStore for FailingStore {
    async fn load_history(&self, _user_id: &str) -> Result<Option<PlayerHistory>, StorageError> {
        Err(StorageError::new("connection refused"))
    }

    async fn append_history(
        &self,
        _user_id: &str,
        _update: &PersonalizationUpdate,
    ) -> Result<(), StorageError> {
        Err(StorageError::new("connection refused"))
    }

    async fn load_tendencies(
        &self,
        _user_id: &str,
    ) -> Result<Option<PersonalTendencies>, StorageError> {
        Err(StorageError::new("connection refused"))
    }

    async fn save_tendencies(
        &self,
        _user_id: &str,
        _tendencies: &PersonalTendencies,
    ) -> Result<(), StorageError> {
        Err(StorageError::new("connection refused"))
    }
}

/// Hangs on reads long past any sane timeout.
pub struct SlowStore {
    pub delay: std::time::Duration,
}

#[async_trait]
impl TendencyStore for SlowStore {
    async fn load_history(&self, _user_id: &str) -> Result<Option<PlayerHistory>, StorageError> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    async fn append_history(
        &self,
        _user_id: &str,
        _update: &PersonalizationUpdate,
    ) -> Result<(), StorageError> {
        Ok(())
    }

    async fn load_tendencies(
        &self,
        _user_id: &str,
    ) -> Result<Option<PersonalTendencies>, StorageError> {
        tokio::time::sleep(self.delay).await;
        Ok(Some(tendencies_with_bias("7-Iron", -10, 0.9)))
    }

    async fn save_tendencies(
        &self,
        _user_id: &str,
        _tendencies: &PersonalTendencies,
    ) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Wraps a [`MemoryStore`] with a per-call delay, a number of history reads
/// that fail before reads start working, optionally failing saves, and a
/// count of saves that went through.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub delay: std::time::Duration,
    pub failing_history_reads: AtomicUsize,
    pub fail_saves: AtomicBool,
    pub saves: AtomicUsize,
}

impl FlakyStore {
    pub fn with_delay(delay: std::time::Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl TendencyStore for FlakyStore {
    async fn load_history(&self, user_id: &str) -> Result<Option<PlayerHistory>, StorageError> {
        self.pause().await;
        let fail = self
            .failing_history_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(StorageError::new("read failed"));
        }
        self.inner.load_history(user_id).await
    }

    async fn append_history(
        &self,
        user_id: &str,
        update: &PersonalizationUpdate,
    ) -> Result<(), StorageError> {
        self.pause().await;
        self.inner.append_history(user_id, update).await
    }

    async fn load_tendencies(
        &self,
        user_id: &str,
    ) -> Result<Option<PersonalTendencies>, StorageError> {
        self.pause().await;
        self.inner.load_tendencies(user_id).await
    }

    async fn save_tendencies(
        &self,
        user_id: &str,
        tendencies: &PersonalTendencies,
    ) -> Result<(), StorageError> {
        self.pause().await;
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::new("write failed"));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_tendencies(user_id, tendencies).await
    }
}
