use super::{StorageError, TendencyStore};
use crate::model::{
    CourseScore, HistoricalShot, PersonalTendencies, PersonalizationUpdate, PlayerHistory,
    SwingFlaw,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const SCHEMA: [&str; 4] = [
    include_str!("../sql/schema/sqlite/01_player_shot.sql"),
    include_str!("../sql/schema/sqlite/02_swing_flaw.sql"),
    include_str!("../sql/schema/sqlite/03_course_score.sql"),
    include_str!("../sql/schema/sqlite/04_personal_tendencies.sql"),
];

/// SQLite-backed store. rusqlite is blocking, so every call hops onto the blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file and make sure the schema exists.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the schema fails to apply.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// # Errors
    /// Returns an error if the schema fails to apply.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(&SCHEMA.join("\n"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StorageError::new("sqlite connection mutex poisoned"))?;
            f(&mut *guard)
        })
        .await?
    }
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>, StorageError> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

fn read_history(conn: &Connection, user_id: &str) -> Result<PlayerHistory, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT club, intended_distance, actual_distance, lie_type, result, shot_date
         FROM player_shot WHERE user_id = ?1 ORDER BY shot_id",
    )?;
    let rows = stmt.query_map(params![user_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, f64>(1)?,
            row.get::<_, f64>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;
    let mut shots = Vec::new();
    for row in rows {
        let (club, intended_distance, actual_distance, lie, result, date) = row?;
        shots.push(HistoricalShot {
            club,
            intended_distance,
            actual_distance,
            lie_type: lie.parse().map_err(StorageError::new)?,
            result: result.parse().map_err(StorageError::new)?,
            date: parse_ts(&date)?,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT flaw_code, severity, frequency, flaw_date
         FROM swing_flaw WHERE user_id = ?1 ORDER BY flaw_id",
    )?;
    let rows = stmt.query_map(params![user_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, u8>(1)?,
            row.get::<_, u32>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;
    let mut flaws = Vec::new();
    for row in rows {
        let (flaw_code, severity, frequency, date) = row?;
        flaws.push(SwingFlaw {
            flaw_code,
            severity,
            frequency,
            date: parse_ts(&date)?,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT course_id, score FROM course_score WHERE user_id = ?1 ORDER BY course_score_id",
    )?;
    let course_scores = stmt
        .query_map(params![user_id], |row| {
            Ok(CourseScore {
                course_id: row.get(0)?,
                score: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PlayerHistory {
        shots,
        flaws,
        course_scores,
    })
}

#[async_trait]
impl TendencyStore for SqliteStore {
    async fn load_history(&self, user_id: &str) -> Result<Option<PlayerHistory>, StorageError> {
        let user_id = user_id.to_string();
        self.with_conn(move |conn| {
            let history = read_history(conn, &user_id)?;
            if history.shots.is_empty()
                && history.flaws.is_empty()
                && history.course_scores.is_empty()
            {
                Ok(None)
            } else {
                Ok(Some(history))
            }
        })
        .await
    }

    async fn append_history(
        &self,
        user_id: &str,
        update: &PersonalizationUpdate,
    ) -> Result<(), StorageError> {
        let user_id = user_id.to_string();
        let update = update.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            for shot in &update.shots {
                tx.execute(
                    "INSERT INTO player_shot
                     (user_id, club, intended_distance, actual_distance,
                      lie_type, result, shot_date)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        user_id,
                        shot.club,
                        shot.intended_distance,
                        shot.actual_distance,
                        shot.lie_type.as_str(),
                        shot.result.as_str(),
                        shot.date.to_rfc3339(),
                    ],
                )?;
            }
            for flaw in &update.flaws {
                tx.execute(
                    "INSERT INTO swing_flaw (user_id, flaw_code, severity, frequency, flaw_date)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        user_id,
                        flaw.flaw_code,
                        flaw.severity,
                        flaw.frequency,
                        flaw.date.to_rfc3339(),
                    ],
                )?;
            }
            for course in &update.course_scores {
                tx.execute(
                    "INSERT INTO course_score (user_id, course_id, score) VALUES (?1, ?2, ?3)",
                    params![user_id, course.course_id, course.score],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn load_tendencies(
        &self,
        user_id: &str,
    ) -> Result<Option<PersonalTendencies>, StorageError> {
        let user_id = user_id.to_string();
        self.with_conn(move |conn| {
            let payload: Option<String> = conn
                .query_row(
                    "SELECT payload FROM personal_tendencies WHERE user_id = ?1",
                    params![user_id],
                    |row| row.get(0),
                )
                .optional()?;
            match payload {
                Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn save_tendencies(
        &self,
        user_id: &str,
        tendencies: &PersonalTendencies,
    ) -> Result<(), StorageError> {
        let user_id = user_id.to_string();
        let payload = serde_json::to_string(tendencies)?;
        let last_updated = tendencies.last_updated.to_rfc3339();
        self.with_conn(move |conn| {
            // wholesale overwrite; tendencies are never patched field by field
            conn.execute(
                "INSERT INTO personal_tendencies (user_id, payload, last_updated)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id) DO UPDATE SET
                    payload = excluded.payload,
                    last_updated = excluded.last_updated",
                params![user_id, payload, last_updated],
            )?;
            Ok(())
        })
        .await
    }
}
