// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise service: validated CRUD, conflict checks and ranking.
//!
//! Writes for one user are serialized with a per-user lock so that the
//! conflict check and the store write happen as one step.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use validator::Validate;

use crate::config::Config;
use crate::db::MemoryDb;
use crate::error::{AppError, Result};
use crate::models::{Exercise, ExerciseId, ExerciseType, ScoredUser, UserId};
use crate::services::conflict::find_conflicts;
use crate::services::ranking::RankingEngine;
use crate::time_utils::parse_day;

/// Per-user write locks.
pub type WriteLocks = Arc<DashMap<UserId, Arc<Mutex<()>>>>;

/// High-level exercise operations on top of the store and the two engines.
#[derive(Clone)]
pub struct ExerciseService {
    db: MemoryDb,
    engine: RankingEngine,
    lookback: chrono::TimeDelta,
    write_locks: WriteLocks,
}

impl ExerciseService {
    pub fn new(db: MemoryDb, config: &Config) -> Self {
        Self {
            db,
            engine: RankingEngine::new(config.scoring_strategy()),
            lookback: config.ranking_lookback(),
            write_locks: Arc::new(DashMap::new()),
        }
    }

    pub fn db(&self) -> &MemoryDb {
        &self.db
    }

    // ─── Reads ───────────────────────────────────────────────────

    /// Get an exercise by ID.
    pub fn get_exercise_by_id(&self, exercise_id: ExerciseId) -> Result<Exercise> {
        tracing::debug!(exercise_id, "Get exercise by id");

        self.db.get(exercise_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Exercise with id = {} could not be found.",
                exercise_id
            ))
        })
    }

    /// Exercises whose description matches, ignoring case.
    pub fn get_exercises_by_description(&self, description: &str) -> Vec<Exercise> {
        tracing::debug!(description, "Get exercises by description");
        self.db.find_by_description(description)
    }

    /// A user's exercises, optionally by type and by `yyyy-MM-dd` start day.
    pub fn get_exercises(
        &self,
        user_id: UserId,
        exercise_type: Option<ExerciseType>,
        date: Option<&str>,
    ) -> Result<Vec<Exercise>> {
        tracing::debug!(user_id, exercise_type = ?exercise_type, date = ?date, "Get exercises");

        let day = date.map(parse_day).transpose()?;
        Ok(self.db.find_exercises(user_id, exercise_type, day))
    }

    // ─── Writes ──────────────────────────────────────────────────

    /// Validate and store a new exercise.
    ///
    /// Fails with `Conflict` if it overlaps any stored exercise of the same user.
    pub fn create(&self, exercise: Exercise) -> Result<Exercise> {
        tracing::debug!(user_id = exercise.user_id, "Creating new exercise");

        ensure_no_id(&exercise)?;
        exercise.validate()?;

        let created = self.with_user_lock(exercise.user_id, || {
            let conflicts =
                find_conflicts(&exercise, &self.db.find_conflict_candidates(&exercise))?;
            if !conflicts.is_empty() {
                return Err(AppError::Conflict {
                    ids: conflicts.into_iter().collect(),
                });
            }
            Ok(self.db.insert(exercise))
        })?;
        tracing::info!(
            exercise_id = ?created.id,
            user_id = created.user_id,
            "Exercise created"
        );
        Ok(created)
    }

    /// Replace the exercise `exercise_id` with `exercise`.
    ///
    /// The owner and the type cannot change. The stored version of the
    /// exercise itself never counts as a conflict.
    pub fn update(&self, exercise_id: ExerciseId, mut exercise: Exercise) -> Result<Exercise> {
        tracing::debug!(exercise_id, "Updating exercise by id");

        ensure_no_id(&exercise)?;
        exercise.validate()?;
        exercise.id = Some(exercise_id);

        let updated = self.with_user_lock(exercise.user_id, || {
            self.replace_checked(exercise_id, exercise)
        })?;
        tracing::info!(exercise_id, user_id = updated.user_id, "Exercise updated");
        Ok(updated)
    }

    /// Update checks and store write; runs under the owner's write lock.
    fn replace_checked(&self, exercise_id: ExerciseId, exercise: Exercise) -> Result<Exercise> {
        let existing = self.get_exercise_by_id(exercise_id)?;
        if existing.user_id != exercise.user_id {
            return Err(AppError::InvalidUpdate(format!(
                "Exercise userId can not be changed from {} to {}",
                existing.user_id, exercise.user_id
            )));
        }
        if existing.exercise_type != exercise.exercise_type {
            return Err(AppError::InvalidUpdate(format!(
                "Exercise type can not be changed from {:?} to {:?}",
                existing.exercise_type, exercise.exercise_type
            )));
        }

        let mut conflicts =
            find_conflicts(&exercise, &self.db.find_conflict_candidates(&exercise))?;
        conflicts.remove(&exercise_id);
        if !conflicts.is_empty() {
            return Err(AppError::Conflict {
                ids: conflicts.into_iter().collect(),
            });
        }

        self.db.update(exercise)
    }

    /// Delete an exercise by ID.
    pub fn delete(&self, exercise_id: ExerciseId) -> Result<()> {
        tracing::debug!(exercise_id, "Deleting exercise by id");

        let removed = self.db.delete(exercise_id)?;
        tracing::info!(exercise_id, user_id = removed.user_id, "Exercise deleted");
        Ok(())
    }

    // ─── Ranking ─────────────────────────────────────────────────

    /// Rank `user_ids` best-to-worst over the lookback window ending now.
    pub fn ranking(&self, user_ids: &[UserId]) -> Result<Vec<UserId>> {
        self.ranking_at(user_ids, Utc::now())
    }

    /// Rank `user_ids` over the lookback window ending at `now`.
    pub fn ranking_at(&self, user_ids: &[UserId], now: DateTime<Utc>) -> Result<Vec<UserId>> {
        Ok(self
            .scores_at(user_ids, now)?
            .into_iter()
            .map(|scored| scored.user_id)
            .collect())
    }

    /// Scores behind [`ExerciseService::ranking_at`], best first.
    pub fn scores_at(&self, user_ids: &[UserId], now: DateTime<Utc>) -> Result<Vec<ScoredUser>> {
        tracing::debug!(users = user_ids.len(), "Calculating ranking for the userIds");

        // A lookback reaching past the representable range covers everything
        let since = now
            .checked_sub_signed(self.lookback)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let pool = self.db.ranking_exercises(user_ids, since, now);
        self.engine.score(user_ids, &pool)
    }

    /// Run `write` holding the user's write lock.
    ///
    /// The lock entry is dropped again once no other writer holds or waits
    /// on it, so the map only tracks users with writes in flight.
    fn with_user_lock<T>(&self, user_id: UserId, write: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self
            .write_locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = match lock.lock() {
            Ok(_guard) => write(),
            Err(_) => Err(AppError::Internal(anyhow::anyhow!("User write lock poisoned"))),
        };

        // Map entry plus our clone; cloning needs the shard lock held here
        self.write_locks.remove_if(&user_id, |_, entry| Arc::strong_count(entry) == 2);

        result
    }
}

/// Payloads carry no ID; the store assigns it on create and the caller
/// passes it separately on update.
fn ensure_no_id(exercise: &Exercise) -> Result<()> {
    match exercise.id {
        Some(_) => Err(AppError::Validation("exercise Should not have Id".to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_exercise(user_id: UserId, hour: u32) -> Exercise {
        Exercise {
            id: None,
            user_id,
            description: "Evening swim".to_string(),
            exercise_type: ExerciseType::Swimming,
            start_time: Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap(),
            duration: 1800,
            distance: 1000,
            calories: 250,
        }
    }

    #[test]
    fn test_write_locks_released_after_writes() {
        let service = ExerciseService::new(MemoryDb::new(), &Config::default());

        let created = service.create(make_exercise(1, 8)).unwrap();
        service.create(make_exercise(2, 8)).unwrap();
        assert!(service.create(make_exercise(2, 8)).is_err());
        service
            .update(created.id.unwrap(), make_exercise(1, 9))
            .unwrap();

        assert!(service.write_locks.is_empty());
    }

    #[test]
    fn test_write_lock_kept_while_shared() {
        let service = ExerciseService::new(MemoryDb::new(), &Config::default());

        let held = service
            .with_user_lock(3, || {
                Ok(service.write_locks.get(&3).map(|entry| Arc::clone(entry.value())))
            })
            .unwrap()
            .expect("lock entry present during the write");

        // Another holder keeps the entry alive
        assert!(service.write_locks.contains_key(&3));

        drop(held);
        service.with_user_lock(3, || Ok(())).unwrap();
        assert!(service.write_locks.is_empty());
    }
}
