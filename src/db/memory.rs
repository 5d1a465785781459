// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent in-memory exercise store.
//!
//! Provides the queries the exercise service needs:
//! - Exercises by ID and by description
//! - A user's exercises, optionally narrowed by type and calendar day
//! - Conflict candidates (all exercises of the candidate's user)
//! - The ranking pool: roster exercises in a time window, newest first

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;

use crate::error::AppError;
use crate::models::{Exercise, ExerciseId, ExerciseType, UserId};

/// In-memory exercise table keyed by exercise ID.
///
/// Cloning is cheap and every clone shares the same table.
#[derive(Clone, Default)]
pub struct MemoryDb {
    exercises: Arc<DashMap<ExerciseId, Exercise>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored exercises.
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    // ─── Exercise Operations ─────────────────────────────────────

    /// Get an exercise by ID.
    pub fn get(&self, exercise_id: ExerciseId) -> Option<Exercise> {
        self.exercises.get(&exercise_id).map(|e| e.value().clone())
    }

    /// Store a new exercise, assigning it the next ID.
    pub fn insert(&self, mut exercise: Exercise) -> Exercise {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        exercise.id = Some(id);
        self.exercises.insert(id, exercise.clone());
        exercise
    }

    /// Replace a stored exercise. The exercise must carry its ID.
    pub fn update(&self, exercise: Exercise) -> Result<Exercise, AppError> {
        let id = exercise.id.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Cannot update an exercise without an ID"))
        })?;

        let mut stored = self.exercises.get_mut(&id).ok_or_else(|| {
            AppError::NotFound(format!("Exercise with id = {} could not be found.", id))
        })?;
        *stored = exercise.clone();

        Ok(exercise)
    }

    /// Delete an exercise by ID.
    pub fn delete(&self, exercise_id: ExerciseId) -> Result<Exercise, AppError> {
        self.exercises
            .remove(&exercise_id)
            .map(|(_, exercise)| exercise)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Exercise with id = {} could not be found.",
                    exercise_id
                ))
            })
    }

    // ─── Queries ─────────────────────────────────────────────────

    /// Exercises whose description equals `description`, ignoring case.
    pub fn find_by_description(&self, description: &str) -> Vec<Exercise> {
        let wanted = description.to_lowercase();
        let mut found: Vec<Exercise> = self
            .exercises
            .iter()
            .filter(|e| e.description.to_lowercase() == wanted)
            .map(|e| e.value().clone())
            .collect();
        sort_by_id(&mut found);
        found
    }

    /// A user's exercises, optionally restricted to one type and/or to those
    /// starting on the given UTC calendar day.
    pub fn find_exercises(
        &self,
        user_id: UserId,
        exercise_type: Option<ExerciseType>,
        day: Option<NaiveDate>,
    ) -> Vec<Exercise> {
        let day_range = day.and_then(day_bounds);

        let mut found: Vec<Exercise> = self
            .exercises
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| exercise_type.map_or(true, |t| e.exercise_type == t))
            .filter(|e| {
                day_range.map_or(true, |(start, end)| e.start_time >= start && e.start_time < end)
            })
            .map(|e| e.value().clone())
            .collect();
        sort_by_id(&mut found);
        found
    }

    /// Every stored exercise of the candidate's user.
    ///
    /// The interval comparison itself is left to the conflict detector.
    pub fn find_conflict_candidates(&self, candidate: &Exercise) -> Vec<Exercise> {
        self.find_exercises(candidate.user_id, None, None)
    }

    /// Exercises of the given users starting within `[since, until]`, most
    /// recent first. Equal start times are ordered by ascending ID.
    pub fn ranking_exercises(
        &self,
        user_ids: &[UserId],
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Vec<Exercise> {
        let roster: HashSet<UserId> = user_ids.iter().copied().collect();

        let mut pool: Vec<Exercise> = self
            .exercises
            .iter()
            .filter(|e| roster.contains(&e.user_id))
            .filter(|e| e.start_time >= since && e.start_time <= until)
            .map(|e| e.value().clone())
            .collect();

        pool.sort_by(|a, b| b.start_time.cmp(&a.start_time).then_with(|| a.id.cmp(&b.id)));

        tracing::debug!(
            users = roster.len(),
            exercises = pool.len(),
            since = %since,
            until = %until,
            "Loaded ranking pool"
        );

        pool
    }

    /// Distinct user IDs with at least one stored exercise, ascending.
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self
            .exercises
            .iter()
            .map(|e| e.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// `[midnight, next midnight)` of a UTC calendar day.
fn day_bounds(day: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = day.and_hms_opt(0, 0, 0)?.and_utc();
    let end = day.succ_opt()?.and_hms_opt(0, 0, 0)?.and_utc();
    Some((start, end))
}

fn sort_by_id(exercises: &mut [Exercise]) {
    exercises.sort_by_key(|e| e.id);
}
