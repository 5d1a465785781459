// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ranking engine: scores users from their recent exercises.
//!
//! For each user and each exercise type, the first ten exercises of that
//! type (in the order supplied) contribute
//! `percent * weight * (duration / 60 + calories) / 100`, where `percent`
//! starts at 100 and drops by 10 for every following exercise of the same
//! type. Integer division truncates at both steps.
//!
//! Preconditions on the input pool, owned by the storage layer:
//! - it only holds exercises inside the lookback window,
//! - it is sorted by start time, most recent first.
//!
//! The engine does no date arithmetic and never re-sorts the pool.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::Result;
use crate::models::{Exercise, ExerciseType, ScoredUser, UserId};

/// Exercises per (user, type) that count toward the score.
const TOP_EXERCISES_PER_TYPE: usize = 10;
const FULL_PERCENT: i64 = 100;
const PERCENT_STEP: i64 = 10;
const SECONDS_PER_MINUTE: i64 = 60;

/// How per-user scores are evaluated. Both strategies give identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringStrategy {
    #[default]
    Sequential,
    /// Score users on the rayon thread pool.
    Parallel,
}

/// Computes scores and the best-to-worst order of a user roster.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingEngine {
    strategy: ScoringStrategy,
}

impl RankingEngine {
    pub fn new(strategy: ScoringStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ScoringStrategy {
        self.strategy
    }

    /// Rank `user_ids` best-to-worst from `recent_exercises`.
    ///
    /// Every roster entry produces exactly one output entry, duplicates
    /// included. Users with no exercises in the pool score zero.
    pub fn rank(&self, user_ids: &[UserId], recent_exercises: &[Exercise]) -> Result<Vec<UserId>> {
        Ok(self
            .score(user_ids, recent_exercises)?
            .into_iter()
            .map(|scored| scored.user_id)
            .collect())
    }

    /// Score every roster entry, returned sorted best-first.
    ///
    /// Fails without partial results if any exercise in the pool has a
    /// negative duration.
    pub fn score(
        &self,
        user_ids: &[UserId],
        recent_exercises: &[Exercise],
    ) -> Result<Vec<ScoredUser>> {
        for exercise in recent_exercises {
            exercise.ensure_valid_duration()?;
        }

        let by_user = group_by_user(recent_exercises);
        let score_one = |user_id: &UserId| {
            let exercises = by_user.get(user_id).map(Vec::as_slice).unwrap_or(&[]);
            ScoredUser::new(*user_id, score_user(exercises))
        };

        let mut scored: Vec<ScoredUser> = match self.strategy {
            ScoringStrategy::Sequential => user_ids.iter().map(score_one).collect(),
            ScoringStrategy::Parallel => user_ids.par_iter().map(score_one).collect(),
        };

        // Plain total-order sort after all scores exist.
        scored.sort();

        tracing::debug!(
            users = user_ids.len(),
            exercises = recent_exercises.len(),
            strategy = ?self.strategy,
            "Scored ranking roster"
        );

        Ok(scored)
    }
}

/// Group the pool by owner, keeping the supplied order within each user.
fn group_by_user(exercises: &[Exercise]) -> HashMap<UserId, Vec<&Exercise>> {
    let mut by_user: HashMap<UserId, Vec<&Exercise>> = HashMap::new();
    for exercise in exercises {
        by_user.entry(exercise.user_id).or_default().push(exercise);
    }
    by_user
}

/// Total score of one user's exercises across all types.
fn score_user(exercises: &[&Exercise]) -> i64 {
    ExerciseType::ALL
        .iter()
        .fold(0i64, |total, &exercise_type| {
            total.saturating_add(score_type(exercise_type, exercises))
        })
}

/// Score of the first ten exercises of one type, each worth 10% less than
/// the one before.
fn score_type(exercise_type: ExerciseType, exercises: &[&Exercise]) -> i64 {
    let weight = exercise_type.weight();
    let mut percent = FULL_PERCENT;
    let mut sum = 0i64;

    for exercise in exercises
        .iter()
        .filter(|e| e.exercise_type == exercise_type)
        .take(TOP_EXERCISES_PER_TYPE)
    {
        let points = (exercise.duration / SECONDS_PER_MINUTE).saturating_add(exercise.calories);
        let contribution = percent.saturating_mul(weight).saturating_mul(points) / 100;
        sum = sum.saturating_add(contribution);
        percent -= PERCENT_STEP;
    }

    sum
}
