// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise model shared by conflict detection, ranking and storage.

use std::borrow::Cow;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{AppError, Result};

/// Identifier assigned to an exercise when it is stored.
pub type ExerciseId = u64;

/// Identifier of the user owning an exercise.
pub type UserId = u64;

/// Fixed set of exercise kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExerciseType {
    Running,
    Cycling,
    Swimming,
    Rowing,
    Walking,
    CircuitTraining,
    StrengthTraining,
    FitnessCourse,
    Sports,
    Other,
}

impl ExerciseType {
    /// Every exercise type, in declaration order.
    pub const ALL: [ExerciseType; 10] = [
        ExerciseType::Running,
        ExerciseType::Cycling,
        ExerciseType::Swimming,
        ExerciseType::Rowing,
        ExerciseType::Walking,
        ExerciseType::CircuitTraining,
        ExerciseType::StrengthTraining,
        ExerciseType::FitnessCourse,
        ExerciseType::Sports,
        ExerciseType::Other,
    ];

    /// Ranking multiplier for this type.
    pub const fn weight(self) -> i64 {
        match self {
            ExerciseType::Running => 2,
            ExerciseType::Cycling => 2,
            ExerciseType::Swimming => 3,
            ExerciseType::Rowing => 2,
            ExerciseType::Walking => 1,
            ExerciseType::CircuitTraining => 4,
            ExerciseType::StrengthTraining => 3,
            ExerciseType::FitnessCourse => 2,
            ExerciseType::Sports => 3,
            ExerciseType::Other => 1,
        }
    }
}

/// A single recorded exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Exercise {
    /// Storage ID (`None` until persisted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExerciseId>,
    /// Owner
    pub user_id: UserId,
    /// Free-text label (letters, digits and spaces)
    #[validate(custom(function = "validate_description"))]
    pub description: String,
    /// Exercise kind
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    /// Start of the exercise (inclusive)
    #[serde(deserialize_with = "crate::time_utils::deserialize_utc_timestamp")]
    pub start_time: DateTime<Utc>,
    /// Duration in seconds
    #[validate(range(min = 0, message = "must not be negative"))]
    pub duration: i64,
    /// Distance in meters
    #[validate(range(min = 0, message = "must not be negative"))]
    pub distance: i64,
    /// Energy burned in kcal
    #[validate(range(min = 0, message = "must not be negative"))]
    pub calories: i64,
}

impl Exercise {
    /// Reject a negative duration before any interval math is done with it.
    pub fn ensure_valid_duration(&self) -> Result<()> {
        if self.duration < 0 {
            return Err(AppError::Validation(format!(
                "duration must not be negative (exercise {}, got {})",
                self.label(),
                self.duration
            )));
        }
        Ok(())
    }

    /// The half-open interval `[start_time, start_time + duration)`.
    pub fn interval(&self) -> Result<Interval> {
        self.ensure_valid_duration()?;

        let end = TimeDelta::try_seconds(self.duration)
            .and_then(|delta| self.start_time.checked_add_signed(delta))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "duration {} of exercise {} is out of range",
                    self.duration,
                    self.label()
                ))
            })?;

        Ok(Interval {
            start: self.start_time,
            end,
        })
    }

    fn label(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => "<new>".to_string(),
        }
    }
}

/// Half-open time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Strict overlap: intervals that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        other.start < self.end && other.end > self.start
    }
}

fn validate_description(description: &str) -> std::result::Result<(), ValidationError> {
    if description
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ')
    {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric").with_message(Cow::Borrowed(
            "Only Alphanumeric and space characters are allowed",
        )))
    }
}
