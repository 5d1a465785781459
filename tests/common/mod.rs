// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, TimeZone, Utc};
use exercise_tracker::config::Config;
use exercise_tracker::db::MemoryDb;
use exercise_tracker::models::{Exercise, ExerciseType};
use exercise_tracker::services::ExerciseService;

/// Fixed reference instant used as "now" in tests.
#[allow(dead_code)]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Build an unsaved exercise.
#[allow(dead_code)]
pub fn make_exercise(
    user_id: u64,
    exercise_type: ExerciseType,
    start_time: DateTime<Utc>,
    duration: i64,
    calories: i64,
) -> Exercise {
    Exercise {
        id: None,
        user_id,
        description: "Test exercise".to_string(),
        exercise_type,
        start_time,
        duration,
        distance: 0,
        calories,
    }
}

/// Build a stored-looking exercise with an ID.
#[allow(dead_code)]
pub fn make_stored(
    id: u64,
    user_id: u64,
    start_time: DateTime<Utc>,
    duration: i64,
) -> Exercise {
    Exercise {
        id: Some(id),
        ..make_exercise(user_id, ExerciseType::Running, start_time, duration, 100)
    }
}

/// Create a service backed by an empty in-memory store.
#[allow(dead_code)]
pub fn create_test_service() -> ExerciseService {
    ExerciseService::new(MemoryDb::new(), &Config::default())
}
