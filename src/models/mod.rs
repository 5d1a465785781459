// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod exercise;
pub mod ranking;

pub use exercise::{Exercise, ExerciseId, ExerciseType, Interval, UserId};
pub use ranking::ScoredUser;
