// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod conflict;
pub mod exercise;
pub mod ranking;

pub use conflict::find_conflicts;
pub use exercise::ExerciseService;
pub use ranking::{RankingEngine, ScoringStrategy};
