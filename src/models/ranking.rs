// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ranking score model.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::UserId;

/// A user together with the score computed for them.
///
/// Ordering is best-first: higher score sorts before lower score, and equal
/// scores sort by ascending user ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredUser {
    pub user_id: UserId,
    pub score: i64,
}

impl ScoredUser {
    pub fn new(user_id: UserId, score: i64) -> Self {
        Self { user_id, score }
    }
}

impl Ord for ScoredUser {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.user_id.cmp(&other.user_id))
    }
}

impl PartialOrd for ScoredUser {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
