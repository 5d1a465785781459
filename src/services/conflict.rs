// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Time-overlap detection between a user's exercises.
//!
//! Comparison is purely interval based. The detector does not know which
//! exercise is "itself": when checking an update, the caller removes the
//! exercise's own ID from the result.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::models::{Exercise, ExerciseId};

/// Find the IDs of every exercise in `others` whose interval overlaps `candidate`.
///
/// `others` must already be restricted to the candidate's user. Exercises
/// without an ID are skipped since there is nothing to report for them.
pub fn find_conflicts(candidate: &Exercise, others: &[Exercise]) -> Result<BTreeSet<ExerciseId>> {
    let candidate_interval = candidate.interval()?;
    let mut conflicts = BTreeSet::new();

    for other in others {
        if !other.interval()?.overlaps(&candidate_interval) {
            continue;
        }

        match other.id {
            Some(id) => {
                conflicts.insert(id);
            }
            None => {
                tracing::warn!(
                    user_id = other.user_id,
                    start_time = %other.start_time,
                    "Overlapping exercise has no ID, skipping"
                );
            }
        }
    }

    Ok(conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::ExerciseType;
    use chrono::{TimeZone, Utc};

    fn make_exercise(id: Option<u64>, start_secs: i64, duration: i64) -> Exercise {
        Exercise {
            id,
            user_id: 1,
            description: "Test".to_string(),
            exercise_type: ExerciseType::Cycling,
            start_time: Utc.timestamp_opt(start_secs, 0).unwrap(),
            duration,
            distance: 0,
            calories: 100,
        }
    }

    #[test]
    fn test_empty_others_no_conflicts() {
        let candidate = make_exercise(None, 1000, 60);
        assert!(find_conflicts(&candidate, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_reports_all_overlaps() {
        let candidate = make_exercise(None, 1000, 1000);
        let others = vec![
            make_exercise(Some(1), 500, 600),  // ends inside
            make_exercise(Some(2), 1500, 100), // fully inside
            make_exercise(Some(3), 1900, 500), // starts inside
            make_exercise(Some(4), 2000, 100), // starts at candidate end
            make_exercise(Some(5), 0, 1000),   // ends at candidate start
        ];

        let conflicts = find_conflicts(&candidate, &others).unwrap();
        assert_eq!(conflicts.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_unpersisted_overlap_skipped() {
        let candidate = make_exercise(None, 1000, 1000);
        let others = vec![make_exercise(None, 1100, 10)];
        assert!(find_conflicts(&candidate, &others).unwrap().is_empty());
    }

    #[test]
    fn test_negative_duration_in_others_is_validation_error() {
        let candidate = make_exercise(None, 1000, 1000);
        let others = vec![make_exercise(Some(1), 1100, -10)];
        assert!(matches!(
            find_conflicts(&candidate, &others),
            Err(AppError::Validation(_))
        ));
    }
}
