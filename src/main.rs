// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise tracker command-line front end.
//!
//! Loads exercises from a JSON file, rejecting conflicting or invalid
//! entries, and prints the ranking of the requested users:
//!
//! ```text
//! exercise-tracker [USER_ID ...]
//! ```
//!
//! Start times in the file are RFC3339 or `yyyy-MM-ddTHH:mm:ss` (UTC).
//! With no user IDs, every user present in the file is ranked. Set
//! `RANKING_AS_OF` to rank at a fixed instant instead of now.

use anyhow::Context;
use chrono::Utc;
use exercise_tracker::{
    config::Config,
    db::MemoryDb,
    error::AppError,
    models::{Exercise, UserId},
    services::ExerciseService,
    time_utils::format_utc_rfc3339,
};
use std::fs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the ranking
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        lookback_weeks = config.ranking_lookback_weeks,
        parallel = config.ranking_parallel,
        "Starting exercise tracker"
    );

    let requested: Vec<UserId> = std::env::args()
        .skip(1)
        .map(|arg| {
            arg.parse::<UserId>()
                .with_context(|| format!("Invalid user id: {}", arg))
        })
        .collect::<anyhow::Result<_>>()?;

    // Load exercises through the service so every entry is validated and
    // conflict-checked like any other write
    let raw = fs::read_to_string(&config.exercises_path)
        .with_context(|| format!("Failed to read {}", config.exercises_path))?;
    let exercises: Vec<Exercise> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", config.exercises_path))?;
    tracing::info!(
        path = %config.exercises_path,
        count = exercises.len(),
        "Loading exercises"
    );

    let service = ExerciseService::new(MemoryDb::new(), &config);
    let mut skipped = 0usize;
    for exercise in exercises {
        match service.create(exercise) {
            Ok(_) => {}
            Err(err @ (AppError::Conflict { .. } | AppError::Validation(_))) => {
                tracing::warn!(error = %err, kind = err.kind(), "Skipping exercise");
                skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    tracing::info!(
        stored = service.db().len(),
        skipped,
        "Exercises loaded"
    );

    let roster = if requested.is_empty() {
        service.db().user_ids()
    } else {
        requested
    };

    let now = config.ranking_as_of.unwrap_or_else(Utc::now);
    let scores = service.scores_at(&roster, now)?;

    let output = serde_json::json!({
        "as_of": format_utc_rfc3339(now),
        "ranking": scores,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("exercise_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
