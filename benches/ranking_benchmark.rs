use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use exercise_tracker::models::{Exercise, ExerciseType, UserId};
use exercise_tracker::services::{RankingEngine, ScoringStrategy};
use std::hint::black_box;

const USERS: u64 = 2_000;
const EXERCISES_PER_USER: i64 = 40;

/// Build a newest-first pool shaped like four weeks of activity.
fn build_pool() -> (Vec<UserId>, Vec<Exercise>) {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let mut pool = Vec::with_capacity((USERS as usize) * EXERCISES_PER_USER as usize);

    for user_id in 0..USERS {
        for i in 0..EXERCISES_PER_USER {
            let type_index = (user_id as usize + i as usize) % ExerciseType::ALL.len();
            let exercise_type = ExerciseType::ALL[type_index];
            pool.push(Exercise {
                id: Some(user_id * EXERCISES_PER_USER as u64 + i as u64),
                user_id,
                description: "Bench".to_string(),
                exercise_type,
                start_time: now - Duration::minutes(i * 997 + user_id as i64 % 60),
                duration: 600 + (i * 127) % 5400,
                distance: 0,
                calories: 50 + (user_id as i64 * 31 + i) % 800,
            });
        }
    }
    pool.sort_by(|a, b| b.start_time.cmp(&a.start_time));

    ((0..USERS).collect(), pool)
}

fn benchmark_rank(c: &mut Criterion) {
    let (roster, pool) = build_pool();
    let sequential = RankingEngine::new(ScoringStrategy::Sequential);
    let parallel = RankingEngine::new(ScoringStrategy::Parallel);

    let mut group = c.benchmark_group("rank_roster");

    group.bench_function("sequential", |b| {
        b.iter(|| sequential.rank(black_box(&roster), black_box(&pool)))
    });

    group.bench_function("parallel", |b| {
        b.iter(|| parallel.rank(black_box(&roster), black_box(&pool)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_rank);
criterion_main!(benches);
