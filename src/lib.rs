// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise tracker: per-user exercise bookkeeping and activity ranking.
//!
//! The core is two pure computations over already-fetched exercises:
//! time-overlap conflict detection within one user's exercises, and a
//! weighted, recency-decayed ranking across users.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;
