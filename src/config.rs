// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

use chrono::{DateTime, TimeDelta, Utc};

use crate::services::ScoringStrategy;

const DEFAULT_LOOKBACK_WEEKS: u32 = 4;
const DEFAULT_EXERCISES_PATH: &str = "data/exercises.json";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Trailing window of exercises eligible for ranking, in weeks
    pub ranking_lookback_weeks: u32,
    /// Score ranking rosters on the rayon thread pool
    pub ranking_parallel: bool,
    /// JSON file of exercises loaded by the command-line front end
    pub exercises_path: String,
    /// Fixed end of the ranking window for the command-line front end
    pub ranking_as_of: Option<DateTime<Utc>>,
}

impl Default for Config {
    /// Same values `from_env` yields with no variables set.
    fn default() -> Self {
        Self {
            ranking_lookback_weeks: DEFAULT_LOOKBACK_WEEKS,
            ranking_parallel: true,
            exercises_path: DEFAULT_EXERCISES_PATH.to_string(),
            ranking_as_of: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ranking_lookback_weeks = match lookup("RANKING_LOOKBACK_WEEKS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(weeks) if weeks > 0 => weeks,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "RANKING_LOOKBACK_WEEKS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_LOOKBACK_WEEKS,
        };

        let ranking_parallel = match lookup("RANKING_PARALLEL") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                var: "RANKING_PARALLEL",
                value: raw,
            })?,
            None => true,
        };

        let ranking_as_of = match lookup("RANKING_AS_OF") {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw.trim())
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| ConfigError::Invalid {
                        var: "RANKING_AS_OF",
                        value: raw.clone(),
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            ranking_lookback_weeks,
            ranking_parallel,
            exercises_path: lookup("EXERCISES_PATH")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| DEFAULT_EXERCISES_PATH.to_string()),
            ranking_as_of,
        })
    }

    /// Length of the ranking lookback window.
    pub fn ranking_lookback(&self) -> TimeDelta {
        TimeDelta::weeks(i64::from(self.ranking_lookback_weeks))
    }

    pub fn scoring_strategy(&self) -> ScoringStrategy {
        if self.ranking_parallel {
            ScoringStrategy::Parallel
        } else {
            ScoringStrategy::Sequential
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_vars(lookup_from(&[])).expect("Config should load");

        assert_eq!(config.ranking_lookback_weeks, 4);
        assert!(config.ranking_parallel);
        assert_eq!(config.exercises_path, "data/exercises.json");
        assert_eq!(config.ranking_lookback(), TimeDelta::days(28));
        assert!(config.ranking_as_of.is_none());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_vars(lookup_from(&[
            ("RANKING_LOOKBACK_WEEKS", "2"),
            ("RANKING_PARALLEL", "false"),
            ("EXERCISES_PATH", " /tmp/ex.json "),
            ("RANKING_AS_OF", "2024-06-01T12:00:00+02:00"),
        ]))
        .expect("Config should load");

        assert_eq!(config.ranking_lookback_weeks, 2);
        assert_eq!(config.scoring_strategy(), ScoringStrategy::Sequential);
        assert_eq!(config.exercises_path, "/tmp/ex.json");
        assert_eq!(
            config.ranking_as_of.map(|dt| dt.to_rfc3339()),
            Some("2024-06-01T10:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_config_rejects_zero_weeks() {
        let result = Config::from_vars(lookup_from(&[("RANKING_LOOKBACK_WEEKS", "0")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                var: "RANKING_LOOKBACK_WEEKS",
                ..
            })
        ));
    }

    #[test]
    fn test_config_rejects_bad_as_of() {
        let result = Config::from_vars(lookup_from(&[("RANKING_AS_OF", "tomorrow")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                var: "RANKING_AS_OF",
                ..
            })
        ));
    }

    #[test]
    fn test_config_rejects_bad_bool() {
        let result = Config::from_vars(lookup_from(&[("RANKING_PARALLEL", "maybe")]));
        assert!(result.is_err());
    }
}
