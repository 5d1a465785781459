// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

use crate::models::ExerciseId;

/// Application error type.
///
/// Transport layers map [`AppError::kind`] to their own status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Time conflict with other user exercises with ids {ids:?}")]
    Conflict { ids: Vec<ExerciseId> },

    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable label for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::InvalidUpdate(_) => "invalid_update",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    /// One `field message` line per violation, sorted for stable output.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut lines: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{} {}", field, message)
                })
            })
            .collect();
        lines.sort();

        AppError::Validation(lines.join("\n"))
    }
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, AppError>;
