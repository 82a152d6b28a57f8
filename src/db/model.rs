use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One recorded (movie identifier, vote type) submission. Rows are
/// append-only: never updated or deleted once stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vote {
    pub imdbid: String,
    pub votetype: String,
}

/// Vote-type label mapped to the number of matching rows for one movie.
/// Computed on demand, never persisted.
pub type VoteTally = HashMap<String, i64>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Invalid vote: {0}")]
    InvalidVote(String),
}

pub type DbResult<T> = Result<T, DbError>;
