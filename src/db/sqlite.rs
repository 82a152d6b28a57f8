use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Executor;
use tracing::info;

use super::model::*;
use super::repo::*;

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(db_path: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let repo = Self { pool };

        repo.init_schema().await?;

        info!("Database initialized at {}", db_path);

        Ok(repo)
    }

    async fn init_schema(&self) -> DbResult<()> {
        let schema = include_str!("schema.sql");
        self.pool.execute(schema).await?;
        Ok(())
    }

    /// Single-connection in-memory database for tests. A larger pool would
    /// hand each connection its own empty `:memory:` database.
    #[cfg(test)]
    pub(crate) async fn open_in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let repo = Self { pool };
        repo.init_schema().await?;

        Ok(repo)
    }
}

#[async_trait]
impl VoteRepo for SqliteRepository {
    async fn insert_vote(&self, vote: &Vote) -> DbResult<()> {
        if vote.imdbid.is_empty() {
            return Err(DbError::InvalidVote("empty movie id".to_string()));
        }

        sqlx::query("INSERT INTO votes (imdbid, votetype) VALUES (?, ?)")
            .bind(&vote.imdbid)
            .bind(&vote.votetype)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn vote_tally(&self, imdb_id: &str) -> DbResult<VoteTally> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT votetype, COUNT(*) FROM votes WHERE imdbid = ? GROUP BY votetype",
        )
        .bind(imdb_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
