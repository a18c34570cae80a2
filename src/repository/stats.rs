//! Site statistics repository

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

#[derive(Clone)]
pub struct StatsRepository {
    pool: Pool<Postgres>,
}

impl StatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn count_books(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_instances(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_authors(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Bump and return the site visit counter. A single counter row seeded
    /// by the init migration stands in for per-session counting, since the
    /// API itself is stateless.
    pub async fn record_visit(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "UPDATE site_visits SET count = count + 1 WHERE id = 1 RETURNING count",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
