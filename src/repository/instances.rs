//! Book instances repository

use chrono::{NaiveDate, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookSummary,
        instance::{BookInstance, CreateBookInstance, InstanceDetails, UpdateBookInstance},
        LoanStatus,
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT bi.id, bi.imprint, bi.due_back, bi.status, bi.borrower_id, bi.book_id,
           b.title AS book_title, b.isbn AS book_isbn,
           a.last_name || ', ' || a.first_name AS book_author_name
    FROM book_instances bi
    LEFT JOIN books b ON bi.book_id = b.id
    LEFT JOIN authors a ON b.author_id = a.id
"#;

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn details_from_row(row: &PgRow, today: NaiveDate) -> InstanceDetails {
        let due_back: Option<NaiveDate> = row.get("due_back");
        let book_id: Option<i32> = row.get("book_id");

        InstanceDetails {
            id: row.get("id"),
            imprint: row.get("imprint"),
            due_back,
            status: row.get("status"),
            borrower_id: row.get("borrower_id"),
            book: book_id.map(|id| BookSummary {
                id,
                title: row.get("book_title"),
                isbn: row.get("book_isbn"),
                author_name: row.get("book_author_name"),
            }),
            is_overdue: due_back.map(|d| d < today).unwrap_or(false),
        }
    }

    /// List copies ordered by due date
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<(Vec<InstanceDetails>, i64)> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY bi.due_back LIMIT $1 OFFSET $2",
            DETAILS_SELECT
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;

        let today = Utc::now().date_naive();
        let instances = rows
            .iter()
            .map(|row| Self::details_from_row(row, today))
            .collect();

        Ok((instances, total))
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Get copy with its book summary and overdue flag
    pub async fn get_details(&self, id: Uuid) -> AppResult<InstanceDetails> {
        let row = sqlx::query(&format!("{} WHERE bi.id = $1", DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;

        Ok(Self::details_from_row(&row, Utc::now().date_naive()))
    }

    /// Copies of one book, for the book detail view
    pub async fn get_for_book(&self, book_id: i32) -> AppResult<Vec<InstanceDetails>> {
        let rows = sqlx::query(&format!(
            "{} WHERE bi.book_id = $1 ORDER BY bi.due_back",
            DETAILS_SELECT
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        let today = Utc::now().date_naive();
        Ok(rows
            .iter()
            .map(|row| Self::details_from_row(row, today))
            .collect())
    }

    /// Copies on loan to one borrower, soonest due first
    pub async fn loans_by_borrower(&self, borrower_id: i32) -> AppResult<Vec<InstanceDetails>> {
        let rows = sqlx::query(&format!(
            "{} WHERE bi.status = 'o' AND bi.borrower_id = $1 ORDER BY bi.due_back",
            DETAILS_SELECT
        ))
        .bind(borrower_id)
        .fetch_all(&self.pool)
        .await?;

        let today = Utc::now().date_naive();
        Ok(rows
            .iter()
            .map(|row| Self::details_from_row(row, today))
            .collect())
    }

    /// All copies on loan across the library, soonest due first
    pub async fn loans_all(&self, limit: i64, offset: i64) -> AppResult<(Vec<InstanceDetails>, i64)> {
        let rows = sqlx::query(&format!(
            "{} WHERE bi.status = 'o' ORDER BY bi.due_back LIMIT $1 OFFSET $2",
            DETAILS_SELECT
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = 'o'")
                .fetch_one(&self.pool)
                .await?;

        let today = Utc::now().date_naive();
        let instances = rows
            .iter()
            .map(|row| Self::details_from_row(row, today))
            .collect();

        Ok((instances, total))
    }

    /// Create a copy with a fresh UUID
    pub async fn create(&self, instance: &CreateBookInstance) -> AppResult<BookInstance> {
        let created = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, status, borrower_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(instance.book_id)
        .bind(&instance.imprint)
        .bind(instance.due_back)
        .bind(instance.status)
        .bind(instance.borrower_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Update a copy. The book it belongs to is not reassignable.
    pub async fn update(&self, id: Uuid, instance: &UpdateBookInstance) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET imprint = $1, due_back = $2, status = $3, borrower_id = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&instance.imprint)
        .bind(instance.due_back)
        .bind(instance.status)
        .bind(instance.borrower_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Move the due date of a copy (renewal)
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            "UPDATE book_instances SET due_back = $1 WHERE id = $2 RETURNING *",
        )
        .bind(due_back)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Delete a copy
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }

    /// Count copies currently marked available
    pub async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
