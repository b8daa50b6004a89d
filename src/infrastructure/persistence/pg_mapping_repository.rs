//! PostgreSQL implementation of the mapping store.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use crate::domain::entities::{NewMapping, UrlMapping};
use crate::domain::repositories::{InsertOutcome, MappingRepository, StoreError};

/// Aggregate figures for the admin CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSummary {
    pub total_mappings: i64,
    pub total_visits: i64,
}

/// PostgreSQL repository for URL mappings.
///
/// The conditional write is `INSERT .. ON CONFLICT DO NOTHING` on the primary
/// key and the counter uses `visit_count = visit_count + 1`, so both rely on
/// row-level guarantees of the database rather than on a prior read.
///
/// The table name is configurable and is interpolated into SQL, so it must
/// pass [`is_valid_table_name`].
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
    table: String,
}

/// Returns true for a plain SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`, max 63 chars).
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }

    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if `table` is not a valid identifier.
    pub fn new(pool: Arc<PgPool>, table: impl Into<String>) -> Result<Self, StoreError> {
        let table = table.into();

        if !is_valid_table_name(&table) {
            return Err(StoreError::Unavailable(format!(
                "invalid table name '{table}'"
            )));
        }

        Ok(Self { pool, table })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Creates the mapping table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                short_code   TEXT PRIMARY KEY,
                original_url TEXT NOT NULL,
                created_at   BIGINT NOT NULL,
                visit_count  BIGINT NOT NULL DEFAULT 0 CHECK (visit_count >= 0)
            )
            "#,
            table = self.table
        );

        sqlx::query(&sql).execute(self.pool.as_ref()).await?;

        Ok(())
    }

    /// Looks up one mapping.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, StoreError> {
        let sql = format!(
            "SELECT short_code, original_url, created_at, visit_count FROM {} WHERE short_code = $1",
            self.table
        );

        let row = sqlx::query(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(|r| map_row(&r)).transpose()
    }

    /// Counts mappings and sums their visits.
    pub async fn summary(&self) -> Result<MappingSummary, StoreError> {
        let sql = format!(
            "SELECT COUNT(*) AS total_mappings, COALESCE(SUM(visit_count), 0)::BIGINT AS total_visits FROM {}",
            self.table
        );

        let row = sqlx::query(&sql).fetch_one(self.pool.as_ref()).await?;

        Ok(MappingSummary {
            total_mappings: row.try_get("total_mappings")?,
            total_visits: row.try_get("total_visits")?,
        })
    }

    /// Returns the `limit` most visited mappings.
    pub async fn top_by_visits(&self, limit: i64) -> Result<Vec<UrlMapping>, StoreError> {
        let sql = format!(
            r#"
            SELECT short_code, original_url, created_at, visit_count
            FROM {}
            ORDER BY visit_count DESC, created_at DESC
            LIMIT $1
            "#,
            self.table
        );

        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.iter().map(map_row).collect()
    }

    /// Returns the `limit` most recently created mappings.
    pub async fn recent(&self, limit: i64) -> Result<Vec<UrlMapping>, StoreError> {
        let sql = format!(
            r#"
            SELECT short_code, original_url, created_at, visit_count
            FROM {}
            ORDER BY created_at DESC, short_code
            LIMIT $1
            "#,
            self.table
        );

        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.iter().map(map_row).collect()
    }

    /// Counts mappings created in each hour of the day (UTC), index 0 to 23.
    pub async fn hourly_created(&self) -> Result<[i64; 24], StoreError> {
        let sql = format!(
            r#"
            SELECT EXTRACT(HOUR FROM to_timestamp(created_at) AT TIME ZONE 'UTC')::INT AS hour,
                   COUNT(*) AS created
            FROM {}
            GROUP BY 1
            "#,
            self.table
        );

        let rows = sqlx::query(&sql).fetch_all(self.pool.as_ref()).await?;

        let mut hours = [0i64; 24];
        for row in &rows {
            let hour: i32 = row.try_get("hour")?;
            let created: i64 = row.try_get("created")?;

            if let Some(slot) = usize::try_from(hour).ok().and_then(|h| hours.get_mut(h)) {
                *slot = created;
            }
        }

        Ok(hours)
    }
}

fn map_row(row: &sqlx::postgres::PgRow) -> Result<UrlMapping, StoreError> {
    Ok(UrlMapping::new(
        row.try_get("short_code")?,
        row.try_get("original_url")?,
        row.try_get("created_at")?,
        row.try_get("visit_count")?,
    ))
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn insert_if_absent(&self, new_mapping: NewMapping) -> Result<InsertOutcome, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {} (short_code, original_url, created_at, visit_count)
            VALUES ($1, $2, $3, 0)
            ON CONFLICT (short_code) DO NOTHING
            "#,
            self.table
        );

        let result = sqlx::query(&sql)
            .bind(&new_mapping.code)
            .bind(&new_mapping.original_url)
            .bind(new_mapping.created_at)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 1 {
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::AlreadyExists)
        }
    }

    async fn increment_visit_count(&self, code: &str) -> Result<i64, StoreError> {
        let sql = format!(
            r#"
            UPDATE {}
            SET visit_count = visit_count + 1
            WHERE short_code = $1
            RETURNING visit_count
            "#,
            self.table
        );

        let visit_count: Option<i64> = sqlx::query_scalar(&sql)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        visit_count.ok_or_else(|| StoreError::not_found(code))
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_table_names() {
        assert!(is_valid_table_name("url_mappings"));
        assert!(is_valid_table_name("_staging2"));
        assert!(is_valid_table_name("T"));
    }

    #[test]
    fn test_invalid_table_names() {
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2fast"));
        assert!(!is_valid_table_name("url-shortener-table"));
        assert!(!is_valid_table_name("links; DROP TABLE links"));
        assert!(!is_valid_table_name(&"a".repeat(64)));
    }
}
