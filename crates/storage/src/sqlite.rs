use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::domain::{
    MonitoredRow, Relationship, RelationshipId, RelationshipRef, RowId, RowPayload,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use tracing::info;

use crate::{location::ensure_sqlite_parent_dir_exists, RelationalStore, RowRange, StoreError};

/// Local store with the same schema as the hosted one.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!(%database_url, "opened sqlite store");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_relationship(&self, name: &str) -> Result<RelationshipId, StoreError> {
        let result = sqlx::query("INSERT INTO relationships (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(RelationshipId(result.last_insert_rowid()))
    }
}

fn row_from_sqlite(row: &SqliteRow) -> Result<MonitoredRow, sqlx::Error> {
    let relationship_id: Option<i64> = row.try_get("relationship_id")?;
    let relationship_name: Option<String> = row.try_get("relationship_name")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(MonitoredRow {
        id: RowId(row.try_get("id")?),
        relationship_id: relationship_id.map(RelationshipId),
        column_1: row.try_get("column_1")?,
        column_2: row.try_get("column_2")?,
        column_3: row.try_get("column_3")?,
        column_4: row.try_get("column_4")?,
        column_5: row.try_get("column_5")?,
        column_6: row.try_get("column_6")?,
        column_7: row.try_get("column_7")?,
        column_8: row.try_get("column_8")?,
        created_at,
        relationship: relationship_name.map(|name| RelationshipRef { name }),
    })
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl RelationalStore for SqliteStore {
    async fn count_rows(&self, relationship_id: RelationshipId) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM country_monitored_relationships WHERE relationship_id = ?",
        )
        .bind(relationship_id.0)
        .fetch_one(&self.pool)
        .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn fetch_rows(
        &self,
        relationship_id: RelationshipId,
        range: RowRange,
    ) -> Result<Vec<MonitoredRow>, StoreError> {
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT m.id, m.relationship_id,
                   m.column_1, m.column_2, m.column_3, m.column_4,
                   m.column_5, m.column_6, m.column_7, m.column_8,
                   m.created_at, r.name AS relationship_name
            FROM country_monitored_relationships m
            LEFT JOIN relationships r ON r.id = m.relationship_id
            WHERE m.relationship_id = ?
            ORDER BY m.created_at ASC, m.id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(relationship_id.0)
        .bind(to_i64(range.len()))
        .bind(to_i64(range.start))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(row_from_sqlite)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    async fn insert_row(&self, payload: &RowPayload) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO country_monitored_relationships (
                relationship_id, column_1, column_2, column_3, column_4,
                column_5, column_6, column_7, column_8, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(payload.relationship_id.map(|id| id.0))
        .bind(&payload.column_1)
        .bind(&payload.column_2)
        .bind(&payload.column_3)
        .bind(&payload.column_4)
        .bind(&payload.column_5)
        .bind(&payload.column_6)
        .bind(payload.column_7.as_deref())
        .bind(payload.column_8.as_deref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_row(&self, id: RowId, payload: &RowPayload) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE country_monitored_relationships
            SET relationship_id = ?,
                column_1 = ?, column_2 = ?, column_3 = ?,
                column_4 = ?, column_5 = ?, column_6 = ?,
                column_7 = COALESCE(?, column_7),
                column_8 = COALESCE(?, column_8)
            WHERE id = ?
            "#,
        )
        .bind(payload.relationship_id.map(|id| id.0))
        .bind(&payload.column_1)
        .bind(&payload.column_2)
        .bind(&payload.column_3)
        .bind(&payload.column_4)
        .bind(&payload.column_5)
        .bind(&payload.column_6)
        .bind(payload.column_7.as_deref())
        .bind(payload.column_8.as_deref())
        .bind(id.0)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_row(&self, id: RowId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM country_monitored_relationships WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_relationships(&self) -> Result<Vec<Relationship>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM relationships ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| {
                Ok(Relationship {
                    id: RelationshipId(row.try_get("id")?),
                    name: row.try_get("name")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(StoreError::from)
    }
}

#[cfg(test)]
#[path = "tests/sqlite_tests.rs"]
mod tests;
