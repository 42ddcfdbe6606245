//! SQLite-backed category store
//!
//! # Database Schema
//!
//! ```sql
//! CREATE TABLE category_records (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     namespace TEXT NOT NULL,
//!     type_name TEXT NOT NULL,
//!     category_name TEXT NOT NULL
//! );
//!
//! CREATE TABLE category_values (
//!     record_id INTEGER NOT NULL REFERENCES category_records(id) ON DELETE CASCADE,
//!     field_name TEXT NOT NULL,
//!     value TEXT NOT NULL,
//!     PRIMARY KEY (record_id, field_name)
//! );
//! ```
//!
//! Field values are stored as JSON text. A record and its value rows are
//! always written in one transaction.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use super::{CategoryRecord, CategoryStore};
use crate::error::{CategoryError, CategoryResult};
use crate::registry::TypeIdentifier;

/// Category store over a sqlx SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap an existing pool
    ///
    /// The schema is not created; call [`Self::migrate`] if needed.
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `url` and create the schema
    ///
    /// In-memory databases are pinned to a single long-lived connection,
    /// since every SQLite connection to `:memory:` sees its own database.
    pub async fn connect(url: &str) -> CategoryResult<Self> {
        let options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = options.connect(url).await?;
        let store = Self::from_pool(pool);
        store.migrate().await?;

        tracing::info!(url, "Category store connected");
        Ok(store)
    }

    /// Create tables and indexes if they do not exist
    pub async fn migrate(&self) -> CategoryResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS category_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                namespace TEXT NOT NULL,
                type_name TEXT NOT NULL,
                category_name TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE INDEX IF NOT EXISTS idx_category_records_type
            ON category_records (namespace, type_name)
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS category_values (
                record_id INTEGER NOT NULL REFERENCES category_records(id) ON DELETE CASCADE,
                field_name TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (record_id, field_name)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn load_values(&self, id: i64) -> CategoryResult<BTreeMap<String, serde_json::Value>> {
        let rows = sqlx::query(
            r"
            SELECT field_name, value
            FROM category_values
            WHERE record_id = ?
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut values = BTreeMap::new();
        for row in rows {
            let name: String = row.try_get("field_name")?;
            let raw: String = row.try_get("value")?;
            let value = serde_json::from_str(&raw).map_err(|e| {
                CategoryError::Store(format!("corrupt value for field {name} of record {id}: {e}"))
            })?;
            values.insert(name, value);
        }
        Ok(values)
    }

    async fn hydrate(&self, id: i64, category_name: String) -> CategoryResult<CategoryRecord> {
        Ok(CategoryRecord {
            id: Some(id),
            category_name,
            values: self.load_values(id).await?,
        })
    }
}

#[async_trait]
impl CategoryStore for SqliteStore {
    async fn count(&self, category_type: &TypeIdentifier) -> CategoryResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM category_records
            WHERE namespace = ? AND type_name = ?
            ",
        )
        .bind(category_type.namespace.as_str())
        .bind(category_type.name.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn list(
        &self,
        category_type: &TypeIdentifier,
        offset: u64,
        limit: u64,
    ) -> CategoryResult<Vec<CategoryRecord>> {
        let rows = sqlx::query(
            r"
            SELECT id, category_name
            FROM category_records
            WHERE namespace = ? AND type_name = ?
            ORDER BY id
            LIMIT ? OFFSET ?
            ",
        )
        .bind(category_type.namespace.as_str())
        .bind(category_type.name.as_str())
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id")?;
            let category_name: String = row.try_get("category_name")?;
            records.push(self.hydrate(id, category_name).await?);
        }
        Ok(records)
    }

    async fn get(
        &self,
        category_type: &TypeIdentifier,
        id: i64,
    ) -> CategoryResult<Option<CategoryRecord>> {
        let row = sqlx::query(
            r"
            SELECT category_name
            FROM category_records
            WHERE id = ? AND namespace = ? AND type_name = ?
            ",
        )
        .bind(id)
        .bind(category_type.namespace.as_str())
        .bind(category_type.name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let category_name: String = row.try_get("category_name")?;
                Ok(Some(self.hydrate(id, category_name).await?))
            }
            None => Ok(None),
        }
    }

    async fn save(
        &self,
        category_type: &TypeIdentifier,
        mut record: CategoryRecord,
    ) -> CategoryResult<CategoryRecord> {
        let mut tx = self.pool.begin().await?;

        let id = if let Some(id) = record.id {
            let updated = sqlx::query(
                r"
                UPDATE category_records
                SET category_name = ?
                WHERE id = ? AND namespace = ? AND type_name = ?
                ",
            )
            .bind(record.category_name.as_str())
            .bind(id)
            .bind(category_type.namespace.as_str())
            .bind(category_type.name.as_str())
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                // Dropping `tx` rolls back
                return Err(CategoryError::NotFound(format!("{category_type} #{id}")));
            }
            id
        } else {
            sqlx::query(
                r"
                INSERT INTO category_records (namespace, type_name, category_name)
                VALUES (?, ?, ?)
                ",
            )
            .bind(category_type.namespace.as_str())
            .bind(category_type.name.as_str())
            .bind(record.category_name.as_str())
            .execute(&mut *tx)
            .await?
            .last_insert_rowid()
        };

        sqlx::query("DELETE FROM category_values WHERE record_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for (name, value) in &record.values {
            let encoded = serde_json::to_string(value)
                .map_err(|e| CategoryError::Store(format!("cannot encode field {name}: {e}")))?;
            sqlx::query(
                r"
                INSERT INTO category_values (record_id, field_name, value)
                VALUES (?, ?, ?)
                ",
            )
            .bind(id)
            .bind(name.as_str())
            .bind(encoded)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        record.id = Some(id);
        Ok(record)
    }

    async fn delete(&self, category_type: &TypeIdentifier, id: i64) -> CategoryResult<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r"
            DELETE FROM category_records
            WHERE id = ? AND namespace = ? AND type_name = ?
            ",
        )
        .bind(id)
        .bind(category_type.namespace.as_str())
        .bind(category_type.name.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if deleted > 0 {
            sqlx::query("DELETE FROM category_values WHERE record_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tags() -> TypeIdentifier {
        TypeIdentifier::new("blog", "tag")
    }

    async fn store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = store().await;
        store.migrate().await.unwrap();
        assert_eq!(store.count(&tags()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip_values() {
        let store = store().await;
        let record = CategoryRecord::new("rust")
            .with_value("priority", 7)
            .with_value("featured", true)
            .with_value("colour", "orange");

        let saved = store.save(&tags(), record).await.unwrap();
        let fetched = store.get(&tags(), saved.id.unwrap()).await.unwrap().unwrap();

        assert_eq!(fetched.category_name, "rust");
        assert_eq!(fetched.values.get("priority"), Some(&json!(7)));
        assert_eq!(fetched.values.get("featured"), Some(&json!(true)));
        assert_eq!(fetched.values.get("colour"), Some(&json!("orange")));
    }

    #[tokio::test]
    async fn test_update_replaces_value_rows() {
        let store = store().await;
        let saved = store
            .save(&tags(), CategoryRecord::new("rust").with_value("colour", "orange"))
            .await
            .unwrap();

        let mut changed = saved.clone();
        changed.values.clear();
        changed.set_field("size", 3);
        store.save(&tags(), changed).await.unwrap();

        let fetched = store.get(&tags(), saved.id.unwrap()).await.unwrap().unwrap();
        assert!(!fetched.values.contains_key("colour"));
        assert_eq!(fetched.values.get("size"), Some(&json!(3)));
        assert_eq!(store.count(&tags()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_of_foreign_record_rolls_back() {
        let store = store().await;
        let saved = store.save(&tags(), CategoryRecord::new("rust")).await.unwrap();

        let other = TypeIdentifier::new("geo", "region");
        let mut hijack = saved.clone();
        hijack.category_name = "hijacked".into();
        assert!(store.save(&other, hijack).await.is_err());

        let fetched = store.get(&tags(), saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(fetched.category_name, "rust");
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let store = store().await;
        for name in ["a", "b", "c"] {
            store.save(&tags(), CategoryRecord::new(name)).await.unwrap();
        }

        let listed = store.list(&tags(), 1, 10).await.unwrap();
        let names: Vec<_> = listed.iter().map(|r| r.category_name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);

        let id = listed[0].id.unwrap();
        assert!(store.delete(&tags(), id).await.unwrap());
        assert!(!store.delete(&tags(), id).await.unwrap());
        assert_eq!(store.count(&tags()).await.unwrap(), 2);
    }
}
