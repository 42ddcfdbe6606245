//! In-memory category store

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{CategoryRecord, CategoryStore};
use crate::error::{CategoryError, CategoryResult};
use crate::registry::TypeIdentifier;

#[derive(Debug, Default)]
struct Tables {
    last_id: i64,
    rows: BTreeMap<i64, (TypeIdentifier, CategoryRecord)>,
}

/// Process-local store backed by a `BTreeMap`
///
/// Ids are allocated from a single counter shared by every type and are
/// never reused. Each call holds the lock for its whole duration, so a save
/// is trivially atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all types
    #[must_use]
    pub fn total(&self) -> usize {
        self.tables.read().rows.len()
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn count(&self, category_type: &TypeIdentifier) -> CategoryResult<u64> {
        let tables = self.tables.read();
        let count = tables
            .rows
            .values()
            .filter(|(owner, _)| owner == category_type)
            .count();
        Ok(count as u64)
    }

    async fn list(
        &self,
        category_type: &TypeIdentifier,
        offset: u64,
        limit: u64,
    ) -> CategoryResult<Vec<CategoryRecord>> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        let tables = self.tables.read();
        Ok(tables
            .rows
            .values()
            .filter(|(owner, _)| owner == category_type)
            .skip(offset)
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn get(
        &self,
        category_type: &TypeIdentifier,
        id: i64,
    ) -> CategoryResult<Option<CategoryRecord>> {
        let tables = self.tables.read();
        Ok(tables
            .rows
            .get(&id)
            .filter(|(owner, _)| owner == category_type)
            .map(|(_, record)| record.clone()))
    }

    async fn save(
        &self,
        category_type: &TypeIdentifier,
        mut record: CategoryRecord,
    ) -> CategoryResult<CategoryRecord> {
        let mut tables = self.tables.write();

        let id = if let Some(id) = record.id {
            let owned = tables
                .rows
                .get(&id)
                .is_some_and(|(owner, _)| owner == category_type);
            if !owned {
                return Err(CategoryError::NotFound(format!("{category_type} #{id}")));
            }
            id
        } else {
            tables.last_id += 1;
            tables.last_id
        };

        record.id = Some(id);
        tables
            .rows
            .insert(id, (category_type.clone(), record.clone()));
        Ok(record)
    }

    async fn delete(&self, category_type: &TypeIdentifier, id: i64) -> CategoryResult<bool> {
        let mut tables = self.tables.write();
        let owned = tables
            .rows
            .get(&id)
            .is_some_and(|(owner, _)| owner == category_type);
        if owned {
            tables.rows.remove(&id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> TypeIdentifier {
        TypeIdentifier::new("blog", "tag")
    }

    fn regions() -> TypeIdentifier {
        TypeIdentifier::new("geo", "region")
    }

    #[tokio::test]
    async fn test_save_assigns_ids() {
        let store = MemoryStore::new();
        let first = store.save(&tags(), CategoryRecord::new("rust")).await.unwrap();
        let second = store.save(&tags(), CategoryRecord::new("htmx")).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(store.count(&tags()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_in_place() {
        let store = MemoryStore::new();
        let mut saved = store.save(&tags(), CategoryRecord::new("rust")).await.unwrap();
        saved.category_name = "rustlang".into();
        store.save(&tags(), saved.clone()).await.unwrap();

        assert_eq!(store.total(), 1);
        let fetched = store.get(&tags(), saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(fetched.category_name, "rustlang");
    }

    #[tokio::test]
    async fn test_records_are_scoped_to_type() {
        let store = MemoryStore::new();
        let tag = store.save(&tags(), CategoryRecord::new("rust")).await.unwrap();
        let id = tag.id.unwrap();

        assert!(store.get(&regions(), id).await.unwrap().is_none());
        assert!(!store.delete(&regions(), id).await.unwrap());
        assert!(store.save(&regions(), tag).await.is_err());
        assert_eq!(store.count(&regions()).await.unwrap(), 0);
        assert_eq!(store.count(&tags()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_window() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c", "d", "e"] {
            store.save(&tags(), CategoryRecord::new(name)).await.unwrap();
        }
        store.save(&regions(), CategoryRecord::new("north")).await.unwrap();

        let page = store.list(&tags(), 2, 2).await.unwrap();
        let names: Vec<_> = page.iter().map(|r| r.category_name.as_str()).collect();
        assert_eq!(names, ["c", "d"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let saved = store.save(&tags(), CategoryRecord::new("rust")).await.unwrap();
        let id = saved.id.unwrap();

        assert!(store.delete(&tags(), id).await.unwrap());
        assert!(!store.delete(&tags(), id).await.unwrap());
        assert!(store.get(&tags(), id).await.unwrap().is_none());
    }
}
