//! JSON file persistence for the group store.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::base::types::{Res, Void};

use super::{GenericPersistence, PersistenceClient, Registry};

// Extra methods on `PersistenceClient` applied by the file implementation.

impl PersistenceClient {
    /// Creates a persistence client backed by a single JSON file.
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(JsonFilePersistence::new(path)),
        }
    }
}

/// Stores the whole registry as one JSON object in a single file.
///
/// Saves write a sibling `.tmp` file and rename it over the target, so readers never see a partial write.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");

        self.path.with_file_name(name)
    }
}

#[async_trait]
impl GenericPersistence for JsonFilePersistence {
    #[instrument(skip_all)]
    async fn load(&self) -> Res<Registry> {
        let data = tokio::fs::read_to_string(&self.path).await?;
        let registry = serde_json::from_str(&data)?;

        Ok(registry)
    }

    #[instrument(skip_all)]
    async fn save(&self, registry: &Registry) -> Void {
        let data = serde_json::to_string(registry)?;
        debug!("Saving store: {}", data);

        let temp = self.temp_path();
        tokio::fs::write(&temp, data).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        Ok(())
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::base::types::Person;
    use crate::service::store::{Group, GroupStore, Room};

    fn sample_registry() -> Registry {
        let mut group = Group::default();
        let mut alice = Person::new("P1", "Alice");
        alice.extra.insert("emails".to_string(), json!(["alice@example.com"]));
        group.add(alice);
        group.add(Person::new("P2", "Bob"));

        let mut room = Room::default();
        room.groups.insert("team1".to_string(), group);
        room.groups.insert("empty".to_string(), Group::default());

        let mut registry = Registry::default();
        registry.rooms.insert("R1".to_string(), room);
        registry.rooms.insert("R2".to_string(), Room::default());
        registry
    }

    #[tokio::test]
    async fn test_missing_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFilePersistence::new(dir.path().join("cache.db"));

        assert!(persistence.load().await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_file_starts_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");
        std::fs::write(&path, "{ not json").unwrap();

        let store = GroupStore::load(PersistenceClient::json_file(&path)).await;

        assert_eq!(store.snapshot().await, Registry::default());
    }

    #[tokio::test]
    async fn test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFilePersistence::new(dir.path().join("cache.db"));

        persistence.save(&sample_registry()).await.unwrap();

        let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(persistence.path()).unwrap()).unwrap();
        assert_eq!(
            saved,
            json!({
                "R1": { "groups": {
                    "empty": { "people": {} },
                    "team1": { "people": {
                        "P1": { "id": "P1", "displayName": "Alice", "emails": ["alice@example.com"] },
                        "P2": { "id": "P2", "displayName": "Bob" },
                    } },
                } },
                "R2": { "groups": {} },
            })
        );
        assert!(!persistence.temp_path().exists());
    }

    #[tokio::test]
    async fn test_save_load_save_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFilePersistence::new(dir.path().join("cache.db"));

        persistence.save(&sample_registry()).await.unwrap();
        let first = std::fs::read(persistence.path()).unwrap();

        let loaded = persistence.load().await.unwrap();
        assert_eq!(loaded, sample_registry());

        persistence.save(&loaded).await.unwrap();
        let second = std::fs::read(persistence.path()).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFilePersistence::new(dir.path().join("cache.db"));

        persistence.save(&sample_registry()).await.unwrap();
        persistence.save(&Registry::default()).await.unwrap();

        assert_eq!(std::fs::read_to_string(persistence.path()).unwrap(), "{}");
    }
}
