//! Room/group data model and its persisted store.
//!
//! The registry maps rooms to their named groups, and groups to the people in them.
//! `GroupStore` owns the registry and pairs every mutation with a save through a
//! `GenericPersistence` backend, while holding a single lock, so saves never interleave.

pub mod file;

use std::{collections::BTreeMap, ops::Deref, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::base::types::{Person, Res, Void};

// Data model.

/// All rooms known to the bot, keyed by room ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Registry {
    pub rooms: BTreeMap<String, Room>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Room {
    #[serde(default)]
    pub groups: BTreeMap<String, Group>,
}

/// A named set of people, keyed by person ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Group {
    #[serde(default)]
    pub people: BTreeMap<String, Person>,
}

impl Registry {
    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Gets the room, creating an empty one if it does not exist yet.
    pub fn room_mut(&mut self, room_id: &str) -> &mut Room {
        self.rooms.entry(room_id.to_string()).or_default()
    }

    pub fn group(&self, room_id: &str, name: &str) -> Option<&Group> {
        self.room(room_id).and_then(|room| room.groups.get(name))
    }

    pub fn group_mut(&mut self, room_id: &str, name: &str) -> Option<&mut Group> {
        self.room_mut(room_id).groups.get_mut(name)
    }
}

impl Group {
    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn contains(&self, person_id: &str) -> bool {
        self.people.contains_key(person_id)
    }

    /// Adds the person, keyed by ID. Returns `false` if they were already a member.
    pub fn add(&mut self, person: Person) -> bool {
        if self.contains(&person.id) {
            return false;
        }

        self.people.insert(person.id.clone(), person);
        true
    }

    pub fn remove(&mut self, person_id: &str) -> bool {
        self.people.remove(person_id).is_some()
    }

    pub fn members(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }
}

/// Result of attempting to create a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// The group already exists; carries its member count.
    AlreadyExists(usize),
}

// Traits.

/// Generic persistence trait that store backends must implement.
///
/// The backend holds a point-in-time snapshot of the registry; the in-memory registry stays authoritative.
#[async_trait]
pub trait GenericPersistence: Send + Sync + 'static {
    /// Loads the last saved registry.
    async fn load(&self) -> Res<Registry>;

    /// Replaces the saved registry with the given one.
    async fn save(&self, registry: &Registry) -> Void;
}

/// Persistence client for groupbot.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct PersistenceClient {
    inner: Arc<dyn GenericPersistence>,
}

impl Deref for PersistenceClient {
    type Target = dyn GenericPersistence;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl PersistenceClient {
    pub fn new(inner: Arc<dyn GenericPersistence>) -> Self {
        Self { inner }
    }
}

// Store.

/// The in-memory group registry, shared across handlers.
///
/// This is trivially cloneable; clones share the same registry.
#[derive(Clone)]
pub struct GroupStore {
    registry: Arc<Mutex<Registry>>,
    persistence: PersistenceClient,
}

impl GroupStore {
    /// Creates the store from whatever the persistence backend holds.
    ///
    /// A failed load is logged and the store starts empty.
    #[instrument(name = "GroupStore::load", skip_all)]
    pub async fn load(persistence: PersistenceClient) -> Self {
        let registry = match persistence.load().await {
            Ok(registry) => {
                info!("Loaded {} rooms from the store.", registry.rooms.len());
                registry
            }
            Err(err) => {
                warn!("Could not load the store, starting empty: {}", err);
                Registry::default()
            }
        };

        Self::with_registry(registry, persistence)
    }

    pub fn with_registry(registry: Registry, persistence: PersistenceClient) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
            persistence,
        }
    }

    /// Returns a copy of the current registry.
    pub async fn snapshot(&self) -> Registry {
        self.registry.lock().await.clone()
    }

    /// Makes sure the room exists. Does not persist.
    pub async fn ensure_room(&self, room_id: &str) {
        self.registry.lock().await.room_mut(room_id);
    }

    /// Returns a copy of the group, if it exists.
    pub async fn group(&self, room_id: &str, name: &str) -> Option<Group> {
        self.registry.lock().await.group(room_id, name).cloned()
    }

    pub async fn group_names(&self, room_id: &str) -> Vec<String> {
        let registry = self.registry.lock().await;

        registry.room(room_id).map(|room| room.groups.keys().cloned().collect()).unwrap_or_default()
    }

    /// Of the given person IDs, returns those not yet in the group; `None` if the group does not exist.
    pub async fn missing_members(&self, room_id: &str, name: &str, person_ids: &[String]) -> Option<Vec<String>> {
        let registry = self.registry.lock().await;
        let group = registry.group(room_id, name)?;

        let mut missing: Vec<String> = Vec::new();
        for id in person_ids {
            if !group.contains(id) && !missing.contains(id) {
                missing.push(id.clone());
            }
        }

        Some(missing)
    }

    #[instrument(skip(self))]
    pub async fn create_group(&self, room_id: &str, name: &str) -> CreateOutcome {
        let mut registry = self.registry.lock().await;
        let room = registry.room_mut(room_id);

        if let Some(group) = room.groups.get(name) {
            return CreateOutcome::AlreadyExists(group.len());
        }

        room.groups.insert(name.to_string(), Group::default());
        self.persist(&registry).await;

        CreateOutcome::Created
    }

    /// Removes the group. Returns `false` if it did not exist.
    #[instrument(skip(self))]
    pub async fn delete_group(&self, room_id: &str, name: &str) -> bool {
        let mut registry = self.registry.lock().await;

        if registry.room_mut(room_id).groups.remove(name).is_none() {
            return false;
        }

        self.persist(&registry).await;

        true
    }

    /// Adds all the people to the group in one step and persists once.
    ///
    /// Returns the number of people actually added, or `None` if the group does not exist.
    #[instrument(skip(self, people))]
    pub async fn add_members(&self, room_id: &str, name: &str, people: Vec<Person>) -> Option<usize> {
        let mut registry = self.registry.lock().await;
        let group = registry.group_mut(room_id, name)?;

        let added = people.into_iter().filter(|person| group.add(person.clone())).count();

        if added > 0 {
            self.persist(&registry).await;
        }

        Some(added)
    }

    /// Removes the people from the group and persists once.
    ///
    /// Returns the number of people actually removed, or `None` if the group does not exist.
    #[instrument(skip(self))]
    pub async fn remove_members(&self, room_id: &str, name: &str, person_ids: &[String]) -> Option<usize> {
        let mut registry = self.registry.lock().await;
        let group = registry.group_mut(room_id, name)?;

        let removed = person_ids.iter().filter(|id| group.remove(id)).count();

        self.persist(&registry).await;

        Some(removed)
    }

    /// Saves the registry. Must be called with the registry lock held.
    async fn persist(&self, registry: &Registry) {
        if let Err(err) = self.persistence.save(registry).await {
            error!("Failed to save the store: {}", err);
        }
    }
}

// Tests.
