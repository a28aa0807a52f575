//! In-memory platform for traversal tests: fixed entities and listings,
//! injectable faults, and per-entity fetch counters.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::entity::{Account, Entity, EntityRef, Organization, RelationClass, Repository};
use crate::error::{FoafhubError, Result};
use crate::platform::{Connector, Platform, Quota};

pub(crate) fn account(login: &str) -> Entity {
    Entity::Account(Account {
        login: login.to_string(),
        name: Some(login.to_uppercase()),
        ..Account::default()
    })
}

pub(crate) fn organization(login: &str) -> Entity {
    Entity::Organization(Organization {
        login: login.to_string(),
        ..Organization::default()
    })
}

pub(crate) fn repository(full_name: &str, owner: EntityRef) -> Entity {
    let name = full_name.rsplit('/').next().unwrap_or(full_name).to_string();
    Entity::Repository(Repository {
        full_name: full_name.to_string(),
        name,
        description: None,
        html_url: Some(format!("https://github.com/{}", full_name)),
        languages: BTreeMap::from([("Rust".to_string(), 1000)]),
        owner,
    })
}

#[derive(Default)]
pub(crate) struct MemoryWorld {
    entities: HashMap<EntityRef, Entity>,
    relations: HashMap<(EntityRef, RelationClass), Vec<EntityRef>>,
    aliases: HashMap<EntityRef, EntityRef>,
    forbidden: HashSet<EntityRef>,
    forbidden_relations: HashSet<(EntityRef, RelationClass)>,
    flaky_relations: Mutex<HashSet<(EntityRef, RelationClass)>>,
    broken: HashSet<EntityRef>,
    flaky: Mutex<HashSet<EntityRef>>,
    fetches: Mutex<HashMap<EntityRef, usize>>,
    remaining: AtomicU32,
    connects: AtomicUsize,
}

impl MemoryWorld {
    pub(crate) fn new() -> Self {
        Self {
            remaining: AtomicU32::new(5000),
            ..Self::default()
        }
    }

    pub(crate) fn with(mut self, entity: Entity) -> Self {
        self.entities.insert(entity.key(), entity);
        self
    }

    pub(crate) fn relate(mut self, from: EntityRef, class: RelationClass, targets: Vec<EntityRef>) -> Self {
        self.relations.insert((from, class), targets);
        self
    }

    /// Requests for `requested` are answered with `canonical`, the way the
    /// API answers case variants of a login or a renamed repository.
    pub(crate) fn alias(mut self, requested: EntityRef, canonical: EntityRef) -> Self {
        self.aliases.insert(requested, canonical);
        self
    }

    /// Listing this relation fails with a permission error.
    pub(crate) fn forbid_relation(mut self, entity: EntityRef, class: RelationClass) -> Self {
        self.forbidden_relations.insert((entity, class));
        self
    }

    /// Listing this relation fails once with a network error.
    pub(crate) fn flaky_relation(self, entity: EntityRef, class: RelationClass) -> Self {
        self.flaky_relations.lock().unwrap().insert((entity, class));
        self
    }

    fn canonical(&self, entity: &EntityRef) -> EntityRef {
        self.aliases.get(entity).cloned().unwrap_or_else(|| entity.clone())
    }

    /// Fetching this entity fails with a permission error.
    pub(crate) fn forbid(mut self, entity: EntityRef) -> Self {
        self.forbidden.insert(entity);
        self
    }

    /// Fetching this entity fails once with a network error.
    pub(crate) fn flaky(self, entity: EntityRef) -> Self {
        self.flaky.lock().unwrap().insert(entity);
        self
    }

    /// Fetching this entity fails with an unclassified API error.
    pub(crate) fn broken(mut self, entity: EntityRef) -> Self {
        self.broken.insert(entity);
        self
    }

    pub(crate) fn remaining(self, remaining: u32) -> Self {
        self.remaining.store(remaining, Ordering::SeqCst);
        self
    }

    pub(crate) fn into_connector(self) -> MemoryConnector {
        MemoryConnector(Arc::new(self))
    }
}

pub(crate) struct MemoryConnector(pub(crate) Arc<MemoryWorld>);

impl MemoryConnector {
    pub(crate) fn world(&self) -> Arc<MemoryWorld> {
        self.0.clone()
    }
}

impl MemoryWorld {
    pub(crate) fn fetch_count(&self, entity: &EntityRef) -> usize {
        self.fetches.lock().unwrap().get(entity).copied().unwrap_or(0)
    }

    pub(crate) fn max_fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().values().copied().max().unwrap_or(0)
    }

    pub(crate) fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self) -> Result<Box<dyn Platform>> {
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryPlatform(self.0.clone())))
    }
}

pub(crate) struct MemoryPlatform(Arc<MemoryWorld>);

#[async_trait]
impl Platform for MemoryPlatform {
    async fn fetch(&self, entity: &EntityRef) -> Result<Entity> {
        let world = &self.0;
        let entity = &world.canonical(entity);
        if world.flaky.lock().unwrap().remove(entity) {
            return Err(FoafhubError::Network(format!("connection reset fetching {}", entity)));
        }
        if world.forbidden.contains(entity) {
            return Err(FoafhubError::PermissionDenied(entity.to_string()));
        }
        if world.broken.contains(entity) {
            return Err(FoafhubError::Api {
                status: 500,
                message: entity.to_string(),
            });
        }
        *world.fetches.lock().unwrap().entry(entity.clone()).or_insert(0) += 1;
        world
            .entities
            .get(entity)
            .cloned()
            .ok_or_else(|| FoafhubError::NotFound(entity.to_string()))
    }

    async fn related(
        &self,
        entity: &EntityRef,
        class: RelationClass,
        limit: usize,
    ) -> Result<Vec<EntityRef>> {
        let world = &self.0;
        let entity = world.canonical(entity);
        let listing = (entity, class);
        if world.flaky_relations.lock().unwrap().remove(&listing) {
            return Err(FoafhubError::Network(format!("connection reset listing {} of {}", class, listing.0)));
        }
        if world.forbidden_relations.contains(&listing) {
            return Err(FoafhubError::PermissionDenied(format!("{} of {}", class, listing.0)));
        }
        Ok(world
            .relations
            .get(&listing)
            .map(|targets| targets.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn quota(&self) -> Quota {
        Quota {
            remaining: self.0.remaining.load(Ordering::SeqCst),
            limit: 5000,
            reset_at: None,
        }
    }
}
