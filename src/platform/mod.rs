//! Remote hosted-code platform: the API surface the crawler consumes.

pub mod github;
#[cfg(test)]
pub(crate) mod memory;

pub use github::{GitHubClient, GitHubConnector};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entity::{Entity, EntityRef, RelationClass};
use crate::error::Result;

/// Request quota as last reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub remaining: u32,
    pub limit: u32,
    pub reset_at: Option<DateTime<Utc>>,
}

impl Quota {
    /// Quota of a client that has not seen any rate-limit headers yet.
    pub fn unknown() -> Self {
        Self {
            remaining: u32::MAX,
            limit: u32::MAX,
            reset_at: None,
        }
    }
}

/// Read access to accounts, organizations and repositories.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Fetch the full entity behind a reference.
    async fn fetch(&self, entity: &EntityRef) -> Result<Entity>;

    /// List at most `limit` entities related to `entity` through `class`.
    /// Pages are truncated at the limit, not exhausted.
    async fn related(
        &self,
        entity: &EntityRef,
        class: RelationClass,
        limit: usize,
    ) -> Result<Vec<EntityRef>>;

    /// Most recently observed quota. Does not issue a request.
    fn quota(&self) -> Quota;
}

/// Builds (and rebuilds, after connectivity faults) a [`Platform`] client.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Platform>>;
}
