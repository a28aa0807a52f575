//! Frontier and dedup store: pending queue, visited set and node table.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::entity::EntityRef;
use crate::graph::{Node, Vocabulary};

/// FIFO of entities awaiting traversal, plus the per-run bookkeeping that
/// keeps each entity described once and bound to one node.
///
/// Single-owner: the traversal loop is the only caller.
pub struct Frontier {
    vocab: Vocabulary,
    queue: VecDeque<EntityRef>,
    pending: HashSet<EntityRef>,
    visited: HashSet<EntityRef>,
    nodes: HashMap<EntityRef, Node>,
}

impl Frontier {
    pub fn new(vocab: Vocabulary) -> Self {
        Self {
            vocab,
            queue: VecDeque::new(),
            pending: HashSet::new(),
            visited: HashSet::new(),
            nodes: HashMap::new(),
        }
    }

    /// Append to the tail. Entities already queued or visited are ignored;
    /// returns whether the entity was added.
    pub fn enqueue(&mut self, entity: EntityRef) -> bool {
        let key = entity.normalized();
        if self.visited.contains(&key) || self.pending.contains(&key) {
            return false;
        }
        self.pending.insert(key);
        self.queue.push_back(entity);
        true
    }

    /// Remove and return the head, or `None` when empty.
    pub fn dequeue(&mut self) -> Option<EntityRef> {
        let entity = self.queue.pop_front()?;
        self.pending.remove(&entity.normalized());
        Some(entity)
    }

    /// Returns false if the entity was already visited.
    pub fn mark_visited(&mut self, entity: &EntityRef) -> bool {
        self.visited.insert(entity.normalized())
    }

    pub fn is_visited(&self, entity: &EntityRef) -> bool {
        self.visited.contains(&entity.normalized())
    }

    /// Node for `entity`, minted and recorded on first resolution.
    /// References differing only in case share one node.
    pub fn resolve(&mut self, entity: &EntityRef) -> Node {
        let key = entity.normalized();
        if let Some(node) = self.nodes.get(&key) {
            return node.clone();
        }
        let node = self.vocab.mint(&key);
        self.nodes.insert(key, node.clone());
        node
    }

    /// Node for an already discovered entity.
    pub fn node(&self, entity: &EntityRef) -> Option<&Node> {
        self.nodes.get(&entity.normalized())
    }

    /// Record that `requested` was answered by the entity `canonical` (a
    /// renamed repository, for instance). `canonical` binds to the requested
    /// node unless it already has one, is marked visited and leaves the
    /// queue. Returns false if `canonical` was already visited.
    pub fn alias(&mut self, requested: &EntityRef, canonical: &EntityRef) -> bool {
        let key = canonical.normalized();
        if key == requested.normalized() {
            return true;
        }
        if self.visited.contains(&key) {
            return false;
        }
        let node = self.resolve(requested);
        self.nodes.entry(key.clone()).or_insert(node);
        if self.pending.remove(&key) {
            self.queue.retain(|e| e.normalized() != key);
        }
        self.visited.insert(key);
        true
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn discovered(&self) -> usize {
        self.nodes.len()
    }

    pub fn visited(&self) -> usize {
        self.visited.len()
    }
}
