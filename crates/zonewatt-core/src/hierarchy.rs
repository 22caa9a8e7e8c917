//! # Zone Hierarchy
//!
//! The tree of zones readings are recorded against.
//!
//! Nodes live in an arena (`Vec<ZoneNode>`) addressed by `ZoneId`; the
//! registry maps each name to its handle. Parent and child relations are
//! handles, so the tree holds no reference cycles. Arena order is creation
//! order, which is also the registry order used when draining.

use crate::primitives::{MAX_ZONE_NAME_LENGTH, ROOT_ZONE};
use crate::zone::ZoneNode;
use crate::{Reading, Task, TrackingError, ZoneId};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Owns every zone node and the name registry.
#[derive(Debug, Clone)]
pub struct HierarchyTree {
    /// Node storage, indexed by `ZoneId`. `nodes[0]` is the root.
    nodes: Vec<ZoneNode>,
    /// Name -> handle lookup.
    registry: BTreeMap<String, ZoneId>,
}

impl Default for HierarchyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyTree {
    /// Create a tree holding only the root zone ("Building").
    #[must_use]
    pub fn new() -> Self {
        let root = ZoneNode::new(ZoneId::ROOT, ROOT_ZONE, None);
        let mut registry = BTreeMap::new();
        registry.insert(ROOT_ZONE.to_string(), ZoneId::ROOT);
        Self {
            nodes: vec![root],
            registry,
        }
    }

    /// Create a zone named `name` under `parent`.
    ///
    /// # Errors
    /// - `InvalidZoneName` if `name` is empty or longer than `MAX_ZONE_NAME_LENGTH`
    /// - `ZoneNotFound` if `parent` is not registered
    /// - `DuplicateZone` if `name` is already registered
    ///
    /// On error the tree is unchanged.
    pub fn add_zone(&mut self, name: &str, parent: &str) -> Result<ZoneId, TrackingError> {
        if name.is_empty() || name.len() > MAX_ZONE_NAME_LENGTH {
            return Err(TrackingError::InvalidZoneName(name.to_string()));
        }

        let parent_id = self
            .lookup(parent)
            .ok_or_else(|| TrackingError::ZoneNotFound(parent.to_string()))?;

        if self.registry.contains_key(name) {
            return Err(TrackingError::DuplicateZone(name.to_string()));
        }

        let id = ZoneId(self.nodes.len());
        self.nodes.push(ZoneNode::new(id, name, Some(parent_id)));
        self.nodes[parent_id.index()].add_child(id);
        self.registry.insert(name.to_string(), id);

        tracing::debug!(zone = name, parent, id = id.index(), "zone created");
        Ok(id)
    }

    /// Attach a reading to the named zone, returning the zone's handle.
    ///
    /// # Errors
    /// `ZoneNotFound` if `name` is not registered; nothing is recorded.
    pub fn attach_reading(
        &mut self,
        name: &str,
        reading: Arc<Reading>,
    ) -> Result<ZoneId, TrackingError> {
        let node = self
            .zone_mut(name)
            .ok_or_else(|| TrackingError::ZoneNotFound(name.to_string()))?;
        node.add_reading(reading);
        Ok(node.id())
    }

    /// Drain the named zone's queue.
    ///
    /// Returns an empty list if the zone is unknown.
    pub fn drain_zone(&mut self, name: &str) -> Vec<Task> {
        self.zone_mut(name)
            .map(ZoneNode::drain_pending)
            .unwrap_or_default()
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Resolve a name to its handle.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ZoneId> {
        self.registry.get(name).copied()
    }

    /// Check if a zone is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Get a zone by name.
    #[must_use]
    pub fn zone(&self, name: &str) -> Option<&ZoneNode> {
        self.lookup(name).and_then(|id| self.zone_by_id(id))
    }

    /// Get a zone by handle.
    #[must_use]
    pub fn zone_by_id(&self, id: ZoneId) -> Option<&ZoneNode> {
        self.nodes.get(id.index())
    }

    fn zone_mut(&mut self, name: &str) -> Option<&mut ZoneNode> {
        let id = self.lookup(name)?;
        self.nodes.get_mut(id.index())
    }

    /// The root zone.
    #[must_use]
    pub fn root(&self) -> &ZoneNode {
        &self.nodes[ZoneId::ROOT.index()]
    }

    /// Number of registered zones, root included.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.registry.len()
    }

    /// All zones in registry (creation) order.
    pub fn zones(&self) -> impl Iterator<Item = &ZoneNode> {
        self.nodes.iter()
    }

    /// All zone names in registry (creation) order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(ZoneNode::name)
    }

    /// Direct children of the named zone, in attach order.
    ///
    /// Empty if the zone is unknown or a leaf.
    #[must_use]
    pub fn children(&self, name: &str) -> Vec<&ZoneNode> {
        self.zone(name)
            .map(|node| {
                node.children()
                    .iter()
                    .filter_map(|&id| self.zone_by_id(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Names from the root down to the named zone, inclusive.
    #[must_use]
    pub fn ancestry(&self, name: &str) -> Option<Vec<&str>> {
        let mut current = self.zone(name)?;
        let mut path = vec![current.name()];
        while let Some(parent) = current.parent().and_then(|id| self.zone_by_id(id)) {
            path.push(parent.name());
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    /// Consumption of the named zone plus all of its descendants.
    #[allow(clippy::float_arithmetic)]
    #[must_use]
    pub fn subtree_consumption(&self, name: &str) -> Option<f64> {
        let start = self.lookup(name)?;
        let mut total = 0.0;
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.zone_by_id(id) {
                total += node.total_consumption();
                stack.extend_from_slice(node.children());
            }
        }
        Some(total)
    }

    /// Depth-first pre-order walk from the root, yielding `(depth, node)`.
    ///
    /// Children are visited in attach order; the root has depth 0.
    #[must_use]
    pub fn walk(&self) -> Vec<(usize, &ZoneNode)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0usize, ZoneId::ROOT)];
        while let Some((depth, id)) = stack.pop() {
            let Some(node) = self.zone_by_id(id) else {
                continue;
            };
            out.push((depth, node));
            for &child in node.children().iter().rev() {
                stack.push((depth.saturating_add(1), child));
            }
        }
        out
    }
}

// =============================================================================
// TESTS
// =============================================================================
