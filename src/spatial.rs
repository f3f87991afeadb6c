//! R-tree index over shape bounds, rebuilt per brush gesture.
//!
//! The brush queries it on every pointer move, so candidate lookup is
//! O(log n) instead of scanning every shape on the page.

#[cfg(test)]
#[path = "spatial_test.rs"]
mod spatial_test;

use rstar::{AABB, RTree, RTreeObject};

use crate::bounds::Bounds;

/// One indexed item: its key plus the envelope it occupies.
#[derive(Debug, Clone)]
pub struct SpatialEntry<K> {
    pub key: K,
    pub bounds: Bounds,
}

impl<K> RTreeObject for SpatialEntry<K> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.bounds.min_x, self.bounds.min_y], [self.bounds.max_x, self.bounds.max_y])
    }
}

/// Bounding-box index keyed by `K`.
#[derive(Debug)]
pub struct SpatialIndex<K> {
    tree: RTree<SpatialEntry<K>>,
}

impl<K> Default for SpatialIndex<K> {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl<K: Clone> SpatialIndex<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from `(key, bounds)` pairs in one bulk load.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, Bounds)>,
    {
        let entries: Vec<SpatialEntry<K>> = items.into_iter().map(|(key, bounds)| SpatialEntry { key, bounds }).collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn insert(&mut self, key: K, bounds: Bounds) {
        self.tree.insert(SpatialEntry { key, bounds });
    }

    /// Keys whose envelope overlaps or touches `area`. Order is unspecified.
    #[must_use]
    pub fn search(&self, area: &Bounds) -> Vec<K> {
        let envelope = AABB::from_corners([area.min_x, area.min_y], [area.max_x, area.max_y]);
        self.tree.locate_in_envelope_intersecting(&envelope).map(|entry| entry.key.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }
}
