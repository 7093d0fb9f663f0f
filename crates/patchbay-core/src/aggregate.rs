//! Multi-producer aggregation for ARRAY inputs.
//!
//! Each producer bound to an ARRAY input contributes its latest array under its
//! binding key. The aggregate is the concatenation of all contributions in
//! lexicographic key order, so the result does not depend on the order in
//! which producers were connected or last updated.

use std::collections::BTreeMap;

use crate::binding::BindingKey;

/// Latest contribution per binding key for one ARRAY input.
#[derive(Debug, Clone, Default)]
pub struct ArrayAggregator {
    contributions: BTreeMap<BindingKey, Vec<f64>>,
}

impl ArrayAggregator {
    /// Creates an aggregator with no contributions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contribution stored under `key`.
    pub fn contribute(&mut self, key: impl Into<BindingKey>, items: Vec<f64>) {
        self.contributions.insert(key.into(), items);
    }

    /// Drops the contribution stored under `key`. Returns whether one existed.
    pub fn remove(&mut self, key: &BindingKey) -> bool {
        self.contributions.remove(key).is_some()
    }

    /// Drops every contribution.
    pub fn clear(&mut self) {
        self.contributions.clear();
    }

    /// Number of producers currently contributing.
    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    /// Returns `true` if nothing is contributing.
    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    /// Keys in aggregation order.
    pub fn keys(&self) -> impl Iterator<Item = &BindingKey> {
        self.contributions.keys()
    }

    /// Concatenates all contributions in key order.
    pub fn aggregate(&self) -> Vec<f64> {
        let total = self.contributions.values().map(Vec::len).sum();
        let mut merged = Vec::with_capacity(total);
        for items in self.contributions.values() {
            merged.extend_from_slice(items);
        }
        merged
    }
}
