use std::collections::{HashMap, HashSet};

use rand::Rng;

use super::AnimatedTree;
use crate::config::{GardenConfig, MotionConfig};
use crate::data::Tree;

/// What a reconciliation pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    /// Existing trees whose target growth rose in this pass
    pub watered: usize,
}

/// Owns every tree's animation state, keyed by identity.
///
/// Entries keep the order in which their identity first appeared; later
/// entries are drawn on top and win hit-test ties.
#[derive(Debug, Default)]
pub struct TreeStore {
    trees: Vec<AnimatedTree>,
    index: HashMap<String, usize>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff a full-replacement descriptor list against the live state.
    ///
    /// Safe to call any number of times between frames: feeding the same list
    /// twice changes nothing the second time.
    pub fn reconcile(&mut self, incoming: &[Tree], rng: &mut impl Rng, config: &GardenConfig) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        let wanted: HashSet<&str> = incoming.iter().map(|t| t.id.as_str()).collect();
        let before = self.trees.len();
        self.trees.retain(|t| wanted.contains(t.id()));
        summary.removed = before - self.trees.len();
        if summary.removed > 0 {
            self.rebuild_index();
        }

        for raw in incoming {
            let (tree, clamped) = raw.sanitized();
            if clamped {
                tracing::warn!(id = %tree.id, "clamped malformed tree descriptor");
            }

            match self.index.get(&tree.id) {
                Some(&slot) => {
                    if self.trees[slot].absorb(&tree, rng, &config.canopy) {
                        summary.watered += 1;
                    }
                    summary.updated += 1;
                }
                None => {
                    self.index.insert(tree.id.clone(), self.trees.len());
                    self.trees.push(AnimatedTree::plant(tree, rng, config));
                    summary.created += 1;
                }
            }
        }

        tracing::debug!(
            created = summary.created,
            updated = summary.updated,
            removed = summary.removed,
            watered = summary.watered,
            "reconciled trees"
        );
        summary
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .trees
            .iter()
            .enumerate()
            .map(|(i, t)| (t.tree.id.clone(), i))
            .collect();
    }

    /// Advance every tree by `dt` frames
    pub fn advance(&mut self, dt: f64, motion: &MotionConfig) {
        for tree in &mut self.trees {
            tree.advance(dt, motion);
        }
    }

    pub fn get(&self, id: &str) -> Option<&AnimatedTree> {
        self.index.get(id).map(|&i| &self.trees[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut AnimatedTree> {
        match self.index.get(id) {
            Some(&i) => self.trees.get_mut(i),
            None => None,
        }
    }

    /// Trees in store order (oldest first)
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &AnimatedTree> {
        self.trees.iter()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
