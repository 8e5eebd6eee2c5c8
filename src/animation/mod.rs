//! Per-tree animation state and its owning store
//!
//! The host hands over full descriptor lists; the store diffs them by identity
//! so growth, sway and particle history survive every update.

mod animated_tree;
mod store;

pub use animated_tree::{AnimatedTree, WIGGLE_MAX};
pub use store::{ReconcileSummary, TreeStore};
