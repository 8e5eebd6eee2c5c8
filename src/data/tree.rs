use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use super::Category;
use crate::error::GardenError;

/// Growth added to every tree by one watering
pub const WATER_GROWTH_STEP: f64 = 0.5;

/// Chance that a watered tree still below its max gains a branch
pub const WATER_BRANCH_CHANCE: f64 = 0.3;

/// A tree descriptor as supplied by the host.
///
/// The engine treats it as read-only except for `x`, which the drag gesture
/// may move before reporting back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    pub id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_size: f64,
    #[serde(default)]
    pub file_type: Category,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub target_growth: f64,
    #[serde(default = "default_max_growth")]
    pub max_growth: f64,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub seed: f64,
    /// Accepts any JSON number; negative values arrive as 0 and are clamped later
    #[serde(default = "default_branches", deserialize_with = "lenient_count")]
    pub branches: u32,
}

fn default_max_growth() -> f64 {
    5.0
}

fn default_branches() -> u32 {
    2
}

/// Floor a host-supplied count into `u32`, mapping negatives to 0
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    if raw.is_finite() {
        Ok(raw.floor().clamp(0.0, u32::MAX as f64) as u32)
    } else {
        Ok(0)
    }
}

impl Tree {
    pub fn new(id: &str, x: f64, y: f64) -> Self {
        Self {
            id: id.to_string(),
            file_name: String::new(),
            file_size: 0.0,
            file_type: Category::Other,
            x,
            y,
            target_growth: 1.0,
            max_growth: default_max_growth(),
            is_verified: false,
            seed: 0.0,
            branches: default_branches(),
        }
    }

    pub fn with_file(mut self, name: &str, size: f64) -> Self {
        self.file_name = name.to_string();
        self.file_size = size;
        self.file_type = Category::from_file_name(name);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.file_type = category;
        self
    }

    pub fn with_growth(mut self, target: f64, max: f64) -> Self {
        self.target_growth = target;
        self.max_growth = max;
        self
    }

    pub fn with_seed(mut self, seed: f64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_branches(mut self, branches: u32) -> Self {
        self.branches = branches;
        self
    }

    pub fn verified(mut self, verified: bool) -> Self {
        self.is_verified = verified;
        self
    }

    /// Clamp a descriptor into the engine's contract.
    ///
    /// Returns the fixed descriptor and whether anything had to change.
    pub fn sanitized(&self) -> (Tree, bool) {
        let mut tree = self.clone();

        tree.x = finite_or_zero(tree.x);
        tree.y = finite_or_zero(tree.y);
        tree.seed = finite_or_zero(tree.seed);
        tree.file_size = finite_or_zero(tree.file_size).max(0.0);
        tree.max_growth = finite_or_zero(tree.max_growth).max(0.0);
        tree.target_growth = finite_or_zero(tree.target_growth).clamp(0.0, tree.max_growth);
        tree.branches = tree.branches.max(1);

        let changed = tree != *self;
        (tree, changed)
    }

    /// The host-side watering rule: grow by one step and maybe sprout a branch
    pub fn watered(&self, rng: &mut impl Rng) -> Tree {
        let mut tree = self.clone();
        let below_max = tree.target_growth < tree.max_growth;
        tree.target_growth = (tree.target_growth + WATER_GROWTH_STEP).min(tree.max_growth);
        if below_max && rng.gen_bool(WATER_BRANCH_CHANCE) {
            tree.branches += 1;
        }
        tree
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Decode a full-replacement tree list, clamping every entry
pub fn parse_trees(json: &str) -> Result<Vec<Tree>, GardenError> {
    let trees: Vec<Tree> = serde_json::from_str(json)?;
    Ok(trees
        .into_iter()
        .map(|tree| {
            let (clean, changed) = tree.sanitized();
            if changed {
                tracing::warn!(id = %clean.id, "clamped malformed tree descriptor");
            }
            clean
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_tree_builder() {
        let tree = Tree::new("a", 100.0, 400.0)
            .with_file("photo.png", 2048.0)
            .with_growth(1.0, 5.0)
            .with_seed(42.0)
            .with_branches(3)
            .verified(true);

        assert_eq!(tree.file_type, Category::Image);
        assert_eq!(tree.branches, 3);
        assert!(tree.is_verified);
    }

    #[test]
    fn test_sanitized_clean_tree_unchanged() {
        let tree = Tree::new("ok", 10.0, 20.0);
        let (clean, changed) = tree.sanitized();
        assert!(!changed);
        assert_eq!(clean, tree);
    }

    #[test]
    fn test_sanitized_clamps() {
        let tree = Tree {
            file_size: -10.0,
            target_growth: 9.0,
            max_growth: 5.0,
            branches: 0,
            x: f64::NAN,
            ..Tree::new("bad", 0.0, 0.0)
        };
        let (clean, changed) = tree.sanitized();
        assert!(changed);
        assert_eq!(clean.file_size, 0.0);
        assert_eq!(clean.target_growth, 5.0);
        assert_eq!(clean.branches, 1);
        assert_eq!(clean.x, 0.0);
    }

    #[test]
    fn test_sanitized_negative_growth() {
        let tree = Tree::new("neg", 0.0, 0.0).with_growth(-2.0, 5.0);
        assert_eq!(tree.sanitized().0.target_growth, 0.0);
    }

    #[test]
    fn test_watered_caps_at_max() {
        let mut rng = SmallRng::seed_from_u64(7);
        let tree = Tree::new("w", 0.0, 0.0).with_growth(4.8, 5.0);
        let watered = tree.watered(&mut rng);
        assert_eq!(watered.target_growth, 5.0);

        let again = watered.watered(&mut rng);
        assert_eq!(again.target_growth, 5.0);
        assert_eq!(again.branches, watered.branches);
    }

    #[test]
    fn test_watered_adds_step() {
        let mut rng = SmallRng::seed_from_u64(1);
        let tree = Tree::new("w", 0.0, 0.0).with_growth(1.0, 5.0);
        let watered = tree.watered(&mut rng);
        assert!((watered.target_growth - 1.5).abs() < 1e-9);
        assert!(watered.branches == tree.branches || watered.branches == tree.branches + 1);
    }

    #[test]
    fn test_parse_trees_camel_case() {
        let json = r#"[{
            "id": "t1", "fileName": "a.rs", "fileSize": 12, "fileType": "code",
            "x": 50, "y": 300, "targetGrowth": 1, "maxGrowth": 5,
            "isVerified": true, "seed": 1234.5, "branches": 3
        }]"#;
        let trees = parse_trees(json).unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].file_type, Category::Code);
        assert_eq!(trees[0].branches, 3);
        assert!(trees[0].is_verified);
    }

    #[test]
    fn test_parse_trees_clamps_and_defaults() {
        let json = r#"[{"id": "t2", "x": 1, "y": 2, "targetGrowth": 99, "fileType": "mystery", "branches": 0}]"#;
        let trees = parse_trees(json).unwrap();
        assert_eq!(trees[0].file_type, Category::Other);
        assert_eq!(trees[0].target_growth, 5.0);
        assert_eq!(trees[0].branches, 1);
    }

    #[test]
    fn test_parse_trees_odd_branch_counts_keep_list() {
        let json = r#"[
            {"id": "good", "x": 1, "y": 2, "branches": 3},
            {"id": "negative", "x": 3, "y": 4, "branches": -1},
            {"id": "fraction", "x": 5, "y": 6, "branches": 2.5}
        ]"#;
        let trees = parse_trees(json).unwrap();
        assert_eq!(trees.len(), 3);
        assert_eq!(trees[0].branches, 3);
        assert_eq!(trees[1].branches, 1);
        assert_eq!(trees[2].branches, 2);
    }

    #[test]
    fn test_parse_trees_rejects_garbage() {
        assert!(parse_trees("{not a list").is_err());
    }
}
