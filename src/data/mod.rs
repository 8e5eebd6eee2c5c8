pub mod category;
pub mod tree;

pub use category::Category;
pub use tree::{parse_trees, Tree};
