pub mod branch;
pub mod style;

pub use branch::{BranchGenerator, TreePose, MAX_FAN_OUT};
pub use style::{style_for, BranchStyle, GLOW_COLOR, SPLASH_COLOR, VERIFIED_HALO};
