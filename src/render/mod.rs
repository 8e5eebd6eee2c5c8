//! Browser-facing output: canvas painting and the frame loop that drives it

pub mod canvas;
pub mod scheduler;

pub use canvas::paint;
pub use scheduler::{FrameLoop, Hooks};
