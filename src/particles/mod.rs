pub mod canopy;
pub mod splash;

pub use canopy::{Canopy, CanopyParticle};
pub use splash::{SplashSystem, WaterParticle};
