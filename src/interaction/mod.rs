pub mod gesture;
pub mod picking;

pub use gesture::{Cursor, GestureController, GestureOutcome, GestureState, InputKind};
pub use picking::{TrunkHitbox, TrunkPicker};
