pub mod event;
pub mod queue;
pub mod touch;

pub use event::{keys, InputEvent};
pub use queue::InputQueue;
pub use touch::{Directions, SwipeTracker};
