// Helpers that sit beside the core engine rather than inside it.

pub mod easing;

pub use easing::{lerp, Easing};
