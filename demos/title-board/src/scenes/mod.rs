pub mod board;
pub mod score;
pub mod title;

use frame_engine::{Easing, Transition, Wipe, WipeDirection};

/// Texture names in `img/atlas.json`.
pub mod textures {
    pub const TITLE: &str = "title.png";
    pub const START_BUTTON: &str = "start_button.png";
    pub const HERO: &str = "hero.png";
    pub const READY: &str = "ready.png";
    pub const FIRE: &str = "particle_fire.png";
}

/// Wipe used for every scene change in the demo.
pub fn wipe(direction: WipeDirection) -> Box<dyn Transition> {
    Wipe::duration(0.8).with_direction(direction).with_easing(Easing::CubicOut).boxed()
}
