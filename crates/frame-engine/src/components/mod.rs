pub mod layer;
pub mod sprite;

pub use layer::SpriteLayers;
pub use sprite::Sprite;
