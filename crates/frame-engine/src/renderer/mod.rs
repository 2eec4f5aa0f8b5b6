pub mod buffer;
pub mod traits;

pub use buffer::{BlendMode, DrawCommand, RenderBuffer, TextureDraw};
pub use traits::{HeadlessRenderer, Renderer};
