pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod extensions;
pub mod input;
pub mod renderer;
pub mod systems;
pub mod ui;

// Re-export key types at crate root for convenience
pub use api::config::{EngineConfig, FpsOverlay};
pub use api::context::{SceneContext, SceneRequest, SceneTarget};
pub use api::engine::Engine;
pub use api::error::{AtlasError, EngineError, Result, SceneError};
pub use api::types::{ClientData, Color, EngineState, Rect, SceneIndex};
pub use assets::atlas::AtlasData;
pub use assets::registry::{ImageHandle, ImageLoader, SequentialImages, TextureMap, TextureRecord};
pub use components::layer::SpriteLayers;
pub use components::sprite::Sprite;
pub use core::scene::{Scene, SceneHandler, Stage};
pub use core::time::FrameClock;
pub use core::transition::{Completion, Transition, TransitionStage, Wipe, WipeDirection};
pub use extensions::{lerp, Easing};
pub use input::{keys, Directions, InputEvent, InputQueue, SwipeTracker};
pub use renderer::{BlendMode, DrawCommand, HeadlessRenderer, RenderBuffer, Renderer};
pub use systems::effects::{Particle, ParticleConfig, ParticleKind, ParticleSystem, Rng};
pub use ui::{Font, Widget, WidgetKind};
