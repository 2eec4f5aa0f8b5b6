use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::EngineError;
use crate::api::types::Color;
use crate::ui::Font;

/// Configuration for the engine, provided by the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Render surface width in pixels (default: 800).
    pub surface_width: f32,
    /// Render surface height in pixels (default: 600).
    pub surface_height: f32,
    /// Draw the frames-per-second readout after every frame.
    pub display_fps: bool,
    /// Seed for particle randomness.
    pub rng_seed: u64,
    /// Refuse to start the frame loop until a texture atlas has loaded.
    pub require_atlas: bool,
    /// Upper bound on scene changes applied from handler requests in one frame,
    /// counted across input, update and transition phases together.
    pub max_chained_scene_changes: usize,
    /// Appearance of the FPS readout.
    pub fps_overlay: FpsOverlay,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            surface_width: 800.0,
            surface_height: 600.0,
            display_fps: false,
            rng_seed: 42,
            require_atlas: true,
            max_chained_scene_changes: 8,
            fps_overlay: FpsOverlay::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) config; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(EngineError::Config)
    }
}

/// Where and how the FPS readout is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FpsOverlay {
    pub position: Vec2,
    pub font: Font,
    pub color: Color,
}

impl Default for FpsOverlay {
    fn default() -> Self {
        Self {
            position: Vec2::new(10.0, 10.0),
            font: Font::new("sans-serif", 24.0),
            color: Color::RED,
        }
    }
}
