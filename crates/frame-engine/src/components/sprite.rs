use glam::Vec2;

use crate::assets::registry::TextureMap;
use crate::renderer::buffer::RenderBuffer;

/// A positioned, rotatable handle to a named texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Texture name in the atlas.
    pub texture: String,
    /// Draw-order bucket; lower layers draw first. Changed only through the
    /// owning `SpriteLayers`, which indexes sprites by tag and layer.
    layer: i32,
    /// Unique within the owning scene. Fixed once created.
    tag: String,
    pub position: Vec2,
    /// Rotation in degrees, added to the texture's base rotation.
    pub rotation: f32,
}

impl Sprite {
    pub fn new(texture: impl Into<String>, layer: i32, tag: impl Into<String>) -> Self {
        Self {
            texture: texture.into(),
            layer,
            tag: tag.into(),
            position: Vec2::ZERO,
            rotation: 0.0,
        }
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn layer(&self) -> i32 {
        self.layer
    }

    pub(crate) fn set_layer(&mut self, layer: i32) {
        self.layer = layer;
    }

    /// Move the sprite and set its rotation.
    pub fn set_position(&mut self, x: f32, y: f32, rotation: f32) {
        self.position = Vec2::new(x, y);
        self.rotation = rotation;
    }

    /// Draw through the texture map. A texture that is not loaded is skipped.
    pub fn draw(&self, canvas: &mut RenderBuffer, textures: &TextureMap) {
        if let Some(texture) = textures.get(&self.texture) {
            canvas.draw_texture(texture, self.position, self.rotation);
        }
    }
}
