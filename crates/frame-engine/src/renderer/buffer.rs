use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{Color, Rect};
use crate::assets::registry::{DecayFrame, ImageHandle, TextureRecord};
use crate::ui::Font;

/// Compositing mode for draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// Standard source-over alpha blending.
    #[default]
    Normal,
    /// Additive: overlapping draws brighten instead of occluding.
    Lighter,
}

/// One textured quad, fully resolved to screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureDraw {
    pub image: ImageHandle,
    pub source: Rect,
    /// Screen position of the anchor point (origin translation applied).
    pub position: Vec2,
    /// Anchor offset in pixels from the region's top-left corner.
    pub anchor: Vec2,
    /// Texture base rotation plus draw rotation, in radians.
    pub rotation: f32,
    /// Decay variant to draw instead of the base image.
    pub decay: Option<DecayFrame>,
    pub blend: BlendMode,
}

/// A single recorded draw operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    Texture(TextureDraw),
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color },
    Text { text: String, position: Vec2, font: Font, color: Color },
}

#[derive(Debug, Clone, Copy, Default)]
struct DrawState {
    origin: Vec2,
    blend: BlendMode,
}

/// The render surface: every draw the engine makes in a frame, in order.
///
/// Behaves like a 2D canvas context with `save`/`restore`/`translate`, but
/// records instead of rasterising. A `Renderer` presents the result.
pub struct RenderBuffer {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl RenderBuffer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::with_capacity(512),
            state: DrawState::default(),
            saved: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Drop every recorded command and reset the draw state.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.state = DrawState::default();
        self.saved.clear();
    }

    pub fn save(&mut self) {
        self.saved.push(self.state);
    }

    /// Restore the most recently saved state. Unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.state.origin += Vec2::new(dx, dy);
    }

    pub fn origin(&self) -> Vec2 {
        self.state.origin
    }

    pub fn set_blend(&mut self, blend: BlendMode) {
        self.state.blend = blend;
    }

    pub fn blend(&self) -> BlendMode {
        self.state.blend
    }

    /// Draw `texture` with its anchor at `position`, rotated by its own base
    /// rotation plus `rotation_degrees`.
    pub fn draw_texture(&mut self, texture: &TextureRecord, position: Vec2, rotation_degrees: f32) {
        self.push_texture(texture, None, position, rotation_degrees);
    }

    /// Draw decay variant `index` of `texture`. Falls back to the base image
    /// when the texture has no decay frames; the index is clamped otherwise.
    pub fn draw_decay_texture(
        &mut self,
        texture: &TextureRecord,
        index: usize,
        position: Vec2,
        rotation_degrees: f32,
    ) {
        let frame = texture
            .decay_frames
            .get(index.min(texture.decay_frames.len().saturating_sub(1)))
            .copied();
        self.push_texture(texture, frame, position, rotation_degrees);
    }

    fn push_texture(
        &mut self,
        texture: &TextureRecord,
        decay: Option<DecayFrame>,
        position: Vec2,
        rotation_degrees: f32,
    ) {
        self.commands.push(DrawCommand::Texture(TextureDraw {
            image: texture.image,
            source: texture.source,
            position: self.state.origin + position,
            anchor: texture.anchor_pixels(),
            rotation: (texture.rotation_degrees + rotation_degrees).to_radians(),
            decay,
            blend: self.state.blend,
        }));
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = self.offset(rect);
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color) {
        let rect = self.offset(rect);
        self.commands.push(DrawCommand::StrokeRect { rect, color });
    }

    /// Text with its baseline-left corner at `position`.
    pub fn fill_text(&mut self, text: &str, position: Vec2, font: &Font, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position: self.state.origin + position,
            font: font.clone(),
            color,
        });
    }

    fn offset(&self, rect: Rect) -> Rect {
        Rect::new(rect.x + self.state.origin.x, rect.y + self.state.origin.y, rect.width, rect.height)
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Serialise the recorded frame for a JS presenter.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.commands)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::registry::decay_frames;

    fn texture() -> TextureRecord {
        TextureRecord {
            name: "spark".into(),
            image: ImageHandle(3),
            source: Rect::new(0.0, 0.0, 20.0, 10.0),
            anchor: Vec2::new(0.5, 0.5),
            rotation_degrees: 90.0,
            decay_frames: decay_frames(4, None),
        }
    }

    #[test]
    fn translate_offsets_draws_until_restore() {
        let mut buf = RenderBuffer::new(100.0, 100.0);
        buf.save();
        buf.translate(30.0, 0.0);
        buf.draw_texture(&texture(), Vec2::new(10.0, 10.0), 0.0);
        buf.restore();
        buf.draw_texture(&texture(), Vec2::new(10.0, 10.0), 0.0);

        let positions: Vec<Vec2> = buf
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Texture(t) => Some(t.position),
                _ => None,
            })
            .collect();
        assert_eq!(positions, vec![Vec2::new(40.0, 10.0), Vec2::new(10.0, 10.0)]);
    }

    #[test]
    fn texture_rotation_and_anchor_are_resolved() {
        let mut buf = RenderBuffer::new(100.0, 100.0);
        buf.draw_texture(&texture(), Vec2::ZERO, 90.0);
        match &buf.commands()[0] {
            DrawCommand::Texture(t) => {
                assert!((t.rotation - std::f32::consts::PI).abs() < 1e-5);
                assert_eq!(t.anchor, Vec2::new(10.0, 5.0));
                assert_eq!(t.blend, BlendMode::Normal);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn decay_index_is_clamped() {
        let mut buf = RenderBuffer::new(100.0, 100.0);
        buf.set_blend(BlendMode::Lighter);
        buf.draw_decay_texture(&texture(), 99, Vec2::ZERO, 0.0);
        match &buf.commands()[0] {
            DrawCommand::Texture(t) => {
                assert_eq!(t.decay.unwrap().intensity, 0.25);
                assert_eq!(t.blend, BlendMode::Lighter);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn clear_resets_state() {
        let mut buf = RenderBuffer::new(100.0, 100.0);
        buf.translate(5.0, 5.0);
        buf.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        buf.clear();
        assert_eq!(buf.command_count(), 0);
        assert_eq!(buf.origin(), Vec2::ZERO);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut buf = RenderBuffer::new(100.0, 100.0);
        buf.translate(1.0, 2.0);
        buf.restore();
        assert_eq!(buf.origin(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn commands_serialise_with_op_tag() {
        let mut buf = RenderBuffer::new(100.0, 100.0);
        buf.fill_rect(Rect::new(1.0, 2.0, 3.0, 4.0), Color::WHITE);
        let json = buf.to_json().unwrap();
        assert!(json.contains(r#""op":"fillRect""#), "{}", json);
    }
}
