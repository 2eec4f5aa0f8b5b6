use glam::Vec2;

use crate::api::context::SceneContext;
use crate::api::types::{ClientData, Color, Rect};
use crate::assets::registry::TextureMap;
use crate::input::event::InputEvent;
use crate::renderer::buffer::RenderBuffer;
use crate::ui::font::Font;

/// Called when a press lands inside a widget.
pub type WidgetListener = Box<dyn FnMut(&mut SceneContext<'_>, &mut ClientData, &InputEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Always consumes presses inside its rectangle.
    Button,
    /// Consumes presses only when a listener is attached.
    Label,
}

/// A rectangular text or image control, positioned by its centre.
///
/// The hit rectangle is derived from text, font, image and padding, and is
/// recomputed lazily after any of them change.
pub struct Widget {
    kind: WidgetKind,
    tag: Option<String>,
    center: Vec2,
    text: Option<String>,
    image: Option<String>,
    font: Font,
    fill_color: Option<Color>,
    text_color: Color,
    stroke_color: Color,
    padding: f32,
    fixed_size: Option<Vec2>,
    listener: Option<WidgetListener>,
    rect: Rect,
    stale: bool,
}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("kind", &self.kind)
            .field("tag", &self.tag)
            .field("center", &self.center)
            .field("text", &self.text)
            .field("image", &self.image)
            .field("rect", &self.rect)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl Widget {
    fn new(kind: WidgetKind, cx: f32, cy: f32, text: Option<String>, fill_color: Option<Color>) -> Self {
        Self {
            kind,
            tag: None,
            center: Vec2::new(cx, cy),
            text,
            image: None,
            font: Font::default(),
            fill_color,
            text_color: Color::BLACK,
            stroke_color: Color::BLACK,
            padding: 0.0,
            fixed_size: None,
            listener: None,
            rect: Rect::default(),
            stale: true,
        }
    }

    /// White box with black text.
    pub fn button(cx: f32, cy: f32, text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Button, cx, cy, Some(text.into()), Some(Color::WHITE))
    }

    /// Image-only button sized to its texture.
    pub fn image_button(cx: f32, cy: f32, image: impl Into<String>) -> Self {
        let mut w = Self::new(WidgetKind::Button, cx, cy, None, None);
        w.image = Some(image.into());
        w
    }

    /// Unfilled text.
    pub fn label(cx: f32, cy: f32, text: impl Into<String>) -> Self {
        Self::new(WidgetKind::Label, cx, cy, Some(text.into()), None)
    }

    /// A widget occupying exactly `rect`, with no text or image.
    pub fn from_rect(kind: WidgetKind, rect: Rect) -> Self {
        let mut w = Self::new(kind, rect.x + rect.width / 2.0, rect.y + rect.height / 2.0, None, None);
        w.fixed_size = Some(Vec2::new(rect.width, rect.height));
        w
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.set_font(font);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.set_image(Some(image.into()));
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.set_padding(padding);
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.set_fixed_size(Some(Vec2::new(width, height)));
        self
    }

    pub fn with_colors(mut self, fill: Option<Color>, text: Color) -> Self {
        self.fill_color = fill;
        self.text_color = text;
        self
    }

    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&mut SceneContext<'_>, &mut ClientData, &InputEvent) + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn set_listener(&mut self, listener: Option<WidgetListener>) {
        self.listener = listener;
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
        self.stale = true;
    }

    pub fn set_image(&mut self, image: Option<String>) {
        self.image = image;
        self.stale = true;
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
        self.stale = true;
    }

    pub fn set_padding(&mut self, padding: f32) {
        self.padding = padding.max(0.0);
        self.stale = true;
    }

    pub fn set_fixed_size(&mut self, size: Option<Vec2>) {
        self.fixed_size = size;
        self.stale = true;
    }

    pub fn set_center(&mut self, cx: f32, cy: f32) {
        self.center = Vec2::new(cx, cy);
        self.stale = true;
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    fn is_image_only(&self) -> bool {
        self.image.is_some() && self.text.is_none()
    }

    /// Current hit rectangle, recomputed first if stale.
    pub fn rect(&mut self, textures: &TextureMap) -> Rect {
        if self.stale {
            self.compute_geometry(textures);
        }
        self.rect
    }

    fn compute_geometry(&mut self, textures: &TextureMap) {
        let content = if let Some(size) = self.fixed_size {
            size
        } else if self.is_image_only() {
            // A texture that has not loaded yet measures as empty; try again next time.
            match self.image.as_deref().and_then(|name| textures.size(name)) {
                Some(size) => size,
                None => {
                    self.rect = Rect::centered(self.center.x, self.center.y, 0.0, 0.0);
                    return;
                }
            }
        } else {
            let text = self.text.as_deref().unwrap_or("");
            Vec2::new(self.font.measure(text), self.font.size)
        };
        let padded = if self.fixed_size.is_some() { content } else { content + Vec2::splat(self.padding * 2.0) };
        self.rect = Rect::centered(self.center.x, self.center.y, padded.x, padded.y);
        self.stale = false;
    }

    /// Whether a press at `(x, y)` lands inside this widget.
    pub fn hit_test(&mut self, textures: &TextureMap, x: f32, y: f32) -> bool {
        self.rect(textures).contains(x, y)
    }

    /// Whether this widget takes presses at all.
    pub fn accepts_press(&self) -> bool {
        match self.kind {
            WidgetKind::Button => true,
            WidgetKind::Label => self.listener.is_some(),
        }
    }

    /// Offer an event. Returns true if the widget consumed it.
    ///
    /// Only press events are hit-tested; everything else passes through.
    pub fn handle_event(
        &mut self,
        ctx: &mut SceneContext<'_>,
        client_data: &mut ClientData,
        event: &InputEvent,
    ) -> bool {
        if !event.is_press() || !self.accepts_press() {
            return false;
        }
        let Some(pos) = event.position() else {
            return false;
        };
        if !self.hit_test(ctx.textures(), pos.x, pos.y) {
            return false;
        }
        if let Some(listener) = self.listener.as_mut() {
            listener(ctx, client_data, event);
        }
        true
    }

    pub fn draw(&mut self, canvas: &mut RenderBuffer, textures: &TextureMap) {
        let rect = self.rect(textures);
        if self.is_image_only() {
            if let Some(texture) = self.image.as_deref().and_then(|name| textures.get(name)) {
                canvas.draw_texture(texture, self.center, 0.0);
                canvas.stroke_rect(rect, self.stroke_color);
            }
            return;
        }
        if let Some(fill) = self.fill_color {
            canvas.fill_rect(rect, fill);
        }
        if let Some(text) = self.text.as_deref() {
            let baseline = Vec2::new(rect.x + self.padding, rect.y + rect.height - self.padding);
            canvas.fill_text(text, baseline, &self.font, self.text_color);
        }
    }
}
