use std::ops::{Deref, DerefMut};

use crate::api::context::SceneContext;
use crate::api::error::SceneError;
use crate::api::types::{ClientData, SceneIndex};
use crate::assets::registry::TextureMap;
use crate::components::layer::SpriteLayers;
use crate::components::sprite::Sprite;
use crate::input::event::InputEvent;
use crate::renderer::buffer::RenderBuffer;
use crate::systems::effects::{ParticleSystem, Rng};
use crate::ui::widget::Widget;

/// Per-scene behaviour. Every hook defaults to doing nothing.
pub trait SceneHandler {
    /// Called once per frame before the scene is drawn.
    fn update(&mut self, _ctx: &mut SceneContext<'_>, _stage: &mut Stage, _delta: f32) {}

    /// Input that no widget consumed.
    fn on_event(&mut self, _ctx: &mut SceneContext<'_>, _stage: &mut Stage, _event: &InputEvent) {}

    /// Called just before this scene becomes current.
    fn before_enter(&mut self, _ctx: &mut SceneContext<'_>, _stage: &mut Stage) {}

    /// Called just before this scene stops being current.
    fn before_leave(&mut self, _ctx: &mut SceneContext<'_>, _stage: &mut Stage) {}
}

struct NoopHandler;

impl SceneHandler for NoopHandler {}

/// Adapts an update closure into a handler.
struct UpdateFn<F>(F);

impl<F> SceneHandler for UpdateFn<F>
where
    F: FnMut(&mut SceneContext<'_>, &mut Stage, f32),
{
    fn update(&mut self, ctx: &mut SceneContext<'_>, stage: &mut Stage, delta: f32) {
        (self.0)(ctx, stage, delta)
    }
}

/// Everything a scene draws: sprites, particle systems, widgets, plus the
/// scene's own client data.
#[derive(Debug, Default)]
pub struct Stage {
    sprites: SpriteLayers,
    particles: Vec<ParticleSystem>,
    widgets: Vec<Widget>,
    client_data: ClientData,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sprite. A tag that already exists anywhere in the scene is
    /// rejected and the scene is left unchanged.
    pub fn add_sprite(&mut self, sprite: Sprite) -> Result<(), SceneError> {
        self.sprites.add(sprite).map_err(|e| {
            log::warn!("{}", e);
            e
        })
    }

    pub fn remove_sprite(&mut self, tag: &str) -> Result<Sprite, SceneError> {
        self.sprites.remove(tag).map_err(|e| {
            log::warn!("{}", e);
            e
        })
    }

    pub fn get_sprite(&self, tag: &str) -> Option<&Sprite> {
        self.sprites.get(tag)
    }

    pub fn get_sprite_mut(&mut self, tag: &str) -> Option<&mut Sprite> {
        self.sprites.get_mut(tag)
    }

    /// Move a sprite to another layer. Unknown tags are rejected.
    pub fn set_sprite_layer(&mut self, tag: &str, layer: i32) -> Result<(), SceneError> {
        self.sprites.set_layer(tag, layer).map_err(|e| {
            log::warn!("{}", e);
            e
        })
    }

    pub fn sprites(&self) -> &SpriteLayers {
        &self.sprites
    }

    pub fn add_particle(&mut self, system: ParticleSystem) {
        self.particles.push(system);
    }

    pub fn remove_all_particles(&mut self) {
        self.particles.clear();
    }

    /// Live particle systems (not individual particles).
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[ParticleSystem] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [ParticleSystem] {
        &mut self.particles
    }

    /// Register a widget. Registration order is both draw order and
    /// hit-test priority.
    pub fn add_widget(&mut self, widget: Widget) {
        self.widgets.push(widget);
    }

    pub fn widget(&self, tag: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.tag() == Some(tag))
    }

    pub fn widget_mut(&mut self, tag: &str) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.tag() == Some(tag))
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn client_data(&self) -> &ClientData {
        &self.client_data
    }

    pub fn client_data_mut(&mut self) -> &mut ClientData {
        &mut self.client_data
    }

    /// Replace the client data with a copy of `data`. Top-level keys are
    /// copied; nested values are cloned along with them.
    pub fn set_client_data(&mut self, data: &ClientData) {
        self.client_data = data.clone();
    }

    /// Offer an event to the widgets in registration order. The first one
    /// that consumes it wins.
    pub fn dispatch_to_widgets(&mut self, ctx: &mut SceneContext<'_>, event: &InputEvent) -> bool {
        if !event.is_press() {
            return false;
        }
        let client_data = &mut self.client_data;
        self.widgets.iter_mut().any(|w| w.handle_event(ctx, client_data, event))
    }

    /// Draw sprites (ascending layers), then advance and draw particles,
    /// dropping finished systems, then widgets.
    pub fn draw(&mut self, canvas: &mut RenderBuffer, textures: &TextureMap, rng: &mut Rng, delta: f32) {
        for sprite in self.sprites.iter() {
            sprite.draw(canvas, textures);
        }
        for system in &mut self.particles {
            system.update_and_draw(canvas, textures, rng, delta);
        }
        self.particles.retain(ParticleSystem::in_progress);
        for widget in &mut self.widgets {
            widget.draw(canvas, textures);
        }
    }
}

/// A named stage plus the handler that drives it.
pub struct Scene {
    tag: String,
    index: Option<SceneIndex>,
    stage: Stage,
    handler: Box<dyn SceneHandler>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("tag", &self.tag)
            .field("index", &self.index)
            .field("stage", &self.stage)
            .finish()
    }
}

impl Scene {
    /// A scene with no behaviour of its own.
    pub fn new(tag: impl Into<String>) -> Self {
        Self::with_handler(tag, NoopHandler)
    }

    pub fn with_handler(tag: impl Into<String>, handler: impl SceneHandler + 'static) -> Self {
        Self {
            tag: tag.into(),
            index: None,
            stage: Stage::new(),
            handler: Box::new(handler),
        }
    }

    /// A scene whose only behaviour is an update closure.
    pub fn on_update<F>(tag: impl Into<String>, update: F) -> Self
    where
        F: FnMut(&mut SceneContext<'_>, &mut Stage, f32) + 'static,
    {
        Self::with_handler(tag, UpdateFn(update))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Registry position, once added to an engine.
    pub fn index(&self) -> Option<SceneIndex> {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: SceneIndex) {
        self.index = Some(index);
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn update(&mut self, ctx: &mut SceneContext<'_>, delta: f32) {
        self.handler.update(ctx, &mut self.stage, delta);
    }

    pub fn draw(&mut self, canvas: &mut RenderBuffer, ctx: &mut SceneContext<'_>, delta: f32) {
        let textures = ctx.textures();
        self.stage.draw(canvas, textures, ctx.rng(), delta);
    }

    /// One full frame of this scene: update, then draw.
    pub fn render(&mut self, canvas: &mut RenderBuffer, ctx: &mut SceneContext<'_>, delta: f32) {
        self.update(ctx, delta);
        self.draw(canvas, ctx, delta);
    }

    /// Widgets first; if none consumes the event it goes to the handler.
    /// Returns true when a widget consumed it.
    pub fn handle_event(&mut self, ctx: &mut SceneContext<'_>, event: &InputEvent) -> bool {
        if self.stage.dispatch_to_widgets(ctx, event) {
            return true;
        }
        self.handler.on_event(ctx, &mut self.stage, event);
        false
    }

    pub fn before_enter(&mut self, ctx: &mut SceneContext<'_>) {
        log::debug!("entering scene {:?}", self.tag);
        self.handler.before_enter(ctx, &mut self.stage);
    }

    pub fn before_leave(&mut self, ctx: &mut SceneContext<'_>) {
        log::debug!("leaving scene {:?}", self.tag);
        self.handler.before_leave(ctx, &mut self.stage);
    }
}

impl Deref for Scene {
    type Target = Stage;

    fn deref(&self) -> &Stage {
        &self.stage
    }
}

impl DerefMut for Scene {
    fn deref_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }
}
