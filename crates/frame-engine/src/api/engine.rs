use glam::Vec2;

use crate::api::config::EngineConfig;
use crate::api::context::{SceneContext, SceneRequest, SceneTarget};
use crate::api::error::{EngineError, Result};
use crate::api::types::{ClientData, EngineState, SceneIndex};
use crate::assets::atlas::AtlasData;
use crate::assets::registry::{ImageLoader, TextureMap};
use crate::core::scene::Scene;
use crate::core::time::FrameClock;
use crate::core::transition::{Transition, TransitionStage};
use crate::input::event::InputEvent;
use crate::input::queue::InputQueue;
use crate::renderer::buffer::RenderBuffer;
use crate::renderer::traits::Renderer;
use crate::systems::effects::Rng;

/// A transition in flight. Its existence is what makes the engine
/// `Transitioning`, so a requested scene never exists without one.
struct PendingChange {
    target: SceneIndex,
    transition: Box<dyn Transition>,
}

#[derive(Debug, Clone, Copy)]
enum Hook {
    Enter,
    Leave,
}

/// Owns the scenes and drives one frame at a time.
///
/// The host calls `draw_frame` (or `present_frame`) once per display refresh
/// with its timestamp. Everything runs on that one thread; the engine never
/// blocks or awaits.
pub struct Engine {
    config: EngineConfig,
    scenes: Vec<Scene>,
    current: Option<SceneIndex>,
    pending: Option<PendingChange>,
    textures: TextureMap,
    atlas_loaded: bool,
    clock: FrameClock,
    canvas: RenderBuffer,
    rng: Rng,
    input: InputQueue,
    requests: Vec<SceneRequest>,
    /// Scene changes applied from requests since the frame (or direct call) began.
    chained: usize,
    client_data: ClientData,
    running: bool,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            canvas: RenderBuffer::new(config.surface_width, config.surface_height),
            rng: Rng::new(config.rng_seed),
            config,
            scenes: Vec::new(),
            current: None,
            pending: None,
            textures: TextureMap::new(),
            atlas_loaded: false,
            clock: FrameClock::new(),
            input: InputQueue::new(),
            requests: Vec::new(),
            chained: 0,
            client_data: ClientData::new(),
            running: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn surface_size(&self) -> Vec2 {
        Vec2::new(self.canvas.width(), self.canvas.height())
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.surface_width = width;
        self.config.surface_height = height;
        self.canvas.resize(width, height);
    }

    // -- Scene registry --

    /// Register a scene. Indices are handed out in insertion order and never reused.
    pub fn add_scene(&mut self, mut scene: Scene) -> SceneIndex {
        let index = SceneIndex(self.scenes.len());
        if self.scene_index(scene.tag()).is_some() {
            log::warn!("scene tag {:?} registered twice; lookups by tag return the first", scene.tag());
        }
        scene.set_index(index);
        log::debug!("added scene {:?} at {}", scene.tag(), index);
        self.scenes.push(scene);
        index
    }

    pub fn scene(&self, index: SceneIndex) -> Option<&Scene> {
        self.scenes.get(index.0)
    }

    pub fn scene_mut(&mut self, index: SceneIndex) -> Option<&mut Scene> {
        self.scenes.get_mut(index.0)
    }

    pub fn scene_by_tag(&self, tag: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.tag() == tag)
    }

    pub fn scene_by_tag_mut(&mut self, tag: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.tag() == tag)
    }

    pub fn scene_index(&self, tag: &str) -> Option<SceneIndex> {
        self.scenes.iter().position(|s| s.tag() == tag).map(SceneIndex)
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn current_scene_index(&self) -> Option<SceneIndex> {
        self.current
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.current.and_then(|i| self.scenes.get(i.0))
    }

    pub fn current_scene_mut(&mut self) -> Option<&mut Scene> {
        self.current.and_then(|i| self.scenes.get_mut(i.0))
    }

    /// Target of the transition in flight, if any.
    pub fn requested_scene_index(&self) -> Option<SceneIndex> {
        self.pending.as_ref().map(|p| p.target)
    }

    pub fn state(&self) -> EngineState {
        match (self.current, &self.pending) {
            (None, _) => EngineState::Idle,
            (Some(_), None) => EngineState::Running,
            (Some(_), Some(_)) => EngineState::Transitioning,
        }
    }

    // -- Scene switching --

    /// Switch to the scene at `index`.
    ///
    /// * unknown index: `UnknownScene`, nothing changes
    /// * already current: no-op
    /// * no current scene yet: the target's `before_enter` runs and it becomes current
    /// * without a transition: old `before_leave`, new `before_enter`, swap, all now
    /// * with a transition: the transition starts; hooks run when it finishes
    /// * while another transition is in flight: `TransitionInProgress`, and
    ///   the transition in flight carries on
    ///
    /// Changes requested by the hooks themselves are applied before returning.
    pub fn change_scene(&mut self, index: SceneIndex, transition: Option<Box<dyn Transition>>) -> Result<()> {
        self.chained = 0;
        self.request_change(index, transition)?;
        self.apply_requests();
        Ok(())
    }

    pub fn change_scene_by_tag(&mut self, tag: &str, transition: Option<Box<dyn Transition>>) -> Result<()> {
        let index = self
            .scene_index(tag)
            .ok_or_else(|| EngineError::UnknownSceneTag(tag.to_string()))?;
        self.change_scene(index, transition)
    }

    fn request_change(&mut self, index: SceneIndex, transition: Option<Box<dyn Transition>>) -> Result<()> {
        if index.0 >= self.scenes.len() {
            return Err(EngineError::UnknownScene(index));
        }
        if let Some(pending) = &self.pending {
            return Err(EngineError::TransitionInProgress {
                requested: index,
                target: pending.target,
            });
        }
        match self.current {
            None => {
                if transition.is_some() {
                    log::debug!("no current scene; entering {} without a transition", index);
                }
                self.run_hook(index, Hook::Enter);
                self.current = Some(index);
                log::info!("scene {} is now current", index);
            }
            Some(current) if current == index => {}
            Some(current) => match transition {
                None => {
                    self.run_hook(current, Hook::Leave);
                    self.run_hook(index, Hook::Enter);
                    self.current = Some(index);
                    log::info!("switched scene {} -> {}", current, index);
                }
                Some(transition) => {
                    log::debug!("transition {} -> {} started", current, index);
                    self.pending = Some(PendingChange { target: index, transition });
                }
            },
        }
        Ok(())
    }

    fn run_hook(&mut self, index: SceneIndex, hook: Hook) {
        let surface = self.surface_size();
        let transitioning = self.pending.is_some();
        let mut ctx = SceneContext::new(
            &self.textures,
            &mut self.rng,
            &mut self.client_data,
            surface,
            self.current,
            transitioning,
        );
        if let Some(scene) = self.scenes.get_mut(index.0) {
            match hook {
                Hook::Enter => scene.before_enter(&mut ctx),
                Hook::Leave => scene.before_leave(&mut ctx),
            }
        }
        self.requests.extend(ctx.into_requests());
    }

    /// Apply scene requests queued by hooks and listeners, including any they
    /// trigger in turn. At most `max_chained_scene_changes` are applied per
    /// frame (or per direct `change_scene`/`dispatch_event` call); the count
    /// is shared by every apply point in that frame.
    fn apply_requests(&mut self) {
        let limit = self.config.max_chained_scene_changes;
        while !self.requests.is_empty() {
            let batch = std::mem::take(&mut self.requests);
            for request in batch {
                if self.chained >= limit {
                    log::warn!("more than {} chained scene changes in one frame; dropping the rest", limit);
                    self.requests.clear();
                    return;
                }
                self.chained += 1;
                let result = match request.target {
                    SceneTarget::Index(index) => self.request_change(index, request.transition),
                    SceneTarget::Tag(tag) => match self.scene_index(&tag) {
                        Some(index) => self.request_change(index, request.transition),
                        None => Err(EngineError::UnknownSceneTag(tag)),
                    },
                };
                if let Err(e) = result {
                    log::warn!("scene request rejected: {}", e);
                }
            }
        }
    }

    // -- Assets --

    /// Resolve an atlas against already-loaded images and add its textures.
    /// On error no texture from this atlas is added.
    pub fn load_texture_atlas(&mut self, atlas: &AtlasData, loader: &mut impl ImageLoader) -> Result<()> {
        let map = TextureMap::from_atlas(atlas, loader)?;
        let count = map.len();
        self.textures.extend(map)?;
        self.atlas_loaded = true;
        log::info!("texture atlas loaded: {} textures", count);
        Ok(())
    }

    pub fn load_texture_atlas_json(&mut self, json: &str, loader: &mut impl ImageLoader) -> Result<()> {
        let atlas = AtlasData::from_json(json)?;
        self.load_texture_atlas(&atlas, loader)
    }

    pub fn textures(&self) -> &TextureMap {
        &self.textures
    }

    pub fn is_atlas_loaded(&self) -> bool {
        self.atlas_loaded
    }

    /// Shared random source, e.g. for building particle systems outside a hook.
    pub fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }

    // -- Client data --

    /// Engine-wide data shared by every scene. Hooks and listeners reach it
    /// through `SceneContext::engine_data`.
    pub fn client_data(&self) -> &ClientData {
        &self.client_data
    }

    pub fn client_data_mut(&mut self) -> &mut ClientData {
        &mut self.client_data
    }

    /// Replace the engine's client data with a copy of `data`.
    pub fn set_client_data(&mut self, data: &ClientData) {
        self.client_data = data.clone();
    }

    // -- Frame loop --

    /// Check the engine can run frames. Requires an active scene, and a
    /// loaded atlas unless `require_atlas` is off.
    pub fn start_frame(&mut self) -> Result<()> {
        let Some(current) = self.current else {
            log::error!("cannot start the frame loop: no active scene");
            return Err(EngineError::NoActiveScene);
        };
        if self.config.require_atlas && !self.atlas_loaded {
            log::error!("cannot start the frame loop: texture atlas not loaded");
            return Err(EngineError::AtlasNotLoaded);
        }
        self.running = true;
        log::info!("frame loop started on scene {}", current);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_display_fps(&mut self, display: bool) {
        self.config.display_fps = display;
    }

    /// Queue an event for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Deliver an event to the current scene now: widgets first, then the
    /// scene handler. Returns true when a widget consumed it.
    pub fn dispatch_event(&mut self, event: &InputEvent) -> Result<bool> {
        if self.current.is_none() {
            return Err(EngineError::NoActiveScene);
        }
        self.chained = 0;
        let consumed = self.route_event(event);
        self.apply_requests();
        Ok(consumed)
    }

    fn route_event(&mut self, event: &InputEvent) -> bool {
        let Some(index) = self.current else {
            return false;
        };
        let surface = self.surface_size();
        let transitioning = self.pending.is_some();
        let mut ctx = SceneContext::new(
            &self.textures,
            &mut self.rng,
            &mut self.client_data,
            surface,
            self.current,
            transitioning,
        );
        let consumed = match self.scenes.get_mut(index.0) {
            Some(scene) => scene.handle_event(&mut ctx, event),
            None => false,
        };
        self.requests.extend(ctx.into_requests());
        consumed
    }

    /// Produce one frame.
    ///
    /// Measures the delta from the previous timestamp, clears the surface,
    /// delivers queued input, then either updates and draws the current scene
    /// or advances the transition in flight. Scene changes requested along
    /// the way are applied before returning.
    pub fn draw_frame(&mut self, timestamp_ms: f64) -> Result<&RenderBuffer> {
        if self.current.is_none() {
            return Err(EngineError::NoActiveScene);
        }
        let delta = self.clock.tick(timestamp_ms);
        self.canvas.clear();
        self.chained = 0;

        for event in self.input.drain() {
            self.route_event(&event);
        }
        self.apply_requests();

        if self.pending.is_some() {
            self.step_transition(delta);
        } else {
            self.render_current(delta);
        }
        self.apply_requests();

        if self.config.display_fps {
            self.draw_fps();
        }
        Ok(&self.canvas)
    }

    /// `draw_frame`, then hand the result to `renderer`.
    pub fn present_frame(&mut self, timestamp_ms: f64, renderer: &mut impl Renderer) -> Result<()> {
        let frame = self.draw_frame(timestamp_ms)?;
        renderer.present(frame);
        Ok(())
    }

    fn render_current(&mut self, delta: f32) {
        let Some(index) = self.current else {
            return;
        };
        let surface = self.surface_size();
        let mut ctx = SceneContext::new(
            &self.textures,
            &mut self.rng,
            &mut self.client_data,
            surface,
            self.current,
            false,
        );
        if let Some(scene) = self.scenes.get_mut(index.0) {
            scene.render(&mut self.canvas, &mut ctx, delta);
        }
        self.requests.extend(ctx.into_requests());
    }

    fn step_transition(&mut self, delta: f32) {
        let (Some(current), Some(mut pending)) = (self.current, self.pending.take()) else {
            return;
        };
        let surface = self.surface_size();
        let mut ctx = SceneContext::new(
            &self.textures,
            &mut self.rng,
            &mut self.client_data,
            surface,
            Some(current),
            true,
        );
        let finished = match pair_mut(&mut self.scenes, current.0, pending.target.0) {
            Some((outgoing, incoming)) => {
                let mut stage = TransitionStage::new(outgoing, incoming, &mut self.canvas, &mut ctx);
                pending.transition.draw(&mut stage, delta)
            }
            None => true,
        };
        let ignored = ctx.into_requests().len();
        if ignored > 0 {
            log::warn!("{} scene change request(s) ignored: transition in progress", ignored);
        }

        if finished {
            self.run_hook(current, Hook::Leave);
            self.run_hook(pending.target, Hook::Enter);
            self.current = Some(pending.target);
            log::info!("transition {} -> {} finished", current, pending.target);
        } else {
            self.pending = Some(pending);
        }
    }

    fn draw_fps(&mut self) {
        if let Some(fps) = self.clock.fps() {
            let overlay = &self.config.fps_overlay;
            self.canvas
                .fill_text(&format!("{:.1} fps", fps), overlay.position, &overlay.font, overlay.color);
        }
    }

    /// The most recently drawn frame.
    pub fn canvas(&self) -> &RenderBuffer {
        &self.canvas
    }

    /// Seconds between the last two frames.
    pub fn delta(&self) -> f32 {
        self.clock.delta()
    }

    pub fn fps(&self) -> Option<f32> {
        self.clock.fps()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Two distinct elements of a slice, both mutable.
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a >= items.len() || b >= items.len() {
        return None;
    }
    if a < b {
        let (lo, hi) = items.split_at_mut(b);
        Some((&mut lo[a], &mut hi[0]))
    } else {
        let (lo, hi) = items.split_at_mut(a);
        Some((&mut hi[0], &mut lo[b]))
    }
}
