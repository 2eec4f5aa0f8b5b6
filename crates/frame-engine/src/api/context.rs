use glam::Vec2;

use crate::api::types::{ClientData, SceneIndex};
use crate::assets::registry::{TextureMap, TextureRecord};
use crate::core::transition::Transition;
use crate::systems::effects::Rng;

/// Which scene a queued request points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneTarget {
    Index(SceneIndex),
    Tag(String),
}

/// A scene change asked for from inside a hook, listener or transition.
pub struct SceneRequest {
    pub target: SceneTarget,
    pub transition: Option<Box<dyn Transition>>,
}

impl std::fmt::Debug for SceneRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRequest")
            .field("target", &self.target)
            .field("has_transition", &self.transition.is_some())
            .finish()
    }
}

/// The engine-wide client data, or a private blob for a detached context.
enum SharedData<'a> {
    Engine(&'a mut ClientData),
    Local(ClientData),
}

/// Engine services available to scene handlers and widget listeners.
///
/// Scene changes requested here are queued; the engine applies them as soon
/// as the calling hook returns, with the same rules as `Engine::change_scene`.
///
/// `engine_data` is the engine's own client data, shared by every scene.
/// Each scene's private data lives on its `Stage`.
pub struct SceneContext<'a> {
    textures: &'a TextureMap,
    rng: &'a mut Rng,
    shared: SharedData<'a>,
    surface: Vec2,
    current: Option<SceneIndex>,
    transitioning: bool,
    requests: Vec<SceneRequest>,
}

impl<'a> SceneContext<'a> {
    pub fn new(
        textures: &'a TextureMap,
        rng: &'a mut Rng,
        engine_data: &'a mut ClientData,
        surface: Vec2,
        current: Option<SceneIndex>,
        transitioning: bool,
    ) -> Self {
        Self {
            textures,
            rng,
            shared: SharedData::Engine(engine_data),
            surface,
            current,
            transitioning,
            requests: Vec::new(),
        }
    }

    /// A context outside any engine: no current scene, default surface, and
    /// empty engine data of its own.
    pub fn detached(textures: &'a TextureMap, rng: &'a mut Rng) -> Self {
        Self {
            textures,
            rng,
            shared: SharedData::Local(ClientData::new()),
            surface: Vec2::new(800.0, 600.0),
            current: None,
            transitioning: false,
            requests: Vec::new(),
        }
    }

    pub fn textures(&self) -> &'a TextureMap {
        self.textures
    }

    pub fn texture(&self, name: &str) -> Option<&'a TextureRecord> {
        self.textures.get(name)
    }

    pub fn rng(&mut self) -> &mut Rng {
        self.rng
    }

    pub fn engine_data(&self) -> &ClientData {
        match &self.shared {
            SharedData::Engine(data) => &**data,
            SharedData::Local(data) => data,
        }
    }

    pub fn engine_data_mut(&mut self) -> &mut ClientData {
        match &mut self.shared {
            SharedData::Engine(data) => &mut **data,
            SharedData::Local(data) => data,
        }
    }

    pub fn surface_size(&self) -> Vec2 {
        self.surface
    }

    pub fn width(&self) -> f32 {
        self.surface.x
    }

    pub fn height(&self) -> f32 {
        self.surface.y
    }

    pub fn current_scene(&self) -> Option<SceneIndex> {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn change_scene(&mut self, index: SceneIndex, transition: Option<Box<dyn Transition>>) {
        self.requests.push(SceneRequest { target: SceneTarget::Index(index), transition });
    }

    pub fn change_scene_by_tag(&mut self, tag: impl Into<String>, transition: Option<Box<dyn Transition>>) {
        self.requests.push(SceneRequest { target: SceneTarget::Tag(tag.into()), transition });
    }

    pub fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }

    /// Consume the context, handing back whatever it queued.
    pub fn into_requests(self) -> Vec<SceneRequest> {
        self.requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_queued_in_order() {
        let textures = TextureMap::new();
        let mut rng = Rng::new(1);
        let mut ctx = SceneContext::detached(&textures, &mut rng);
        assert!(!ctx.has_requests());
        ctx.change_scene(SceneIndex(2), None);
        ctx.change_scene_by_tag("score", None);
        let requests = ctx.into_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].target, SceneTarget::Index(SceneIndex(2)));
        assert_eq!(requests[1].target, SceneTarget::Tag("score".into()));
    }

    #[test]
    fn exposes_surface_and_state() {
        let textures = TextureMap::new();
        let mut rng = Rng::new(1);
        let mut data = ClientData::new();
        let ctx = SceneContext::new(&textures, &mut rng, &mut data, Vec2::new(320.0, 240.0), Some(SceneIndex(1)), true);
        assert_eq!(ctx.width(), 320.0);
        assert_eq!(ctx.height(), 240.0);
        assert_eq!(ctx.current_scene(), Some(SceneIndex(1)));
        assert!(ctx.is_transitioning());
        assert!(ctx.texture("missing").is_none());
    }

    #[test]
    fn engine_data_writes_through() {
        let textures = TextureMap::new();
        let mut rng = Rng::new(1);
        let mut data = ClientData::new();
        data.insert("level".into(), serde_json::json!(3));
        {
            let mut ctx = SceneContext::new(&textures, &mut rng, &mut data, Vec2::ZERO, None, false);
            assert_eq!(ctx.engine_data()["level"], 3);
            ctx.engine_data_mut().insert("lives".into(), serde_json::json!(2));
        }
        assert_eq!(data["lives"], 2);

        let mut ctx = SceneContext::detached(&textures, &mut rng);
        ctx.engine_data_mut().insert("scratch".into(), serde_json::json!(true));
        assert_eq!(ctx.engine_data().len(), 1);
    }
}
