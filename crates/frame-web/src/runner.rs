use frame_engine::{Engine, EngineConfig, EngineError, InputEvent, Result, SceneTarget, SequentialImages};

/// The contract every app must fulfil.
pub trait App {
    /// Engine configuration. Called once, before the engine exists.
    fn config(&self) -> EngineConfig {
        EngineConfig::default()
    }

    /// Create scenes, sprites and widgets. Called once, after the atlas has
    /// loaded, so texture sizes are known.
    fn build(&mut self, engine: &mut Engine);

    /// Scene to activate when the loop starts.
    fn initial_scene(&self) -> SceneTarget;
}

/// Generic runner that wires an `App` to the engine's frame loop.
///
/// Each concrete app keeps its runner in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]` (see `export_frames!`), because
/// wasm-bindgen cannot export generic structs directly.
pub struct FrameRunner<A: App> {
    app: A,
    engine: Engine,
    built: bool,
}

impl<A: App> FrameRunner<A> {
    pub fn new(app: A) -> Self {
        let engine = Engine::new(app.config());
        Self { app, engine, built: false }
    }

    /// Like `new`, with a partial JSON config layered over `App::config`.
    pub fn with_config_json(app: A, json: &str) -> Result<Self> {
        let base = serde_json::to_value(app.config()).map_err(EngineError::Config)?;
        let mut merged = match base {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        match serde_json::from_str::<serde_json::Value>(json).map_err(EngineError::Config)? {
            serde_json::Value::Object(overrides) => merged.extend(overrides),
            other => log::warn!("ignoring non-object config override: {}", other),
        }
        let config = serde_json::from_value(serde_json::Value::Object(merged)).map_err(EngineError::Config)?;
        Ok(Self { engine: Engine::new(config), app, built: false })
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Register an atlas whose images JS has already loaded, in atlas order.
    pub fn load_atlas(&mut self, json: &str, image_count: u32) -> Result<()> {
        self.engine.load_texture_atlas_json(json, &mut SequentialImages::new(image_count))
    }

    /// Build the app (first call only), activate its initial scene and check
    /// the engine is ready to run frames.
    pub fn start(&mut self) -> Result<()> {
        if !self.built {
            self.app.build(&mut self.engine);
            self.built = true;
        }
        if self.engine.current_scene_index().is_none() {
            match self.app.initial_scene() {
                SceneTarget::Index(index) => self.engine.change_scene(index, None)?,
                SceneTarget::Tag(tag) => self.engine.change_scene_by_tag(&tag, None)?,
            }
        }
        self.engine.start_frame()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Run one frame and return its draw commands as JSON.
    pub fn tick(&mut self, timestamp_ms: f64) -> Result<String> {
        let frame = self.engine.draw_frame(timestamp_ms)?;
        frame.to_json().map_err(EngineError::Frame)
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.engine.push_input(event);
    }

    pub fn key_down(&mut self, key: &str) {
        self.push_input(InputEvent::key_down(key));
    }

    pub fn key_up(&mut self, key: &str) {
        self.push_input(InputEvent::key_up(key));
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.push_input(InputEvent::PointerDown { x, y });
    }

    pub fn click(&mut self, x: f32, y: f32) {
        self.push_input(InputEvent::Click { x, y });
    }

    pub fn touch_start(&mut self, id: u32, x: f32, y: f32) {
        self.push_input(InputEvent::TouchStart { id, x, y });
    }

    pub fn touch_move(&mut self, id: u32, x: f32, y: f32) {
        self.push_input(InputEvent::TouchMove { id, x, y });
    }

    pub fn touch_end(&mut self, id: u32) {
        self.push_input(InputEvent::TouchEnd { id });
    }

    pub fn touch_cancel(&mut self, id: u32) {
        self.push_input(InputEvent::TouchCancel { id });
    }

    pub fn set_display_fps(&mut self, display: bool) {
        self.engine.set_display_fps(display);
    }

    pub fn surface_width(&self) -> f32 {
        self.engine.surface_size().x
    }

    pub fn surface_height(&self) -> f32 {
        self.engine.surface_size().y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_engine::{Scene, SceneIndex, Sprite, Widget};

    struct TwoScenes;

    impl App for TwoScenes {
        fn config(&self) -> EngineConfig {
            EngineConfig { surface_width: 320.0, surface_height: 200.0, ..EngineConfig::default() }
        }

        fn build(&mut self, engine: &mut Engine) {
            let mut title = Scene::new("title");
            title.add_sprite(Sprite::new("logo", 0, "logo").with_position(160.0, 100.0)).unwrap();
            title.add_widget(Widget::button(160.0, 150.0, "start"));
            engine.add_scene(title);
            engine.add_scene(Scene::new("board"));
        }

        fn initial_scene(&self) -> SceneTarget {
            SceneTarget::Tag("title".into())
        }
    }

    const ATLAS: &str = r#"[{ "imageSource": "atlas.png", "textures": [
        { "name": "logo", "sourceRect": { "x": 0, "y": 0, "width": 64, "height": 32 } } ] }]"#;

    #[test]
    fn start_requires_atlas() {
        let mut runner = FrameRunner::new(TwoScenes);
        assert!(matches!(runner.start(), Err(EngineError::AtlasNotLoaded)));
        runner.load_atlas(ATLAS, 1).unwrap();
        runner.start().unwrap();
        assert!(runner.is_running());
        assert_eq!(runner.engine().current_scene_index(), Some(SceneIndex(0)));
        assert_eq!(runner.engine().scene_count(), 2);
    }

    #[test]
    fn tick_returns_draw_commands() {
        let mut runner = FrameRunner::new(TwoScenes);
        runner.load_atlas(ATLAS, 1).unwrap();
        runner.start().unwrap();
        let json = runner.tick(0.0).unwrap();
        assert!(json.contains(r#""op":"texture""#), "{}", json);
        assert!(json.contains(r#""op":"text""#), "{}", json);
    }

    #[test]
    fn tick_before_start_fails() {
        let mut runner = FrameRunner::new(TwoScenes);
        assert!(matches!(runner.tick(0.0), Err(EngineError::NoActiveScene)));
    }

    #[test]
    fn bad_atlas_is_reported() {
        let mut runner = FrameRunner::new(TwoScenes);
        assert!(matches!(runner.load_atlas("{", 1), Err(EngineError::Atlas(_))));
        assert!(matches!(runner.load_atlas(ATLAS, 0), Err(EngineError::Atlas(_))));
    }

    #[test]
    fn surface_comes_from_config() {
        let runner = FrameRunner::new(TwoScenes);
        assert_eq!(runner.surface_width(), 320.0);
        assert_eq!(runner.surface_height(), 200.0);
    }

    #[test]
    fn config_override_keeps_app_defaults() {
        let runner = FrameRunner::with_config_json(TwoScenes, r#"{ "surfaceHeight": 480, "displayFps": true }"#).unwrap();
        assert_eq!(runner.surface_width(), 320.0);
        assert_eq!(runner.surface_height(), 480.0);
        assert!(runner.engine().config().display_fps);
        assert!(matches!(FrameRunner::with_config_json(TwoScenes, "nope"), Err(EngineError::Config(_))));
    }
}
