//! End-to-end runs through the public API: scenes, transitions, widgets and
//! particles driven by `draw_frame` the way the web runner drives them.

use std::cell::RefCell;
use std::rc::Rc;

use frame_engine::{
    DrawCommand, Engine, EngineConfig, EngineError, EngineState, HeadlessRenderer, InputEvent, ParticleConfig, ParticleKind,
    ParticleSystem, Rect, Rng, Scene, SceneContext, SceneHandler, SceneIndex, SequentialImages, Sprite, Stage,
    TextureMap, Widget, WidgetKind, Wipe,
};
use glam::Vec2;

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
}

impl SceneHandler for Recorder {
    fn before_enter(&mut self, _ctx: &mut SceneContext<'_>, _stage: &mut Stage) {
        self.log.borrow_mut().push(format!("enter {}", self.name));
    }

    fn before_leave(&mut self, _ctx: &mut SceneContext<'_>, _stage: &mut Stage) {
        self.log.borrow_mut().push(format!("leave {}", self.name));
    }
}

fn two_scenes() -> (Engine, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let mut engine = Engine::new(EngineConfig { require_atlas: false, ..EngineConfig::default() });
    for name in ["first", "second"] {
        engine.add_scene(Scene::with_handler(name, Recorder { name, log: log.clone() }));
    }
    (engine, log)
}

const ATLAS: &str = r#"[
    { "imageSource": "img/atlas.png", "textures": [
        { "name": "spark.png", "sourceRect": { "x": 0, "y": 0, "width": 8, "height": 8 },
          "intensityDecayLevels": 4 },
        { "name": "ship.png", "sourceRect": { "x": 8, "y": 0, "width": 32, "height": 32 },
          "anchor": { "x": 0.5, "y": 0.5 } }
    ]}
]"#;

#[test]
fn immediate_change_leaves_then_enters() {
    let (mut engine, log) = two_scenes();
    engine.change_scene(SceneIndex(0), None).unwrap();
    engine.start_frame().unwrap();
    engine.draw_frame(0.0).unwrap();

    engine.change_scene(SceneIndex(1), None).unwrap();
    assert_eq!(engine.current_scene_index(), Some(SceneIndex(1)));
    assert_eq!(*log.borrow(), vec!["enter first", "leave first", "enter second"]);
}

#[test]
fn timed_transition_swaps_once_when_done() {
    let (mut engine, log) = two_scenes();
    engine.change_scene(SceneIndex(0), None).unwrap();
    engine.draw_frame(0.0).unwrap();

    engine.change_scene(SceneIndex(1), Some(Wipe::duration(0.5).boxed())).unwrap();
    assert_eq!(engine.state(), EngineState::Transitioning);
    assert_eq!(log.borrow().len(), 1);

    engine.draw_frame(250.0).unwrap();
    assert_eq!(engine.state(), EngineState::Transitioning);
    assert_eq!(engine.current_scene_index(), Some(SceneIndex(0)));

    engine.draw_frame(500.0).unwrap();
    assert_eq!(engine.state(), EngineState::Running);
    assert_eq!(engine.current_scene_index(), Some(SceneIndex(1)));

    for t in [750.0, 1000.0, 1250.0] {
        engine.draw_frame(t).unwrap();
    }
    assert_eq!(*log.borrow(), vec!["enter first", "leave first", "enter second"]);
}

#[test]
fn change_during_transition_is_refused() {
    let (mut engine, log) = two_scenes();
    engine.add_scene(Scene::new("third"));
    engine.change_scene(SceneIndex(0), None).unwrap();
    engine.change_scene(SceneIndex(1), Some(Wipe::duration(1.0).boxed())).unwrap();

    assert!(matches!(engine.change_scene(SceneIndex(2), None), Err(EngineError::TransitionInProgress { .. })));
    assert_eq!(engine.requested_scene_index(), Some(SceneIndex(1)));
    assert_eq!(*log.borrow(), vec!["enter first"]);
}

#[test]
fn burst_runs_out() {
    let mut rng = Rng::new(7);
    let config = ParticleConfig { lifetime: (2.5, 3.0), spawn_count: 100, ..ParticleConfig::explosion() };
    let mut system = ParticleSystem::new(ParticleKind::Explosion, Vec2::new(50.0, 50.0), "spark.png", config, &mut rng);
    let textures = TextureMap::new();
    let mut canvas = frame_engine::RenderBuffer::new(100.0, 100.0);

    for _ in 0..5 {
        system.update_and_draw(&mut canvas, &textures, &mut rng, 0.5);
        assert!(system.in_progress());
    }
    system.update_and_draw(&mut canvas, &textures, &mut rng, 0.5);
    assert!(!system.in_progress());
}

#[test]
fn widget_rect_hit_test() {
    let textures = TextureMap::new();
    let mut widget = Widget::from_rect(WidgetKind::Button, Rect::new(10.0, 10.0, 50.0, 20.0));
    assert!(widget.hit_test(&textures, 30.0, 20.0));
    assert!(!widget.hit_test(&textures, 5.0, 5.0));
}

#[test]
fn duplicate_sprite_tag_leaves_scene_unchanged() {
    let mut scene = Scene::new("s");
    scene.add_sprite(Sprite::new("ship.png", 0, "ship").with_position(1.0, 1.0)).unwrap();
    assert!(scene.add_sprite(Sprite::new("ship.png", 3, "ship")).is_err());
    assert!(scene.add_sprite(Sprite::new("ship.png", 3, "ship")).is_err());

    let ship = scene.get_sprite("ship").unwrap();
    assert_eq!(ship.layer(), 0);
    assert_eq!(ship.position, Vec2::new(1.0, 1.0));
}

#[test]
fn button_press_in_frame_switches_scene() {
    let mut engine = Engine::new(EngineConfig::default());
    engine.load_texture_atlas_json(ATLAS, &mut SequentialImages::new(1)).unwrap();

    let mut menu = Scene::new("menu");
    menu.add_widget(
        Widget::from_rect(WidgetKind::Button, Rect::new(10.0, 10.0, 50.0, 20.0))
            .with_listener(|ctx, _, _| ctx.change_scene_by_tag("play", None)),
    );
    engine.add_scene(menu);
    let mut play = Scene::new("play");
    play.add_sprite(Sprite::new("ship.png", 0, "ship").with_position(100.0, 100.0)).unwrap();
    engine.add_scene(play);

    engine.change_scene_by_tag("menu", None).unwrap();
    engine.start_frame().unwrap();
    engine.push_input(InputEvent::PointerDown { x: 30.0, y: 20.0 });

    let mut renderer = HeadlessRenderer::default();
    engine.present_frame(0.0, &mut renderer).unwrap();
    assert_eq!(engine.current_scene_index(), engine.scene_index("play"));
    assert_eq!(renderer.frames, 1);

    engine.present_frame(16.0, &mut renderer).unwrap();
    let textures: Vec<_> = engine
        .canvas()
        .commands()
        .iter()
        .filter(|c| matches!(c, DrawCommand::Texture(_)))
        .collect();
    assert_eq!(textures.len(), 1);
    assert!(engine.canvas().to_json().unwrap().contains("\"op\":\"texture\""));
}

#[test]
fn start_requires_atlas_by_default() {
    let mut engine = Engine::default();
    engine.add_scene(Scene::new("only"));
    engine.change_scene(SceneIndex(0), None).unwrap();
    assert!(engine.start_frame().is_err());

    engine.load_texture_atlas_json(ATLAS, &mut SequentialImages::new(1)).unwrap();
    assert!(engine.start_frame().is_ok());
    assert!(engine.is_running());
}
