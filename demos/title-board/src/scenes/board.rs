//! The play board: a spinning sprite steered by arrow keys or swipes.
//!
//! Arrow key state lives in the scene's client data so other code can read
//! it; swipe state lives in the handler.

use frame_engine::{
    keys, ClientData, InputEvent, ParticleSystem, Scene, SceneContext, SceneHandler, Sprite, Stage, SwipeTracker,
    WipeDirection,
};
use glam::Vec2;
use serde_json::{json, Value};

use super::{score, textures, wipe};

pub const TAG: &str = "board";

pub const HERO: &str = "hero";
pub const READY: &str = "ready";

/// Seconds the "ready" banner stays up.
pub const READY_SECONDS: f32 = 1.0;
/// Seconds of play before the board hands over to the score screen.
pub const ROUND_SECONDS: f32 = 4.0;
/// Hero speed, px/s.
pub const DEFAULT_PPS: f64 = 120.0;
/// Hero spin, deg/s.
pub const SPIN: f32 = 45.0;

pub fn build(surface: Vec2) -> Scene {
    let mut scene = Scene::with_handler(TAG, Board::new(surface));
    scene.set_client_data(&initial_client_data());
    scene
}

fn initial_client_data() -> ClientData {
    let mut arrows = serde_json::Map::new();
    for key in keys::ARROWS {
        arrows.insert(key.to_string(), Value::Bool(false));
    }
    let mut data = ClientData::new();
    data.insert("pps".into(), json!(DEFAULT_PPS));
    data.insert("arrows".into(), Value::Object(arrows));
    data.insert("space".into(), Value::Bool(false));
    data.insert("rounds".into(), json!(0));
    data
}

fn arrow_down(data: &ClientData, key: &str) -> bool {
    data.get("arrows")
        .and_then(|arrows| arrows.get(key))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn set_arrow(data: &mut ClientData, key: &str, down: bool) {
    if let Some(arrows) = data.get_mut("arrows").and_then(Value::as_object_mut) {
        arrows.insert(key.to_string(), Value::Bool(down));
    }
}

pub struct Board {
    home: Vec2,
    swipe: SwipeTracker,
    elapsed: f32,
    leaving: bool,
}

impl Board {
    pub fn new(surface: Vec2) -> Self {
        Self {
            home: surface / 2.0,
            swipe: SwipeTracker::new(),
            elapsed: 0.0,
            leaving: false,
        }
    }

    /// Unit step from keys and swipe combined.
    fn steering(&self, data: &ClientData) -> Vec2 {
        let swipe = self.swipe.directions();
        let left = arrow_down(data, keys::ARROW_LEFT) || swipe.left;
        let right = arrow_down(data, keys::ARROW_RIGHT) || swipe.right;
        let up = arrow_down(data, keys::ARROW_UP) || swipe.up;
        let down = arrow_down(data, keys::ARROW_DOWN) || swipe.down;
        Vec2::new((right as i32 - left as i32) as f32, (down as i32 - up as i32) as f32)
    }
}

impl SceneHandler for Board {
    fn before_enter(&mut self, _ctx: &mut SceneContext<'_>, stage: &mut Stage) {
        self.elapsed = 0.0;
        self.leaving = false;
        self.swipe.reset();
        stage.remove_all_particles();
        for key in keys::ARROWS {
            set_arrow(stage.client_data_mut(), key, false);
        }
        let rounds = stage.client_data().get("rounds").and_then(Value::as_u64).unwrap_or(0);
        stage.client_data_mut().insert("rounds".into(), json!(rounds + 1));

        match stage.get_sprite_mut(HERO) {
            Some(hero) => hero.set_position(self.home.x, self.home.y, 0.0),
            None => {
                let hero = Sprite::new(textures::HERO, 1, HERO).with_position(self.home.x, self.home.y);
                if let Err(e) = stage.add_sprite(hero) {
                    log::error!("board: {}", e);
                }
            }
        }
        if stage.get_sprite(READY).is_none() {
            let banner = Sprite::new(textures::READY, 2, READY).with_position(self.home.x, self.home.y / 2.0);
            if let Err(e) = stage.add_sprite(banner) {
                log::error!("board: {}", e);
            }
        }
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, stage: &mut Stage, delta: f32) {
        self.elapsed += delta;

        if self.elapsed >= READY_SECONDS && stage.get_sprite(READY).is_some() {
            if let Err(e) = stage.remove_sprite(READY) {
                log::error!("board: {}", e);
            }
        }

        let step = self.steering(stage.client_data());
        let pps = stage.client_data().get("pps").and_then(Value::as_f64).unwrap_or(DEFAULT_PPS) as f32;
        let (w, h) = (ctx.width(), ctx.height());
        if let Some(hero) = stage.get_sprite_mut(HERO) {
            let pos = hero.position + step * pps * delta;
            let rotation = (hero.rotation + delta * SPIN) % 360.0;
            hero.set_position(pos.x.rem_euclid(w), pos.y.rem_euclid(h), rotation);
        }

        if self.elapsed >= ROUND_SECONDS && !self.leaving && !ctx.is_transitioning() {
            self.leaving = true;
            ctx.change_scene_by_tag(score::TAG, Some(wipe(WipeDirection::Right)));
        }
    }

    fn on_event(&mut self, ctx: &mut SceneContext<'_>, stage: &mut Stage, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key } | InputEvent::KeyUp { key } => {
                let down = matches!(event, InputEvent::KeyDown { .. });
                if keys::ARROWS.contains(&key.as_str()) {
                    set_arrow(stage.client_data_mut(), key, down);
                } else if key == keys::SPACE {
                    stage.client_data_mut().insert("space".into(), Value::Bool(down));
                }
            }
            InputEvent::PointerDown { x, y } => {
                let fire = ParticleSystem::fire(Vec2::new(*x, *y), textures::FIRE, ctx.rng());
                stage.add_particle(fire);
            }
            _ if event.is_touch() => {
                self.swipe.handle(event);
            }
            _ => {}
        }
    }

    fn before_leave(&mut self, _ctx: &mut SceneContext<'_>, stage: &mut Stage) {
        for system in stage.particles_mut() {
            system.stop_emission();
        }
    }
}

#[cfg(test)]
mod tests {
    use frame_engine::EngineState;

    use super::*;
    use crate::scenes::testing;

    fn on_board() -> frame_engine::Engine {
        let mut engine = testing::engine();
        engine.change_scene_by_tag(TAG, None).unwrap();
        engine
    }

    fn hero_position(engine: &frame_engine::Engine) -> Vec2 {
        engine.scene_by_tag(TAG).unwrap().get_sprite(HERO).unwrap().position
    }

    #[test]
    fn entering_places_hero_and_banner() {
        let engine = on_board();
        let board = engine.scene_by_tag(TAG).unwrap();
        assert_eq!(hero_position(&engine), Vec2::new(400.0, 300.0));
        assert!(board.get_sprite(READY).is_some());
        assert_eq!(board.client_data()["rounds"], 1);
    }

    #[test]
    fn banner_disappears_after_a_second() {
        let mut engine = on_board();
        testing::run(&mut engine, 0.0, 250.0, 4);
        assert!(engine.scene_by_tag(TAG).unwrap().get_sprite(READY).is_some());
        engine.draw_frame(1000.0).unwrap();
        assert!(engine.scene_by_tag(TAG).unwrap().get_sprite(READY).is_none());
    }

    #[test]
    fn arrow_key_moves_hero() {
        let mut engine = on_board();
        engine.draw_frame(0.0).unwrap();
        engine.push_input(InputEvent::key_down(keys::ARROW_RIGHT));
        engine.draw_frame(500.0).unwrap();
        let pos = hero_position(&engine);
        assert!((pos.x - 460.0).abs() < 1e-3, "{:?}", pos);
        assert_eq!(pos.y, 300.0);

        engine.push_input(InputEvent::key_up(keys::ARROW_RIGHT));
        engine.draw_frame(1000.0).unwrap();
        assert!((hero_position(&engine).x - 460.0).abs() < 1e-3);
    }

    #[test]
    fn swipe_moves_hero_up() {
        let mut engine = on_board();
        engine.draw_frame(0.0).unwrap();
        engine.push_input(InputEvent::TouchStart { id: 1, x: 100.0, y: 300.0 });
        engine.push_input(InputEvent::TouchMove { id: 1, x: 100.0, y: 250.0 });
        engine.draw_frame(100.0).unwrap();
        assert!(hero_position(&engine).y < 300.0);
    }

    #[test]
    fn hero_wraps_around_edges() {
        let mut engine = on_board();
        engine.draw_frame(0.0).unwrap();
        engine.push_input(InputEvent::key_down(keys::ARROW_LEFT));
        engine.draw_frame(3500.0).unwrap();
        let x = hero_position(&engine).x;
        assert!((0.0..800.0).contains(&x), "{}", x);
        assert!((x - 780.0).abs() < 1e-3, "{}", x);
    }

    #[test]
    fn pointer_down_starts_fire() {
        let mut engine = on_board();
        engine.push_input(InputEvent::PointerDown { x: 200.0, y: 200.0 });
        engine.draw_frame(0.0).unwrap();
        assert_eq!(engine.scene_by_tag(TAG).unwrap().particle_count(), 1);
    }

    #[test]
    fn round_ends_with_wipe_to_score() {
        let mut engine = on_board();
        testing::run(&mut engine, 0.0, 500.0, 9);
        assert_eq!(engine.state(), EngineState::Transitioning);
        assert_eq!(engine.requested_scene_index(), engine.scene_index(score::TAG));
        testing::run(&mut engine, 4500.0, 100.0, 10);
        assert_eq!(engine.current_scene_index(), engine.scene_index(score::TAG));
    }
}
