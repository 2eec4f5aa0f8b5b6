use frame_engine::{Engine, EngineConfig, SceneTarget};
use frame_web::App;

use crate::scenes::{board, score, title};

pub const SURFACE_W: f32 = 800.0;
pub const SURFACE_H: f32 = 600.0;

/// Title screen, a short play board, and a score screen, joined by wipes.
#[derive(Debug, Default)]
pub struct TitleBoard;

impl App for TitleBoard {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            surface_width: SURFACE_W,
            surface_height: SURFACE_H,
            display_fps: true,
            ..EngineConfig::default()
        }
    }

    fn build(&mut self, engine: &mut Engine) {
        engine.add_scene(title::build(engine.surface_size()));
        engine.add_scene(board::build(engine.surface_size()));
        engine.add_scene(score::build(engine.surface_size()));
        log::info!("title-board: {} scenes ready", engine.scene_count());
    }

    fn initial_scene(&self) -> SceneTarget {
        SceneTarget::Tag(title::TAG.to_string())
    }
}
