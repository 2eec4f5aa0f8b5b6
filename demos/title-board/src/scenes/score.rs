use frame_engine::{Color, Font, Scene, SceneContext, SceneHandler, Stage, Widget, WipeDirection};
use glam::Vec2;
use serde_json::{json, Value};

use super::{title, wipe};

pub const TAG: &str = "score";

pub const VISITS: &str = "visits";
pub const BACK: &str = "back";

/// Engine data key counting how often the score screen has been shown.
pub const VISITS_KEY: &str = "scoreVisits";

pub struct Score;

impl SceneHandler for Score {
    fn before_enter(&mut self, ctx: &mut SceneContext<'_>, stage: &mut Stage) {
        let visits = ctx.engine_data().get(VISITS_KEY).and_then(Value::as_u64).unwrap_or(0) + 1;
        ctx.engine_data_mut().insert(VISITS_KEY.into(), json!(visits));
        if let Some(label) = stage.widget_mut(VISITS) {
            label.set_text(Some(format!("round {}", visits)));
        }
    }
}

pub fn build(surface: Vec2) -> Scene {
    let cx = surface.x / 2.0;
    let mut scene = Scene::with_handler(TAG, Score);
    scene.add_widget(
        Widget::label(cx, surface.y / 3.0, "Time's up")
            .with_tag("headline")
            .with_font(Font::new("sans-serif", 48.0)),
    );
    scene.add_widget(
        Widget::label(cx, surface.y / 2.0, "")
            .with_tag(VISITS)
            .with_colors(None, Color::rgb(200, 200, 200)),
    );
    scene.add_widget(
        Widget::button(cx, surface.y * 2.0 / 3.0, "Back")
            .with_tag(BACK)
            .with_padding(12.0)
            .with_listener(|ctx, _, _| ctx.change_scene_by_tag(title::TAG, Some(wipe(WipeDirection::Left)))),
    );
    scene
}
