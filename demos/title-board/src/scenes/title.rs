use frame_engine::{Scene, Sprite, Widget, WipeDirection};
use glam::Vec2;

use super::{board, textures, wipe};

pub const TAG: &str = "title";

pub fn build(surface: Vec2) -> Scene {
    let mut scene = Scene::new(TAG);
    let cx = surface.x / 2.0;
    if let Err(e) = scene.add_sprite(Sprite::new(textures::TITLE, 0, "title").with_position(cx, surface.y / 3.0)) {
        log::error!("title scene: {}", e);
    }
    scene.add_widget(
        Widget::image_button(cx, surface.y * 2.0 / 3.0, textures::START_BUTTON)
            .with_tag("start")
            .with_listener(|ctx, _, _| ctx.change_scene_by_tag(board::TAG, Some(wipe(WipeDirection::Right)))),
    );
    scene
}

#[cfg(test)]
mod tests {
    use frame_engine::{EngineState, InputEvent};

    use super::*;
    use crate::scenes::testing;

    #[test]
    fn start_button_wipes_to_board() {
        let mut engine = testing::engine();
        engine.change_scene_by_tag(TAG, None).unwrap();
        engine.start_frame().unwrap();

        engine.push_input(InputEvent::PointerDown { x: 400.0, y: 400.0 });
        engine.draw_frame(0.0).unwrap();
        assert_eq!(engine.state(), EngineState::Transitioning);

        testing::run(&mut engine, 100.0, 100.0, 10);
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(engine.current_scene_index(), engine.scene_index(board::TAG));
    }

    #[test]
    fn press_outside_button_does_nothing() {
        let mut engine = testing::engine();
        engine.change_scene_by_tag(TAG, None).unwrap();
        engine.push_input(InputEvent::PointerDown { x: 10.0, y: 10.0 });
        engine.draw_frame(0.0).unwrap();
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(engine.current_scene_index(), engine.scene_index(TAG));
    }
}
