use glam::Vec2;
use serde::{Deserialize, Serialize};

/// `KeyboardEvent.key` values the engine and demos match on.
pub mod keys {
    pub const ARROW_LEFT: &str = "ArrowLeft";
    pub const ARROW_RIGHT: &str = "ArrowRight";
    pub const ARROW_UP: &str = "ArrowUp";
    pub const ARROW_DOWN: &str = "ArrowDown";
    pub const SPACE: &str = " ";
    pub const ENTER: &str = "Enter";
    pub const ESCAPE: &str = "Escape";

    pub const ARROWS: [&str; 4] = [ARROW_LEFT, ARROW_RIGHT, ARROW_UP, ARROW_DOWN];
}

/// Input event types the engine understands. Coordinates are surface pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    KeyDown { key: String },
    KeyUp { key: String },
    /// Mouse button pressed.
    PointerDown { x: f32, y: f32 },
    Click { x: f32, y: f32 },
    TouchStart { id: u32, x: f32, y: f32 },
    TouchMove { id: u32, x: f32, y: f32 },
    TouchEnd { id: u32 },
    TouchCancel { id: u32 },
}

impl InputEvent {
    pub fn key_down(key: impl Into<String>) -> Self {
        InputEvent::KeyDown { key: key.into() }
    }

    pub fn key_up(key: impl Into<String>) -> Self {
        InputEvent::KeyUp { key: key.into() }
    }

    /// Surface coordinates, for events that carry them.
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            InputEvent::PointerDown { x, y }
            | InputEvent::Click { x, y }
            | InputEvent::TouchStart { x, y, .. }
            | InputEvent::TouchMove { x, y, .. } => Some(Vec2::new(x, y)),
            _ => None,
        }
    }

    /// Presses are the only events widgets hit-test.
    pub fn is_press(&self) -> bool {
        matches!(self, InputEvent::PointerDown { .. } | InputEvent::TouchStart { .. })
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            InputEvent::KeyDown { key } | InputEvent::KeyUp { key } => Some(key),
            _ => None,
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            InputEvent::TouchStart { .. }
                | InputEvent::TouchMove { .. }
                | InputEvent::TouchEnd { .. }
                | InputEvent::TouchCancel { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_classification() {
        assert!(InputEvent::PointerDown { x: 0.0, y: 0.0 }.is_press());
        assert!(InputEvent::TouchStart { id: 1, x: 0.0, y: 0.0 }.is_press());
        assert!(!InputEvent::Click { x: 0.0, y: 0.0 }.is_press());
        assert!(!InputEvent::TouchMove { id: 1, x: 0.0, y: 0.0 }.is_press());
        assert!(!InputEvent::key_down(keys::SPACE).is_press());
    }

    #[test]
    fn position_and_key_accessors() {
        assert_eq!(InputEvent::Click { x: 3.0, y: 4.0 }.position(), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(InputEvent::TouchEnd { id: 0 }.position(), None);
        assert_eq!(InputEvent::key_up(keys::ARROW_UP).key(), Some("ArrowUp"));
    }

    #[test]
    fn deserialises_from_tagged_json() {
        let event: InputEvent = serde_json::from_str(r#"{ "type": "touchStart", "id": 2, "x": 1, "y": 5 }"#).unwrap();
        assert_eq!(event, InputEvent::TouchStart { id: 2, x: 1.0, y: 5.0 });
        assert!(event.is_touch());
    }
}
