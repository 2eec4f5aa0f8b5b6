use serde::{Deserialize, Serialize};

/// Position of a scene in the engine's registry. Assigned at insertion, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneIndex(pub usize);

impl std::fmt::Display for SceneIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse state of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No scene has been activated yet.
    Idle,
    /// A current scene is active and no transition is in flight.
    Running,
    /// A transition is rendering the current and requested scenes.
    Transitioning,
}

/// Scene-owned key/value blob. Opaque to the engine.
pub type ClientData = serde_json::Map<String, serde_json::Value>;

/// RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Scale the colour channels by `intensity`, keeping alpha.
    pub fn scaled(self, intensity: f32) -> Self {
        let k = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * k).round() as u8,
            g: (self.g as f32 * k).round() as u8,
            b: (self.b as f32 * k).round() as u8,
            a: self.a,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    /// Half-open containment: `[x, x+width)` by `[y, y+height)`.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 50.0, 20.0);
        assert!(r.contains(10.0, 10.0));
        assert!(r.contains(30.0, 20.0));
        assert!(!r.contains(60.0, 20.0));
        assert!(!r.contains(30.0, 30.0));
        assert!(!r.contains(5.0, 5.0));
    }

    #[test]
    fn color_alpha_defaults_to_opaque() {
        let c: Color = serde_json::from_str(r#"{"r":10,"g":20,"b":30}"#).unwrap();
        assert_eq!(c, Color::rgb(10, 20, 30));
    }

    #[test]
    fn scaled_keeps_alpha() {
        let c = Color { r: 200, g: 100, b: 50, a: 128 }.scaled(0.5);
        assert_eq!(c, Color { r: 100, g: 50, b: 25, a: 128 });
    }
}
