//! Turns a dragging touch into held arrow directions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::input::event::InputEvent;

/// Held directions, as if arrow keys were down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Directions {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Directions {
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    /// Unit-ish step vector in canvas coordinates (y grows downward).
    pub fn axis(&self) -> Vec2 {
        let x = self.right as i32 - self.left as i32;
        let y = self.down as i32 - self.up as i32;
        Vec2::new(x as f32, y as f32)
    }
}

/// Swipe state for one touch. Owned by whoever consumes it (usually a scene
/// handler), so separate scenes never share touch status.
///
/// A direction turns on once the finger is `threshold` px from the start
/// point on that axis. When it gets more than `trailing` px away, the start
/// point is dragged along so reversing direction responds quickly.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    pub threshold: Vec2,
    pub trailing: Vec2,
    active: Option<u32>,
    start: Vec2,
    directions: Directions,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::with_thresholds(Vec2::splat(30.0), Vec2::splat(40.0))
    }

    pub fn with_thresholds(threshold: Vec2, trailing: Vec2) -> Self {
        Self {
            threshold,
            trailing,
            active: None,
            start: Vec2::ZERO,
            directions: Directions::default(),
        }
    }

    pub fn directions(&self) -> Directions {
        self.directions
    }

    pub fn is_touching(&self) -> bool {
        self.active.is_some()
    }

    /// Feed an event. Non-touch events and touches other than the tracked
    /// one are ignored. Returns the directions after the event.
    pub fn handle(&mut self, event: &InputEvent) -> Directions {
        match *event {
            InputEvent::TouchStart { id, x, y } => {
                if self.active.is_none() {
                    self.active = Some(id);
                    self.start = Vec2::new(x, y);
                    self.directions = Directions::default();
                }
            }
            InputEvent::TouchMove { id, x, y } if self.active == Some(id) => {
                self.track(Vec2::new(x, y));
            }
            InputEvent::TouchEnd { id } | InputEvent::TouchCancel { id } if self.active == Some(id) => {
                self.reset();
            }
            _ => {}
        }
        self.directions
    }

    fn track(&mut self, pos: Vec2) {
        let diff = self.start - pos;

        let (left, right) = axis_state(diff.x, self.threshold.x);
        self.directions.left = left;
        self.directions.right = right;
        let (up, down) = axis_state(diff.y, self.threshold.y);
        self.directions.up = up;
        self.directions.down = down;

        self.start.x += trail(diff.x, self.threshold.x, self.trailing.x);
        self.start.y += trail(diff.y, self.threshold.y, self.trailing.y);
    }

    pub fn reset(&mut self) {
        self.active = None;
        self.start = Vec2::ZERO;
        self.directions = Directions::default();
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// (negative-direction, positive-direction) for a start-minus-current offset.
fn axis_state(diff: f32, threshold: f32) -> (bool, bool) {
    if diff.abs() < threshold {
        (false, false)
    } else if diff < 0.0 {
        (false, true)
    } else {
        (true, false)
    }
}

fn trail(diff: f32, threshold: f32, trailing: f32) -> f32 {
    if diff.abs() <= trailing {
        return 0.0;
    }
    let step = trailing - threshold;
    if diff < 0.0 { step } else { -step }
}
