//! Scene transitions.
//!
//! While a transition is in flight the engine hands it both scenes every
//! frame. The transition decides how to draw them and reports when it is done;
//! the engine then runs the leave/enter hooks and swaps the current scene.

use serde::{Deserialize, Serialize};

use crate::api::context::SceneContext;
use crate::core::scene::Scene;
use crate::extensions::easing::Easing;
use crate::renderer::buffer::RenderBuffer;

/// Animates the switch from one scene to another.
pub trait Transition {
    /// Draw one frame of the transition. Return `true` once finished; the
    /// engine will not call it again after that.
    fn draw(&mut self, stage: &mut TransitionStage<'_, '_>, delta: f32) -> bool;
}

/// Both scenes of a transition, plus the surface they draw into.
pub struct TransitionStage<'s, 'c> {
    outgoing: &'s mut Scene,
    incoming: &'s mut Scene,
    canvas: &'s mut RenderBuffer,
    ctx: &'s mut SceneContext<'c>,
}

impl<'s, 'c> TransitionStage<'s, 'c> {
    pub fn new(
        outgoing: &'s mut Scene,
        incoming: &'s mut Scene,
        canvas: &'s mut RenderBuffer,
        ctx: &'s mut SceneContext<'c>,
    ) -> Self {
        Self { outgoing, incoming, canvas, ctx }
    }

    /// Update and draw the scene being left.
    pub fn render_outgoing(&mut self, delta: f32) {
        self.outgoing.render(self.canvas, self.ctx, delta);
    }

    /// Update and draw the scene being entered.
    pub fn render_incoming(&mut self, delta: f32) {
        self.incoming.render(self.canvas, self.ctx, delta);
    }

    pub fn canvas(&mut self) -> &mut RenderBuffer {
        &mut *self.canvas
    }

    pub fn outgoing(&self) -> &Scene {
        &*self.outgoing
    }

    pub fn incoming(&self) -> &Scene {
        &*self.incoming
    }

    pub fn width(&self) -> f32 {
        self.canvas.width()
    }

    pub fn height(&self) -> f32 {
        self.canvas.height()
    }
}

/// When a wipe is over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Completion {
    /// Seconds.
    Duration(f32),
    /// Pixels per second across the surface width.
    Rate(f32),
}

impl Completion {
    /// Seconds until completion on a surface `width` pixels wide.
    pub fn threshold(&self, width: f32) -> f32 {
        match *self {
            Completion::Duration(secs) => secs.max(0.0),
            Completion::Rate(rate) if rate > 0.0 => width / rate,
            Completion::Rate(_) => 0.0,
        }
    }
}

/// Direction the outgoing scene slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WipeDirection {
    Left,
    #[default]
    Right,
}

/// Horizontal wipe: the outgoing scene slides off while the incoming one
/// slides in behind it.
#[derive(Debug, Clone)]
pub struct Wipe {
    completion: Completion,
    direction: WipeDirection,
    easing: Easing,
    elapsed: f32,
}

impl Wipe {
    pub fn new(completion: Completion) -> Self {
        Self {
            completion,
            direction: WipeDirection::default(),
            easing: Easing::Linear,
            elapsed: 0.0,
        }
    }

    pub fn duration(seconds: f32) -> Self {
        Self::new(Completion::Duration(seconds))
    }

    pub fn rate(pixels_per_second: f32) -> Self {
        Self::new(Completion::Rate(pixels_per_second))
    }

    pub fn with_direction(mut self, direction: WipeDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Boxed, ready for `change_scene`.
    pub fn boxed(self) -> Box<dyn Transition> {
        Box::new(self)
    }
}

impl Transition for Wipe {
    fn draw(&mut self, stage: &mut TransitionStage<'_, '_>, delta: f32) -> bool {
        self.elapsed += delta;
        let width = stage.width();
        let threshold = self.completion.threshold(width);
        if self.elapsed >= threshold {
            return true;
        }

        let offset = self.easing.apply(self.elapsed / threshold) * width;
        let (out_x, in_x) = match self.direction {
            WipeDirection::Right => (offset, offset - width),
            WipeDirection::Left => (-offset, width - offset),
        };

        stage.canvas().save();
        stage.canvas().translate(out_x, 0.0);
        stage.render_outgoing(delta);
        stage.canvas().restore();

        stage.canvas().save();
        stage.canvas().translate(in_x, 0.0);
        stage.render_incoming(delta);
        stage.canvas().restore();
        false
    }
}
