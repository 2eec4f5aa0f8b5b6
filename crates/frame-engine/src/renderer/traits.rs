//! Presentation backends.
//!
//! The engine only records draw commands. Whatever turns them into pixels
//! (a browser canvas through the web bridge, a test double, a native GPU
//! backend) implements `Renderer`.

use super::buffer::RenderBuffer;

/// Consumes one recorded frame.
pub trait Renderer {
    /// Backend identifier (e.g., "canvas2d", "headless").
    fn backend(&self) -> &'static str;

    /// Present a complete frame.
    fn present(&mut self, frame: &RenderBuffer);
}

/// Counts presented frames and keeps the command count of the last one.
/// Useful for headless runs and tests.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
    pub last_command_count: usize,
}

impl Renderer for HeadlessRenderer {
    fn backend(&self) -> &'static str {
        "headless"
    }

    fn present(&mut self, frame: &RenderBuffer) {
        self.frames += 1;
        self.last_command_count = frame.command_count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Color, Rect};

    #[test]
    fn headless_counts_frames() {
        let mut renderer = HeadlessRenderer::default();
        let mut buf = RenderBuffer::new(10.0, 10.0);
        buf.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        renderer.present(&buf);
        renderer.present(&buf);
        assert_eq!(renderer.frames, 2);
        assert_eq!(renderer.last_command_count, 1);
        assert_eq!(renderer.backend(), "headless");
    }
}
