use std::collections::vec_deque::{self, VecDeque};

use crate::input::event::InputEvent;

/// Host events waiting for the next frame. The engine empties it once per
/// frame, before the scene update, so handlers see input in arrival order.
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        log::trace!("queued {:?}", event);
        self.pending.push_back(event);
    }

    /// Take everything queued so far. Events pushed while the result is
    /// being consumed wait for the next frame.
    pub fn drain(&mut self) -> vec_deque::IntoIter<InputEvent> {
        std::mem::take(&mut self.pending).into_iter()
    }

    pub fn peek(&self) -> Option<&InputEvent> {
        self.pending.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.pending.iter()
    }

    /// Drop queued events, e.g. when the surface loses focus.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_arrival_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::key_down("a"));
        assert_eq!(q.len(), 2);
        assert_eq!(q.peek(), Some(&InputEvent::PointerDown { x: 10.0, y: 20.0 }));

        let events: Vec<_> = q.drain().collect();
        assert_eq!(events[0], InputEvent::PointerDown { x: 10.0, y: 20.0 });
        assert_eq!(events[1].key(), Some("a"));
        assert!(q.is_empty());
    }

    #[test]
    fn push_after_drain_waits() {
        let mut q = InputQueue::new();
        q.push(InputEvent::TouchEnd { id: 1 });
        let first = q.drain();
        q.push(InputEvent::TouchEnd { id: 2 });
        assert_eq!(first.count(), 1);
        assert_eq!(q.len(), 1);
        q.clear();
        assert!(q.is_empty());
    }
}
