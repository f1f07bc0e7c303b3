/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Undo/redo history.

pub mod action;

pub use action::{MapAction, MapActionKind};

use crate::events::{EditorEvent, EventSink, HistoryStack};

/// LIFO stack that publishes its length whenever it changes.
#[derive(Debug)]
pub struct ReversibleStack<T> {
    items: Vec<T>,
    role: HistoryStack,
    events: EventSink,
}

impl<T> ReversibleStack<T> {
    pub fn new(role: HistoryStack, events: EventSink) -> Self {
        Self {
            items: Vec::new(),
            role,
            events,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.publish();
    }

    pub fn pop(&mut self) -> Option<T> {
        let item = self.items.pop()?;
        self.publish();
        Some(item)
    }

    /// Drop every entry. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.items.len();
        if dropped == 0 {
            return 0;
        }
        self.items.clear();
        self.publish();
        dropped
    }

    /// Drop the oldest entries until at most `max` remain. Returns how many
    /// were dropped.
    pub fn truncate_oldest(&mut self, max: usize) -> usize {
        if self.items.len() <= max {
            return 0;
        }
        let excess = self.items.len() - max;
        self.items.drain(0..excess);
        self.publish();
        excess
    }

    /// Replace the notification target.
    pub fn set_events(&mut self, events: EventSink) {
        self.events = events;
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter()
    }

    fn publish(&self) {
        self.events.emit(EditorEvent::HistoryDepth {
            stack: self.role,
            len: self.items.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depths(rx: &crossbeam_channel::Receiver<EditorEvent>) -> Vec<usize> {
        rx.try_iter()
            .filter_map(|event| match event {
                EditorEvent::HistoryDepth { len, .. } => Some(len),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn push_and_pop_publish_length() {
        let (sink, rx) = EventSink::channel();
        let mut stack = ReversibleStack::new(HistoryStack::Undo, sink);
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(depths(&rx), vec![1, 2, 1]);
    }

    #[test]
    fn no_change_publishes_nothing() {
        let (sink, rx) = EventSink::channel();
        let mut stack: ReversibleStack<u8> = ReversibleStack::new(HistoryStack::Redo, sink);
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.clear(), 0);
        assert_eq!(stack.truncate_oldest(4), 0);
        assert!(depths(&rx).is_empty());
    }

    #[test]
    fn clear_publishes_zero() {
        let (sink, rx) = EventSink::channel();
        let mut stack = ReversibleStack::new(HistoryStack::Redo, sink);
        stack.push('a');
        assert_eq!(stack.clear(), 1);
        assert!(stack.is_empty());
        assert_eq!(depths(&rx), vec![1, 0]);
    }

    #[test]
    fn truncate_oldest_keeps_newest() {
        let mut stack = ReversibleStack::new(HistoryStack::Undo, EventSink::default());
        for value in 0..5 {
            stack.push(value);
        }
        assert_eq!(stack.truncate_oldest(2), 3);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
    }
}
