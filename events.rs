/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Change notifications for a presentation layer.
//!
//! The editor publishes the selection slot and both history depths over a
//! channel so a UI can mirror them without polling. Only actual changes are
//! sent.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::trace;
use serde::Serialize;

use crate::graph::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStack {
    Undo,
    Redo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EditorEvent {
    SelectionChanged(Selection),
    HistoryDepth { stack: HistoryStack, len: usize },
}

/// Sending half of the broadcast. Emitting without a subscriber, or after the
/// subscriber went away, is a no-op.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<Sender<EditorEvent>>,
}

impl EventSink {
    pub fn new(tx: Sender<EditorEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A fresh channel; returns the sink and its receiver.
    pub fn channel() -> (Self, Receiver<EditorEvent>) {
        let (tx, rx) = unbounded();
        (Self::new(tx), rx)
    }

    pub fn emit(&self, event: EditorEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(event).is_err() {
            trace!("Dropping {event:?}: no subscriber");
        }
    }
}
