/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Single-element selection.
//!
//! The slot names the selected element by kind and id; it never holds the
//! element itself. At most one live element reports `is_selected()`, and it is
//! the one named by the slot. [`GraphStore::select`](super::GraphStore::select)
//! enforces the deselect-before-select order for both element kinds.

use serde::Serialize;

use super::{EdgeId, NodeId};
use crate::render::RenderContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    None,
    Node,
    Edge,
}

/// The selection slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    Empty,
    Node(NodeId),
    Edge(EdgeId),
}

impl Selection {
    pub fn kind(&self) -> SelectionKind {
        match self {
            Selection::Empty => SelectionKind::None,
            Selection::Node(_) => SelectionKind::Node,
            Selection::Edge(_) => SelectionKind::Edge,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }

    pub fn node(&self) -> Option<NodeId> {
        match self {
            Selection::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn edge(&self) -> Option<EdgeId> {
        match self {
            Selection::Edge(id) => Some(*id),
            _ => None,
        }
    }
}

/// A graph element that can carry the selection highlight.
///
/// Implementors only flip their own state and restyle themselves; the
/// exclusivity protocol lives in the store.
pub trait Selectable {
    /// The slot value naming this element.
    fn selection(&self) -> Selection;

    fn is_selected(&self) -> bool;

    /// Take the active emphasis and return the slot value naming `self`.
    fn select(&mut self, ctx: RenderContext<'_>) -> Selection;

    /// Drop back to the default emphasis. Never faults when the element is no
    /// longer on a surface.
    fn deselect(&mut self, ctx: RenderContext<'_>) -> Selection;
}
