/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Pointer gesture handling for the map editor.
//!
//! The host reports clicks with their target and modifier keys. Turning a
//! click into intents is a pure function of the click and the current
//! selection, so the dispatch policy is testable without a surface.

use crate::app::EditorIntent;
use crate::geo::LatLng;
use crate::graph::{EdgeId, NodeId, Selection};

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Latched "placement lock": every map click places a node.
    pub placement_lock: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        placement_lock: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        placement_lock: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        placement_lock: false,
    };
}

/// What the pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Empty map space.
    Map,
    Node(NodeId),
    Edge(EdgeId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerClick {
    pub target: ClickTarget,
    pub latlng: LatLng,
    pub modifiers: Modifiers,
}

impl PointerClick {
    pub fn on_map(latlng: LatLng, modifiers: Modifiers) -> Self {
        Self {
            target: ClickTarget::Map,
            latlng,
            modifiers,
        }
    }

    pub fn on_node(node: NodeId, latlng: LatLng, modifiers: Modifiers) -> Self {
        Self {
            target: ClickTarget::Node(node),
            latlng,
            modifiers,
        }
    }

    pub fn on_edge(edge: EdgeId, latlng: LatLng, modifiers: Modifiers) -> Self {
        Self {
            target: ClickTarget::Edge(edge),
            latlng,
            modifiers,
        }
    }
}

/// Resolve a primary click into editor intents.
///
/// Map clicks:
/// 1. shift with a node selected: new node joined to the selected one
/// 2. ctrl or placement lock: new unconnected node
/// 3. otherwise: clear the selection
///
/// Node clicks connect from the selected node when shift is held, then select
/// the clicked node. Edge clicks select the edge.
pub fn resolve_click(click: &PointerClick, current: Selection) -> Vec<EditorIntent> {
    let modifiers = click.modifiers;
    match click.target {
        ClickTarget::Map => {
            if let (true, Some(from)) = (modifiers.shift, current.node()) {
                vec![EditorIntent::AddNodeWithEdge {
                    at: click.latlng,
                    from,
                }]
            } else if modifiers.ctrl || modifiers.placement_lock {
                vec![EditorIntent::AddNode { at: click.latlng }]
            } else {
                vec![EditorIntent::ClearSelection]
            }
        },
        ClickTarget::Node(node) => {
            let mut intents = Vec::with_capacity(2);
            if let (true, Some(from)) = (modifiers.shift, current.node()) {
                intents.push(EditorIntent::AddEdge { from, to: node });
            }
            intents.push(EditorIntent::SelectNode { node });
            intents
        },
        ClickTarget::Edge(edge) => vec![EditorIntent::SelectEdge { edge }],
    }
}
