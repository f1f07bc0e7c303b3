/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Reversible structural edits.
//!
//! Each action owns copies of the elements it moves in or out of the store,
//! captured when the action was built. Those copies are never mutated
//! afterwards, so an action and its inverse always describe the same edit.
//!
//! Ordering:
//! - create: edges are added before their node, the selection changes last
//! - delete: the selection is cleared first, edges are removed before their node

use log::debug;

use crate::graph::{Edge, GraphStore, Node, NodeId, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapActionKind {
    CreateNode,
    DeleteNode,
    CreateEdge,
    DeleteEdge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapAction {
    /// Add `edges`, then `node`, then select the node.
    CreateNodeWithEdges { node: Node, edges: Vec<Edge> },
    /// Clear a selection on any of the removed elements, then remove `edges`
    /// and finally `node`.
    DeleteNodeWithEdges { node: Node, edges: Vec<Edge> },
    /// Add the edge and select it.
    CreateEdge { edge: Edge },
    /// Remove the edge, clearing the selection if it named the edge.
    DeleteEdge { edge: Edge },
}

impl MapAction {
    pub fn kind(&self) -> MapActionKind {
        match self {
            MapAction::CreateNodeWithEdges { .. } => MapActionKind::CreateNode,
            MapAction::DeleteNodeWithEdges { .. } => MapActionKind::DeleteNode,
            MapAction::CreateEdge { .. } => MapActionKind::CreateEdge,
            MapAction::DeleteEdge { .. } => MapActionKind::DeleteEdge,
        }
    }

    /// The node this action moves in or out of the store, if any.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            MapAction::CreateNodeWithEdges { node, .. }
            | MapAction::DeleteNodeWithEdges { node, .. } => Some(node.id()),
            MapAction::CreateEdge { .. } | MapAction::DeleteEdge { .. } => None,
        }
    }

    /// The action that exactly undoes this one.
    pub fn inverse(&self) -> MapAction {
        match self {
            MapAction::CreateNodeWithEdges { node, edges } => MapAction::DeleteNodeWithEdges {
                node: node.clone(),
                edges: edges.clone(),
            },
            MapAction::DeleteNodeWithEdges { node, edges } => MapAction::CreateNodeWithEdges {
                node: node.clone(),
                edges: edges.clone(),
            },
            MapAction::CreateEdge { edge } => MapAction::DeleteEdge { edge: edge.clone() },
            MapAction::DeleteEdge { edge } => MapAction::CreateEdge { edge: edge.clone() },
        }
    }

    /// Apply the edit. Preconditions (endpoints live, elements absent or
    /// present as required) are the caller's responsibility.
    pub fn execute(&self, graph: &mut GraphStore, selection: &mut Selection) {
        debug!("Executing {:?} ({})", self.kind(), self.summary());
        match self {
            MapAction::CreateNodeWithEdges { node, edges } => {
                for edge in edges {
                    graph.add_edge(edge.clone());
                }
                graph.add_node(node.clone());
                *selection = graph.select(*selection, Selection::Node(node.id()));
            },
            MapAction::DeleteNodeWithEdges { node, edges } => {
                let names_removed = match *selection {
                    Selection::Node(id) => id == node.id(),
                    Selection::Edge(id) => edges.iter().any(|edge| edge.id() == id),
                    Selection::Empty => false,
                };
                if names_removed {
                    *selection = graph.deselect(*selection);
                }
                for edge in edges {
                    graph.remove_edge(edge.id());
                }
                graph.remove_node(node.id());
            },
            MapAction::CreateEdge { edge } => {
                graph.add_edge(edge.clone());
                *selection = graph.select(*selection, Selection::Edge(edge.id()));
            },
            MapAction::DeleteEdge { edge } => {
                graph.remove_edge(edge.id());
                if *selection == Selection::Edge(edge.id()) {
                    *selection = graph.deselect(*selection);
                }
            },
        }
    }

    fn summary(&self) -> String {
        match self {
            MapAction::CreateNodeWithEdges { node, edges }
            | MapAction::DeleteNodeWithEdges { node, edges } => {
                format!("node {} at {}, {} edge(s)", node.id(), node.position, edges.len())
            },
            MapAction::CreateEdge { edge } | MapAction::DeleteEdge { edge } => {
                format!("edge {}", edge.id())
            },
        }
    }
}
