/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Editor state management: the selection slot, the graph and its history.
//!
//! Every structural edit is a [`MapAction`] that goes through
//! [`MapEditor::perform_action`]; undo and redo replay actions from the two
//! history stacks. Selection changes that are not edits (clicking an element,
//! clicking empty map) are not recorded in history.

use std::collections::HashSet;

use crossbeam_channel::Receiver;
use log::{debug, trace, warn};

use crate::config::EditorConfig;
use crate::events::{EditorEvent, EventSink, HistoryStack};
use crate::geo::LatLng;
use crate::graph::{EdgeId, GraphExport, GraphStore, NodeId, Selection};
use crate::history::{MapAction, ReversibleStack};
use crate::input::{self, PointerClick};
use crate::render::{MapStyle, MapSurface};

/// Deterministic mutation intent boundary for editor state updates.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorIntent {
    AddNode { at: LatLng },
    AddNodeWithEdge { at: LatLng, from: NodeId },
    DeleteNode { node: NodeId },
    AddEdge { from: NodeId, to: NodeId },
    DeleteEdge { edge: EdgeId },
    SelectNode { node: NodeId },
    SelectEdge { edge: EdgeId },
    ClearSelection,
    /// Delete whatever is selected: a node with its edges, or an edge.
    DeleteSelected,
    Undo,
    Redo,
    ZoomChanged { zoom: u8 },
}

/// The editor façade: owns the graph, the selection slot and the history.
pub struct MapEditor {
    config: EditorConfig,
    graph: GraphStore,
    selection: Selection,
    /// Actions that have been performed and can be undone.
    undo_stack: ReversibleStack<MapAction>,
    /// Actions that have been undone and can be redone.
    redo_stack: ReversibleStack<MapAction>,
    events: EventSink,
}

impl MapEditor {
    pub fn new(config: EditorConfig) -> Self {
        let events = EventSink::default();
        Self {
            graph: GraphStore::new(MapStyle::from_config(&config)),
            selection: Selection::Empty,
            undo_stack: ReversibleStack::new(HistoryStack::Undo, events.clone()),
            redo_stack: ReversibleStack::new(HistoryStack::Redo, events.clone()),
            events,
            config,
        }
    }

    /// Start broadcasting selection and history-depth changes.
    ///
    /// The editor keeps a single subscriber; calling this again replaces it.
    pub fn subscribe(&mut self) -> Receiver<EditorEvent> {
        let (events, rx) = EventSink::channel();
        self.undo_stack.set_events(events.clone());
        self.redo_stack.set_events(events.clone());
        self.events = events;
        rx
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn undo_stack_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_stack_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Snapshot `{ nodes, edges }` of the live graph.
    pub fn export_graph(&self) -> GraphExport {
        self.graph.export()
    }

    // Surface lifecycle.

    pub fn mount(&mut self, mut surface: Box<dyn MapSurface>) {
        debug!(
            "Mounting map at {} zoom {}",
            self.config.initial_view, self.config.initial_zoom
        );
        surface.set_view(self.config.initial_view, self.config.initial_zoom);
        surface.add_tile_layer(&self.config.tile_url, self.config.max_zoom);
        self.graph.mount(surface);
    }

    pub fn unmount(&mut self) -> Option<Box<dyn MapSurface>> {
        debug!("Unmounting map");
        self.graph.unmount()
    }

    pub fn resize(&mut self) {
        self.graph.resize();
    }

    pub fn on_zoom_changed(&mut self, zoom: u8) {
        self.graph.update_zoom(zoom);
    }

    // Gestures.

    /// Dispatch a primary click reported by the surface.
    pub fn handle_click(&mut self, click: &PointerClick) {
        let intents = input::resolve_click(click, self.selection);
        self.apply_intents(intents);
    }

    pub fn apply_intents(&mut self, intents: impl IntoIterator<Item = EditorIntent>) {
        for intent in intents {
            self.apply_intent(intent);
        }
    }

    fn apply_intent(&mut self, intent: EditorIntent) {
        trace!("Applying {intent:?}");
        match intent {
            EditorIntent::AddNode { at } => {
                self.add_node(at);
            },
            EditorIntent::AddNodeWithEdge { at, from } => {
                self.add_node_with_edge(at, from);
            },
            EditorIntent::DeleteNode { node } => {
                self.delete_node(node);
            },
            EditorIntent::AddEdge { from, to } => {
                self.add_edge(from, to);
            },
            EditorIntent::DeleteEdge { edge } => {
                self.delete_edge(edge);
            },
            EditorIntent::SelectNode { node } => {
                self.select(Selection::Node(node));
            },
            EditorIntent::SelectEdge { edge } => {
                self.select(Selection::Edge(edge));
            },
            EditorIntent::ClearSelection => self.clear_selection(),
            EditorIntent::DeleteSelected => {
                self.delete_selected();
            },
            EditorIntent::Undo => {
                self.undo();
            },
            EditorIntent::Redo => {
                self.redo();
            },
            EditorIntent::ZoomChanged { zoom } => self.on_zoom_changed(zoom),
        }
    }

    // Selection.

    /// Select a live node or edge. Returns whether the slot now names `target`.
    pub fn select(&mut self, target: Selection) -> bool {
        let previous = self.selection;
        self.selection = self.graph.select(previous, target);
        self.publish_selection(previous);
        self.selection == target
    }

    pub fn clear_selection(&mut self) {
        let previous = self.selection;
        self.selection = self.graph.deselect(previous);
        self.publish_selection(previous);
    }

    // Edits.

    /// Place an unconnected node. Always one history step.
    pub fn add_node(&mut self, at: LatLng) -> NodeId {
        let node = self.graph.create_node(at);
        let id = node.id();
        self.perform_action(MapAction::CreateNodeWithEdges {
            node,
            edges: Vec::new(),
        });
        id
    }

    /// Place a node joined to `from`. The node and its edge are one history step.
    pub fn add_node_with_edge(&mut self, at: LatLng, from: NodeId) -> Option<NodeId> {
        let Some(from) = self.graph.node(from).cloned() else {
            warn!("Cannot connect a new node from {from}: not in the graph");
            return None;
        };
        let node = self.graph.create_node(at);
        let edge = self.graph.create_edge(&from, &node);
        let id = node.id();
        self.perform_action(MapAction::CreateNodeWithEdges {
            node,
            edges: vec![edge],
        });
        Some(id)
    }

    /// Delete a node together with every edge touching it, as one history step.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.graph.node(id).cloned() else {
            warn!("Cannot delete node {id}: not in the graph");
            return false;
        };
        let edges = self
            .graph
            .edges_touching(id)
            .into_iter()
            .cloned()
            .collect();
        self.perform_action(MapAction::DeleteNodeWithEdges { node, edges });
        true
    }

    /// Connect two live nodes.
    ///
    /// Self-loops and a second edge with the same `(from, to)` identity are
    /// refused.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        if from == to {
            debug!("Not connecting node {from} to itself");
            return None;
        }
        let id = EdgeId::new(from, to);
        if self.graph.contains_edge(id) {
            debug!("Edge {id} already exists");
            return None;
        }
        let (Some(from), Some(to)) = (
            self.graph.node(from).cloned(),
            self.graph.node(to).cloned(),
        ) else {
            warn!("Cannot connect {from} to {to}: endpoint not in the graph");
            return None;
        };
        let edge = self.graph.create_edge(&from, &to);
        self.perform_action(MapAction::CreateEdge { edge });
        Some(id)
    }

    pub fn delete_edge(&mut self, id: EdgeId) -> bool {
        let Some(edge) = self.graph.edge(id).cloned() else {
            warn!("Cannot delete edge {id}: not in the graph");
            return false;
        };
        self.perform_action(MapAction::DeleteEdge { edge });
        true
    }

    /// Delete the selected node (with its edges) or edge.
    pub fn delete_selected(&mut self) -> bool {
        match self.selection {
            Selection::Node(id) => self.delete_node(id),
            Selection::Edge(id) => self.delete_edge(id),
            Selection::Empty => false,
        }
    }

    // History.

    /// Execute `action`, record it for undo and invalidate the redo history.
    ///
    /// The action must have been built from elements of this editor's graph.
    pub fn perform_action(&mut self, action: MapAction) {
        let previous = self.selection;
        action.execute(&mut self.graph, &mut self.selection);
        let mut dropped = self.push_undo(action);
        dropped += self.redo_stack.clear();
        if dropped > 0 {
            self.prune_detached_positions();
        }
        self.publish_selection(previous);
    }

    /// Undo the last action. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(action) = self.undo_stack.pop() else {
            return false;
        };
        debug!("Undo {:?}", action.kind());
        let previous = self.selection;
        action.inverse().execute(&mut self.graph, &mut self.selection);
        self.redo_stack.push(action);
        self.publish_selection(previous);
        true
    }

    /// Redo the last undone action. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(action) = self.redo_stack.pop() else {
            return false;
        };
        debug!("Redo {:?}", action.kind());
        let previous = self.selection;
        action.execute(&mut self.graph, &mut self.selection);
        if self.push_undo(action) > 0 {
            self.prune_detached_positions();
        }
        self.publish_selection(previous);
        true
    }

    /// Returns how many of the oldest entries the history limit dropped.
    fn push_undo(&mut self, action: MapAction) -> usize {
        self.undo_stack.push(action);
        match self.config.history_limit {
            Some(limit) => self.undo_stack.truncate_oldest(limit),
            None => 0,
        }
    }

    /// Only nodes still named by a history entry can be re-added.
    fn prune_detached_positions(&mut self) {
        let referenced: HashSet<NodeId> = self
            .undo_stack
            .iter()
            .chain(self.redo_stack.iter())
            .filter_map(MapAction::node_id)
            .collect();
        self.graph
            .retain_detached_positions(|id| referenced.contains(&id));
        trace!("{} detached node position(s) kept", self.graph.detached_count());
    }

    fn publish_selection(&self, previous: Selection) {
        debug_assert!(
            self.graph.selection_consistent(self.selection),
            "selection slot {:?} disagrees with element state {:?}",
            self.selection,
            self.graph.selected_elements()
        );
        if self.selection != previous {
            self.events
                .emit(EditorEvent::SelectionChanged(self.selection));
        }
    }
}

impl Default for MapEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl std::fmt::Debug for MapEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapEditor")
            .field("graph", &self.graph)
            .field("selection", &self.selection)
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .finish()
    }
}
