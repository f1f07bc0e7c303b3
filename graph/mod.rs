/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph store for the map editor.
//!
//! Core structures:
//! - `GraphStore`: owner of the live node and edge collections
//! - `Node`: a placed point with a stable id
//! - `Edge`: a directed connection identified by its endpoint ids
//!
//! Boundary: `add_*`/`remove_*` are the only mutations of the visible
//! collections and are meant to be called from `MapAction::execute` only.
//! Mutating elsewhere desynchronizes the undo history from what is drawn.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use log::{trace, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::LatLng;
use crate::render::{FALLBACK_ZOOM, MapStyle, MapSurface, MarkerIcon, RenderContext};

pub mod selection;

pub use selection::{Selectable, Selection, SelectionKind};

/// Free-form element annotations. Keys are unique.
pub type Meta = BTreeMap<String, String>;

/// Stable node identity, generated once per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Edge identity: the ordered endpoint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeId {
    pub from_node_id: NodeId,
    pub to_node_id: NodeId,
}

impl EdgeId {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            from_node_id: from,
            to_node_id: to,
        }
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.from_node_id == node || self.to_node_id == node
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from_node_id, self.to_node_id)
    }
}

/// A placed graph vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    /// Position the node was placed at.
    pub position: LatLng,
    pub meta: Meta,
    /// Creation order within the store; keeps enumeration stable when an
    /// undo puts the node back.
    stamp: u64,
    selected: bool,
    /// Icon currently applied to this node's marker.
    icon: Option<Arc<MarkerIcon>>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn icon(&self) -> Option<&Arc<MarkerIcon>> {
        self.icon.as_ref()
    }

    /// Re-resolve the icon for the current state at a new zoom level.
    pub fn update_zoom(&mut self, ctx: RenderContext<'_>) {
        self.apply_icon(ctx);
    }

    fn apply_icon(&mut self, ctx: RenderContext<'_>) {
        let icon = ctx.style.icons.for_state(self.selected, ctx.zoom);
        if let Some(surface) = ctx.surface {
            surface.set_marker_icon(self.id, &icon);
        }
        self.icon = Some(icon);
    }
}

impl Selectable for Node {
    fn selection(&self) -> Selection {
        Selection::Node(self.id)
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn select(&mut self, ctx: RenderContext<'_>) -> Selection {
        self.selected = true;
        self.apply_icon(ctx);
        self.selection()
    }

    fn deselect(&mut self, ctx: RenderContext<'_>) -> Selection {
        self.selected = false;
        self.apply_icon(ctx);
        Selection::Empty
    }
}

/// A directed connection between two nodes.
///
/// The edge records its endpoints by id only; `path` is the pair of endpoint
/// positions captured when the edge was created, for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: EdgeId,
    pub path: [LatLng; 2],
    pub meta: Meta,
    stamp: u64,
    selected: bool,
    /// Stroke color currently applied to the polyline.
    color: Option<String>,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn from_node_id(&self) -> NodeId {
        self.id.from_node_id
    }

    pub fn to_node_id(&self) -> NodeId {
        self.id.to_node_id
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn apply_color(&mut self, ctx: RenderContext<'_>) {
        let color = ctx.style.edge_color_for(self.selected);
        if let Some(surface) = ctx.surface {
            surface.set_polyline_color(self.id, color);
        }
        self.color = Some(color.to_string());
    }
}

impl Selectable for Edge {
    fn selection(&self) -> Selection {
        Selection::Edge(self.id)
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn select(&mut self, ctx: RenderContext<'_>) -> Selection {
        self.selected = true;
        self.apply_color(ctx);
        self.selection()
    }

    fn deselect(&mut self, ctx: RenderContext<'_>) -> Selection {
        self.selected = false;
        self.apply_color(ctx);
        Selection::Empty
    }
}

/// Exported node: identity, metadata and where it currently sits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedNode {
    pub id: NodeId,
    pub meta: Meta,
    pub latlng: LatLng,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedEdge {
    pub from_node_id: NodeId,
    pub to_node_id: NodeId,
    pub meta: Meta,
}

/// Read-only snapshot of the live graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<ExportedNode>,
    pub edges: Vec<ExportedEdge>,
}

impl GraphExport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Owner of the live node and edge collections.
///
/// Elements are created detached (`create_node`/`create_edge`) and only become
/// visible through `add_node`/`add_edge`, so an action can hold them before
/// committing. Enumeration follows creation order.
pub struct GraphStore {
    nodes: BTreeMap<u64, Node>,
    edges: BTreeMap<u64, Edge>,
    node_stamps: HashMap<NodeId, u64>,
    edge_stamps: HashMap<EdgeId, u64>,
    next_stamp: u64,
    /// Last positions of removed nodes, restored when they are re-added.
    detached_positions: HashMap<NodeId, LatLng>,
    style: MapStyle,
    surface: Option<Box<dyn MapSurface>>,
    zoom: u8,
}

impl GraphStore {
    pub fn new(style: MapStyle) -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            node_stamps: HashMap::new(),
            edge_stamps: HashMap::new(),
            next_stamp: 0,
            detached_positions: HashMap::new(),
            style,
            surface: None,
            zoom: FALLBACK_ZOOM,
        }
    }

    fn stamp(&mut self) -> u64 {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        stamp
    }

    /// Allocate a node with a fresh id. The node is not added.
    pub fn create_node(&mut self, position: LatLng) -> Node {
        Node {
            id: NodeId::new(),
            position,
            meta: Meta::new(),
            stamp: self.stamp(),
            selected: false,
            icon: None,
        }
    }

    /// Allocate an edge between two nodes. The edge is not added.
    pub fn create_edge(&mut self, from: &Node, to: &Node) -> Edge {
        let path = [self.resolved_position(from), self.resolved_position(to)];
        Edge {
            id: EdgeId::new(from.id, to.id),
            path,
            meta: Meta::new(),
            stamp: self.stamp(),
            selected: false,
            color: None,
        }
    }

    /// Make a node visible. It enters with the default emphasis; only
    /// `select` grants the active one.
    pub fn add_node(&mut self, mut node: Node) {
        node.selected = false;
        if let Some(position) = self.detached_positions.remove(&node.id) {
            node.position = position;
        }
        let icon = self.style.icons.for_state(false, self.zoom);
        if let Some(surface) = self.surface.as_mut() {
            surface.add_marker(node.id, node.position, &icon);
        }
        node.icon = Some(icon);
        self.node_stamps.insert(node.id, node.stamp);
        self.nodes.insert(node.stamp, node);
    }

    /// Detach a node. Removing a node that is not live returns `None`; callers
    /// must not rely on that.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let Some(stamp) = self.node_stamps.remove(&id) else {
            warn!("Removing node {id} which is not in the graph");
            return None;
        };
        let node = self.nodes.remove(&stamp)?;
        let position = self.resolved_position(&node);
        self.detached_positions.insert(id, position);
        if let Some(surface) = self.surface.as_mut() {
            surface.remove_marker(id);
        }
        Some(node)
    }

    /// Forget the last position of every detached node `keep` rejects.
    ///
    /// Call this when history entries are discarded, so positions of nodes
    /// that can no longer come back are dropped.
    pub fn retain_detached_positions(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.detached_positions.retain(|id, _| keep(*id));
    }

    /// Number of detached nodes whose last position is remembered.
    pub fn detached_count(&self) -> usize {
        self.detached_positions.len()
    }

    pub fn add_edge(&mut self, mut edge: Edge) {
        edge.selected = false;
        let color = self.style.edge_color.clone();
        if let Some(surface) = self.surface.as_mut() {
            surface.add_polyline(edge.id, edge.path, &color);
        }
        edge.color = Some(color);
        self.edge_stamps.insert(edge.id, edge.stamp);
        self.edges.insert(edge.stamp, edge);
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let Some(stamp) = self.edge_stamps.remove(&id) else {
            warn!("Removing edge {id} which is not in the graph");
            return None;
        };
        if let Some(surface) = self.surface.as_mut() {
            surface.remove_polyline(id);
        }
        self.edges.remove(&stamp)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_stamps
            .get(&id)
            .and_then(|stamp| self.nodes.get(stamp))
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_stamps
            .get(&id)
            .and_then(|stamp| self.edges.get(stamp))
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_stamps.contains_key(&id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edge_stamps.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// All live edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    /// Every live edge with `node` as either endpoint.
    pub fn edges_touching(&self, node: NodeId) -> Vec<&Edge> {
        self.edges
            .values()
            .filter(|edge| edge.id.touches(node))
            .collect()
    }

    /// Position of a node as drawn, falling back to where it was placed.
    pub fn resolved_position(&self, node: &Node) -> LatLng {
        self.surface
            .as_ref()
            .and_then(|surface| surface.marker_position(node.id))
            .unwrap_or(node.position)
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn style(&self) -> &MapStyle {
        &self.style
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Attach a surface and draw every live element on it, edges first.
    pub fn mount(&mut self, mut surface: Box<dyn MapSurface>) {
        self.zoom = surface.zoom();
        for edge in self.edges.values_mut() {
            let color = self.style.edge_color_for(edge.selected);
            surface.add_polyline(edge.id, edge.path, color);
            edge.color = Some(color.to_string());
        }
        for node in self.nodes.values_mut() {
            let icon = self.style.icons.for_state(node.selected, self.zoom);
            surface.add_marker(node.id, node.position, &icon);
            node.icon = Some(icon);
        }
        self.surface = Some(surface);
    }

    /// Detach the surface. Elements keep their state, and nodes keep the
    /// position they were last drawn at.
    pub fn unmount(&mut self) -> Option<Box<dyn MapSurface>> {
        let surface = self.surface.take()?;
        for node in self.nodes.values_mut() {
            if let Some(position) = surface.marker_position(node.id) {
                node.position = position;
            }
        }
        Some(surface)
    }

    pub fn resize(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.invalidate_size();
        }
    }

    /// Re-resolve every node icon at a new zoom level.
    pub fn update_zoom(&mut self, zoom: u8) {
        trace!("Zoom changed to {zoom}");
        self.zoom = zoom;
        let Self {
            nodes,
            style,
            surface,
            ..
        } = self;
        for node in nodes.values_mut() {
            node.update_zoom(RenderContext {
                style,
                zoom,
                surface: surface.as_mut(),
            });
        }
    }

    /// Move the selection to `target`, deselecting the current occupant first.
    ///
    /// A target that is not live leaves the selection unchanged.
    pub fn select(&mut self, current: Selection, target: Selection) -> Selection {
        if target.is_empty() {
            return self.deselect(current);
        }
        let present = match target {
            Selection::Node(id) => self.contains_node(id),
            Selection::Edge(id) => self.contains_edge(id),
            Selection::Empty => false,
        };
        if !present {
            warn!("Ignoring selection of {target:?} which is not in the graph");
            return current;
        }

        self.deselect(current);
        trace!("Selecting {target:?}");
        let zoom = self.zoom;
        let Self {
            nodes,
            edges,
            node_stamps,
            edge_stamps,
            style,
            surface,
            ..
        } = self;
        let ctx = RenderContext {
            style,
            zoom,
            surface: surface.as_mut(),
        };
        let element: Option<&mut dyn Selectable> = match target {
            Selection::Node(id) => node_stamps
                .get(&id)
                .and_then(|stamp| nodes.get_mut(stamp))
                .map(|node| node as &mut dyn Selectable),
            Selection::Edge(id) => edge_stamps
                .get(&id)
                .and_then(|stamp| edges.get_mut(stamp))
                .map(|edge| edge as &mut dyn Selectable),
            Selection::Empty => None,
        };
        element.map_or(current, |element| element.select(ctx))
    }

    /// Drop the highlight of whatever `current` names and return the empty
    /// selection. An element that already left the graph is skipped.
    pub fn deselect(&mut self, current: Selection) -> Selection {
        if current.is_empty() {
            return Selection::Empty;
        }
        trace!("Deselecting {current:?}");
        let zoom = self.zoom;
        let Self {
            nodes,
            edges,
            node_stamps,
            edge_stamps,
            style,
            surface,
            ..
        } = self;
        let ctx = RenderContext {
            style,
            zoom,
            surface: surface.as_mut(),
        };
        match current {
            Selection::Node(id) => {
                if let Some(node) = node_stamps.get(&id).and_then(|stamp| nodes.get_mut(stamp)) {
                    node.deselect(ctx);
                }
            },
            Selection::Edge(id) => {
                if let Some(edge) = edge_stamps.get(&id).and_then(|stamp| edges.get_mut(stamp)) {
                    edge.deselect(ctx);
                }
            },
            Selection::Empty => {},
        }
        Selection::Empty
    }

    /// Every live element currently reporting itself selected.
    pub fn selected_elements(&self) -> Vec<Selection> {
        let nodes = self
            .nodes
            .values()
            .filter(|node| node.selected)
            .map(Selectable::selection);
        let edges = self
            .edges
            .values()
            .filter(|edge| edge.selected)
            .map(Selectable::selection);
        nodes.chain(edges).collect()
    }

    /// Whether exactly the element named by `selection` (or nothing, for an
    /// empty slot) reports itself selected.
    pub fn selection_consistent(&self, selection: Selection) -> bool {
        let selected = self.selected_elements();
        match selection {
            Selection::Empty => selected.is_empty(),
            other => selected == [other],
        }
    }

    /// Snapshot of the live graph for downstream consumers.
    pub fn export(&self) -> GraphExport {
        GraphExport {
            nodes: self
                .nodes
                .values()
                .map(|node| ExportedNode {
                    id: node.id,
                    meta: node.meta.clone(),
                    latlng: self.resolved_position(node),
                })
                .collect(),
            edges: self
                .edges
                .values()
                .map(|edge| ExportedEdge {
                    from_node_id: edge.id.from_node_id,
                    to_node_id: edge.id.to_node_id,
                    meta: edge.meta.clone(),
                })
                .collect(),
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(MapStyle::default())
    }
}

impl fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("mounted", &self.surface.is_some())
            .field("zoom", &self.zoom)
            .finish()
    }
}
