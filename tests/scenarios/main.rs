/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::Arc;

use mapgraph::config::EditorConfig;
use mapgraph::events::{EditorEvent, HistoryStack};
use mapgraph::geo::LatLng;
use mapgraph::graph::{EdgeId, NodeId, Selection};
use mapgraph::input::{Modifiers, PointerClick};
use mapgraph::render::{HeadlessScene, HeadlessSurface, MapSurface};
use mapgraph::{EditorIntent, MapEditor, VERSION};
use parking_lot::Mutex;

fn at(lat: f64, lng: f64) -> LatLng {
    LatLng::new(lat, lng)
}

fn mounted_editor(config: EditorConfig) -> (MapEditor, HeadlessSurface, Arc<Mutex<HeadlessScene>>) {
    let surface = HeadlessSurface::new();
    let handle = surface.clone();
    let scene = surface.scene();
    let mut editor = MapEditor::new(config);
    editor.mount(Box::new(surface));
    (editor, handle, scene)
}

fn only_edge(editor: &MapEditor) -> EdgeId {
    let edges: Vec<EdgeId> = editor.graph().edges().map(|edge| edge.id()).collect();
    assert_eq!(edges.len(), 1);
    edges[0]
}

#[test]
fn scenarios_binary_smoke_runs() {
    assert!(!VERSION.is_empty());
}

#[test]
fn click_build_undo_redo_scenario() {
    let mut editor = MapEditor::default();
    editor.handle_click(&PointerClick::on_map(at(0.0, 0.0), Modifiers::CTRL));
    let a = editor.selection().node().unwrap();
    editor.handle_click(&PointerClick::on_map(at(1.0, 1.0), Modifiers::SHIFT));
    let b = editor.selection().node().unwrap();

    assert_ne!(a, b);
    assert_eq!(editor.graph().node_count(), 2);
    assert_eq!(editor.graph().edge_count(), 1);
    assert_eq!(only_edge(&editor), EdgeId::new(a, b));
    assert_eq!(editor.undo_stack_len(), 2);

    assert!(editor.undo());
    assert_eq!(editor.graph().node_count(), 1);
    assert_eq!(editor.graph().edge_count(), 0);
    assert_eq!(editor.selection(), Selection::Empty);
    assert_eq!(editor.undo_stack_len(), 1);
    assert_eq!(editor.redo_stack_len(), 1);

    assert!(editor.redo());
    assert_eq!(editor.graph().node_count(), 2);
    assert_eq!(editor.graph().edge_count(), 1);
    assert_eq!(editor.selection(), Selection::Node(b));
    assert_eq!(editor.undo_stack_len(), 2);
    assert_eq!(editor.redo_stack_len(), 0);
}

#[test]
fn deleting_a_hub_node_is_one_undoable_step() {
    let (mut editor, _handle, scene) = mounted_editor(EditorConfig::default());
    let hub = editor.add_node(at(0.0, 0.0));
    for i in 1..=3 {
        editor.add_node_with_edge(at(f64::from(i), 0.0), hub).unwrap();
    }
    let before = editor.export_graph();
    let depth = editor.undo_stack_len();

    assert!(editor.delete_node(hub));
    assert_eq!(editor.graph().node_count(), 3);
    assert_eq!(editor.graph().edge_count(), 0);
    assert_eq!(editor.undo_stack_len(), depth + 1);
    {
        let scene = scene.lock();
        assert!(!scene.markers.contains_key(&hub));
        assert!(scene.polylines.is_empty());
    }

    assert!(editor.undo());
    assert_eq!(editor.export_graph(), before);
    assert_eq!(editor.selection(), Selection::Node(hub));
    let scene = scene.lock();
    assert_eq!(scene.markers.len(), 4);
    assert_eq!(scene.polylines.len(), 3);
}

#[test]
fn new_edit_discards_redo_history() {
    let mut editor = MapEditor::default();
    editor.add_node(at(0.0, 0.0));
    editor.add_node(at(1.0, 0.0));
    editor.undo();
    assert_eq!(editor.redo_stack_len(), 1);

    editor.add_node(at(2.0, 0.0));
    assert_eq!(editor.redo_stack_len(), 0);
    assert!(!editor.redo());
    assert_eq!(editor.graph().node_count(), 2);
}

#[test]
fn selection_emphasis_is_drawn_on_the_surface() {
    let (mut editor, _handle, scene) = mounted_editor(EditorConfig::default());
    let a = editor.add_node(at(0.0, 0.0));
    let b = editor.add_node(at(1.0, 0.0));
    assert_eq!(scene.lock().markers[&b].icon.url, "crosspoint-red.png");
    assert_eq!(scene.lock().markers[&a].icon.url, "crosspoint-blue.png");

    editor.handle_click(&PointerClick::on_node(a, at(0.0, 0.0), Modifiers::NONE));
    assert_eq!(scene.lock().markers[&a].icon.url, "crosspoint-red.png");
    assert_eq!(scene.lock().markers[&b].icon.url, "crosspoint-blue.png");

    editor.handle_click(&PointerClick::on_node(b, at(1.0, 0.0), Modifiers::SHIFT));
    let ab = EdgeId::new(a, b);
    assert!(editor.graph().contains_edge(ab));
    assert_eq!(editor.selection(), Selection::Node(b));
    assert_eq!(scene.lock().polylines[&ab].color, "#3a8ece");

    editor.handle_click(&PointerClick::on_edge(ab, at(0.5, 0.0), Modifiers::NONE));
    assert_eq!(editor.selection(), Selection::Edge(ab));
    assert_eq!(scene.lock().polylines[&ab].color, "#f00");
    assert_eq!(scene.lock().markers[&b].icon.url, "crosspoint-blue.png");

    editor.handle_click(&PointerClick::on_map(at(5.0, 5.0), Modifiers::NONE));
    assert_eq!(editor.selection(), Selection::Empty);
    assert_eq!(scene.lock().polylines[&ab].color, "#3a8ece");
}

#[test]
fn deleting_a_selected_edge_clears_selection() {
    let mut editor = MapEditor::default();
    let a = editor.add_node(at(0.0, 0.0));
    let b = editor.add_node(at(1.0, 0.0));
    let ab = editor.add_edge(a, b).unwrap();
    assert_eq!(editor.selection(), Selection::Edge(ab));

    editor.apply_intents([EditorIntent::DeleteSelected]);
    assert_eq!(editor.selection(), Selection::Empty);
    assert!(!editor.graph().contains_edge(ab));

    editor.apply_intents([EditorIntent::Undo]);
    assert_eq!(editor.selection(), Selection::Edge(ab));
    assert!(editor.graph().selection_consistent(editor.selection()));
}

#[test]
fn zoom_changes_resize_every_marker_with_shared_icons() {
    let (mut editor, handle, scene) = mounted_editor(EditorConfig::default());
    let a = editor.add_node(at(0.0, 0.0));
    let b = editor.add_node(at(1.0, 0.0));
    let c = editor.add_node(at(2.0, 0.0));
    assert_eq!(scene.lock().markers[&a].icon.size, [4, 4]);

    handle.set_zoom(19);
    editor.apply_intents([EditorIntent::ZoomChanged { zoom: 19 }]);

    let scene = scene.lock();
    assert_eq!(scene.markers[&a].icon.size, [24, 24]);
    assert_eq!(scene.markers[&a].icon.anchor, [12, 12]);
    assert_eq!(scene.markers[&c].icon.url, "crosspoint-red.png");
    assert!(Arc::ptr_eq(&scene.markers[&a].icon, &scene.markers[&b].icon));
    assert!(!Arc::ptr_eq(&scene.markers[&a].icon, &scene.markers[&c].icon));
}

#[test]
fn dragged_markers_feed_new_edges_and_export() {
    let (mut editor, handle, scene) = mounted_editor(EditorConfig::default());
    let a = editor.add_node(at(0.0, 0.0));
    assert!(handle.move_marker(a, at(0.25, 0.25)));

    let b = editor.add_node_with_edge(at(1.0, 1.0), a).unwrap();
    let ab = EdgeId::new(a, b);
    assert_eq!(scene.lock().polylines[&ab].path, [at(0.25, 0.25), at(1.0, 1.0)]);

    let export = editor.export_graph();
    assert_eq!(export.nodes[0].latlng, at(0.25, 0.25));
    let json = export.to_json().unwrap();
    assert!(json.contains("fromNodeId"));
    assert!(json.contains(&a.to_string()));
}

#[test]
fn mounting_after_edits_replays_graph_and_view() {
    let mut editor = MapEditor::default();
    let a = editor.add_node(at(0.0, 0.0));
    let b = editor.add_node_with_edge(at(1.0, 0.0), a).unwrap();

    let surface = HeadlessSurface::new();
    let scene = surface.scene();
    editor.mount(Box::new(surface));
    {
        let scene = scene.lock();
        let config = editor.config();
        assert_eq!(scene.view, Some((config.initial_view, config.initial_zoom)));
        assert_eq!(scene.tile_layer, Some((config.tile_url.clone(), config.max_zoom)));
        assert_eq!(scene.markers.len(), 2);
        assert_eq!(scene.markers[&b].icon.url, "crosspoint-red.png");
        assert_eq!(scene.polylines.len(), 1);
    }

    editor.resize();
    editor.resize();
    assert_eq!(scene.lock().resize_count, 2);

    let surface = editor.unmount().unwrap();
    assert_eq!(surface.zoom(), editor.config().initial_zoom);
    assert!(!editor.graph().is_mounted());
    editor.resize();
    assert!(editor.undo());
    assert_eq!(editor.graph().node_count(), 1);
    assert_eq!(scene.lock().markers.len(), 2);
}

#[test]
fn subscriber_sees_selection_and_history_changes() {
    let mut editor = MapEditor::default();
    let rx = editor.subscribe();
    let a = editor.add_node(at(0.0, 0.0));
    editor.clear_selection();
    editor.clear_selection();
    editor.select(Selection::Node(a));

    let events: Vec<EditorEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            EditorEvent::HistoryDepth {
                stack: HistoryStack::Undo,
                len: 1
            },
            EditorEvent::SelectionChanged(Selection::Node(a)),
            EditorEvent::SelectionChanged(Selection::Empty),
            EditorEvent::SelectionChanged(Selection::Node(a)),
        ]
    );
}

#[test]
fn placement_lock_places_nodes_without_modifiers() {
    let config = EditorConfig {
        history_limit: Some(1),
        ..EditorConfig::default()
    };
    let mut editor = MapEditor::new(config);
    let lock = Modifiers {
        placement_lock: true,
        ..Modifiers::NONE
    };
    editor.handle_click(&PointerClick::on_map(at(0.0, 0.0), lock));
    editor.handle_click(&PointerClick::on_map(at(1.0, 0.0), lock));

    assert_eq!(editor.graph().node_count(), 2);
    assert_eq!(editor.graph().edge_count(), 0);
    assert_eq!(editor.undo_stack_len(), 1);
    assert!(editor.undo());
    assert!(!editor.undo());
    assert_eq!(editor.graph().node_count(), 1);
}

#[test]
fn unknown_targets_leave_the_editor_untouched() {
    let mut editor = MapEditor::default();
    let a = editor.add_node(at(0.0, 0.0));
    let ghost = NodeId::new();

    editor.apply_intents([
        EditorIntent::SelectNode { node: ghost },
        EditorIntent::DeleteNode { node: ghost },
        EditorIntent::AddEdge { from: a, to: ghost },
        EditorIntent::DeleteEdge {
            edge: EdgeId::new(a, ghost),
        },
    ]);

    assert_eq!(editor.selection(), Selection::Node(a));
    assert_eq!(editor.undo_stack_len(), 1);
    assert_eq!(editor.graph().node_count(), 1);
}

#[test]
fn dragged_node_survives_unmount_then_undo_redo() {
    let (mut editor, handle, _scene) = mounted_editor(EditorConfig::default());
    let a = editor.add_node(at(0.0, 0.0));
    let b = editor.add_node_with_edge(at(1.0, 0.0), a).unwrap();
    assert!(handle.move_marker(b, at(3.0, 3.0)));
    editor.unmount();
    let dragged = editor.export_graph();

    assert!(editor.undo());
    assert_eq!(editor.graph().node_count(), 1);
    assert!(editor.redo());
    assert_eq!(editor.export_graph(), dragged);

    let surface = HeadlessSurface::new();
    let scene = surface.scene();
    editor.mount(Box::new(surface));
    assert_eq!(scene.lock().markers[&b].position, at(3.0, 3.0));
}
