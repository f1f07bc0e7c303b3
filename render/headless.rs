/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! In-memory [`MapSurface`] for hosts without a map widget.
//!
//! The scene lives behind a shared handle so the host (or a test) can inspect
//! it and emulate user-side changes such as zooming or dragging a marker
//! while the surface itself is owned by the graph store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{MapSurface, MarkerIcon};
use crate::geo::LatLng;
use crate::graph::{EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMarker {
    pub position: LatLng,
    pub icon: Arc<MarkerIcon>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessPolyline {
    pub path: [LatLng; 2],
    pub color: String,
}

#[derive(Debug, Default)]
pub struct HeadlessScene {
    pub zoom: u8,
    pub view: Option<(LatLng, u8)>,
    pub tile_layer: Option<(String, u8)>,
    pub markers: HashMap<NodeId, HeadlessMarker>,
    pub polylines: HashMap<EdgeId, HeadlessPolyline>,
    pub resize_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    scene: Arc<Mutex<HeadlessScene>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle onto the scene this surface draws into.
    pub fn scene(&self) -> Arc<Mutex<HeadlessScene>> {
        Arc::clone(&self.scene)
    }

    /// Emulate the user zooming the map. The host still has to forward the
    /// new level to the editor.
    pub fn set_zoom(&self, zoom: u8) {
        self.scene.lock().zoom = zoom;
    }

    /// Emulate the user dragging a marker.
    pub fn move_marker(&self, id: NodeId, position: LatLng) -> bool {
        match self.scene.lock().markers.get_mut(&id) {
            Some(marker) => {
                marker.position = position;
                true
            },
            None => false,
        }
    }
}

impl MapSurface for HeadlessSurface {
    fn zoom(&self) -> u8 {
        self.scene.lock().zoom
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        let mut scene = self.scene.lock();
        scene.view = Some((center, zoom));
        scene.zoom = zoom;
    }

    fn add_tile_layer(&mut self, url_template: &str, max_zoom: u8) {
        self.scene.lock().tile_layer = Some((url_template.to_string(), max_zoom));
    }

    fn add_marker(&mut self, id: NodeId, position: LatLng, icon: &Arc<MarkerIcon>) {
        self.scene.lock().markers.insert(
            id,
            HeadlessMarker {
                position,
                icon: Arc::clone(icon),
            },
        );
    }

    fn remove_marker(&mut self, id: NodeId) {
        self.scene.lock().markers.remove(&id);
    }

    fn set_marker_icon(&mut self, id: NodeId, icon: &Arc<MarkerIcon>) {
        if let Some(marker) = self.scene.lock().markers.get_mut(&id) {
            marker.icon = Arc::clone(icon);
        }
    }

    fn marker_position(&self, id: NodeId) -> Option<LatLng> {
        self.scene.lock().markers.get(&id).map(|marker| marker.position)
    }

    fn add_polyline(&mut self, id: EdgeId, path: [LatLng; 2], color: &str) {
        self.scene.lock().polylines.insert(
            id,
            HeadlessPolyline {
                path,
                color: color.to_string(),
            },
        );
    }

    fn remove_polyline(&mut self, id: EdgeId) {
        self.scene.lock().polylines.remove(&id);
    }

    fn set_polyline_color(&mut self, id: EdgeId, color: &str) {
        if let Some(line) = self.scene.lock().polylines.get_mut(&id) {
            line.color = color.to_string();
        }
    }

    fn invalidate_size(&mut self) {
        self.scene.lock().resize_count += 1;
    }
}
