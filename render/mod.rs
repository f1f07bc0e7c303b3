/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Boundary to the map rendering surface.
//!
//! The editor never draws. It issues add/remove/restyle calls through
//! [`MapSurface`] and receives coordinates and zoom levels back from the host.

use std::sync::Arc;

use crate::config::EditorConfig;
use crate::geo::LatLng;
use crate::graph::{EdgeId, NodeId};

pub mod headless;
pub mod icons;

pub use headless::{HeadlessScene, HeadlessSurface};
pub use icons::{MarkerIcon, MarkerIcons, MemoMap};

/// Zoom assumed for icon resolution while no surface is mounted.
pub const FALLBACK_ZOOM: u8 = 1;

/// Primitive visual operations offered by a map widget.
pub trait MapSurface {
    /// Current integer zoom level of the map.
    fn zoom(&self) -> u8;

    fn set_view(&mut self, center: LatLng, zoom: u8);

    fn add_tile_layer(&mut self, url_template: &str, max_zoom: u8);

    fn add_marker(&mut self, id: NodeId, position: LatLng, icon: &Arc<MarkerIcon>);

    fn remove_marker(&mut self, id: NodeId);

    fn set_marker_icon(&mut self, id: NodeId, icon: &Arc<MarkerIcon>);

    /// Where the marker is drawn right now, if the surface knows it.
    ///
    /// Markers may be dragged on the surface, so this can differ from the
    /// position a node was created with.
    fn marker_position(&self, id: NodeId) -> Option<LatLng>;

    fn add_polyline(&mut self, id: EdgeId, path: [LatLng; 2], color: &str);

    fn remove_polyline(&mut self, id: EdgeId);

    fn set_polyline_color(&mut self, id: EdgeId, color: &str);

    /// The container changed size.
    fn invalidate_size(&mut self) {}
}

/// Visual emphasis resources shared by every element of one map.
#[derive(Debug)]
pub struct MapStyle {
    pub icons: MarkerIcons,
    pub edge_color: String,
    pub edge_active_color: String,
}

impl MapStyle {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            icons: MarkerIcons::new(
                config.node_icon_url.clone(),
                config.node_active_icon_url.clone(),
            ),
            edge_color: config.edge_color.clone(),
            edge_active_color: config.edge_active_color.clone(),
        }
    }

    pub fn edge_color_for(&self, selected: bool) -> &str {
        if selected {
            &self.edge_active_color
        } else {
            &self.edge_color
        }
    }
}

impl Default for MapStyle {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

/// What an element needs in order to restyle itself.
///
/// `surface` is `None` while the map is unmounted; elements then only update
/// their own state.
pub struct RenderContext<'a> {
    pub style: &'a MapStyle,
    pub zoom: u8,
    pub surface: Option<&'a mut Box<dyn MapSurface>>,
}
