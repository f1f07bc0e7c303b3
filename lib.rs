/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Editable node/edge graph drawn over a slippy map.
//!
//! Nodes are geographic points, edges join two nodes. Every structural edit is
//! a reversible [`history::MapAction`], so the editor keeps full undo/redo.
//! At most one element is selected at a time. Drawing goes through the
//! [`render::MapSurface`] port; [`render::HeadlessSurface`] records the scene
//! in memory for tests and tooling.

pub mod app;
pub mod config;
pub mod events;
pub mod geo;
pub mod graph;
pub mod history;
pub mod input;
pub mod render;

pub use app::{EditorIntent, MapEditor};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
