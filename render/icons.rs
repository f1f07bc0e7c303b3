/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Zoom-dependent marker icons.
//!
//! Icons are memoized per zoom level and per emphasis. Entries are never
//! evicted: the key space is the map's zoom range (0..=19), so growth is
//! bounded by the map itself.

use std::sync::Arc;

use moka::sync::Cache;

/// Highest zoom level the size table distinguishes.
pub const MAX_ICON_ZOOM: u8 = 19;

/// A sized marker icon resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerIcon {
    pub url: String,
    pub size: [u32; 2],
    pub anchor: [u32; 2],
}

/// Edge length in pixels of a marker icon at `zoom`.
///
/// ```text
/// 19 -> 24
/// 18 -> 12
/// 17 -> 6
/// _  -> 4
/// ```
pub fn icon_size_for_zoom(zoom: u8) -> u32 {
    if zoom < 17 {
        return 4;
    }
    3 << (zoom.min(MAX_ICON_ZOOM) - 16)
}

impl MarkerIcon {
    pub fn sized_for_zoom(zoom: u8, url: &str) -> Self {
        let size = icon_size_for_zoom(zoom);
        Self {
            url: url.to_string(),
            size: [size, size],
            anchor: [size >> 1, size >> 1],
        }
    }
}

/// Memoizing map from an input to a derived value.
///
/// The memo key is `key_fn(input)`; the value is produced by `generator` on
/// the first request and the same `Arc` is handed out afterwards.
pub struct MemoMap<K, V> {
    entries: Cache<String, Arc<V>>,
    key_fn: fn(&K) -> String,
    generator: Box<dyn Fn(&K) -> V>,
}

impl<K, V> MemoMap<K, V>
where
    V: Send + Sync + 'static,
{
    pub fn new(key_fn: fn(&K) -> String, generator: impl Fn(&K) -> V + 'static) -> Self {
        Self {
            // No capacity bound: nothing is ever evicted.
            entries: Cache::builder().build(),
            key_fn,
            generator: Box::new(generator),
        }
    }

    pub fn get(&self, input: &K) -> Arc<V> {
        let key = (self.key_fn)(input);
        self.entries
            .get_with(key, || Arc::new((self.generator)(input)))
    }

    /// Whether a value for `input` has already been generated.
    pub fn contains(&self, input: &K) -> bool {
        self.entries.contains_key(&(self.key_fn)(input))
    }
}

impl<K, V> std::fmt::Debug for MemoMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoMap").finish_non_exhaustive()
    }
}

fn zoom_key(zoom: &u8) -> String {
    zoom.to_string()
}

/// Default and active marker icon caches for one map instance.
#[derive(Debug)]
pub struct MarkerIcons {
    default: MemoMap<u8, MarkerIcon>,
    active: MemoMap<u8, MarkerIcon>,
}

impl MarkerIcons {
    pub fn new(default_url: impl Into<String>, active_url: impl Into<String>) -> Self {
        let default_url = default_url.into();
        let active_url = active_url.into();
        Self {
            default: MemoMap::new(zoom_key, move |zoom| {
                MarkerIcon::sized_for_zoom(*zoom, &default_url)
            }),
            active: MemoMap::new(zoom_key, move |zoom| {
                MarkerIcon::sized_for_zoom(*zoom, &active_url)
            }),
        }
    }

    pub fn default_icon(&self, zoom: u8) -> Arc<MarkerIcon> {
        self.default.get(&zoom)
    }

    pub fn active_icon(&self, zoom: u8) -> Arc<MarkerIcon> {
        self.active.get(&zoom)
    }

    /// Icon for a marker in the given selection state.
    pub fn for_state(&self, selected: bool, zoom: u8) -> Arc<MarkerIcon> {
        if selected {
            self.active_icon(zoom)
        } else {
            self.default_icon(zoom)
        }
    }
}
