/// Map view: filter state, markers and tile addressing.
///
/// Tiles come from the public OpenStreetMap tile servers using the standard
/// slippy-map scheme. This module only computes tile coordinates and URLs;
/// it never fetches anything.

use std::f64::consts::PI;

use crate::catalog::Catalog;
use crate::filter::{region_options, RegionSelector, ReserveFilter, TypeSelector};
use crate::model::{Reserve, ReserveType};

// ---------------------------------------------------------------------------
// Tile source
// ---------------------------------------------------------------------------

/// Initial map center (latitude, longitude), roughly the middle of the Kingdom.
pub const DEFAULT_CENTER: (f64, f64) = (23.8859, 45.0792);

pub const DEFAULT_ZOOM: u8 = 5;

pub const TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

pub const TILE_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Web Mercator cannot represent the poles; latitudes are clamped to this.
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// Tile (x, y) containing a WGS84 point at `zoom`.
pub fn tile_for(latitude: f64, longitude: f64, zoom: u8) -> (u32, u32) {
    let n = 2f64.powi(zoom as i32);
    let lat = latitude.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();

    let x = ((longitude + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n).floor();

    let max = n - 1.0;
    (x.clamp(0.0, max) as u32, y.clamp(0.0, max) as u32)
}

/// Concrete tile URL. The subdomain rotates on (x + y) so neighbouring tiles
/// spread across servers.
pub fn tile_url(zoom: u8, x: u32, y: u32) -> String {
    let subdomain = TILE_SUBDOMAINS[((x + y) as usize) % TILE_SUBDOMAINS.len()];
    TILE_URL_TEMPLATE
        .replace("{s}", subdomain)
        .replace("{z}", &zoom.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
}

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

/// What the map needs to draw one reserve pin and its popup.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub reserve_id: String,
    pub position: (f64, f64),
    pub reserve_type: ReserveType,
    pub title: String,
    pub summary: String,
    pub image_url: String,
}

impl Marker {
    pub fn from_reserve(reserve: &Reserve) -> Self {
        Self {
            reserve_id: reserve.id.clone(),
            position: reserve.coordinates,
            reserve_type: reserve.reserve_type,
            title: reserve.name.clone(),
            summary: reserve.short_description.clone(),
            image_url: reserve.image_url.clone(),
        }
    }

    /// Pin colour: purple for royal reserves, emerald for natural ones.
    pub fn color(&self) -> &'static str {
        match self.reserve_type {
            ReserveType::Royal => "purple",
            ReserveType::Natural => "emerald",
        }
    }
}

/// Raised when the user presses "explore" on a marker popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapEvent {
    Selected(String),
}

// ---------------------------------------------------------------------------
// Map view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MapView {
    catalog: Catalog,
    filter: ReserveFilter,
    regions: Vec<String>,
}

impl MapView {
    pub fn new(catalog: Catalog) -> Self {
        let regions = region_options(&catalog);
        Self {
            catalog,
            filter: ReserveFilter::default(),
            regions,
        }
    }

    pub fn filter(&self) -> &ReserveFilter {
        &self.filter
    }

    pub fn set_type(&mut self, selector: TypeSelector) {
        self.filter.type_selector = selector;
    }

    pub fn set_region(&mut self, selector: RegionSelector) {
        self.filter.region_selector = selector;
    }

    /// Options for the region dropdown, excluding the implicit "all regions".
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.filter
            .apply(&self.catalog)
            .into_iter()
            .map(Marker::from_reserve)
            .collect()
    }

    /// Popup "explore" press. Only reserves currently shown can be selected.
    pub fn select(&self, reserve_id: &str) -> Option<MapEvent> {
        self.filter
            .apply(&self.catalog)
            .iter()
            .any(|r| r.id == reserve_id)
            .then(|| MapEvent::Selected(reserve_id.to_string()))
    }
}
