//! Reserve filtering for the map view.
//!
//! Pure functions over the catalog: nothing here holds state or reorders.
//! Region labels may be composite ("تبوك - الجوف - حائل"), so region matching
//! is substring containment rather than equality.

use crate::catalog::Catalog;
use crate::model::{Reserve, ReserveType};

/// Separator between sub-regions in a composite region label.
pub const REGION_DELIMITER: &str = " - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeSelector {
    #[default]
    All,
    Only(ReserveType),
}

impl TypeSelector {
    pub fn matches(&self, reserve: &Reserve) -> bool {
        match self {
            TypeSelector::All => true,
            TypeSelector::Only(t) => reserve.reserve_type == *t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionSelector {
    #[default]
    All,
    Named(String),
}

impl RegionSelector {
    pub fn matches(&self, reserve: &Reserve) -> bool {
        match self {
            RegionSelector::All => true,
            RegionSelector::Named(name) => reserve.region.contains(name.as_str()),
        }
    }
}

/// The pair of selectors the map sidebar exposes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReserveFilter {
    pub type_selector: TypeSelector,
    pub region_selector: RegionSelector,
}

impl ReserveFilter {
    pub fn matches(&self, reserve: &Reserve) -> bool {
        self.type_selector.matches(reserve) && self.region_selector.matches(reserve)
    }

    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Reserve> {
        filter_reserves(catalog, &self.type_selector, &self.region_selector)
    }
}

/// Returns the reserves passing both selectors, in catalog order.
pub fn filter_reserves<'a>(
    catalog: &'a Catalog,
    type_selector: &TypeSelector,
    region_selector: &RegionSelector,
) -> Vec<&'a Reserve> {
    catalog
        .reserves()
        .iter()
        .filter(|r| type_selector.matches(r) && region_selector.matches(r))
        .collect()
}

/// First segment of a region label, e.g. "تبوك" for "تبوك - الجوف - حائل".
pub fn primary_region(region: &str) -> &str {
    region.split(REGION_DELIMITER).next().unwrap_or(region)
}

/// Selectable region names: the first segment of every region label,
/// deduplicated, in first-occurrence order.
pub fn region_options(catalog: &Catalog) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for reserve in catalog.reserves() {
        let primary = primary_region(&reserve.region);
        if !options.iter().any(|o| o == primary) {
            options.push(primary.to_string());
        }
    }
    options
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
