/// Reserve catalog store.
///
/// Holds the canonical list of reserves shown by the map, the detail view and
/// the guide's system instruction. This is the single source of truth for
/// reserve ids: other modules receive a `Catalog` at construction time and
/// look reserves up through it rather than keeping their own copies.
///
/// The catalog is read-only once loaded. Cloning a `Catalog` shares the same
/// underlying records.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::logging::{self, Component};
use crate::model::{CatalogError, Reserve, ReserveType};

/// The built-in catalog document, compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../data/reserves.toml");

/// On-disk layout of a catalog file: a list of `[[reserves]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    reserves: Vec<Reserve>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Catalog {
    reserves: Arc<[Reserve]>,
}

impl Catalog {
    /// Builds a catalog from already-constructed records.
    ///
    /// Rejects an empty list and duplicate ids. Insertion order is kept and is
    /// the order every consumer sees.
    pub fn from_reserves(reserves: Vec<Reserve>) -> Result<Self, CatalogError> {
        if reserves.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for reserve in &reserves {
            if !seen.insert(reserve.id.as_str()) {
                return Err(CatalogError::DuplicateId(reserve.id.clone()));
            }
        }

        Ok(Self {
            reserves: reserves.into(),
        })
    }

    /// Parses a catalog from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        Self::from_reserves(file.reserves)
    }

    /// Loads the catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Loads a catalog file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_toml_str(&text)?;

        logging::info(
            Component::Catalog,
            None,
            &format!("Loaded {} reserves from {}", catalog.len(), path.display()),
        );

        Ok(catalog)
    }

    /// Loads from `path` if given, otherwise the built-in catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    pub fn reserves(&self) -> &[Reserve] {
        &self.reserves
    }

    pub fn len(&self) -> usize {
        self.reserves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reserves.is_empty()
    }

    /// Looks up a reserve by id. Returns `None` if not found.
    pub fn find(&self, id: &str) -> Option<&Reserve> {
        self.reserves.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Reserve names in catalog order, for embedding in the guide's system
    /// instruction.
    pub fn names(&self) -> Vec<&str> {
        self.reserves.iter().map(|r| r.name.as_str()).collect()
    }

    /// Number of reserves of a given category.
    pub fn count_of_type(&self, reserve_type: ReserveType) -> usize {
        self.reserves
            .iter()
            .filter(|r| r.reserve_type == reserve_type)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{Contact, Social, Statistics, Wildlife};

    /// Minimal synthetic reserve for tests that inject their own catalog.
    pub(crate) fn reserve(id: &str, name: &str, reserve_type: ReserveType, region: &str) -> Reserve {
        Reserve {
            id: id.to_string(),
            name: name.to_string(),
            reserve_type,
            region: region.to_string(),
            area: "1 كم²".to_string(),
            established: "2000".to_string(),
            coordinates: (24.0, 45.0),
            description: String::new(),
            short_description: String::new(),
            climate: String::new(),
            wildlife: Wildlife::default(),
            activities: vec![],
            contact: Contact {
                phone: "0".to_string(),
                email: "a@b.c".to_string(),
                social: Social::default(),
            },
            stats: Statistics {
                monthly_visitors: 10,
                yearly_visitors: 120,
                rating: 4.0,
                peak_season: String::new(),
            },
            image_url: "https://example.com/a.jpg".to_string(),
            gallery: vec!["https://example.com/b.jpg".to_string()],
        }
    }

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().expect("embedded catalog should parse");
        assert_eq!(catalog.len(), 6);
    }

    #[test]
    fn test_builtin_catalog_has_both_categories() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.count_of_type(ReserveType::Royal), 3);
        assert_eq!(catalog.count_of_type(ReserveType::Natural), 3);
    }

    #[test]
    fn test_builtin_catalog_keeps_file_order() {
        let catalog = Catalog::builtin().unwrap();
        let ids: Vec<_> = catalog.reserves().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_social_handles_are_optional() {
        let catalog = Catalog::builtin().unwrap();
        let uruq = catalog.find("5").expect("Uruq Bani Ma'arid should be in catalog");
        assert!(uruq.contact.social.twitter.is_none());
        assert_eq!(uruq.contact.social.instagram.as_deref(), Some("uruq_reserve"));
    }

    #[test]
    fn test_find_returns_none_for_unknown_id() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.find("999").is_none());
        assert!(!catalog.contains("999"));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = Catalog::from_reserves(vec![
            reserve("a", "one", ReserveType::Natural, "x"),
            reserve("a", "two", ReserveType::Royal, "y"),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn test_duplicate_names_are_allowed() {
        let result = Catalog::from_reserves(vec![
            reserve("a", "same", ReserveType::Natural, "x"),
            reserve("b", "same", ReserveType::Natural, "x"),
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        assert!(matches!(Catalog::from_reserves(vec![]), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let result = Catalog::from_toml_str("[[reserves]]\nid = 7\n");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_names_follow_catalog_order() {
        let catalog = Catalog::builtin().unwrap();
        let names = catalog.names();
        assert_eq!(names.len(), catalog.len());
        assert_eq!(names[0], "محمية الإمام تركي بن عبدالله الملكية");
    }

    #[test]
    fn test_clones_share_records() {
        let catalog = Catalog::builtin().unwrap();
        let clone = catalog.clone();
        assert!(std::ptr::eq(catalog.reserves(), clone.reserves()));
    }
}
