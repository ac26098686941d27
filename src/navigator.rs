//! Top-level screen navigation.
//!
//! A three-state machine: Hero -> Map -> Detail -> Map. The navigator owns the
//! focused reserve id and resolves it through the catalog on demand, so a
//! detail view can never hold a stale copy of a record.

use std::fmt;

use crate::catalog::Catalog;
use crate::logging::{self, Component};
use crate::model::Reserve;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Hero,
    Map,
    Detail,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewState::Hero => write!(f, "HERO"),
            ViewState::Map => write!(f, "MAP"),
            ViewState::Detail => write!(f, "DETAIL"),
        }
    }
}

/// Screen state plus the focused reserve.
///
/// Invariant: `focus` is `Some` exactly when `current == Detail`. Every
/// transition method returns `true` if it fired and `false` if it was a
/// no-op from the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: ViewState,
    focus: Option<String>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: ViewState::Hero,
            focus: None,
        }
    }

    pub fn current(&self) -> ViewState {
        self.current
    }

    pub fn focus_id(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    /// Resolves the focused id through `catalog`.
    pub fn focused<'c>(&self, catalog: &'c Catalog) -> Option<&'c Reserve> {
        self.focus.as_deref().and_then(|id| catalog.find(id))
    }

    /// Hero -> Map.
    pub fn start(&mut self) -> bool {
        if self.current != ViewState::Hero {
            return self.rejected("start");
        }
        self.current = ViewState::Map;
        logging::debug(Component::Navigator, None, "HERO -> MAP");
        true
    }

    /// Map -> Detail with `reserve_id` in focus. Catalog membership is the
    /// caller's responsibility.
    pub fn select(&mut self, reserve_id: &str) -> bool {
        if self.current != ViewState::Map {
            return self.rejected("select");
        }
        self.current = ViewState::Detail;
        self.focus = Some(reserve_id.to_string());
        logging::debug(Component::Navigator, Some(reserve_id), "MAP -> DETAIL");
        true
    }

    /// Detail -> Map, clearing focus.
    pub fn back(&mut self) -> bool {
        if self.current != ViewState::Detail {
            return self.rejected("back");
        }
        let previous = self.focus.take();
        self.current = ViewState::Map;
        logging::debug(Component::Navigator, previous.as_deref(), "DETAIL -> MAP");
        true
    }

    fn rejected(&self, transition: &str) -> bool {
        logging::debug(
            Component::Navigator,
            None,
            &format!("ignored '{}' from {}", transition, self.current),
        );
        false
    }

    /// Holds for every reachable state.
    pub fn invariant_holds(&self) -> bool {
        self.focus.is_some() == (self.current == ViewState::Detail)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
