//! Table-of-contents overlay state and anchor navigation.

use crate::viewport::{Anchor, Document, ScrollBehavior, Viewport};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// One menu entry; `id` names an anchor in the document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TocEntry {
    pub id: String,
    pub title: String,
}

impl TocEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
}

impl OverlayState {
    pub fn toggled(self) -> Self {
        match self {
            OverlayState::Closed => OverlayState::Open,
            OverlayState::Open => OverlayState::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, OverlayState::Open)
    }
}

/// What [`TableOfContents::navigate_to`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    /// A scroll was requested and the overlay is now closed.
    Scrolled(Anchor),
    /// No element carries the id; nothing changed.
    MissingTarget,
}

#[derive(Debug, Clone)]
pub struct TableOfContents {
    entries: Vec<TocEntry>,
    overlay: OverlayState,
}

impl TableOfContents {
    /// Keeps the first entry for every id.
    pub fn new(entries: impl IntoIterator<Item = TocEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| {
                let fresh = seen.insert(entry.id.clone());
                if !fresh {
                    warn!(id = %entry.id, title = %entry.title, "Dropping duplicate TOC entry");
                }
                fresh
            })
            .collect();
        Self {
            entries,
            overlay: OverlayState::Closed,
        }
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    pub fn toggle(&mut self) -> OverlayState {
        self.overlay = self.overlay.toggled();
        debug!(overlay = ?self.overlay, "Toggled table of contents");
        self.overlay
    }

    pub fn close(&mut self) {
        if self.overlay.is_open() {
            self.overlay = OverlayState::Closed;
            debug!("Closed table of contents");
        }
    }

    /// Smooth-scrolls to the element named `id` and closes the overlay.
    ///
    /// A missing element is not an error: the overlay stays as it was and no
    /// scroll is requested.
    pub fn navigate_to<V, D>(&mut self, id: &str, viewport: &V, document: &D) -> Navigation
    where
        V: Viewport + ?Sized,
        D: Document + ?Sized,
    {
        let Some(anchor) = document.element_by_id(id) else {
            warn!(id, "Navigation target not found in document");
            return Navigation::MissingTarget;
        };
        viewport.scroll_into_view(&anchor, ScrollBehavior::Smooth);
        self.overlay = OverlayState::Closed;
        debug!(id, top = anchor.top, "Navigated to section");
        Navigation::Scrolled(anchor)
    }
}
