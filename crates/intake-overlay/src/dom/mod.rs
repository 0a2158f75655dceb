//! Document abstraction
//!
//! The overlay machinery never touches a browser directly. Everything it
//! reads or writes goes through [`Document`], so the same controller can run
//! against a real page binding or the in-memory [`MemoryDocument`].

pub mod memory;

pub use memory::{ElementSpec, MemoryDocument, ScrollRecord};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an element in the document (the DOM `id`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(String);

impl ElementId {
    /// Create new element id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Element category relevant to focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Anchor,
    Button,
    Input,
    TextArea,
    Select,
    /// Any other element (div, section, span, ...)
    Generic,
}

/// Focus-relevant snapshot of one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    pub id: ElementId,
    pub kind: ElementKind,
    pub has_href: bool,
    pub disabled: bool,
    /// Explicit `tabindex` attribute, if any
    pub tab_index: Option<i32>,
}

/// Visible region reported by the platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualViewport {
    pub offset_top: f64,
    pub height: f64,
}

/// Where a style property or class is applied
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StyleTarget {
    /// `<html>`
    Root,
    /// `<body>`
    Body,
    Element(ElementId),
}

/// Named text regions inside an overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// Title shown in the overlay header
    Label,
    /// Main text region (document text, success message)
    Body,
}

/// Everything the overlay controller needs from a page
///
/// Mutating methods are expected to be cheap and synchronous. Lookups of
/// unknown ids return `None`/`false`/empty rather than failing.
pub trait Document {
    /// Whether an element with this id is attached to the document
    fn exists(&self, id: &ElementId) -> bool;

    /// Show or hide an element
    fn set_visible(&mut self, id: &ElementId, visible: bool);

    /// Assign stacking order
    fn set_z_index(&mut self, id: &ElementId, z_index: u32);

    /// All descendants of `id` in document order (excluding `id`)
    fn descendants(&self, id: &ElementId) -> Vec<ElementInfo>;

    /// Currently focused element
    fn active_element(&self) -> Option<ElementId>;

    /// Move focus
    fn focus(&mut self, id: &ElementId);

    /// Set the `tabindex` attribute
    fn set_tab_index(&mut self, id: &ElementId, tab_index: i32);

    /// Nearest element (starting at `from`, walking up) carrying `attr`,
    /// together with the attribute value
    fn closest_with_attr(&self, from: &ElementId, attr: &str) -> Option<(ElementId, String)>;

    /// Vertical page scroll offset in px
    fn scroll_y(&self) -> f64;

    /// Scroll the page to an absolute vertical offset
    fn scroll_to(&mut self, y: f64);

    /// Width of the vertical scrollbar in px (0 for overlay scrollbars)
    fn scrollbar_width(&self) -> f64;

    /// Set an inline style property (including custom properties)
    fn set_style(&mut self, target: &StyleTarget, property: &str, value: &str);

    /// Remove an inline style property
    fn remove_style(&mut self, target: &StyleTarget, property: &str);

    /// Add or remove a class
    fn toggle_class(&mut self, target: &StyleTarget, class: &str, on: bool);

    /// Full layout viewport height (`window.innerHeight`)
    fn inner_height(&self) -> f64;

    /// Visual viewport, when the platform exposes one
    fn visual_viewport(&self) -> Option<VisualViewport>;

    /// Write text into a slot of an overlay; `false` when the overlay has no
    /// such slot
    fn set_slot_text(&mut self, overlay: &ElementId, slot: Slot, text: &str) -> bool;

    /// Point the overlay's download link at `href`; `false` when it has none
    fn set_download_target(&mut self, overlay: &ElementId, href: &str) -> bool;

    /// Absolute vertical offset of an element, for in-page navigation
    fn offset_top(&self, id: &ElementId) -> Option<f64>;
}
