//! Visual viewport sync
//!
//! On touch devices the on-screen keyboard shrinks the visual viewport but
//! not the layout viewport. The active overlay is kept glued to the visible
//! region, and descendants get the visible height through a custom property.

use crate::dom::{Document, ElementId, StyleTarget};
use std::collections::HashSet;

/// Height loss (px) beyond which the keyboard is considered open
pub const KEYBOARD_THRESHOLD_PX: f64 = 150.0;

/// Custom property carrying the visible height
pub const VISIBLE_HEIGHT_VAR: &str = "--visible-height";

/// Root class present while the keyboard is open
pub const KEYBOARD_CLASS: &str = "keyboard-open";

/// Keyboard-visibility flag and the sync routine
///
/// Remembers which overlays carry inline geometry so it can be removed again.
#[derive(Debug, Default)]
pub struct ViewportSync {
    keyboard_visible: bool,
    fitted: HashSet<ElementId>,
    root_height_set: bool,
}

impl ViewportSync {
    /// New, keyboard hidden
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the keyboard was detected on the last sync
    #[inline]
    #[must_use]
    pub fn keyboard_visible(&self) -> bool {
        self.keyboard_visible
    }

    /// Fit `active` to the visual viewport.
    ///
    /// Returns `false` without touching the document when there is no active
    /// overlay or the platform has no visual viewport.
    pub(crate) fn sync<D: Document>(&mut self, doc: &mut D, active: Option<&ElementId>) -> bool {
        let Some(active) = active else {
            return false;
        };
        let Some(viewport) = doc.visual_viewport() else {
            return false;
        };

        let container = StyleTarget::Element(active.clone());
        doc.set_style(&container, "top", &format!("{}px", viewport.offset_top));
        doc.set_style(&container, "height", &format!("{}px", viewport.height));
        doc.set_style(
            &StyleTarget::Root,
            VISIBLE_HEIGHT_VAR,
            &format!("{}px", viewport.height),
        );
        self.fitted.insert(active.clone());
        self.root_height_set = true;

        let keyboard = doc.inner_height() - viewport.height > KEYBOARD_THRESHOLD_PX;
        if keyboard != self.keyboard_visible {
            doc.toggle_class(&StyleTarget::Root, KEYBOARD_CLASS, keyboard);
            self.keyboard_visible = keyboard;
            tracing::debug!(overlay = %active, keyboard, "keyboard visibility changed");
        }
        true
    }

    /// Remove the inline `top`/`height` from an overlay leaving the stack
    pub(crate) fn release<D: Document>(&mut self, doc: &mut D, id: &ElementId) {
        if self.fitted.remove(id) {
            let container = StyleTarget::Element(id.clone());
            doc.remove_style(&container, "top");
            doc.remove_style(&container, "height");
        }
    }

    /// Clear root-level state once no overlay is active
    pub(crate) fn reset<D: Document>(&mut self, doc: &mut D) {
        if self.root_height_set {
            doc.remove_style(&StyleTarget::Root, VISIBLE_HEIGHT_VAR);
            self.root_height_set = false;
        }
        if self.keyboard_visible {
            doc.toggle_class(&StyleTarget::Root, KEYBOARD_CLASS, false);
            self.keyboard_visible = false;
        }
    }
}
