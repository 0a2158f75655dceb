//! Focus management
//!
//! - Remember what had focus before the first overlay opened
//! - Move focus into an overlay when it becomes active
//! - Keep Tab / Shift+Tab cycling inside the active overlay
//! - Hand focus back once the last overlay closes

use crate::dom::{Document, ElementId, ElementInfo, ElementKind};

/// Result of routing a Tab key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabOutcome {
    /// Focus was redirected; the platform's default navigation must be
    /// suppressed
    Redirected(ElementId),
    /// Let the platform move focus normally
    Default,
}

impl TabOutcome {
    /// Whether the caller must call `preventDefault`
    #[inline]
    #[must_use]
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Redirected(_))
    }
}

/// Whether an element takes part in sequential focus navigation
#[must_use]
pub fn is_focusable(info: &ElementInfo) -> bool {
    if matches!(info.tab_index, Some(t) if t < 0) {
        return false;
    }
    match info.kind {
        ElementKind::Anchor => info.has_href || info.tab_index.is_some(),
        ElementKind::Button | ElementKind::Input | ElementKind::TextArea | ElementKind::Select => {
            !info.disabled
        }
        ElementKind::Generic => info.tab_index.is_some(),
    }
}

/// Focusable descendants of `overlay`, in document order
#[must_use]
pub fn focusable_within<D: Document>(doc: &D, overlay: &ElementId) -> Vec<ElementId> {
    doc.descendants(overlay)
        .into_iter()
        .filter(is_focusable)
        .map(|info| info.id)
        .collect()
}

/// Holds the pre-overlay focus target
#[derive(Debug, Default)]
pub struct FocusManager {
    previous: Option<ElementId>,
}

impl FocusManager {
    /// New, nothing captured
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Element that will receive focus when the last overlay closes
    #[inline]
    #[must_use]
    pub fn previous(&self) -> Option<&ElementId> {
        self.previous.as_ref()
    }

    /// Record the focused element. Called only when no overlay is open, so
    /// the capture always refers to page content.
    pub(crate) fn capture<D: Document>(&mut self, doc: &D) {
        self.previous = doc.active_element();
        tracing::trace!(previous = ?self.previous, "focus captured");
    }

    /// Focus the first focusable descendant, or the container itself
    pub(crate) fn move_into<D: Document>(&self, doc: &mut D, overlay: &ElementId) -> ElementId {
        let target = match focusable_within(doc, overlay).into_iter().next() {
            Some(first) => first,
            None => {
                doc.set_tab_index(overlay, -1);
                overlay.clone()
            }
        };
        doc.focus(&target);
        target
    }

    /// Wrap Tab navigation at the ends of the overlay's focusable set
    pub fn trap_tab<D: Document>(&self, doc: &mut D, overlay: &ElementId, shift: bool) -> TabOutcome {
        let focusable = focusable_within(doc, overlay);
        let (Some(first), Some(last)) = (focusable.first(), focusable.last()) else {
            doc.set_tab_index(overlay, -1);
            doc.focus(overlay);
            return TabOutcome::Redirected(overlay.clone());
        };

        let active = doc.active_element();
        let inside = active.as_ref().is_some_and(|a| focusable.contains(a));

        let target = match (shift, inside) {
            (false, false) => first,
            (true, false) => last,
            (false, true) if active.as_ref() == Some(last) => first,
            (true, true) if active.as_ref() == Some(first) => last,
            _ => return TabOutcome::Default,
        };

        let target = target.clone();
        doc.focus(&target);
        TabOutcome::Redirected(target)
    }

    /// Return focus to the captured element if it is still attached.
    /// The capture is consumed either way.
    pub(crate) fn restore<D: Document>(&mut self, doc: &mut D) -> Option<ElementId> {
        let previous = self.previous.take()?;
        if doc.exists(&previous) {
            doc.focus(&previous);
            Some(previous)
        } else {
            tracing::debug!(previous = %previous, "focus target detached, not restoring");
            None
        }
    }
}
