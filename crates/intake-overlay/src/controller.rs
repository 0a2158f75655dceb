//! Overlay controller
//!
//! Owns the overlay stack and is the only thing allowed to lock scrolling,
//! capture or restore focus, and sync the viewport.
//!
//! # Invariants
//!
//! - `scroll_locked() == !stack().is_empty()` after every operation.
//! - Only the top of the stack is visible; lower entries are hidden and shown
//!   again when they become the top.
//! - An id appears at most once. Opening an id that is already open moves it
//!   to the top.
//! - Each newly shown overlay gets a z-index strictly above every other open
//!   overlay.
//! - Focus captured on the first open is the one restored on the last close.
//!
//! # Failure Modes
//!
//! - `open` / `replace_top` with an unknown id return
//!   [`OverlayError::UnknownOverlay`] and change nothing.
//! - `close` on an empty stack returns `None` and changes nothing.
//! - Content responses whose token was invalidated are dropped.

use crate::content::{label_for, ContentRequest, ContentResponse, ContentToken, LOADING_PLACEHOLDER};
use crate::dom::{Document, ElementId, Slot};
use crate::error::OverlayError;
use crate::focus::{FocusManager, TabOutcome};
use crate::scroll::ScrollLock;
use crate::viewport::ViewportSync;
use std::collections::HashMap;

/// Base z-index for the overlay layer
pub const BASE_OVERLAY_Z: u32 = 1000;

/// Z-index increment between stacked overlays
pub const Z_INCREMENT: u32 = 10;

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Overlay that displays fetched documents
    pub document_viewer: ElementId,
    /// Z-index of the first overlay
    pub base_z: u32,
    /// Z-index step between overlays
    pub z_step: u32,
}

impl OverlayConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With document viewer id
    #[inline]
    #[must_use]
    pub fn with_document_viewer(mut self, id: impl Into<ElementId>) -> Self {
        self.document_viewer = id.into();
        self
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            document_viewer: ElementId::new("readme-overlay"),
            base_z: BASE_OVERLAY_Z,
            z_step: Z_INCREMENT,
        }
    }
}

/// Headless overlay controller over a [`Document`]
#[derive(Debug)]
pub struct OverlayController<D: Document> {
    doc: D,
    config: OverlayConfig,
    /// Bottom to top
    stack: Vec<ElementId>,
    top_z: u32,
    scroll: ScrollLock,
    focus: FocusManager,
    viewport: ViewportSync,
    pending: HashMap<ElementId, ContentToken>,
    next_token: u64,
}

impl<D: Document> OverlayController<D> {
    /// Create controller with default configuration
    #[must_use]
    pub fn new(doc: D) -> Self {
        Self::with_config(doc, OverlayConfig::default())
    }

    /// Create controller with custom configuration
    #[must_use]
    pub fn with_config(doc: D, config: OverlayConfig) -> Self {
        Self {
            top_z: config.base_z,
            doc,
            config,
            stack: Vec::new(),
            scroll: ScrollLock::new(),
            focus: FocusManager::new(),
            viewport: ViewportSync::new(),
            pending: HashMap::new(),
            next_token: 0,
        }
    }

    /// Open an overlay, or bring it to the top if it is already open.
    ///
    /// When `content_type` is given and `id` is the document viewer, the
    /// label and download link are updated, a placeholder is shown, and the
    /// returned [`ContentRequest`] must be resolved by the caller.
    ///
    /// # Errors
    /// [`OverlayError::UnknownOverlay`] when `id` is not in the document.
    pub fn open(
        &mut self,
        id: &str,
        content_type: Option<&str>,
    ) -> Result<Option<ContentRequest>, OverlayError> {
        let id = self.resolve(id)?;

        if self.stack.is_empty() {
            self.focus.capture(&self.doc);
            self.scroll.lock(&mut self.doc);
        }

        self.push(id.clone());
        let request = content_type.and_then(|ct| self.begin_content(&id, ct));
        self.activate(&id);

        tracing::debug!(overlay = %id, depth = self.stack.len(), "overlay opened");
        Ok(request)
    }

    /// Close the top overlay. Returns the closed id, `None` on empty stack.
    pub fn close(&mut self) -> Option<ElementId> {
        let id = self.pop()?;

        match self.stack.last().cloned() {
            None => {
                self.scroll.unlock(&mut self.doc);
                self.viewport.reset(&mut self.doc);
                self.top_z = self.config.base_z;
                self.focus.restore(&mut self.doc);
            }
            Some(top) => {
                self.doc.set_visible(&top, true);
                self.activate(&top);
            }
        }

        tracing::debug!(overlay = %id, depth = self.stack.len(), "overlay closed");
        Some(id)
    }

    /// Close every overlay, top first. Returns how many were closed.
    pub fn close_all(&mut self) -> usize {
        let mut closed = 0;
        while self.close().is_some() {
            closed += 1;
        }
        closed
    }

    /// Swap the top overlay for `id` while keeping the page locked and the
    /// original focus capture intact. Opens normally when nothing is open.
    ///
    /// # Errors
    /// [`OverlayError::UnknownOverlay`] when `id` is not in the document.
    pub fn replace_top(&mut self, id: &str) -> Result<(), OverlayError> {
        let id = self.resolve(id)?;
        if self.stack.is_empty() {
            return self.open(id.as_str(), None).map(|_| ());
        }

        if let Some(previous) = self.pop() {
            tracing::debug!(from = %previous, to = %id, "overlay replaced");
        }
        self.push(id.clone());
        self.activate(&id);
        Ok(())
    }

    /// Close everything, then scroll to an in-page anchor
    ///
    /// # Errors
    /// [`OverlayError::UnknownAnchor`] when the anchor does not exist; the
    /// overlays are closed regardless.
    pub fn navigate_to_anchor(&mut self, anchor: &str) -> Result<(), OverlayError> {
        self.close_all();
        let offset = self
            .doc
            .offset_top(&ElementId::from(anchor))
            .ok_or_else(|| OverlayError::UnknownAnchor(anchor.to_string()))?;
        self.doc.scroll_to(offset);
        Ok(())
    }

    /// Re-fit the active overlay to the visual viewport. No-op (and no
    /// document mutation) when nothing is open.
    pub fn sync_viewport(&mut self) -> bool {
        self.viewport.sync(&mut self.doc, self.stack.last())
    }

    /// Route a Tab press. Default navigation when nothing is open.
    pub fn handle_tab(&mut self, shift: bool) -> TabOutcome {
        match self.stack.last() {
            Some(top) => self.focus.trap_tab(&mut self.doc, top, shift),
            None => TabOutcome::Default,
        }
    }

    /// Render a finished document load. Returns `false` when the token is no
    /// longer current (overlay closed or reloaded) and nothing was written.
    pub fn apply_content(&mut self, response: &ContentResponse) -> bool {
        let Some(overlay) = self
            .pending
            .iter()
            .find(|(_, token)| **token == response.token)
            .map(|(id, _)| id.clone())
        else {
            tracing::debug!(token = response.token.id(), "stale content dropped");
            return false;
        };

        self.pending.remove(&overlay);
        self.doc
            .set_slot_text(&overlay, Slot::Body, &response.display_text());
        true
    }

    /// Whether a content token is still current
    #[must_use]
    pub fn is_pending(&self, token: ContentToken) -> bool {
        self.pending.values().any(|t| *t == token)
    }

    /// Open overlays, bottom to top
    #[inline]
    #[must_use]
    pub fn stack(&self) -> &[ElementId] {
        &self.stack
    }

    /// Active overlay
    #[inline]
    #[must_use]
    pub fn top(&self) -> Option<&ElementId> {
        self.stack.last()
    }

    /// Whether `id` is anywhere in the stack
    #[must_use]
    pub fn is_open(&self, id: &str) -> bool {
        self.stack.iter().any(|open| open.as_str() == id)
    }

    /// Whether page scrolling is suppressed
    #[inline]
    #[must_use]
    pub fn scroll_locked(&self) -> bool {
        self.scroll.is_locked()
    }

    /// Whether the on-screen keyboard was detected
    #[inline]
    #[must_use]
    pub fn keyboard_visible(&self) -> bool {
        self.viewport.keyboard_visible()
    }

    /// Element that will regain focus when the stack empties
    #[inline]
    #[must_use]
    pub fn previous_focus(&self) -> Option<&ElementId> {
        self.focus.previous()
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Underlying document
    #[inline]
    #[must_use]
    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Write text into a named region of an overlay
    ///
    /// # Errors
    /// [`OverlayError::UnknownOverlay`] if `id` is not in the document.
    pub fn set_overlay_text(&mut self, id: &str, slot: Slot, text: &str) -> Result<(), OverlayError> {
        let id = self.resolve(id)?;
        if !self.doc.set_slot_text(&id, slot, text) {
            tracing::debug!(overlay = %id, ?slot, "overlay has no such text slot");
        }
        Ok(())
    }

    fn resolve(&self, id: &str) -> Result<ElementId, OverlayError> {
        let id = ElementId::from(id);
        if self.doc.exists(&id) {
            Ok(id)
        } else {
            tracing::debug!(overlay = %id, "open ignored, no such element");
            Err(OverlayError::UnknownOverlay(id.to_string()))
        }
    }

    /// Put `id` on top, hiding the previous top
    fn push(&mut self, id: ElementId) {
        self.stack.retain(|open| open != &id);
        if let Some(previous) = self.stack.last() {
            self.doc.set_visible(previous, false);
        }
        self.stack.push(id.clone());

        self.top_z += self.config.z_step;
        self.doc.set_visible(&id, true);
        self.doc.set_z_index(&id, self.top_z);
    }

    /// Remove the top, hide it and forget its pending content
    fn pop(&mut self) -> Option<ElementId> {
        let id = self.stack.pop()?;
        self.doc.set_visible(&id, false);
        self.viewport.release(&mut self.doc, &id);
        self.pending.remove(&id);
        Some(id)
    }

    /// Viewport sync then focus, for a freshly exposed top overlay
    fn activate(&mut self, id: &ElementId) {
        self.viewport.sync(&mut self.doc, Some(id));
        self.focus.move_into(&mut self.doc, id);
    }

    fn begin_content(&mut self, id: &ElementId, content_type: &str) -> Option<ContentRequest> {
        if id != &self.config.document_viewer {
            tracing::debug!(overlay = %id, content_type, "content ignored, not the document viewer");
            return None;
        }

        self.doc.set_slot_text(id, Slot::Label, label_for(content_type));
        self.doc.set_download_target(id, content_type);
        self.doc.set_slot_text(id, Slot::Body, LOADING_PLACEHOLDER);

        self.next_token += 1;
        let token = ContentToken(self.next_token);
        self.pending.insert(id.clone(), token);

        Some(ContentRequest {
            token,
            path: content_type.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementKind, ElementSpec, MemoryDocument};
    use pretty_assertions::assert_eq;

    fn page() -> MemoryDocument {
        let mut doc = MemoryDocument::new();
        doc.insert(ElementSpec::new("cta", ElementKind::Button))
            .insert(ElementSpec::overlay("setup-overlay"))
            .insert(ElementSpec::new("name", ElementKind::Input).under("setup-overlay"))
            .insert(ElementSpec::overlay("readme-overlay"))
            .insert(ElementSpec::new("close-doc", ElementKind::Button).under("readme-overlay"))
            .insert(ElementSpec::overlay("success-overlay"))
            .with_slot("readme-overlay", Slot::Label)
            .with_slot("readme-overlay", Slot::Body)
            .with_download_link("readme-overlay");
        doc
    }

    fn ids(ctl: &OverlayController<MemoryDocument>) -> Vec<&str> {
        ctl.stack().iter().map(ElementId::as_str).collect()
    }

    #[test]
    fn overlay_text_written_only_for_known_overlays() {
        let mut ctl = OverlayController::new(page());

        ctl.set_overlay_text("readme-overlay", Slot::Body, "hello").unwrap();
        assert_eq!(ctl.document().slot_text("readme-overlay", Slot::Body), Some("hello"));

        let before = ctl.document().mutations();
        assert_eq!(
            ctl.set_overlay_text("nope", Slot::Body, "hello"),
            Err(OverlayError::UnknownOverlay("nope".into()))
        );
        assert_eq!(ctl.document().mutations(), before);
        assert!(!ctl.scroll_locked());
    }

    #[test]
    fn open_unknown_is_noop() {
        let mut ctl = OverlayController::new(page());
        let err = ctl.open("nope", None).unwrap_err();

        assert_eq!(err, OverlayError::UnknownOverlay("nope".into()));
        assert!(ctl.stack().is_empty());
        assert!(!ctl.scroll_locked());
        assert_eq!(ctl.document().mutations(), 0);
    }

    #[test]
    fn first_open_locks_and_focuses() {
        let mut doc = page();
        doc.focus(&"cta".into());
        let mut ctl = OverlayController::new(doc);

        ctl.open("setup-overlay", None).unwrap();

        assert!(ctl.scroll_locked());
        assert_eq!(ctl.previous_focus().map(ElementId::as_str), Some("cta"));
        assert!(ctl.document().is_visible("setup-overlay"));
        assert_eq!(ctl.document().active_element(), Some("name".into()));
        assert_eq!(ctl.document().z_index("setup-overlay"), Some(1010));
    }

    #[test]
    fn stacking_hides_lower_and_raises_z() {
        let mut ctl = OverlayController::new(page());
        ctl.open("setup-overlay", None).unwrap();
        ctl.open("readme-overlay", None).unwrap();

        assert_eq!(ids(&ctl), vec!["setup-overlay", "readme-overlay"]);
        assert!(!ctl.document().is_visible("setup-overlay"));
        assert!(ctl.document().is_visible("readme-overlay"));
        assert!(ctl.document().z_index("readme-overlay") > ctl.document().z_index("setup-overlay"));
    }

    #[test]
    fn reopen_moves_to_top_without_duplicates() {
        let mut ctl = OverlayController::new(page());
        ctl.open("setup-overlay", None).unwrap();
        ctl.open("readme-overlay", None).unwrap();
        ctl.open("setup-overlay", None).unwrap();

        assert_eq!(ids(&ctl), vec!["readme-overlay", "setup-overlay"]);
        assert!(ctl.document().z_index("setup-overlay") > ctl.document().z_index("readme-overlay"));

        ctl.open("setup-overlay", None).unwrap();
        assert_eq!(ids(&ctl), vec!["readme-overlay", "setup-overlay"]);
    }

    #[test]
    fn close_reveals_previous_and_refocuses() {
        let mut ctl = OverlayController::new(page());
        ctl.open("setup-overlay", None).unwrap();
        ctl.open("readme-overlay", None).unwrap();

        assert_eq!(ctl.close().map(|id| id.to_string()), Some("readme-overlay".into()));
        assert!(ctl.document().is_visible("setup-overlay"));
        assert!(!ctl.document().is_visible("readme-overlay"));
        assert_eq!(ctl.document().active_element(), Some("name".into()));
        assert!(ctl.scroll_locked());
    }

    #[test]
    fn last_close_unlocks_and_restores_focus() {
        let mut doc = page();
        doc.focus(&"cta".into());
        let mut ctl = OverlayController::new(doc);
        ctl.open("setup-overlay", None).unwrap();
        ctl.open("readme-overlay", None).unwrap();

        assert_eq!(ctl.close_all(), 2);
        assert!(!ctl.scroll_locked());
        assert_eq!(ctl.document().active_element(), Some("cta".into()));
        assert_eq!(ctl.previous_focus(), None);
    }

    #[test]
    fn close_on_empty_is_noop() {
        let mut ctl = OverlayController::new(page());
        assert_eq!(ctl.close(), None);
        assert_eq!(ctl.close_all(), 0);
        assert_eq!(ctl.document().mutations(), 0);
    }

    #[test]
    fn document_viewer_gets_label_and_placeholder() {
        let mut ctl = OverlayController::new(page());
        let request = ctl
            .open("readme-overlay", Some("ads-privacy-policy.md"))
            .unwrap()
            .unwrap();

        assert_eq!(request.path, "ads-privacy-policy.md");
        assert!(ctl.is_pending(request.token));
        let doc = ctl.document();
        assert_eq!(doc.slot_text("readme-overlay", Slot::Label), Some("PRIVACY POLICY"));
        assert_eq!(doc.slot_text("readme-overlay", Slot::Body), Some(LOADING_PLACEHOLDER));
        assert_eq!(doc.download_target("readme-overlay"), Some("ads-privacy-policy.md"));
    }

    #[test]
    fn content_type_ignored_for_other_overlays() {
        let mut ctl = OverlayController::new(page());
        let request = ctl.open("setup-overlay", Some("ads-privacy-policy.md")).unwrap();
        assert_eq!(request, None);
    }

    #[test]
    fn stale_content_dropped_after_close() {
        let mut ctl = OverlayController::new(page());
        let request = ctl.open("readme-overlay", Some("a.md")).unwrap().unwrap();
        ctl.close();

        let response = ContentResponse {
            token: request.token,
            path: request.path,
            result: Ok("late".into()),
        };
        assert!(!ctl.apply_content(&response));
        assert_eq!(
            ctl.document().slot_text("readme-overlay", Slot::Body),
            Some(LOADING_PLACEHOLDER)
        );
    }

    #[test]
    fn reload_supersedes_earlier_token() {
        let mut ctl = OverlayController::new(page());
        let first = ctl.open("readme-overlay", Some("a.md")).unwrap().unwrap();
        let second = ctl.open("readme-overlay", Some("b.md")).unwrap().unwrap();

        assert!(!ctl.is_pending(first.token));
        assert!(ctl.is_pending(second.token));

        let response = ContentResponse {
            token: second.token,
            path: second.path,
            result: Ok("  B  ".into()),
        };
        assert!(ctl.apply_content(&response));
        assert_eq!(ctl.document().slot_text("readme-overlay", Slot::Body), Some("B"));
        assert!(!ctl.is_pending(second.token));
    }

    #[test]
    fn replace_top_keeps_lock_untouched() {
        let mut doc = page();
        doc.focus(&"cta".into());
        doc.set_scroll_y(300.0);
        let mut ctl = OverlayController::new(doc);
        ctl.open("setup-overlay", None).unwrap();

        ctl.replace_top("success-overlay").unwrap();

        assert_eq!(ids(&ctl), vec!["success-overlay"]);
        assert!(ctl.scroll_locked());
        assert!(ctl.document().scroll_log().is_empty(), "no unlock in between");
        assert!(!ctl.document().is_visible("setup-overlay"));
        assert_eq!(ctl.previous_focus().map(ElementId::as_str), Some("cta"));
        assert_eq!(ctl.document().active_element(), Some("success-overlay".into()));
    }

    #[test]
    fn navigate_closes_then_scrolls() {
        let mut doc = page();
        doc.insert(ElementSpec::new("pricing", ElementKind::Generic).at_offset(1800.0));
        let mut ctl = OverlayController::new(doc);
        ctl.open("setup-overlay", None).unwrap();

        ctl.navigate_to_anchor("pricing").unwrap();

        assert!(ctl.stack().is_empty());
        assert_eq!(ctl.document().scroll_y(), 1800.0);
        assert_eq!(
            ctl.navigate_to_anchor("missing"),
            Err(OverlayError::UnknownAnchor("missing".into()))
        );
    }

    #[test]
    fn sync_viewport_on_empty_stack_is_noop() {
        let mut ctl = OverlayController::new(page());
        assert!(!ctl.sync_viewport());
        assert_eq!(ctl.document().mutations(), 0);
    }
}
