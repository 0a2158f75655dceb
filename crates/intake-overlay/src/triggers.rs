//! Trigger table
//!
//! Raw UI events are classified into exactly one [`TriggerRole`] first, then
//! routed through a table of handlers registered once at startup. Because
//! classification does not depend on registration order, a click can never
//! both open and close an overlay.

use crate::content::ContentRequest;
use crate::controller::OverlayController;
use crate::dom::{Document, ElementId};
use crate::focus::TabOutcome;
use std::collections::HashMap;

/// Attribute naming the overlay an element opens
pub const OPEN_ATTR: &str = "data-open-overlay";

/// Attribute selecting the document the viewer loads
pub const CONTENT_ATTR: &str = "data-file";

/// Attribute marking dismiss controls
pub const CLOSE_ATTR: &str = "data-close-overlay";

/// Keys the overlay layer reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    Other(String),
}

/// Input delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Pointer click on `target`
    Click { target: ElementId },
    /// Key press
    KeyDown { key: Key, shift: bool },
    /// Visual viewport resized or scrolled
    ViewportChanged,
}

/// What a classified event means to the overlay layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerRole {
    /// Click on the active overlay's own root
    Backdrop,
    /// Click on or inside an open trigger
    Open,
    /// Click on or inside a dismiss control
    Close,
    /// Escape key
    Escape,
    /// Tab / Shift+Tab
    Tab,
    /// Viewport change
    Viewport,
}

/// Classified event passed to a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    pub role: TriggerRole,
    /// Element carrying the trigger (click target or matching ancestor)
    pub element: Option<ElementId>,
    /// Overlay named by an open trigger
    pub target: Option<String>,
    /// Document named by an open trigger
    pub content_type: Option<String>,
    pub shift: bool,
}

impl TriggerMatch {
    fn bare(role: TriggerRole) -> Self {
        Self {
            role,
            element: None,
            target: None,
            content_type: None,
            shift: false,
        }
    }
}

/// Result of dispatching one event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// The host must suppress the event's default action
    pub prevent_default: bool,
    /// Document load to perform, if the event opened the viewer
    pub content: Option<ContentRequest>,
}

impl Dispatch {
    fn prevented() -> Self {
        Self {
            prevent_default: true,
            content: None,
        }
    }
}

/// Handler signature
pub type Handler<D> = fn(&mut OverlayController<D>, &TriggerMatch) -> Dispatch;

/// Role to handler mapping
pub struct TriggerTable<D: Document> {
    handlers: HashMap<TriggerRole, Handler<D>>,
}

impl<D: Document> std::fmt::Debug for TriggerTable<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerTable")
            .field("roles", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<D: Document> Default for TriggerTable<D> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<D: Document> TriggerTable<D> {
    /// Empty table; unregistered roles are ignored
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Table with the standard overlay behavior for every role
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.register(TriggerRole::Backdrop, close_top);
        table.register(TriggerRole::Close, close_top);
        table.register(TriggerRole::Escape, close_top);
        table.register(TriggerRole::Open, open_target);
        table.register(TriggerRole::Tab, trap_tab);
        table.register(TriggerRole::Viewport, sync_viewport);
        table
    }

    /// Register (or replace) the handler for a role. Returns the previous
    /// handler, if any.
    pub fn register(&mut self, role: TriggerRole, handler: Handler<D>) -> Option<Handler<D>> {
        self.handlers.insert(role, handler)
    }

    /// Whether a handler is registered for `role`
    #[must_use]
    pub fn handles(&self, role: TriggerRole) -> bool {
        self.handlers.contains_key(&role)
    }

    /// Classify an event and run its handler
    pub fn dispatch(&self, overlays: &mut OverlayController<D>, event: &UiEvent) -> Dispatch {
        let Some(matched) = classify(overlays, event) else {
            return Dispatch::default();
        };
        match self.handlers.get(&matched.role) {
            Some(handler) => handler(overlays, &matched),
            None => Dispatch::default(),
        }
    }
}

/// Map an event to at most one role
#[must_use]
pub fn classify<D: Document>(overlays: &OverlayController<D>, event: &UiEvent) -> Option<TriggerMatch> {
    match event {
        UiEvent::Click { target } => classify_click(overlays, target),
        UiEvent::KeyDown { key: Key::Escape, .. } => overlays
            .top()
            .is_some()
            .then(|| TriggerMatch::bare(TriggerRole::Escape)),
        UiEvent::KeyDown { key: Key::Tab, shift } => overlays.top().is_some().then(|| TriggerMatch {
            shift: *shift,
            ..TriggerMatch::bare(TriggerRole::Tab)
        }),
        UiEvent::KeyDown { key: Key::Other(_), .. } => None,
        UiEvent::ViewportChanged => Some(TriggerMatch::bare(TriggerRole::Viewport)),
    }
}

fn classify_click<D: Document>(
    overlays: &OverlayController<D>,
    target: &ElementId,
) -> Option<TriggerMatch> {
    if overlays.top() == Some(target) {
        return Some(TriggerMatch {
            element: Some(target.clone()),
            ..TriggerMatch::bare(TriggerRole::Backdrop)
        });
    }

    let doc = overlays.document();
    if let Some((element, overlay)) = doc.closest_with_attr(target, OPEN_ATTR) {
        let content_type = doc
            .closest_with_attr(&element, CONTENT_ATTR)
            .filter(|(carrier, _)| carrier == &element)
            .map(|(_, file)| file)
            .filter(|file| !file.is_empty());
        return Some(TriggerMatch {
            element: Some(element),
            target: Some(overlay),
            content_type,
            ..TriggerMatch::bare(TriggerRole::Open)
        });
    }

    doc.closest_with_attr(target, CLOSE_ATTR)
        .map(|(element, _)| TriggerMatch {
            element: Some(element),
            ..TriggerMatch::bare(TriggerRole::Close)
        })
}

fn close_top<D: Document>(overlays: &mut OverlayController<D>, _: &TriggerMatch) -> Dispatch {
    overlays.close();
    Dispatch::default()
}

fn open_target<D: Document>(overlays: &mut OverlayController<D>, matched: &TriggerMatch) -> Dispatch {
    let Some(target) = matched.target.as_deref() else {
        return Dispatch::prevented();
    };
    match overlays.open(target, matched.content_type.as_deref()) {
        Ok(content) => Dispatch {
            prevent_default: true,
            content,
        },
        Err(err) => {
            tracing::debug!(error = %err, "open trigger ignored");
            Dispatch::prevented()
        }
    }
}

fn trap_tab<D: Document>(overlays: &mut OverlayController<D>, matched: &TriggerMatch) -> Dispatch {
    match overlays.handle_tab(matched.shift) {
        TabOutcome::Redirected(_) => Dispatch::prevented(),
        TabOutcome::Default => Dispatch::default(),
    }
}

fn sync_viewport<D: Document>(overlays: &mut OverlayController<D>, _: &TriggerMatch) -> Dispatch {
    overlays.sync_viewport();
    Dispatch::default()
}
