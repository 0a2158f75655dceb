//! Intake Overlay - headless modal layer for the setup request flow
//!
//! Runs against any [`Document`] binding and keeps:
//! - A stack of overlays with a single visible, interactive top
//! - The page scroll-locked exactly while something is open
//! - Focus inside the active overlay, restored when the last one closes
//! - The active overlay fitted to the visual viewport (on-screen keyboards)
//! - Document-viewer loads cancellable by closing the overlay
//!
//! # Example
//!
//! ```rust
//! use intake_overlay::dom::{ElementKind, ElementSpec, MemoryDocument};
//! use intake_overlay::{OverlayController, TriggerTable, UiEvent};
//!
//! let mut doc = MemoryDocument::new();
//! doc.insert(ElementSpec::new("cta", ElementKind::Button).attr("data-open-overlay", "setup-overlay"))
//!     .insert(ElementSpec::overlay("setup-overlay"));
//!
//! let mut overlays = OverlayController::new(doc);
//! let triggers = TriggerTable::standard();
//!
//! triggers.dispatch(&mut overlays, &UiEvent::Click { target: "cta".into() });
//! assert!(overlays.scroll_locked());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod content;
pub mod controller;
pub mod dom;
pub mod error;
pub mod focus;
pub mod scroll;
pub mod submission;
pub mod triggers;
pub mod viewport;

pub use content::{
    ContentRequest, ContentResponse, ContentSource, ContentToken, HttpContentSource,
};
pub use controller::{OverlayConfig, OverlayController};
pub use dom::{Document, ElementId, MemoryDocument};
pub use error::{ContentError, OverlayError, SubmitError};
pub use focus::TabOutcome;
pub use submission::{
    FormState, HttpTransport, SubmissionClient, SubmissionState, SubmitTransport,
};
pub use triggers::{Dispatch, Key, TriggerRole, TriggerTable, UiEvent};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for hosting overlays
    pub use crate::{
        ContentSource, Document, ElementId, FormState, OverlayController, SubmissionClient,
        TriggerTable, UiEvent,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
