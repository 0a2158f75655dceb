//! Scroll lock
//!
//! The page body is pinned with `position: fixed` at the negative of the
//! current scroll offset, so content stays where it was. Right padding equal
//! to the scrollbar width keeps the layout from shifting sideways when the
//! scrollbar disappears.

use crate::dom::{Document, StyleTarget};

const SCROLL_BEHAVIOR: &str = "scroll-behavior";

/// Tracks whether the page is locked and which body properties the lock set
#[derive(Debug, Default)]
pub struct ScrollLock {
    locked: bool,
    saved_offset: f64,
    applied: Vec<&'static str>,
}

impl ScrollLock {
    /// New, unlocked
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether scrolling is currently suppressed
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Offset that will be restored on unlock
    #[inline]
    #[must_use]
    pub fn saved_offset(&self) -> f64 {
        self.saved_offset
    }

    /// Pin the page at its current offset. No-op when already locked.
    pub(crate) fn lock<D: Document>(&mut self, doc: &mut D) {
        if self.locked {
            return;
        }

        self.saved_offset = doc.scroll_y();
        let gutter = doc.scrollbar_width();

        let mut props: Vec<(&'static str, String)> = vec![
            ("position", "fixed".to_string()),
            ("top", format!("-{}px", self.saved_offset)),
            ("width", "100%".to_string()),
        ];
        if gutter > 0.0 {
            props.push(("padding-right", format!("{gutter}px")));
        }

        for (property, value) in props {
            doc.set_style(&StyleTarget::Body, property, &value);
            self.applied.push(property);
        }

        self.locked = true;
        tracing::trace!(offset = self.saved_offset, gutter, "scroll locked");
    }

    /// Undo exactly what [`lock`](Self::lock) applied and jump back to the
    /// saved offset. No-op when not locked.
    ///
    /// Smooth scrolling is forced off around the jump so the restore is
    /// instantaneous.
    pub(crate) fn unlock<D: Document>(&mut self, doc: &mut D) {
        if !self.locked {
            return;
        }

        doc.set_style(&StyleTarget::Root, SCROLL_BEHAVIOR, "auto");
        for property in self.applied.drain(..) {
            doc.remove_style(&StyleTarget::Body, property);
        }
        doc.scroll_to(self.saved_offset);
        doc.remove_style(&StyleTarget::Root, SCROLL_BEHAVIOR);

        self.locked = false;
        tracing::trace!(offset = self.saved_offset, "scroll unlocked");
    }
}
