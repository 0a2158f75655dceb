//! In-memory document
//!
//! A small element tree with just enough state to host overlays headlessly:
//! visibility, z-order, inline styles, classes, focus, scroll position and a
//! visual viewport. Every mutation through [`Document`] bumps a counter so
//! callers can assert that an operation left the page untouched.

use super::{Document, ElementId, ElementInfo, ElementKind, Slot, StyleTarget, VisualViewport};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Description of an element to insert
#[derive(Debug, Clone)]
pub struct ElementSpec {
    id: ElementId,
    kind: ElementKind,
    parent: Option<ElementId>,
    has_href: bool,
    disabled: bool,
    tab_index: Option<i32>,
    attrs: BTreeMap<String, String>,
    offset_top: f64,
    visible: bool,
}

impl ElementSpec {
    /// Create a visible element of `kind`
    #[must_use]
    pub fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            parent: None,
            has_href: false,
            disabled: false,
            tab_index: None,
            attrs: BTreeMap::new(),
            offset_top: 0.0,
            visible: true,
        }
    }

    /// Overlay root: a generic container, hidden until opened
    #[must_use]
    pub fn overlay(id: impl Into<ElementId>) -> Self {
        let mut spec = Self::new(id, ElementKind::Generic);
        spec.visible = false;
        spec
    }

    /// Place under `parent`
    #[must_use]
    pub fn under(mut self, parent: impl Into<ElementId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Anchor with an `href`
    #[must_use]
    pub fn with_href(mut self) -> Self {
        self.has_href = true;
        self
    }

    /// Disabled control
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Explicit `tabindex`
    #[must_use]
    pub fn tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// Arbitrary attribute (e.g. `data-open-overlay`)
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Vertical position on the page
    #[must_use]
    pub fn at_offset(mut self, offset_top: f64) -> Self {
        self.offset_top = offset_top;
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    spec: ElementSpec,
    visible: bool,
    z_index: Option<u32>,
    styles: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    slots: BTreeMap<Slot, String>,
    download: Option<String>,
    has_download: bool,
}

/// Scroll call recorded together with the scroll-behavior in force
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRecord {
    pub y: f64,
    pub root_behavior: Option<String>,
}

/// Headless [`Document`] implementation
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    index: HashMap<ElementId, usize>,
    root_styles: BTreeMap<String, String>,
    body_styles: BTreeMap<String, String>,
    root_classes: BTreeSet<String>,
    body_classes: BTreeSet<String>,
    active: Option<ElementId>,
    scroll_y: f64,
    scrollbar_width: f64,
    inner_height: f64,
    viewport: Option<VisualViewport>,
    scroll_log: Vec<ScrollRecord>,
    mutations: u64,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            root_styles: BTreeMap::new(),
            body_styles: BTreeMap::new(),
            root_classes: BTreeSet::new(),
            body_classes: BTreeSet::new(),
            active: None,
            scroll_y: 0.0,
            scrollbar_width: 15.0,
            inner_height: 800.0,
            viewport: Some(VisualViewport {
                offset_top: 0.0,
                height: 800.0,
            }),
            scroll_log: Vec::new(),
            mutations: 0,
        }
    }
}

impl MemoryDocument {
    /// Empty document: 800px window, 15px scrollbar, full visual viewport
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element; later inserts come later in document order
    pub fn insert(&mut self, spec: ElementSpec) -> &mut Self {
        let visible = spec.visible;
        let id = spec.id.clone();
        self.nodes.push(Node {
            spec,
            visible,
            z_index: None,
            styles: BTreeMap::new(),
            classes: BTreeSet::new(),
            slots: BTreeMap::new(),
            download: None,
            has_download: false,
        });
        self.index.insert(id, self.nodes.len() - 1);
        self
    }

    /// Give an overlay a text slot
    pub fn with_slot(&mut self, overlay: &str, slot: Slot) -> &mut Self {
        if let Some(node) = self.node_mut(&ElementId::from(overlay)) {
            node.slots.insert(slot, String::new());
        }
        self
    }

    /// Give an overlay a download link
    pub fn with_download_link(&mut self, overlay: &str) -> &mut Self {
        if let Some(node) = self.node_mut(&ElementId::from(overlay)) {
            node.has_download = true;
        }
        self
    }

    /// Detach an element and its subtree
    pub fn remove(&mut self, id: &ElementId) {
        let doomed: BTreeSet<ElementId> = self
            .nodes
            .iter()
            .filter(|n| &n.spec.id == id || self.is_descendant(&n.spec.id, id))
            .map(|n| n.spec.id.clone())
            .collect();
        self.nodes.retain(|n| !doomed.contains(&n.spec.id));
        self.reindex();
        if self.active.as_ref().is_some_and(|a| doomed.contains(a)) {
            self.active = None;
        }
        self.mutations += 1;
    }

    /// Simulate the user scrolling the page
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y;
    }

    /// Simulate the platform resizing the visual viewport
    pub fn set_visual_viewport(&mut self, viewport: Option<VisualViewport>) {
        self.viewport = viewport;
    }

    /// Change scrollbar width
    pub fn set_scrollbar_width(&mut self, width: f64) {
        self.scrollbar_width = width;
    }

    /// Number of mutations performed through [`Document`]
    #[must_use]
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    /// Whether the element is shown
    #[must_use]
    pub fn is_visible(&self, id: &str) -> bool {
        self.node(&ElementId::from(id)).is_some_and(|n| n.visible)
    }

    /// Assigned z-index
    #[must_use]
    pub fn z_index(&self, id: &str) -> Option<u32> {
        self.node(&ElementId::from(id)).and_then(|n| n.z_index)
    }

    /// Current `tabindex`
    #[must_use]
    pub fn tab_index_of(&self, id: &str) -> Option<i32> {
        self.node(&ElementId::from(id)).and_then(|n| n.spec.tab_index)
    }

    /// Inline style value
    #[must_use]
    pub fn style(&self, target: &StyleTarget, property: &str) -> Option<&str> {
        self.styles(target)
            .and_then(|s| s.get(property))
            .map(String::as_str)
    }

    /// All inline styles on a target
    #[must_use]
    pub fn styles(&self, target: &StyleTarget) -> Option<&BTreeMap<String, String>> {
        match target {
            StyleTarget::Root => Some(&self.root_styles),
            StyleTarget::Body => Some(&self.body_styles),
            StyleTarget::Element(id) => self.node(id).map(|n| &n.styles),
        }
    }

    /// Whether a class is present
    #[must_use]
    pub fn has_class(&self, target: &StyleTarget, class: &str) -> bool {
        match target {
            StyleTarget::Root => self.root_classes.contains(class),
            StyleTarget::Body => self.body_classes.contains(class),
            StyleTarget::Element(id) => self.node(id).is_some_and(|n| n.classes.contains(class)),
        }
    }

    /// Slot text
    #[must_use]
    pub fn slot_text(&self, overlay: &str, slot: Slot) -> Option<&str> {
        self.node(&ElementId::from(overlay))
            .and_then(|n| n.slots.get(&slot))
            .map(String::as_str)
    }

    /// Download link target
    #[must_use]
    pub fn download_target(&self, overlay: &str) -> Option<&str> {
        self.node(&ElementId::from(overlay))
            .and_then(|n| n.download.as_deref())
    }

    /// Every `scroll_to` call so far
    #[must_use]
    pub fn scroll_log(&self) -> &[ScrollRecord] {
        &self.scroll_log
    }

    fn node(&self, id: &ElementId) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    fn node_mut(&mut self, id: &ElementId) -> Option<&mut Node> {
        let i = *self.index.get(id)?;
        Some(&mut self.nodes[i])
    }

    fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.spec.id.clone(), i))
            .collect();
    }

    /// Whether `id` sits strictly below `ancestor`
    fn is_descendant(&self, id: &ElementId, ancestor: &ElementId) -> bool {
        let mut current = self.node(id).and_then(|n| n.spec.parent.clone());
        while let Some(parent) = current {
            if &parent == ancestor {
                return true;
            }
            current = self.node(&parent).and_then(|n| n.spec.parent.clone());
        }
        false
    }
}

impl Document for MemoryDocument {
    fn exists(&self, id: &ElementId) -> bool {
        self.index.contains_key(id)
    }

    fn set_visible(&mut self, id: &ElementId, visible: bool) {
        self.mutations += 1;
        if let Some(node) = self.node_mut(id) {
            node.visible = visible;
        }
    }

    fn set_z_index(&mut self, id: &ElementId, z_index: u32) {
        self.mutations += 1;
        if let Some(node) = self.node_mut(id) {
            node.z_index = Some(z_index);
        }
    }

    fn descendants(&self, id: &ElementId) -> Vec<ElementInfo> {
        self.nodes
            .iter()
            .filter(|n| self.is_descendant(&n.spec.id, id))
            .map(|n| ElementInfo {
                id: n.spec.id.clone(),
                kind: n.spec.kind,
                has_href: n.spec.has_href,
                disabled: n.spec.disabled,
                tab_index: n.spec.tab_index,
            })
            .collect()
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active.clone()
    }

    fn focus(&mut self, id: &ElementId) {
        self.mutations += 1;
        if self.exists(id) {
            self.active = Some(id.clone());
        }
    }

    fn set_tab_index(&mut self, id: &ElementId, tab_index: i32) {
        self.mutations += 1;
        if let Some(node) = self.node_mut(id) {
            node.spec.tab_index = Some(tab_index);
        }
    }

    fn closest_with_attr(&self, from: &ElementId, attr: &str) -> Option<(ElementId, String)> {
        let mut current = Some(from.clone());
        while let Some(id) = current {
            let node = self.node(&id)?;
            if let Some(value) = node.spec.attrs.get(attr) {
                return Some((id, value.clone()));
            }
            current = node.spec.parent.clone();
        }
        None
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: f64) {
        self.mutations += 1;
        self.scroll_y = y;
        self.scroll_log.push(ScrollRecord {
            y,
            root_behavior: self.root_styles.get("scroll-behavior").cloned(),
        });
    }

    fn scrollbar_width(&self) -> f64 {
        self.scrollbar_width
    }

    fn set_style(&mut self, target: &StyleTarget, property: &str, value: &str) {
        self.mutations += 1;
        let styles = match target {
            StyleTarget::Root => Some(&mut self.root_styles),
            StyleTarget::Body => Some(&mut self.body_styles),
            StyleTarget::Element(id) => self.node_mut(id).map(|n| &mut n.styles),
        };
        if let Some(styles) = styles {
            styles.insert(property.to_string(), value.to_string());
        }
    }

    fn remove_style(&mut self, target: &StyleTarget, property: &str) {
        self.mutations += 1;
        let styles = match target {
            StyleTarget::Root => Some(&mut self.root_styles),
            StyleTarget::Body => Some(&mut self.body_styles),
            StyleTarget::Element(id) => self.node_mut(id).map(|n| &mut n.styles),
        };
        if let Some(styles) = styles {
            styles.remove(property);
        }
    }

    fn toggle_class(&mut self, target: &StyleTarget, class: &str, on: bool) {
        self.mutations += 1;
        let classes = match target {
            StyleTarget::Root => Some(&mut self.root_classes),
            StyleTarget::Body => Some(&mut self.body_classes),
            StyleTarget::Element(id) => self.node_mut(id).map(|n| &mut n.classes),
        };
        if let Some(classes) = classes {
            if on {
                classes.insert(class.to_string());
            } else {
                classes.remove(class);
            }
        }
    }

    fn inner_height(&self) -> f64 {
        self.inner_height
    }

    fn visual_viewport(&self) -> Option<VisualViewport> {
        self.viewport
    }

    fn set_slot_text(&mut self, overlay: &ElementId, slot: Slot, text: &str) -> bool {
        self.mutations += 1;
        match self.node_mut(overlay).and_then(|n| n.slots.get_mut(&slot)) {
            Some(current) => {
                *current = text.to_string();
                true
            }
            None => false,
        }
    }

    fn set_download_target(&mut self, overlay: &ElementId, href: &str) -> bool {
        self.mutations += 1;
        match self.node_mut(overlay) {
            Some(node) if node.has_download => {
                node.download = Some(href.to_string());
                true
            }
            _ => false,
        }
    }

    fn offset_top(&self, id: &ElementId) -> Option<f64> {
        self.node(id).map(|n| n.spec.offset_top)
    }
}
