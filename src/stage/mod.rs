//! Stage Module - The element substrate the carousel manipulates.
//!
//! The carousel does not own its visuals. It reads pre-existing markup from a
//! page-like element tree, re-stamps the `active` class, and strips stale
//! inline styles - the substrate (CSS in a browser, the renderer here) owns
//! everything visual. This module is that substrate: a minimal document of
//! [`Element`] handles owned by the host, plus an event listener registry
//! ([`events`]) the widget wires itself into.
//!
//! Only class selectors are supported (`.carousel-slide`,
//! `.carousel-dot.active`) - that is the entire selector vocabulary the
//! carousel uses.
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::stage::{Stage, build_carousel_markup};
//!
//! let stage = Stage::new();
//! build_carousel_markup(&stage, 3);
//!
//! let container = stage.query_selector(".carousel-container").unwrap();
//! assert_eq!(container.query_selector_all(".carousel-slide").len(), 3);
//! ```

pub mod events;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use events::EventRegistry;

// =============================================================================
// Element
// =============================================================================

/// Identity of an element within its stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

struct NodeData {
    tag: String,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    styles: HashMap<String, String>,
    text: String,
    children: Vec<Element>,
}

/// Cheap clonable handle to one node in the stage tree.
///
/// Clones share the same underlying node; equality is node identity, not
/// structural equality.
#[derive(Clone)]
pub struct Element {
    id: ElementId,
    inner: Rc<RefCell<NodeData>>,
}

impl Element {
    fn new(id: ElementId, tag: &str) -> Self {
        Self {
            id,
            inner: Rc::new(RefCell::new(NodeData {
                tag: tag.to_string(),
                classes: Vec::new(),
                attributes: HashMap::new(),
                styles: HashMap::new(),
                text: String::new(),
                children: Vec::new(),
            })),
        }
    }

    /// Stage-unique id of this element.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Tag name this element was created with.
    pub fn tag(&self) -> String {
        self.inner.borrow().tag.clone()
    }

    // -------------------------------------------------------------------------
    // Class list
    // -------------------------------------------------------------------------

    /// Add a class (no-op if already present).
    pub fn add_class(&self, class: &str) {
        let mut data = self.inner.borrow_mut();
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
    }

    /// Remove a class (no-op if absent).
    pub fn remove_class(&self, class: &str) {
        self.inner.borrow_mut().classes.retain(|c| c != class);
    }

    /// Check for a class.
    pub fn has_class(&self, class: &str) -> bool {
        self.inner.borrow().classes.iter().any(|c| c == class)
    }

    /// Space-joined class string.
    pub fn class_name(&self) -> String {
        self.inner.borrow().classes.join(" ")
    }

    // -------------------------------------------------------------------------
    // Attributes and inline styles
    // -------------------------------------------------------------------------

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&self, name: &str, value: &str) {
        self.inner
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Read an attribute.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.borrow().attributes.get(name).cloned()
    }

    /// Set an inline style property.
    pub fn set_style(&self, property: &str, value: &str) {
        self.inner
            .borrow_mut()
            .styles
            .insert(property.to_string(), value.to_string());
    }

    /// Remove an inline style property (no-op if absent).
    pub fn remove_style(&self, property: &str) {
        self.inner.borrow_mut().styles.remove(property);
    }

    /// Read an inline style property.
    pub fn style(&self, property: &str) -> Option<String> {
        self.inner.borrow().styles.get(property).cloned()
    }

    /// Whether any inline style properties are set.
    pub fn has_inline_styles(&self) -> bool {
        !self.inner.borrow().styles.is_empty()
    }

    // -------------------------------------------------------------------------
    // Text and children
    // -------------------------------------------------------------------------

    /// Set the text content of this element.
    pub fn set_text(&self, text: &str) {
        self.inner.borrow_mut().text = text.to_string();
    }

    /// Text content of this element (not including descendants).
    pub fn text(&self) -> String {
        self.inner.borrow().text.clone()
    }

    /// Append a child element.
    pub fn append_child(&self, child: &Element) {
        self.inner.borrow_mut().children.push(child.clone());
    }

    /// Remove all children.
    pub fn clear_children(&self) {
        self.inner.borrow_mut().children.clear();
    }

    /// Snapshot of the current children.
    pub fn children(&self) -> Vec<Element> {
        self.inner.borrow().children.clone()
    }

    /// Whether `other` is this element or a descendant of it.
    pub fn contains(&self, other: &Element) -> bool {
        if self.id == other.id {
            return true;
        }
        self.children().iter().any(|child| child.contains(other))
    }

    // -------------------------------------------------------------------------
    // Selector queries
    // -------------------------------------------------------------------------

    /// Whether this element matches a class selector like `.a.b`.
    pub fn matches(&self, selector: &str) -> bool {
        let classes = parse_selector(selector);
        if classes.is_empty() {
            return false;
        }
        classes.iter().all(|c| self.has_class(c))
    }

    /// First descendant (depth-first, document order) matching the selector.
    /// The element itself is not considered.
    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        for child in self.children() {
            if child.matches(selector) {
                return Some(child);
            }
            if let Some(found) = child.query_selector(selector) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants matching the selector, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        let mut out = Vec::new();
        self.collect_matches(selector, &mut out);
        out
    }

    fn collect_matches(&self, selector: &str, out: &mut Vec<Element>) {
        for child in self.children() {
            if child.matches(selector) {
                out.push(child.clone());
            }
            child.collect_matches(selector, out);
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Element {}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.inner.borrow();
        write!(
            f,
            "<{} id={} class=\"{}\" children={}>",
            data.tag,
            self.id.0,
            data.classes.join(" "),
            data.children.len()
        )
    }
}

/// Split `.a.b` into `["a", "b"]`. Anything that is not a pure class
/// selector yields an empty list, which matches nothing.
fn parse_selector(selector: &str) -> Vec<String> {
    let trimmed = selector.trim();
    if !trimmed.starts_with('.') {
        return Vec::new();
    }
    trimmed
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}

// =============================================================================
// Stage
// =============================================================================

pub(crate) struct StageInner {
    next_id: Cell<usize>,
    root: Element,
    pub(crate) events: RefCell<EventRegistry>,
    reload_requested: Cell<bool>,
}

/// The page: an element tree plus the event listener registry.
///
/// Clones share the same document.
#[derive(Clone)]
pub struct Stage {
    pub(crate) inner: Rc<StageInner>,
}

impl Stage {
    /// Create an empty stage with a root element.
    pub fn new() -> Self {
        let root = Element::new(ElementId(0), "body");
        Self {
            inner: Rc::new(StageInner {
                next_id: Cell::new(1),
                root,
                events: RefCell::new(EventRegistry::new()),
                reload_requested: Cell::new(false),
            }),
        }
    }

    /// Create a detached element. Append it somewhere to make it queryable.
    pub fn create_element(&self, tag: &str) -> Element {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        Element::new(ElementId(id), tag)
    }

    /// The root element everything hangs off.
    pub fn root(&self) -> Element {
        self.inner.root.clone()
    }

    /// First element in the document matching a class selector.
    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        self.inner.root.query_selector(selector)
    }

    /// All elements in the document matching a class selector.
    pub fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        self.inner.root.query_selector_all(selector)
    }

    /// Record that the page wants a full reload.
    ///
    /// The error-state retry control calls this; the host decides what a
    /// reload actually means (re-mount, restart, ...).
    pub fn request_reload(&self) {
        self.inner.reload_requested.set(true);
    }

    /// Whether a reload has been requested since the last [`Stage::take_reload_request`].
    pub fn reload_requested(&self) -> bool {
        self.inner.reload_requested.get()
    }

    /// Consume a pending reload request.
    pub fn take_reload_request(&self) -> bool {
        let requested = self.inner.reload_requested.get();
        self.inner.reload_requested.set(false);
        requested
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Markup builder
// =============================================================================

/// Build the standard carousel markup under the stage root and return the
/// container element.
///
/// Structure mirrors what a hosting page ships statically:
///
/// ```text
/// .carousel-container
///   .carousel-slide.slide-1 (.active on the first)
///     .slide-content > .slide-title + .slide-subtitle
///   ...
///   .carousel-controls > .carousel-dot[data-slide] (one per slide)
///   .carousel-arrows > .carousel-arrow[data-direction=-1|1]
/// ```
pub fn build_carousel_markup(stage: &Stage, slide_count: usize) -> Element {
    let container = stage.create_element("div");
    container.add_class("carousel-container");

    for i in 0..slide_count {
        let slide = stage.create_element("div");
        slide.add_class("carousel-slide");
        slide.add_class(&format!("slide-{}", i + 1));
        if i == 0 {
            slide.add_class("active");
        }

        let content = stage.create_element("div");
        content.add_class("slide-content");

        let title = stage.create_element("h1");
        title.add_class("slide-title");
        title.set_text(&format!("Slide {}", i + 1));

        let subtitle = stage.create_element("p");
        subtitle.add_class("slide-subtitle");

        content.append_child(&title);
        content.append_child(&subtitle);
        slide.append_child(&content);
        container.append_child(&slide);
    }

    let controls = stage.create_element("div");
    controls.add_class("carousel-controls");
    for i in 0..slide_count {
        let dot = stage.create_element("button");
        dot.add_class("carousel-dot");
        if i == 0 {
            dot.add_class("active");
        }
        dot.set_attribute("data-slide", &i.to_string());
        dot.set_attribute("aria-label", &format!("Go to slide {}", i + 1));
        controls.append_child(&dot);
    }
    container.append_child(&controls);

    let arrows = stage.create_element("div");
    arrows.add_class("carousel-arrows");
    for direction in [-1i32, 1] {
        let arrow = stage.create_element("button");
        arrow.add_class("carousel-arrow");
        arrow.set_attribute("data-direction", &direction.to_string());
        arrow.set_text(if direction < 0 { "‹" } else { "›" });
        arrows.append_child(&arrow);
    }
    container.append_child(&arrows);

    stage.root().append_child(&container);
    container
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_ops() {
        let stage = Stage::new();
        let el = stage.create_element("div");

        el.add_class("carousel-slide");
        el.add_class("active");
        el.add_class("active"); // duplicate is a no-op
        assert_eq!(el.class_name(), "carousel-slide active");

        el.remove_class("active");
        assert!(!el.has_class("active"));
        assert!(el.has_class("carousel-slide"));
    }

    #[test]
    fn test_inline_styles() {
        let stage = Stage::new();
        let el = stage.create_element("div");

        el.set_style("opacity", "0");
        el.set_style("z-index", "3");
        assert!(el.has_inline_styles());

        el.remove_style("opacity");
        assert_eq!(el.style("opacity"), None);
        assert_eq!(el.style("z-index").as_deref(), Some("3"));
    }

    #[test]
    fn test_query_selector_document_order() {
        let stage = Stage::new();
        let container = build_carousel_markup(&stage, 3);

        let slides = container.query_selector_all(".carousel-slide");
        assert_eq!(slides.len(), 3);
        assert!(slides[0].has_class("slide-1"));
        assert!(slides[2].has_class("slide-3"));

        // Compound selector
        let active = container.query_selector_all(".carousel-slide.active");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0], slides[0]);
    }

    #[test]
    fn test_query_selector_misses() {
        let stage = Stage::new();
        build_carousel_markup(&stage, 2);

        assert!(stage.query_selector(".does-not-exist").is_none());
        // Non-class selectors match nothing
        assert!(stage.query_selector("div").is_none());
    }

    #[test]
    fn test_contains() {
        let stage = Stage::new();
        let container = build_carousel_markup(&stage, 2);
        let dot = stage.query_selector(".carousel-dot").unwrap();
        let detached = stage.create_element("div");

        assert!(container.contains(&dot));
        assert!(container.contains(&container));
        assert!(!container.contains(&detached));
    }

    #[test]
    fn test_dots_carry_slide_indices() {
        let stage = Stage::new();
        let container = build_carousel_markup(&stage, 3);

        let dots = container.query_selector_all(".carousel-dot");
        for (i, dot) in dots.iter().enumerate() {
            assert_eq!(dot.attribute("data-slide").as_deref(), Some(i.to_string().as_str()));
        }

        let arrows = container.query_selector_all(".carousel-arrow");
        assert_eq!(arrows[0].attribute("data-direction").as_deref(), Some("-1"));
        assert_eq!(arrows[1].attribute("data-direction").as_deref(), Some("1"));
    }

    #[test]
    fn test_reload_request_flag() {
        let stage = Stage::new();
        assert!(!stage.reload_requested());

        stage.request_reload();
        assert!(stage.reload_requested());
        assert!(stage.take_reload_request());
        assert!(!stage.reload_requested());
    }
}
