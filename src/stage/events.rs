//! Events Module - Listener registry and dispatch for the stage.
//!
//! Three event surfaces, matching what the carousel wires up:
//!
//! - **Click** with delegation: listeners attach to a scope element and fire
//!   for clicks on any descendant, receiving the actual target. This is how
//!   dot and arrow clicks are routed without per-dot listeners.
//! - **Pointer enter/leave** on a specific element (hover-pause).
//! - **Keydown**, page-wide (the arrow-key surface is global, not scoped to
//!   the carousel container).
//!
//! Every registration returns a [`ListenerId`]; [`Stage::remove_listener`]
//! detaches it. Handlers are cloned out of the registry before invocation so
//! a handler may register or remove listeners without re-entrancy issues.
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::stage::{Stage, build_carousel_markup};
//!
//! let stage = Stage::new();
//! let container = build_carousel_markup(&stage, 3);
//!
//! let id = stage.on_click(&container, |target| {
//!     if target.has_class("carousel-dot") {
//!         // navigate
//!     }
//! });
//!
//! let dot = stage.query_selector(".carousel-dot").unwrap();
//! stage.dispatch_click(&dot);
//! stage.remove_listener(id);
//! ```

use std::rc::Rc;

use super::{Element, ElementId, Stage};

// =============================================================================
// Types
// =============================================================================

/// Handle for removing a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// A key press as seen by page-wide keydown listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// Key name (e.g. "ArrowLeft", "ArrowRight", "q").
    pub key: String,
}

impl KeyboardEvent {
    /// Create a key press event.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Key name for the left arrow.
pub const ARROW_LEFT: &str = "ArrowLeft";
/// Key name for the right arrow.
pub const ARROW_RIGHT: &str = "ArrowRight";

type ClickHandler = Rc<dyn Fn(&Element)>;
type PointerHandler = Rc<dyn Fn()>;
type KeyHandler = Rc<dyn Fn(&KeyboardEvent)>;

struct ClickListener {
    id: ListenerId,
    scope: Element,
    handler: ClickHandler,
}

struct PointerListener {
    id: ListenerId,
    element: ElementId,
    handler: PointerHandler,
}

struct KeyListener {
    id: ListenerId,
    handler: KeyHandler,
}

// =============================================================================
// Registry
// =============================================================================

pub(crate) struct EventRegistry {
    next_id: usize,
    click: Vec<ClickListener>,
    pointer_enter: Vec<PointerListener>,
    pointer_leave: Vec<PointerListener>,
    keydown: Vec<KeyListener>,
}

impl EventRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            click: Vec::new(),
            pointer_enter: Vec::new(),
            pointer_leave: Vec::new(),
            keydown: Vec::new(),
        }
    }

    fn next_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.click.len()
            + self.pointer_enter.len()
            + self.pointer_leave.len()
            + self.keydown.len();
        self.click.retain(|l| l.id != id);
        self.pointer_enter.retain(|l| l.id != id);
        self.pointer_leave.retain(|l| l.id != id);
        self.keydown.retain(|l| l.id != id);
        let after = self.click.len()
            + self.pointer_enter.len()
            + self.pointer_leave.len()
            + self.keydown.len();
        after < before
    }

    fn listener_count(&self) -> usize {
        self.click.len() + self.pointer_enter.len() + self.pointer_leave.len() + self.keydown.len()
    }
}

// =============================================================================
// Stage event API
// =============================================================================

impl Stage {
    /// Register a delegated click listener on `scope`.
    ///
    /// Fires for clicks on `scope` or any of its descendants; the handler
    /// receives the click target.
    pub fn on_click<F>(&self, scope: &Element, handler: F) -> ListenerId
    where
        F: Fn(&Element) + 'static,
    {
        let mut events = self.inner.events.borrow_mut();
        let id = events.next_id();
        events.click.push(ClickListener {
            id,
            scope: scope.clone(),
            handler: Rc::new(handler),
        });
        id
    }

    /// Register a pointer-enter listener on a specific element.
    pub fn on_pointer_enter<F>(&self, element: &Element, handler: F) -> ListenerId
    where
        F: Fn() + 'static,
    {
        let mut events = self.inner.events.borrow_mut();
        let id = events.next_id();
        events.pointer_enter.push(PointerListener {
            id,
            element: element.id(),
            handler: Rc::new(handler),
        });
        id
    }

    /// Register a pointer-leave listener on a specific element.
    pub fn on_pointer_leave<F>(&self, element: &Element, handler: F) -> ListenerId
    where
        F: Fn() + 'static,
    {
        let mut events = self.inner.events.borrow_mut();
        let id = events.next_id();
        events.pointer_leave.push(PointerListener {
            id,
            element: element.id(),
            handler: Rc::new(handler),
        });
        id
    }

    /// Register a page-wide keydown listener.
    pub fn on_keydown<F>(&self, handler: F) -> ListenerId
    where
        F: Fn(&KeyboardEvent) + 'static,
    {
        let mut events = self.inner.events.borrow_mut();
        let id = events.next_id();
        events.keydown.push(KeyListener {
            id,
            handler: Rc::new(handler),
        });
        id
    }

    /// Detach a listener. Returns false if the id was already gone.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.events.borrow_mut().remove(id)
    }

    /// Number of registered listeners (any kind).
    pub fn listener_count(&self) -> usize {
        self.inner.events.borrow().listener_count()
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Dispatch a click on `target` to every listener whose scope contains it.
    pub fn dispatch_click(&self, target: &Element) {
        let handlers: Vec<ClickHandler> = {
            let events = self.inner.events.borrow();
            events
                .click
                .iter()
                .filter(|l| l.scope.contains(target))
                .map(|l| l.handler.clone())
                .collect()
        };
        for handler in handlers {
            handler(target);
        }
    }

    /// Dispatch a pointer-enter on `element`.
    pub fn dispatch_pointer_enter(&self, element: &Element) {
        let handlers = self.pointer_handlers(element, true);
        for handler in handlers {
            handler();
        }
    }

    /// Dispatch a pointer-leave on `element`.
    pub fn dispatch_pointer_leave(&self, element: &Element) {
        let handlers = self.pointer_handlers(element, false);
        for handler in handlers {
            handler();
        }
    }

    /// Dispatch a key press to all page-wide keydown listeners.
    pub fn dispatch_key(&self, event: &KeyboardEvent) {
        let handlers: Vec<KeyHandler> = {
            let events = self.inner.events.borrow();
            events.keydown.iter().map(|l| l.handler.clone()).collect()
        };
        for handler in handlers {
            handler(event);
        }
    }

    fn pointer_handlers(&self, element: &Element, enter: bool) -> Vec<PointerHandler> {
        let events = self.inner.events.borrow();
        let listeners = if enter {
            &events.pointer_enter
        } else {
            &events.pointer_leave
        };
        listeners
            .iter()
            .filter(|l| l.element == element.id())
            .map(|l| l.handler.clone())
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::build_carousel_markup;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_click_delegation_reaches_descendants() {
        let stage = Stage::new();
        let container = build_carousel_markup(&stage, 2);

        let clicked = Rc::new(RefCell::new(String::new()));
        let clicked_clone = clicked.clone();
        stage.on_click(&container, move |target| {
            *clicked_clone.borrow_mut() = target.class_name();
        });

        let dot = stage.query_selector(".carousel-dot").unwrap();
        stage.dispatch_click(&dot);
        assert!(clicked.borrow().contains("carousel-dot"));
    }

    #[test]
    fn test_click_outside_scope_is_ignored() {
        let stage = Stage::new();
        let container = build_carousel_markup(&stage, 2);

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        stage.on_click(&container, move |_| {
            count_clone.set(count_clone.get() + 1);
        });

        let outside = stage.create_element("div");
        outside.add_class("unrelated");
        stage.root().append_child(&outside);

        stage.dispatch_click(&outside);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_pointer_listeners_match_exact_element() {
        let stage = Stage::new();
        let container = build_carousel_markup(&stage, 2);
        let dot = stage.query_selector(".carousel-dot").unwrap();

        let entered = Rc::new(Cell::new(0));
        let entered_clone = entered.clone();
        stage.on_pointer_enter(&container, move || {
            entered_clone.set(entered_clone.get() + 1);
        });

        stage.dispatch_pointer_enter(&container);
        assert_eq!(entered.get(), 1);

        // Hover on a child does not trigger the container listener
        stage.dispatch_pointer_enter(&dot);
        assert_eq!(entered.get(), 1);
    }

    #[test]
    fn test_keydown_is_page_wide() {
        let stage = Stage::new();

        let last = Rc::new(RefCell::new(String::new()));
        let last_clone = last.clone();
        stage.on_keydown(move |event| {
            *last_clone.borrow_mut() = event.key.clone();
        });

        stage.dispatch_key(&KeyboardEvent::new(ARROW_RIGHT));
        assert_eq!(*last.borrow(), ARROW_RIGHT);
    }

    #[test]
    fn test_remove_listener() {
        let stage = Stage::new();
        let container = build_carousel_markup(&stage, 2);

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let id = stage.on_click(&container, move |_| {
            count_clone.set(count_clone.get() + 1);
        });
        assert_eq!(stage.listener_count(), 1);

        assert!(stage.remove_listener(id));
        assert!(!stage.remove_listener(id));
        assert_eq!(stage.listener_count(), 0);

        stage.dispatch_click(&container);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_handler_may_remove_listeners() {
        // A handler that detaches listeners must not deadlock the registry.
        let stage = Stage::new();
        let container = build_carousel_markup(&stage, 2);
        let stage_clone = stage.clone();

        let id_slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let id_slot_clone = id_slot.clone();
        let id = stage.on_click(&container, move |_| {
            if let Some(id) = id_slot_clone.get() {
                stage_clone.remove_listener(id);
            }
        });
        id_slot.set(Some(id));

        stage.dispatch_click(&container);
        assert_eq!(stage.listener_count(), 0);
    }
}
