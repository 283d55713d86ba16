//! Instance Registry - Named lookup of mounted carousels.
//!
//! Hosts that need to reach a carousel from elsewhere (a language switcher
//! re-translating slides, a debug overlay reading state) look it up here by
//! name instead of stashing the handle in a global of their own.
//!
//! The registry holds weak handles only: a destroyed carousel is never kept
//! alive by being registered, and lookups prune dead entries as they are hit.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::debug;

use crate::carousel::{Carousel, WeakCarousel};

thread_local! {
    /// Map registry name to a weak carousel handle.
    static INSTANCES: RefCell<HashMap<String, WeakCarousel>> = RefCell::new(HashMap::new());
}

/// Register a carousel under a name. Replaces any previous entry.
pub fn register(name: &str, carousel: &Carousel) {
    debug!(name, "carousel registered");
    INSTANCES.with(|instances| {
        instances
            .borrow_mut()
            .insert(name.to_string(), carousel.downgrade());
    });
}

/// Look up a carousel by name.
///
/// Returns `None` for unknown names and for entries whose carousel has been
/// dropped; dead entries are removed on the way out.
pub fn get(name: &str) -> Option<Carousel> {
    INSTANCES.with(|instances| {
        let mut instances = instances.borrow_mut();
        match instances.get(name).and_then(WeakCarousel::upgrade) {
            Some(carousel) => Some(carousel),
            None => {
                instances.remove(name);
                None
            }
        }
    })
}

/// Remove an entry. Returns false if the name was not registered.
pub fn unregister(name: &str) -> bool {
    INSTANCES.with(|instances| instances.borrow_mut().remove(name).is_some())
}

/// Drop every entry whose carousel is gone. Returns how many were removed.
pub fn prune() -> usize {
    INSTANCES.with(|instances| {
        let mut instances = instances.borrow_mut();
        let before = instances.len();
        instances.retain(|_, weak| weak.upgrade().is_some());
        before - instances.len()
    })
}

/// Number of live registered instances.
pub fn count() -> usize {
    INSTANCES.with(|instances| {
        instances
            .borrow()
            .values()
            .filter(|weak| weak.upgrade().is_some())
            .count()
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::CarouselOptions;
    use crate::stage::{build_carousel_markup, Stage};
    use crate::state::Scheduler;

    fn make_carousel(stage: &Stage, scheduler: &Scheduler) -> Carousel {
        build_carousel_markup(stage, 2);
        Carousel::new(stage, scheduler, ".carousel-container", CarouselOptions::default())
    }

    #[test]
    fn test_register_and_get() {
        let stage = Stage::new();
        let scheduler = Scheduler::new();
        let carousel = make_carousel(&stage, &scheduler);

        register("hero", &carousel);
        assert!(get("hero").is_some());
        assert!(get("missing").is_none());

        assert!(unregister("hero"));
        assert!(!unregister("hero"));
        assert!(get("hero").is_none());
    }

    #[test]
    fn test_registry_does_not_keep_instances_alive() {
        let stage = Stage::new();
        let scheduler = Scheduler::new();
        {
            let carousel = make_carousel(&stage, &scheduler);
            carousel.destroy(); // detach scheduler/stage callbacks
            register("transient", &carousel);
            assert!(get("transient").is_some());
        }

        // The strong handle is gone; the lookup misses and prunes
        assert!(get("transient").is_none());

        let other = make_carousel(&stage, &scheduler);
        register("kept", &other);
        assert_eq!(prune(), 0);
        assert_eq!(count(), 1);
        unregister("kept");
    }
}
