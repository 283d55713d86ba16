//! Mount API - Carousel lifecycle and render effect.
//!
//! The single entry point for putting a carousel on screen. Mounting
//! constructs the widget against its container, optionally registers it by
//! name, and wires the ONE render effect: whenever any of the carousel's
//! signals change, a fresh frame is built and handed to the renderer.
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::pipeline::{mount, MountOptions};
//! use spark_carousel::renderer::TermRenderer;
//! use spark_carousel::stage::{Stage, build_carousel_markup};
//! use spark_carousel::state::Scheduler;
//!
//! let stage = Stage::new();
//! build_carousel_markup(&stage, 3);
//! let scheduler = Scheduler::new();
//!
//! let handle = mount(
//!     &stage,
//!     &scheduler,
//!     ".carousel-container",
//!     MountOptions::default(),
//!     TermRenderer::stdout(),
//! );
//!
//! loop {
//!     handle.tick(); // pump timers with real elapsed time
//!     // poll input, dispatch onto the stage ...
//!     # break;
//! }
//!
//! handle.unmount();
//! ```

use std::cell::Cell;
use std::io::Write;
use std::time::Instant;

use spark_signals::effect;
use tracing::{info, warn};

use super::registry;
use crate::carousel::{Carousel, CarouselOptions};
use crate::renderer::{build_frame, Frame, TermRenderer};
use crate::stage::Stage;
use crate::state::Scheduler;

// =============================================================================
// Mount Options
// =============================================================================

/// Options for [`mount`].
#[derive(Default)]
pub struct MountOptions {
    /// Name to register the instance under, for later lookup through
    /// [`registry`]. `None` skips registration.
    pub name: Option<String>,
    /// Options forwarded to the carousel itself.
    pub carousel: CarouselOptions,
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`] that allows ticking and unmounting.
///
/// Holds the carousel, the effect stop function, and the wall clock used to
/// pump the scheduler.
pub struct MountHandle {
    carousel: Carousel,
    scheduler: Scheduler,
    name: Option<String>,
    stop_effect: Option<Box<dyn FnOnce()>>,
    last_tick: Cell<Instant>,
}

impl MountHandle {
    /// The mounted carousel.
    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    /// Advance the scheduler by the real time elapsed since the last tick
    /// (or since mount). Call this from the host loop.
    pub fn tick(&self) {
        let now = Instant::now();
        let dt = now - self.last_tick.get();
        self.last_tick.set(now);
        self.scheduler.advance(dt);
    }

    /// Tear down the carousel and the render effect.
    ///
    /// This will:
    /// 1. Remove the registry entry, if one was made
    /// 2. Destroy the carousel (timers, listeners, markup references)
    /// 3. Stop the render effect
    pub fn unmount(mut self) {
        if let Some(name) = self.name.take() {
            registry::unregister(&name);
        }
        self.carousel.destroy();
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
        info!("carousel unmounted");
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount a carousel and wire its render effect.
///
/// This sets up:
/// 1. The carousel against `selector` (loading starts immediately)
/// 2. Registry entry under `options.name`, if given
/// 3. The ONE render effect: signals -> frame -> renderer
///
/// Returns a [`MountHandle`] for ticking and cleanup.
pub fn mount<W: Write + 'static>(
    stage: &Stage,
    scheduler: &Scheduler,
    selector: &str,
    options: MountOptions,
    mut renderer: TermRenderer<W>,
) -> MountHandle {
    // Re-mounting under a name an instance already holds replaces it:
    // the old instance is destroyed so its timers and listeners cannot
    // keep firing behind the new one.
    if let Some(name) = &options.name {
        if let Some(existing) = registry::get(name) {
            existing.destroy();
        }
    }

    let carousel = Carousel::new(stage, scheduler, selector, options.carousel);

    if let Some(name) = &options.name {
        registry::register(name, &carousel);
    }

    let stop = watch_frames(&carousel, move |frame| {
        if let Err(err) = renderer.render(&frame) {
            warn!(error = %err, "render failed");
        }
    });

    MountHandle {
        carousel,
        scheduler: scheduler.clone(),
        name: options.name,
        stop_effect: Some(Box::new(stop)),
        last_tick: Cell::new(Instant::now()),
    }
}

/// Run `on_frame` now and again whenever the carousel's signals change.
///
/// This is the render effect behind [`mount`], exposed for hosts that sink
/// frames somewhere other than a terminal. Returns the effect stop function.
pub fn watch_frames<F>(carousel: &Carousel, mut on_frame: F) -> impl FnOnce() + use<F>
where
    F: FnMut(Frame) + 'static,
{
    let watched = carousel.clone();
    let phase = carousel.phase_signal();
    let current = carousel.current_slide_signal();
    let auto_scrolling = carousel.auto_scrolling_signal();

    effect(move || {
        // Read every signal the frame depends on (creates dependencies)
        let _ = phase.get();
        let _ = current.get();
        let _ = auto_scrolling.get();

        on_frame(build_frame(&watched));
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::build_carousel_markup;
    use crate::types::CarouselPhase;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_watch_frames_reacts_to_lifecycle_and_navigation() {
        let stage = Stage::new();
        build_carousel_markup(&stage, 3);
        let scheduler = Scheduler::new();
        let carousel = Carousel::new(
            &stage,
            &scheduler,
            ".carousel-container",
            CarouselOptions::default(),
        );

        let frames: Rc<RefCell<Vec<Frame>>> = Rc::new(RefCell::new(Vec::new()));
        let frames_clone = frames.clone();
        let stop = watch_frames(&carousel, move |frame| {
            frames_clone.borrow_mut().push(frame);
        });

        // Initial run captured the loading frame
        assert_eq!(frames.borrow().len(), 1);
        assert!(frames.borrow()[0].to_plain_text().contains("正在加载"));

        // Load completion flips the phase signal
        scheduler.advance(ms(800));
        assert!(frames
            .borrow()
            .last()
            .unwrap()
            .to_plain_text()
            .contains("Slide 1"));

        // Navigation flips the index signal
        let before = frames.borrow().len();
        carousel.next();
        assert!(frames.borrow().len() > before);
        assert!(frames
            .borrow()
            .last()
            .unwrap()
            .to_plain_text()
            .contains("Slide 2"));

        stop();
        let after_stop = frames.borrow().len();
        scheduler.advance(ms(300));
        carousel.next();
        assert_eq!(frames.borrow().len(), after_stop);
    }

    #[test]
    fn test_mount_registers_and_unmount_cleans_up() {
        let stage = Stage::new();
        build_carousel_markup(&stage, 3);
        let scheduler = Scheduler::new();

        let handle = mount(
            &stage,
            &scheduler,
            ".carousel-container",
            MountOptions {
                name: Some("hero".to_string()),
                ..Default::default()
            },
            TermRenderer::with_writer(Vec::new()),
        );
        scheduler.advance(ms(800));

        assert_eq!(handle.carousel().phase(), CarouselPhase::Ready);
        let looked_up = registry::get("hero").unwrap();
        assert_eq!(looked_up.state().current_slide, 0);

        handle.unmount();
        assert!(registry::get("hero").is_none());
        assert_eq!(stage.listener_count(), 0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_remount_under_same_name_replaces_instance() {
        let stage = Stage::new();
        build_carousel_markup(&stage, 3);
        let scheduler = Scheduler::new();

        let options = || MountOptions {
            name: Some("hero".to_string()),
            ..Default::default()
        };
        let first = mount(
            &stage,
            &scheduler,
            ".carousel-container",
            options(),
            TermRenderer::with_writer(Vec::new()),
        );
        scheduler.advance(ms(800));
        let first_listeners = stage.listener_count();
        assert!(first_listeners > 0);

        let second = mount(
            &stage,
            &scheduler,
            ".carousel-container",
            options(),
            TermRenderer::with_writer(Vec::new()),
        );
        scheduler.advance(ms(800));

        // The first instance was destroyed on replacement
        assert_eq!(first.carousel().state().total_slides, 0);
        assert_eq!(stage.listener_count(), first_listeners);
        assert_eq!(second.carousel().phase(), CarouselPhase::Ready);

        second.unmount();
        drop(first);
        assert!(registry::get("hero").is_none());
    }
}
