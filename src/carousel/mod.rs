//! Carousel Module - The slideshow widget.
//!
//! Owns slide index state, the transition mutex, the auto-scroll timer
//! lifecycle, hover-pause, and class synchronization for slides and dots.
//! Everything event-driven - dot clicks, arrow clicks, arrow keys, hover,
//! timer ticks - funnels into one `show_slide` operation.
//!
//! # Lifecycle
//!
//! `Uninitialized -> Loading -> Ready` (or `-> Error`). Construction never
//! throws: a missing container is logged and leaves the instance permanently
//! uninitialized; a failing slide source or malformed markup shows the error
//! view with a retry control. The page keeps rendering either way.
//!
//! Initialization is deferred through the [`Scheduler`] by the configured
//! load delay (the simulated fetch). The deferred callback holds a weak
//! handle and re-checks liveness, so destroying a carousel mid-load is safe.
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::carousel::{Carousel, CarouselOptions};
//! use spark_carousel::stage::{Stage, build_carousel_markup};
//! use spark_carousel::state::Scheduler;
//! use std::time::Duration;
//!
//! let stage = Stage::new();
//! build_carousel_markup(&stage, 3);
//! let scheduler = Scheduler::new();
//!
//! let carousel = Carousel::new(&stage, &scheduler, ".carousel-container",
//!     CarouselOptions::default());
//! scheduler.advance(Duration::from_millis(800)); // load completes
//!
//! carousel.next();
//! assert_eq!(carousel.state().current_slide, 1);
//! ```

pub mod config;
pub mod content;
pub mod source;

pub use config::CarouselConfig;
pub use source::{FailingSource, MockSource, SlideSource};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::{debug, error, info};

use crate::i18n::Translator;
use crate::stage::events::{ListenerId, ARROW_LEFT, ARROW_RIGHT};
use crate::stage::{Element, Stage};
use crate::state::{Scheduler, TimerId};
use crate::types::{CarouselError, CarouselPhase, CarouselState, SlideData};

/// Inline style properties stripped from slides during markup sync. Leftovers
/// from earlier scripts would fight the substrate's own styling.
const STALE_STYLE_PROPS: [&str; 4] = ["opacity", "visibility", "z-index", "transform"];

/// Animation classes stripped from `.slide-content` during markup sync.
const STALE_ANIMATION_CLASSES: [&str; 4] = [
    "animate-in-left",
    "animate-in-right",
    "animate-out-left",
    "animate-out-right",
];

// =============================================================================
// Options
// =============================================================================

/// Construction-time collaborators and configuration.
///
/// Built with struct update syntax:
///
/// ```ignore
/// CarouselOptions {
///     config: CarouselConfig { enable_auto_scroll: false, ..Default::default() },
///     ..Default::default()
/// }
/// ```
pub struct CarouselOptions {
    /// Behavior toggles.
    pub config: CarouselConfig,
    /// Where slide data comes from after the load delay.
    pub source: Box<dyn SlideSource>,
    /// Optional host translation lookup for generated content.
    pub translator: Option<Rc<dyn Translator>>,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            config: CarouselConfig::default(),
            source: Box::new(MockSource),
            translator: None,
        }
    }
}

// =============================================================================
// Core
// =============================================================================

pub(crate) struct CarouselCore {
    config: CarouselConfig,
    stage: Stage,
    scheduler: Scheduler,
    translator: Option<Rc<dyn Translator>>,
    /// Taken once when the load completes.
    source: RefCell<Option<Box<dyn SlideSource>>>,

    container: RefCell<Option<Element>>,
    slides: RefCell<Vec<Element>>,
    dots: RefCell<Vec<Element>>,
    slide_data: RefCell<Vec<SlideData>>,

    current_slide: Signal<usize>,
    phase: Signal<CarouselPhase>,
    auto_scrolling: Signal<bool>,
    /// Advisory mutex: at most one slide change in flight.
    transitioning: Cell<bool>,

    auto_timer: Cell<Option<TimerId>>,
    release_timer: Cell<Option<TimerId>>,
    load_timer: Cell<Option<TimerId>>,
    listeners: RefCell<Vec<ListenerId>>,
    /// Cleared by destroy(); deferred callbacks re-check it.
    alive: Cell<bool>,
}

impl CarouselCore {
    // -------------------------------------------------------------------------
    // Initialization
    // -------------------------------------------------------------------------

    fn begin_load(core: &Rc<Self>) {
        core.phase.set(CarouselPhase::Loading);
        info!("loading carousel data");

        // Dynamic path: nothing to show yet, so put up the loading view.
        if let Some(container) = core.container.borrow().clone() {
            if container.query_selector(".carousel-slide").is_none() {
                content::show_loading(&core.stage, &container);
            }
        }

        let weak = Rc::downgrade(core);
        let id = core.scheduler.set_timeout(core.config.load_delay, move || {
            let Some(core) = weak.upgrade() else { return };
            if !core.alive.get() {
                return;
            }
            core.load_timer.set(None);
            Self::finish_init(&core);
        });
        core.load_timer.set(Some(id));
    }

    fn finish_init(core: &Rc<Self>) {
        let fetched = match core.source.borrow_mut().take() {
            Some(source) => source.fetch(),
            None => Ok(MockSource::default_slides()),
        };
        let data = match fetched {
            Ok(data) => data,
            Err(err) => {
                Self::fail_init(core, err);
                return;
            }
        };
        info!(slides = data.len(), "carousel data loaded");
        core.slide_data.replace(data);

        if let Err(err) = Self::sync_markup(core) {
            Self::fail_init(core, err);
            return;
        }

        Self::bind_listeners(core);
        core.phase.set(CarouselPhase::Ready);
        if core.config.enable_auto_scroll {
            Self::start_auto_scroll(core);
        }
        info!("carousel initialized");
    }

    /// Normalize existing markup (or generate it from data when the container
    /// is empty): strip stale inline styles and animation classes, then
    /// re-stamp `active` so exactly slide 0 and dot 0 carry it.
    fn sync_markup(core: &Rc<Self>) -> Result<(), CarouselError> {
        let Some(container) = core.container.borrow().clone() else {
            return Ok(());
        };

        let mut slides = container.query_selector_all(".carousel-slide");
        if slides.is_empty() && !core.slide_data.borrow().is_empty() {
            let data = core.slide_data.borrow();
            content::render_dynamic(&core.stage, &container, &data, core.translator.as_deref());
            drop(data);
            slides = container.query_selector_all(".carousel-slide");
        }
        let dots = container.query_selector_all(".carousel-dot");

        info!(slides = slides.len(), dots = dots.len(), "found carousel markup");

        // Slides and dots pair by index; divergent markup is rejected rather
        // than indexed out of bounds later.
        if slides.len() != dots.len() {
            return Err(CarouselError::MarkupMismatch {
                slides: slides.len(),
                dots: dots.len(),
            });
        }

        for slide in &slides {
            for prop in STALE_STYLE_PROPS {
                slide.remove_style(prop);
            }
            if let Some(slide_content) = slide.query_selector(".slide-content") {
                for prop in STALE_STYLE_PROPS {
                    slide_content.remove_style(prop);
                }
                for class in STALE_ANIMATION_CLASSES {
                    slide_content.remove_class(class);
                }
            }
            slide.remove_class("active");
        }
        for dot in &dots {
            dot.remove_class("active");
        }
        if let Some(first) = slides.first() {
            first.add_class("active");
        }
        if let Some(first) = dots.first() {
            first.add_class("active");
        }

        core.current_slide.set(0);
        core.slides.replace(slides);
        core.dots.replace(dots);
        Ok(())
    }

    fn fail_init(core: &Rc<Self>, err: CarouselError) {
        error!(error = %err, "carousel initialization failed");
        core.phase.set(CarouselPhase::Error);

        if let Some(container) = core.container.borrow().clone() {
            let retry = content::show_error(&core.stage, &container);
            let stage = core.stage.clone();
            let id = core.stage.on_click(&retry, move |_| {
                info!("carousel retry requested, reloading page");
                stage.request_reload();
            });
            core.listeners.borrow_mut().push(id);
        }
    }

    fn bind_listeners(core: &Rc<Self>) {
        let Some(container) = core.container.borrow().clone() else {
            return;
        };

        // Delegated click handling for dots and arrows.
        let weak = Rc::downgrade(core);
        let click_id = core.stage.on_click(&container, move |target| {
            let Some(core) = weak.upgrade() else { return };
            if !core.alive.get() {
                return;
            }
            if target.has_class("carousel-dot") {
                if let Some(index) = target
                    .attribute("data-slide")
                    .and_then(|v| v.parse::<isize>().ok())
                {
                    Self::show_slide(&core, index);
                }
            } else if target.has_class("carousel-arrow") {
                if let Some(direction) = target
                    .attribute("data-direction")
                    .and_then(|v| v.parse::<isize>().ok())
                {
                    Self::change_slide(&core, direction);
                }
            }
        });
        core.listeners.borrow_mut().push(click_id);

        // Hover pauses the auto-advance tick; the timer itself keeps running.
        if core.config.enable_hover_pause {
            let weak = Rc::downgrade(core);
            let enter_id = core.stage.on_pointer_enter(&container, move || {
                if let Some(core) = weak.upgrade() {
                    core.auto_scrolling.set(false);
                }
            });
            let weak = Rc::downgrade(core);
            let leave_id = core.stage.on_pointer_leave(&container, move || {
                if let Some(core) = weak.upgrade() {
                    core.auto_scrolling.set(true);
                }
            });
            let mut listeners = core.listeners.borrow_mut();
            listeners.push(enter_id);
            listeners.push(leave_id);
        }

        // Page-wide arrow keys.
        let weak = Rc::downgrade(core);
        let key_id = core.stage.on_keydown(move |event| {
            let Some(core) = weak.upgrade() else { return };
            match event.key.as_str() {
                ARROW_LEFT => Self::change_slide(&core, -1),
                ARROW_RIGHT => Self::change_slide(&core, 1),
                _ => {}
            }
        });
        core.listeners.borrow_mut().push(key_id);
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    fn show_slide(core: &Rc<Self>, index: isize) {
        if core.slides.borrow().is_empty() || core.transitioning.get() {
            return;
        }
        let current = core.current_slide.get();
        if index == current as isize {
            return;
        }

        core.transitioning.set(true);

        let len = core.slides.borrow().len();
        let target = if index < 0 {
            len - 1
        } else if index as usize >= len {
            0
        } else {
            index as usize
        };

        {
            let slides = core.slides.borrow();
            let dots = core.dots.borrow();
            if let Some(dot) = dots.get(current) {
                dot.remove_class("active");
            }
            if let Some(dot) = dots.get(target) {
                dot.add_class("active");
            }
            slides[current].remove_class("active");
            slides[target].add_class("active");
        }

        core.current_slide.set(target);
        debug!(from = current, to = target, "slide change");

        // Manual navigation restarts the countdown instead of stacking on it.
        Self::reset_auto_scroll(core);

        // The substrate has no transition-end event; the scheduler deadline
        // is the completion signal.
        let weak = Rc::downgrade(core);
        let id = core.scheduler.set_timeout(core.config.animation_duration, move || {
            if let Some(core) = weak.upgrade() {
                core.transitioning.set(false);
                core.release_timer.set(None);
            }
        });
        core.release_timer.set(Some(id));
    }

    fn change_slide(core: &Rc<Self>, direction: isize) {
        let next = core.current_slide.get() as isize + direction;
        Self::show_slide(core, next);
    }

    // -------------------------------------------------------------------------
    // Auto-scroll timer lifecycle
    // -------------------------------------------------------------------------

    fn start_auto_scroll(core: &Rc<Self>) {
        if let Some(id) = core.auto_timer.take() {
            core.scheduler.clear(id);
        }
        let weak = Rc::downgrade(core);
        let id = core
            .scheduler
            .set_interval(core.config.auto_scroll_interval, move || {
                let Some(core) = weak.upgrade() else { return };
                if !core.alive.get() {
                    return;
                }
                // Hover, loading and error all suppress the tick, not the timer.
                if core.auto_scrolling.get() && core.phase.get() == CarouselPhase::Ready {
                    Self::change_slide(&core, 1);
                }
            });
        core.auto_timer.set(Some(id));
    }

    fn stop_auto_scroll(&self) {
        if let Some(id) = self.auto_timer.take() {
            self.scheduler.clear(id);
        }
    }

    fn reset_auto_scroll(core: &Rc<Self>) {
        if core.config.enable_auto_scroll {
            core.stop_auto_scroll();
            Self::start_auto_scroll(core);
        }
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    fn destroy(&self) {
        self.alive.set(false);
        self.stop_auto_scroll();
        if let Some(id) = self.release_timer.take() {
            self.scheduler.clear(id);
        }
        if let Some(id) = self.load_timer.take() {
            self.scheduler.clear(id);
        }
        for id in self.listeners.borrow_mut().drain(..) {
            self.stage.remove_listener(id);
        }

        // The markup belongs to the page; only the references are dropped.
        self.container.replace(None);
        self.slides.borrow_mut().clear();
        self.dots.borrow_mut().clear();
        self.slide_data.borrow_mut().clear();
        self.transitioning.set(false);
        info!("carousel destroyed");
    }
}

// =============================================================================
// Public handle
// =============================================================================

/// The carousel widget handle. Clones share the same instance.
#[derive(Clone)]
pub struct Carousel {
    core: Rc<CarouselCore>,
}

impl Carousel {
    /// Construct against a container selector and start loading.
    ///
    /// Never fails: a selector that matches nothing is logged and leaves the
    /// instance permanently uninitialized but queryable. Otherwise the load
    /// completes once the scheduler advances past the configured load delay.
    pub fn new(stage: &Stage, scheduler: &Scheduler, selector: &str, options: CarouselOptions) -> Self {
        let container = stage.query_selector(selector);
        info!(selector, found = container.is_some(), "carousel constructed");
        if container.is_none() {
            let err = CarouselError::ContainerNotFound {
                selector: selector.to_string(),
            };
            error!(error = %err, "carousel construction failed");
        }

        let has_container = container.is_some();
        let core = Rc::new(CarouselCore {
            config: options.config,
            stage: stage.clone(),
            scheduler: scheduler.clone(),
            translator: options.translator,
            source: RefCell::new(Some(options.source)),
            container: RefCell::new(container),
            slides: RefCell::new(Vec::new()),
            dots: RefCell::new(Vec::new()),
            slide_data: RefCell::new(Vec::new()),
            current_slide: signal(0),
            phase: signal(CarouselPhase::Uninitialized),
            auto_scrolling: signal(true),
            transitioning: Cell::new(false),
            auto_timer: Cell::new(None),
            release_timer: Cell::new(None),
            load_timer: Cell::new(None),
            listeners: RefCell::new(Vec::new()),
            alive: Cell::new(true),
        });

        if has_container {
            CarouselCore::begin_load(&core);
        }

        Self { core }
    }

    /// Show the slide at `index`.
    ///
    /// No-op while a transition is in flight or when `index` equals the
    /// current index. Out-of-range indices wrap: negative to the last slide,
    /// past-the-end to the first.
    pub fn show_slide(&self, index: isize) {
        CarouselCore::show_slide(&self.core, index);
    }

    /// Move by `direction` slides (typically +1 or -1) with wraparound.
    pub fn change_slide(&self, direction: isize) {
        CarouselCore::change_slide(&self.core, direction);
    }

    /// Advance to the next slide.
    pub fn next(&self) {
        self.change_slide(1);
    }

    /// Go back to the previous slide.
    pub fn prev(&self) {
        self.change_slide(-1);
    }

    /// Jump to a specific slide.
    pub fn go_to(&self, index: usize) {
        self.show_slide(index as isize);
    }

    /// Start (or restart) the auto-scroll timer.
    pub fn start_auto_scroll(&self) {
        CarouselCore::start_auto_scroll(&self.core);
    }

    /// Stop the auto-scroll timer.
    pub fn stop_auto_scroll(&self) {
        self.core.stop_auto_scroll();
    }

    /// Restart the auto-scroll countdown from zero.
    pub fn reset_auto_scroll(&self) {
        CarouselCore::reset_auto_scroll(&self.core);
    }

    /// Read-only snapshot of current state.
    pub fn state(&self) -> CarouselState {
        let phase = self.core.phase.get();
        CarouselState {
            current_slide: self.core.current_slide.get(),
            total_slides: self.core.slides.borrow().len(),
            is_auto_scrolling: self.core.auto_scrolling.get(),
            is_loading: phase == CarouselPhase::Loading,
            has_error: phase == CarouselPhase::Error,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> CarouselPhase {
        self.core.phase.get()
    }

    /// Whether a slide change is currently in flight.
    pub fn is_transitioning(&self) -> bool {
        self.core.transitioning.get()
    }

    /// Signal carrying the current slide index, for reactive consumers.
    pub fn current_slide_signal(&self) -> Signal<usize> {
        self.core.current_slide.clone()
    }

    /// Signal carrying the lifecycle phase, for reactive consumers.
    pub fn phase_signal(&self) -> Signal<CarouselPhase> {
        self.core.phase.clone()
    }

    /// Signal carrying the auto-scroll gate, for reactive consumers.
    pub fn auto_scrolling_signal(&self) -> Signal<bool> {
        self.core.auto_scrolling.clone()
    }

    /// Element handles for the current slides (empty before initialization).
    pub fn slides(&self) -> Vec<Element> {
        self.core.slides.borrow().clone()
    }

    /// Stop timers, detach listeners and drop markup references.
    ///
    /// The markup itself stays in the page. Pending load callbacks become
    /// no-ops.
    pub fn destroy(&self) {
        self.core.destroy();
    }

    /// Downgrade to a non-owning handle, for registries that must not keep
    /// destroyed instances alive.
    pub fn downgrade(&self) -> WeakCarousel {
        WeakCarousel {
            core: Rc::downgrade(&self.core),
        }
    }
}

/// Non-owning counterpart of [`Carousel`].
#[derive(Clone)]
pub struct WeakCarousel {
    core: std::rc::Weak<CarouselCore>,
}

impl WeakCarousel {
    /// Upgrade back to a strong handle if the instance is still around.
    pub fn upgrade(&self) -> Option<Carousel> {
        self.core.upgrade().map(|core| Carousel { core })
    }
}

// =============================================================================
// Tests
// =============================================================================
