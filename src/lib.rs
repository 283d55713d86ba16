//! # spark-carousel
//!
//! Reactive carousel/slideshow widget for terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! The widget never owns its visuals. It manipulates a page-like element
//! substrate (the [`stage`]) - re-stamping `active` classes, stripping stale
//! inline styles - and exposes its state through signals. Rendering is one
//! effect at the end of the pipeline:
//!
//! ```text
//! Events/Timers → Carousel signals → build_frame → render effect
//! ```
//!
//! All timing (the simulated load delay, the auto-scroll interval, the
//! transition-mutex release) runs through a cooperative logical-clock
//! [`Scheduler`](state::Scheduler): hosts pump it with real elapsed time,
//! tests pump it with exact durations.
//!
//! ## Modules
//!
//! - [`types`] - Core types (SlideData, CarouselPhase, CarouselState, errors)
//! - [`stage`] - Element substrate and event listener registry
//! - [`state`] - The cooperative timer scheduler
//! - [`carousel`] - The widget: navigation, auto-scroll, lifecycle
//! - [`i18n`] - Translation collaborator for generated content
//! - [`renderer`] - Frame building and terminal output
//! - [`pipeline`] - Mounting, the render effect, the instance registry

pub mod carousel;
pub mod i18n;
pub mod pipeline;
pub mod renderer;
pub mod stage;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use carousel::{
    Carousel, CarouselConfig, CarouselOptions, FailingSource, MockSource, SlideSource,
    WeakCarousel,
};

pub use stage::{build_carousel_markup, Element, ElementId, Stage};

pub use state::{Scheduler, TimerId};

pub use renderer::{build_frame, Frame, Line, Span, TermRenderer};

pub use pipeline::{mount, watch_frames, MountHandle, MountOptions};

pub use i18n::{translate_with_fallback, Translator};
