//! State modules - shared services the widget builds on.

pub mod scheduler;

pub use scheduler::{Scheduler, TimerId};
