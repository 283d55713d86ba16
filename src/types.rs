//! Core types for spark-carousel.
//!
//! These types flow through the widget and define what the renderer and the
//! host application see of carousel state.

use thiserror::Error;

// =============================================================================
// Slide data
// =============================================================================

/// Data backing one slide, as returned by a [`SlideSource`](crate::carousel::SlideSource).
///
/// Text fields are translation keys, not display strings - the content path
/// resolves them through the translation collaborator at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideData {
    /// Stable slide id (1-based in the built-in data).
    pub id: u32,
    /// Translation key for the headline.
    pub title_key: String,
    /// Translation key for the subtitle line.
    pub subtitle_key: String,
    /// Translation key for the primary call-to-action button, if any.
    pub cta_key: Option<String>,
    /// Translation key for an optional secondary button.
    pub secondary_key: Option<String>,
    /// Background style value stamped onto the slide element.
    pub background: String,
}

impl SlideData {
    /// Create slide data with just title and subtitle keys.
    pub fn new(id: u32, title_key: impl Into<String>, subtitle_key: impl Into<String>) -> Self {
        Self {
            id,
            title_key: title_key.into(),
            subtitle_key: subtitle_key.into(),
            cta_key: None,
            secondary_key: None,
            background: String::new(),
        }
    }
}

// =============================================================================
// Carousel phase and state snapshot
// =============================================================================

/// Lifecycle phase of a carousel instance.
///
/// `Uninitialized -> Loading -> Ready` on the happy path,
/// `Uninitialized -> Loading -> Error` when markup sync or the slide source
/// fails. A carousel whose container selector matched nothing stays
/// `Uninitialized` forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarouselPhase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Error,
}

/// Read-only snapshot of carousel state, as returned by
/// [`Carousel::state`](crate::carousel::Carousel::state).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    /// Index of the currently active slide.
    pub current_slide: usize,
    /// Number of slides after initialization (0 before).
    pub total_slides: usize,
    /// Whether the auto-scroll tick is currently advancing (false while a
    /// pointer hovers the container with hover-pause enabled).
    pub is_auto_scrolling: bool,
    /// True while the deferred load is pending.
    pub is_loading: bool,
    /// True once initialization has failed.
    pub has_error: bool,
}

// =============================================================================
// Errors
// =============================================================================

/// Failures a carousel can hit during setup.
///
/// None of these propagate out of the public operations - they are logged and
/// folded into [`CarouselPhase::Error`] (or a permanently uninitialized
/// instance for a missing container). The page keeps rendering either way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarouselError {
    #[error("carousel container not found: {selector}")]
    ContainerNotFound { selector: String },

    /// Slide and dot markup must pair up by index. Divergent counts are
    /// rejected up front instead of indexing out of bounds later.
    #[error("carousel markup mismatch: {slides} slides but {dots} dots")]
    MarkupMismatch { slides: usize, dots: usize },

    #[error("carousel data load failed: {0}")]
    Load(String),
}

// =============================================================================
// Text attributes
// =============================================================================

bitflags::bitflags! {
    /// Text attributes for rendered spans as a bitfield.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::DIM`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 4;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_default_is_uninitialized() {
        assert_eq!(CarouselPhase::default(), CarouselPhase::Uninitialized);
    }

    #[test]
    fn test_error_messages() {
        let err = CarouselError::ContainerNotFound {
            selector: ".carousel-container".to_string(),
        };
        assert!(err.to_string().contains(".carousel-container"));

        let err = CarouselError::MarkupMismatch { slides: 3, dots: 2 };
        assert_eq!(
            err.to_string(),
            "carousel markup mismatch: 3 slides but 2 dots"
        );
    }

    #[test]
    fn test_attr_combination() {
        let attrs = Attr::BOLD | Attr::DIM;
        assert!(attrs.contains(Attr::BOLD));
        assert!(attrs.contains(Attr::DIM));
        assert!(!attrs.contains(Attr::UNDERLINE));
    }
}
