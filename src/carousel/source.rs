//! Slide data sources.
//!
//! The seam behind the simulated fetch: the scheduler supplies the latency
//! (`load_delay`), and the source supplies the data once the delay elapses.
//! The built-in [`MockSource`] stands in for a backend that does not exist
//! yet; tests inject failing sources to exercise the error path.

use crate::types::{CarouselError, SlideData};

/// Where slide data comes from once the load delay has elapsed.
pub trait SlideSource {
    /// Produce the slide set. An error routes the carousel to its error
    /// phase; there is no retry.
    fn fetch(&self) -> Result<Vec<SlideData>, CarouselError>;
}

/// The built-in mock data set: three slides with stock translation keys and
/// gradient backgrounds.
#[derive(Debug, Default, Clone)]
pub struct MockSource;

impl MockSource {
    /// The fallback data set used when nothing better is available.
    pub fn default_slides() -> Vec<SlideData> {
        vec![
            SlideData {
                id: 1,
                title_key: "slide1-title".to_string(),
                subtitle_key: "slide1-subtitle".to_string(),
                cta_key: Some("slide1-cta".to_string()),
                secondary_key: Some("slide1-demo".to_string()),
                background: "linear-gradient(135deg, rgba(30, 58, 95, 0.9), rgba(44, 82, 130, 0.9))"
                    .to_string(),
            },
            SlideData {
                id: 2,
                title_key: "slide2-title".to_string(),
                subtitle_key: "slide2-subtitle".to_string(),
                cta_key: Some("slide2-cta".to_string()),
                secondary_key: Some("slide2-team".to_string()),
                background:
                    "linear-gradient(135deg, rgba(56, 161, 105, 0.9), rgba(72, 187, 120, 0.9))"
                        .to_string(),
            },
            SlideData {
                id: 3,
                title_key: "slide3-title".to_string(),
                subtitle_key: "slide3-subtitle".to_string(),
                cta_key: Some("slide3-cta".to_string()),
                secondary_key: Some("slide3-features".to_string()),
                background:
                    "linear-gradient(135deg, rgba(214, 158, 46, 0.9), rgba(245, 189, 85, 0.9))"
                        .to_string(),
            },
        ]
    }
}

impl SlideSource for MockSource {
    fn fetch(&self) -> Result<Vec<SlideData>, CarouselError> {
        Ok(Self::default_slides())
    }
}

/// A source that always fails. Used to drive the error phase in tests and
/// demos.
#[derive(Debug, Clone)]
pub struct FailingSource {
    /// Message carried into [`CarouselError::Load`].
    pub message: String,
}

impl FailingSource {
    /// Create a failing source with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl SlideSource for FailingSource {
    fn fetch(&self) -> Result<Vec<SlideData>, CarouselError> {
        Err(CarouselError::Load(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_has_three_slides() {
        let slides = MockSource.fetch().unwrap();
        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0].title_key, "slide1-title");
        assert!(slides.iter().all(|s| s.cta_key.is_some()));
    }

    #[test]
    fn test_failing_source() {
        let err = FailingSource::new("network down").fetch().unwrap_err();
        assert_eq!(err, CarouselError::Load("network down".to_string()));
    }
}
