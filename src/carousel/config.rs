//! Carousel configuration.

use std::time::Duration;

/// Behavior toggles, immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselConfig {
    /// Auto-advance period. The countdown restarts after every successful
    /// manual navigation.
    pub auto_scroll_interval: Duration,
    /// Whether the auto-scroll timer runs at all.
    pub enable_auto_scroll: bool,
    /// Whether pointer hover suspends the auto-advance tick.
    pub enable_hover_pause: bool,
    /// How long the transition mutex stays held after a slide change.
    pub animation_duration: Duration,
    /// Simulated fetch latency before initialization completes.
    pub load_delay: Duration,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_scroll_interval: Duration::from_millis(5000),
            enable_auto_scroll: true,
            enable_hover_pause: true,
            animation_duration: Duration::from_millis(300),
            load_delay: Duration::from_millis(800),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CarouselConfig::default();
        assert_eq!(config.auto_scroll_interval, Duration::from_millis(5000));
        assert!(config.enable_auto_scroll);
        assert!(config.enable_hover_pause);
        assert_eq!(config.animation_duration, Duration::from_millis(300));
        assert_eq!(config.load_delay, Duration::from_millis(800));
    }
}
