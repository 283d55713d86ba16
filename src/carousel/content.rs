//! Dynamic content path - generated markup, loading and error views.
//!
//! The primary code path consumes markup the page already ships and only
//! re-stamps classes. This module is the secondary path: when the container
//! has no slide markup, slides and dots are generated from [`SlideData`],
//! with display text resolved through the translation collaborator. It also
//! builds the loading view shown while the dynamic path waits for data, and
//! the error view whose retry control asks the page for a full reload.

use tracing::info;

use crate::i18n::{translate_with_fallback, Translator};
use crate::stage::{Element, Stage};
use crate::types::SlideData;

/// Build one slide element from its data.
///
/// Structure matches the static markup contract: a `.carousel-slide` wrapping
/// `.slide-content` with title, subtitle and CTA buttons. Translation keys are
/// kept on `data-lang` so a host language switcher can re-translate later.
pub(crate) fn build_slide(
    stage: &Stage,
    data: &SlideData,
    index: usize,
    translator: Option<&dyn Translator>,
) -> Element {
    let slide = stage.create_element("div");
    slide.add_class("carousel-slide");
    slide.add_class(&format!("slide-{}", index + 1));
    if index == 0 {
        slide.add_class("active");
    }
    if !data.background.is_empty() {
        slide.set_style("background", &data.background);
    }

    let content = stage.create_element("div");
    content.add_class("slide-content");

    let title = stage.create_element("h1");
    title.add_class("slide-title");
    title.set_attribute("data-lang", &data.title_key);
    title.set_text(&translate_with_fallback(translator, &data.title_key));
    content.append_child(&title);

    let subtitle = stage.create_element("p");
    subtitle.add_class("slide-subtitle");
    subtitle.set_attribute("data-lang", &data.subtitle_key);
    subtitle.set_text(&translate_with_fallback(translator, &data.subtitle_key));
    content.append_child(&subtitle);

    let buttons = stage.create_element("div");
    buttons.add_class("carousel-buttons");
    let labelled = [
        (data.cta_key.as_deref(), "primary"),
        (data.secondary_key.as_deref(), "secondary"),
    ];
    for (key, kind) in labelled {
        if let Some(key) = key {
            let button = stage.create_element("button");
            button.add_class("cta-button");
            button.add_class(kind);
            button.set_attribute("data-lang", key);
            button.set_text(&translate_with_fallback(translator, key));
            buttons.append_child(&button);
        }
    }
    content.append_child(&buttons);

    slide.append_child(&content);
    slide
}

/// Replace the container contents with generated slides and dots.
pub(crate) fn render_dynamic(
    stage: &Stage,
    container: &Element,
    data: &[SlideData],
    translator: Option<&dyn Translator>,
) {
    container.clear_children();

    for (index, slide_data) in data.iter().enumerate() {
        let slide = build_slide(stage, slide_data, index, translator);
        container.append_child(&slide);
    }

    let controls = stage.create_element("div");
    controls.add_class("carousel-controls");
    for index in 0..data.len() {
        let dot = stage.create_element("button");
        dot.add_class("carousel-dot");
        if index == 0 {
            dot.add_class("active");
        }
        dot.set_attribute("data-slide", &index.to_string());
        dot.set_attribute("aria-label", &format!("Go to slide {}", index + 1));
        controls.append_child(&dot);
    }
    container.append_child(&controls);

    info!(slides = data.len(), "generated carousel markup");
}

/// Show the loading view inside the container's injected content host.
pub(crate) fn show_loading(stage: &Stage, container: &Element) {
    let host = content_host(stage, container);
    host.clear_children();

    let loading = stage.create_element("div");
    loading.add_class("carousel-loading");

    let spinner = stage.create_element("div");
    spinner.add_class("loading-spinner");
    loading.append_child(&spinner);

    let message = stage.create_element("p");
    message.set_text("正在加载轮播图内容...");
    loading.append_child(&message);

    host.append_child(&loading);
}

/// Show the error view. Returns the retry button; the caller wires its click
/// to the page reload request.
pub(crate) fn show_error(stage: &Stage, container: &Element) -> Element {
    let host = content_host(stage, container);
    host.clear_children();

    let error = stage.create_element("div");
    error.add_class("carousel-error");

    let title = stage.create_element("h3");
    title.set_text("内容加载失败");
    error.append_child(&title);

    let message = stage.create_element("p");
    message.set_text("轮播图内容暂时无法加载，请稍后重试。");
    error.append_child(&message);

    let retry = stage.create_element("button");
    retry.add_class("carousel-retry");
    retry.set_text("重新加载");
    error.append_child(&retry);

    host.append_child(&error);
    retry
}

/// Existing `.carousel-content` host for injected views, or a fresh one
/// appended to the container.
fn content_host(stage: &Stage, container: &Element) -> Element {
    if let Some(host) = container.query_selector(".carousel-content") {
        return host;
    }
    let host = stage.create_element("div");
    host.add_class("carousel-content");
    container.append_child(&host);
    host
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::source::MockSource;

    #[test]
    fn test_build_slide_resolves_text() {
        let stage = Stage::new();
        let data = &MockSource::default_slides()[0];

        let slide = build_slide(&stage, data, 0, None);
        assert!(slide.has_class("active"));
        assert_eq!(slide.style("background").as_deref(), Some(data.background.as_str()));

        let title = slide.query_selector(".slide-title").unwrap();
        assert_eq!(title.text(), "专业法律服务");
        assert_eq!(title.attribute("data-lang").as_deref(), Some("slide1-title"));

        let buttons = slide.query_selector_all(".cta-button");
        assert_eq!(buttons.len(), 2);
        assert!(buttons[0].has_class("primary"));
    }

    #[test]
    fn test_render_dynamic_builds_paired_markup() {
        let stage = Stage::new();
        let container = stage.create_element("div");
        container.add_class("carousel-container");
        stage.root().append_child(&container);

        render_dynamic(&stage, &container, &MockSource::default_slides(), None);

        let slides = container.query_selector_all(".carousel-slide");
        let dots = container.query_selector_all(".carousel-dot");
        assert_eq!(slides.len(), 3);
        assert_eq!(dots.len(), 3);
        assert!(slides[0].has_class("active"));
        assert!(dots[0].has_class("active"));
        assert_eq!(dots[2].attribute("data-slide").as_deref(), Some("2"));
    }

    #[test]
    fn test_error_view_has_retry_control() {
        let stage = Stage::new();
        let container = stage.create_element("div");
        stage.root().append_child(&container);

        let retry = show_error(&stage, &container);
        assert!(container.query_selector(".carousel-error").is_some());
        assert!(container.contains(&retry));
        assert_eq!(retry.text(), "重新加载");
    }

    #[test]
    fn test_loading_then_error_replaces_view() {
        let stage = Stage::new();
        let container = stage.create_element("div");
        stage.root().append_child(&container);

        show_loading(&stage, &container);
        assert!(container.query_selector(".carousel-loading").is_some());

        show_error(&stage, &container);
        assert!(container.query_selector(".carousel-loading").is_none());
        assert!(container.query_selector(".carousel-error").is_some());
    }
}
