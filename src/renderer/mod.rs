//! Renderer Module - Terminal output for the carousel.
//!
//! Split in two layers:
//!
//! - [`build_frame`] is pure: it reads the carousel's phase and markup and
//!   produces a [`Frame`] of styled lines. Tests assert on frames directly.
//! - [`TermRenderer`] writes frames to the terminal through crossterm,
//!   re-drawing only when the frame actually changed since the last render.
//!
//! The substrate owns everything visual: the renderer never looks at carousel
//! internals, only at the element tree and the state snapshot.

use std::io::{self, Write};

use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, QueueableCommand};

use crate::carousel::Carousel;
use crate::types::{Attr, CarouselPhase};

// =============================================================================
// Frame model
// =============================================================================

/// One styled run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub attrs: Attr,
}

impl Span {
    /// Plain text span.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attrs: Attr::NONE,
        }
    }

    /// Styled span.
    pub fn styled(text: impl Into<String>, attrs: Attr) -> Self {
        Self {
            text: text.into(),
            attrs,
        }
    }
}

/// One line of spans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    /// Line with a single span.
    pub fn from_span(span: Span) -> Self {
        Self { spans: vec![span] }
    }

    /// Concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A complete rendered frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub lines: Vec<Line>,
}

impl Frame {
    /// Newline-joined plain text, for tests and logging.
    pub fn to_plain_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Frame building
// =============================================================================

/// Dot glyphs for the indicator row.
const DOT_ACTIVE: &str = "●";
const DOT_INACTIVE: &str = "○";

/// Build a frame from the carousel's current phase and markup.
pub fn build_frame(carousel: &Carousel) -> Frame {
    match carousel.phase() {
        CarouselPhase::Uninitialized => Frame::default(),
        CarouselPhase::Loading => loading_frame(),
        CarouselPhase::Error => error_frame(),
        CarouselPhase::Ready => ready_frame(carousel),
    }
}

fn loading_frame() -> Frame {
    Frame {
        lines: vec![
            Line::default(),
            Line::from_span(Span::styled("正在加载轮播图内容...", Attr::DIM)),
        ],
    }
}

fn error_frame() -> Frame {
    Frame {
        lines: vec![
            Line::default(),
            Line::from_span(Span::styled("内容加载失败", Attr::BOLD)),
            Line::from_span(Span::raw("轮播图内容暂时无法加载，请稍后重试。")),
            Line::from_span(Span::styled("按 r 重新加载", Attr::DIM)),
        ],
    }
}

fn ready_frame(carousel: &Carousel) -> Frame {
    let state = carousel.state();
    let slides = carousel.slides();
    let Some(slide) = slides.get(state.current_slide) else {
        return Frame::default();
    };

    let title = slide
        .query_selector(".slide-title")
        .map(|el| el.text())
        .unwrap_or_default();
    let subtitle = slide
        .query_selector(".slide-subtitle")
        .map(|el| el.text())
        .unwrap_or_default();

    let mut dots = String::new();
    for index in 0..state.total_slides {
        if index > 0 {
            dots.push(' ');
        }
        dots.push_str(if index == state.current_slide {
            DOT_ACTIVE
        } else {
            DOT_INACTIVE
        });
    }

    let mut lines = vec![
        Line::default(),
        Line::from_span(Span::styled(title, Attr::BOLD)),
        Line::from_span(Span::raw(subtitle)),
        Line::default(),
        Line {
            spans: vec![
                Span::raw(dots),
                Span::styled(
                    format!("  {} / {}", state.current_slide + 1, state.total_slides),
                    Attr::DIM,
                ),
            ],
        },
    ];
    if !state.is_auto_scrolling {
        lines.push(Line::from_span(Span::styled("⏸ 已暂停", Attr::DIM)));
    }
    lines.push(Line::default());
    lines.push(Line::from_span(Span::styled("‹ › 切换幻灯片", Attr::DIM)));
    Frame { lines }
}

// =============================================================================
// Terminal renderer
// =============================================================================

/// Writes frames to a terminal, skipping renders when nothing changed.
///
/// Keeps the previous frame for comparison; an unchanged frame costs one
/// equality check and zero I/O.
pub struct TermRenderer<W: Write> {
    out: W,
    previous: Option<Frame>,
}

impl TermRenderer<io::Stdout> {
    /// Renderer over stdout.
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> TermRenderer<W> {
    /// Renderer over an arbitrary writer (tests use `Vec<u8>`).
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            previous: None,
        }
    }

    /// Render a frame if it differs from the last one.
    ///
    /// Returns true if anything was written.
    pub fn render(&mut self, frame: &Frame) -> io::Result<bool> {
        if self.previous.as_ref() == Some(frame) {
            return Ok(false);
        }

        self.out.queue(cursor::MoveTo(0, 0))?;
        self.out.queue(Clear(ClearType::All))?;

        for (row, line) in frame.lines.iter().enumerate() {
            self.out.queue(cursor::MoveTo(0, row as u16))?;
            for span in &line.spans {
                if span.attrs.contains(Attr::BOLD) {
                    self.out.queue(SetAttribute(Attribute::Bold))?;
                }
                if span.attrs.contains(Attr::DIM) {
                    self.out.queue(SetAttribute(Attribute::Dim))?;
                }
                if span.attrs.contains(Attr::ITALIC) {
                    self.out.queue(SetAttribute(Attribute::Italic))?;
                }
                if span.attrs.contains(Attr::UNDERLINE) {
                    self.out.queue(SetAttribute(Attribute::Underlined))?;
                }
                if span.attrs.contains(Attr::INVERSE) {
                    self.out.queue(SetAttribute(Attribute::Reverse))?;
                }
                self.out.queue(Print(&span.text))?;
                self.out.queue(SetAttribute(Attribute::Reset))?;
            }
        }
        self.out.flush()?;

        self.previous = Some(frame.clone());
        Ok(true)
    }

    /// Forget the previous frame; the next render is unconditional.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Whether a previous frame is held for comparison.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{Carousel, CarouselOptions, FailingSource};
    use crate::stage::{build_carousel_markup, Stage};
    use crate::state::Scheduler;
    use std::time::Duration;

    fn ready_carousel() -> (Stage, Scheduler, Carousel) {
        let stage = Stage::new();
        build_carousel_markup(&stage, 3);
        let scheduler = Scheduler::new();
        let carousel = Carousel::new(
            &stage,
            &scheduler,
            ".carousel-container",
            CarouselOptions::default(),
        );
        scheduler.advance(Duration::from_millis(800));
        (stage, scheduler, carousel)
    }

    #[test]
    fn test_loading_frame() {
        let stage = Stage::new();
        build_carousel_markup(&stage, 3);
        let scheduler = Scheduler::new();
        let carousel = Carousel::new(
            &stage,
            &scheduler,
            ".carousel-container",
            CarouselOptions::default(),
        );

        let frame = build_frame(&carousel);
        assert!(frame.to_plain_text().contains("正在加载"));
    }

    #[test]
    fn test_ready_frame_shows_active_slide_and_dots() {
        let (_stage, scheduler, carousel) = ready_carousel();

        let frame = build_frame(&carousel);
        let text = frame.to_plain_text();
        assert!(text.contains("Slide 1"));
        assert!(text.contains("● ○ ○"));
        assert!(text.contains("1 / 3"));

        carousel.next();
        scheduler.advance(Duration::from_millis(300));
        let text = build_frame(&carousel).to_plain_text();
        assert!(text.contains("Slide 2"));
        assert!(text.contains("○ ● ○"));
        assert!(text.contains("2 / 3"));
    }

    #[test]
    fn test_error_frame() {
        let stage = Stage::new();
        build_carousel_markup(&stage, 3);
        let scheduler = Scheduler::new();
        let carousel = Carousel::new(
            &stage,
            &scheduler,
            ".carousel-container",
            CarouselOptions {
                source: Box::new(FailingSource::new("down")),
                ..Default::default()
            },
        );
        scheduler.advance(Duration::from_millis(800));

        let text = build_frame(&carousel).to_plain_text();
        assert!(text.contains("内容加载失败"));
        assert!(text.contains("重新加载"));
    }

    #[test]
    fn test_renderer_skips_unchanged_frames() {
        let (_stage, _scheduler, carousel) = ready_carousel();
        let mut renderer = TermRenderer::with_writer(Vec::new());

        let frame = build_frame(&carousel);
        assert!(renderer.render(&frame).unwrap());
        assert!(!renderer.render(&frame).unwrap());

        renderer.invalidate();
        assert!(renderer.render(&frame).unwrap());
    }

    #[test]
    fn test_paused_indicator_follows_hover_gate() {
        let (stage, _scheduler, carousel) = ready_carousel();
        let container = stage.query_selector(".carousel-container").unwrap();

        assert!(!build_frame(&carousel).to_plain_text().contains("已暂停"));

        stage.dispatch_pointer_enter(&container);
        assert!(build_frame(&carousel).to_plain_text().contains("已暂停"));

        stage.dispatch_pointer_leave(&container);
        assert!(!build_frame(&carousel).to_plain_text().contains("已暂停"));
    }
}
