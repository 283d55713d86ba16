//! Terminal Demo - The carousel running in a real terminal.
//!
//! This demo shows everything working together:
//! - Static markup consumed and re-stamped by the widget
//! - Auto-scroll with hover-pause (simulated with the 'h' key)
//! - Arrow-key and dot navigation
//! - The error state and its reload flow ('e' mounts a failing source)
//!
//! Keys: Left/Right navigate, 1-3 jump, h toggle hover, e break the source,
//! r retry (in the error state), q or Ctrl+C exit.
//!
//! Run with: cargo run --example terminal

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};

use spark_carousel::stage::events::{KeyboardEvent, ARROW_LEFT, ARROW_RIGHT};
use spark_carousel::{
    build_carousel_markup, mount, CarouselOptions, FailingSource, MountHandle, MountOptions,
    Scheduler, Stage, TermRenderer,
};

fn mount_carousel(stage: &Stage, scheduler: &Scheduler, failing: bool) -> MountHandle {
    let carousel = if failing {
        CarouselOptions {
            source: Box::new(FailingSource::new("demo backend unavailable")),
            ..Default::default()
        }
    } else {
        CarouselOptions::default()
    };
    mount(
        stage,
        scheduler,
        ".carousel-container",
        MountOptions {
            name: Some("demo".to_string()),
            carousel,
        },
        TermRenderer::stdout(),
    )
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    terminal::enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;

    let result = run();

    execute!(io::stdout(), cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run() -> io::Result<()> {
    let stage = Stage::new();
    let container = build_carousel_markup(&stage, 3);
    let scheduler = Scheduler::new();

    let mut handle = mount_carousel(&stage, &scheduler, false);
    let mut hovered = false;

    loop {
        handle.tick();

        // The error-state retry control sets this flag; a "reload" here is a
        // fresh mount with a working source.
        if stage.take_reload_request() {
            handle.unmount();
            handle = mount_carousel(&stage, &scheduler, false);
        }

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Left => stage.dispatch_key(&KeyboardEvent::new(ARROW_LEFT)),
            KeyCode::Right => stage.dispatch_key(&KeyboardEvent::new(ARROW_RIGHT)),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                let dots = stage.query_selector_all(".carousel-dot");
                if let Some(dot) = dots.get(index) {
                    stage.dispatch_click(dot);
                }
            }
            KeyCode::Char('h') => {
                if hovered {
                    stage.dispatch_pointer_leave(&container);
                } else {
                    stage.dispatch_pointer_enter(&container);
                }
                hovered = !hovered;
            }
            KeyCode::Char('e') => {
                handle.unmount();
                handle = mount_carousel(&stage, &scheduler, true);
            }
            KeyCode::Char('r') => {
                if let Some(retry) = stage.query_selector(".carousel-retry") {
                    stage.dispatch_click(&retry);
                }
            }
            _ => {}
        }
    }

    handle.unmount();
    Ok(())
}
