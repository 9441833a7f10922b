//! An infinitely looping card carousel for the terminal.
//!
//! The strip advances on its own until the primary action is triggered;
//! drag it with the mouse (or step with the arrow keys) and it wraps
//! seamlessly in both directions.
//! Run with `--print-config` to dump the effective configuration as TOML.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Alignment,
    text::Line,
    widgets::{Block, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use unicode_width::UnicodeWidthStr;

use crate::app::{
    event::{spawn_event_reader, AppEvent, DelayedStart},
    handler,
    state::{AppState, HitZones},
};
use crate::config::{Action, AppConfig};
use crate::core::entrance::ElementStyle;
use crate::ui::{
    carousel_widget::CarouselWidget, headline::HeadlineWidget, layout::AppLayout,
    spinner::AutoscrollIndicator, theme::Theme,
};

/// Redraw / momentum cadence.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// How long the input reader blocks per poll.
const INPUT_POLL: Duration = Duration::from_millis(50);

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Infinitely looping card carousel")]
struct Cli {
    /// Config file (defaults to `$XDG_CONFIG_HOME/loop-carousel/config.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file.  Without it logs are discarded, since the
    /// TUI owns stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start with autoscroll already stopped.
    #[arg(long)]
    no_autoscroll: bool,

    /// Skip the entrance animation.
    #[arg(long)]
    no_entrance: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

/// Where log lines go.  The alternate screen is drawn on stderr, so without
/// a log file there is nowhere safe to write and logs are dropped.
fn log_writer(log_file: Option<&Path>) -> Result<BoxMakeWriter> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
        None => Ok(BoxMakeWriter::new(io::sink)),
    }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(log_writer(log_file)?)
        .init();
    Ok(())
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    let layout = AppLayout::from_area(area);

    // Layout pass: re-measure only when the strip width changed.
    state
        .carousel
        .layout(f64::from(layout.carousel_area.width));

    let entrance = state.entrance_snapshot();
    let snapshot = state.carousel.snapshot();

    frame.render_widget(
        Block::default().style(Theme::ambient_style(state.ambient.color())),
        area,
    );

    frame.render_widget(
        HeadlineWidget {
            text: &state.config.headline,
            progress: entrance.title,
        },
        layout.headline_area,
    );

    let slots = state.carousel.slots();
    frame.render_widget(
        CarouselWidget {
            deck: state.carousel.deck(),
            slots: &slots,
            offset: snapshot.offset,
            active: snapshot.active_index,
            style: ElementStyle::from_progress(entrance.elements),
        },
        layout.carousel_area,
    );
    frame.render_widget(
        AutoscrollIndicator {
            running: snapshot.autoscroll_running,
            tick: state.frame_count,
        },
        layout.carousel_area,
    );

    let label = format!("  {}  ", Action::PrimaryAction.label());
    let button = layout.button_rect(label.width() as u16);
    frame.render_widget(
        Paragraph::new(Line::from(label))
            .alignment(Alignment::Center)
            .style(Theme::button_style(snapshot.autoscroll_running)),
        button,
    );

    let card = snapshot.active_card_id.as_deref().unwrap_or("-");
    let status_text = match state.status_message.as_deref() {
        Some(msg) => format!(" {msg} | {}", state.config.status_bar_hint()),
        None => format!(
            " {card} @ {:.1} | {:?} | {}",
            snapshot.offset,
            snapshot.phase,
            state.config.status_bar_hint()
        ),
    };
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );

    state.hit = HitZones {
        carousel: layout.carousel_area,
        button,
    };
}

// ───────────────────────────────────────── main loop ─────────

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
    events: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut autoscroll = tokio::time::interval(state.carousel.settings().tick_interval());
    autoscroll.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m, Instant::now()),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::EntranceStart => handler::start_entrance(state, Instant::now()),
                }
            }

            _ = autoscroll.tick() => handler::on_autoscroll_tick(state),

            _ = frames.tick() => {
                handler::on_frame(state, Instant::now());
                terminal.draw(|frame| draw(frame, state))?;
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }
    if cli.no_autoscroll {
        config.carousel.autoscroll = false;
    }
    if cli.no_entrance {
        config.entrance_enabled = false;
    }

    let startup_delay = config.entrance.startup_delay;
    let mut state = AppState::new(config, Instant::now());

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let (tx, mut events) = mpsc::unbounded_channel();
    spawn_event_reader(tx.clone(), INPUT_POLL);
    let pending_start = state
        .entrance_enabled
        .then(|| DelayedStart::spawn(startup_delay, tx));

    let result = run(&mut terminal, &mut state, &mut events).await;

    // ── teardown ──────────────────────────────────────────────
    drop(pending_start);
    drop(events);
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!(
        autoscroll_ticks = state.carousel.autoscroll_ticks(),
        wraps = state.carousel.chain().wraps(),
        "carousel closed"
    );
    result
}
