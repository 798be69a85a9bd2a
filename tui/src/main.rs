//! redstream
//!
//! Infinitely scrolling terminal feed of Reddit communities.

mod app;
mod events;
mod ui;

use std::fs::OpenOptions;
use std::io::stdout;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use app::App;
use chrono::Utc;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use events::{Event, EventHandler};
use ratatui::prelude::*;
use redstream_feed::{
    render_feed_text, ApplyOutcome, Config, ContentSource, RedditClientImpl, SortOrder,
    StreamSettings, StreamView, Topic,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,redstream_feed=debug,redstream=debug";
const TICK_RATE: Duration = Duration::from_millis(120);

#[derive(Parser, Debug)]
#[command(name = "redstream")]
#[command(about = "Infinitely scrolling terminal feed for Reddit communities")]
#[command(version)]
struct Args {
    /// Community to open: rust, r/rust or rust+programming
    topic: Option<String>,

    /// Listing sort order (hot, new, top, rising, controversial)
    #[arg(short, long)]
    sort: Option<SortOrder>,

    /// Posts per page (overrides REDSTREAM_PAGE_LIMIT)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=100))]
    limit: Option<u32>,

    /// Print the first PAGES pages as text instead of opening the UI
    #[arg(long, value_name = "PAGES", value_parser = clap::value_parser!(u32).range(1..))]
    dump: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(limit) = args.limit {
        config.page_limit = limit;
    }

    init_logging(&config, args.dump.is_some())?;

    let topic = Topic::parse(args.topic.as_deref().unwrap_or(&config.default_topic))?;
    let source = Arc::new(RedditClientImpl::new(&config)?);
    let mut view = StreamView::new(source, topic, StreamSettings::from(&config));
    if let Some(sort) = args.sort {
        view = view.with_sort(sort);
    }

    match args.dump {
        Some(pages) => dump(view, pages).await,
        None => run_interactive(view).await,
    }
}

fn init_logging(config: &Config, to_stderr: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if to_stderr {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        // Anything written to the terminal would tear the UI
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

/// Load up to `pages` pages one after another and print the feed.
/// The feed is printed even when a fetch fails; the failure is then the error.
async fn dump<CS>(mut view: StreamView<CS>, pages: u32) -> Result<()>
where
    CS: ContentSource + 'static,
{
    let loaded = load_pages(&mut view, pages).await;
    view.on_stop();

    print!("{}", render_feed_text(view.state(), Utc::now()));
    loaded
}

/// Fetch pages until `pages` have arrived, the feed ends, or a fetch fails
async fn load_pages<CS>(view: &mut StreamView<CS>, pages: u32) -> Result<()>
where
    CS: ContentSource + 'static,
{
    view.on_start();
    let mut fetched = 0;
    while let Some(outcome) = view.next_outcome().await {
        if outcome == ApplyOutcome::Failed {
            let message = view.state().error().unwrap_or("fetch failed");
            anyhow::bail!("Failed to load {}: {}", view.state().topic(), message);
        }
        fetched += 1;
        if fetched >= pages || !view.load(false) {
            break;
        }
    }
    Ok(())
}

async fn run_interactive<CS>(view: StreamView<CS>) -> Result<()>
where
    CS: ContentSource + 'static,
{
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(view);
    let result = run_app(&mut terminal, &mut app, EventHandler::new(TICK_RATE)).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B, CS>(
    terminal: &mut Terminal<B>,
    app: &mut App<CS>,
    mut events: EventHandler,
) -> Result<()>
where
    B: Backend,
    CS: ContentSource + 'static,
{
    app.start();
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;
        app.sync_viewport();

        match events.next().await? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.handle_key(key),
            Event::Resize(_, _) => app.on_resize(),
        }
        app.poll();

        if app.should_quit {
            break;
        }
    }
    app.stop();
    Ok(())
}
