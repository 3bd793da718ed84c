mod actions;
mod app;
mod capture;
mod clipboard;
mod config;
mod error;
mod event;
mod filter;
mod history;
mod http;
mod raw;
mod state;
mod terminal;
mod ui;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::capture::{RequestLog, har::load_har, watch::follow};
use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::event::Event;
use crate::filter::{Category, FilterState, compile_pattern, compute_visibility};
use crate::http::transport::ReqwestTransport;
use crate::raw::format_request;
use crate::state::captured::CapturedRequest;

const TICK_RATE: Duration = Duration::from_millis(80);

#[derive(Parser, Debug)]
#[command(name = "repeater")]
#[command(version, about = "Inspect, edit and replay captured HTTP requests", long_about = None)]
struct Cli {
    /// HAR file with captured requests
    #[arg(env = "REPEATER_CAPTURE")]
    capture: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "REPEATER_CONFIG")]
    config: Option<PathBuf>,

    /// Do not re-read the capture file when it changes
    #[arg(long)]
    no_follow: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "REPEATER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log file path (defaults to the data directory)
    #[arg(long, env = "REPEATER_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Print the visible requests as raw HTTP and exit
    #[arg(long)]
    dump: bool,

    /// Initial search term
    #[arg(short, long)]
    search: Option<String>,

    /// Treat the search term as a regular expression
    #[arg(long)]
    regex: bool,

    /// Category filter: all, starred or an HTTP method
    #[arg(long, default_value = "all")]
    category: Category,

    /// Print the default configuration and exit
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        print!("{}", Config::default().to_toml()?);
        return Ok(());
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    init_logging(&cli, &config)?;

    let records = match &cli.capture {
        Some(path) => load_har(path)
            .with_context(|| format!("failed to read capture {}", path.display()))?,
        None => Vec::new(),
    };
    let filter = FilterState {
        search_term: cli.search.clone().unwrap_or_default(),
        regex_mode: cli.regex,
        category: cli.category.clone(),
    };

    if cli.dump {
        return dump(records, &filter);
    }
    run_tui(&cli, &config, records, filter).await
}

fn init_logging(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    // Headless output stays quiet unless asked otherwise.
    let level = match (&cli.log_level, cli.dump) {
        (Some(level), _) => level.as_str(),
        (None, true) => "warn",
        (None, false) => config.log_level.as_str(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.dump {
        subscriber.with(fmt::layer().with_writer(std::io::stderr)).init();
        return Ok(());
    }

    // The terminal belongs to the UI, so logs go to a file.
    let (dir, file_name) = match &cli.log_file {
        Some(path) => (
            path.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "repeater.log".to_string()),
        ),
        None => (Config::data_dir().join("logs"), "repeater.log".to_string()),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, file_name);
    subscriber
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();
    Ok(())
}

/// Headless mode: print every visible request, each under a `### <index>`
/// line, in capture order.
fn dump(records: Vec<CapturedRequest>, filter: &FilterState) -> anyhow::Result<()> {
    let mut log = RequestLog::new();
    log.ingest(records);
    let visibility = compute_visibility(log.as_slice(), filter);
    if let (true, Err(e)) = (visibility.regex_error, compile_pattern(&filter.search_term)) {
        eprintln!("warning: invalid regex, no request matches\n{}", e);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for idx in visibility.visible {
        if let Some(request) = log.get(idx) {
            writeln!(out, "### {}", idx)?;
            writeln!(out, "{}", format_request(request))?;
            writeln!(out)?;
        }
    }
    Ok(())
}

async fn run_tui(
    cli: &Cli,
    config: &Config,
    records: Vec<CapturedRequest>,
    filter: FilterState,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();

    // Background thread: read crossterm events and feed into channel
    let event_tx = tx.clone();
    std::thread::spawn(move || loop {
        if crossterm::event::poll(TICK_RATE).unwrap_or(false) {
            let event = match crossterm::event::read() {
                Ok(crossterm::event::Event::Key(key)) => Event::Key(key),
                Ok(crossterm::event::Event::Mouse(mouse)) => Event::Mouse(mouse),
                Ok(crossterm::event::Event::Resize(..)) => Event::Resize,
                _ => continue,
            };
            if event_tx.send(event).is_err() {
                break;
            }
        } else if event_tx.send(Event::Tick).is_err() {
            break;
        }
    });

    let transport = ReqwestTransport::new(config.request_timeout)?;
    let mut app = App::new(transport, Clipboard::system(), tx.clone(), config.history_limit);
    app.state.filter = filter;
    app.load_capture(cli.capture.clone(), records);

    // Dropping the watcher stops following, so it lives until the loop ends.
    let _watcher = match &cli.capture {
        Some(path) if config.follow_capture && !cli.no_follow => match follow(path, tx.clone()) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(error = %e, "cannot follow capture file");
                None
            }
        },
        _ => None,
    };
    drop(tx);

    let mut terminal = terminal::init()?;
    let result = run_loop(&mut terminal, &mut app, &mut rx).await;

    terminal::restore()?;
    result
}

async fn run_loop<T: http::transport::Transport>(
    terminal: &mut terminal::Tui,
    app: &mut App<T>,
    rx: &mut mpsc::UnboundedReceiver<Event>,
) -> anyhow::Result<()> {
    loop {
        if app.state.dirty {
            terminal.draw(|frame| ui::layout::render(frame, &app.state))?;
            app.state.dirty = false;
        }

        match rx.recv().await {
            Some(event) => app.handle_event(event),
            None => break,
        }

        if app.state.should_quit {
            break;
        }
    }
    Ok(())
}
