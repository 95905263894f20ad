//! Insight TUI Entry Point
//!
//! Launches the terminal chat for the decision intelligence engine, or asks
//! a single question headlessly.
//!
//! Usage:
//!   insight-tui [OPTIONS]
//!
//! Options:
//!   --endpoint <URL>      Answer service base URL (default: http://localhost:8000)
//!   --timeout <SECS>      Request timeout in seconds (default: 60)
//!   --config <FILE>       Configuration file
//!   --log-file <PATH>     Write logs to this file
//!   --ask <QUESTION>      Ask one question, print the answer and exit

use std::io::{self, IsTerminal};
use std::panic;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use insight_conductor::{
    default_config_path, load_config_from_path, ConductorConfig, ConfigOverrides, LoadedConfig,
    SubmitOutcome, FALLBACK_MESSAGE,
};
use insight_tui::widgets::transcript::plain_lines;
use insight_tui::{App, ConductorClient};

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "insight_conductor=info,insight_tui=info";

/// Insight TUI - chat with the decision intelligence engine
#[derive(Parser, Debug)]
#[command(name = "insight-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Answer service base URL
    #[arg(short = 'e', long, value_name = "URL")]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(short = 't', long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "INSIGHT_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file (the terminal UI owns stdout)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Ask one question without the terminal UI and print the answer
    #[arg(short = 'a', long, value_name = "QUESTION")]
    ask: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let headless = args.ask.is_some();
    init_logging(args.log_file.as_deref(), headless)?;

    let loaded = load_configuration(&args)?;
    tracing::info!(
        source = %loaded.source,
        endpoint = %loaded.conductor.service.base_url,
        "Configuration loaded"
    );

    if let Some(question) = args.ask.as_deref() {
        return run_headless(loaded.conductor, question).await;
    }

    // Check if we have a TTY before attempting initialization
    if !has_tty() {
        eprintln!("Error: insight-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("For scripts and pipelines, ask a single question instead:");
        eprintln!("  insight-tui --ask \"Why is churn high?\"");
        return Ok(ExitCode::FAILURE);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, loaded.conductor).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show goodbye message after TUI closes
    if let Some(goodbye) = result? {
        println!("\n\x1b[36mInsight:\x1b[0m {goodbye}\n");
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: ConductorConfig,
) -> anyhow::Result<Option<String>> {
    let client = ConductorClient::new(config)?;
    let mut app = App::new(client);
    app.run(terminal).await?;
    Ok(app.goodbye().map(str::to_string))
}

/// Ask one question and print the formatted answer to stdout
async fn run_headless(config: ConductorConfig, question: &str) -> anyhow::Result<ExitCode> {
    let mut client = ConductorClient::new(config)?;
    client.start().await?;

    if client.submit(question).await != SubmitOutcome::Accepted {
        eprintln!("Nothing to ask: the question is empty");
        return Ok(ExitCode::from(2));
    }
    client.wait_for_response().await;

    let Some(reply) = client.conductor().session().last() else {
        return Ok(ExitCode::FAILURE);
    };
    for line in plain_lines(&reply.text) {
        println!("{line}");
    }

    if reply.text == FALLBACK_MESSAGE {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Resolve configuration: CLI > environment > file > defaults
fn load_configuration(args: &Args) -> anyhow::Result<LoadedConfig> {
    let path = args.config.clone().or_else(default_config_path);
    let mut loaded = load_config_from_path(path.as_deref())?;

    let mut overrides = ConfigOverrides::new();
    if let Some(ref url) = args.endpoint {
        overrides = overrides.with_base_url(url.clone());
    }
    if let Some(secs) = args.timeout {
        overrides = overrides.with_timeout_secs(secs);
    }
    overrides.apply(&mut loaded);

    loaded.validate()?;
    Ok(loaded)
}

/// Set up logging
///
/// Headless runs log to stderr. The terminal UI logs only to `log_file`,
/// if given, since the alternate screen owns stdout.
fn init_logging(log_file: Option<&Path>, headless: bool) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .with(filter)
            .init();
    } else if headless {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .with(filter)
            .init();
    }

    Ok(())
}

fn has_tty() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}
