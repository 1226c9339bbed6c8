//! Companion TUI Entry Point
//!
//! Launches the terminal home screen.
//!
//! Usage:
//!   companion-tui [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>        Configuration file (default: XDG config dir)
//!       --seed <N>             Seed for the simulated assistant
//!       --transition-ms <MS>   Settle animation duration
//!       --page-width <PT>      Page width in points
//!       --countdown <DATE>     Countdown target (YYYY-MM-DD[THH:MM:SS])
//!       --log-file <FILE>      Log file (default: XDG cache dir)

use std::fs::{self, File};
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
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
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use companion_core::config::{load_config_from_path, parse_countdown_target};
use companion_core::{AppState, CompanionConfig, ConfigOverrides, ConversationSimulator, SystemClock};
use companion_tui::App;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "companion-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "COMPANION_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for reply delays and choices (random if omitted)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Settle animation duration in milliseconds
    #[arg(long, value_name = "MS")]
    transition_ms: Option<u64>,

    /// Page width in points
    #[arg(long, value_name = "PT")]
    page_width: Option<f32>,

    /// Countdown target (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(long, value_name = "DATE")]
    countdown: Option<String>,

    /// Log file path (default: companion/companion-tui.log in the cache dir)
    #[arg(long, env = "COMPANION_LOG_FILE", value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Log file name under the cache directory
const LOG_FILE_NAME: &str = "companion-tui.log";

/// Where logs go: the explicit path, else the XDG cache dir
///
/// Never stderr, since the terminal belongs to the alternate screen.
fn log_path(explicit: Option<&PathBuf>) -> Option<PathBuf> {
    explicit
        .cloned()
        .or_else(|| dirs::cache_dir().map(|dir| dir.join("companion").join(LOG_FILE_NAME)))
}

fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    // No cache dir and no --log-file: stay silent rather than draw over the UI
    let Some(path) = path else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("creating log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("companion_tui=warn,companion_core=warn"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();
    Ok(())
}

fn resolve_config(args: &Args) -> anyhow::Result<CompanionConfig> {
    let mut config = load_config_from_path(args.config.clone())?;

    let mut overrides = ConfigOverrides::new();
    if let Some(ms) = args.transition_ms {
        overrides = overrides.with_transition_ms(ms);
    }
    if let Some(width) = args.page_width {
        overrides = overrides.with_page_width(width);
    }
    if let Some(raw) = args.countdown.as_deref() {
        overrides = overrides.with_countdown_target(parse_countdown_target(raw)?);
    }
    overrides.apply(&mut config);
    config.validate()?;

    info!(source = ?config.source(), path = ?config.config_file_path, "Configuration resolved");
    Ok(config)
}

fn build_state(config: &CompanionConfig, seed: Option<u64>) -> AppState<SystemClock> {
    match seed {
        Some(seed) => {
            let conversation =
                ConversationSimulator::with_rng(&config.conversation, StdRng::seed_from_u64(seed));
            AppState::with_parts(config, SystemClock, conversation)
        }
        None => AppState::new(config),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(log_path(args.log_file.as_ref()).as_deref())?;
    let config = resolve_config(&args)?;

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: companion-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  - Running in a non-interactive environment (CI, container)");
        eprintln!("  - SSH without -t flag");
        eprintln!("  - Piped stdin/stdout");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
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
    let mut app = App::with_state(build_state(&config, args.seed));
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_log_file_wins() {
        let explicit = PathBuf::from("/tmp/companion-debug.log");
        assert_eq!(log_path(Some(&explicit)), Some(explicit));
    }

    #[test]
    fn test_default_log_file_lives_in_cache_dir() {
        let Some(cache) = dirs::cache_dir() else {
            assert_eq!(log_path(None), None);
            return;
        };
        let path = log_path(None).expect("cache dir resolves a log path");
        assert!(path.starts_with(cache));
        assert!(path.ends_with("companion/companion-tui.log"));
    }

    #[test]
    fn test_args_parse_log_file() {
        let args = Args::try_parse_from(["companion-tui", "--log-file", "/tmp/x.log", "--seed", "7"])
            .expect("valid args");
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/x.log")));
        assert_eq!(args.seed, Some(7));
    }
}
