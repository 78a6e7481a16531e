//! Deepline entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::io_ops::read_file;
use core_actions::{CommandError, DisplayOptions, builtin_registry};
use core_config::load_from;
use core_text::Buffer;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod repl;

use repl::{Session, WELCOME_MESSAGE};

const DEFAULT_LOG_FILE: &str = "deepline.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "deepline", version, about = "Line-oriented text editor")]
struct Args {
    /// Optional file to edit. A path that does not exist yet starts an empty
    /// buffer that writes to it.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `deepline.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Log file, truncated at startup.
    #[arg(long = "log-file", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

#[derive(Debug, Clone)]
struct StartupTelemetry {
    opened_path: Option<PathBuf>,
    config_override: bool,
    created: bool,
    open_failed: bool,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn run(&mut self, args: &Args) -> Result<Session> {
        self.configure_logging(&args.log_file)
            .with_context(|| format!("configuring log file {}", args.log_file.display()))?;
        Self::install_panic_hook();
        info!(target: "runtime", "startup");

        let config = load_from(args.config.clone()).context("loading configuration")?;
        let (buffer, telemetry) = Self::load_buffer(args);

        let mut registry = builtin_registry();
        registry.set_display(DisplayOptions::from(&config.file.print));

        let path_str = telemetry
            .opened_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string());
        info!(
            target: "runtime.startup",
            path = path_str.as_deref(),
            created = telemetry.created,
            open_failed = telemetry.open_failed,
            config_override = telemetry.config_override,
            lines = buffer.line_count(),
            "bootstrap_complete"
        );

        if config.welcome() {
            println!("{WELCOME_MESSAGE}");
        }
        if telemetry.open_failed
            && let Some(path) = telemetry.opened_path.as_deref()
        {
            eprintln!("error: could not open {}", path.display());
        }
        Ok(Session::new(registry, buffer, config.prompt()))
    }

    fn configure_logging(&mut self, log_path: &Path) -> Result<()> {
        if log_path.exists() {
            let _ = std::fs::remove_file(log_path);
        }
        let log_dir = match log_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let file_name = log_path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        let file_appender = tracing_appender::rolling::never(log_dir, file_name);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_ansi(false)
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    fn load_buffer(args: &Args) -> (Buffer, StartupTelemetry) {
        let mut telemetry = StartupTelemetry {
            opened_path: args.path.clone(),
            config_override: args.config.is_some(),
            created: false,
            open_failed: false,
        };
        let Some(path) = args.path.as_ref() else {
            return (Buffer::new(), telemetry);
        };

        let buffer = match read_file(path) {
            Ok(norm) => {
                let mut buffer = Buffer::from_lines(norm.lines);
                buffer.line_ending = norm.original;
                buffer.associated_file = Some(path.clone());
                buffer
            }
            Err(CommandError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                warn!(target: "io", file = %path.display(), "file_missing_new_buffer");
                telemetry.created = true;
                let mut buffer = Buffer::new();
                buffer.associated_file = Some(path.clone());
                buffer
            }
            Err(e) => {
                error!(target: "io", error = %e, "file_open_error");
                telemetry.open_failed = true;
                Buffer::new()
            }
        };
        (buffer, telemetry)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut app = AppStartup::new();
    let mut session = app.run(&args)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let reason = session
        .run_loop(stdin.lock(), &mut stdout)
        .context("terminal read/write failed")?;
    if reason == repl::ExitReason::EndOfInput {
        writeln!(stdout)?;
    }
    info!(target: "runtime", "shutdown");
    drop(app.log_guard.take());
    Ok(())
}
