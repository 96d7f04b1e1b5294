use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use devicefarm_resources::config::Config;
use devicefarm_resources::devicefarm::client::DeviceFarmClient;
use devicefarm_resources::resource::device_pool::DevicePoolHandler;
use devicefarm_resources::resource::project::ProjectHandler;
use devicefarm_resources::resource::{LifecycleEvent, ResourceHandler};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Handle one custom resource lifecycle event for AWS Device Farm
#[derive(Parser, Debug)]
#[command(name = "devicefarm-resources", version, about, long_about = None)]
struct Args {
    /// Resource type the event is for
    #[arg(value_enum)]
    resource: ResourceArg,

    /// Event JSON file (reads stdin when omitted or "-")
    #[arg(short, long)]
    event: Option<PathBuf>,

    /// AWS region of the Device Farm endpoint
    #[arg(short, long)]
    region: Option<String>,

    /// Device Farm endpoint override
    #[arg(long)]
    endpoint: Option<String>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResourceArg {
    Project,
    DevicePool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let (non_blocking, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            tracing_appender::non_blocking(file)
        }
        // stdout carries the response, logs go to stderr
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Ok(Some(guard))
}

fn read_event(path: Option<&Path>) -> Result<LifecycleEvent> {
    let raw = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {:?}", path))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read event from stdin")?;
            buf
        }
    };

    serde_json::from_str(&raw).context("Failed to parse lifecycle event")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_deref())?;

    let event = read_event(args.event.as_deref())?;

    let config = Config::load()
        .with_env()
        .with_overrides(args.region.clone(), args.endpoint.clone());
    let client = DeviceFarmClient::new(&config)?;

    let result = match args.resource {
        ResourceArg::Project => ProjectHandler::new(&client).handle(&event).await,
        ResourceArg::DevicePool => DevicePoolHandler::new(&client).handle(&event).await,
    };

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("{} {:?} failed: {}", event.request_type, args.resource, e);
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
