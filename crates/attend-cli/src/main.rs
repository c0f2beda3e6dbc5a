//! `attend`: command-line client for the attendance tracker.
//!
//! # Usage
//!
//! ```
//! attend login --email ada@example.com --password hunter22
//! attend add "Linear Algebra"
//! attend mark algebra present --date 2024-01-10
//! attend stats
//! attend calendar algebra --month 2024-01
//! ```

mod app;
mod lookup;
mod render;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use attend_core::{attendance::AttendanceStatus, session::SessionStore};
use attend_http::{FileTokenStorage, GatewayConfig, HttpGateway, gateway::DEFAULT_BASE_URL};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "attend", version, about = "Track class attendance per subject")]
struct Cli {
  /// Path to a TOML config file (base_url, token_path, timeout_secs).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Base URL of the attendance backend (default: http://localhost:8000).
  #[arg(long, global = true)]
  url: Option<String>,

  /// Where the session token is kept between runs.
  #[arg(long, value_name = "FILE", global = true)]
  token_path: Option<PathBuf>,

  /// Print machine-readable JSON instead of text.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create an account and sign in to it
  Register {
    #[arg(long)]
    name:     String,
    #[arg(long)]
    email:    String,
    #[arg(long, env = "ATTEND_PASSWORD", hide_env_values = true)]
    password: String,
  },
  /// Sign in and remember the session
  Login {
    #[arg(long)]
    email:    String,
    #[arg(long, env = "ATTEND_PASSWORD", hide_env_values = true)]
    password: String,
  },
  /// Forget the stored session
  Logout,
  /// Show the signed-in user
  Whoami,
  /// List subjects
  Subjects,
  /// Add a subject
  Add {
    name:  String,
    /// Display colour, e.g. "#3B82F6"; the server picks one if omitted.
    #[arg(long)]
    color: Option<String>,
  },
  /// Delete a subject and all of its attendance
  Delete {
    /// Subject id or name
    subject: String,
  },
  /// Mark attendance for a subject (present, absent or leave)
  Mark {
    /// Subject id or name
    subject: String,
    status:  AttendanceStatus,
    /// Day to mark, YYYY-MM-DD (default: today)
    #[arg(long)]
    date:    Option<NaiveDate>,
  },
  /// List every marked day for a subject
  History {
    /// Subject id or name
    subject: String,
  },
  /// Attendance percentages for one subject, or all of them
  Stats {
    /// Subject id or name
    subject: Option<String>,
  },
  /// Month view of a subject's attendance
  Calendar {
    /// Subject id or name
    subject: String,
    /// Month to show, YYYY-MM (default: this month)
    #[arg(long, value_parser = parse_month)]
    month:   Option<NaiveDate>,
  },
  /// Statistics as computed by the server
  ServerStats {
    /// Subject id or name
    subject: String,
  },
}

fn parse_month(raw: &str) -> Result<NaiveDate, String> {
  NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
    .map_err(|_| format!("expected a month as YYYY-MM, got {raw:?}"))
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Settings read from the config file and `ATTEND_*` environment variables.
#[derive(Deserialize, Default, Debug)]
struct Settings {
  #[serde(default)]
  base_url:     Option<String>,
  #[serde(default)]
  token_path:   Option<PathBuf>,
  #[serde(default)]
  timeout_secs: Option<u64>,
}

fn config_dir() -> PathBuf {
  expand_tilde(Path::new("~/.config/attend"))
}

fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
  let path = explicit
    .map(Path::to_path_buf)
    .unwrap_or_else(|| config_dir().join("config.toml"));

  config::Config::builder()
    .add_source(
      config::File::from(path.as_path())
        .format(config::FileFormat::Toml)
        .required(explicit.is_some()),
    )
    .add_source(config::Environment::with_prefix("ATTEND"))
    .build()
    .with_context(|| format!("failed to read config file {}", path.display()))?
    .try_deserialize()
    .context("failed to deserialise settings")
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = load_settings(cli.config.as_deref())?;

  // CLI flags override the environment, which overrides the config file.
  let base_url = cli
    .url
    .or(settings.base_url)
    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
  let token_path = cli
    .token_path
    .or(settings.token_path)
    .map(|p| expand_tilde(&p))
    .unwrap_or_else(|| config_dir().join("token"));

  tracing::debug!(%base_url, token_path = %token_path.display(), "starting");

  let session = Arc::new(SessionStore::new(FileTokenStorage::new(token_path)));
  let gateway = HttpGateway::new(
    GatewayConfig {
      base_url,
      timeout: settings.timeout_secs.map(Duration::from_secs),
    },
    session.clone(),
  )
  .context("failed to build HTTP client")?;

  App::new(Arc::new(gateway), session, cli.json)
    .run(cli.command)
    .await
}
