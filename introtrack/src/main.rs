//! introtrack - admin CLI for the walkthrough analytics pipeline
//!
//! This tool provides commands for:
//! - Rendering the collector's aggregate summary in the terminal
//! - Sending diagnostic events through the tracker
//! - Checking collector configuration
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/introtrack/config.toml (~/.config/introtrack/config.toml)
//! - Logs: $XDG_STATE_HOME/introtrack/ (~/.local/state/introtrack/)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use introtrack_core::render::{EventRow, LanguageRow, MetricCards};
use introtrack_core::{
    BlockingTracker, Config, Dashboard, DashboardStatus, DashboardView, ReadTransport,
    SummaryClient, SummarySnapshot,
};

#[derive(Parser)]
#[command(name = "introtrack")]
#[command(about = "Walkthrough analytics admin CLI")]
#[command(version)]
struct Args {
    /// Verbose output (writes a log file)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the aggregate summary and render the admin dashboard
    Summary {
        /// Print the normalized snapshot as JSON instead of rendering
        #[arg(long)]
        json: bool,
    },

    /// Send one event through the tracker (diagnostic)
    Send {
        /// Event type, open vocabulary (e.g. page_view)
        event_type: String,

        /// Event attributes as key=value pairs
        #[arg(short, long = "data", value_name = "KEY=VALUE")]
        data: Vec<String>,
    },

    /// Show collector configuration
    Status,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    let config = Config::load().context("failed to load configuration")?;

    let _log_guard = if args.verbose {
        Some(
            introtrack_core::logging::init(&config.logging)
                .context("failed to initialize logging")?,
        )
    } else {
        None
    };

    match args.command {
        Command::Summary { json } => cmd_summary(&config, json),
        Command::Send { event_type, data } => cmd_send(&config, &event_type, &data),
        Command::Status => cmd_status(&config),
    }
}

fn cmd_summary(config: &Config, as_json: bool) -> Result<()> {
    let client = SummaryClient::new(&config.collector)
        .context("collector is not configured; set collector.url in config.toml")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;

    if as_json {
        let value = runtime
            .block_on(client.fetch_summary())
            .context("summary fetch failed")?;
        let snapshot = SummarySnapshot::from_value(&value, config.collector.rate_convention)
            .context("summary response could not be normalized")?;
        println!("{}", serde_json::to_string_pretty(&snapshot_json(&snapshot))?);
        return Ok(());
    }

    let dashboard = Dashboard::new(client, config.collector.rate_convention);
    let mut view = TerminalView;
    runtime.block_on(dashboard.load_summary(&mut view));

    Ok(())
}

/// Normalized snapshot as a JSON object, for `summary --json`
fn snapshot_json(snapshot: &SummarySnapshot) -> Value {
    json!({
        "totals": {
            "learners": snapshot.totals.learners,
            "completions": snapshot.totals.completions,
            "completionRate": snapshot.totals.completion_rate,
        },
        "registrationsByLanguage": &snapshot.registrations_by_language,
        "completionsByLanguage": &snapshot.completions_by_language,
        "eventCounts": &snapshot.event_counts,
    })
}

fn cmd_send(config: &Config, event_type: &str, data: &[String]) -> Result<()> {
    let tracker = BlockingTracker::from_config(&config.collector)
        .context("failed to create tracker")?
        .context("collector is not configured; set collector.url in config.toml")?;

    let mut attributes = serde_json::Map::new();
    for pair in data {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("invalid --data value {:?}, expected KEY=VALUE", pair))?;
        attributes.insert(key.to_string(), parse_scalar(value));
    }

    tracker.track(event_type, Value::Object(attributes));

    // Drains the queue; delivery outcome is only visible in the log
    tracker.shutdown();

    println!("Dispatched '{}' to the collector.", event_type);
    Ok(())
}

/// Parse a CLI attribute value as bool, number, or string
fn parse_scalar(raw: &str) -> Value {
    if raw == "true" {
        return Value::Bool(true);
    }
    if raw == "false" {
        return Value::Bool(false);
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = raw.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

fn cmd_status(config: &Config) -> Result<()> {
    println!("Collector Configuration");
    println!("=======================");
    println!();

    let collector = &config.collector;

    match &collector.url {
        Some(url) => println!("URL:             {}", url),
        None => {
            println!("URL:             (not set)");
            println!();
            println!("Tracking is disabled. Configure the collector in {:?}:", Config::config_path());
            println!();
            println!("  [collector]");
            println!("  url = \"https://collector.example.com/exec\"");
            return Ok(());
        }
    }

    println!("Timeout:         {}s", collector.timeout_secs);
    println!("Transport:       {:?}", collector.transport);
    println!("Callback name:   {}", collector.callback_name);
    println!("Rate convention: {:?}", collector.rate_convention);

    Ok(())
}

/// Renders the dashboard surfaces to stdout
///
/// A terminal is a write-once surface, so "replacing" a surface on
/// re-render simply means printing it again; interactive reloads are not a
/// CLI concern.
struct TerminalView;

impl DashboardView for TerminalView {
    fn set_status(&mut self, status: DashboardStatus) {
        match status {
            DashboardStatus::Loading => println!("Loading analytics…"),
            DashboardStatus::Live => println!("Analytics live"),
            DashboardStatus::Error => println!("Error loading analytics"),
        }
    }

    fn show_metrics(&mut self, cards: &MetricCards) {
        println!();
        println!("  Learners:        {}", cards.learners);
        println!("  Completions:     {}", cards.completions);
        println!("  Completion rate: {}", cards.rate_display());
        println!();
    }

    fn show_languages(&mut self, rows: &[LanguageRow]) {
        println!("BY LANGUAGE");
        if rows.is_empty() {
            println!("  No learner data yet.");
        } else {
            for row in rows {
                println!("  {}", row.pill_label());
            }
        }
        println!();
    }

    fn show_events(&mut self, rows: &[EventRow]) {
        println!("EVENTS");
        if rows.is_empty() {
            println!("  No events logged yet.");
        } else {
            for row in rows {
                println!("  {:<28} {}", row.event_type, row.count);
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar() {
        assert_eq!(parse_scalar("true"), Value::Bool(true));
        assert_eq!(parse_scalar("false"), Value::Bool(false));
        assert_eq!(parse_scalar("42"), json!(42));
        assert_eq!(parse_scalar("2.5"), json!(2.5));
        assert_eq!(parse_scalar("es"), json!("es"));
    }

    #[test]
    fn test_snapshot_json_uses_wire_names() {
        let snapshot = SummarySnapshot::default();
        let value = snapshot_json(&snapshot);
        assert!(value.get("totals").is_some());
        assert!(value.get("registrationsByLanguage").is_some());
        assert!(value.get("eventCounts").is_some());
    }
}
