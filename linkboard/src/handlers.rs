use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use linkboard_core::report::{ReportFormat, render_flat, render_grouped, save_report};
use linkboard_core::{LoadOptions, load_flat_view, load_grouped_view};
use linkboard_tui::{ViewerMessage, create_viewer_channel, run_viewer};
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::debug;
use url::Url;

/// Parse an endpoint argument, trying to add http:// if needed
pub fn parse_endpoint(value: &str) -> Result<String, String> {
    let value = value.trim();
    let candidate = if value.contains("://") {
        value.to_string()
    } else {
        format!("http://{}", value)
    };

    match Url::parse(&candidate) {
        Ok(url) if url.host_str().is_some() => Ok(url.to_string()),
        Ok(_) => Err(format!("'{}' has no host", value)),
        Err(e) => Err(format!("'{}' is not a valid URL: {}", value, e)),
    }
}

/// Collect the load settings shared by every subcommand
pub fn load_options_from_args(args: &ArgMatches) -> LoadOptions {
    let defaults = LoadOptions::default();

    LoadOptions {
        endpoint: args
            .get_one::<String>("endpoint")
            .cloned()
            .unwrap_or(defaults.endpoint),
        timeout_secs: args
            .get_one::<u64>("timeout")
            .copied()
            .unwrap_or(defaults.timeout_secs),
        user_agent: args
            .get_one::<String>("user-agent")
            .cloned()
            .unwrap_or(defaults.user_agent),
        show_progress: !args.get_flag("quiet"),
    }
}

/// Expand a leading `~` in an output path
pub fn resolve_output_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

fn report_format(args: &ArgMatches) -> Result<ReportFormat> {
    let name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    ReportFormat::from_str(name).ok_or_else(|| anyhow!("Unknown report format '{}'", name))
}

fn emit_report(report: &str, args: &ArgMatches) -> Result<()> {
    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            let path = resolve_output_path(path);
            save_report(report, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !args.get_flag("quiet") {
                println!("{} Report saved to {}", "✓".green().bold(), path.display());
            }
        }
        None => print!("{}", report),
    }
    Ok(())
}

pub async fn handle_grouped(args: &ArgMatches) -> Result<()> {
    let options = load_options_from_args(args);
    let format = report_format(args)?;
    debug!("Loading grouped view from {}", options.endpoint);

    let view = load_grouped_view(&options).await?;
    let report = render_grouped(&view, format)?;
    emit_report(&report, args)
}

pub async fn handle_flat(args: &ArgMatches) -> Result<()> {
    let options = load_options_from_args(args);
    let format = report_format(args)?;
    debug!("Loading flat view from {}", options.endpoint);

    let view = load_flat_view(&options).await?;
    let report = render_flat(&view, format)?;
    emit_report(&report, args)
}

/// Launch the viewer and feed it the result of a single load
pub async fn handle_ui(args: &ArgMatches) -> Result<()> {
    let options = LoadOptions {
        // The spinner would draw over the alternate screen
        show_progress: false,
        ..load_options_from_args(args)
    };
    let flat = args.get_flag("flat");

    let (tx, rx) = create_viewer_channel();
    let should_exit = Arc::new(AtomicBool::new(false));

    let viewer_exit = should_exit.clone();
    let viewer = tokio::task::spawn_blocking(move || run_viewer(rx, viewer_exit));

    let loader = tokio::spawn(async move {
        let _ = tx.send(ViewerMessage::Loading {
            endpoint: options.endpoint.clone(),
        });

        let message = if flat {
            match load_flat_view(&options).await {
                Ok(view) => ViewerMessage::Flat(view),
                Err(e) => ViewerMessage::Failed(e.to_string()),
            }
        } else {
            match load_grouped_view(&options).await {
                Ok(view) => ViewerMessage::Grouped(view),
                Err(e) => ViewerMessage::Failed(e.to_string()),
            }
        };
        let _ = tx.send(message);
    });

    let result = viewer.await;
    should_exit.store(true, Ordering::Relaxed);
    loader.abort();

    result.context("Viewer task panicked")?
}
