// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use crossterm::event::{Event, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chordchart::config::{AppConfig, SettingsEvent, SettingsWatcher};
use chordchart::loader::{cancellation, load_snapshot, JobSnapshot};
use chordchart::model::{ChartSettings, ChordStyle, Simplification, ViewMode};
use chordchart::source::{FileSource, HttpSource, JobSource};
use chordchart::ui::{App, KeyAction, UiState};
use chordchart::view::{render_text, JobView};
use chordchart::LoadError;

fn print_usage() {
    println!("chordchart - Chord charts with synchronized lyrics");
    println!();
    println!("Usage: chordchart [OPTIONS] <JOB_ID>...");
    println!();
    println!("Options:");
    println!("  --config <PATH>           YAML config file (default: ./chordchart.yaml)");
    println!("  --dir <PATH>              Read jobs from a local directory instead of the API");
    println!("  --simplification <LEVEL>  basic | simple | complex");
    println!("  --style <STYLE>           pop | jazz");
    println!("  --view <MODE>             both | lyrics | chords");
    println!("  --print                   Print a text chart instead of opening the viewer");
    println!("  --json                    Print the derived chart as JSON");
    println!("  --help                    Show this help message");
    println!();
    println!("Environment:");
    println!("  MUSIC_AI_KEY              API key for the job API");
    println!("  CHORDCHART_API_URL        Override the API base URL");
    println!("  RUST_LOG                  Log filter (logs go to stderr)");
}

/// Parsed command line
#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    dir: Option<PathBuf>,
    simplification: Option<Simplification>,
    style: Option<ChordStyle>,
    view: Option<ViewMode>,
    print: bool,
    json: bool,
    job_ids: Vec<String>,
}

impl CliArgs {
    fn interactive(&self) -> bool {
        !(self.print || self.json)
    }
}

/// Parse arguments after the program name; `None` means help was requested
fn parse_args(args: &[String]) -> Result<Option<CliArgs>> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| anyhow!("{} requires a value", name))
        };

        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--config" => cli.config = Some(PathBuf::from(value("--config")?)),
            "--dir" => cli.dir = Some(PathBuf::from(value("--dir")?)),
            "--simplification" => cli.simplification = Some(value("--simplification")?.parse()?),
            "--style" => cli.style = Some(value("--style")?.parse()?),
            "--view" => cli.view = Some(value("--view")?.parse()?),
            "--print" => cli.print = true,
            "--json" => cli.json = true,
            other if other.starts_with("--") => bail!("Unknown option: {}", other),
            job_id => cli.job_ids.push(job_id.to_string()),
        }
    }

    if cli.job_ids.is_empty() {
        bail!("at least one job id is required");
    }
    Ok(Some(cli))
}

fn setup_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err: Box<dyn std::error::Error + Send + Sync>| {
            anyhow!("failed to initialise tracing: {err}")
        })?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        println!("chordchart - Chord charts with synchronized lyrics");
        println!("Run with --help for usage information");
        return Ok(());
    }

    let cli = match parse_args(&args) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            print_usage();
            process::exit(1);
        }
    };

    // The viewer owns the terminal, so it logs nothing unless asked to
    setup_tracing(if cli.interactive() { "off" } else { "warn" })?;

    let config = AppConfig::load(cli.config.as_deref())?;
    let mut settings = config.settings();
    if let Some(simplification) = cli.simplification {
        settings.simplification = simplification;
    }
    if let Some(style) = cli.style {
        settings.style = style;
    }
    let mode = cli.view.unwrap_or(config.view_mode());

    match &cli.dir {
        Some(dir) => {
            info!(dir = ?dir, "reading jobs from directory");
            run(&FileSource::new(dir), &cli, &config, settings, mode).await
        }
        None => {
            // Fail before any fetch or render when no key is configured
            let key = config.require_api_key()?;
            let source = HttpSource::new(config.api_base_url(), key)?;
            run(&source, &cli, &config, settings, mode).await
        }
    }
}

async fn run<S: JobSource>(
    source: &S,
    cli: &CliArgs,
    config: &AppConfig,
    settings: ChartSettings,
    mode: ViewMode,
) -> Result<()> {
    if cli.interactive() {
        return run_viewer(source, &cli.job_ids, config, settings, mode).await;
    }

    let (_guard, token) = cancellation();
    for job_id in &cli.job_ids {
        let snapshot = match load_snapshot(source, job_id, &token).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                eprintln!("Warning: {}", err);
                JobSnapshot::empty(job_id.as_str())
            }
        };

        let view = JobView::new(snapshot, settings);
        if cli.json {
            println!("{}", view.to_json()?);
        } else {
            print!("{}", render_text(&view, mode));
        }
    }
    Ok(())
}

async fn run_viewer<S: JobSource>(
    source: &S,
    job_ids: &[String],
    config: &AppConfig,
    mut settings: ChartSettings,
    mode: ViewMode,
) -> Result<()> {
    let watcher = match config.path() {
        Some(path) => match SettingsWatcher::new(path, None) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                warn!(error = %err, "settings hot reload disabled");
                None
            }
        },
        None => None,
    };

    let mut app = App::new(UiState {
        mode,
        job_count: job_ids.len(),
        ..Default::default()
    })?;

    let mut pending = Some(0);
    while app.is_running() {
        if let Some(index) = pending.take() {
            app.state_mut().job_index = index;
            load_job(&mut app, source, &job_ids[index], settings).await?;
            continue;
        }

        for event in watcher.iter().flat_map(SettingsWatcher::recv_all) {
            match event {
                SettingsEvent::Reloaded(file) => {
                    settings = file.chart.settings();
                    app.state_mut().apply_config(&file.chart);
                }
                SettingsEvent::Error(message) => app.state_mut().set_status(message),
            }
        }

        app.state_mut().clear_expired_status();
        app.draw()?;

        if let Some(Event::Key(key)) = app.poll_event()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let action = app.handle_key(key.code, key.modifiers);
            match app.state().load_target(&action) {
                Some(index) => pending = Some(index),
                None if matches!(action, KeyAction::NextJob | KeyAction::PrevJob) => {
                    app.state_mut().set_status("No more jobs")
                }
                None => {}
            }
            // Keyboard changes carry over to the next job
            if let Some(current) = app.state().settings() {
                settings = current;
            }
        }
    }

    Ok(())
}

/// Load one job into the viewer, redrawing and watching for Esc meanwhile
async fn load_job<S: JobSource>(
    app: &mut App,
    source: &S,
    job_id: &str,
    settings: ChartSettings,
) -> Result<()> {
    {
        // The previous snapshot is discarded before the new one is fetched
        let state = app.state_mut();
        state.view = None;
        state.loading = Some(job_id.to_string());
    }
    app.draw()?;

    let (guard, token) = cancellation();
    let load = load_snapshot(source, job_id, &token);
    tokio::pin!(load);

    let result = loop {
        tokio::select! {
            result = &mut load => break result,
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if app.poll_abort()? {
                    guard.cancel();
                }
                app.draw()?;
            }
        }
    };

    let state = app.state_mut();
    match result {
        Ok(snapshot) => state.set_view(JobView::new(snapshot, settings)),
        Err(LoadError::Cancelled { job_id }) => {
            state.loading = None;
            state.set_status(format!("Cancelled loading {}", job_id));
        }
        Err(err) => {
            warn!(error = %err, "job load failed");
            state.set_view(JobView::new(JobSnapshot::empty(job_id), settings));
            state.set_status(err.to_string());
        }
    }
    Ok(())
}
