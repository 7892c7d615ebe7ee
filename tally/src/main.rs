//! tally - usage tracker for AI coding assistants
//!
//! Reads Claude Code logs and Cursor composer databases, reports per-project
//! and global usage, and streams live activity.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Logs: $XDG_STATE_HOME/tally/tally.log (~/.local/state/tally/tally.log)
//! - Config: $XDG_CONFIG_HOME/tally/config.toml (~/.config/tally/config.toml)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use tally_core::analytics::{
    compute_global_metrics, compute_project_metrics, compute_session_metrics, ActivityTotals,
};
use tally_core::format::{format_cost, format_duration, format_tokens, truncate};
use tally_core::watch::Broadcast;
use tally_core::{Config, Engine, Error, ParsedSession, Project};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Usage tracker for AI coding assistants")]
#[command(version)]
struct Args {
    /// Override the Claude Code projects directory
    #[arg(long, global = true)]
    claude_dir: Option<PathBuf>,

    /// Override Cursor's User directory
    #[arg(long, global = true)]
    cursor_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List projects discovered across all sources
    Scan {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Usage totals, globally or for one project
    Stats {
        /// Project id, path or name
        #[arg(short, long)]
        project: Option<String>,

        /// Output JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Metrics for a single session
    Session {
        /// Session id (Claude session UUID or Cursor composer id)
        id: String,

        /// Output JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Stream live activity as JSON lines until Ctrl+C
    Watch {
        /// Also watch Cursor composers
        #[arg(long)]
        composer: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(dir) = args.claude_dir {
        config.sources.claude_projects_dir = Some(dir);
    }
    if let Some(dir) = args.cursor_dir {
        config.sources.cursor_user_dir = Some(dir);
    }

    // Initialize logging
    let _log_guard =
        tally_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("tally starting");

    let mut engine = Engine::new(&config);

    match args.command {
        Command::Scan { json } => run_scan(&engine, json),
        Command::Stats { project, json } => run_stats(&engine, project.as_deref(), json).await,
        Command::Session { id, json } => run_session(&engine, &id, json),
        Command::Watch { composer } => run_watch(&mut engine, composer).await,
    }
}

fn run_scan(engine: &Engine, json: bool) -> Result<()> {
    let projects = engine.scan_all_projects();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&projects).context("failed to serialize projects")?
        );
        return Ok(());
    }

    println!("Found {} project(s):", projects.len());
    for project in &projects {
        let sources: Vec<_> = project.sources.iter().map(|s| s.display_name()).collect();
        println!(
            "  {:<24} {:>4} session(s)  [{}]  {}",
            truncate(project.name(), 24),
            project.session_files.len(),
            sources.join(", "),
            project.path.as_deref().unwrap_or("(unresolved)")
        );
    }
    Ok(())
}

/// Load sessions with a progress bar on stderr.
async fn load_with_progress(engine: &Engine, projects: &[Project]) -> Result<Vec<Arc<ParsedSession>>> {
    let pb = ProgressBar::new(projects.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("invalid progress template")?
            .progress_chars("#>-"),
    );
    pb.set_message("loading sessions");

    let sessions = engine
        .load_all_sessions_with_progress(projects, |done, _total| pb.set_position(done as u64))
        .await
        .context("failed to load sessions")?;

    pb.finish_and_clear();
    Ok(sessions)
}

fn find_project<'a>(projects: &'a [Project], query: &str) -> Option<&'a Project> {
    projects
        .iter()
        .find(|p| p.id == query || p.path.as_deref() == Some(query))
        .or_else(|| projects.iter().find(|p| p.name() == query))
}

async fn run_stats(engine: &Engine, project: Option<&str>, json: bool) -> Result<()> {
    let projects = engine.scan_all_projects();

    if let Some(query) = project {
        let project = find_project(&projects, query)
            .with_context(|| format!("no project matching '{}'", query))?;
        let sessions = load_with_progress(engine, std::slice::from_ref(project)).await?;
        let metrics = compute_project_metrics(&sessions);

        if json {
            println!("{}", serde_json::to_string_pretty(&metrics)?);
        } else {
            println!("Project: {}", project.path.as_deref().unwrap_or(&project.id));
            print_totals(&metrics.totals);
        }
        return Ok(());
    }

    let session_count = projects.iter().map(|p| p.session_files.len()).sum();
    let sessions = load_with_progress(engine, &projects).await?;
    let metrics = compute_global_metrics(projects.len(), session_count, &sessions);

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("Projects:  {}", metrics.total_projects);
        println!("Sessions:  {}", metrics.total_sessions);
        print_totals(&metrics.totals);
    }

    tracing::info!(
        projects = metrics.total_projects,
        sessions = metrics.total_sessions,
        messages = metrics.totals.message_count,
        "Stats complete"
    );
    Ok(())
}

fn print_totals(totals: &ActivityTotals) {
    println!("Messages:  {}", totals.message_count);
    println!(
        "Tokens:    {} in / {} out / {} cached",
        format_tokens(totals.tokens.input),
        format_tokens(totals.tokens.output),
        format_tokens(totals.tokens.cache_read)
    );
    println!("Cost:      {}", format_cost(totals.cost));
    println!("Time:      {}", format_duration(totals.duration_ms));
    println!("Lines:     +{} -{}", totals.lines_added, totals.lines_removed);
    if !totals.model.is_empty() {
        println!("Model:     {}", totals.model);
    }

    let mut tools: Vec<_> = totals.tool_usage.iter().collect();
    tools.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    if !tools.is_empty() {
        println!("\nTop tools:");
        for (tool, count) in tools.into_iter().take(5) {
            println!("  {:<16} {}", tool, count);
        }
    }

    if !totals.timeline.is_empty() {
        println!("\nRecent days:");
        for day in totals.timeline.iter().rev().take(7) {
            println!(
                "  {:<12} {:>3} session(s) {:>5} message(s)",
                day.date, day.sessions, day.messages
            );
        }
    }
}

fn run_session(engine: &Engine, id: &str, json: bool) -> Result<()> {
    let projects = engine.scan_all_projects();
    let (project, file) = projects
        .iter()
        .find_map(|p| p.session_files.iter().find(|f| f.id == id).map(|f| (p, f)))
        .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;

    let session = engine
        .get_cached_session(&project.id, file)
        .with_context(|| format!("failed to parse session {}", id))?;
    let metrics = compute_session_metrics(&session);

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    println!("Session:   {} ({})", metrics.session_id, metrics.source.display_name());
    println!("Project:   {}", project.path.as_deref().unwrap_or(&project.id));
    if !session.first_prompt.is_empty() {
        println!("Prompt:    {}", truncate(&session.first_prompt, 80));
    }
    println!(
        "Messages:  {} ({} user, {} assistant)",
        metrics.message_count, metrics.user_messages, metrics.assistant_messages
    );
    println!("Tool uses: {}", metrics.tool_use_count);
    println!(
        "Tokens:    {} in / {} out",
        format_tokens(metrics.tokens.input),
        format_tokens(metrics.tokens.output)
    );
    println!("Cost:      {}", format_cost(metrics.cost));
    println!(
        "Lines:     +{} -{} across {} file(s)",
        metrics.lines_added, metrics.lines_removed, metrics.files_touched
    );
    Ok(())
}

async fn run_watch(engine: &mut Engine, composer: bool) -> Result<()> {
    // Set up signal handler for graceful shutdown
    let shutdown = Arc::new(tokio::sync::Notify::new());
    let signal = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        eprintln!("\nShutting down...");
        signal.notify_one();
    })
    .context("failed to set Ctrl+C handler")?;

    let broadcast: Broadcast = Arc::new(|event| match serde_json::to_string(&event) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::warn!(error = %e, "Failed to serialize activity event"),
    });

    engine
        .start_watcher(Arc::clone(&broadcast))
        .context("failed to start activity watcher")?;
    if composer {
        engine
            .start_composer_watcher(broadcast)
            .context("failed to start composer watcher")?;
    }

    eprintln!(
        "Watching {}{}. Press Ctrl+C to stop.",
        engine.paths().claude_projects_dir.display(),
        if composer { " and Cursor composers" } else { "" }
    );

    shutdown.notified().await;
    engine.stop_watcher().await;

    tracing::info!("tally watch stopped");
    Ok(())
}
