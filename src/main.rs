use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use baton_gate::{QualityGate, Verdict};
use baton_graph::FsGraphSource;
use baton_router::{Presenter, Router};
use baton_state::{JsonStateStore, StateStore, WorkspaceLayout};
use baton_trigger::{parse_post_write, parse_pre_write};

/// Baton - hook-driven workflow routing for multi-step authoring
///
/// Each subcommand handles one host hook event: it reads the event payload
/// from stdin, acts on the shared workflow state, and exits. A non-zero
/// exit from `gate` blocks the pending tool call; every other path is
/// fail-open so a broken hook never takes down the host interaction.
#[derive(Parser)]
#[command(name = "baton")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Project root containing docs/workflow (default: current directory)
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Pre-write check: allow or block a pending tool call
  Gate,
  /// Post-write intake: record a produced artifact
  Intake,
  /// Session-start briefing: print workflow context for a new session
  Context,
  /// Session-stop routing: advance the workflow and print the handoff
  Handoff,
}

/// Exit code that blocks the pending tool call on the host side.
const BLOCKED: u8 = 2;

fn main() -> ExitCode {
  init_tracing();

  let cli = Cli::parse();
  let root = cli.root.unwrap_or_else(|| PathBuf::from("."));
  let layout = WorkspaceLayout::new(root);

  let rt = match tokio::runtime::Runtime::new() {
    Ok(rt) => rt,
    Err(e) => {
      // Even a runtime failure must not block the host interaction.
      tracing::error!(error = %e, "failed to start runtime, allowing action");
      return ExitCode::SUCCESS;
    }
  };

  rt.block_on(async {
    match cli.command {
      Commands::Gate => run_gate(layout).await,
      Commands::Intake => run_intake(layout).await,
      Commands::Context => run_context(layout).await,
      Commands::Handoff => run_handoff(layout).await,
    }
  })
}

async fn run_gate(layout: WorkspaceLayout) -> ExitCode {
  let event = match parse_pre_write(&read_event_from_stdin()) {
    Ok(event) => event,
    Err(e) => {
      tracing::warn!(error = %e, "unparsable gate payload, allowing action");
      return ExitCode::SUCCESS;
    }
  };

  let store = JsonStateStore::for_layout(&layout);
  let gate = QualityGate::new(store, layout);

  match gate.check(&event).await.into_verdict() {
    Verdict::Allowed => {
      tracing::debug!("gate passed");
      ExitCode::SUCCESS
    }
    Verdict::Blocked(reason) => {
      // Both channels: stderr for the log, stdout so the agent sees it.
      eprintln!("{reason}");
      println!("{reason}");
      ExitCode::from(BLOCKED)
    }
  }
}

async fn run_intake(layout: WorkspaceLayout) -> ExitCode {
  let event = match parse_post_write(&read_event_from_stdin()) {
    Ok(event) => event,
    Err(e) => {
      tracing::warn!(error = %e, "unparsable intake payload, ignoring");
      return ExitCode::SUCCESS;
    }
  };

  if !event.is_write() {
    return ExitCode::SUCCESS;
  }
  let Some(file_path) = event.file_path() else {
    return ExitCode::SUCCESS;
  };

  let router = build_router(&layout);
  if let Err(e) = router.intake_artifact(file_path).await {
    tracing::error!(error = %e, "artifact intake failed");
  }
  ExitCode::SUCCESS
}

async fn run_context(layout: WorkspaceLayout) -> ExitCode {
  // Session payloads are opaque; drain stdin and move on.
  let _ = read_event_from_stdin();

  let store = JsonStateStore::for_layout(&layout);
  let state = match store.load().await {
    Ok(Some(state)) => state,
    Ok(None) => {
      tracing::debug!("no workflow state found");
      return ExitCode::SUCCESS;
    }
    Err(e) => {
      tracing::error!(error = %e, "failed to load workflow state");
      return ExitCode::SUCCESS;
    }
  };

  let presenter = Presenter::new(layout);
  match presenter.briefing(&state).await {
    Some(briefing) => {
      eprintln!("{briefing}");
      println!("{briefing}");
      if let Some(guidance) = presenter.guidance(&state) {
        eprintln!("{guidance}");
        println!("{guidance}");
      }
    }
    None => tracing::debug!("workflow not active, no context to load"),
  }
  ExitCode::SUCCESS
}

async fn run_handoff(layout: WorkspaceLayout) -> ExitCode {
  let _ = read_event_from_stdin();

  let router = build_router(&layout);
  match router.route_session_stop().await {
    Ok(Some(handoff)) => {
      let message = handoff.render();
      eprintln!("{message}");
      println!("\n{message}");
    }
    Ok(None) => tracing::debug!("nothing to route"),
    Err(e) => tracing::error!(error = %e, "routing failed, state left as persisted"),
  }
  ExitCode::SUCCESS
}

fn build_router(layout: &WorkspaceLayout) -> Router<JsonStateStore, FsGraphSource> {
  let store = JsonStateStore::for_layout(layout);
  let graphs = FsGraphSource::new(layout.graphs_dir());
  Router::new(store, graphs)
}

/// Read the event payload from stdin, or an empty object when stdin is a
/// terminal or unreadable. Payload problems never fail the hook.
fn read_event_from_stdin() -> String {
  if io::stdin().is_terminal() {
    return "{}".to_string();
  }

  let mut input = String::new();
  if let Err(e) = io::stdin().read_to_string(&mut input) {
    tracing::warn!(error = %e, "failed to read event payload from stdin");
    return "{}".to_string();
  }

  if input.trim().is_empty() {
    "{}".to_string()
  } else {
    input
  }
}

fn init_tracing() {
  use tracing_subscriber::EnvFilter;

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .with_target(false)
    .init();
}
