use anyhow::{Context, Result};
use async_trait::async_trait;
use cbt_diary::config::DiaryConfig;
use cbt_diary::handoff::{finalize, ChatBridge, ChatResult};
use cbt_diary::paths;
use cbt_diary::registry::filled_steps;
use cbt_diary::session::DiarySession;
use cbt_diary::session_data::StepData;
use cbt_diary::state_machine::{FlowChange, FlowEvent};
use cbt_diary::step::CbtStepId;
use cbt_diary::storage::FileStorage;
use cbt_diary::structured_logger::StructuredLogger;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cbt")]
#[command(about = "Guided CBT diary, one step at a time")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CBT_DIARY_GIT_SHA"), ")"))]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show where the current diary entry stands
    Status,
    /// Start a fresh entry, discarding current progress
    Start {
        /// Chat session the finished entry belongs to
        #[arg(long)]
        session_id: Option<String>,
    },
    /// Submit data for a step, e.g. `submit situation '{"situation":"..."}'`
    Submit { step: CbtStepId, json: String },
    /// Revisit an earlier step
    Jump { step: CbtStepId },
    /// Drop a step's data, reopening it and everything after it
    ClearStep { step: CbtStepId },
    /// Merge a JSON patch into the entry's data
    Edit { patch: String },
    /// Throw away the current entry
    Discard,
    /// Manage saved drafts
    Drafts {
        #[command(subcommand)]
        action: DraftsAction,
    },
    /// Send the finished entry to chat
    Finalize {
        #[arg(long)]
        session_id: Option<String>,
    },
}

#[derive(Subcommand)]
enum DraftsAction {
    List,
    Save,
    Load { id: String },
    Delete { id: String },
}

/// Prints the hand-off message instead of posting it anywhere.
struct StdoutChatBridge;

#[async_trait]
impl ChatBridge for StdoutChatBridge {
    async fn add_message(&self, session_id: &str, content: &str) -> ChatResult {
        println!("--- message for chat session {} ---", session_id);
        println!("{}", content);
        ChatResult::ok()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let home = paths::diary_home_dir()?;
    let config = DiaryConfig::load_or_default(&paths::config_path()?)?;
    let logger = if config.event_log {
        let run_id = uuid::Uuid::new_v4().to_string();
        Some(Arc::new(
            StructuredLogger::new(&run_id, &paths::logs_dir()?)
                .context("Failed to open event log")?,
        ))
    } else {
        None
    };

    let storage = FileStorage::new(config.drafts_dir(&home));
    let (mut session, _snapshots) = DiarySession::open(storage, logger);

    match cli.command {
        Command::Status => print_status(&session),
        Command::Start { session_id } => {
            let changes = session.dispatch(FlowEvent::SessionStart { session_id })?;
            report(&changes);
            print_status(&session);
        }
        Command::Submit { step, json } => {
            let value: serde_json::Value =
                serde_json::from_str(&json).context("Step data is not valid JSON")?;
            let data = StepData::from_json(step, value)
                .with_context(|| format!("Data does not fit step '{}'", step))?;
            let changes = session.dispatch(FlowEvent::StepDataSubmitted { data })?;
            report(&changes);
            print_status(&session);
        }
        Command::Jump { step } => {
            session.dispatch(FlowEvent::JumpToStep { step })?;
            print_status(&session);
        }
        Command::ClearStep { step } => {
            let changes = session.dispatch(FlowEvent::ClearStep { step })?;
            report(&changes);
            print_status(&session);
        }
        Command::Edit { patch } => {
            let patch: serde_json::Value =
                serde_json::from_str(&patch).context("Patch is not valid JSON")?;
            session.edit_fields(&patch)?;
            print_status(&session);
        }
        Command::Discard => {
            session.discard();
            println!("Entry discarded.");
        }
        Command::Drafts { action } => run_drafts(&mut session, action)?,
        Command::Finalize { session_id } => {
            let target = session_id
                .or_else(|| session.state().session_id.clone())
                .or_else(|| config.chat_session_id.clone());
            let formatter = config.formatter();
            let done = finalize(
                &mut session,
                &formatter,
                &StdoutChatBridge,
                target.as_deref(),
            )
            .await?;
            println!("Entry {} handed off.", done.id);
        }
    }

    Ok(())
}

fn run_drafts(session: &mut DiarySession<FileStorage>, action: DraftsAction) -> Result<()> {
    match action {
        DraftsAction::List => {
            let saved = session.list_saved();
            if saved.is_empty() {
                println!("No saved drafts.");
            }
            for draft in saved {
                println!(
                    "{}  step {}/9  saved {}",
                    draft.id,
                    draft.current_step.min(9),
                    draft.last_saved.format("%Y-%m-%d %H:%M")
                );
            }
        }
        DraftsAction::Save => {
            session.save_draft()?;
            println!("Saved draft {}.", session.draft().id);
        }
        DraftsAction::Load { id } => {
            if !session.load_saved(&id) {
                anyhow::bail!("No saved draft with id '{}'", id);
            }
            print_status(session);
        }
        DraftsAction::Delete { id } => {
            if session.delete_saved(&id)? {
                println!("Deleted draft {}.", id);
            } else {
                println!("No saved draft with id '{}'.", id);
            }
        }
    }
    Ok(())
}

fn report(changes: &[FlowChange]) {
    for change in changes {
        if let FlowChange::StepCompleted { step } = change {
            println!("Completed: {}", step.label());
        }
    }
}

fn print_status(session: &DiarySession<FileStorage>) {
    let state = session.state();
    let (done, total) = state.progress();

    if state.is_complete() {
        println!("All {} steps complete. Run `cbt finalize` to send the entry.", total);
    } else {
        println!("Step {} of {}: {}", state.current.ordinal(), total, state.current);
    }
    if let Some(focus) = state.focus {
        println!("Revisiting: {}", focus.label());
    }
    println!("Completed {}/{}", done, total);

    let filled = filled_steps(&session.draft().data);
    if !filled.is_empty() {
        let labels: Vec<&str> = filled.iter().map(|step| step.label()).collect();
        println!("Filled: {}", labels.join(", "));
    }

    match session.drafts().persistence().persisted_draft_timestamp() {
        Some(ts) => println!("Last saved {}", ts.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Not saved yet"),
    }
}
