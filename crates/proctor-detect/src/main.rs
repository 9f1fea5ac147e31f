//! CLI entry point for the proctor-detect pipeline.
//!
//! Designed for subprocess invocation from the session orchestrator:
//! reads a JSON request from stdin, writes a JSON result to stdout.
//! Logs go to stderr so stdout stays machine-readable.

use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use proctor_core::config::MonitorConfig;
use proctor_core::events::{EventPayload, SessionEvent};
use proctor_core::types::{AdversarialAttack, Move, ProbeStrategy, SessionId};
use proctor_detect::duplicate::DuplicateVerdict;
use proctor_detect::interrupt::InterruptDecision;
use proctor_detect::suspicion::SuspicionAction;
use proctor_detect::{MonitorEngine, SessionReport};
use proctor_trace::audit::AuditTrace;
use proctor_trace::trend::TrendTracker;

#[derive(Parser)]
#[command(name = "proctor-detect")]
#[command(about = "Real-time detection pipeline for the Proctor interview monitor")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: proctor).
    #[arg(short, long, default_value = "proctor", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded event stream (JSON array of session events on
    /// stdin) and print per-session reports.
    Replay,
    /// Check a single solution (raw code on stdin) for herd/boilerplate
    /// character.
    HerdCheck {
        /// Problem identifier, for the audit record.
        #[arg(long, default_value = "unknown")]
        problem_id: String,
    },
}

/// Per-session result of a replayed stream.
#[derive(Debug, Default, Serialize)]
struct SessionSummary {
    report: Option<SessionReport>,
    action: Option<SuspicionAction>,
    action_message: Option<&'static str>,
    attack: Option<AdversarialAttack>,
    interruption: Option<InterruptDecision>,
    next_move: Option<Move>,
    strategy_hint: Option<ProbeStrategy>,
    submission_verdicts: Vec<DuplicateVerdict>,
    trace_entries: usize,
}

#[derive(Debug, Serialize)]
struct ReplayResult {
    sessions: BTreeMap<String, SessionSummary>,
    trend_verdict: String,
    trend_velocity: f64,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let config = MonitorConfig::load(&cli.config)?;
    let engine = MonitorEngine::with_config(config);

    match cli.command {
        Command::Replay => {
            let input = std::io::read_to_string(std::io::stdin())?;
            let events: Vec<SessionEvent> = serde_json::from_str(&input)?;
            let result = replay(&engine, events)?;
            println!("{}", serde_json::to_string(&result)?);
        }
        Command::HerdCheck { ref problem_id } => {
            let code = std::io::read_to_string(std::io::stdin())?;
            let verdict = engine.analyze_solution(&code, problem_id);
            println!("{}", serde_json::to_string(&verdict)?);
        }
    }

    Ok(())
}

/// Drive the recorded stream through the engine, acting as the session
/// orchestrator: fuse detector verdicts, record audit-trace entries, and
/// fold completed sessions into the trend history.
fn replay(engine: &MonitorEngine, events: Vec<SessionEvent>) -> anyhow::Result<ReplayResult> {
    let audit = AuditTrace::new();
    let trend = TrendTracker::new();
    let mut sessions: BTreeMap<String, SessionSummary> = BTreeMap::new();
    let mut resolved_signals: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for event in events {
        let session = event.session_id.clone();
        let key = session.to_string();
        let summary = sessions.entry(key.clone()).or_default();

        match event.payload {
            EventPayload::CodeSnapshot { code, kind } => {
                let score = engine.analyze_at(&session, &code, kind, event.timestamp)?;
                let action = engine.action_for(score);
                if action != SuspicionAction::None {
                    audit.log(
                        &session,
                        resolved_signals.get(&key).cloned().unwrap_or_default(),
                        &format!("{action:?}"),
                        score,
                    );
                }
                if kind == proctor_core::types::CodeEventKind::Submission {
                    summary
                        .submission_verdicts
                        .push(engine.analyze_solution(&code, &key));
                }
                summary.action = Some(action);
                summary.action_message = action.message();
            }
            EventPayload::SpeechSample { metrics } => {
                summary.interruption = Some(engine.evaluate_interruption(&metrics));
            }
            EventPayload::BehaviorSample { metrics } => {
                if let Some(attack) = engine.detect_attack(&session, &metrics)? {
                    summary.attack = Some(attack);
                }
            }
            EventPayload::IntegrityViolation { kind } => {
                tracing::info!(session_id = %session, kind, "integrity violation replayed");
                engine.record_integrity_violation(&session)?;
            }
            EventPayload::SignalResolved { signal } => {
                resolved_signals
                    .entry(key.clone())
                    .or_default()
                    .push(signal.id.clone());
                let next_move = engine.determine_move(signal.state);
                summary.next_move = Some(next_move);
                summary.strategy_hint = Some(engine.strategy_hint(next_move));
            }
            EventPayload::SessionCompleted { outcome, company } => {
                trend.track_session(&outcome, &company);
                audit.log(
                    &session,
                    resolved_signals.get(&key).cloned().unwrap_or_default(),
                    "session_completed",
                    outcome.loss_score,
                );
            }
        }
    }

    for (key, summary) in &mut sessions {
        let session = SessionId::new(key.clone());
        summary.report = Some(engine.session_report(&session)?);
        summary.trace_entries = audit.history(&session).len();
    }

    Ok(ReplayResult {
        sessions,
        trend_verdict: trend.master_verdict().to_string(),
        trend_velocity: trend.velocity(),
    })
}
