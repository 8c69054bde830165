//! VERDIGRIS — ESG Approval & Audit-Chain Demo CLI
//!
//! Runs one or all of the demo scenarios.  Each scenario uses the real
//! VERDIGRIS components (audit service, workflow engine, notification
//! queue) wired over the in-memory reference stores.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- lifecycle
//!   cargo run -p demo -- tamper

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use verdigris_contracts::{
    entry::AppendRequest,
    error::VerdigrisResult,
    workflow::CreateWorkflow,
};
use verdigris_core::{AuditSink, LedgerStore, Notifier, WorkflowStore};
use verdigris_ledger::{verify_entries, AuditService, InMemoryLedgerStore};
use verdigris_notify::{InMemoryNotificationStore, NotificationQueue};
use verdigris_workflow::{ApproverDirectory, InMemoryWorkflowStore, WorkflowEngine};

// ── CLI definition ────────────────────────────────────────────────────────────

/// VERDIGRIS — tamper-evident ESG approval core demo.
///
/// Each subcommand runs one or all of the scenarios, demonstrating the
/// hash-chained audit ledger, the fixed-level approval workflow, and the
/// retrying notification queue.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "VERDIGRIS ESG approval core demo",
    long_about = "Runs VERDIGRIS demo scenarios showing multi-level approval,\n\
                  notification queueing, and audit chain tamper detection."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence.
    RunAll,
    /// Scenario 1: a submission's full approval lifecycle, plus a rejection.
    Lifecycle,
    /// Scenario 2: chain verification catching a tampered entry.
    Tamper,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Lifecycle => run_lifecycle(),
        Command::Tamper => run_tamper(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_all() -> VerdigrisResult<()> {
    run_lifecycle()?;
    run_tamper()?;
    Ok(())
}

// ── Shared wiring ─────────────────────────────────────────────────────────────

const DEMO_APPROVERS: &str = r#"
    [[approvers]]
    level = "site"
    contact = "site-lead@example.com"

    [[approvers]]
    level = "business_unit"
    contact = "bu-head@example.com"

    [[approvers]]
    level = "group_esg"
    contact = "esg-office@example.com"

    [[approvers]]
    level = "executive"
    contact = "cso@example.com"
"#;

struct Services {
    ledger_store: Arc<InMemoryLedgerStore>,
    audit: Arc<AuditService>,
    queue: Arc<NotificationQueue>,
    engine: WorkflowEngine,
}

/// Wire the full stack over in-memory stores, the way a host process would
/// at startup — once, explicitly, no hidden globals.
fn make_services() -> VerdigrisResult<Services> {
    let ledger_store = Arc::new(InMemoryLedgerStore::new());
    let audit = Arc::new(AuditService::new(
        ledger_store.clone() as Arc<dyn LedgerStore>,
    ));

    // No transport configured: deliveries settle as logged successes.
    let queue = Arc::new(NotificationQueue::new(
        Arc::new(InMemoryNotificationStore::new()),
        None,
    ));

    let engine = WorkflowEngine::new(
        Arc::new(InMemoryWorkflowStore::new()) as Arc<dyn WorkflowStore>,
        audit.clone() as Arc<dyn AuditSink>,
        queue.clone() as Arc<dyn Notifier>,
        ApproverDirectory::from_toml_str(DEMO_APPROVERS)?,
    );

    Ok(Services {
        ledger_store,
        audit,
        queue,
        engine,
    })
}

// ── Scenario 1: approval lifecycle ────────────────────────────────────────────

fn run_lifecycle() -> VerdigrisResult<()> {
    println!("── Scenario 1: approval lifecycle ──────────────────────────");

    let services = make_services()?;
    let engine = &services.engine;

    let receipt = engine.create(CreateWorkflow {
        data_id: "EMISSIONS-2026-Q2".to_string(),
        data_type: "emissions_report".to_string(),
        submitted_by: "alice".to_string(),
        submitter_contact: "alice@example.com".to_string(),
    })?;
    println!("created workflow {}", receipt.workflow_id);

    let approvers = [
        ("bob", "site sign-off"),
        ("dana", "business unit sign-off"),
        ("erin", "group ESG sign-off"),
        ("frank", "executive sign-off"),
    ];
    for (approver, note) in approvers {
        engine.approve(
            &receipt.workflow_id,
            approver,
            &format!("{}@example.com", approver),
            Some(note.to_string()),
        )?;
        let detail = engine.get_with_steps(&receipt.workflow_id)?;
        match detail.workflow.current_level {
            Some(level) => println!("  {} approved, now awaiting '{}'", approver, level),
            None => println!("  {} approved, workflow {}", approver, detail.workflow.status),
        }
    }

    // A second submission gets thrown out at the first gate.
    let rejected = engine.create(CreateWorkflow {
        data_id: "WATER-2026-Q2".to_string(),
        data_type: "water_usage".to_string(),
        submitted_by: "alice".to_string(),
        submitter_contact: "alice@example.com".to_string(),
    })?;
    engine.reject(
        &rejected.workflow_id,
        "bob",
        "bob@example.com",
        Some("meter readings incomplete".to_string()),
    )?;
    let detail = engine.get_with_steps(&rejected.workflow_id)?;
    println!(
        "rejected workflow {} at intake, completed_at = {}",
        rejected.workflow_id,
        detail
            .workflow
            .completed_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default()
    );

    let outcomes = services.queue.process_queue()?;
    println!("processed {} queued notifications", outcomes.len());

    let report = services.audit.verify(1, None)?;
    println!(
        "audit chain: {} entries, valid = {}",
        report.total_entries, report.is_valid
    );
    println!();

    Ok(())
}

// ── Scenario 2: tamper detection ──────────────────────────────────────────────

fn run_tamper() -> VerdigrisResult<()> {
    println!("── Scenario 2: tamper detection ────────────────────────────");

    let services = make_services()?;

    for quarter in ["Q1", "Q2", "Q3"] {
        services.audit.append(AppendRequest {
            action: "evidence_upload".to_string(),
            table_name: "esg_evidence".to_string(),
            record_id: format!("EMISSIONS-2026-{}", quarter),
            user_id: "alice".to_string(),
            user_role: "site_manager".to_string(),
            old_values: None,
            new_values: Some(json!({ "tonnes_co2e": 1042, "quarter": quarter })),
            metadata: None,
        })?;
    }

    let report = services.audit.verify(1, None)?;
    println!(
        "pristine chain: {} entries, valid = {}",
        report.total_entries, report.is_valid
    );

    // Replay verification over a copy with one doctored snapshot — the
    // digit an auditor would love to miss.
    let mut doctored = services.ledger_store.range(1, None)?;
    doctored[1].new_values = Some(json!({ "tonnes_co2e": 142, "quarter": "Q2" }));

    let report = verify_entries(&doctored);
    println!(
        "doctored copy: valid = {}, offending entries = {:?}",
        report.is_valid, report.invalid_entries
    );
    println!();

    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("VERDIGRIS — Tamper-evident ESG Approval Core");
    println!("============================================");
    println!();
    println!("Per workflow transition:");
    println!("  [1] Decision recorded against the current approval level");
    println!("  [2] Workflow advances or terminates (reject = immediate stop)");
    println!("  [3] Notification queued for the next actor (best-effort)");
    println!("  [4] Immutable audit entry appended to the SHA-256 chain");
    println!();
}
