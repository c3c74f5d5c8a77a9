//! `flowsync sync` — reconcile a namespace with local workflow files.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use flowsync_core::{
    config::{non_empty, parse_bool},
    SyncTarget, WorkflowId,
};
use flowsync_remote::HttpWorkflowClient;
use flowsync_sync::{
    pipeline::{self, RunOptions},
    FailurePolicy, SyncReport, TargetOutcome,
};
use flowsync_vcs::GitCli;

use crate::logging::annotate_error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Arguments for `flowsync sync`.
///
/// Values arrive as raw strings because CI runners pass unset inputs as empty
/// strings; validation happens in [`SyncTarget::new`] and [`parse_bool`].
#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Orchestration service address, `host[:port]`.
    #[arg(long, env = "INPUT_SERVER")]
    pub server: Option<String>,

    /// `http` or `https`.
    #[arg(long, env = "INPUT_PROTOCOL")]
    pub protocol: Option<String>,

    /// Remote namespace to reconcile.
    #[arg(long, env = "INPUT_NAMESPACE")]
    pub namespace: Option<String>,

    /// Workflow file, or directory whose immediate entries are workflow files.
    #[arg(long, env = "INPUT_SYNC")]
    pub sync: Option<String>,

    /// Bearer token for the service API.
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Update existing workflows even when the file did not change.
    #[arg(long, env = "INPUT_FORCE", num_args = 0..=1, default_missing_value = "true")]
    pub force: Option<String>,

    /// Decide what would change without sending any create or update.
    #[arg(long, env = "INPUT_DRY_RUN", num_args = 0..=1, default_missing_value = "true")]
    pub dry_run: Option<String>,

    /// Keep going after a failed workflow instead of stopping the run.
    #[arg(long, env = "INPUT_KEEP_GOING", num_args = 0..=1, default_missing_value = "true")]
    pub keep_going: Option<String>,

    /// Prior revision of the change-detection range.
    #[arg(long, env = "INPUT_FROM_REV")]
    pub from_rev: Option<String>,

    /// Current revision; its short hash becomes the workflow version.
    #[arg(long, env = "INPUT_TO_REV")]
    pub to_rev: Option<String>,

    /// Per-request transport timeout in seconds.
    #[arg(long, env = "INPUT_TIMEOUT_SECS")]
    pub timeout_secs: Option<String>,

    /// Emit machine-readable JSON instead of the summary.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let outcome = self.execute();
        if let Err(err) = &outcome {
            annotate_error(&format!("{err:#}"));
        }
        outcome
    }

    fn execute(&self) -> Result<()> {
        let target = self.target()?;
        let options = self.options()?;
        let timeout = self.timeout()?;
        tracing::info!("using server: {}", target.server_host);

        let api = HttpWorkflowClient::new(&target, timeout);
        let vcs = GitCli::new();
        let report = pipeline::run(&target, &options, &api, &vcs)
            .with_context(|| format!("sync of '{}' failed", target.sync_path.display()))?;

        if self.json {
            print_json(&report)?;
        } else {
            print_report(&report);
        }

        for (path, err) in report.failures() {
            annotate_error(&format!("{}: {err}", path.display()));
        }
        if !report.is_success() {
            bail!(
                "{} of {} workflow(s) failed, {} not attempted",
                report.failed(),
                report.entries.len(),
                report.not_attempted.len()
            );
        }
        Ok(())
    }

    fn target(&self) -> Result<SyncTarget> {
        SyncTarget::new(
            self.server.as_deref(),
            self.protocol.as_deref(),
            self.namespace.as_deref(),
            self.sync.as_deref(),
            self.token.as_deref(),
        )
        .context("invalid configuration")
    }

    fn options(&self) -> Result<RunOptions> {
        let defaults = RunOptions::default();
        let keep_going = parse_bool("keep_going", self.keep_going.as_deref())?;
        Ok(RunOptions {
            from_rev: or_default(self.from_rev.as_deref(), defaults.from_rev),
            to_rev: or_default(self.to_rev.as_deref(), defaults.to_rev),
            force: parse_bool("force", self.force.as_deref())?,
            dry_run: parse_bool("dry_run", self.dry_run.as_deref())?,
            policy: if keep_going {
                FailurePolicy::Continue
            } else {
                FailurePolicy::Abort
            },
            fallback_commit: std::env::var("GITHUB_SHA").ok(),
        })
    }

    fn timeout(&self) -> Result<Duration> {
        let secs = match non_empty(self.timeout_secs.as_deref()) {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("invalid timeout_secs '{raw}'"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Duration::from_secs(secs))
    }
}

fn or_default(value: Option<&str>, default: String) -> String {
    non_empty(value).map(str::to_owned).unwrap_or(default)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_report(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };

    for entry in &report.entries {
        let path = entry.path.display();
        match &entry.outcome {
            Ok(TargetOutcome::Created { id }) => println!("  {}  {id} ({path})", "+".green()),
            Ok(TargetOutcome::WouldCreate { id }) => println!("  +  {id} ({path})"),
            Ok(TargetOutcome::Updated { id }) => println!("  {}  {id} ({path})", "~".yellow()),
            Ok(TargetOutcome::WouldUpdate { id }) => println!("  ~  {id} ({path})"),
            Ok(TargetOutcome::Unchanged { id }) => println!("  ·  {id} ({path})"),
            Err(err) => println!("  {}  {path}: {err}", "✗".red()),
        }
    }
    for path in &report.not_attempted {
        println!("  -  {} (not attempted)", path.display());
    }

    let status = if report.is_success() {
        "✓".green()
    } else {
        "✗".red()
    };
    println!(
        "{prefix}{status} version {} ({} created, {} updated, {} unchanged, {} failed)",
        report.version_tag,
        report.created(),
        report.updated(),
        report.unchanged(),
        report.failed(),
    );
}

#[derive(Serialize)]
struct SyncReportJson {
    version_tag: String,
    dry_run: bool,
    summary: SummaryJson,
    targets: Vec<TargetJson>,
    not_attempted: Vec<PathBuf>,
}

#[derive(Serialize)]
struct SummaryJson {
    created: usize,
    updated: usize,
    unchanged: usize,
    failed: usize,
}

#[derive(Serialize)]
struct TargetJson {
    path: PathBuf,
    id: Option<WorkflowId>,
    action: String,
    error: Option<String>,
}

fn report_json(report: &SyncReport) -> SyncReportJson {
    let targets = report
        .entries
        .iter()
        .map(|entry| match &entry.outcome {
            Ok(outcome) => TargetJson {
                path: entry.path.clone(),
                id: Some(outcome.id().clone()),
                action: outcome.action().to_string(),
                error: None,
            },
            Err(err) => TargetJson {
                path: entry.path.clone(),
                id: None,
                action: "failed".to_string(),
                error: Some(err.to_string()),
            },
        })
        .collect();

    SyncReportJson {
        version_tag: report.version_tag.clone(),
        dry_run: report.dry_run,
        summary: SummaryJson {
            created: report.created(),
            updated: report.updated(),
            unchanged: report.unchanged(),
            failed: report.failed(),
        },
        targets,
        not_attempted: report.not_attempted.clone(),
    }
}

fn print_json(report: &SyncReport) -> Result<()> {
    let json = serde_json::to_string_pretty(&report_json(report))
        .context("failed to serialize sync report")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use flowsync_core::{ConfigError, Scheme};
    use flowsync_sync::ReportEntry;

    use super::*;

    fn args() -> SyncArgs {
        SyncArgs {
            server: Some("localhost:8080".into()),
            protocol: Some("http".into()),
            namespace: Some("ci".into()),
            sync: Some("/workflows".into()),
            ..SyncArgs::default()
        }
    }

    #[test]
    fn target_normalizes_inputs() {
        let target = args().target().expect("target");
        assert_eq!(target.scheme, Scheme::Http);
        assert_eq!(target.sync_path, PathBuf::from("./workflows"));
        assert_eq!(target.auth_token, None);
    }

    #[test]
    fn empty_required_input_is_a_config_error() {
        let args = SyncArgs {
            namespace: Some(String::new()),
            ..args()
        };
        let err = args.target().unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::Missing("namespace"))
        );
    }

    #[test]
    fn options_default_to_last_commit_range() {
        let options = args().options().expect("options");
        assert_eq!(options.from_rev, "HEAD^");
        assert_eq!(options.to_rev, "HEAD");
        assert!(!options.force);
        assert_eq!(options.policy, FailurePolicy::Abort);
    }

    #[test]
    fn boolean_inputs_are_parsed() {
        let args = SyncArgs {
            force: Some("true".into()),
            keep_going: Some("yes".into()),
            dry_run: Some(String::new()),
            ..args()
        };
        let options = args.options().expect("options");
        assert!(options.force);
        assert!(!options.dry_run);
        assert_eq!(options.policy, FailurePolicy::Continue);
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let args = SyncArgs {
            timeout_secs: Some("soon".into()),
            ..args()
        };
        assert!(args.timeout().is_err());
        assert_eq!(
            SyncArgs::default().timeout().unwrap(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn json_report_lists_actions() {
        let report = SyncReport {
            version_tag: "abc1234".into(),
            dry_run: false,
            entries: vec![ReportEntry {
                path: PathBuf::from("flows/a.yaml"),
                outcome: Ok(TargetOutcome::Created { id: "wf-a".into() }),
            }],
            not_attempted: vec![],
        };
        let json = serde_json::to_value(report_json(&report)).expect("json");
        assert_eq!(json["summary"]["created"], 1);
        assert_eq!(json["targets"][0]["action"], "created");
        assert_eq!(json["targets"][0]["id"], "wf-a");
    }
}
