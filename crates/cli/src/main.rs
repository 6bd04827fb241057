//! Move-in CLI - checklist of what is left before moving in.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use movein_progress::{ProgressSnapshot, ProgressTracker, TrackerConfig, DEFAULT_STORAGE_KEY};
use movein_storage::JsonFileStore;

const HELP_LINKS: [&str; 2] = ["Help Center", "Contact Support"];

#[derive(Parser)]
#[command(name = "movein")]
#[command(about = "Track your move-in progress", long_about = None)]
struct Cli {
    /// Directory progress is stored in
    #[arg(long, global = true, env = "MOVEIN_DATA_DIR", default_value = ".movein")]
    data_dir: PathBuf,

    /// Storage key for the checklist flags
    #[arg(long, global = true, env = "MOVEIN_STORAGE_KEY", default_value = DEFAULT_STORAGE_KEY, value_parser = parse_key)]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the checklist
    Status {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known step ids
    Steps,
    /// Mark a step as complete
    Complete {
        /// Step id, e.g. depositPaid
        step: String,
    },
    /// Get move-in instructions once every step is complete
    Instructions,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Open storage
    let storage = JsonFileStore::new(&cli.data_dir).await?;
    let mut tracker = ProgressTracker::new(storage).with_config(TrackerConfig {
        storage_key: cli.key.clone(),
    });
    let outcome = tracker.load().await;
    info!(?outcome, dir = %cli.data_dir.display(), "loaded progress");

    match cli.command {
        Commands::Status { json } => {
            let snapshot = tracker.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", render_status(&snapshot, tracker.notice()));
            }
        }
        Commands::Steps => {
            for step in tracker.definitions() {
                let forced = if step.forced_complete { " (always complete)" } else { "" };
                println!("  {:<18} {}{}", step.id, step.label, forced);
            }
        }
        Commands::Complete { step } => {
            let Some(definition) = tracker.definition(&step) else {
                let known: Vec<_> = tracker.definitions().iter().map(|d| d.id.to_string()).collect();
                bail!("Unknown step '{}'. Known steps: {}", step, known.join(", "));
            };
            if definition.forced_complete {
                println!("{} is always complete", definition.label);
                return Ok(());
            }

            tracker.mark_complete(&step).await;
            println!("Completed: {}", step);
            println!("{}", tracker.notice());
        }
        Commands::Instructions => {
            if !tracker.all_complete() {
                let pending: Vec<_> = tracker.pending_steps().iter().map(|d| d.id.to_string()).collect();
                bail!("Disabled: complete all steps to enable (pending: {})", pending.join(", "));
            }
            println!("Move-in instructions coming soon!");
        }
    }

    Ok(())
}

fn parse_key(key: &str) -> std::result::Result<String, String> {
    JsonFileStore::validate_key(key)
        .map(|_| key.to_string())
        .map_err(|e| format!("{e}; use letters, digits, '-', '_' or '.', not starting with '.'"))
}

fn render_status(snapshot: &ProgressSnapshot, notice: &str) -> String {
    let mut out = String::new();
    out.push_str("Your Move-in Progress\n");
    for step in &snapshot.steps {
        if step.complete {
            out.push_str(&format!("  [x] {} ✅\n", step.label));
        } else {
            out.push_str(&format!(
                "  [!] {:<34} -> movein complete {}  ({})\n",
                step.label, step.id, step.action
            ));
        }
    }
    out.push_str(&format!(
        "  {}/{} complete ({:.0}%)\n\n",
        snapshot.completed, snapshot.total, snapshot.percentage
    ));

    out.push_str("Move-in Instructions\n");
    if snapshot.ready {
        out.push_str("  Available: run `movein instructions`\n\n");
    } else {
        out.push_str("  Disabled: Complete all steps to enable.\n\n");
    }

    out.push_str("Notifications\n");
    out.push_str(&format!("  {}\n\n", notice));

    out.push_str("Need Help?\n");
    for link in HELP_LINKS {
        out.push_str(&format!("  {}\n", link));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use movein_storage::MemoryStore;

    #[tokio::test]
    async fn test_status_lists_pending_actions() {
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        tracker.load().await;
        tracker.mark_complete("contractSigned").await;

        let text = render_status(&tracker.snapshot(), tracker.notice());
        assert!(text.contains("[x] Contract signed"));
        assert!(text.contains("[x] Membership fee paid"));
        assert!(text.contains("movein complete depositPaid  (Pay Now)"));
        assert!(text.contains("Disabled: Complete all steps to enable."));
        assert!(text.contains("Contact Support"));
    }

    #[tokio::test]
    async fn test_status_enables_instructions_when_ready() {
        let mut tracker = ProgressTracker::new(MemoryStore::new());
        tracker.load().await;
        for id in ["contractSigned", "depositPaid", "welcomeEmailSent"] {
            tracker.mark_complete(id).await;
        }

        let text = render_status(&tracker.snapshot(), tracker.notice());
        assert!(text.contains("Available: run `movein instructions`"));
        assert!(text.contains("4/4 complete (100%)"));
        assert!(!text.contains("[!]"));
    }

    #[test]
    fn test_cli_key_must_be_storable() {
        for key in ["a/b", "../x", ".hidden"] {
            assert!(Cli::try_parse_from(["movein", "--key", key, "complete", "depositPaid"]).is_err(), "{key}");
        }

        let cli = Cli::try_parse_from(["movein", "--key", "unit-42", "status"]).unwrap();
        assert_eq!(cli.key, "unit-42");
    }

    #[test]
    fn test_cli_parses_global_options() {
        let cli = Cli::try_parse_from(["movein", "--data-dir", "/tmp/x", "complete", "depositPaid"]).unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/x"));
        assert!(matches!(cli.command, Commands::Complete { ref step } if step == "depositPaid"));
    }
}
