//! Replay command
//!
//! Usage: treesync replay <FILE> [--keep-partial] [--verify] [--continue-on-error] [--json]

use clap::Args;
use std::time::Instant;
use treesync_core::errors::SyncError;
use treesync_core::snapshot::{compute_tree_digest, TreeSnapshot};
use treesync_core::{log_op_end, log_op_error, log_op_start, UpdateReport};
use treesync_core_types::UpdateSeq;

use super::{load_updates, ReplayOptions};

#[derive(Debug, Args)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub options: ReplayOptions,

    /// Report rejected updates and keep replaying the rest of the log
    #[arg(long)]
    pub continue_on_error: bool,

    /// Print reports and the final tree as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Execute replay command
pub fn execute(args: ReplayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let updates = load_updates(&args.options.file)?;
    let mut tree = args.options.new_tree();

    log_op_start!("replay", update_count = updates.len());

    let mut rejected = 0usize;
    for (index, update) in updates.into_iter().enumerate() {
        match tree.apply_update(update) {
            Ok(report) => print_report(index, &report, args.json)?,
            Err(err) => {
                let sync_err = SyncError::from(err.clone())
                    .with_op("replay")
                    .with_stream(tree.stream_id().clone(), UpdateSeq::new(index as u64));
                if !args.continue_on_error {
                    log_op_error!("replay", err, duration_ms = start.elapsed().as_millis() as u64);
                    return Err(Box::new(sync_err));
                }
                rejected += 1;
                print_rejection(index, &sync_err, args.json);
            }
        }
    }

    let digest = compute_tree_digest(&tree)?;
    if args.json {
        let summary = serde_json::json!({
            "digest": digest,
            "rejected": rejected,
            "tree": TreeSnapshot::capture(&tree),
        });
        println!("{}", summary);
    } else {
        println!("Final tree ({} nodes):", tree.len());
        print!("{}", tree);
        if rejected > 0 {
            println!("rejected: {}", rejected);
        }
        println!("digest: {}", digest);
    }

    log_op_end!(
        "replay",
        duration_ms = start.elapsed().as_millis() as u64,
        rejected_count = rejected
    );
    Ok(())
}

fn print_report(
    index: usize,
    report: &UpdateReport,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let line = serde_json::json!({ "update": index, "report": report });
        println!("{}", serde_json::to_string(&line)?);
        return Ok(());
    }

    let changes: Vec<String> = report
        .changes
        .iter()
        .map(|c| format!("{}:{}", c.node_id, c.change))
        .collect();
    println!(
        "update #{}: root_changed={} created={} deleted={} changes=[{}]",
        index,
        report.root_changed,
        report.created.len(),
        report.deleted.len(),
        changes.join(" ")
    );
    Ok(())
}

fn print_rejection(index: usize, err: &SyncError, json: bool) {
    if json {
        let line = serde_json::json!({
            "update": index,
            "error": { "code": err.code(), "message": err.message() },
        });
        println!("{}", line);
    } else {
        println!("update #{}: rejected {}", index, err);
    }
}
