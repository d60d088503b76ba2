//! Digest command
//!
//! Usage: treesync digest <FILE> [--keep-partial] [--verify]

use clap::Args;
use treesync_core::errors::SyncError;
use treesync_core::snapshot::compute_tree_digest;

use super::{load_updates, ReplayOptions};

#[derive(Debug, Args)]
pub struct DigestArgs {
    #[command(flatten)]
    pub options: ReplayOptions,
}

/// Execute digest command
///
/// The first rejected update aborts the command.
pub fn execute(args: DigestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let updates = load_updates(&args.options.file)?;
    let mut tree = args.options.new_tree();

    for update in updates {
        tree.apply_update(update)
            .map_err(|e| SyncError::from(e).with_op("digest"))?;
    }

    println!("{}", compute_tree_digest(&tree)?);
    Ok(())
}
