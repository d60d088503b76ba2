pub mod digest;
pub mod replay;

use std::path::{Path, PathBuf};

use clap::Args;
use treesync_core::errors::TreeError;
use treesync_core::{FailurePolicy, NodeAttributes, Tree, TreeConfig, Update};
use treesync_core_types::StreamId;

/// Flags shared by every command that replays a log
#[derive(Debug, Args)]
pub struct ReplayOptions {
    /// JSON file holding an array of updates
    pub file: PathBuf,

    /// Commit the staged part of a rejected update instead of rolling back
    #[arg(long)]
    pub keep_partial: bool,

    /// Check tree invariants after every commit
    #[arg(long)]
    pub verify: bool,
}

impl ReplayOptions {
    pub fn tree_config(&self) -> TreeConfig {
        let policy = if self.keep_partial {
            FailurePolicy::KeepPartial
        } else {
            FailurePolicy::Rollback
        };
        TreeConfig::new()
            .with_failure_policy(policy)
            .with_verify_invariants(self.verify || cfg!(debug_assertions))
    }

    /// Empty tree whose log stream is named after the input file
    pub fn new_tree(&self) -> Tree {
        let mut tree = Tree::with_config(self.tree_config());
        tree.set_stream_id(StreamId::from_string(stream_name(&self.file)));
        tree
    }
}

fn stream_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read an update log: a JSON array of updates with attribute payloads
pub fn load_updates(path: &Path) -> Result<Vec<Update<NodeAttributes>>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    let updates = serde_json::from_str(&content).map_err(TreeError::from)?;
    Ok(updates)
}
