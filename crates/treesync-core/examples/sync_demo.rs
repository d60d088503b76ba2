//! Incremental sync demo
//!
//! Walks a tree through the lifecycle a renderer would push across a
//! process boundary: bootstrap, an added child, a removed child, a
//! clear-and-rebuild and finally a rejected update.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use treesync_core::errors::SyncError;
use treesync_core::logging_facility::{init, Profile};
use treesync_core::snapshot::compute_tree_digest;
use treesync_core::{
    NodeAttributes, NodeDescription, NodeRole, ObservedEvent, RecordingObserver, Tree, Update,
};

fn root(children: &[i32]) -> NodeDescription<NodeAttributes> {
    NodeDescription::new(-1, NodeAttributes::new(NodeRole::RootWebArea).with_name("Inbox"))
        .with_children(children.iter().copied())
}

fn text(id: i32, name: &str) -> NodeDescription<NodeAttributes> {
    NodeDescription::new(id, NodeAttributes::new(NodeRole::StaticText).with_name(name))
}

fn print_events(observer: &mut RecordingObserver) {
    for event in observer.drain() {
        match event {
            ObservedEvent::AtomicUpdateFinished {
                root_changed,
                changes,
            } => {
                let list: Vec<String> = changes
                    .iter()
                    .map(|c| format!("{}:{}", c.node_id, c.change))
                    .collect();
                println!("  finished root_changed={} [{}]", root_changed, list.join(" "));
            }
            other => println!("  {:?}", other),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);

    let mut tree: Tree = Tree::new();
    let mut observer = RecordingObserver::new();

    println!("## Bootstrap");
    let update = Update::new()
        .with_node(root(&[2, 3]))
        .with_node(text(2, "Hello"))
        .with_node(text(3, "World"));
    print!("{}", update);
    tree.apply_update_with(update, &mut observer)?;
    print_events(&mut observer);
    print!("{}", tree);

    println!("\n## Add child");
    tree.apply_update_with(
        Update::new().with_node(root(&[2, 3, 4])).with_node(text(4, "New mail")),
        &mut observer,
    )?;
    print_events(&mut observer);
    print!("{}", tree);

    println!("\n## Remove child");
    tree.apply_update_with(Update::new().with_node(root(&[3, 4])), &mut observer)?;
    print_events(&mut observer);
    print!("{}", tree);

    println!("\n## Clear and rebuild");
    tree.apply_update_with(
        Update::new()
            .clearing(-1)
            .with_node(root(&[3, 5]))
            .with_node(text(3, "World"))
            .with_node(text(5, "Fresh")),
        &mut observer,
    )?;
    print_events(&mut observer);
    print!("{}", tree);

    println!("\n## Rejected update");
    let digest_before = compute_tree_digest(&tree)?;
    let err = tree
        .apply_update_with(Update::new().with_node(root(&[3, 99])), &mut observer)
        .expect_err("99 is never described");
    println!("  {}", SyncError::from(err));
    assert_eq!(compute_tree_digest(&tree)?, digest_before);
    println!("  tree unchanged, digest {}", digest_before);

    tree.teardown(&mut observer);
    println!("\n## Teardown");
    print_events(&mut observer);

    Ok(())
}
