//! Persistence example
//!
//! Shows the blob round trip: seeding an empty store, carrying edits over
//! to a second launch, and recovering from a corrupt blob.

use editor_shell::{
    BlobStore, Command, EditCommand, MemoryStore, NodeId, STORE_KEY, ShellExecutor, TabCommand,
};

fn main() {
    // First launch over an empty store seeds the demo tree and persists it.
    let mut executor = ShellExecutor::new(Box::new(MemoryStore::new())).unwrap();
    println!("seeded {} nodes", executor.core().tree.len());

    executor
        .execute(Command::Tab(TabCommand::OpenFile {
            id: NodeId::from("f1"),
        }))
        .unwrap();
    executor
        .execute(Command::Edit(EditCommand::SetText {
            text: "console.log('persisted')".to_string(),
        }))
        .unwrap();

    // Carry the blob over to a second launch.
    let blob = executor.core().store().read(STORE_KEY).unwrap().unwrap();
    println!("blob is {} bytes", blob.len());

    let mut store = MemoryStore::new();
    store.write(STORE_KEY, &blob).unwrap();
    let reloaded = ShellExecutor::new(Box::new(store)).unwrap();
    println!(
        "after reload, main.js holds: {:?}",
        reloaded
            .core()
            .tree
            .get(&NodeId::from("f1"))
            .and_then(|node| node.content.clone())
    );

    // A corrupt blob is silently replaced by the seed.
    let mut store = MemoryStore::new();
    store.write(STORE_KEY, "{broken").unwrap();
    let recovered = ShellExecutor::new(Box::new(store)).unwrap();
    println!(
        "after corruption, back to {} seeded nodes",
        recovered.core().tree.len()
    );
}
