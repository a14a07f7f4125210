//! State management example
//!
//! Demonstrates how to use `ShellStateManager` to query UI snapshots and
//! listen for state changes.

use editor_shell::{
    Command, EditCommand, MemoryStore, NodeId, NodeKind, ShellStateManager, TabCommand,
    TreeCommand,
};
use std::sync::{Arc, Mutex};

fn main() {
    println!("=== 外壳状态管理示例 ===\n");

    let mut manager = ShellStateManager::new(Box::new(MemoryStore::new())).unwrap();

    println!("1. 文件树视图：");
    print_tree(&manager);

    // 状态变更监听
    println!("\n2. 状态变更监听：");
    let change_count = Arc::new(Mutex::new(0));
    let change_count_clone = change_count.clone();
    manager.subscribe(move |change| {
        let mut count = change_count_clone.lock().unwrap();
        *count += 1;
        println!(
            "  状态变更 #{}: {:?} (版本: {} -> {})",
            count, change.change_type, change.old_version, change.new_version
        );
    });

    println!("\n3. 打开文件并编辑：");
    manager
        .execute(Command::Tab(TabCommand::OpenFile {
            id: NodeId::from("f1"),
        }))
        .unwrap();
    manager
        .execute(Command::Edit(EditCommand::SetText {
            text: "// demo\nconst n = 1".to_string(),
        }))
        .unwrap();

    println!("\n4. 编辑器窗格状态：");
    if let Some(editor) = manager.get_editor_state() {
        println!("  文件: {} ({})", editor.file_name, editor.language.label());
        println!("  面包屑: {}", editor.breadcrumbs.join(" > "));
        println!("  行号槽: {:?}", editor.gutter);
        println!("  光标: Ln {}, Col {}", editor.cursor.line, editor.cursor.column);
        println!("  标记预览: {}", editor.markup.lines().next().unwrap_or(""));
    }

    println!("\n5. 标签栏状态：");
    for tab in manager.get_tabs_state().tabs {
        println!(
            "  [{}] {} ({})",
            if tab.is_active { "*" } else { " " },
            tab.name,
            tab.icon_class
        );
    }

    println!("\n6. 折叠全部后的文件树：");
    manager
        .execute(Command::Tree(TreeCommand::CollapseAll))
        .unwrap();
    print_tree(&manager);

    println!("\n最终版本号: {}", manager.version());
    println!("总变更次数: {}", change_count.lock().unwrap());
}

fn print_tree(manager: &ShellStateManager) {
    for row in manager.get_tree_state().rows {
        let marker = if row.kind == NodeKind::Folder {
            if row.is_expanded { "▾" } else { "▸" }
        } else {
            " "
        };
        println!("  {}{} {}", "  ".repeat(row.depth), marker, row.name);
    }
}
