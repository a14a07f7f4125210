//! Command interface example
//!
//! Demonstrates how to use `ShellExecutor` to drive the editor shell.

use editor_shell::{
    Command, CommandResult, EditCommand, MemoryStore, NodeId, NodeKind, ShellExecutor, TabCommand,
    TreeCommand,
};

fn main() {
    println!("=== 编辑器外壳命令接口示例 ===\n");

    // 创建命令执行器；空的存储会自动播种演示文件树
    let mut executor = ShellExecutor::new(Box::new(MemoryStore::new())).unwrap();
    println!("初始化外壳，节点数: {}\n", executor.core().tree.len());

    // 示例 1：打开文件
    println!("1. 打开文件：");
    executor
        .execute(Command::Tab(TabCommand::OpenFile {
            id: NodeId::from("f1"),
        }))
        .unwrap();
    println!("  活动文件: {:?}", executor.core().session.active_file());
    println!("  语言: {}", executor.core().language().label());

    // 示例 2：编辑与写穿
    println!("\n2. 编辑操作：");
    executor
        .execute(Command::Edit(EditCommand::SetText {
            text: "let total = 1 + 2".to_string(),
        }))
        .unwrap();
    println!("  当前文本: '{}'", executor.core().session.text());
    println!("  渲染标记: {}", executor.core().render_markup());

    let result = executor
        .execute(Command::Edit(EditCommand::InsertTab { start: 0, end: 0 }))
        .unwrap();
    if let CommandResult::Offset(caret) = result {
        println!("  Tab 缩进后光标偏移: {}", caret);
    }

    // 示例 3：文件树操作
    println!("\n3. 文件树操作：");
    let result = executor
        .execute(Command::Tree(TreeCommand::CreateNode {
            kind: NodeKind::File,
            name: "util.js".to_string(),
            parent: None,
        }))
        .unwrap();
    let CommandResult::Created(util) = result else {
        return;
    };
    println!("  新建文件 util.js -> {}", util);

    executor
        .execute(Command::Tree(TreeCommand::RenameNode {
            id: util.clone(),
            name: "helpers.js".to_string(),
        }))
        .unwrap();
    println!("  重命名为 helpers.js");

    let result = executor
        .execute(Command::Tree(TreeCommand::DeleteNode { id: util }))
        .unwrap();
    if let CommandResult::Removed(removed) = result {
        println!("  删除 {} 个节点", removed.len());
    }

    // 示例 4：命令历史
    println!("\n4. 命令历史：共 {} 条", executor.get_command_history().len());
}
