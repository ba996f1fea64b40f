use colored::Colorize;

use crate::conversation::ConversationLog;
use crate::wire::{Role, SetupCommandsResult};

pub fn show_commands(result: &SetupCommandsResult) {
    println!("\n=== SETUP COMMANDS ===");
    if result.is_empty() {
        println!("{}", "(no additional setup needed)".dimmed());
        return;
    }
    for (i, cmd) in result.commands.iter().enumerate() {
        println!("{}. {}  {}", i + 1, "[RUN]".cyan().bold(), cmd);
    }
    println!();
}

pub fn show_transcript(log: &ConversationLog) {
    eprintln!("\n===== DEBUG: CONVERSATION ({} turns) =====", log.len());
    for m in log.messages() {
        let label = match m.role() {
            Role::System => "[SYSTEM]".magenta().bold(),
            Role::User => "[USER]".green().bold(),
            Role::Assistant => "[ASSISTANT]".yellow().bold(),
        };
        eprintln!("{}\n{}\n", label, indent(m.content(), 2));
    }
}

fn indent(s: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    s.lines()
        .map(|l| format!("{}{}", pad, l))
        .collect::<Vec<_>>()
        .join("\n")
}
