//! Rendering of the conversation list and message history

use crate::session::{Conversation, ConversationSummary, Role};
use colored::Colorize;
use prettytable::{format, Table};

/// Longest title shown in the list before it is shortened
const LIST_TITLE_CHARS: usize = 40;

fn shorten(title: &str) -> String {
    if title.chars().count() > LIST_TITLE_CHARS {
        let head: String = title.chars().take(LIST_TITLE_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

/// Build the table for `/list`
///
/// Rows follow the order of `summaries`; the first column is the
/// 1-based position accepted by `/switch` and `/delete`.
pub fn conversation_table(summaries: &[ConversationSummary]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.set_titles(prettytable::row![
        "#".bold(),
        "Title".bold(),
        "Messages".bold(),
        "Created".bold(),
        "ID".bold()
    ]);

    for (index, summary) in summaries.iter().enumerate() {
        let marker = if summary.is_current {
            format!("{}*", index + 1).green().to_string()
        } else {
            (index + 1).to_string()
        };
        let title = if summary.is_current {
            shorten(&summary.title).green().bold().to_string()
        } else {
            shorten(&summary.title)
        };

        table.add_row(prettytable::row![
            marker,
            title,
            summary.message_count,
            summary.created_at.format("%Y-%m-%d %H:%M").to_string(),
            summary.id.cyan()
        ]);
    }

    table
}

/// Print the `/list` output
pub fn print_conversation_list(summaries: &[ConversationSummary]) {
    if summaries.is_empty() {
        println!("{}", "No conversations yet.".yellow());
        return;
    }

    println!("\nConversations (newest first):");
    conversation_table(summaries).printstd();
    println!(
        "\nUse {} to change conversation, {} marks the current one.\n",
        "/switch <#>".cyan(),
        "*".green()
    );
}

/// Print every message of `conversation` in order
pub fn print_history(conversation: &Conversation) {
    println!(
        "\n{} {}\n",
        conversation.title().bold(),
        format!("({})", conversation.id()).dimmed()
    );

    if conversation.is_empty() {
        println!("{}", "No messages yet. Ask a question to start.".yellow());
        println!();
        return;
    }

    for message in conversation.messages() {
        let time = message.timestamp().format("%H:%M:%S").to_string();
        let label = match message.role() {
            Role::User => "You".blue().bold(),
            Role::Assistant => "Assistant".green().bold(),
        };
        println!("{} {}", label, time.dimmed());
        println!("{}\n", message.content());
    }
}
