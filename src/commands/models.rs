//! Model listing for Threadchat
//!
//! The selectable models are a fixed allow-list, so listing them needs
//! no provider round-trip.

use crate::config::ALLOWED_MODELS;
use colored::Colorize;
use prettytable::{row, Table};

/// Build the table of selectable models, marking `active`
pub fn models_table(active: &str) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Model Name", "Active"]);

    for model in ALLOWED_MODELS {
        let marker = if model == active { "yes" } else { "" };
        table.add_row(row![model, marker]);
    }

    table
}

/// Print the selectable models
///
/// # Examples
///
/// ```
/// use threadchat::commands::models::list_models;
///
/// list_models("gpt-4o");
/// ```
pub fn list_models(active: &str) {
    tracing::debug!("Listing {} allowed models", ALLOWED_MODELS.len());

    println!("\nAvailable models:\n");
    models_table(active).printstd();
    println!("\nActive model: {}\n", active.green());
}
