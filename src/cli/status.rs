use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::calc::calculate;
use crate::error::Result;
use crate::fmt::money;
use crate::models::Status;
use crate::progress;
use crate::settings::load_settings;
use crate::store::STATE_FILE;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let store = super::open_store();
    let state = store.state();

    println!("User:       {}", if settings.user_name.is_empty() { "(not set)" } else { &settings.user_name });
    println!("Data dir:   {}", data_dir.display());
    println!("State file: {}", data_dir.join(STATE_FILE).display());
    println!("Year:       {}", state.year);
    println!("Completion: {}%", progress::completion(state));
    println!();

    let mut table = Table::new();
    table.set_header(vec!["Category", "Status", "Files", "Result"]);
    for (key, record) in &state.categories {
        let status = match record.status {
            Status::Ok => record.status.label().green(),
            Status::Warn => record.status.label().yellow(),
            Status::Todo => record.status.label().red(),
        };
        let result = if record.data.is_some() {
            money(calculate(record.data.as_ref()).result)
        } else {
            "\u{2014}".to_string()
        };
        table.add_row(vec![
            Cell::new(key.label()),
            Cell::new(status),
            Cell::new(record.files.len()),
            Cell::new(result),
        ]);
    }
    println!("{table}");

    let attention = progress::attention(state);
    if !attention.is_empty() {
        println!();
        println!("Needs attention:");
        for key in attention {
            let hint = match state.record(key).status {
                Status::Todo => "documents still needed",
                _ => "check the detected figures",
            };
            println!("  {} ({hint})", key.label());
        }
    }

    println!();
    if progress::export_ready(state) {
        println!("{}", "Export ready. Run `klaar export`.".green());
    } else {
        println!(
            "Export unlocks at {}% with at least one attached document (now at {}%).",
            progress::EXPORT_THRESHOLD,
            progress::completion(state)
        );
    }

    Ok(())
}
