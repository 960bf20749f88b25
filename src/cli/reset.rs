use std::io::Write;

use crate::error::Result;

/// Wipe all checklist progress. Asks first unless `--force`.
pub fn run(force: bool) -> Result<()> {
    if !force {
        print!("This clears all progress, documents and figures. Continue? [y/N] ");
        std::io::stdout().flush()?;
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !matches!(input.trim(), "y" | "Y" | "yes") {
            println!("Nothing changed.");
            return Ok(());
        }
    }

    let mut store = super::open_store();
    store.reset()?;
    println!("Checklist reset. Year {} starts fresh.", store.state().year);
    Ok(())
}
