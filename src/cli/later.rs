use crate::error::Result;
use crate::models::CategoryKey;

pub fn run(category: CategoryKey) -> Result<()> {
    let mut store = super::open_store();
    store.mark_later(category);
    let record = store.record(category);
    println!(
        "{} parked for later ({} document{} kept).",
        category.label(),
        record.files.len(),
        if record.files.len() == 1 { "" } else { "s" }
    );
    Ok(())
}
