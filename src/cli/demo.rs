use comfy_table::{Cell, Table};

use crate::calc::calculate;
use crate::error::Result;
use crate::fmt::money;
use crate::models::CategoryKey;
use crate::progress;
use crate::store::Store;

/// Load the canned example into every category. Each one gets a synthetic
/// document and lands in review, so the whole checklist can be explored
/// and signed off without real paperwork.
pub(crate) fn load_all(store: &mut Store) {
    for key in CategoryKey::ALL {
        store.load_example(key);
    }
}

pub fn run() -> Result<()> {
    let mut store = super::open_store();
    load_all(&mut store);

    let state = store.state();
    let mut table = Table::new();
    table.set_header(vec!["Category", "Status", "Files", "Result"]);
    for (key, record) in &state.categories {
        table.add_row(vec![
            Cell::new(key.label()),
            Cell::new(record.status.label()),
            Cell::new(record.files.len()),
            Cell::new(money(calculate(record.data.as_ref()).result)),
        ]);
    }

    println!("Example data loaded for {}.", state.year);
    println!("{table}");
    println!();
    println!(
        "Every category is waiting for review ({}% complete).",
        progress::completion(state)
    );
    println!("Try these next:");
    println!("  klaar status");
    println!("  klaar review bank");
    println!("  klaar save bank --interest 245 --fees 18");
    println!("  klaar export");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    #[test]
    fn test_demo_fills_all_categories() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path(), "2027");
        load_all(&mut store);

        for key in CategoryKey::ALL {
            let record = store.record(key);
            assert_eq!(record.status, Status::Warn);
            assert_eq!(record.files.len(), 1);
            assert!(record.data.is_some());
        }
        assert_eq!(progress::completion(store.state()), 50);
        // halfway is not enough for the export gate
        assert!(!progress::export_ready(store.state()));
    }

    #[test]
    fn test_demo_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path(), "2027");
        load_all(&mut store);
        load_all(&mut store);

        for key in CategoryKey::ALL {
            assert_eq!(store.record(key).files.len(), 1);
        }
    }

    #[test]
    fn test_demo_results_match_the_examples() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path(), "2027");
        load_all(&mut store);

        let result = |key| calculate(store.record(key).data.as_ref()).result;
        assert_eq!(result(CategoryKey::Bank), 227.0);
        assert_eq!(result(CategoryKey::Investments), 2_900.0);
        assert_eq!(result(CategoryKey::RealEstate), 12_138.0);
        assert_eq!(result(CategoryKey::Loans), 300.0);
        assert_eq!(result(CategoryKey::Crypto), 2_600.0);
    }
}
