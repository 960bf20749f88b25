use crate::calc::calculate;
use crate::error::Result;
use crate::fmt::money;
use crate::models::{CategoryData, CategoryKey};

/// Simulated register fetch. A real build would query the public assessed
/// value register; the checklist only needs plausible figures to review.
pub fn run(address: Option<&str>) -> Result<()> {
    let mut store = super::open_store();
    store.lookup_assessed_value(address);

    let record = store.record(CategoryKey::RealEstate);
    if let Some(CategoryData::RealEstate(d)) = &record.data {
        println!("Assessed value for {}: {}", d.address, money(d.assessed_value));
        println!("Imputed income: {}", money(d.imputed_income));
        println!(
            "Real estate result preview: {} (status: {}).",
            money(calculate(record.data.as_ref()).result),
            record.status.label()
        );
    }
    Ok(())
}
