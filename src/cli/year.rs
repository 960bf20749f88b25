use crate::error::Result;

pub fn run(year: &str) -> Result<()> {
    let mut store = super::open_store();
    store.set_year(year);
    println!("Filing year set to {year}.");
    Ok(())
}
