use crate::calc::calculate;
use crate::cli::SaveCommands;
use crate::error::Result;
use crate::fmt::{money, parse_money};
use crate::models::{
    BankData, CategoryData, CryptoData, InvestmentsData, LoansData, RealEstateData,
};

fn amount(raw: &Option<String>) -> f64 {
    raw.as_deref().map(parse_money).unwrap_or(0.0)
}

fn text(raw: &Option<String>) -> String {
    raw.as_deref().map(str::trim).unwrap_or("").to_string()
}

/// Flag values become the category's figures wholesale; omitted amounts
/// are zero, omitted text empty. That matches what the review form saves.
fn build_data(command: SaveCommands) -> CategoryData {
    match command {
        SaveCommands::Bank {
            bank,
            iban,
            begin,
            end,
            interest,
            fees,
            note,
        } => CategoryData::Bank(BankData {
            bank: text(&bank),
            iban: text(&iban),
            begin: amount(&begin),
            end: amount(&end),
            interest: amount(&interest),
            fees: amount(&fees),
            note: text(&note),
        }),
        SaveCommands::Investments {
            broker,
            begin_value,
            end_value,
            deposits,
            withdrawals,
            dividends,
            costs,
            note,
        } => CategoryData::Investments(InvestmentsData {
            broker: text(&broker),
            begin_value: amount(&begin_value),
            end_value: amount(&end_value),
            deposits: amount(&deposits),
            withdrawals: amount(&withdrawals),
            dividends: amount(&dividends),
            costs: amount(&costs),
            note: text(&note),
        }),
        SaveCommands::RealEstate {
            address,
            assessed_value,
            use_type,
            rent,
            imputed_income,
            maintenance,
            note,
        } => CategoryData::RealEstate(RealEstateData {
            address: text(&address),
            assessed_value: amount(&assessed_value),
            use_type: use_type.trim().to_string(),
            rent: amount(&rent),
            imputed_income: amount(&imputed_income),
            maintenance: amount(&maintenance),
            note: text(&note),
        }),
        SaveCommands::Loans {
            counterparty,
            principal_begin,
            principal_end,
            interest_received,
            interest_paid,
            note,
        } => CategoryData::Loans(LoansData {
            counterparty: text(&counterparty),
            principal_begin: amount(&principal_begin),
            principal_end: amount(&principal_end),
            interest_received: amount(&interest_received),
            interest_paid: amount(&interest_paid),
            note: text(&note),
        }),
        SaveCommands::Crypto {
            exchange,
            begin_value,
            end_value,
            staking,
            fees,
            note,
        } => CategoryData::Crypto(CryptoData {
            exchange: text(&exchange),
            begin_value: amount(&begin_value),
            end_value: amount(&end_value),
            staking: amount(&staking),
            fees: amount(&fees),
            note: text(&note),
        }),
    }
}

pub fn run(command: SaveCommands) -> Result<()> {
    let data = build_data(command);
    let key = data.key();

    let mut store = super::open_store();
    store.save_review(data)?;

    let result = calculate(store.record(key).data.as_ref()).result;
    println!("{} saved, result {}. Marked done.", key.label(), money(result));
    Ok(())
}
