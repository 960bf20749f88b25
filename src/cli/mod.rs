pub mod dashboard;
pub mod demo;
pub mod export;
pub mod files;
pub mod init;
pub mod later;
pub mod lookup;
pub mod reset;
pub mod review;
pub mod save;
pub mod status;
pub mod year;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::models::CategoryKey;
use crate::settings::load_settings;
use crate::store::Store;

/// Open the store at the configured data directory.
pub(crate) fn open_store() -> Store {
    let settings = load_settings();
    Store::open(
        std::path::Path::new(&settings.data_dir),
        &settings.default_year,
    )
}

/// A filing year is four digits, nothing else.
pub(crate) fn parse_year(raw: &str) -> Result<String, String> {
    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        Ok(raw.to_string())
    } else {
        Err(format!("'{raw}' is not a year (expected YYYY)"))
    }
}

#[derive(Parser)]
#[command(name = "klaar", about = "Filing-prep checklist for the annual box 3 return.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up klaar: choose a data directory and seed the checklist.
    Init {
        /// Path for klaar data (default: ~/Documents/klaar)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Show the checklist: completion, per-category status, export gate.
    Status,
    /// Attach evidence documents to a category.
    Attach {
        /// Category to attach to
        #[arg(value_enum)]
        category: CategoryKey,
        /// Documents to attach (only name and size are recorded)
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Remove an attached document by its number in `klaar files`.
    Detach {
        #[arg(value_enum)]
        category: CategoryKey,
        /// Document number as listed (1-based)
        index: usize,
    },
    /// List attached documents.
    Files {
        /// Limit to one category
        #[arg(value_enum)]
        category: Option<CategoryKey>,
    },
    /// Save reviewed figures for a category and mark it done.
    Save {
        #[command(subcommand)]
        command: SaveCommands,
    },
    /// Park a category: back to to-do, documents and figures kept.
    Later {
        #[arg(value_enum)]
        category: CategoryKey,
    },
    /// Fetch the assessed value for the real-estate category (simulated).
    Lookup {
        /// Property address to record
        #[arg(long)]
        address: Option<String>,
    },
    /// Set the filing year.
    Year {
        /// Four-digit year, e.g. 2027
        #[arg(value_parser = parse_year)]
        year: String,
    },
    /// Load example data into all five categories to explore klaar.
    Demo,
    /// Interactively review one category: documents, figures, sign-off.
    Review {
        #[arg(value_enum)]
        category: CategoryKey,
    },
    /// Print the filing summary, or write it to a file.
    Export {
        /// Write to this path instead of stdout
        #[arg(long)]
        output: Option<String>,
        /// Write to <data_dir>/exports/klaar-<year>-<timestamp>.txt
        #[arg(long, conflicts_with = "output")]
        save: bool,
    },
    /// Clear all checklist progress and start over.
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SaveCommands {
    /// Bank & savings figures.
    Bank {
        /// Bank name, e.g. 'ING'
        #[arg(long)]
        bank: Option<String>,
        /// Account IBAN
        #[arg(long)]
        iban: Option<String>,
        /// Balance on 1 January
        #[arg(long)]
        begin: Option<String>,
        /// Balance on 31 December
        #[arg(long)]
        end: Option<String>,
        /// Interest received
        #[arg(long)]
        interest: Option<String>,
        /// Bank fees paid
        #[arg(long)]
        fees: Option<String>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// Investment account figures.
    Investments {
        /// Broker name, e.g. 'DEGIRO'
        #[arg(long)]
        broker: Option<String>,
        /// Portfolio value on 1 January
        #[arg(long = "begin-value")]
        begin_value: Option<String>,
        /// Portfolio value on 31 December
        #[arg(long = "end-value")]
        end_value: Option<String>,
        /// Cash put in during the year
        #[arg(long)]
        deposits: Option<String>,
        /// Cash taken out during the year
        #[arg(long)]
        withdrawals: Option<String>,
        /// Dividends received
        #[arg(long)]
        dividends: Option<String>,
        /// Broker and transaction costs
        #[arg(long)]
        costs: Option<String>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// Real-estate figures.
    RealEstate {
        /// Property address
        #[arg(long)]
        address: Option<String>,
        /// Official assessed value
        #[arg(long = "assessed-value")]
        assessed_value: Option<String>,
        /// Use type: rented, own-use or mixed
        #[arg(long = "use-type", default_value = "mixed")]
        use_type: String,
        /// Rental income received
        #[arg(long)]
        rent: Option<String>,
        /// Imputed rental income
        #[arg(long = "imputed-income")]
        imputed_income: Option<String>,
        /// Maintenance costs
        #[arg(long)]
        maintenance: Option<String>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// Loan and receivable figures.
    Loans {
        /// Who the loan is with, e.g. 'Family loan'
        #[arg(long)]
        counterparty: Option<String>,
        /// Outstanding principal on 1 January
        #[arg(long = "principal-begin")]
        principal_begin: Option<String>,
        /// Outstanding principal on 31 December
        #[arg(long = "principal-end")]
        principal_end: Option<String>,
        /// Interest received
        #[arg(long = "interest-received")]
        interest_received: Option<String>,
        /// Interest paid
        #[arg(long = "interest-paid")]
        interest_paid: Option<String>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// Crypto holdings figures.
    Crypto {
        /// Exchange name, e.g. 'Bitvavo'
        #[arg(long)]
        exchange: Option<String>,
        /// Holdings value on 1 January
        #[arg(long = "begin-value")]
        begin_value: Option<String>,
        /// Holdings value on 31 December
        #[arg(long = "end-value")]
        end_value: Option<String>,
        /// Staking income
        #[arg(long)]
        staking: Option<String>,
        /// Exchange fees
        #[arg(long)]
        fees: Option<String>,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2027"), Ok("2027".to_string()));
        assert!(parse_year("27").is_err());
        assert!(parse_year("20277").is_err());
        assert!(parse_year("twenty").is_err());
        assert!(parse_year("202x").is_err());
    }
}
