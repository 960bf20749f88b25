use std::collections::BTreeMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The five fixed checklist categories. This set is closed: records are
/// never added or removed, only filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    Bank,
    Investments,
    RealEstate,
    Loans,
    Crypto,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 5] = [
        CategoryKey::Bank,
        CategoryKey::Investments,
        CategoryKey::RealEstate,
        CategoryKey::Loans,
        CategoryKey::Crypto,
    ];

    /// Label used in tables, the dashboard and the export summary.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryKey::Bank => "Bank & savings",
            CategoryKey::Investments => "Investments",
            CategoryKey::RealEstate => "Real estate",
            CategoryKey::Loans => "Loans & receivables",
            CategoryKey::Crypto => "Crypto",
        }
    }

    /// Short label for tight layouts like chart columns.
    pub fn short_label(&self) -> &'static str {
        match self {
            CategoryKey::Bank => "Bank",
            CategoryKey::Investments => "Invest",
            CategoryKey::RealEstate => "Estate",
            CategoryKey::Loans => "Loans",
            CategoryKey::Crypto => "Crypto",
        }
    }

    /// Key under which the record is stored in the state blob. Must match
    /// the serde rename above.
    pub fn json_key(&self) -> &'static str {
        match self {
            CategoryKey::Bank => "bank",
            CategoryKey::Investments => "investments",
            CategoryKey::RealEstate => "real_estate",
            CategoryKey::Loans => "loans",
            CategoryKey::Crypto => "crypto",
        }
    }

    /// Kebab-case form used on the command line and in generated file names.
    pub fn slug(&self) -> &'static str {
        match self {
            CategoryKey::Bank => "bank",
            CategoryKey::Investments => "investments",
            CategoryKey::RealEstate => "real-estate",
            CategoryKey::Loans => "loans",
            CategoryKey::Crypto => "crypto",
        }
    }

    /// Canned figures for this category, used by the demo and to pre-fill
    /// the review form when the first document lands.
    pub fn example_data(&self) -> CategoryData {
        match self {
            CategoryKey::Bank => CategoryData::Bank(BankData::example()),
            CategoryKey::Investments => CategoryData::Investments(InvestmentsData::example()),
            CategoryKey::RealEstate => CategoryData::RealEstate(RealEstateData::example()),
            CategoryKey::Loans => CategoryData::Loans(LoansData::example()),
            CategoryKey::Crypto => CategoryData::Crypto(CryptoData::example()),
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Review status of one category. `Warn` means figures were detected or
/// drafted but nobody has signed off on them yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Todo,
    Warn,
    Ok,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Todo => "To do",
            Status::Warn => "Review",
            Status::Ok => "Done",
        }
    }
}

/// An attached evidence document. Only the name and size are kept; the
/// contents never enter the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BankData {
    pub bank: String,
    pub iban: String,
    pub begin: f64,
    pub end: f64,
    pub interest: f64,
    pub fees: f64,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvestmentsData {
    pub broker: String,
    pub begin_value: f64,
    pub end_value: f64,
    pub deposits: f64,
    pub withdrawals: f64,
    pub dividends: f64,
    pub costs: f64,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RealEstateData {
    pub address: String,
    pub assessed_value: f64,
    pub use_type: String,
    pub rent: f64,
    pub imputed_income: f64,
    pub maintenance: f64,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoansData {
    pub counterparty: String,
    pub principal_begin: f64,
    pub principal_end: f64,
    pub interest_received: f64,
    pub interest_paid: f64,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CryptoData {
    pub exchange: String,
    pub begin_value: f64,
    pub end_value: f64,
    pub staking: f64,
    pub fees: f64,
    pub note: String,
}

impl BankData {
    pub fn example() -> Self {
        Self {
            bank: "ING".to_string(),
            iban: "NL00INGB0000000000".to_string(),
            begin: 32_000.0,
            end: 36_500.0,
            interest: 245.0,
            fees: 18.0,
            note: "Example: interest and fees read from the annual statement.".to_string(),
        }
    }
}

impl InvestmentsData {
    pub fn example() -> Self {
        Self {
            broker: "DEGIRO".to_string(),
            begin_value: 55_000.0,
            end_value: 61_200.0,
            deposits: 4_000.0,
            withdrawals: 0.0,
            dividends: 820.0,
            costs: 120.0,
            note: "Example: value growth plus dividends minus costs.".to_string(),
        }
    }
}

impl RealEstateData {
    pub fn example() -> Self {
        Self {
            address: "Keizersgracht 1, Amsterdam".to_string(),
            assessed_value: 425_000.0,
            use_type: "mixed".to_string(),
            rent: 9_500.0,
            imputed_income: 14_238.0,
            maintenance: 2_100.0,
            note: "Example: assessed value fetched, use type picked.".to_string(),
        }
    }
}

impl LoansData {
    pub fn example() -> Self {
        Self {
            counterparty: "Family loan".to_string(),
            principal_begin: 10_000.0,
            principal_end: 9_000.0,
            interest_received: 300.0,
            interest_paid: 0.0,
            note: "Example: interest received, one repayment processed.".to_string(),
        }
    }
}

impl CryptoData {
    pub fn example() -> Self {
        Self {
            exchange: "Bitvavo".to_string(),
            begin_value: 6_000.0,
            end_value: 8_500.0,
            staking: 120.0,
            fees: 20.0,
            note: "Example: staking income and exchange fees included.".to_string(),
        }
    }
}

/// Entered figures for one category. The variant is the category, so a
/// record can never hold figures belonging to a different category.
/// Serializes untagged: the surrounding category key already says which
/// shape this is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryData {
    Bank(BankData),
    Investments(InvestmentsData),
    RealEstate(RealEstateData),
    Loans(LoansData),
    Crypto(CryptoData),
}

impl CategoryData {
    pub fn key(&self) -> CategoryKey {
        match self {
            CategoryData::Bank(_) => CategoryKey::Bank,
            CategoryData::Investments(_) => CategoryKey::Investments,
            CategoryData::RealEstate(_) => CategoryKey::RealEstate,
            CategoryData::Loans(_) => CategoryKey::Loans,
            CategoryData::Crypto(_) => CategoryKey::Crypto,
        }
    }

    pub fn note(&self) -> &str {
        match self {
            CategoryData::Bank(d) => &d.note,
            CategoryData::Investments(d) => &d.note,
            CategoryData::RealEstate(d) => &d.note,
            CategoryData::Loans(d) => &d.note,
            CategoryData::Crypto(d) => &d.note,
        }
    }

    /// Decode a persisted `data` value for the given category. Starts from
    /// defaults and overlays only recognized fields of the right type;
    /// everything else in the value is dropped. A non-object decodes to
    /// no data at all.
    pub fn from_value(key: CategoryKey, value: &Value) -> Option<CategoryData> {
        let obj = value.as_object()?;
        Some(match key {
            CategoryKey::Bank => {
                let mut d = BankData::default();
                take_str(obj, "bank", &mut d.bank);
                take_str(obj, "iban", &mut d.iban);
                take_num(obj, "begin", &mut d.begin);
                take_num(obj, "end", &mut d.end);
                take_num(obj, "interest", &mut d.interest);
                take_num(obj, "fees", &mut d.fees);
                take_str(obj, "note", &mut d.note);
                CategoryData::Bank(d)
            }
            CategoryKey::Investments => {
                let mut d = InvestmentsData::default();
                take_str(obj, "broker", &mut d.broker);
                take_num(obj, "begin_value", &mut d.begin_value);
                take_num(obj, "end_value", &mut d.end_value);
                take_num(obj, "deposits", &mut d.deposits);
                take_num(obj, "withdrawals", &mut d.withdrawals);
                take_num(obj, "dividends", &mut d.dividends);
                take_num(obj, "costs", &mut d.costs);
                take_str(obj, "note", &mut d.note);
                CategoryData::Investments(d)
            }
            CategoryKey::RealEstate => {
                let mut d = RealEstateData::default();
                take_str(obj, "address", &mut d.address);
                take_num(obj, "assessed_value", &mut d.assessed_value);
                take_str(obj, "use_type", &mut d.use_type);
                take_num(obj, "rent", &mut d.rent);
                take_num(obj, "imputed_income", &mut d.imputed_income);
                take_num(obj, "maintenance", &mut d.maintenance);
                take_str(obj, "note", &mut d.note);
                CategoryData::RealEstate(d)
            }
            CategoryKey::Loans => {
                let mut d = LoansData::default();
                take_str(obj, "counterparty", &mut d.counterparty);
                take_num(obj, "principal_begin", &mut d.principal_begin);
                take_num(obj, "principal_end", &mut d.principal_end);
                take_num(obj, "interest_received", &mut d.interest_received);
                take_num(obj, "interest_paid", &mut d.interest_paid);
                take_str(obj, "note", &mut d.note);
                CategoryData::Loans(d)
            }
            CategoryKey::Crypto => {
                let mut d = CryptoData::default();
                take_str(obj, "exchange", &mut d.exchange);
                take_num(obj, "begin_value", &mut d.begin_value);
                take_num(obj, "end_value", &mut d.end_value);
                take_num(obj, "staking", &mut d.staking);
                take_num(obj, "fees", &mut d.fees);
                take_str(obj, "note", &mut d.note);
                CategoryData::Crypto(d)
            }
        })
    }
}

fn take_str(obj: &serde_json::Map<String, Value>, key: &str, into: &mut String) {
    if let Some(s) = obj.get(key).and_then(Value::as_str) {
        *into = s.to_string();
    }
}

fn take_num(obj: &serde_json::Map<String, Value>, key: &str, into: &mut f64) {
    if let Some(n) = obj.get(key).and_then(Value::as_f64) {
        *into = n;
    }
}

/// One category's slice of the checklist: where the review stands, which
/// documents back it up, and the figures entered so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub status: Status,
    pub files: Vec<FileRef>,
    pub data: Option<CategoryData>,
}

impl CategoryRecord {
    /// Overlay a loaded record onto this (default) one, field by field.
    /// A bad status falls back to to-do, a malformed file list to empty,
    /// and file entries that are not `{name, size}` objects are dropped.
    pub fn merge_value(&mut self, key: CategoryKey, value: &Value) {
        let Some(obj) = value.as_object() else {
            return;
        };
        if let Some(status) = obj
            .get("status")
            .and_then(|s| serde_json::from_value(s.clone()).ok())
        {
            self.status = status;
        }
        if let Some(list) = obj.get("files").and_then(Value::as_array) {
            self.files = list
                .iter()
                .filter_map(|f| serde_json::from_value(f.clone()).ok())
                .collect();
        }
        if let Some(data) = obj.get("data") {
            self.data = CategoryData::from_value(key, data);
        }
    }
}

/// Everything klaar persists: the filing year plus one record per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppState {
    pub year: String,
    pub categories: BTreeMap<CategoryKey, CategoryRecord>,
}

impl AppState {
    /// The schema default: all five categories present and untouched.
    pub fn default_for_year(year: &str) -> AppState {
        AppState {
            year: year.to_string(),
            categories: CategoryKey::ALL
                .iter()
                .map(|k| (*k, CategoryRecord::default()))
                .collect(),
        }
    }

    pub fn record(&self, key: CategoryKey) -> &CategoryRecord {
        &self.categories[&key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_key_matches_serde_rename() {
        for key in CategoryKey::ALL {
            let serialized = serde_json::to_string(&key).unwrap();
            assert_eq!(serialized, format!("\"{}\"", key.json_key()));
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Status::Todo).unwrap(), "\"todo\"");
        assert_eq!(serde_json::to_string(&Status::Warn).unwrap(), "\"warn\"");
        assert_eq!(serde_json::to_string(&Status::Ok).unwrap(), "\"ok\"");
    }

    #[test]
    fn test_example_data_matches_key() {
        for key in CategoryKey::ALL {
            assert_eq!(key.example_data().key(), key);
        }
    }

    #[test]
    fn test_category_data_serializes_flat() {
        let value = serde_json::to_value(CategoryKey::Bank.example_data()).unwrap();
        // untagged: the object is the fields themselves, no variant wrapper
        assert_eq!(value["iban"], "NL00INGB0000000000");
        assert_eq!(value["interest"], 245.0);
        assert!(value.get("Bank").is_none());
    }

    #[test]
    fn test_from_value_overlays_recognized_fields() {
        let raw = json!({"interest": 245, "fees": 18, "bank": "ASN"});
        let data = CategoryData::from_value(CategoryKey::Bank, &raw).unwrap();
        let CategoryData::Bank(d) = data else {
            panic!("wrong variant");
        };
        assert_eq!(d.bank, "ASN");
        assert_eq!(d.interest, 245.0);
        assert_eq!(d.begin, 0.0);
        assert_eq!(d.iban, "");
    }

    #[test]
    fn test_from_value_skips_type_mismatches() {
        let raw = json!({"iban": 42, "interest": "lots", "fees": 18});
        let data = CategoryData::from_value(CategoryKey::Bank, &raw).unwrap();
        let CategoryData::Bank(d) = data else {
            panic!("wrong variant");
        };
        assert_eq!(d.iban, "");
        assert_eq!(d.interest, 0.0);
        assert_eq!(d.fees, 18.0);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(CategoryData::from_value(CategoryKey::Bank, &json!("x")).is_none());
        assert!(CategoryData::from_value(CategoryKey::Bank, &json!(null)).is_none());
        assert!(CategoryData::from_value(CategoryKey::Bank, &json!([1, 2])).is_none());
    }

    #[test]
    fn test_merge_value_defends_against_junk() {
        let mut record = CategoryRecord::default();
        let raw = json!({
            "status": "amazing",
            "files": [
                {"name": "statement.pdf", "size": 1024},
                {"name": "bad-size.pdf", "size": -5},
                "not even an object",
                {"size": 7}
            ],
            "data": "garbage"
        });
        record.merge_value(CategoryKey::Bank, &raw);
        assert_eq!(record.status, Status::Todo);
        assert_eq!(record.files.len(), 1);
        assert_eq!(record.files[0].name, "statement.pdf");
        assert!(record.data.is_none());
    }

    #[test]
    fn test_merge_value_keeps_defaults_for_missing_keys() {
        let mut record = CategoryRecord {
            status: Status::Todo,
            files: vec![],
            data: None,
        };
        record.merge_value(CategoryKey::Loans, &json!({"status": "ok"}));
        assert_eq!(record.status, Status::Ok);
        assert!(record.files.is_empty());
        assert!(record.data.is_none());
    }

    #[test]
    fn test_default_state_has_all_categories() {
        let state = AppState::default_for_year("2027");
        assert_eq!(state.year, "2027");
        assert_eq!(state.categories.len(), 5);
        for key in CategoryKey::ALL {
            assert_eq!(state.record(key).status, Status::Todo);
        }
    }
}
