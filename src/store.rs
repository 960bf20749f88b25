use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{KlaarError, Result};
use crate::models::{
    AppState, CategoryData, CategoryKey, CategoryRecord, FileRef, RealEstateData, Status,
};

/// Name of the state blob inside the data directory.
pub const STATE_FILE: &str = "klaar.json";

/// Figures the simulated register lookup hands back for a property.
const LOOKUP_ASSESSED_VALUE: f64 = 425_000.0;
const LOOKUP_IMPUTED_INCOME: f64 = 14_238.0;

/// Size recorded for the synthetic document `load_example` attaches.
const EXAMPLE_FILE_SIZE: u64 = 240_000;

/// Owner of the checklist state. Every mutation goes through a method
/// here, takes effect in memory immediately, and is written back to disk
/// best-effort; the in-memory state stays authoritative when the write
/// fails.
pub struct Store {
    path: PathBuf,
    default_year: String,
    state: AppState,
}

impl Store {
    /// Open the store backed by `<data_dir>/klaar.json`. A missing,
    /// unreadable or mangled blob falls back to the schema default for
    /// `default_year`; opening never fails.
    pub fn open(data_dir: &Path, default_year: &str) -> Store {
        let path = data_dir.join(STATE_FILE);
        let state = load_state(&path, default_year);
        Store {
            path,
            default_year: default_year.to_string(),
            state,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn record(&self, key: CategoryKey) -> &CategoryRecord {
        self.state.record(key)
    }

    fn record_mut(&mut self, key: CategoryKey) -> &mut CategoryRecord {
        self.state.categories.entry(key).or_default()
    }

    /// Append evidence documents. The first document also seeds the
    /// category with example figures so the review form has something to
    /// check against. Never regresses a finished category.
    pub fn attach(&mut self, key: CategoryKey, files: Vec<FileRef>) {
        if files.is_empty() {
            return;
        }
        let record = self.record_mut(key);
        record.files.extend(files);
        if record.data.is_none() {
            record.data = Some(key.example_data());
        }
        if record.status != Status::Ok {
            record.status = Status::Warn;
        }
        self.persist();
    }

    /// Load the canned example wholesale: figures replaced, and a synthetic
    /// document attached when the category has none yet.
    pub fn load_example(&mut self, key: CategoryKey) {
        let year = self.state.year.clone();
        let record = self.record_mut(key);
        if record.files.is_empty() {
            record.files.push(FileRef {
                name: format!("example-{}-{}.pdf", key.slug(), year),
                size: EXAMPLE_FILE_SIZE,
            });
        }
        record.data = Some(key.example_data());
        if record.status != Status::Ok {
            record.status = Status::Warn;
        }
        self.persist();
    }

    /// Simulated assessed-value fetch for the real-estate category. Fills
    /// the assessed value and imputed income where they are still zero,
    /// records the address when one is given, and leaves documents alone.
    pub fn lookup_assessed_value(&mut self, address: Option<&str>) {
        let record = self.record_mut(CategoryKey::RealEstate);
        let mut data = match record.data.take() {
            Some(CategoryData::RealEstate(d)) => d,
            _ => RealEstateData::example(),
        };
        if let Some(addr) = address {
            let addr = addr.trim();
            if !addr.is_empty() {
                data.address = addr.to_string();
            }
        }
        if data.assessed_value == 0.0 {
            data.assessed_value = LOOKUP_ASSESSED_VALUE;
        }
        if data.imputed_income == 0.0 {
            data.imputed_income = LOOKUP_IMPUTED_INCOME;
        }
        record.data = Some(CategoryData::RealEstate(data));
        if record.status != Status::Ok {
            record.status = Status::Warn;
        }
        self.persist();
    }

    /// Sign off on reviewed figures. Refused while no document backs the
    /// category; a checklist entry is never done without evidence.
    pub fn save_review(&mut self, data: CategoryData) -> Result<()> {
        let key = data.key();
        let record = self.record_mut(key);
        if record.files.is_empty() {
            return Err(KlaarError::EvidenceRequired(key.label().to_string()));
        }
        record.data = Some(data);
        record.status = Status::Ok;
        self.persist();
        Ok(())
    }

    /// Park a category: back to to-do, documents and figures untouched.
    pub fn mark_later(&mut self, key: CategoryKey) {
        self.record_mut(key).status = Status::Todo;
        self.persist();
    }

    /// Remove one document by zero-based index. Status is deliberately
    /// left alone, even when this removes the last document of a finished
    /// category; the export gate catches that downstream.
    pub fn remove_file(&mut self, key: CategoryKey, index: usize) -> Result<FileRef> {
        let record = self.record_mut(key);
        if index >= record.files.len() {
            return Err(KlaarError::BadFileIndex {
                category: key.label().to_string(),
                index,
                count: record.files.len(),
            });
        }
        let removed = record.files.remove(index);
        self.persist();
        Ok(removed)
    }

    pub fn set_year(&mut self, year: &str) {
        self.state.year = year.to_string();
        self.persist();
    }

    /// Drop the blob from disk and restore the schema default in memory.
    pub fn reset(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.state = AppState::default_for_year(&self.default_year);
        Ok(())
    }

    /// Eager write that reports failure. Used by `init` to seed the blob;
    /// regular mutations go through [`persist`] instead.
    pub fn save_now(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.state)?;
        std::fs::write(&self.path, format!("{json}\n"))?;
        Ok(())
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(&self.state) {
            let _ = std::fs::write(&self.path, format!("{json}\n"));
        }
    }
}

/// Read and defensively merge the persisted blob. Starts from the schema
/// default and overlays whatever is recognizable; unknown categories and
/// malformed pieces are dropped. Loading is total.
fn load_state(path: &Path, default_year: &str) -> AppState {
    let mut state = AppState::default_for_year(default_year);
    let Ok(content) = std::fs::read_to_string(path) else {
        return state;
    };
    let Ok(value) = serde_json::from_str::<Value>(&content) else {
        return state;
    };
    if let Some(year) = value.get("year").and_then(Value::as_str) {
        if !year.is_empty() {
            state.year = year.to_string();
        }
    }
    if let Some(loaded) = value.get("categories").and_then(Value::as_object) {
        for (key, record) in state.categories.iter_mut() {
            if let Some(raw) = loaded.get(key.json_key()) {
                record.merge_value(*key, raw);
            }
        }
    }
    state
}
