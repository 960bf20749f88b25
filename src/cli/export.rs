use std::path::PathBuf;

use crate::error::{KlaarError, Result};
use crate::export::summary;
use crate::fmt::format_bytes;
use crate::progress;
use crate::settings::load_settings;

/// Print or write the filing summary. Refused until the checklist is
/// complete enough to trust: 80% done and at least one document on file.
pub fn run(output: Option<&str>, save: bool) -> Result<()> {
    let store = super::open_store();
    let state = store.state();

    if !progress::export_ready(state) {
        return Err(KlaarError::ExportNotReady {
            pct: progress::completion(state),
        });
    }

    let text = summary(state);

    let dest = match output {
        Some(p) => Some(PathBuf::from(p)),
        None if save => {
            let exports_dir = PathBuf::from(&load_settings().data_dir).join("exports");
            std::fs::create_dir_all(&exports_dir)?;
            let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
            Some(exports_dir.join(format!("klaar-{}-{stamp}.txt", state.year)))
        }
        None => None,
    };

    match dest {
        Some(path) => {
            std::fs::write(&path, format!("{text}\n"))?;
            let size = std::fs::metadata(&path)?.len();
            println!("Summary written to {}", path.display());
            println!("Size: {}", format_bytes(size));
        }
        None => println!("{text}"),
    }
    Ok(())
}
