use std::path::Path;

use comfy_table::{Cell, Table};

use crate::error::{KlaarError, Result};
use crate::fmt::format_bytes;
use crate::models::{CategoryKey, FileRef};

/// Turn a path into a file reference: name and size only, the contents
/// stay on disk.
pub(crate) fn file_ref(raw: &str) -> Result<FileRef> {
    let path = Path::new(raw);
    let meta = std::fs::metadata(path)?;
    if !meta.is_file() {
        return Err(KlaarError::Other(format!("{raw} is not a file")));
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| raw.to_string());
    Ok(FileRef {
        name,
        size: meta.len(),
    })
}

pub fn attach(category: CategoryKey, paths: &[String]) -> Result<()> {
    let mut files = Vec::new();
    for raw in paths {
        files.push(file_ref(raw)?);
    }

    let count = files.len();
    let mut store = super::open_store();
    store.attach(category, files);

    let record = store.record(category);
    println!(
        "Attached {count} document{} to {} ({} total, status: {}).",
        if count == 1 { "" } else { "s" },
        category.label(),
        record.files.len(),
        record.status.label()
    );
    Ok(())
}

pub fn detach(category: CategoryKey, index: usize) -> Result<()> {
    let mut store = super::open_store();
    let count = store.record(category).files.len();
    if index == 0 || index > count {
        return Err(KlaarError::BadFileIndex {
            category: category.label().to_string(),
            index,
            count,
        });
    }
    let removed = store.remove_file(category, index - 1)?;
    println!("Removed {} from {}.", removed.name, category.label());
    Ok(())
}

pub fn list(category: Option<CategoryKey>) -> Result<()> {
    let store = super::open_store();
    let keys: Vec<CategoryKey> = match category {
        Some(k) => vec![k],
        None => CategoryKey::ALL.to_vec(),
    };

    let mut table = Table::new();
    table.set_header(vec!["Category", "#", "Document", "Size"]);
    let mut total = 0usize;
    for key in keys {
        let record = store.record(key);
        total += record.files.len();
        for (i, file) in record.files.iter().enumerate() {
            table.add_row(vec![
                Cell::new(key.label()),
                Cell::new(i + 1),
                Cell::new(&file.name),
                Cell::new(format_bytes(file.size)),
            ]);
        }
    }

    if total == 0 {
        println!("No documents attached yet. Try: klaar attach bank <statement.pdf>");
    } else {
        println!("{table}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_ref_reads_name_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.pdf");
        std::fs::write(&path, b"hello").unwrap();
        let fr = file_ref(path.to_str().unwrap()).unwrap();
        assert_eq!(fr.name, "statement.pdf");
        assert_eq!(fr.size, 5);
    }

    #[test]
    fn test_file_ref_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let err = file_ref(dir.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, KlaarError::Other(_)));
    }

    #[test]
    fn test_file_ref_missing_path_is_io_error() {
        let err = file_ref("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, KlaarError::Io(_)));
    }
}
