use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One catalog item needing a cover image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Genre tags consumed by the catalog browser; unused by the pipeline.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
}

/// Load the catalog from a JSON array file.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog: {}", path.display()))?;
    let entries: Vec<CatalogEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid catalog JSON: {}", path.display()))?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_with_and_without_genres() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("books.json");
        std::fs::write(
            &path,
            r#"[
                {"id":"b1","title":"Dune","author":"Frank Herbert","genres":["Sci-Fi","Classic"]},
                {"id":"b2","title":"Emma","author":"Jane Austen"}
            ]"#,
        )
        .unwrap();

        let entries = load_catalog(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "b1");
        assert_eq!(entries[0].genres, vec!["Sci-Fi", "Classic"]);
        assert!(entries[1].genres.is_empty());
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("books.json");
        std::fs::write(&path, r#"[{"id":"b1","title":"Dune"}]"#).unwrap();
        assert!(load_catalog(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_catalog(Path::new("/nonexistent/books.json")).is_err());
    }
}
