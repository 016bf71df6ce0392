use std::path::{Path, PathBuf};

/// File extensions accepted for a stored cover asset.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Destination path for an entry's cover with the given extension.
pub fn cover_path(dir: &Path, id: &str, ext: &str) -> PathBuf {
    dir.join(format!("{}.{}", id, ext))
}

/// Map a candidate URL to an on-disk extension.
///
/// The URL path's extension is used when it is on the allow-list
/// (case-insensitive); anything else falls back to `jpg`.
pub fn extension_for(candidate: &str) -> &'static str {
    let ext = url::Url::parse(candidate).ok().and_then(|u| {
        Path::new(u.path())
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    });
    match ext {
        Some(e) => ALLOWED_EXTENSIONS
            .iter()
            .find(|allowed| **allowed == e)
            .copied()
            .unwrap_or("jpg"),
        None => "jpg",
    }
}

/// Find an existing, non-empty cover for an entry under any allowed extension.
///
/// Zero-byte files (left behind by an interrupted run) count as absent.
pub async fn find_existing(dir: &Path, id: &str) -> Option<PathBuf> {
    for ext in ALLOWED_EXTENSIONS {
        let path = cover_path(dir, id, ext);
        if let Ok(meta) = tokio::fs::metadata(&path).await {
            if meta.len() > 0 {
                return Some(path);
            }
        }
    }
    None
}

/// Remove stale zero-byte covers for an entry, so a fresh download under a
/// different extension cannot leave two files for the same id.
pub async fn remove_stale(dir: &Path, id: &str) {
    for ext in ALLOWED_EXTENSIONS {
        let path = cover_path(dir, id, ext);
        if let Ok(meta) = tokio::fs::metadata(&path).await {
            if meta.len() == 0 {
                let _ = tokio::fs::remove_file(&path).await;
            }
        }
    }
}

/// Remove every stored cover for an entry, regardless of size.
pub async fn remove_all(dir: &Path, id: &str) {
    for ext in ALLOWED_EXTENSIONS {
        let _ = tokio::fs::remove_file(cover_path(dir, id, ext)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_comes_from_the_url_path() {
        assert_eq!(extension_for("https://img.example/dune123.png"), "png");
        assert_eq!(extension_for("https://img.example/a/b/cover.webp"), "webp");
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert_eq!(extension_for("https://img.example/cover.JPG"), "jpg");
        assert_eq!(extension_for("https://img.example/cover.JpEg"), "jpeg");
    }

    #[test]
    fn query_strings_do_not_leak_into_the_extension() {
        assert_eq!(extension_for("https://img.example/cover.gif?w=300&h=400"), "gif");
    }

    #[test]
    fn unknown_or_absent_extensions_default_to_jpg() {
        assert_eq!(extension_for("https://img.example/cover.svg"), "jpg");
        assert_eq!(extension_for("https://img.example/cover"), "jpg");
        assert_eq!(extension_for("not a url"), "jpg");
    }

    #[tokio::test]
    async fn find_existing_requires_a_non_empty_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(find_existing(tmp.path(), "b1").await.is_none());

        std::fs::write(cover_path(tmp.path(), "b1", "jpg"), b"").unwrap();
        assert!(find_existing(tmp.path(), "b1").await.is_none());

        std::fs::write(cover_path(tmp.path(), "b1", "webp"), b"img").unwrap();
        let found = find_existing(tmp.path(), "b1").await.unwrap();
        assert_eq!(found, cover_path(tmp.path(), "b1", "webp"));
    }

    #[tokio::test]
    async fn remove_stale_only_touches_zero_byte_files() {
        let tmp = tempfile::tempdir().unwrap();
        let empty = cover_path(tmp.path(), "b2", "jpg");
        let real = cover_path(tmp.path(), "b2", "png");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&real, b"img").unwrap();

        remove_stale(tmp.path(), "b2").await;
        assert!(!empty.exists());
        assert!(real.exists());
    }
}
