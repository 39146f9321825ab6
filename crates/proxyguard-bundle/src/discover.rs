use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

/// Sub-directories of a bundle root that hold converted trees.
pub const POLICIES_DIR: &str = "policies";
pub const PROXIES_DIR: &str = "proxies";
pub const TARGETS_DIR: &str = "targets";

/// The directory that actually holds `policies/`, `proxies/`, `targets/`.
///
/// Accepts either that directory itself or its parent containing `apiproxy/`.
pub fn bundle_root(path: &Utf8Path) -> Utf8PathBuf {
    let nested = path.join("apiproxy");
    if nested.is_dir() && !path.join(POLICIES_DIR).is_dir() {
        nested
    } else {
        path.to_path_buf()
    }
}

/// `*.json` files directly inside `root/sub`, sorted by path.
///
/// Returns `None` when the sub-directory does not exist.
pub fn discover_tree_files(
    root: &Utf8Path,
    sub: &str,
) -> anyhow::Result<Option<Vec<Utf8PathBuf>>> {
    let dir = root.join(sub);
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("walk {dir}"))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(path) = Utf8PathBuf::from_path_buf(entry.path().to_path_buf()) else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 path");
            continue;
        };
        if path.extension() == Some("json") {
            out.push(path);
        }
    }

    // Stable order.
    out.sort();
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    #[test]
    fn discovers_sorted_json_files_only() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(&root.join("policies/b.json"), "{}");
        write_file(&root.join("policies/a.json"), "{}");
        write_file(&root.join("policies/notes.txt"), "x");
        write_file(&root.join("policies/nested/c.json"), "{}");

        let files = discover_tree_files(&root, POLICIES_DIR)
            .expect("discover")
            .expect("dir exists");
        let names: Vec<&str> = files.iter().filter_map(|p| p.file_name()).collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn missing_sub_directory_is_none() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        assert!(discover_tree_files(&root, TARGETS_DIR).expect("discover").is_none());
    }

    #[test]
    fn apiproxy_sub_directory_is_used_as_root() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(&root.join("apiproxy/policies/a.json"), "{}");
        assert_eq!(bundle_root(&root), root.join("apiproxy"));

        let flat = TempDir::new().expect("temp dir");
        let flat_root = utf8_root(&flat);
        write_file(&flat_root.join("policies/a.json"), "{}");
        assert_eq!(bundle_root(&flat_root), flat_root);
    }
}
