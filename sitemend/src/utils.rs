//! Utility functions shared by the command implementations.

use crate::constants::get_default_exclude_folders;
use ignore::WalkBuilder;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

/// Checks whether a path contains an excluded folder component.
#[must_use]
pub fn is_excluded(path: &Path, exclude: &[String]) -> bool {
    let extra: FxHashSet<&str> = exclude.iter().map(String::as_str).collect();
    path.components().any(|component| {
        let name = component.as_os_str().to_string_lossy();
        get_default_exclude_folders().contains(name.as_ref()) || extra.contains(name.as_ref())
    })
}

/// Collect files with one of the given extensions from the target paths.
///
/// Directories are walked gitignore-aware; files passed explicitly are
/// kept as long as their extension matches, even inside excluded folders.
/// The result is sorted so batch output is stable.
#[must_use]
pub fn collect_files(paths: &[PathBuf], extensions: &[&str], exclude: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if has_extension(path, extensions) {
                files.push(path.clone());
            }
            continue;
        }

        let walker = WalkBuilder::new(path).build();
        for entry in walker.flatten() {
            let entry_path = entry.path();
            if entry_path.is_file()
                && has_extension(entry_path, extensions)
                && !is_excluded(entry_path, exclude)
            {
                files.push(entry_path.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    files
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
        })
}

/// Normalizes a path for display: forward slashes, no leading `./`.
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let display = path.display().to_string().replace('\\', "/");
    match display.strip_prefix("./") {
        Some(stripped) => stripped.to_owned(),
        None => display,
    }
}

/// Output path for a minified sibling: `styles.css` -> `styles.min.css`.
#[must_use]
pub fn minified_sibling(path: &Path) -> PathBuf {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}.min.{extension}"))
}

/// Whether a path already looks like a minified artifact.
#[must_use]
pub fn is_minified_artifact(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.contains(".min."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn excluded_folder_component_is_detected() {
        assert!(is_excluded(Path::new("node_modules/pkg/a.js"), &[]));
        assert!(is_excluded(
            Path::new("site/generated/a.html"),
            &["generated".to_owned()]
        ));
        assert!(!is_excluded(Path::new("site/a.html"), &[]));
    }

    #[test]
    fn collect_files_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("styles.css"), "body{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = collect_files(&[dir.path().to_path_buf()], &["html", "css"], &[]);
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn collect_files_skips_excluded_folders() {
        let dir = TempDir::new().unwrap();
        let skipped = dir.path().join("dist");
        fs::create_dir_all(&skipped).unwrap();
        fs::write(skipped.join("bundle.js"), "x").unwrap();
        fs::write(dir.path().join("app.js"), "x").unwrap();

        let files = collect_files(&[dir.path().to_path_buf()], &["js"], &[]);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app.js"));
    }

    #[test]
    fn explicit_file_bypasses_walk() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page.html");
        fs::write(&file, "<html></html>").unwrap();

        let files = collect_files(&[file.clone()], &["html"], &[]);
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn minified_sibling_name() {
        assert_eq!(
            minified_sibling(Path::new("assets/styles.css")),
            PathBuf::from("assets/styles.min.css")
        );
        assert_eq!(
            minified_sibling(Path::new("script.js")),
            PathBuf::from("script.min.js")
        );
    }

    #[test]
    fn minified_artifacts_are_recognized() {
        assert!(is_minified_artifact(Path::new("styles.min.css")));
        assert!(!is_minified_artifact(Path::new("styles.css")));
    }

    #[test]
    fn display_path_is_normalized() {
        assert_eq!(normalize_display_path(Path::new("./site/index.html")), "site/index.html");
    }
}
