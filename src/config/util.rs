//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
///
/// ```text
/// /home/user/notes/docs/vue/    ← start
/// /home/user/notes/notemap.toml ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

/// Resolve a configured path against the site root, expanding `~`.
pub fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    let full = if path.is_relative() { root.join(path) } else { path };
    full.canonicalize().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("docs/vue");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("notemap.toml"), "").unwrap();

        let found = find_config_file(&nested, Path::new("notemap.toml")).unwrap();
        assert_eq!(found, dir.path().join("notemap.toml"));
    }

    #[test]
    fn test_find_config_file_missing() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_file(dir.path(), Path::new("definitely-missing.toml")).is_none());
    }

    #[test]
    fn test_resolve_against_relative() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        let resolved = resolve_against(dir.path(), Path::new("docs"));
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("docs"));
    }

    #[test]
    fn test_resolve_against_absolute() {
        let resolved = resolve_against(Path::new("/site"), Path::new("/elsewhere/out"));
        assert_eq!(resolved, PathBuf::from("/elsewhere/out"));
    }
}
