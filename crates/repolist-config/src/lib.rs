pub mod error;

pub use error::*;

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// カタログファイルの環境変数
pub const CATALOG_PATH_ENV: &str = "REPOLIST_CATALOG_PATH";

/// カタログファイル名の候補（優先順）
pub const CATALOG_FILENAMES: [&str; 5] = [
    "common-repo-list.json",
    "common-repo-list.js",
    "common-repo-list.yaml",
    "common-repo-list.yml",
    "common-repo-list.kdl",
];

/// 各ディレクトリ内でカタログを置いてよいサブディレクトリ
const RESOURCES_DIR: &str = "resources";

/// repolist の設定ディレクトリ（~/.config/repolist）
pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("repolist"))
}

/// カレントディレクトリを起点にカタログファイルを探す
pub fn find_catalog_file() -> Result<PathBuf> {
    let current_dir = std::env::current_dir()?;
    find_catalog_file_from(&current_dir)
}

/// カタログファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 REPOLIST_CATALOG_PATH (直接パス指定)
/// 2. start_dir から上に向かって、各ディレクトリと その resources/ 内
/// 3. ~/.config/repolist/ (グローバル設定)
#[tracing::instrument]
pub fn find_catalog_file_from(start_dir: &Path) -> Result<PathBuf> {
    // 1. 環境変数
    if let Ok(path_str) = std::env::var(CATALOG_PATH_ENV) {
        let path = PathBuf::from(&path_str);
        debug!(env_path = %path_str, "Checking {}", CATALOG_PATH_ENV);
        if path.is_file() {
            info!(catalog_path = %path.display(), "Found catalog from environment variable");
            return Ok(path);
        }
        warn!(env_path = %path_str, "{} is set but file does not exist", CATALOG_PATH_ENV);
    }

    // 2. 上方向探索
    let mut current = start_dir.to_path_buf();
    loop {
        let found =
            find_in_dir(&current).or_else(|| find_in_dir(&current.join(RESOURCES_DIR)));
        if let Some(found) = found {
            info!(catalog_path = %found.display(), "Found catalog file");
            return Ok(found);
        }

        if !current.pop() {
            break;
        }
    }

    // 3. グローバル設定
    if let Ok(global_dir) = config_dir()
        && let Some(found) = find_in_dir(&global_dir)
    {
        info!(catalog_path = %found.display(), "Found global catalog file");
        return Ok(found);
    }

    debug!("Catalog file not found");
    Err(ConfigError::CatalogFileNotFound(start_dir.to_path_buf()))
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CATALOG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    fn without_env<R>(f: impl FnOnce() -> R) -> R {
        temp_env::with_var_unset(CATALOG_PATH_ENV, f)
    }

    #[test]
    fn test_config_dir() {
        if let Ok(dir) = config_dir() {
            assert!(dir.ends_with("repolist"));
        }
    }

    #[test]
    #[serial]
    fn test_find_in_start_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("common-repo-list.json"), "{}").unwrap();

        let found = without_env(|| find_catalog_file_from(temp_dir.path())).unwrap();
        assert_eq!(found, temp_dir.path().join("common-repo-list.json"));
    }

    #[test]
    #[serial]
    fn test_json_preferred_over_other_formats() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("common-repo-list.kdl"), "").unwrap();
        fs::write(temp_dir.path().join("common-repo-list.js"), "{}").unwrap();
        fs::write(temp_dir.path().join("common-repo-list.json"), "{}").unwrap();

        let found = without_env(|| find_catalog_file_from(temp_dir.path())).unwrap();
        assert!(found.ends_with("common-repo-list.json"));
    }

    #[test]
    #[serial]
    fn test_find_in_resources_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let resources = temp_dir.path().join("resources");
        fs::create_dir(&resources).unwrap();
        fs::write(resources.join("common-repo-list.js"), "{}").unwrap();

        let found = without_env(|| find_catalog_file_from(temp_dir.path())).unwrap();
        assert_eq!(found, resources.join("common-repo-list.js"));
    }

    #[test]
    #[serial]
    fn test_find_from_subdirectory() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("common-repo-list.yaml"), "{}").unwrap();

        let sub_dir = temp_dir.path().join("jobs").join("nightly");
        fs::create_dir_all(&sub_dir).unwrap();

        let found = without_env(|| find_catalog_file_from(&sub_dir)).unwrap();
        assert_eq!(found, temp_dir.path().join("common-repo-list.yaml"));
    }

    #[test]
    #[serial]
    fn test_env_var_takes_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("common-repo-list.json"), "{}").unwrap();
        let custom = temp_dir.path().join("custom.kdl");
        fs::write(&custom, "").unwrap();

        let found = temp_env::with_var(CATALOG_PATH_ENV, Some(custom.as_os_str()), || {
            find_catalog_file_from(temp_dir.path())
        })
        .unwrap();
        assert_eq!(found, custom);
    }

    #[test]
    #[serial]
    fn test_env_var_pointing_nowhere_falls_through() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("common-repo-list.json"), "{}").unwrap();
        let missing = temp_dir.path().join("missing.json");

        let found = temp_env::with_var(CATALOG_PATH_ENV, Some(missing.as_os_str()), || {
            find_catalog_file_from(temp_dir.path())
        })
        .unwrap();
        assert!(found.ends_with("common-repo-list.json"));
    }

    #[test]
    #[serial]
    fn test_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();

        let result = without_env(|| find_catalog_file_from(temp_dir.path()));
        match result {
            Err(ConfigError::CatalogFileNotFound(start)) => assert_eq!(start, temp_dir.path()),
            // グローバル設定にカタログがある環境では見つかる
            Ok(path) => assert!(path.starts_with(config_dir().unwrap())),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
