//! Configuration loading and management.

mod config_data;
mod language;
mod templates;

use std::fs;
use std::path::{Path, PathBuf};

pub use config_data::Config;
pub use language::{LanguageInfo, LanguageRegistry};
pub use templates::builtin_languages;

use crate::errors::Result;

/// Config file names, in order of preference within one directory.
const CONFIG_FILES: &[&str] = &["listings.toml", ".listings.toml"];

/// Returns the nearest config file in `start_dir` or any of its ancestors.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .flat_map(|dir| CONFIG_FILES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

/// Parses one config file.
pub fn read_config_file(path: &Path) -> Result<Config> {
    let config: Config = toml::from_str(&fs::read_to_string(path)?)?;
    config.registry()?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Reads the nearest config file, falling back to the defaults when there
/// is none.
pub fn read_config(start_dir: &Path) -> Result<Config> {
    find_config_file(start_dir).map_or_else(|| Ok(Config::default()), |path| read_config_file(&path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_found_in_ancestor() {
        let dir = tempdir().unwrap();
        let hidden = dir.path().join(".listings.toml");
        fs::write(&hidden, "").unwrap();
        let chapters = dir.path().join("book/chapters");
        fs::create_dir_all(&chapters).unwrap();

        assert_eq!(find_config_file(&chapters), Some(hidden));

        // the visible name wins within one directory
        let visible = dir.path().join("listings.toml");
        fs::write(&visible, "").unwrap();
        assert_eq!(find_config_file(&chapters), Some(visible));
    }

    #[test]
    fn test_config_directory_is_ignored() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("listings.toml")).unwrap();
        let nested = dir.path().join("x");
        fs::create_dir(&nested).unwrap();
        assert_ne!(find_config_file(&nested), Some(dir.path().join("listings.toml")));
    }

    #[test]
    fn test_unknown_search_root_language() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("listings.toml");
        fs::write(&config_path, "[search_roots]\ncobol = \"src\"\n").unwrap();
        assert!(matches!(
            read_config_file(&config_path),
            Err(crate::errors::ListingsError::Config(_))
        ));
    }

    #[test]
    fn test_read_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("listings.toml");
        fs::write(
            &config_path,
            r#"
source_patterns = ["chapters/*.md"]

[search_roots]
python = "../python-examples"
rust = "/git/rust-examples"
"#,
        )
        .unwrap();

        let config = read_config_file(&config_path).unwrap();
        assert_eq!(config.source_patterns, vec!["chapters/*.md"]);
        assert_eq!(config.exclude_patterns, vec!["*.tmp.md"]);
        assert_eq!(
            config.search_roots.get("rust"),
            Some(&PathBuf::from("/git/rust-examples"))
        );

        let registry = config.registry().unwrap();
        assert!(registry.get("python").unwrap().search_root.is_some());
    }

    #[test]
    fn test_read_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("listings.toml");
        fs::write(&config_path, "source_patterns = 3").unwrap();
        assert!(read_config_file(&config_path).is_err());
    }

    #[test]
    fn test_read_config_without_file() {
        let dir = tempdir().unwrap();
        if find_config_file(dir.path()).is_none() {
            assert_eq!(read_config(dir.path()).unwrap(), Config::default());
        }
    }
}
