use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::normalize::{NormalizeOptions, Normalizer, DEFAULT_QUOTE_CHARS};
use crate::paths;
use crate::tidy::{EmptyNamePolicy, RenameOptions, DEFAULT_FALLBACK_NAME, DEFAULT_MAX_SUFFIX};

/// Root configuration structure for tidytree.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TidyConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via tidytree.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Defaults {
    /// Apostrophe-like characters removed from names.
    #[serde(default = "default_quote_chars")]
    pub quote_chars: Vec<char>,

    #[serde(default)]
    pub empty_name: EmptyNamePolicy,

    /// Used when `empty_name` is `fallback`. Must already be normalized.
    #[serde(default = "default_fallback_name")]
    pub fallback_name: String,

    /// Highest collision suffix tried before giving up.
    #[serde(default = "default_max_suffix")]
    pub max_suffix: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            quote_chars: default_quote_chars(),
            empty_name: EmptyNamePolicy::default(),
            fallback_name: default_fallback_name(),
            max_suffix: default_max_suffix(),
        }
    }
}

fn default_quote_chars() -> Vec<char> {
    DEFAULT_QUOTE_CHARS.to_vec()
}

fn default_fallback_name() -> String {
    DEFAULT_FALLBACK_NAME.to_string()
}

fn default_max_suffix() -> u32 {
    DEFAULT_MAX_SUFFIX
}

impl Defaults {
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(c) = self
            .quote_chars
            .iter()
            .find(|c| c.is_whitespace() || **c == '-')
        {
            return Err(crate::Error::config_invalid_value(
                "defaults.quote_chars",
                Some(c.to_string()),
                "Quote characters cannot be whitespace or '-'",
            ));
        }

        if self.max_suffix == 0 {
            return Err(crate::Error::config_invalid_value(
                "defaults.max_suffix",
                Some("0".to_string()),
                "max_suffix must be at least 1",
            ));
        }

        let normalizer = Normalizer::new(self.normalize_options());
        if self.fallback_name.is_empty() || !normalizer.is_normalized(&self.fallback_name) {
            return Err(crate::Error::config_invalid_value(
                "defaults.fallback_name",
                Some(self.fallback_name.clone()),
                format!(
                    "fallback_name must be non-empty and already normalized (e.g. '{}')",
                    normalizer.normalize(&self.fallback_name)
                ),
            ));
        }

        Ok(())
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            quote_chars: self.quote_chars.clone(),
        }
    }

    /// Validated options for the tree renamer.
    pub fn rename_options(&self) -> crate::Result<RenameOptions> {
        self.validate()?;
        Ok(RenameOptions {
            normalize: self.normalize_options(),
            empty_name: self.empty_name,
            fallback_name: self.fallback_name.clone(),
            max_suffix: self.max_suffix,
        })
    }
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load the global tidytree.json, falling back to built-in defaults when the
/// file does not exist. A file that exists but does not parse is an error.
pub fn load_config() -> crate::Result<TidyConfig> {
    let path = paths::tidytree_json()?;
    if !path.exists() {
        return Ok(TidyConfig::default());
    }
    load_config_from(&path)
}

/// Load config from an explicit file. The file must exist.
pub fn load_config_from(path: &Path) -> crate::Result<TidyConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    let config: TidyConfig = serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))?;

    config.defaults.validate()?;
    Ok(config)
}

/// Save config to tidytree.json file (creates if missing).
pub fn save_config(config: &TidyConfig) -> crate::Result<()> {
    let path = paths::tidytree_json()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
        })?;
    }

    let content = serde_json::to_string_pretty(config).map_err(|e| {
        crate::Error::internal_json(e.to_string(), Some("serialize tidytree.json".to_string()))
    })?;

    fs::write(&path, content).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("write {}", path.display())))
    })?;

    Ok(())
}

/// Check if tidytree.json file exists
pub fn config_exists() -> bool {
    paths::tidytree_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Delete tidytree.json file (reset to defaults)
pub fn reset_config() -> crate::Result<bool> {
    let path = paths::tidytree_json()?;

    if path.exists() {
        fs::remove_file(&path).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("delete {}", path.display())))
        })?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Get the path to tidytree.json (for display purposes)
pub fn config_path() -> crate::Result<String> {
    Ok(paths::tidytree_json()?.display().to_string())
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("tidytree.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn builtin_defaults_are_valid() {
        let defaults = builtin_defaults();
        assert_eq!(defaults.quote_chars, vec!['\'']);
        assert_eq!(defaults.empty_name, EmptyNamePolicy::Skip);
        assert!(defaults.rename_options().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"defaults": {"quote_chars": ["'", "’"], "empty_name": "fallback"}}"#,
        );

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.defaults.quote_chars, vec!['\'', '\u{2019}']);
        assert_eq!(config.defaults.empty_name, EmptyNamePolicy::Fallback);
        assert_eq!(config.defaults.fallback_name, "untitled");
        assert_eq!(config.defaults.max_suffix, DEFAULT_MAX_SUFFIX);
    }

    #[test]
    fn empty_object_is_builtin_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "{}");
        assert_eq!(load_config_from(&path).unwrap(), TidyConfig::default());
    }

    #[test]
    fn malformed_json_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "{ not json");
        let err = load_config_from(&path).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn unnormalized_fallback_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"defaults": {"fallback_name": "No Name"}}"#);
        let err = load_config_from(&path).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
        assert_eq!(err.details["key"], "defaults.fallback_name");
    }

    #[test]
    fn whitespace_quote_char_is_rejected() {
        let defaults = Defaults {
            quote_chars: vec![' '],
            ..Defaults::default()
        };
        assert!(defaults.validate().is_err());
    }

    #[test]
    fn zero_max_suffix_is_rejected() {
        let defaults = Defaults {
            max_suffix: 0,
            ..Defaults::default()
        };
        assert!(defaults.rename_options().is_err());
    }
}
