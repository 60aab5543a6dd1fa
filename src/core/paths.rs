use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base tidytree config directory (~/.config/tidytree/ on Unix, %APPDATA%\tidytree on Windows)
pub fn tidytree() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("tidytree"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("tidytree"))
    }
}

/// Global tidytree.json config file path
pub fn tidytree_json() -> Result<PathBuf> {
    Ok(tidytree()?.join("tidytree.json"))
}
