//! Platform-specific configuration and data paths.

use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// File name of the reference document looked up in the data directory.
const REFERENCE_FILE_NAME: &str = "pest.json";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME).ok_or(Error::ConfigDirNotFound)
}

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/insectifica/`
/// - macOS: `~/Library/Application Support/insectifica/`
/// - Windows: `%APPDATA%\insectifica\config\`
pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Get the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get the data directory for the current platform (`~/.local/share/insectifica/` on Linux).
pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

/// Reference document used when none is configured, if it exists.
pub fn default_reference_path() -> Option<PathBuf> {
    data_dir()
        .ok()
        .map(|dir| dir.join(REFERENCE_FILE_NAME))
        .filter(|path| path.exists())
}
