use std::path::{Path, PathBuf};

use thiserror::Error;

/// Overrides the folder assets are looked up under
pub const ASSET_ROOT_VAR: &str = "COUNTING_GAME_ASSET_ROOT";
/// Overrides the font used for all text
pub const FONT_VAR: &str = "COUNTING_GAME_FONT";

pub const DEFAULT_WINDOW_TITLE: &str = "Toddler Counting Game";

/// Fonts tried in order under the Windows fonts folder
const DEFAULT_FONT_FILES: [&str; 3] = ["arialbd.ttf", "arial.ttf", "segoeui.ttf"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{var} points to {path}, which is not a directory")]
    AssetRootNotDirectory { var: &'static str, path: PathBuf },

    #[error("{var} points to {path}, which is not a file")]
    FontNotFile { var: &'static str, path: PathBuf },

    #[error("{var} is set but empty")]
    Empty { var: &'static str },
}

/// Runtime settings for one game session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub asset_root: PathBuf,
    pub font_path: Option<PathBuf>,
    pub window_title: String,
}

impl GameSettings {
    /// Settings with every value at its default
    pub fn defaults() -> Self {
        Self {
            asset_root: default_asset_root(),
            font_path: default_font(std::env::var_os("WINDIR").map(PathBuf::from).as_deref()),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
        }
    }

    /// Reads settings from the process environment
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from a variable lookup
    ///
    /// Overrides are validated against the filesystem; unset variables use
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::defaults();

        if let Some(root) = lookup(ASSET_ROOT_VAR) {
            let path = non_empty(ASSET_ROOT_VAR, root)?;
            if !path.is_dir() {
                return Err(SettingsError::AssetRootNotDirectory {
                    var: ASSET_ROOT_VAR,
                    path,
                });
            }
            settings.asset_root = path;
        }

        if let Some(font) = lookup(FONT_VAR) {
            let path = non_empty(FONT_VAR, font)?;
            if !path.is_file() {
                return Err(SettingsError::FontNotFile { var: FONT_VAR, path });
            }
            settings.font_path = Some(path);
        }

        Ok(settings)
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::defaults()
    }
}

fn non_empty(var: &'static str, value: String) -> Result<PathBuf, SettingsError> {
    if value.trim().is_empty() {
        Err(SettingsError::Empty { var })
    } else {
        Ok(PathBuf::from(value))
    }
}

/// Directory of the running executable, or the working directory
fn default_asset_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// First existing default font under `windows_dir`
fn default_font(windows_dir: Option<&Path>) -> Option<PathBuf> {
    let fonts = windows_dir?.join("Fonts");
    DEFAULT_FONT_FILES
        .iter()
        .map(|name| fonts.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn lookup_from(vars: HashMap<&'static str, String>) -> impl Fn(&str) -> Option<String> {
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn unset_variables_use_defaults() {
        let settings = GameSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.window_title, DEFAULT_WINDOW_TITLE);
        assert_eq!(settings.asset_root, default_asset_root());
    }

    #[test]
    fn asset_root_override() {
        let dir = TempDir::new().unwrap();
        let vars = HashMap::from([(ASSET_ROOT_VAR, dir.path().display().to_string())]);
        let settings = GameSettings::from_lookup(lookup_from(vars)).unwrap();
        assert_eq!(settings.asset_root, dir.path());
    }

    #[test]
    fn asset_root_must_be_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, b"").unwrap();
        let vars = HashMap::from([(ASSET_ROOT_VAR, file.display().to_string())]);

        let err = GameSettings::from_lookup(lookup_from(vars)).unwrap_err();
        assert_eq!(
            err,
            SettingsError::AssetRootNotDirectory {
                var: ASSET_ROOT_VAR,
                path: file
            }
        );
    }

    #[test]
    fn font_override_must_exist() {
        let vars = HashMap::from([(FONT_VAR, "/no/such/font.ttf".to_string())]);
        let err = GameSettings::from_lookup(lookup_from(vars)).unwrap_err();
        assert!(matches!(err, SettingsError::FontNotFile { .. }));
    }

    #[test]
    fn empty_override_is_rejected() {
        let vars = HashMap::from([(ASSET_ROOT_VAR, "  ".to_string())]);
        let err = GameSettings::from_lookup(lookup_from(vars)).unwrap_err();
        assert_eq!(err, SettingsError::Empty { var: ASSET_ROOT_VAR });
    }

    #[test]
    fn default_font_prefers_bold_arial() {
        let windows = TempDir::new().unwrap();
        let fonts = windows.path().join("Fonts");
        fs::create_dir_all(&fonts).unwrap();
        fs::write(fonts.join("arial.ttf"), b"").unwrap();
        fs::write(fonts.join("segoeui.ttf"), b"").unwrap();
        assert_eq!(default_font(Some(windows.path())), Some(fonts.join("arial.ttf")));

        fs::write(fonts.join("arialbd.ttf"), b"").unwrap();
        assert_eq!(default_font(Some(windows.path())), Some(fonts.join("arialbd.ttf")));
    }

    #[test]
    fn no_windows_dir_means_no_default_font() {
        assert_eq!(default_font(None), None);
    }
}
