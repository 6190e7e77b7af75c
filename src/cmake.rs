use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{LaunchError, Result};

#[derive(Debug, Deserialize)]
pub struct CMakePreset {
    name: String,
    #[serde(default = "default_hidden")]
    hidden: bool,
}

impl CMakePreset {
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Deserialize)]
pub struct CMakePresets {
    #[serde(rename = "configurePresets", default)]
    configure_presets: Vec<CMakePreset>,
}

impl CMakePresets {
    /// Load `CMakePresets.json` from a project directory or the file itself.
    pub fn new<T>(path: T) -> Result<Self>
    where
        T: Into<PathBuf>, {
        let path = path.into();

        let path = if path.ends_with("CMakePresets.json") {
            path
        } else {
            path.join("CMakePresets.json")
        };

        let content = std::fs::read_to_string(&path).map_err(|e| LaunchError::Presets {
            path: path.clone(),
            source: Box::new(e),
        })?;
        serde_json::from_str(&content).map_err(|e| LaunchError::Presets {
            path,
            source: Box::new(e),
        })
    }

    /// Visible configure preset named `name`; hidden presets only serve as bases.
    pub fn get_preset(&self, name: &str) -> Option<&CMakePreset> {
        self.configure_presets
            .iter()
            .find(|p| p.name == name && !p.hidden)
    }

    pub fn require(&self, name: &str) -> Result<&CMakePreset> {
        self.get_preset(name)
            .ok_or_else(|| LaunchError::PresetNotFound(name.to_string()))
    }
}

fn default_hidden() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/hello");

    #[test]
    fn get_cmake_preset() {
        let presets = CMakePresets::new(FIXTURE).unwrap();
        let preset = presets.get_preset("default").expect("Failed to get preset default");
        assert_eq!(preset.get_name(), "default");
    }

    #[test]
    fn hidden_preset_is_not_selectable() {
        let presets = CMakePresets::new(FIXTURE).unwrap();
        assert!(presets.get_preset("base").is_none());
        assert!(matches!(presets.require("base"), Err(LaunchError::PresetNotFound(_))));
    }

    #[test]
    fn accepts_path_to_file() {
        let presets = CMakePresets::new(format!("{FIXTURE}/CMakePresets.json")).unwrap();
        assert!(presets.require("default").is_ok());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CMakePresets::new(dir.path()).unwrap_err();
        assert!(matches!(err, LaunchError::Presets { .. }));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("CMakePresets.json"), "{ not json").unwrap();
        let err = CMakePresets::new(dir.path()).unwrap_err();
        assert!(matches!(err, LaunchError::Presets { .. }));
    }
}
