use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TrackerError};
use crate::session::Role;

/// Dashboard settings, read from a YAML file.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// File the export writes to
    pub export_file: PathBuf,
    /// Name of the exported worksheet
    pub sheet_name: String,
    /// Role the session starts in
    pub default_role: Role,
    /// Start with the sample project in the list
    pub seed_sample_project: bool,
    /// Extensions accepted for BRD attachments
    pub brd_extensions: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            export_file: PathBuf::from("projects.xlsx"),
            sheet_name: "Projects".to_string(),
            default_role: Role::Admin,
            seed_sample_project: true,
            brd_extensions: ["pdf", "jpg", "xlsx", "xls"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl TrackerConfig {
    /// Loads the config from the provided path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            fs::read_to_string(&path).map_err(|e| TrackerError::io(path.as_ref(), e))?;

        serde_yaml::from_str(&content).map_err(|e| {
            TrackerError::Config(format!("Failed to parse {:?}: {}", path.as_ref(), e))
        })
    }

    /// Loads the config from `path`, or from the default location when no path is given.
    ///
    /// A missing file at the default location is not an error; defaults are used.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match get_config_path() {
            Some(default_path) if default_path.exists() => Self::load(default_path),
            _ => Ok(Self::default()),
        }
    }
}

/// Gets the path of the default config file, if a config directory exists on this platform
pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("project-tracker").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.export_file, PathBuf::from("projects.xlsx"));
        assert_eq!(config.sheet_name, "Projects");
        assert_eq!(config.default_role, Role::Admin);
        assert!(config.seed_sample_project);
        assert_eq!(config.brd_extensions, vec!["pdf", "jpg", "xlsx", "xls"]);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "sheet_name: Q3\ndefault_role: user\nseed_sample_project: false\n").unwrap();

        let config = TrackerConfig::load(&path).unwrap();

        assert_eq!(config.sheet_name, "Q3");
        assert_eq!(config.default_role, Role::User);
        assert!(!config.seed_sample_project);
        assert_eq!(config.export_file, PathBuf::from("projects.xlsx"));
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempdir().unwrap();
        let result = TrackerConfig::load_or_default(Some(&dir.path().join("absent.yaml")));
        assert!(matches!(result, Err(TrackerError::Io { .. })));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "default_role: [not, a, role]\n").unwrap();

        let err = TrackerConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
