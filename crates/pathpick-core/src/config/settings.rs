//! Picker configuration loaded from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::nav::filter::FilterOptions;
use crate::nav::resolve::{directory_shaped, SEP};

/// Top-level picker configuration.
///
/// Every field has a default, so the picker works without a config file.
/// Call [`Config::load`] to read from a TOML path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub labels: LabelsConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// The base path to open the picker at: the directory of the active
    /// document when the host has one, else [`GeneralConfig::initial_directory`].
    pub fn initial_base(&self, active_document_dir: Option<&Path>) -> String {
        match active_document_dir {
            Some(dir) => directory_shaped(dir.to_string_lossy().into_owned()),
            None => self.general.initial_directory.clone(),
        }
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            create_file_label: self.labels.create_file.clone(),
            create_directory_label: self.labels.create_directory.clone(),
            show_unreadable: self.general.show_unreadable,
        }
    }
}

/// Where the picker starts and what it lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_initial_directory")]
    pub initial_directory: String,
    /// List entries whose metadata could not be read.
    #[serde(default)]
    pub show_unreadable: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            initial_directory: default_initial_directory(),
            show_unreadable: false,
        }
    }
}

/// Text of the synthetic "create" rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelsConfig {
    #[serde(default = "default_create_file")]
    pub create_file: String,
    #[serde(default = "default_create_directory")]
    pub create_directory: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            create_file: default_create_file(),
            create_directory: default_create_directory(),
        }
    }
}

fn default_initial_directory() -> String {
    format!("~{SEP}")
}

fn default_create_file() -> String {
    FilterOptions::default().create_file_label
}

fn default_create_directory() -> String {
    FilterOptions::default().create_directory_label
}
