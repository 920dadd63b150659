//! Application configuration management

use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the backend API
    pub backend_url: String,
    /// Public site serving published pages (`{site_url}/live/{uuid}`)
    pub site_url: String,
    /// Session token sent as the auth cookie
    pub session_token: String,
    /// Editor settings
    pub editor: EditorConfig,
    /// UI settings
    pub ui: UiConfig,
}

/// Editor-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Base font size for paragraph text in pixels
    pub font_size: f32,
    /// Font size for code blocks in pixels
    pub code_font_size: f32,
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme (light/dark)
    pub theme: String,
    /// Sidebar width
    pub sidebar_width: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8080".to_string(),
            site_url: "http://localhost:3000".to_string(),
            session_token: String::new(),
            editor: EditorConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            code_font_size: 14.0,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            sidebar_width: 240.0,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "opalite", "Opalite")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    pub fn dark_mode(&self) -> bool {
        self.ui.theme == "dark"
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.ui.theme = if dark { "dark" } else { "light" }.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.ui.theme, "light");
        assert!(config.session_token.is_empty());
    }

    #[test]
    fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.backend_url = "https://api.example.test".to_string();
        config.set_dark_mode(true);
        config.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(loaded.backend_url, "https://api.example.test");
        assert!(loaded.dark_mode());
    }
}
