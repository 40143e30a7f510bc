use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_width() -> i32 {
    360
}

fn default_height() -> i32 {
    540
}

fn default_margin() -> i32 {
    12
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Widget settings stored in settings.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Widget width in pixels
    #[serde(default = "default_width")]
    pub widget_width: i32,
    /// Widget height in pixels
    #[serde(default = "default_height")]
    pub widget_height: i32,
    /// Gap kept between the widget and the work-area edge, in pixels
    #[serde(default = "default_margin")]
    pub edge_margin: i32,
    /// Log level for the rotating file log
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            widget_width: default_width(),
            widget_height: default_height(),
            edge_margin: default_margin(),
            log_level: default_log_level(),
        }
    }
}

/// Load settings from settings.json, falling back to defaults when absent
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&content)?;
    Ok(settings)
}

/// Save settings to settings.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.widget_width = 420;
        settings.log_level = "debug".to_string();

        save_settings(&path, &settings).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "widget_width": 300 }"#).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.widget_width, 300);
        assert_eq!(loaded.widget_height, Settings::default().widget_height);
        assert_eq!(loaded.log_level, "info");
    }
}
