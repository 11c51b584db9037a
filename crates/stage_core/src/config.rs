//! Stage configuration, loadable from JSON.
//!
//! ```json
//! {
//!   "fps": 60,
//!   "default_font": "assets/fonts/Sans.ttf",
//!   "window": { "width": 640, "height": 480, "title": "My Game", "icon": "assets/icon.png" }
//! }
//! ```
//! Every field is optional; missing fields take the defaults below.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StageError, StageResult};
use crate::time::DEFAULT_FPS;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StageConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub default_font: Option<PathBuf>,
    #[serde(default)]
    pub window: Option<WindowConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub icon: Option<PathBuf>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            default_font: None,
            window: None,
        }
    }
}

impl StageConfig {
    pub fn validate(&self) -> StageResult<()> {
        if self.fps == 0 {
            return Err(StageError::Config("fps must be > 0".to_string()));
        }
        if let Some(window) = &self.window {
            if window.width == 0 || window.height == 0 {
                return Err(StageError::Config(
                    "window width and height must be > 0".to_string(),
                ));
            }
            if window.title.trim().is_empty() {
                return Err(StageError::Config("window title is empty".to_string()));
            }
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> StageResult<StageConfig> {
    let raw = fs::read_to_string(path).map_err(|source| StageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: StageConfig = serde_json::from_str(&raw).map_err(|source| StageError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

const fn default_fps() -> u32 {
    DEFAULT_FPS
}

fn default_title() -> String {
    "Stage".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "stage_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn empty_object_uses_defaults() {
        let path = temp_file_path("empty");
        fs::write(&path, "{}").expect("write temp file");
        let config = load_config_from_path(&path).expect("defaults are valid");
        assert_eq!(config, StageConfig::default());
        assert_eq!(config.fps, 60);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn parses_window_section() {
        let path = temp_file_path("window");
        fs::write(
            &path,
            r#"{
              "fps": 30,
              "default_font": "fonts/sans.ttf",
              "window": { "width": 320, "height": 240, "icon": "icon.png" }
            }"#,
        )
        .expect("write temp file");
        let config = load_config_from_path(&path).expect("valid config");
        assert_eq!(config.fps, 30);
        assert_eq!(config.default_font, Some(PathBuf::from("fonts/sans.ttf")));
        let window = config.window.expect("window section");
        assert_eq!((window.width, window.height), (320, 240));
        assert_eq!(window.title, "Stage");
        assert_eq!(window.icon, Some(PathBuf::from("icon.png")));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_zero_fps() {
        let path = temp_file_path("zero_fps");
        fs::write(&path, r#"{ "fps": 0 }"#).expect("write temp file");
        let err = load_config_from_path(&path).expect_err("fps 0 should fail");
        assert!(err.to_string().contains("fps must be > 0"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_zero_window_size() {
        let config = StageConfig {
            window: Some(WindowConfig {
                width: 0,
                height: 10,
                title: "t".to_string(),
                icon: None,
            }),
            ..StageConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_reported_with_path() {
        let path = temp_file_path("bad_json");
        fs::write(&path, "{ fps: ").expect("write temp file");
        let err = load_config_from_path(&path).expect_err("bad json should fail");
        assert!(matches!(err, StageError::Json { .. }));
        let _ = fs::remove_file(path);
    }
}
