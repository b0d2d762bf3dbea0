use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Atoll Engine".to_string(), width: 1280, height: 720, vsync: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "CameraConfig::default_fov_degrees")]
    pub fov_degrees: f32,
    #[serde(default = "CameraConfig::default_near")]
    pub near: f32,
    #[serde(default = "CameraConfig::default_far")]
    pub far: f32,
    #[serde(default = "CameraConfig::default_orbit_radius")]
    pub orbit_radius: f32,
    #[serde(default = "CameraConfig::default_target_height")]
    pub target_height: f32,
}

impl CameraConfig {
    const fn default_fov_degrees() -> f32 {
        75.0
    }

    const fn default_near() -> f32 {
        1.0
    }

    const fn default_far() -> f32 {
        1000.0
    }

    const fn default_orbit_radius() -> f32 {
        78.0
    }

    const fn default_target_height() -> f32 {
        20.0
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: Self::default_fov_degrees(),
            near: Self::default_near(),
            far: Self::default_far(),
            orbit_radius: Self::default_orbit_radius(),
            target_height: Self::default_target_height(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    /// Seed for the per-island motion parameters. `None` seeds from entropy.
    #[serde(default)]
    pub motion_seed: Option<u64>,
    #[serde(default = "SceneConfig::default_motes_per_island")]
    pub motes_per_island: u32,
    #[serde(default)]
    pub content_path: Option<String>,
}

impl SceneConfig {
    const fn default_motes_per_island() -> u32 {
        6
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            motion_seed: None,
            motes_per_island: Self::default_motes_per_island(),
            content_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfigOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub vsync: Option<bool>,
    pub motion_seed: Option<u64>,
    pub content_path: Option<String>,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("[config] load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(width) = overrides.width {
            self.window.width = width;
        }
        if let Some(height) = overrides.height {
            self.window.height = height;
        }
        if let Some(vsync) = overrides.vsync {
            self.window.vsync = vsync;
        }
        if let Some(seed) = overrides.motion_seed {
            self.scene.motion_seed = Some(seed);
        }
        if let Some(path) = &overrides.content_path {
            self.scene.content_path = Some(path.clone());
        }
    }
}

impl AppConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.height.is_none()
            && self.vsync.is_none()
            && self.motion_seed.is_none()
            && self.content_path.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.window.width, 1280);
        assert_eq!(cfg.window.height, 720);
        assert!(cfg.window.vsync);
        assert_eq!(cfg.scene.motes_per_island, 6);
        assert!(cfg.scene.motion_seed.is_none());
    }

    #[test]
    fn overrides_replace_only_named_fields() {
        let mut cfg = AppConfig::default();
        let overrides = AppConfigOverrides {
            width: Some(1920),
            vsync: Some(false),
            motion_seed: Some(7),
            ..Default::default()
        };
        cfg.apply_overrides(&overrides);
        assert_eq!(cfg.window.width, 1920);
        assert_eq!(cfg.window.height, 720, "height untouched");
        assert!(!cfg.window.vsync);
        assert_eq!(cfg.scene.motion_seed, Some(7));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"camera":{"orbit_radius":50.0}}"#).expect("parse partial config");
        assert_eq!(cfg.camera.orbit_radius, 50.0);
        assert_eq!(cfg.camera.fov_degrees, 75.0);
        assert_eq!(cfg.window.title, "Atoll Engine");
    }
}
