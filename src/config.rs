// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export configuration system

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File looked up in the working directory by [`ExportConfig::load`]
pub const CONFIG_FILE: &str = "polyframe-vtk.toml";

/// Which backend renders the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// 2D raster output; VTK files are written only when export flags ask for it
    #[default]
    Cairo,
    /// VTK pipeline; implies static export
    Vtk,
}

impl FromStr for RendererKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cairo" => Ok(Self::Cairo),
            "vtk" => Ok(Self::Vtk),
            other => bail!("Unknown renderer '{other}', expected 'cairo' or 'vtk'"),
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cairo => write!(f, "cairo"),
            Self::Vtk => write!(f, "vtk"),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Root of all output; VTK files go under `<media_dir>/vtk/<SceneName>`
    pub media_dir: PathBuf,
    /// Write a static snapshot when the scene finishes
    pub vtk_export: bool,
    /// Write one frame per update plus a `.pvd` manifest
    pub vtk_time_series: bool,
    pub renderer: RendererKind,
    /// Frames per second used to advance scene time
    pub frame_rate: f64,
    /// Also write the vtk.js bundle and HTML viewer on static export
    pub write_viewer: bool,
    /// Animations before this index are skipped
    pub from_animation_number: Option<u32>,
    /// Log filter for the CLI, e.g. `info` or `debug`
    pub log_level: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("media"),
            vtk_export: false,
            vtk_time_series: false,
            renderer: RendererKind::Cairo,
            frame_rate: 30.0,
            write_viewer: true,
            from_animation_number: None,
            log_level: "info".to_string(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: ExportConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `polyframe-vtk.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if Path::new(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `POLYFRAME_VTK_*` overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("POLYFRAME_VTK_MEDIA_DIR") {
            self.media_dir = PathBuf::from(dir);
        }

        if let Some(value) = lookup("POLYFRAME_VTK_EXPORT") {
            self.vtk_export = parse_flag(&value);
        }

        if let Some(value) = lookup("POLYFRAME_VTK_TIME_SERIES") {
            self.vtk_time_series = parse_flag(&value);
        }

        if let Some(value) = lookup("POLYFRAME_VTK_RENDERER") {
            self.renderer = value.parse()?;
        }

        if let Some(value) = lookup("POLYFRAME_VTK_FRAME_RATE") {
            self.frame_rate = value
                .parse()
                .with_context(|| format!("Invalid POLYFRAME_VTK_FRAME_RATE '{value}'"))?;
        }

        if let Some(value) = lookup("POLYFRAME_VTK_LOG") {
            self.log_level = value;
        }

        self.validate()
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            bail!("frame_rate must be positive, got {}", self.frame_rate);
        }
        Ok(())
    }

    /// Whether any VTK file output is requested
    pub fn exports_vtk(&self) -> bool {
        self.vtk_export || self.vtk_time_series || self.renderer == RendererKind::Vtk
    }

    /// Directory receiving the VTK output of `scene_name`
    pub fn vtk_output_dir(&self, scene_name: &str) -> PathBuf {
        self.media_dir.join("vtk").join(scene_name)
    }

    pub fn frame_duration(&self) -> f64 {
        1.0 / self.frame_rate
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_roundtrip_through_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(CONFIG_FILE);

        let config = ExportConfig {
            vtk_time_series: true,
            renderer: RendererKind::Vtk,
            from_animation_number: Some(2),
            ..ExportConfig::default()
        };
        config.save(&path)?;

        assert_eq!(ExportConfig::from_file(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "vtk_export = true\nrenderer = \"vtk\"\n")?;

        let config = ExportConfig::from_file(&path)?;
        assert!(config.vtk_export);
        assert_eq!(config.renderer, RendererKind::Vtk);
        assert_eq!(config.frame_rate, 30.0);
        Ok(())
    }

    #[test]
    fn test_env_overrides() -> Result<()> {
        let env: HashMap<&str, &str> = [
            ("POLYFRAME_VTK_MEDIA_DIR", "/tmp/out"),
            ("POLYFRAME_VTK_TIME_SERIES", "yes"),
            ("POLYFRAME_VTK_FRAME_RATE", "60"),
        ]
        .into_iter()
        .collect();

        let mut config = ExportConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))?;

        assert_eq!(config.media_dir, PathBuf::from("/tmp/out"));
        assert!(config.vtk_time_series);
        assert!(!config.vtk_export);
        assert_eq!(config.frame_rate, 60.0);
        assert_eq!(
            config.vtk_output_dir("Demo"),
            PathBuf::from("/tmp/out/vtk/Demo")
        );
        Ok(())
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = ExportConfig::default();
        assert!(config
            .apply_env_overrides(|key| (key == "POLYFRAME_VTK_RENDERER").then(|| "opengl".into()))
            .is_err());

        config.frame_rate = 0.0;
        assert!(config.validate().is_err());
    }
}
