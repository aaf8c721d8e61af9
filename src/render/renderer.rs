// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! VTK renderer glue
//!
//! Tracks scene time and play count, skips animations before the configured
//! start point, and forwards frames to a [`VtkExporter`] when export is on.

use super::capability::RenderCapability;
use super::Animation;
use crate::config::{ExportConfig, RendererKind};
use crate::exporter::VtkExporter;
use crate::scene::Scene;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::cell::OnceCell;
use std::path::PathBuf;

/// Renderer that writes VTK files instead of pixels
#[derive(Debug)]
pub struct VtkRenderer {
    config: ExportConfig,
    exporter: Option<VtkExporter>,
    capability: OnceCell<RenderCapability>,
    original_skipping_status: bool,
    /// Frames emitted since `init_scene`; scene time derives from it
    frames_emitted: u64,
    /// A play finished and its end state has not been emitted yet
    end_state_pending: bool,
    /// Animations played so far, waits included
    pub num_plays: u32,
    /// Scene time in seconds
    pub time: f64,
    pub skip_animations: bool,
    pub vtk_export: bool,
    pub vtk_time_series: bool,
}

impl VtkRenderer {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            vtk_export: config.vtk_export || config.renderer == RendererKind::Vtk,
            vtk_time_series: config.vtk_time_series,
            config,
            exporter: None,
            capability: OnceCell::new(),
            original_skipping_status: false,
            frames_emitted: 0,
            end_state_pending: false,
            num_plays: 0,
            time: 0.0,
            skip_animations: false,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn exporter(&self) -> Option<&VtkExporter> {
        self.exporter.as_ref()
    }

    /// Output directory for `scene`
    pub fn output_dir(&self, scene: &Scene) -> PathBuf {
        self.config.vtk_output_dir(&scene.name)
    }

    /// Capability of live rendering, probed once per renderer
    pub fn capability(&self) -> &RenderCapability {
        self.capability.get_or_init(RenderCapability::probe)
    }

    pub fn is_rendering_available(&self) -> bool {
        self.capability().is_available()
    }

    fn ensure_exporter(&mut self, scene: &Scene) -> Result<&mut VtkExporter> {
        if self.exporter.is_none() {
            let dir = self.output_dir(scene);
            self.exporter = Some(VtkExporter::new(dir, scene.name.clone())?);
        }
        self.exporter
            .as_mut()
            .context("VTK exporter was not initialised")
    }

    /// Prepare for a new scene
    pub fn init_scene(&mut self, scene: &Scene) -> Result<()> {
        self.num_plays = 0;
        self.frames_emitted = 0;
        self.end_state_pending = false;
        self.time = 0.0;
        self.original_skipping_status = self.skip_animations;
        self.exporter = None;

        if self.vtk_export || self.vtk_time_series {
            self.ensure_exporter(scene)?;
        }

        match self.capability() {
            RenderCapability::Available { backend } => {
                debug!("Live rendering available through {backend}")
            }
            RenderCapability::Unavailable { reason } => {
                warn!("Live rendering disabled ({reason}); writing files only")
            }
        }

        info!(
            "Initialised scene '{}' (export: {}, time series: {})",
            scene.name, self.vtk_export, self.vtk_time_series
        );
        Ok(())
    }

    /// Per-frame hook; records a time-series frame unless skipping
    pub fn update_frame(&mut self, scene: &Scene) -> Result<()> {
        if !self.vtk_time_series || self.skip_animations {
            return Ok(());
        }
        let time = self.time;
        self.ensure_exporter(scene)?
            .export_frame(&scene.mobjects, time, None)?;
        Ok(())
    }

    /// Emit the current frame and advance time by one frame
    pub fn add_frame(&mut self, scene: &Scene) -> Result<()> {
        if self.skip_animations {
            return Ok(());
        }
        self.update_frame(scene)?;
        self.end_state_pending = false;
        self.frames_emitted += 1;
        self.time = self.frames_emitted as f64 / self.config.frame_rate;
        Ok(())
    }

    /// Hold the current state for `duration` seconds
    pub fn freeze_current_frame(&mut self, scene: &Scene, duration: f64) -> Result<()> {
        let frames = (duration / self.config.frame_duration()).round().max(1.0) as u32;
        for _ in 0..frames {
            self.add_frame(scene)?;
        }
        Ok(())
    }

    /// Play one animation frame by frame, leaving the scene in its end state.
    ///
    /// Frame `k` shows progress `k / frames` at its own timestep, starting
    /// from the initial state. The end state is emitted by whatever frame
    /// comes next.
    pub fn play(&mut self, scene: &mut Scene, animation: &Animation) -> Result<()> {
        self.update_skipping_status();
        let start = scene.mobjects.clone();

        if !self.skip_animations {
            let frames = (animation.run_time * self.config.frame_rate).ceil().max(1.0) as u32;
            for k in 0..frames {
                scene.mobjects.clone_from(&start);
                animation.apply(&mut scene.mobjects, k as f64 / frames as f64);
                self.add_frame(scene)?;
            }
            scene.mobjects.clone_from(&start);
            self.end_state_pending = true;
        }
        animation.apply(&mut scene.mobjects, 1.0);

        self.num_plays += 1;
        debug!("Finished play {} at t={:.3}", self.num_plays, self.time);
        Ok(())
    }

    /// Hold the scene still for `duration` seconds, counted as a play
    pub fn wait(&mut self, scene: &Scene, duration: f64) -> Result<()> {
        self.update_skipping_status();
        self.freeze_current_frame(scene, duration)?;
        self.num_plays += 1;
        Ok(())
    }

    /// Skip animations that come before `from_animation_number`
    pub fn update_skipping_status(&mut self) {
        self.skip_animations = match self.config.from_animation_number {
            Some(start) if self.num_plays < start => true,
            _ => self.original_skipping_status,
        };
    }

    /// Write the end-of-scene outputs and return every file written
    pub fn scene_finished(&mut self, scene: &Scene) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if self.num_plays == 0 || self.end_state_pending {
            self.skip_animations = false;
            self.update_frame(scene)?;
            self.end_state_pending = false;
        }

        if self.vtk_export {
            let write_viewer = self.config.write_viewer;
            let exporter = self.ensure_exporter(scene)?;
            written.push(exporter.export_scene_static(&scene.mobjects, None)?);
            if write_viewer {
                let bundle = exporter.export_to_vtkjs(&scene.mobjects, None)?;
                written.push(exporter.generate_html_viewer(Some(&bundle))?);
                written.push(bundle);
            }
        }

        if self.vtk_time_series {
            let time = self.time;
            let exporter = self.ensure_exporter(scene)?;
            if exporter.frame_count() == 0 {
                exporter.export_frame(&scene.mobjects, time, None)?;
            }
            written.push(exporter.write_pvd(None)?);
        }

        info!(
            "Scene '{}' finished after {} plays, {} files written",
            scene.name,
            self.num_plays,
            written.len()
        );
        Ok(written)
    }

    /// One-shot static export of the scene's current state
    pub fn export_vtk(&mut self, scene: &Scene) -> Result<PathBuf> {
        self.ensure_exporter(scene)?
            .export_scene_static(&scene.mobjects, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::shapes::circle;

    fn config_in(dir: &std::path::Path) -> ExportConfig {
        ExportConfig {
            media_dir: dir.to_path_buf(),
            ..ExportConfig::default()
        }
    }

    #[test]
    fn test_default_state() {
        let renderer = VtkRenderer::new(ExportConfig::default());
        assert_eq!(renderer.num_plays, 0);
        assert_eq!(renderer.time, 0.0);
        assert!(!renderer.vtk_export);
        assert!(!renderer.vtk_time_series);
        assert!(!renderer.skip_animations);
        assert!(renderer.exporter().is_none());
    }

    #[test]
    fn test_vtk_renderer_kind_implies_export() {
        let renderer = VtkRenderer::new(ExportConfig {
            renderer: RendererKind::Vtk,
            ..ExportConfig::default()
        });
        assert!(renderer.vtk_export);
    }

    #[test]
    fn test_capability_is_cached() {
        let renderer = VtkRenderer::new(ExportConfig::default());
        let first = renderer.capability() as *const RenderCapability;
        let second = renderer.capability() as *const RenderCapability;
        assert_eq!(first, second);
    }

    #[test]
    fn test_skipping_until_start_animation() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut renderer = VtkRenderer::new(ExportConfig {
            from_animation_number: Some(2),
            ..config_in(dir.path())
        });
        let mut scene = Scene::new("Skip");
        scene.add(circle(1.0));
        renderer.init_scene(&scene)?;

        renderer.update_skipping_status();
        assert!(renderer.skip_animations);

        renderer.wait(&scene, 1.0)?;
        renderer.wait(&scene, 1.0)?;
        assert_eq!(renderer.time, 0.0);

        renderer.update_skipping_status();
        assert!(!renderer.skip_animations);
        Ok(())
    }

    #[test]
    fn test_play_advances_time_and_counts() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut renderer = VtkRenderer::new(ExportConfig {
            frame_rate: 10.0,
            ..config_in(dir.path())
        });
        let mut scene = Scene::new("Play");
        scene.add(circle(1.0));
        renderer.init_scene(&scene)?;

        let shift = Animation::new(1.0, |mobjects, alpha| {
            for m in mobjects.iter_mut() {
                m.shift(nalgebra::Vector3::x() * 2.0 * alpha);
            }
        });
        renderer.play(&mut scene, &shift)?;

        assert_eq!(renderer.num_plays, 1);
        assert_eq!(renderer.time, 1.0);
        approx::assert_relative_eq!(scene.mobjects[0].center().x, 2.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_time_has_no_drift() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut renderer = VtkRenderer::new(ExportConfig {
            frame_rate: 10.0,
            ..config_in(dir.path())
        });
        let scene = Scene::new("Hold");
        renderer.init_scene(&scene)?;

        renderer.freeze_current_frame(&scene, 0.3)?;
        assert_eq!(renderer.time, 0.3);
        Ok(())
    }
}
