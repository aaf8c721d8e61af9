// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! VTK export session
//!
//! A [`VtkExporter`] owns one output directory and one scene name. It writes
//! static snapshots (`.vtp` / `.vtm`), numbered time-series frames with their
//! `.pvd` manifest, and the web formats (`.vtkjs` bundle and HTML viewer).
//! Every file is written atomically.

use crate::geometry::{flatten, flatten_all, Mesh};
use crate::io::{
    self, collection_xml, multiblock_xml, polydata_xml, scene_bundle, viewer_html, with_extension,
    BlockRef, HTML_EXT, PVD_EXT, VTKJS_EXT, VTM_EXT, VTP_EXT,
};
use crate::scene::Mobject;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub use crate::io::FrameRecord;

/// Export session bound to an output directory and a scene name
#[derive(Debug)]
pub struct VtkExporter {
    output_dir: PathBuf,
    scene_name: String,
    frame_count: u32,
    frame_records: Vec<FrameRecord>,
}

impl VtkExporter {
    /// Create a session, creating `output_dir` if needed
    pub fn new(output_dir: impl Into<PathBuf>, scene_name: impl Into<String>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory {}", output_dir.display())
        })?;

        let scene_name = scene_name.into();
        debug!("VTK exporter for '{}' at {}", scene_name, output_dir.display());

        Ok(Self {
            output_dir,
            scene_name,
            frame_count: 0,
            frame_records: Vec::new(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn scene_name(&self) -> &str {
        &self.scene_name
    }

    /// Frames exported since creation or the last reset
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn frame_records(&self) -> &[FrameRecord] {
        &self.frame_records
    }

    fn target(&self, filename: &str, ext: &str) -> PathBuf {
        self.output_dir.join(with_extension(filename, ext))
    }

    /// `<TypeName>_<n>.vtp` with the smallest `n` not yet on disk
    fn default_mobject_filename(&self, type_name: &str) -> String {
        (0u32..)
            .map(|n| format!("{type_name}_{n}.{VTP_EXT}"))
            .find(|name| !self.output_dir.join(name).exists())
            .unwrap_or_else(|| format!("{type_name}.{VTP_EXT}"))
    }

    fn write_mesh(&self, mesh: &Mesh, path: &Path) -> Result<()> {
        let xml = polydata_xml(mesh)
            .with_context(|| format!("Failed to serialize mesh for {}", path.display()))?;
        io::write_atomic(path, xml.as_bytes())?;
        debug!(
            "Wrote {} ({} points, {} lines, {} polygons)",
            path.display(),
            mesh.point_count(),
            mesh.line_count(),
            mesh.polygon_count()
        );
        Ok(())
    }

    /// Export one mobject (groups flattened) as a single `.vtp` file
    pub fn export_mobject(&self, mobject: &Mobject, filename: Option<&str>) -> Result<PathBuf> {
        let path = match filename {
            Some(name) => self.target(name, VTP_EXT),
            None => self
                .output_dir
                .join(self.default_mobject_filename(&mobject.type_name)),
        };

        self.write_mesh(&flatten(mobject), &path)?;
        info!("Exported {} to {}", mobject.type_name, path.display());
        Ok(path)
    }

    /// Write an already built mesh, e.g. one carrying attached fields
    pub fn export_mesh(&self, mesh: &Mesh, filename: &str) -> Result<PathBuf> {
        let path = self.target(filename, VTP_EXT);
        self.write_mesh(mesh, &path)?;
        info!("Exported mesh to {}", path.display());
        Ok(path)
    }

    /// Snapshot of the scene: one `.vtp` for zero or one mobjects,
    /// a `.vtm` composite otherwise
    pub fn export_scene_static(
        &self,
        mobjects: &[Mobject],
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        let name = filename.unwrap_or(self.scene_name.as_str());

        if mobjects.len() <= 1 {
            let path = self.target(name, VTP_EXT);
            self.write_mesh(&flatten_all(mobjects), &path)?;
            info!("Exported static scene to {}", path.display());
            return Ok(path);
        }

        let path = self.target(name, VTM_EXT);
        self.write_composite(mobjects, &path)?;
        info!(
            "Exported static scene ({} blocks) to {}",
            mobjects.len(),
            path.display()
        );
        Ok(path)
    }

    fn write_composite(&self, mobjects: &[Mobject], path: &Path) -> Result<()> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.scene_name.clone());
        let blocks_dir_name = format!("{stem}_blocks");
        let blocks_dir = path
            .parent()
            .unwrap_or(&self.output_dir)
            .join(&blocks_dir_name);
        let created_dir = !blocks_dir.exists();
        fs::create_dir_all(&blocks_dir)
            .with_context(|| format!("Failed to create {}", blocks_dir.display()))?;

        let mut written: Vec<PathBuf> = Vec::with_capacity(mobjects.len());
        let result = (|| -> Result<()> {
            let mut blocks = Vec::with_capacity(mobjects.len());
            for (index, mobject) in mobjects.iter().enumerate() {
                let member = format!("{:02}_{}.{}", index, mobject.type_name, VTP_EXT);
                let member_path = blocks_dir.join(&member);
                self.write_mesh(&flatten(mobject), &member_path)?;
                written.push(member_path);
                blocks.push(BlockRef {
                    name: mobject.type_name.clone(),
                    file: format!("{blocks_dir_name}/{member}"),
                });
            }

            let xml = multiblock_xml(&blocks)
                .with_context(|| format!("Failed to serialize {}", path.display()))?;
            io::write_atomic(path, xml.as_bytes())
        })();

        if result.is_err() {
            for member in &written {
                if let Err(e) = fs::remove_file(member) {
                    warn!("Could not remove partial block {}: {}", member.display(), e);
                }
            }
            if created_dir {
                if let Err(e) = fs::remove_dir(&blocks_dir) {
                    warn!("Could not remove {}: {}", blocks_dir.display(), e);
                }
            }
            return result;
        }

        if let Err(e) = prune_stale_members(&blocks_dir, &written) {
            warn!("Could not prune old blocks in {}: {:#}", blocks_dir.display(), e);
        }
        Ok(())
    }

    /// Export one animation frame as `<scene>_<NNNNN>.vtp` and record it.
    ///
    /// The counter advances even when an explicit frame number is given.
    pub fn export_frame(
        &mut self,
        mobjects: &[Mobject],
        time: f64,
        frame_number: Option<u32>,
    ) -> Result<PathBuf> {
        let number = frame_number.unwrap_or(self.frame_count);
        let filename = format!("{}_{:05}.{}", self.scene_name, number, VTP_EXT);
        let path = self.output_dir.join(&filename);

        self.write_mesh(&flatten_all(mobjects), &path)
            .with_context(|| format!("Failed to export frame {number}"))?;

        self.frame_records.push(FrameRecord {
            time,
            file: filename,
        });
        self.frame_count += 1;
        debug!("Frame {} at t={} -> {}", number, time, path.display());
        Ok(path)
    }

    /// Forget recorded frames; files already on disk are kept
    pub fn reset_time_series(&mut self) {
        self.frame_count = 0;
        self.frame_records.clear();
    }

    /// Write the `.pvd` manifest listing every recorded frame in order
    pub fn write_pvd(&self, filename: Option<&str>) -> Result<PathBuf> {
        let path = self.target(filename.unwrap_or(self.scene_name.as_str()), PVD_EXT);
        let xml = collection_xml(&self.frame_records)
            .with_context(|| format!("Failed to serialize {}", path.display()))?;
        io::write_atomic(&path, xml.as_bytes())?;
        info!(
            "Wrote time series manifest with {} frames to {}",
            self.frame_records.len(),
            path.display()
        );
        Ok(path)
    }

    /// Write the JSON scene bundle read by the web viewer
    pub fn export_to_vtkjs(&self, mobjects: &[Mobject], filename: Option<&str>) -> Result<PathBuf> {
        let path = self.target(filename.unwrap_or(self.scene_name.as_str()), VTKJS_EXT);
        let bundle = scene_bundle(&self.scene_name, mobjects);
        let json = serde_json::to_string(&bundle).context("Failed to serialize scene bundle")?;
        io::write_atomic(&path, json.as_bytes())?;
        info!(
            "Exported {} objects to vtk.js bundle {}",
            bundle.objects.len(),
            path.display()
        );
        Ok(path)
    }

    /// Write `<scene>_viewer.html`, optionally bound to a scene bundle
    pub fn generate_html_viewer(&self, bundle: Option<&Path>) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("{}_viewer.{}", self.scene_name, HTML_EXT));

        let reference = bundle.map(|b| {
            let relative = b.strip_prefix(&self.output_dir).unwrap_or(b);
            relative.to_string_lossy().replace('\\', "/")
        });
        let html = viewer_html(&self.scene_name, reference.as_deref());
        io::write_atomic(&path, html.as_bytes())?;
        info!("Generated HTML viewer {}", path.display());
        Ok(path)
    }
}

/// Remove `.vtp` members left over from an earlier, larger composite
fn prune_stale_members(blocks_dir: &Path, keep: &[PathBuf]) -> Result<()> {
    for entry in fs::read_dir(blocks_dir)? {
        let path = entry?.path();
        let is_member = path.extension().is_some_and(|ext| ext == VTP_EXT);
        if is_member && !keep.contains(&path) {
            fs::remove_file(&path)?;
            debug!("Removed stale block {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::shapes::{circle, square};

    #[test]
    fn test_new_creates_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("nested").join("vtk");
        let exporter = VtkExporter::new(&out, "Demo")?;
        assert!(out.is_dir());
        assert_eq!(exporter.frame_count(), 0);
        assert!(exporter.frame_records().is_empty());

        // Second session over the same directory is fine
        VtkExporter::new(&out, "Demo")?;
        Ok(())
    }

    #[test]
    fn test_default_names_do_not_overwrite() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let exporter = VtkExporter::new(dir.path(), "Demo")?;

        let first = exporter.export_mobject(&circle(1.0), None)?;
        let second = exporter.export_mobject(&circle(2.0), None)?;
        assert_ne!(first, second);
        assert!(first.ends_with("Circle_0.vtp"));
        assert!(second.ends_with("Circle_1.vtp"));
        Ok(())
    }

    #[test]
    fn test_frame_counter_always_advances() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut exporter = VtkExporter::new(dir.path(), "Anim")?;

        exporter.export_frame(&[square(1.0)], 0.0, Some(42))?;
        let next = exporter.export_frame(&[square(1.0)], 0.1, None)?;
        assert_eq!(exporter.frame_count(), 2);
        assert!(next.ends_with("Anim_00001.vtp"));

        exporter.reset_time_series();
        assert_eq!(exporter.frame_count(), 0);
        assert!(exporter.frame_records().is_empty());
        assert!(dir.path().join("Anim_00042.vtp").exists());
        Ok(())
    }

    #[test]
    fn test_viewer_bundle_reference_is_relative() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let exporter = VtkExporter::new(dir.path(), "Web")?;
        let bundle = exporter.export_to_vtkjs(&[circle(1.0)], Some("data"))?;
        let viewer = exporter.generate_html_viewer(Some(&bundle))?;

        assert!(viewer.ends_with("Web_viewer.html"));
        let html = fs::read_to_string(viewer)?;
        assert!(html.contains(r#""data.vtkjs""#));
        Ok(())
    }
}
