// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe VTK Exporter
//!
//! Converts a scene graph of vector shapes and parametric surfaces into
//! VTK-family files: PolyData (`.vtp`), MultiBlock (`.vtm`), time-series
//! collections (`.pvd`), vtk.js scene bundles and a standalone HTML viewer.

pub mod cli;
pub mod config;
pub mod demos;
pub mod error;
pub mod exporter;
pub mod geometry;
pub mod io;
pub mod render;
pub mod scene;

pub use config::{ExportConfig, RendererKind};
pub use error::ExportError;
pub use exporter::{FrameRecord, VtkExporter};
pub use geometry::{flatten, mobject_to_mesh, vmobject_to_mesh, Field, Mesh};
pub use render::{Animation, RenderCapability, VtkRenderer};
pub use scene::{Mobject, MobjectKind, Scene};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Export the current state of `scene` into `output_dir` in one call
pub fn export_scene(scene: &Scene, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let exporter = VtkExporter::new(output_dir.as_ref(), scene.name.clone())?;
    exporter.export_scene_static(&scene.mobjects, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::shapes::circle;

    #[test]
    fn test_export_scene() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut scene = Scene::new("Quick");
        scene.add(circle(1.0));

        let path = export_scene(&scene, dir.path())?;
        assert_eq!(path, dir.path().join("Quick.vtp"));
        assert!(path.exists());
        Ok(())
    }
}
