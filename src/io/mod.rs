// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - VTK XML writers, scene bundles, viewer pages and inspection

mod html;
mod inspect;
mod vtk_xml;
mod vtkjs;

pub use html::viewer_html;
pub use inspect::{
    read_collection, read_data_array, read_multiblock, read_polydata_summary, PieceSummary,
};
pub use vtk_xml::{collection_xml, multiblock_xml, polydata_xml, BlockRef, FrameRecord};
pub use vtkjs::{scene_bundle, Material, SceneBundle, SceneObject, SCENE_BUNDLE_TYPE};

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Single-mesh PolyData
pub const VTP_EXT: &str = "vtp";
/// Composite MultiBlock
pub const VTM_EXT: &str = "vtm";
/// Time-series collection manifest
pub const PVD_EXT: &str = "pvd";
/// JSON scene bundle
pub const VTKJS_EXT: &str = "vtkjs";
/// Viewer page
pub const HTML_EXT: &str = "html";

const KNOWN_EXTENSIONS: [&str; 5] = [VTP_EXT, VTM_EXT, PVD_EXT, VTKJS_EXT, HTML_EXT];

/// Give `name` exactly the extension `ext`.
///
/// A matching extension is kept, another known extension is replaced and
/// anything else gets `ext` appended.
pub fn with_extension(name: &str, ext: &str) -> String {
    let path = Path::new(name);
    match path.extension().and_then(|e| e.to_str()) {
        Some(current) if current.eq_ignore_ascii_case(ext) => name.to_string(),
        Some(current) if KNOWN_EXTENSIONS.iter().any(|k| current.eq_ignore_ascii_case(k)) => {
            path.with_extension(ext).to_string_lossy().into_owned()
        }
        _ => format!("{name}.{ext}"),
    }
}

/// Write `contents` to `path` through a temporary file in the same directory,
/// so the destination either holds the complete new contents or is untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to persist {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_extension() {
        assert_eq!(with_extension("my_circle", VTP_EXT), "my_circle.vtp");
        assert_eq!(with_extension("my_circle.vtp", VTP_EXT), "my_circle.vtp");
        assert_eq!(with_extension("custom.vtm", VTP_EXT), "custom.vtp");
        assert_eq!(with_extension("run.v2", PVD_EXT), "run.v2.pvd");
        assert_eq!(with_extension("frames/scene", PVD_EXT), "frames/scene.pvd");
    }

    #[test]
    fn test_write_atomic_replaces_contents() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.txt");

        write_atomic(&path, b"first")?;
        write_atomic(&path, b"second")?;

        assert_eq!(std::fs::read_to_string(&path)?, "second");
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }
}
