// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Read back the headers of written VTK XML files

use super::vtk_xml::{BlockRef, FrameRecord};
use anyhow::{bail, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::path::Path;

/// Counts and array names of a single-piece PolyData file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PieceSummary {
    /// Value of the root `type` attribute
    pub file_type: String,
    pub points: usize,
    pub lines: usize,
    pub polys: usize,
    /// Point data arrays in file order, colors included
    pub point_arrays: Vec<String>,
}

fn attribute(element: &BytesStart, key: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required(element: &BytesStart, key: &str) -> Result<String> {
    attribute(element, key)?.with_context(|| {
        format!(
            "<{}> is missing the '{}' attribute",
            String::from_utf8_lossy(element.name().as_ref()),
            key
        )
    })
}

fn count(element: &BytesStart, key: &str) -> Result<usize> {
    match attribute(element, key)? {
        Some(value) => value
            .parse()
            .with_context(|| format!("Invalid {key} value '{value}'")),
        None => Ok(0),
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Walk every start/empty element of `xml`, checking the root file type
fn visit_elements<F>(xml: &str, expected_type: &str, mut visit: F) -> Result<()>
where
    F: FnMut(&BytesStart, bool) -> Result<()>,
{
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut saw_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                if element.name().as_ref() == b"VTKFile" {
                    check_root(&element, expected_type)?;
                    saw_root = true;
                }
                visit(&element, false)?;
            }
            Event::Empty(element) => visit(&element, true)?,
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        bail!("Not a VTK XML file: no <VTKFile> root");
    }
    Ok(())
}

fn check_root(root: &BytesStart, expected_type: &str) -> Result<()> {
    let file_type = required(root, "type")?;
    if file_type != expected_type {
        bail!("Expected a {expected_type} file, found {file_type}");
    }
    Ok(())
}

/// Summarize a `.vtp` file
pub fn read_polydata_summary(path: &Path) -> Result<PieceSummary> {
    let xml = read_source(path)?;
    let mut summary = PieceSummary {
        file_type: "PolyData".to_string(),
        ..PieceSummary::default()
    };
    let mut in_point_data = false;

    visit_elements(&xml, "PolyData", |element, empty| {
        match element.name().as_ref() {
            b"Piece" => {
                summary.points = count(element, "NumberOfPoints")?;
                summary.lines = count(element, "NumberOfLines")?;
                summary.polys = count(element, "NumberOfPolys")?;
            }
            b"PointData" => in_point_data = !empty,
            b"CellData" | b"Points" => in_point_data = false,
            b"DataArray" if in_point_data => summary.point_arrays.push(required(element, "Name")?),
            _ => {}
        }
        Ok(())
    })
    .with_context(|| format!("Failed to inspect {}", path.display()))?;

    Ok(summary)
}

/// Values of the first `DataArray` named `name` in a `.vtp` file
pub fn read_data_array(path: &Path, name: &str) -> Result<Vec<f64>> {
    let xml = read_source(path)?;
    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);
    let mut inside = false;

    loop {
        match reader.read_event()? {
            Event::Start(element) if element.name().as_ref() == b"DataArray" => {
                inside = attribute(&element, "Name")?.as_deref() == Some(name);
            }
            Event::Text(text) if inside => {
                return text
                    .unescape()?
                    .split_whitespace()
                    .map(|value| {
                        value
                            .parse()
                            .with_context(|| format!("Invalid value '{value}' in {name}"))
                    })
                    .collect();
            }
            Event::End(element) if inside && element.name().as_ref() == b"DataArray" => {
                return Ok(Vec::new());
            }
            Event::Eof => bail!("No DataArray named '{name}' in {}", path.display()),
            _ => {}
        }
    }
}

/// Records of a `.pvd` collection, in file order
pub fn read_collection(path: &Path) -> Result<Vec<FrameRecord>> {
    let xml = read_source(path)?;
    let mut records = Vec::new();

    visit_elements(&xml, "Collection", |element, _| {
        if element.name().as_ref() == b"DataSet" {
            let timestep = required(element, "timestep")?;
            records.push(FrameRecord {
                time: timestep
                    .parse()
                    .with_context(|| format!("Invalid timestep '{timestep}'"))?,
                file: required(element, "file")?,
            });
        }
        Ok(())
    })
    .with_context(|| format!("Failed to inspect {}", path.display()))?;

    Ok(records)
}

/// Members of a `.vtm` file, in block order
pub fn read_multiblock(path: &Path) -> Result<Vec<BlockRef>> {
    let xml = read_source(path)?;
    let mut blocks = Vec::new();

    visit_elements(&xml, "vtkMultiBlockDataSet", |element, _| {
        if element.name().as_ref() == b"DataSet" {
            blocks.push(BlockRef {
                name: attribute(element, "name")?.unwrap_or_default(),
                file: required(element, "file")?,
            });
        }
        Ok(())
    })
    .with_context(|| format!("Failed to inspect {}", path.display()))?;

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::super::vtk_xml::{collection_xml, multiblock_xml, polydata_xml};
    use super::*;
    use crate::geometry::mobject_to_mesh;
    use crate::scene::shapes::square;

    #[test]
    fn test_polydata_summary() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("square.vtp");
        let mut mesh = mobject_to_mesh(&square(1.0).with_fill_opacity(0.5));
        mesh.attach_scalar("height", &[0.0, 1.0, 2.0, 3.0])?;
        std::fs::write(&path, polydata_xml(&mesh)?)?;

        let summary = read_polydata_summary(&path)?;
        assert_eq!(summary.points, 4);
        assert_eq!(summary.lines, 1);
        assert_eq!(summary.polys, 1);
        assert_eq!(summary.point_arrays, ["Colors", "height"]);
        assert_eq!(read_data_array(&path, "height")?, [0.0, 1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_missing_array_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("square.vtp");
        std::fs::write(&path, polydata_xml(&mobject_to_mesh(&square(1.0)))?)?;
        assert!(read_data_array(&path, "pressure").is_err());
        assert_eq!(read_data_array(&path, "Points")?.len(), 12);
        Ok(())
    }

    #[test]
    fn test_collection_and_multiblock() -> Result<()> {
        let dir = tempfile::tempdir()?;

        let pvd = dir.path().join("run.pvd");
        let records = vec![FrameRecord {
            time: 0.25,
            file: "run_00000.vtp".into(),
        }];
        std::fs::write(&pvd, collection_xml(&records)?)?;
        assert_eq!(read_collection(&pvd)?, records);

        let vtm = dir.path().join("run.vtm");
        let blocks = vec![BlockRef {
            name: "Circle".into(),
            file: "run_blocks/00_Circle.vtp".into(),
        }];
        std::fs::write(&vtm, multiblock_xml(&blocks)?)?;
        assert_eq!(read_multiblock(&vtm)?, blocks);
        Ok(())
    }

    #[test]
    fn test_wrong_file_type_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let pvd = dir.path().join("run.pvd");
        std::fs::write(&pvd, collection_xml(&[])?)?;
        assert!(read_polydata_summary(&pvd).is_err());
        Ok(())
    }
}
