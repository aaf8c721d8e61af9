// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! VTK XML writers: PolyData (.vtp), MultiBlock (.vtm) and Collection (.pvd)

use crate::geometry::{Field, Mesh};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::io::Cursor;

/// One time step of a collection manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub time: f64,
    /// Path relative to the manifest
    pub file: String,
}

/// One member of a MultiBlock file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRef {
    pub name: String,
    /// Path relative to the MultiBlock file
    pub file: String,
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn new_writer() -> Result<XmlWriter> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
    Ok(writer)
}

fn vtk_file_start(file_type: &str, version: &str) -> BytesStart<'static> {
    let mut root = BytesStart::new("VTKFile");
    root.push_attribute(("type", file_type));
    root.push_attribute(("version", version));
    root.push_attribute(("byte_order", "LittleEndian"));
    root.push_attribute(("header_type", "UInt64"));
    root
}

fn finish(writer: XmlWriter) -> Result<String> {
    let result = writer.into_inner().into_inner();
    Ok(String::from_utf8(result)?)
}

fn join<T: Display>(values: impl IntoIterator<Item = T>) -> String {
    let mut out = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&value.to_string());
    }
    out
}

fn write_data_array(
    writer: &mut XmlWriter,
    data_type: &str,
    name: &str,
    components: usize,
    text: &str,
) -> Result<()> {
    let mut array = BytesStart::new("DataArray");
    array.push_attribute(("type", data_type));
    array.push_attribute(("Name", name));
    if components > 1 {
        array.push_attribute(("NumberOfComponents", components.to_string().as_str()));
    }
    array.push_attribute(("format", "ascii"));
    writer.write_event(Event::Start(array))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("DataArray")))?;
    Ok(())
}

/// Cell section in VTK's connectivity/offsets layout
fn write_cells(writer: &mut XmlWriter, section: &str, cells: &[Vec<usize>]) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(section)))?;

    let connectivity = join(cells.iter().flatten());
    let offsets = join(cells.iter().scan(0usize, |end, cell| {
        *end += cell.len();
        Some(*end)
    }));
    write_data_array(writer, "Int64", "connectivity", 1, &connectivity)?;
    write_data_array(writer, "Int64", "offsets", 1, &offsets)?;

    writer.write_event(Event::End(BytesEnd::new(section)))?;
    Ok(())
}

/// Serialize a mesh as an ASCII XML PolyData document
pub fn polydata_xml(mesh: &Mesh) -> Result<String> {
    let mut writer = new_writer()?;
    writer.write_event(Event::Start(vtk_file_start("PolyData", "1.0")))?;
    writer.write_event(Event::Start(BytesStart::new("PolyData")))?;

    let mut piece = BytesStart::new("Piece");
    piece.push_attribute(("NumberOfPoints", mesh.point_count().to_string().as_str()));
    piece.push_attribute(("NumberOfVerts", "0"));
    piece.push_attribute(("NumberOfLines", mesh.line_count().to_string().as_str()));
    piece.push_attribute(("NumberOfStrips", "0"));
    piece.push_attribute(("NumberOfPolys", mesh.polygon_count().to_string().as_str()));
    writer.write_event(Event::Start(piece))?;

    // Point data
    let mut point_data = BytesStart::new("PointData");
    if mesh.point_colors.is_some() {
        point_data.push_attribute(("Scalars", "Colors"));
    }
    if let Some(active) = &mesh.active_vectors {
        point_data.push_attribute(("Vectors", active.as_str()));
    }
    writer.write_event(Event::Start(point_data))?;
    if let Some(colors) = &mesh.point_colors {
        let text = join(colors.iter().flat_map(|c| c.to_u8()));
        write_data_array(&mut writer, "UInt8", "Colors", 4, &text)?;
    }
    for (name, field) in &mesh.fields {
        match field {
            Field::Scalar(values) => {
                write_data_array(&mut writer, "Float64", name, 1, &join(values))?;
            }
            Field::Vector(values) => {
                write_data_array(&mut writer, "Float64", name, 3, &join(values.iter().flatten()))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new("PointData")))?;

    writer.write_event(Event::Empty(BytesStart::new("CellData")))?;

    // Points
    writer.write_event(Event::Start(BytesStart::new("Points")))?;
    let coords = join(mesh.points.iter().flat_map(|p| [p.x, p.y, p.z]));
    write_data_array(&mut writer, "Float64", "Points", 3, &coords)?;
    writer.write_event(Event::End(BytesEnd::new("Points")))?;

    // Cells
    write_cells(&mut writer, "Verts", &[])?;
    write_cells(&mut writer, "Lines", &mesh.lines)?;
    write_cells(&mut writer, "Strips", &[])?;
    write_cells(&mut writer, "Polys", &mesh.polygons)?;

    writer.write_event(Event::End(BytesEnd::new("Piece")))?;
    writer.write_event(Event::End(BytesEnd::new("PolyData")))?;
    writer.write_event(Event::End(BytesEnd::new("VTKFile")))?;
    finish(writer)
}

/// Serialize a MultiBlock index referencing already written members
pub fn multiblock_xml(blocks: &[BlockRef]) -> Result<String> {
    let mut writer = new_writer()?;
    writer.write_event(Event::Start(vtk_file_start("vtkMultiBlockDataSet", "1.0")))?;
    writer.write_event(Event::Start(BytesStart::new("vtkMultiBlockDataSet")))?;

    for (index, block) in blocks.iter().enumerate() {
        let mut dataset = BytesStart::new("DataSet");
        dataset.push_attribute(("index", index.to_string().as_str()));
        dataset.push_attribute(("name", block.name.as_str()));
        dataset.push_attribute(("file", block.file.as_str()));
        writer.write_event(Event::Empty(dataset))?;
    }

    writer.write_event(Event::End(BytesEnd::new("vtkMultiBlockDataSet")))?;
    writer.write_event(Event::End(BytesEnd::new("VTKFile")))?;
    finish(writer)
}

/// Serialize a time-series Collection manifest, preserving record order
pub fn collection_xml(records: &[FrameRecord]) -> Result<String> {
    let mut writer = new_writer()?;
    writer.write_event(Event::Start(vtk_file_start("Collection", "0.1")))?;
    writer.write_event(Event::Start(BytesStart::new("Collection")))?;

    for record in records {
        let mut dataset = BytesStart::new("DataSet");
        dataset.push_attribute(("timestep", record.time.to_string().as_str()));
        dataset.push_attribute(("group", ""));
        dataset.push_attribute(("part", "0"));
        dataset.push_attribute(("file", record.file.as_str()));
        writer.write_event(Event::Empty(dataset))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Collection")))?;
    writer.write_event(Event::End(BytesEnd::new("VTKFile")))?;
    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn segment() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_point(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_point(Point3::new(1.5, 0.0, 0.0));
        mesh.add_line(vec![a, b]);
        mesh
    }

    #[test]
    fn test_polydata_counts_and_cells() -> Result<()> {
        let xml = polydata_xml(&segment())?;
        assert!(xml.contains(r#"<VTKFile type="PolyData""#));
        assert!(xml.contains(r#"NumberOfPoints="2""#));
        assert!(xml.contains(r#"NumberOfLines="1""#));
        assert!(xml.contains(r#"NumberOfPolys="0""#));
        assert!(xml.contains("0 0 0 1.5 0 0"));
        Ok(())
    }

    #[test]
    fn test_polydata_fields() -> Result<()> {
        let mut mesh = segment();
        mesh.attach_scalar("pressure", &[0.25, 0.75])?;
        mesh.attach_vector("velocity", &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])?;

        let xml = polydata_xml(&mesh)?;
        assert!(xml.contains(r#"Vectors="velocity""#));
        assert!(xml.contains(r#"Name="pressure""#));
        assert!(xml.contains("0.25 0.75"));
        assert!(xml.contains("1 0 0 0 1 0"));
        Ok(())
    }

    #[test]
    fn test_empty_collection() -> Result<()> {
        let xml = collection_xml(&[])?;
        assert!(xml.contains(r#"type="Collection""#));
        assert!(!xml.contains("DataSet"));
        Ok(())
    }

    #[test]
    fn test_collection_preserves_order() -> Result<()> {
        let records = vec![
            FrameRecord {
                time: 0.5,
                file: "b.vtp".into(),
            },
            FrameRecord {
                time: 0.1,
                file: "a.vtp".into(),
            },
        ];
        let xml = collection_xml(&records)?;
        let b = xml.find("b.vtp").unwrap();
        let a = xml.find("a.vtp").unwrap();
        assert!(b < a);
        assert!(xml.contains(r#"<DataSet timestep="0.5""#));
        Ok(())
    }
}
