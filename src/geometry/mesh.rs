// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Flat point/cell mesh
//!
//! The exporter's working representation: points, polyline and polygon cells
//! indexing into them, optional per-point colors and named per-point fields.

use super::BoundingBox;
use crate::scene::Rgba;
use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named per-point attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field {
    Scalar(Vec<f64>),
    Vector(Vec<[f64; 3]>),
}

impl Field {
    pub fn len(&self) -> usize {
        match self {
            Field::Scalar(values) => values.len(),
            Field::Vector(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn components(&self) -> usize {
        match self {
            Field::Scalar(_) => 1,
            Field::Vector(_) => 3,
        }
    }

    fn same_kind(&self, other: &Field) -> bool {
        self.components() == other.components()
    }

    fn extend(&mut self, other: &Field) {
        match (self, other) {
            (Field::Scalar(a), Field::Scalar(b)) => a.extend_from_slice(b),
            (Field::Vector(a), Field::Vector(b)) => a.extend_from_slice(b),
            _ => {}
        }
    }
}

/// Point/cell mesh with optional colors and fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub points: Vec<Point3<f64>>,
    /// Polylines, each with at least two indices
    pub lines: Vec<Vec<usize>>,
    /// Planar faces, each with at least three indices
    pub polygons: Vec<Vec<usize>>,
    /// Parallel to `points` when present
    pub point_colors: Option<Vec<Rgba>>,
    pub fields: BTreeMap<String, Field>,
    /// Name of the field written as the active vectors
    pub active_vectors: Option<String>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(point_count: usize) -> Self {
        Self {
            points: Vec::with_capacity(point_count),
            ..Self::default()
        }
    }

    /// Add a point and return its index
    pub fn add_point(&mut self, point: Point3<f64>) -> usize {
        let index = self.points.len();
        self.points.push(point);
        index
    }

    pub fn add_line(&mut self, indices: Vec<usize>) {
        debug_assert!(indices.len() >= 2);
        self.lines.push(indices);
    }

    pub fn add_polygon(&mut self, indices: Vec<usize>) {
        debug_assert!(indices.len() >= 3);
        self.polygons.push(indices);
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn cell_count(&self) -> usize {
        self.lines.len() + self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// Every cell index refers to an existing point
    pub fn indices_in_bounds(&self) -> bool {
        let n = self.points.len();
        self.lines
            .iter()
            .chain(&self.polygons)
            .flatten()
            .all(|&i| i < n)
    }

    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for point in &mut self.points {
            *point = matrix.transform_point(point);
        }
    }

    /// Append another mesh, offsetting its cell indices past our points.
    ///
    /// Colors are padded with white on whichever side lacks them. Fields
    /// survive only when both sides carry them with the same kind, except
    /// when appending onto an empty mesh.
    pub fn append(&mut self, other: &Mesh) {
        let offset = self.points.len();
        let adopt_fields = self.points.is_empty();

        self.point_colors = match (self.point_colors.take(), &other.point_colors) {
            (None, None) => None,
            (mine, theirs) => {
                let mut colors = mine.unwrap_or_else(|| vec![Rgba::default(); offset]);
                match theirs {
                    Some(theirs) => colors.extend_from_slice(theirs),
                    None => colors.extend(std::iter::repeat(Rgba::default()).take(other.points.len())),
                }
                Some(colors)
            }
        };

        self.points.extend_from_slice(&other.points);
        self.lines.extend(
            other
                .lines
                .iter()
                .map(|cell| cell.iter().map(|i| i + offset).collect()),
        );
        self.polygons.extend(
            other
                .polygons
                .iter()
                .map(|cell| cell.iter().map(|i| i + offset).collect()),
        );

        if adopt_fields {
            self.fields = other.fields.clone();
            self.active_vectors = other.active_vectors.clone();
        } else {
            self.fields.retain(|name, field| {
                other
                    .fields
                    .get(name)
                    .map_or(false, |theirs| field.same_kind(theirs))
            });
            for (name, field) in self.fields.iter_mut() {
                if let Some(theirs) = other.fields.get(name) {
                    field.extend(theirs);
                }
            }
            if let Some(active) = &self.active_vectors {
                if !self.fields.contains_key(active) {
                    self.active_vectors = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_point(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_point(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_point(Point3::new(0.0, 1.0, 0.0));
        mesh.add_polygon(vec![a, b, c]);
        mesh.add_line(vec![a, b]);
        mesh
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut mesh = triangle_mesh();
        mesh.append(&triangle_mesh());

        assert_eq!(mesh.point_count(), 6);
        assert_eq!(mesh.polygons, vec![vec![0, 1, 2], vec![3, 4, 5]]);
        assert_eq!(mesh.lines, vec![vec![0, 1], vec![3, 4]]);
        assert!(mesh.indices_in_bounds());
    }

    #[test]
    fn test_append_pads_colors() {
        let mut colored = triangle_mesh();
        colored.point_colors = Some(vec![crate::scene::RED; 3]);

        let mut mesh = triangle_mesh();
        mesh.append(&colored);

        let colors = mesh.point_colors.expect("colors should be present");
        assert_eq!(colors.len(), 6);
        assert_eq!(colors[0], Rgba::default());
        assert_eq!(colors[5], crate::scene::RED);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.cell_count(), 0);
        assert!(mesh.fields.is_empty());
        assert!(mesh.indices_in_bounds());
    }
}
