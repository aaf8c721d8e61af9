// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mobject to mesh conversion

use super::classification::classify;
use super::flatten::flatten;
use super::Mesh;
use crate::scene::{Mobject, MobjectKind, PathData, Rgba, Surface};
use log::debug;

/// Convert any mobject; groups go through the flattener
pub fn mobject_to_mesh(mobject: &Mobject) -> Mesh {
    match &mobject.kind {
        MobjectKind::Path(path) => path_to_mesh(path),
        MobjectKind::Surface(surface) => surface_to_mesh(surface),
        MobjectKind::Group(_) => flatten(mobject),
    }
}

/// Same as [`mobject_to_mesh`]; kept for callers that name path-based shapes
pub fn vmobject_to_mesh(mobject: &Mobject) -> Mesh {
    mobject_to_mesh(mobject)
}

/// Convert a path leaf according to its classification
pub fn path_to_mesh(path: &PathData) -> Mesh {
    let kinds = classify(&path.style);
    let mut mesh = Mesh::with_capacity(path.num_points());

    for subpath in &path.subpaths {
        let indices: Vec<usize> = subpath
            .anchors
            .iter()
            .map(|anchor| mesh.add_point(*anchor))
            .collect();

        if kinds.polygons && subpath.closed && indices.len() >= 3 {
            mesh.add_polygon(indices.clone());
        }

        if kinds.lines && indices.len() >= 2 {
            let mut line = indices;
            if subpath.closed {
                line.push(line[0]);
            }
            mesh.add_line(line);
        }
    }

    mesh.point_colors = match &path.point_colors {
        Some(colors) if colors.len() == mesh.point_count() => Some(colors.clone()),
        other => {
            if let Some(colors) = other {
                debug!(
                    "Ignoring {} point colors for a path with {} points",
                    colors.len(),
                    mesh.point_count()
                );
            }
            uniform_colors(&mesh, path.style.display_color())
        }
    };

    mesh
}

/// Tessellate a parametric surface into a row-major quad grid
pub fn surface_to_mesh(surface: &Surface) -> Mesh {
    let (rows, cols) = surface.resolution;
    let mut mesh = Mesh::with_capacity(rows * cols);

    for i in 0..rows {
        let u = Surface::grid_param(surface.u_range, i, rows);
        for j in 0..cols {
            let v = Surface::grid_param(surface.v_range, j, cols);
            mesh.add_point(surface.evaluate(u, v));
        }
    }

    if rows >= 2 && cols >= 2 {
        for i in 0..rows - 1 {
            for j in 0..cols - 1 {
                let a = i * cols + j;
                let b = (i + 1) * cols + j;
                mesh.add_polygon(vec![a, a + 1, b + 1, b]);
            }
        }
    }

    if let Some(scale) = &surface.color_scale {
        if !mesh.is_empty() {
            let values: Vec<f64> = mesh.points.iter().map(|p| p[scale.axis]).collect();
            let extent = values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            let alpha = surface.style.fill_opacity;
            mesh.point_colors = Some(
                values
                    .iter()
                    .map(|&v| scale.color_for(v, extent).with_alpha(alpha))
                    .collect(),
            );
        }
    } else {
        mesh.point_colors = uniform_colors(&mesh, surface.style.display_color());
    }

    mesh
}

/// One `color` per point, or none for an empty mesh
fn uniform_colors(mesh: &Mesh, color: Rgba) -> Option<Vec<Rgba>> {
    (!mesh.is_empty()).then(|| vec![color; mesh.point_count()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::shapes::{circle, line, square};
    use crate::scene::{ColorScale, Mobject, BLUE, RED};
    use nalgebra::Point3;

    #[test]
    fn test_stroke_circle_is_lines_only() {
        let mesh = mobject_to_mesh(&circle(1.0));
        assert!(mesh.point_count() > 0);
        assert_eq!(mesh.line_count(), 1);
        assert_eq!(mesh.polygon_count(), 0);

        let ring = &mesh.lines[0];
        assert_eq!(ring.len(), mesh.point_count() + 1);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_filled_circle_has_polygon() {
        let mesh = mobject_to_mesh(&circle(1.0).with_fill_opacity(0.5));
        assert_eq!(mesh.polygon_count(), 1);
        assert_eq!(mesh.polygons[0].len(), mesh.point_count());
    }

    #[test]
    fn test_vmobject_matches_mobject_conversion() {
        let shape = square(1.0).with_fill(BLUE, 0.5);
        assert_eq!(vmobject_to_mesh(&shape), mobject_to_mesh(&shape));
    }

    #[test]
    fn test_open_line() {
        let mesh = mobject_to_mesh(&line(
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ));
        assert_eq!(mesh.point_count(), 2);
        assert_eq!(mesh.lines, vec![vec![0, 1]]);
        assert_eq!(mesh.polygon_count(), 0);
    }

    #[test]
    fn test_empty_mobject() {
        let mesh = mobject_to_mesh(&Mobject::empty());
        assert!(mesh.is_empty());
        assert_eq!(mesh.cell_count(), 0);
        assert!(mesh.point_colors.is_none());
    }

    #[test]
    fn test_style_color_fills_every_point() {
        let mesh = mobject_to_mesh(&circle(1.0).with_color(RED));
        let colors = mesh.point_colors.expect("styled shapes carry colors");
        assert_eq!(colors.len(), mesh.points.len());
        assert!(colors.iter().all(|c| c.to_u8() == RED.to_u8()));
    }

    #[test]
    fn test_fill_opacity_reaches_alpha() {
        let mesh = mobject_to_mesh(&square(1.0).with_fill(BLUE, 0.5));
        let colors = mesh.point_colors.expect("styled shapes carry colors");
        assert_eq!(colors[0].to_u8(), BLUE.with_alpha(0.5).to_u8());
    }

    #[test]
    fn test_point_colors_copied() {
        let mut sq = square(1.0);
        sq.set_point_colors(vec![RED, BLUE, RED, BLUE]);
        let mesh = mobject_to_mesh(&sq);
        assert_eq!(mesh.point_colors, Some(vec![RED, BLUE, RED, BLUE]));
    }

    #[test]
    fn test_surface_grid() {
        let surface = Surface::new(|u, v| Point3::new(u, v, u * v), (0.0, 2.0), (0.0, 2.0))
            .with_resolution(4, 5);
        let mesh = surface_to_mesh(&surface);

        assert_eq!(mesh.point_count(), 20);
        assert_eq!(mesh.polygon_count(), 3 * 4);
        assert_eq!(mesh.line_count(), 0);
        assert_eq!(mesh.polygons[0], vec![0, 1, 6, 5]);
        assert_eq!(mesh.points[19], Point3::new(2.0, 2.0, 4.0));
    }

    #[test]
    fn test_degenerate_surface_has_no_quads() {
        let surface =
            Surface::new(|u, v| Point3::new(u, v, 0.0), (0.0, 1.0), (0.0, 1.0)).with_resolution(1, 8);
        let mesh = surface_to_mesh(&surface);
        assert_eq!(mesh.point_count(), 8);
        assert_eq!(mesh.polygon_count(), 0);
    }

    #[test]
    fn test_surface_color_scale() {
        let mut surface = Surface::new(|u, v| Point3::new(u, v, u), (0.0, 1.0), (0.0, 1.0))
            .with_resolution(2, 2);
        surface.color_scale = Some(ColorScale::new(vec![BLUE, RED], 2));
        let mesh = surface_to_mesh(&surface);

        let colors = mesh.point_colors.expect("color scale should color points");
        assert_eq!(colors[0].to_u8(), BLUE.to_u8());
        assert_eq!(colors[3].to_u8(), RED.to_u8());
    }

    #[test]
    fn test_surface_without_scale_uses_style_color() {
        let surface = Surface::new(|u, v| Point3::new(u, v, 0.0), (0.0, 1.0), (0.0, 1.0))
            .with_resolution(3, 3);
        let mesh = surface_to_mesh(&surface);
        let expected = surface.style.display_color();
        assert_eq!(mesh.point_colors, Some(vec![expected; 9]));
    }
}
