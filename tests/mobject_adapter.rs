// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Conversion of scene trees into meshes

use anyhow::Result;
use nalgebra::{Point3, Vector3};
use polyframe_vtk::geometry::{classify, flatten, flatten_all, mobject_to_mesh, CellKinds};
use polyframe_vtk::scene::shapes::{circle, dot, function_graph, sphere, square, triangle, Axes};
use polyframe_vtk::scene::{Mobject, Style, BLUE, RED};
use polyframe_vtk::{ExportError, Field};

#[test]
fn test_classification_by_style() {
    assert_eq!(classify(&Style::default()), CellKinds::LINES);
    assert_eq!(classify(&Style::filled(BLUE, 0.5)), CellKinds::BOTH);

    let fill_only = Style {
        stroke_width: 0.0,
        ..Style::filled(BLUE, 1.0)
    };
    assert_eq!(classify(&fill_only), CellKinds::POLYGONS);

    // Neither stroke nor fill still yields an outline
    let invisible = Style {
        stroke_width: 0.0,
        ..Style::default()
    };
    assert_eq!(classify(&invisible), CellKinds::LINES);
}

#[test]
fn test_unfilled_circle_has_lines_only() {
    let mesh = mobject_to_mesh(&circle(1.0));
    assert!(mesh.line_count() > 0);
    assert_eq!(mesh.polygon_count(), 0);
}

#[test]
fn test_filled_circle_has_polygons() {
    let mesh = mobject_to_mesh(&circle(1.0).with_fill(BLUE, 0.5));
    assert!(mesh.polygon_count() > 0);
    assert!(mesh.line_count() > 0);
}

#[test]
fn test_dot_is_filled_without_outline() {
    let mesh = mobject_to_mesh(&dot(Point3::new(2.0, 1.0, 0.0), 0.08));
    assert_eq!(mesh.polygon_count(), 1);
    assert_eq!(mesh.line_count(), 0);

    let center = mesh.bounding_box().center();
    approx::assert_relative_eq!(center.x, 2.0, epsilon = 1e-9);
    approx::assert_relative_eq!(center.y, 1.0, epsilon = 1e-9);
}

#[test]
fn test_empty_inputs_give_empty_mesh() {
    for mesh in [
        flatten(&Mobject::group(Vec::new())),
        flatten_all(&[]),
        mobject_to_mesh(&Mobject::empty()),
    ] {
        assert_eq!(mesh.point_count(), 0);
        assert_eq!(mesh.line_count(), 0);
        assert_eq!(mesh.polygon_count(), 0);
        assert!(mesh.fields.is_empty());
    }
}

#[test]
fn test_flatten_offsets_do_not_collide() {
    let leaves = vec![
        circle(0.5),
        Mobject::group(vec![square(1.0).with_fill(RED, 0.3), triangle()]),
        sphere(1.0, (6, 8)),
    ];
    let expected: usize = leaves.iter().map(|l| mobject_to_mesh(l).point_count()).sum();

    let mesh = flatten(&Mobject::group(leaves));
    assert_eq!(mesh.point_count(), expected);
    assert!(mesh.indices_in_bounds());

    // Every cell stays inside the index range of a single leaf
    let ranges = [
        (0, 64),
        (64, 68),
        (68, 71),
        (71, expected),
    ];
    for cell in mesh.lines.iter().chain(&mesh.polygons) {
        let (lo, hi) = ranges
            .iter()
            .copied()
            .find(|(lo, hi)| (*lo..*hi).contains(&cell[0]))
            .expect("index within some leaf");
        assert!(cell.iter().all(|i| (lo..hi).contains(i)));
    }
}

#[test]
fn test_axes_have_lines_and_tip_polygons() {
    let axes = Axes::default().build();
    let mesh = mobject_to_mesh(&axes);
    // Two axis lines plus ticks
    assert!(mesh.line_count() > 2);
    // Filled tips
    assert_eq!(mesh.polygon_count(), 2);
}

#[test]
fn test_graph_has_lines_only() {
    let graph = function_graph(f64::sin, (-3.0, 3.0), 50);
    let mesh = mobject_to_mesh(&graph);
    assert_eq!(mesh.line_count(), 1);
    assert_eq!(mesh.lines[0].len(), 50);
    assert_eq!(mesh.polygon_count(), 0);
}

#[test]
fn test_transforms_move_geometry() {
    let mut sq = square(2.0);
    sq.shift(Vector3::new(3.0, 0.0, 0.0)).scale(0.5);
    let bbox = mobject_to_mesh(&sq).bounding_box();
    approx::assert_relative_eq!(bbox.min.x, 2.5, epsilon = 1e-9);
    approx::assert_relative_eq!(bbox.max.x, 3.5, epsilon = 1e-9);
}

#[test]
fn test_field_round_trip() -> Result<()> {
    let mut mesh = mobject_to_mesh(&square(1.0));
    let pressure = vec![0.1, 0.2, 0.3, 0.4];
    mesh.attach_scalar("pressure", &pressure)?;
    assert_eq!(mesh.scalar_field("pressure"), Some(pressure.as_slice()));

    mesh.attach_vector("velocity", &[[1.0, 0.0, 0.0]; 4])?;
    assert!(matches!(mesh.field("velocity"), Some(Field::Vector(v)) if v.len() == 4));
    assert_eq!(mesh.active_vectors.as_deref(), Some("velocity"));
    Ok(())
}

#[test]
fn test_bad_vector_components_leave_mesh_unchanged() -> Result<()> {
    let mut mesh = mobject_to_mesh(&square(1.0));
    mesh.attach_scalar("pressure", &[0.0; 4])?;
    let before = mesh.clone();

    let short_vectors = vec![vec![1.0, 0.0]; 4];
    let err = mesh
        .attach_vector("velocity", short_vectors.as_slice())
        .unwrap_err();
    assert!(matches!(
        err,
        ExportError::SizeMismatch { expected: 3, found: 2, .. }
    ));

    let err = mesh.attach_scalar("pressure", &[1.0; 3]).unwrap_err();
    assert!(matches!(
        err,
        ExportError::SizeMismatch { expected: 4, found: 3, .. }
    ));

    assert_eq!(mesh, before);
    Ok(())
}
