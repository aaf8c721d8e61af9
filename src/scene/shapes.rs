// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shape constructors
//!
//! Curves are stored as densely sampled anchors, so every constructor takes
//! care of its own resolution.

use super::color::WHITE;
use super::mobject::{Mobject, Style, SubPath, Surface};
use nalgebra::{Matrix4, Point3, Vector3};
use std::f64::consts::{PI, TAU};

/// Anchors used for a full circle
pub const CIRCLE_SEGMENTS: usize = 64;

fn ring(radius: f64, segments: usize, start_angle: f64) -> Vec<Point3<f64>> {
    (0..segments)
        .map(|i| {
            let theta = start_angle + TAU * i as f64 / segments as f64;
            Point3::new(radius * theta.cos(), radius * theta.sin(), 0.0)
        })
        .collect()
}

pub fn circle(radius: f64) -> Mobject {
    Mobject::path(
        "Circle",
        vec![SubPath::closed(ring(radius, CIRCLE_SEGMENTS, 0.0))],
        Style::default(),
    )
}

/// Small filled disc
pub fn dot(point: Point3<f64>, radius: f64) -> Mobject {
    let mut dot = Mobject::path(
        "Dot",
        vec![SubPath::closed(ring(radius, 16, 0.0))],
        Style {
            stroke_width: 0.0,
            ..Style::filled(WHITE, 1.0)
        },
    );
    dot.shift(point.coords);
    dot
}

/// Closed polygon through `vertices`, in order
pub fn polygon(vertices: Vec<Point3<f64>>) -> Mobject {
    Mobject::path("Polygon", vec![SubPath::closed(vertices)], Style::default())
}

/// Regular `n`-gon with unit circumradius, first vertex pointing up
pub fn regular_polygon(n: usize) -> Mobject {
    let mut shape = polygon(ring(1.0, n.max(3), PI / 2.0));
    shape.type_name = "RegularPolygon".into();
    shape
}

pub fn triangle() -> Mobject {
    let mut shape = regular_polygon(3);
    shape.type_name = "Triangle".into();
    shape
}

pub fn rectangle(width: f64, height: f64) -> Mobject {
    let (w, h) = (width / 2.0, height / 2.0);
    let mut shape = polygon(vec![
        Point3::new(w, h, 0.0),
        Point3::new(-w, h, 0.0),
        Point3::new(-w, -h, 0.0),
        Point3::new(w, -h, 0.0),
    ]);
    shape.type_name = "Rectangle".into();
    shape
}

pub fn square(side_length: f64) -> Mobject {
    let mut shape = rectangle(side_length, side_length);
    shape.type_name = "Square".into();
    shape
}

pub fn line(start: Point3<f64>, end: Point3<f64>) -> Mobject {
    Mobject::path("Line", vec![SubPath::open(vec![start, end])], Style::default())
}

/// Filled triangular arrow head at `tip`, pointing along `direction`
pub fn arrow_tip(tip: Point3<f64>, direction: Vector3<f64>, length: f64) -> Mobject {
    let dir = direction.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::x);
    let side = Vector3::z().cross(&dir);
    let side = side
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::y)
        * (length / 2.0);
    let base = tip - dir * length;

    Mobject::path(
        "ArrowTip",
        vec![SubPath::closed(vec![tip, base + side, base - side])],
        Style::filled(WHITE, 1.0),
    )
}

/// Open polyline through `f(x)` sampled over `x_range`
pub fn function_graph<F>(f: F, x_range: (f64, f64), samples: usize) -> Mobject
where
    F: Fn(f64) -> f64,
{
    let samples = samples.max(2);
    let anchors = (0..samples)
        .map(|i| {
            let x = x_range.0 + (x_range.1 - x_range.0) * i as f64 / (samples - 1) as f64;
            Point3::new(x, f(x), 0.0)
        })
        .collect();
    Mobject::path("ParametricFunction", vec![SubPath::open(anchors)], Style::default())
}

/// 2D coordinate system: axis lines, tick marks and optional filled tips
#[derive(Debug, Clone)]
pub struct Axes {
    pub x_range: (f64, f64, f64),
    pub y_range: (f64, f64, f64),
    pub x_length: f64,
    pub y_length: f64,
    pub tips: bool,
}

impl Default for Axes {
    fn default() -> Self {
        Self {
            x_range: (-7.0, 7.0, 1.0),
            y_range: (-4.0, 4.0, 1.0),
            x_length: 12.0,
            y_length: 6.0,
            tips: true,
        }
    }
}

impl Axes {
    const TICK_SIZE: f64 = 0.1;
    const TIP_LENGTH: f64 = 0.35;

    /// Coordinates to scene point
    pub fn c2p(&self, x: f64, y: f64) -> Point3<f64> {
        let (x0, x1, _) = self.x_range;
        let (y0, y1, _) = self.y_range;
        let px = (x - (x0 + x1) / 2.0) / (x1 - x0) * self.x_length;
        let py = (y - (y0 + y1) / 2.0) / (y1 - y0) * self.y_length;
        Point3::new(px, py, 0.0)
    }

    fn ticks(range: (f64, f64, f64)) -> Vec<f64> {
        let (start, end, step) = range;
        if step <= 0.0 {
            return Vec::new();
        }
        let first = (start / step).ceil() as i64;
        let last = (end / step).floor() as i64;
        (first..=last).map(|k| k as f64 * step).collect()
    }

    pub fn build(&self) -> Mobject {
        let origin_x = 0.0_f64.clamp(self.x_range.0, self.x_range.1);
        let origin_y = 0.0_f64.clamp(self.y_range.0, self.y_range.1);

        let mut x_axis = vec![line(
            self.c2p(self.x_range.0, origin_y),
            self.c2p(self.x_range.1, origin_y),
        )];
        for x in Self::ticks(self.x_range) {
            let p = self.c2p(x, origin_y);
            x_axis.push(line(
                p - Vector3::y() * Self::TICK_SIZE,
                p + Vector3::y() * Self::TICK_SIZE,
            ));
        }

        let mut y_axis = vec![line(
            self.c2p(origin_x, self.y_range.0),
            self.c2p(origin_x, self.y_range.1),
        )];
        for y in Self::ticks(self.y_range) {
            let p = self.c2p(origin_x, y);
            y_axis.push(line(
                p - Vector3::x() * Self::TICK_SIZE,
                p + Vector3::x() * Self::TICK_SIZE,
            ));
        }

        if self.tips {
            x_axis.push(arrow_tip(
                self.c2p(self.x_range.1, origin_y),
                Vector3::x(),
                Self::TIP_LENGTH,
            ));
            y_axis.push(arrow_tip(
                self.c2p(origin_x, self.y_range.1),
                Vector3::y(),
                Self::TIP_LENGTH,
            ));
        }

        let mut axes = Mobject::group(vec![
            Mobject::group(x_axis).named("NumberLine"),
            Mobject::group(y_axis).named("NumberLine"),
        ]);
        axes.type_name = "Axes".into();
        axes
    }

    /// Graph of `f` in this coordinate system
    pub fn plot<F>(&self, f: F) -> Mobject
    where
        F: Fn(f64) -> f64,
    {
        let (x0, x1, _) = self.x_range;
        let samples = 101;
        let anchors = (0..samples)
            .map(|i| {
                let x = x0 + (x1 - x0) * i as f64 / (samples - 1) as f64;
                self.c2p(x, f(x))
            })
            .collect();
        Mobject::path("ParametricFunction", vec![SubPath::open(anchors)], Style::default())
    }
}

pub fn sphere(radius: f64, resolution: (usize, usize)) -> Mobject {
    let surface = Surface::new(
        move |u, v| {
            Point3::new(
                radius * v.cos() * u.sin(),
                radius * v.sin() * u.sin(),
                -radius * u.cos(),
            )
        },
        (0.0, PI),
        (0.0, TAU),
    )
    .with_resolution(resolution.0, resolution.1);
    Mobject::surface("Sphere", surface)
}

pub fn torus(major_radius: f64, minor_radius: f64) -> Mobject {
    let surface = Surface::new(
        move |u, v| {
            let ring = major_radius + minor_radius * v.cos();
            Point3::new(ring * u.cos(), ring * u.sin(), minor_radius * v.sin())
        },
        (0.0, TAU),
        (0.0, TAU),
    )
    .with_resolution(24, 24);
    Mobject::surface("Torus", surface)
}

/// Open tube of `radius` along z, centered on the origin
pub fn cylinder(radius: f64, height: f64) -> Mobject {
    let surface = Surface::new(
        move |u, v| Point3::new(radius * u.cos(), radius * u.sin(), v),
        (0.0, TAU),
        (-height / 2.0, height / 2.0),
    )
    .with_resolution(24, 2);
    Mobject::surface("Cylinder", surface)
}

/// Six filled square faces
pub fn cube(side_length: f64) -> Mobject {
    let half = side_length / 2.0;
    let faces = [
        (Vector3::z(), 0.0, Vector3::x()),
        (-Vector3::z(), PI, Vector3::x()),
        (Vector3::x(), PI / 2.0, Vector3::y()),
        (-Vector3::x(), -PI / 2.0, Vector3::y()),
        (Vector3::y(), -PI / 2.0, Vector3::x()),
        (-Vector3::y(), PI / 2.0, Vector3::x()),
    ];

    let children = faces
        .iter()
        .map(|(normal, angle, axis)| {
            let mut face = square(side_length).with_fill(super::color::BLUE, 1.0);
            let rotation = nalgebra::Rotation3::from_axis_angle(
                &nalgebra::Unit::new_normalize(*axis),
                *angle,
            );
            face.apply_matrix(&rotation.to_homogeneous());
            face.apply_matrix(&Matrix4::new_translation(&(normal * half)));
            face
        })
        .collect();

    let mut cube = Mobject::group(children);
    cube.type_name = "Cube".into();
    cube
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MobjectKind;
    use approx::assert_relative_eq;

    #[test]
    fn test_circle_anchor_count() {
        let c = circle(1.0);
        match &c.kind {
            MobjectKind::Path(path) => {
                assert_eq!(path.num_points(), CIRCLE_SEGMENTS);
                assert!(path.subpaths[0].closed);
            }
            _ => panic!("circle should be a path"),
        }
    }

    #[test]
    fn test_square_extent() {
        let bbox = square(2.0).bounding_box();
        assert_relative_eq!(bbox.size(), Vector3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn test_cube_faces_on_bounds() {
        let cube = cube(2.0);
        assert_eq!(cube.leaves().len(), 6);
        let bbox = cube.bounding_box();
        assert_relative_eq!(bbox.size(), Vector3::new(2.0, 2.0, 2.0), epsilon = 1e-9);
    }

    #[test]
    fn test_cylinder_extent() {
        let bbox = cylinder(0.5, 2.0).bounding_box();
        assert_relative_eq!(bbox.size(), Vector3::new(1.0, 1.0, 2.0), epsilon = 1e-9);
    }

    #[test]
    fn test_axes_contains_lines_and_tips() {
        let axes = Axes {
            x_range: (0.0, 6.0, 1.0),
            y_range: (-1.5, 1.5, 1.0),
            x_length: 10.0,
            y_length: 4.2,
            tips: true,
        }
        .build();

        let tips = axes
            .leaves()
            .iter()
            .filter(|m| m.type_name == "ArrowTip")
            .count();
        assert_eq!(tips, 2);
        assert!(axes.leaves().iter().any(|m| m.type_name == "Line"));
    }
}
