// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene tree nodes
//!
//! A [`Mobject`] is either a leaf with direct geometric data (a set of
//! sub-paths, or a parametric surface) or a group holding ordered children.
//! The tree is owned by the caller; the export pipeline only reads it.

use super::color::{Rgba, WHITE};
use crate::geometry::BoundingBox;
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Coordinate function of a parametric surface
pub type SurfaceFn = Arc<dyn Fn(f64, f64) -> Point3<f64> + Send + Sync>;

/// Stroke and fill attributes of a leaf
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub stroke_color: Rgba,
    pub stroke_width: f64,
    pub stroke_opacity: f32,
    pub fill_color: Rgba,
    pub fill_opacity: f32,
}

impl Style {
    pub fn stroke(color: Rgba, width: f64) -> Self {
        Self {
            stroke_color: color,
            stroke_width: width,
            fill_color: color,
            ..Self::default()
        }
    }

    pub fn filled(color: Rgba, opacity: f32) -> Self {
        Self {
            stroke_color: color,
            fill_color: color,
            fill_opacity: opacity,
            ..Self::default()
        }
    }

    pub fn has_fill(&self) -> bool {
        self.fill_opacity > 0.0
    }

    pub fn has_stroke(&self) -> bool {
        self.stroke_width > 0.0
    }

    /// Color a viewer should use when no per-point colors exist
    pub fn display_color(&self) -> Rgba {
        if self.has_fill() {
            self.fill_color.with_alpha(self.fill_opacity)
        } else {
            self.stroke_color.with_alpha(self.stroke_opacity)
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: WHITE,
            stroke_width: 4.0,
            stroke_opacity: 1.0,
            fill_color: WHITE,
            fill_opacity: 0.0,
        }
    }
}

/// One connected run of anchor points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubPath {
    pub anchors: Vec<Point3<f64>>,
    pub closed: bool,
}

impl SubPath {
    pub fn open(anchors: Vec<Point3<f64>>) -> Self {
        Self {
            anchors,
            closed: false,
        }
    }

    pub fn closed(anchors: Vec<Point3<f64>>) -> Self {
        Self {
            anchors,
            closed: true,
        }
    }
}

/// Geometry of a path-based leaf
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathData {
    pub subpaths: Vec<SubPath>,
    /// Parallel to the concatenation of all sub-path anchors
    pub point_colors: Option<Vec<Rgba>>,
    pub style: Style,
}

impl PathData {
    pub fn num_points(&self) -> usize {
        self.subpaths.iter().map(|s| s.anchors.len()).sum()
    }
}

/// Colors a surface by the value of one coordinate axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    pub colors: Vec<Rgba>,
    /// 0 = x, 1 = y, 2 = z
    pub axis: usize,
    /// Value range mapped onto the palette; the sampled extent when absent
    pub range: Option<(f64, f64)>,
}

impl ColorScale {
    pub fn new(colors: Vec<Rgba>, axis: usize) -> Self {
        Self {
            colors,
            axis: axis.min(2),
            range: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Palette color for `value` given the extent of the sampled values
    pub fn color_for(&self, value: f64, sampled: (f64, f64)) -> Rgba {
        let (min, max) = self.range.unwrap_or(sampled);
        let t = if (max - min).abs() < f64::EPSILON {
            0.0
        } else {
            (value - min) / (max - min)
        };
        super::color::sample_gradient(&self.colors, t)
    }
}

/// Parametric surface leaf
#[derive(Clone)]
pub struct Surface {
    pub func: SurfaceFn,
    pub u_range: (f64, f64),
    pub v_range: (f64, f64),
    /// (rows, columns) of the sampling grid
    pub resolution: (usize, usize),
    /// Applied after the coordinate function
    pub transform: Matrix4<f64>,
    pub style: Style,
    pub color_scale: Option<ColorScale>,
}

impl Surface {
    pub fn new<F>(func: F, u_range: (f64, f64), v_range: (f64, f64)) -> Self
    where
        F: Fn(f64, f64) -> Point3<f64> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            u_range,
            v_range,
            resolution: (32, 32),
            transform: Matrix4::identity(),
            style: Style::filled(super::color::BLUE, 1.0),
            color_scale: None,
        }
    }

    pub fn with_resolution(mut self, rows: usize, cols: usize) -> Self {
        self.resolution = (rows, cols);
        self
    }

    /// Evaluate the surface at `(u, v)` including the accumulated transform
    pub fn evaluate(&self, u: f64, v: f64) -> Point3<f64> {
        self.transform.transform_point(&(self.func)(u, v))
    }

    /// Parameter value of grid row `i` / column `j`
    pub fn grid_param(range: (f64, f64), index: usize, count: usize) -> f64 {
        if count < 2 {
            range.0
        } else {
            range.0 + (range.1 - range.0) * index as f64 / (count - 1) as f64
        }
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("u_range", &self.u_range)
            .field("v_range", &self.v_range)
            .field("resolution", &self.resolution)
            .field("style", &self.style)
            .field("color_scale", &self.color_scale)
            .finish_non_exhaustive()
    }
}

/// Closed set of node variants
#[derive(Debug, Clone)]
pub enum MobjectKind {
    Path(PathData),
    Surface(Surface),
    Group(Vec<Mobject>),
}

/// A node of the scene tree
#[derive(Debug, Clone)]
pub struct Mobject {
    /// Class-like name used for default filenames, e.g. `Circle`
    pub type_name: String,
    pub kind: MobjectKind,
}

impl Mobject {
    pub fn new(type_name: impl Into<String>, kind: MobjectKind) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
        }
    }

    pub fn path(type_name: impl Into<String>, subpaths: Vec<SubPath>, style: Style) -> Self {
        Self::new(
            type_name,
            MobjectKind::Path(PathData {
                subpaths,
                point_colors: None,
                style,
            }),
        )
    }

    pub fn surface(type_name: impl Into<String>, surface: Surface) -> Self {
        Self::new(type_name, MobjectKind::Surface(surface))
    }

    pub fn group(children: Vec<Mobject>) -> Self {
        Self::new("VGroup", MobjectKind::Group(children))
    }

    /// An empty path leaf
    pub fn empty() -> Self {
        Self::new("VMobject", MobjectKind::Path(PathData::default()))
    }

    /// Rename this node's type
    pub fn named(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, MobjectKind::Group(_))
    }

    pub fn children(&self) -> &[Mobject] {
        match &self.kind {
            MobjectKind::Group(children) => children,
            _ => &[],
        }
    }

    /// Append a child, turning this node into a group if it was a leaf
    pub fn add(&mut self, child: Mobject) -> &mut Self {
        match &mut self.kind {
            MobjectKind::Group(children) => children.push(child),
            _ => {
                let leaf = std::mem::replace(self, Mobject::group(Vec::new()));
                self.kind = MobjectKind::Group(vec![leaf, child]);
            }
        }
        self
    }

    /// Leaves reachable from this node, depth-first pre-order
    pub fn leaves(&self) -> Vec<&Mobject> {
        let mut leaves = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match &node.kind {
                MobjectKind::Group(children) => stack.extend(children.iter().rev()),
                _ => leaves.push(node),
            }
        }
        leaves
    }

    fn leaves_mut(&mut self) -> Vec<&mut Mobject> {
        let mut leaves = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                leaves.push(node);
            } else if let MobjectKind::Group(children) = &mut node.kind {
                stack.extend(children.iter_mut().rev());
            }
        }
        leaves
    }

    /// Apply an affine transform to every leaf
    pub fn apply_matrix(&mut self, matrix: &Matrix4<f64>) -> &mut Self {
        for leaf in self.leaves_mut() {
            match &mut leaf.kind {
                MobjectKind::Path(path) => {
                    for subpath in &mut path.subpaths {
                        for anchor in &mut subpath.anchors {
                            *anchor = matrix.transform_point(anchor);
                        }
                    }
                }
                MobjectKind::Surface(surface) => {
                    surface.transform = matrix * surface.transform;
                }
                MobjectKind::Group(_) => {}
            }
        }
        self
    }

    /// Bounding box over anchors and surface grid nodes
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for leaf in self.leaves() {
            match &leaf.kind {
                MobjectKind::Path(path) => {
                    for anchor in path.subpaths.iter().flat_map(|s| &s.anchors) {
                        bbox.expand_to_include(anchor);
                    }
                }
                MobjectKind::Surface(surface) => {
                    let (rows, cols) = surface.resolution;
                    for i in 0..rows {
                        let u = Surface::grid_param(surface.u_range, i, rows);
                        for j in 0..cols {
                            let v = Surface::grid_param(surface.v_range, j, cols);
                            bbox.expand_to_include(&surface.evaluate(u, v));
                        }
                    }
                }
                MobjectKind::Group(_) => {}
            }
        }
        bbox
    }

    pub fn center(&self) -> Point3<f64> {
        let bbox = self.bounding_box();
        if bbox.is_empty() {
            Point3::origin()
        } else {
            bbox.center()
        }
    }

    pub fn shift(&mut self, offset: Vector3<f64>) -> &mut Self {
        self.apply_matrix(&Matrix4::new_translation(&offset))
    }

    pub fn move_to(&mut self, target: Point3<f64>) -> &mut Self {
        let offset = target - self.center();
        self.shift(offset)
    }

    /// Uniform scale about the center
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        let center = self.center().coords;
        let matrix = Matrix4::new_translation(&center)
            * Matrix4::new_scaling(factor)
            * Matrix4::new_translation(&-center);
        self.apply_matrix(&matrix)
    }

    /// Rotate by `angle` radians about `axis` through the center
    pub fn rotate(&mut self, angle: f64, axis: Vector3<f64>) -> &mut Self {
        let center = self.center().coords;
        let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(axis), angle);
        let matrix = Matrix4::new_translation(&center)
            * rotation.to_homogeneous()
            * Matrix4::new_translation(&-center);
        self.apply_matrix(&matrix)
    }

    /// Style of a leaf, or of the first leaf below a group
    pub fn style(&self) -> Option<&Style> {
        self.leaves().into_iter().find_map(|leaf| match &leaf.kind {
            MobjectKind::Path(path) => Some(&path.style),
            MobjectKind::Surface(surface) => Some(&surface.style),
            MobjectKind::Group(_) => None,
        })
    }

    fn style_mut(leaf: &mut Mobject) -> Option<&mut Style> {
        match &mut leaf.kind {
            MobjectKind::Path(path) => Some(&mut path.style),
            MobjectKind::Surface(surface) => Some(&mut surface.style),
            MobjectKind::Group(_) => None,
        }
    }

    /// Set stroke and fill color on every leaf, dropping per-point colors
    pub fn set_color(&mut self, color: Rgba) -> &mut Self {
        for leaf in self.leaves_mut() {
            if let MobjectKind::Path(path) = &mut leaf.kind {
                path.point_colors = None;
            }
            if let Some(style) = Self::style_mut(leaf) {
                style.stroke_color = color;
                style.fill_color = color;
            }
        }
        self
    }

    pub fn set_fill(&mut self, color: Rgba, opacity: f32) -> &mut Self {
        for leaf in self.leaves_mut() {
            if let Some(style) = Self::style_mut(leaf) {
                style.fill_color = color;
                style.fill_opacity = opacity;
            }
        }
        self
    }

    pub fn set_stroke(&mut self, color: Rgba, width: f64) -> &mut Self {
        for leaf in self.leaves_mut() {
            if let Some(style) = Self::style_mut(leaf) {
                style.stroke_color = color;
                style.stroke_width = width;
            }
        }
        self
    }

    pub fn set_fill_opacity(&mut self, opacity: f32) -> &mut Self {
        for leaf in self.leaves_mut() {
            if let Some(style) = Self::style_mut(leaf) {
                style.fill_opacity = opacity;
            }
        }
        self
    }

    /// Attach per-point colors to a path leaf; ignored for other kinds
    pub fn set_point_colors(&mut self, colors: Vec<Rgba>) -> &mut Self {
        if let MobjectKind::Path(path) = &mut self.kind {
            path.point_colors = Some(colors);
        }
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.set_color(color);
        self
    }

    pub fn with_fill(mut self, color: Rgba, opacity: f32) -> Self {
        self.set_fill(color, opacity);
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f32) -> Self {
        self.set_fill_opacity(opacity);
        self
    }

    pub fn with_stroke(mut self, color: Rgba, width: f64) -> Self {
        self.set_stroke(color, width);
        self
    }

    pub fn shifted(mut self, offset: Vector3<f64>) -> Self {
        self.shift(offset);
        self
    }
}
