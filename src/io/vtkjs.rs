// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! JSON scene bundle consumed by the web viewer

use crate::geometry::{flatten, Mesh};
use crate::scene::{Mobject, WHITE};
use serde::{Deserialize, Serialize};

/// Value of the bundle's `type` key
pub const SCENE_BUNDLE_TYPE: &str = "vtkjs_scene";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneBundle {
    #[serde(rename = "type")]
    pub bundle_type: String,
    pub scene_name: String,
    pub objects: Vec<SceneObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub type_name: String,
    /// Flat `x y z` coordinates
    pub points: Vec<f64>,
    pub lines: Vec<Vec<usize>>,
    pub polys: Vec<Vec<usize>>,
    /// Flat 8-bit RGBA, present only when the mesh carries per-point colors
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub colors: Option<Vec<u8>>,
    pub material: Material,
    /// `[xmin, xmax, ymin, ymax, zmin, zmax]`, absent for empty objects
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bounds: Option<[f64; 6]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
    /// `surface`, `wireframe` or `points`
    pub representation: String,
}

impl SceneObject {
    fn from_mobject(index: usize, mobject: &Mobject) -> Self {
        let mesh = flatten(mobject);
        let display = mobject
            .style()
            .map(|style| style.display_color())
            .unwrap_or(WHITE);

        Self {
            name: format!("{}_{}", mobject.type_name, index),
            type_name: mobject.type_name.clone(),
            points: mesh.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect(),
            colors: mesh
                .point_colors
                .as_ref()
                .map(|colors| colors.iter().flat_map(|c| c.to_u8()).collect()),
            material: Material {
                color: display.to_rgb_array(),
                opacity: display.a,
                representation: representation(&mesh).to_string(),
            },
            bounds: mesh.bounding_box().to_vtk_bounds(),
            lines: mesh.lines,
            polys: mesh.polygons,
        }
    }
}

fn representation(mesh: &Mesh) -> &'static str {
    if mesh.polygon_count() > 0 {
        "surface"
    } else if mesh.line_count() > 0 {
        "wireframe"
    } else {
        "points"
    }
}

/// Build the bundle with one object per top-level mobject
pub fn scene_bundle(scene_name: &str, mobjects: &[Mobject]) -> SceneBundle {
    SceneBundle {
        bundle_type: SCENE_BUNDLE_TYPE.to_string(),
        scene_name: scene_name.to_string(),
        objects: mobjects
            .iter()
            .enumerate()
            .map(|(i, m)| SceneObject::from_mobject(i, m))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::shapes::{circle, square};
    use crate::scene::RED;

    #[test]
    fn test_empty_bundle_json() -> anyhow::Result<()> {
        let bundle = scene_bundle("Empty", &[]);
        let json: serde_json::Value = serde_json::to_value(&bundle)?;
        assert_eq!(json["type"], "vtkjs_scene");
        assert_eq!(json["objects"].as_array().map(Vec::len), Some(0));
        Ok(())
    }

    #[test]
    fn test_objects_follow_input_order() {
        let bundle = scene_bundle(
            "Shapes",
            &[circle(1.0), square(2.0).with_fill(RED, 0.5)],
        );
        assert_eq!(bundle.objects.len(), 2);
        assert_eq!(bundle.objects[0].type_name, "Circle");
        assert_eq!(bundle.objects[0].material.representation, "wireframe");
        assert_eq!(bundle.objects[1].name, "Square_1");
        assert_eq!(bundle.objects[1].material.representation, "surface");
        assert_eq!(bundle.objects[1].material.opacity, 0.5);
        assert_eq!(bundle.objects[1].bounds, Some([-1.0, 1.0, -1.0, 1.0, 0.0, 0.0]));
    }
}
