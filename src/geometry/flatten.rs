// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Group flattening
//!
//! Walks a mobject tree depth-first (pre-order, declaration order) with an
//! explicit stack and concatenates every leaf's mesh into one.

use super::adapter::{path_to_mesh, surface_to_mesh};
use super::Mesh;
use crate::scene::{Mobject, MobjectKind};
use log::debug;

/// Flatten a single tree into one mesh
pub fn flatten(root: &Mobject) -> Mesh {
    flatten_all(std::slice::from_ref(root))
}

/// Flatten a list of roots as if they were children of one group
pub fn flatten_all(roots: &[Mobject]) -> Mesh {
    let fragments = collect_fragments(roots);
    let total_points = fragments.iter().map(Mesh::point_count).sum();

    let mut combined = Mesh::with_capacity(total_points);
    for mesh in &fragments {
        combined.append(mesh);
    }

    debug!(
        "Flattened {} root(s) into {} points, {} lines, {} polygons",
        roots.len(),
        combined.point_count(),
        combined.line_count(),
        combined.polygon_count()
    );
    debug_assert!(combined.indices_in_bounds());
    combined
}

/// Leaf meshes in traversal order. Every non-empty leaf carries colors, so
/// the combined mesh is colored whenever it has points.
fn collect_fragments(roots: &[Mobject]) -> Vec<Mesh> {
    let mut fragments = Vec::new();
    let mut stack: Vec<&Mobject> = roots.iter().rev().collect();

    while let Some(node) = stack.pop() {
        match &node.kind {
            MobjectKind::Group(children) => stack.extend(children.iter().rev()),
            MobjectKind::Path(path) => {
                if path.num_points() > 0 {
                    fragments.push(path_to_mesh(path));
                }
            }
            MobjectKind::Surface(surface) => fragments.push(surface_to_mesh(surface)),
        }
    }

    fragments
}
