// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and mobject conversion

mod adapter;
mod bbox;
mod classification;
mod fields;
mod flatten;
mod mesh;

pub use adapter::{mobject_to_mesh, path_to_mesh, surface_to_mesh, vmobject_to_mesh};
pub use bbox::BoundingBox;
pub use classification::{classify, CellKinds};
pub use fields::{add_scalar_field, add_vector_field};
pub use flatten::{flatten, flatten_all};
pub use mesh::{Field, Mesh};
