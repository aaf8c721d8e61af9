// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Named per-point fields
//!
//! Scalar and 3-vector attributes for scientific annotations (pressure,
//! velocity, ...). Attaching under an existing name replaces that field.

use super::mesh::{Field, Mesh};
use crate::error::ExportError;

impl Mesh {
    /// Attach a scalar field with one value per point
    pub fn attach_scalar(&mut self, name: &str, values: &[f64]) -> Result<(), ExportError> {
        if values.len() != self.point_count() {
            return Err(ExportError::size_mismatch(name, self.point_count(), values.len()));
        }

        if self.active_vectors.as_deref() == Some(name) {
            self.active_vectors = None;
        }
        self.fields
            .insert(name.to_string(), Field::Scalar(values.to_vec()));
        Ok(())
    }

    /// Attach a vector field with one 3-component vector per point.
    ///
    /// The field becomes the mesh's active vectors.
    pub fn attach_vector<V: AsRef<[f64]>>(
        &mut self,
        name: &str,
        vectors: &[V],
    ) -> Result<(), ExportError> {
        if vectors.len() != self.point_count() {
            return Err(ExportError::size_mismatch(name, self.point_count(), vectors.len()));
        }

        let mut packed = Vec::with_capacity(vectors.len());
        for vector in vectors {
            match vector.as_ref() {
                &[x, y, z] => packed.push([x, y, z]),
                other => return Err(ExportError::size_mismatch(name, 3, other.len())),
            }
        }

        self.fields.insert(name.to_string(), Field::Vector(packed));
        self.active_vectors = Some(name.to_string());
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn scalar_field(&self, name: &str) -> Option<&[f64]> {
        match self.fields.get(name)? {
            Field::Scalar(values) => Some(values),
            Field::Vector(_) => None,
        }
    }

    pub fn vector_field(&self, name: &str) -> Option<&[[f64; 3]]> {
        match self.fields.get(name)? {
            Field::Vector(values) => Some(values),
            Field::Scalar(_) => None,
        }
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Field> {
        if self.active_vectors.as_deref() == Some(name) {
            self.active_vectors = None;
        }
        self.fields.remove(name)
    }
}

/// Free-function form of [`Mesh::attach_scalar`]
pub fn add_scalar_field(mesh: &mut Mesh, name: &str, values: &[f64]) -> Result<(), ExportError> {
    mesh.attach_scalar(name, values)
}

/// Free-function form of [`Mesh::attach_vector`]
pub fn add_vector_field<V: AsRef<[f64]>>(
    mesh: &mut Mesh,
    name: &str,
    vectors: &[V],
) -> Result<(), ExportError> {
    mesh.attach_vector(name, vectors)
}
