// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for conversion and export

use thiserror::Error;

/// Errors raised by the VTK export pipeline.
///
/// Filesystem and serialization failures are propagated through `anyhow`
/// with context; the variants here are the ones callers match on.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A field array does not line up with the mesh it is attached to
    #[error("Size mismatch for field '{name}': expected {expected}, found {found}")]
    SizeMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Live 3D rendering cannot be initialised in this environment
    #[error("Missing output capability: {reason}")]
    MissingOutputCapability { reason: String },

    /// No built-in scene with this name
    #[error("Unknown scene: {0}")]
    UnknownScene(String),
}

impl ExportError {
    /// Creates a size mismatch error.
    pub fn size_mismatch(name: impl Into<String>, expected: usize, found: usize) -> Self {
        Self::SizeMismatch {
            name: name.into(),
            expected,
            found,
        }
    }

    /// Creates a missing capability error.
    pub fn missing_capability(reason: impl Into<String>) -> Self {
        Self::MissingOutputCapability {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_message() {
        let err = ExportError::size_mismatch("pressure", 10, 7);
        assert_eq!(
            err.to_string(),
            "Size mismatch for field 'pressure': expected 10, found 7"
        );
    }
}
