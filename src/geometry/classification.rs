// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Stroke/fill classification
//! Decides which cell kinds a leaf contributes to the mesh

use crate::scene::Style;

/// Cell kinds a leaf contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellKinds {
    pub lines: bool,
    pub polygons: bool,
}

impl CellKinds {
    pub const LINES: CellKinds = CellKinds {
        lines: true,
        polygons: false,
    };

    pub const POLYGONS: CellKinds = CellKinds {
        lines: false,
        polygons: true,
    };

    pub const BOTH: CellKinds = CellKinds {
        lines: true,
        polygons: true,
    };
}

/// Classify a path leaf by its style.
///
/// Visible fill yields polygons. Visible stroke, or the absence of fill,
/// yields lines, so every non-empty leaf produces at least one cell kind.
pub fn classify(style: &Style) -> CellKinds {
    CellKinds {
        polygons: style.has_fill(),
        lines: style.has_stroke() || !style.has_fill(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Style, BLUE};

    #[test]
    fn test_stroke_only_is_lines() {
        assert_eq!(classify(&Style::default()), CellKinds::LINES);
    }

    #[test]
    fn test_fill_without_stroke_is_polygons() {
        let style = Style {
            stroke_width: 0.0,
            ..Style::filled(BLUE, 0.5)
        };
        assert_eq!(classify(&style), CellKinds::POLYGONS);
    }

    #[test]
    fn test_fill_with_stroke_is_both() {
        assert_eq!(classify(&Style::filled(BLUE, 0.5)), CellKinds::BOTH);
    }

    #[test]
    fn test_invisible_shape_degrades_to_lines() {
        let style = Style {
            stroke_width: 0.0,
            fill_opacity: 0.0,
            ..Style::default()
        };
        assert_eq!(classify(&style), CellKinds::LINES);
    }
}
