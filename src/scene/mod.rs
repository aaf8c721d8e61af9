// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene module
//!
//! Input side of the exporter: the mobject tree, colors, shape constructors
//! and a minimal scene container that renderers hand to the export pipeline.

mod color;
mod mobject;
pub mod shapes;

pub use color::{sample_gradient, Rgba, BLACK, BLUE, GREEN, GREY, ORANGE, PURPLE, RED, WHITE, YELLOW};
pub use mobject::{ColorScale, Mobject, MobjectKind, PathData, Style, SubPath, Surface, SurfaceFn};

/// Current state of a scene: its name and the mobjects on stage
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub name: String,
    pub mobjects: Vec<Mobject>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mobjects: Vec::new(),
        }
    }

    pub fn add(&mut self, mobject: Mobject) -> &mut Self {
        self.mobjects.push(mobject);
        self
    }

    pub fn clear(&mut self) {
        self.mobjects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.mobjects.is_empty()
    }
}
