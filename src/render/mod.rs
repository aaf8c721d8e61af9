// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Render module - connects a playing scene to the VTK exporter

mod capability;
mod renderer;

pub use capability::{RenderCapability, OFFSCREEN_ENV};
pub use renderer::VtkRenderer;

use crate::scene::Mobject;
use std::fmt;

type UpdateFn = Box<dyn Fn(&mut [Mobject], f64) + Send + Sync>;

/// A timed change to the scene's mobjects.
///
/// `update` receives the mobjects as they were when the animation started and
/// the eased progress `alpha` in `[0, 1]`.
pub struct Animation {
    pub run_time: f64,
    update: UpdateFn,
}

impl Animation {
    pub fn new<F>(run_time: f64, update: F) -> Self
    where
        F: Fn(&mut [Mobject], f64) + Send + Sync + 'static,
    {
        Self {
            run_time,
            update: Box::new(update),
        }
    }

    /// Apply the state at progress `alpha`
    pub fn apply(&self, mobjects: &mut [Mobject], alpha: f64) {
        (self.update)(mobjects, smooth(alpha.clamp(0.0, 1.0)));
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("run_time", &self.run_time)
            .finish_non_exhaustive()
    }
}

/// Smoothstep easing
fn smooth(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}
