// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! RGBA colors and the default palette

use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
pub const BLUE: Rgba = Rgba::rgb(0.345, 0.769, 0.867);
pub const RED: Rgba = Rgba::rgb(0.988, 0.384, 0.333);
pub const GREEN: Rgba = Rgba::rgb(0.514, 0.757, 0.404);
pub const YELLOW: Rgba = Rgba::rgb(1.0, 1.0, 0.0);
pub const ORANGE: Rgba = Rgba::rgb(1.0, 0.525, 0.184);
pub const PURPLE: Rgba = Rgba::rgb(0.604, 0.447, 0.675);
pub const GREY: Rgba = Rgba::rgb(0.533, 0.533, 0.533);

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return None;
        }

        let channel = |i: usize| -> Option<f32> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };

        let a = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Component-wise linear interpolation
    pub fn lerp(&self, other: &Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        Rgba::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Quantize to 8-bit channels, as stored in VTK color arrays
    pub fn to_u8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn to_rgb_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        WHITE
    }
}

/// Sample a multi-stop gradient at `t` in `[0, 1]`
pub fn sample_gradient(stops: &[Rgba], t: f64) -> Rgba {
    match stops {
        [] => WHITE,
        [only] => *only,
        _ => {
            let scaled = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
            let index = (scaled.floor() as usize).min(stops.len() - 2);
            stops[index].lerp(&stops[index + 1], (scaled - index as f64) as f32)
        }
    }
}
