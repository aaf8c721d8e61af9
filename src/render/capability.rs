// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Live rendering capability probe

use crate::error::ExportError;
use std::fmt;

/// Forces an offscreen context even without a display server
pub const OFFSCREEN_ENV: &str = "POLYFRAME_VTK_OFFSCREEN";

/// Whether an interactive 3D render window could be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCapability {
    Available { backend: &'static str },
    Unavailable { reason: String },
}

impl RenderCapability {
    /// Probe the current process environment
    pub fn probe() -> Self {
        Self::probe_with(|key| std::env::var(key).ok())
    }

    /// Probe using `lookup` for environment variables
    pub fn probe_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).is_some_and(|v| !v.trim().is_empty());

        if lookup(OFFSCREEN_ENV).is_some_and(|v| matches!(v.trim(), "1" | "true" | "yes")) {
            return Self::Available {
                backend: "offscreen",
            };
        }

        if cfg!(any(target_os = "macos", target_os = "windows")) {
            return Self::Available { backend: "native" };
        }

        if set("WAYLAND_DISPLAY") {
            Self::Available { backend: "wayland" }
        } else if set("DISPLAY") {
            Self::Available { backend: "x11" }
        } else {
            Self::Unavailable {
                reason: format!("no display server found and {OFFSCREEN_ENV} is not set"),
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Fail with [`ExportError::MissingOutputCapability`] when unavailable
    pub fn require(&self) -> Result<(), ExportError> {
        match self {
            Self::Available { .. } => Ok(()),
            Self::Unavailable { reason } => Err(ExportError::missing_capability(reason.clone())),
        }
    }
}

impl fmt::Display for RenderCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { backend } => write!(f, "available ({backend})"),
            Self::Unavailable { reason } => write!(f, "unavailable: {reason}"),
        }
    }
}
