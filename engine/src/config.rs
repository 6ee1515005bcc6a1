//! Tool Configuration
//!
//! Centralized settings for the shape builders: picking plane placement,
//! marker and segment sizes, colors and the curve bootstrap offset.
//! `Default` matches the constants the viewport has always used, and every
//! field may be omitted from a JSON config file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scene::{Color, PickingPlane, PlaneAxis};

/// Placement of the picking plane installed by `start_tool`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingPlaneConfig {
    /// Axis the plane is fixed on
    pub axis: PlaneAxis,
    /// Plane position along `axis`
    pub offset: f32,
    /// Side length of the square plane
    pub extent: f32,
}

impl Default for PickingPlaneConfig {
    fn default() -> Self {
        Self {
            axis: PlaneAxis::Z,
            offset: 0.0,
            extent: 5000.0,
        }
    }
}

impl PickingPlaneConfig {
    pub fn invisible(&self) -> PickingPlane {
        PickingPlane::invisible(self.axis, self.offset, self.extent)
    }

    pub fn snapping(&self) -> PickingPlane {
        PickingPlane::snapping(self.axis, self.offset, self.extent)
    }
}

/// Central configuration shared by every builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub picking_plane: PickingPlaneConfig,
    /// Radius of the marker placed on every curve anchor
    pub marker_radius: f32,
    /// Sphere tessellation around the equator
    pub sphere_width_segments: u32,
    /// Sphere tessellation pole to pole
    pub sphere_height_segments: u32,
    /// Offset along +X of the synthetic second point sent with the first
    /// curve anchor, so the fitter always gets two distinct points
    pub bootstrap_offset: f32,
    /// Color of the session material used by previews and committed meshes
    pub shape_color: Color,
    /// Curve color when a fit response carries none
    pub curve_color: Color,
    /// Samples per anchor point produced by the local curve fitter
    pub curve_samples_per_point: usize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            picking_plane: PickingPlaneConfig::default(),
            marker_radius: 0.07,
            sphere_width_segments: 32,
            sphere_height_segments: 16,
            bootstrap_offset: 0.001,
            shape_color: Color::new(0.4, 0.6, 0.9),
            curve_color: Color::WHITE,
            curve_samples_per_point: 10,
        }
    }
}

impl ToolConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ToolConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject values no builder can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::positive("picking_plane.extent", self.picking_plane.extent)?;
        Self::finite("picking_plane.offset", self.picking_plane.offset)?;
        Self::positive("marker_radius", self.marker_radius)?;
        Self::positive("bootstrap_offset", self.bootstrap_offset)?;
        if self.curve_samples_per_point == 0 {
            return Err(ConfigError::InvalidValue {
                field: "curve_samples_per_point",
                expected: "at least 1",
                got: 0.0,
            });
        }
        Ok(())
    }

    fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                field,
                expected: "finite and positive",
                got: value,
            })
        }
    }

    fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                field,
                expected: "finite",
                got: value,
            })
        }
    }
}

static_assertions::assert_impl_all!(ToolConfig: Clone, Send, Sync);
