//! Display parameters the page sends with every render request.

use super::ViewerError;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Shading model used by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Material,
    Flat,
    Wireframe,
}

pub const MIN_HEIGHT: u32 = 50;
pub const MAX_HEIGHT: u32 = 1000;
pub const SHININESS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// `#RRGGBB`
    pub color: String,
    pub material: Material,
    pub auto_rotate: bool,
    pub opacity: f64,
    /// Render panel height in pixels
    pub height: u32,
    /// Camera elevation in degrees
    pub cam_v_angle: f64,
    /// Camera azimuth in degrees
    pub cam_h_angle: f64,
    /// Camera distance; 0 fits the model in view
    pub cam_distance: f64,
    pub max_view_distance: f64,
    /// Fixed; a posted value is read and dropped.
    #[serde(default = "default_shininess", deserialize_with = "fixed_shininess")]
    pub shininess: u32,
}

const fn default_shininess() -> u32 {
    SHININESS
}

fn fixed_shininess<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    IgnoredAny::deserialize(deserializer)?;
    Ok(SHININESS)
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            color: "#FF9900".to_owned(),
            material: Material::Material,
            auto_rotate: false,
            opacity: 1.0,
            height: 500,
            cam_v_angle: 60.0,
            cam_h_angle: -90.0,
            cam_distance: 0.0,
            max_view_distance: 1000.0,
            shininess: SHININESS,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), ViewerError> {
        let invalid = |msg: String| Err(ViewerError::InvalidConfig(msg));

        if !is_hex_color(&self.color) {
            return invalid(format!("color {:?} is not of the form #RRGGBB", self.color));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return invalid(format!("opacity {} is outside [0, 1]", self.opacity));
        }
        if !(MIN_HEIGHT..=MAX_HEIGHT).contains(&self.height) {
            return invalid(format!(
                "height {} is outside [{MIN_HEIGHT}, {MAX_HEIGHT}]",
                self.height
            ));
        }
        if !(self.cam_v_angle.is_finite() && self.cam_h_angle.is_finite()) {
            return invalid("camera angles must be finite".to_owned());
        }
        if !(self.cam_distance.is_finite() && self.cam_distance >= 0.0) {
            return invalid(format!("camera distance {} must be >= 0", self.cam_distance));
        }
        if !(self.max_view_distance.is_finite() && self.max_view_distance >= 1.0) {
            return invalid(format!(
                "max view distance {} must be >= 1",
                self.max_view_distance
            ));
        }
        Ok(())
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}
