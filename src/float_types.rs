// Scalar type and geometric tolerances shared by the kernel and the builders.

pub use parry3d_f64 as parry3d;

/// Our Real scalar type.
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Plane-classification epsilon used by the BSP kernel.
pub const EPSILON: Real = 1e-5;

/// Lazily-initialized tolerance used when comparing measured geometry.
/// Defaults to `1e-6`; set env var `INSERTCSG_TOLERANCE` at build time to
/// override it (e.g. `INSERTCSG_TOLERANCE=1e-4 cargo build`).
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_tolerance() -> Real {
    1e-6
}

/// Returns the current tolerance.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        if let Some(environment_variable) = option_env!("INSERTCSG_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        default_tolerance()
    })
}

/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;

/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;

/// Default number of segments used to approximate a circle.
pub const DEFAULT_SEGMENTS: usize = 32;
