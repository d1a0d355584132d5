// Math utilities and helper functions

use glam::Vec3;

/// Impulse pushing a struck body into the surface it was hit on.
/// The normal points away from the surface, so the impulse is its opposite.
pub fn impact_impulse(normal: Vec3, force: f32) -> Vec3 {
    -normal.normalize_or_zero() * force
}

/// Check that every component of a vector is a finite number
pub fn is_finite_vec(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}
