//! Direction and sampling utilities for aimed-trajectory spawning.
//!
//! Everything here is a pure function over [`Vec3`] plus an RNG handle, so the
//! aim-and-deviate math is testable without an `App` or a physics step.

use bevy::prelude::*;
use rand::Rng;

/// Fallback deviation axis used when the random perpendicular is degenerate
/// (the random sample landed parallel to the aim direction).
pub const FALLBACK_AXIS: Vec3 = Vec3::Y;

/// Direction a meteor falls when it spawns exactly on the target point and no
/// aim line exists.
const FALLBACK_AIM: Vec3 = Vec3::NEG_Y;

/// Uniformly random unit vector on the sphere.
pub fn random_unit_vector<R: Rng>(rng: &mut R) -> Vec3 {
    // Rejection-sample the unit ball, then normalize; avoids pole clustering.
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-4 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Uniformly random point in the unit ball.
pub fn random_in_unit_sphere<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

/// Uniform sample on an axis-aligned XZ rectangle at the fixed elevation
/// `center.y`.
pub fn sample_plane_rect<R: Rng>(center: Vec3, half_x: f32, half_z: f32, rng: &mut R) -> Vec3 {
    let x = if half_x > 0.0 {
        rng.gen_range(-half_x..=half_x)
    } else {
        0.0
    };
    let z = if half_z > 0.0 {
        rng.gen_range(-half_z..=half_z)
    } else {
        0.0
    };
    center + Vec3::new(x, 0.0, z)
}

/// Uniform sample within a ball of `radius` around `anchor`.
pub fn sample_in_sphere<R: Rng>(anchor: Vec3, radius: f32, rng: &mut R) -> Vec3 {
    anchor + random_in_unit_sphere(rng) * radius
}

/// Normalized direction from `from` toward `target`.
///
/// Spawning exactly on the target leaves no aim line; the meteor then simply
/// falls straight down rather than carrying a NaN velocity.
pub fn aim_at(from: Vec3, target: Vec3) -> Vec3 {
    (target - from).try_normalize().unwrap_or(FALLBACK_AIM)
}

/// Axis to rotate `base` around when deviating it: the normalized cross
/// product of `base` with a random unit vector. A degenerate (parallel)
/// sample substitutes [`FALLBACK_AXIS`].
pub fn deviation_axis(base: Vec3, random_unit: Vec3) -> Vec3 {
    base.cross(random_unit)
        .try_normalize()
        .unwrap_or(FALLBACK_AXIS)
}

/// Rotate `base` by a uniformly random half-angle in `[0, max_half_angle_deg]`
/// about a random axis perpendicular to it.
///
/// The result is always within the cone of the given half-angle around
/// `base`; a zero half-angle returns `base` unchanged.
pub fn deviate_within_cone<R: Rng>(base: Vec3, max_half_angle_deg: f32, rng: &mut R) -> Vec3 {
    if max_half_angle_deg <= 0.0 {
        return base;
    }
    let angle = rng.gen_range(0.0..=max_half_angle_deg).to_radians();
    let axis = deviation_axis(base, random_unit_vector(rng));
    Quat::from_axis_angle(axis, angle) * base
}

/// Random angular velocity (tumble) with magnitude bounded by `max_speed`,
/// independent of the linear launch velocity.
pub fn random_tumble<R: Rng>(rng: &mut R, max_speed: f32) -> Vec3 {
    random_in_unit_sphere(rng) * max_speed
}
