//! Math helpers shared by the rig solvers.
//!
//! Conventions: right-handed, `+Y` up, bones and characters face `+Z`
//! (the glTF model convention). Angles crossing the public API are in
//! degrees; glam works in radians internally.

use glam::{Mat3, Quat, Vec3};

/// Vectors shorter than this are treated as having no direction.
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Local forward axis of every bone the rig aims.
pub const FORWARD: Vec3 = Vec3::Z;

/// World up axis.
pub const UP: Vec3 = Vec3::Y;

/// Frame-rate independent interpolation factor `1 - e^(-rate·dt)`.
///
/// Negative `dt` is treated as zero, so the factor is never negative.
#[inline]
#[must_use]
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt.max(0.0)).exp()
}

/// Moves `current` toward `target` by the smoothing factor for `rate` and `dt`.
#[inline]
#[must_use]
pub fn smooth_f32(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * smoothing_factor(rate, dt)
}

/// Vector counterpart of [`smooth_f32`].
#[inline]
#[must_use]
pub fn smooth_vec3(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current.lerp(target, smoothing_factor(rate, dt))
}

/// Spherical counterpart of [`smooth_f32`].
#[inline]
#[must_use]
pub fn smooth_quat(current: Quat, target: Quat, rate: f32, dt: f32) -> Quat {
    current.slerp(target, smoothing_factor(rate, dt))
}

/// Builds the rotation whose `+Z` axis points along `forward` and whose `+Y`
/// axis lies in the plane of `forward` and `up`.
///
/// Returns `None` when `forward` has no direction. If `forward` is parallel
/// to `up` the shortest arc from `+Z` is used instead.
#[must_use]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.try_normalize()?;

    let Some(right) = up.cross(forward).try_normalize() else {
        return Some(Quat::from_rotation_arc(FORWARD, forward));
    };
    let new_up = forward.cross(right);

    let basis = Mat3::from_cols(right, new_up, forward);
    Some(Quat::from_mat3(&basis).normalize())
}

/// Rotates the direction `from` toward `to` by at most `max_angle` radians.
///
/// This is a pure angular clamp: when the two directions are within
/// `max_angle` of each other the result is `to` itself. The result is unit
/// length. Returns `None` if either input has no direction.
#[must_use]
pub fn rotate_towards(from: Vec3, to: Vec3, max_angle: f32) -> Option<Vec3> {
    let from = from.try_normalize()?;
    let to = to.try_normalize()?;

    let angle = from.angle_between(to);
    if angle <= max_angle {
        return Some(to);
    }

    let axis = from
        .cross(to)
        .try_normalize()
        .unwrap_or_else(|| from.any_orthonormal_vector());

    Some((Quat::from_axis_angle(axis, max_angle.max(0.0)) * from).normalize())
}

/// Angle in degrees from `from` to `to`, signed by the handedness of the turn
/// about `axis`. Positive angles turn `+Z` toward `+X` about `+Y`.
#[must_use]
pub fn signed_angle(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    if from.length_squared() < DIRECTION_EPSILON || to.length_squared() < DIRECTION_EPSILON {
        return 0.0;
    }
    let unsigned = from.angle_between(to).to_degrees();
    if axis.dot(from.cross(to)) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

/// Removes the component of `v` along `normal`.
#[inline]
#[must_use]
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    match normal.try_normalize() {
        Some(n) => v - n * v.dot(n),
        None => v,
    }
}

/// Wraps an angle in degrees into `(-180, 180]`.
#[must_use]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Clamps an angle in degrees into `[min, max]`.
///
/// Never panics on inverted bounds; configurations are validated at setup
/// so `min <= max` holds in practice.
#[inline]
#[must_use]
pub fn clamp_degrees(angle: f32, min: f32, max: f32) -> f32 {
    angle.max(min).min(max)
}

/// Quadratic Bezier through `start`, `control` and `end`, evaluated as two
/// nested linear interpolations. `t` is saturated to `[0, 1]`, so `t = 1`
/// (or any overshoot) returns `end` exactly.
#[must_use]
pub fn quadratic_bezier(start: Vec3, control: Vec3, end: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let a = lerp_exact(start, control, t);
    let b = lerp_exact(control, end, t);
    lerp_exact(a, b, t)
}

/// Relative slack allowed when accumulated frame times are compared against
/// a duration.
pub const DURATION_TOLERANCE: f32 = 1e-4;

/// Whether `elapsed`, a running sum of `dt`, has reached `duration`.
///
/// Sixty f32 additions of `1/60` fall just short of `1.0`, so an exact
/// comparison would finish a tick late.
#[inline]
#[must_use]
pub fn duration_reached(elapsed: f32, duration: f32) -> bool {
    elapsed >= duration - duration.abs() * DURATION_TOLERANCE
}

/// Two-weight lerp: returns `a` exactly at `t = 0` and `b` exactly at `t = 1`.
#[inline]
fn lerp_exact(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}
