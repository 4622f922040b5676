//! Guidance geometry for torpedoes.
//!
//! Launch vectors, seeker cone checks, target-mode filtering and the
//! constant-turn-rate steering law. All functions are pure; world access lives
//! in the projectile system.

use glam::DVec3;

use abyss_core::components::Heading;
use abyss_core::enums::{EntityKind, TargetingMode};

/// Horizontal unit vector for a yaw in degrees.
pub fn forward_vector(yaw_deg: f64) -> DVec3 {
    let yaw = yaw_deg.to_radians();
    DVec3::new(-yaw.sin(), 0.0, yaw.cos())
}

/// Initial velocity at `speed` along yaw/pitch (degrees). Positive pitch points down.
pub fn launch_velocity(yaw_deg: f64, pitch_deg: f64, speed: f64) -> DVec3 {
    let yaw = yaw_deg.to_radians();
    let pitch = pitch_deg.to_radians();
    DVec3::new(
        -yaw.sin() * pitch.cos(),
        -pitch.sin(),
        yaw.cos() * pitch.cos(),
    ) * speed
}

/// Orientation that faces along a velocity.
pub fn heading_from_velocity(velocity: DVec3) -> Heading {
    let horizontal = (velocity.x * velocity.x + velocity.z * velocity.z).sqrt();
    Heading {
        yaw: (-velocity.x).atan2(velocity.z).to_degrees(),
        pitch: (-velocity.y).atan2(horizontal).to_degrees(),
    }
}

/// Whether `target` lies within `half_angle_deg` of the horizontal heading at `yaw_deg`.
pub fn in_detection_cone(yaw_deg: f64, from: DVec3, target: DVec3, half_angle_deg: f64) -> bool {
    let Some(to_target) = (target - from).try_normalize() else {
        return true;
    };
    let cos = forward_vector(yaw_deg).dot(to_target).clamp(-1.0, 1.0);
    cos.acos().to_degrees() <= half_angle_deg
}

/// Target filter for a seeker mode.
pub fn matches_targeting_mode(mode: TargetingMode, kind: EntityKind) -> bool {
    match mode {
        TargetingMode::All => kind.is_living() || kind == EntityKind::Vehicle,
        TargetingMode::Players => kind == EntityKind::Player,
        TargetingMode::Vehicles => kind == EntityKind::Vehicle,
        TargetingMode::Other => kind.is_living() && kind != EntityKind::Player,
    }
}

/// Turn `velocity` toward `target` by at most `max_turn_deg`, keeping its speed.
///
/// Snaps onto the line of sight when it is within the turn budget; otherwise
/// rotates by exactly the budget about the axis perpendicular to both
/// directions. If the target is dead ahead or dead astern the heading is kept.
pub fn steer(velocity: DVec3, position: DVec3, target: DVec3, max_turn_deg: f64) -> DVec3 {
    let speed = velocity.length();
    let (Some(current), Some(desired)) = (
        velocity.try_normalize(),
        (target - position).try_normalize(),
    ) else {
        return velocity;
    };

    let angle = current.dot(desired).clamp(-1.0, 1.0).acos();
    let budget = max_turn_deg.to_radians();
    if angle <= budget {
        return desired * speed;
    }

    let Some(axis) = current.cross(desired).try_normalize() else {
        return velocity;
    };

    // Rodrigues rotation of `current` about `axis`.
    let (sin, cos) = budget.sin_cos();
    let rotated =
        current * cos + axis.cross(current) * sin + axis * axis.dot(current) * (1.0 - cos);
    rotated.normalize() * speed
}
