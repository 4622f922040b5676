//! Helm easing: turns the six input flags into smoothed forward, vertical and
//! turn rates, and the rates into a world-space displacement.

use glam::DVec3;

use abyss_core::components::{Controls, Helm};
use abyss_core::config::HelmTuning;

use crate::guidance::forward_vector;

/// Move `current` toward `target` by at most `step`, landing exactly on it when close.
pub fn approach(current: f64, target: f64, step: f64) -> f64 {
    if (target - current).abs() <= step {
        target
    } else if target > current {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}

/// Shed up to `step` toward zero without crossing it.
pub fn decay(current: f64, step: f64) -> f64 {
    if current > 0.0 {
        (current - step).max(0.0)
    } else {
        (current + step).min(0.0)
    }
}

/// One axis of the integrator. Inputs add their targets; with neither pressed
/// the rate decays instead.
fn ease(
    current: f64,
    (positive, negative): (bool, bool),
    (positive_target, negative_target): (f64, f64),
    (accel, decel): (f64, f64),
) -> f64 {
    if !positive && !negative {
        return decay(current, decel);
    }
    let mut target = 0.0;
    if positive {
        target += positive_target;
    }
    if negative {
        target -= negative_target;
    }
    approach(current, target, accel)
}

/// Advance all three axes one tick toward the commanded rates.
pub fn advance(helm: &mut Helm, tuning: &HelmTuning, max_speed: f64) {
    let c = helm.controls;
    let linear = (tuning.acceleration, tuning.deceleration);

    helm.forward = ease(
        helm.forward,
        (c.forward, c.backward),
        (max_speed, max_speed * tuning.backward_multiplier),
        linear,
    );
    helm.rotation = ease(
        helm.rotation,
        (c.right, c.left),
        (tuning.rotation_speed, tuning.rotation_speed),
        (tuning.rotation_acceleration, tuning.rotation_deceleration),
    );
    let vertical = max_speed * tuning.vertical_multiplier;
    helm.vertical = ease(helm.vertical, (c.up, c.down), (vertical, vertical), linear);
}

/// All stop: zero rates and release every control.
pub fn stop(helm: &mut Helm) {
    *helm = Helm::default();
}

pub fn release_controls(helm: &mut Helm) {
    helm.controls = Controls::default();
}

/// Displacement for one tick: forward along the yaw plus vertical along world-up.
pub fn displacement(helm: &Helm, yaw_deg: f64) -> DVec3 {
    forward_vector(yaw_deg) * helm.forward + DVec3::Y * helm.vertical
}

/// Combined speed, negative when the forward component is astern.
pub fn signed_speed(helm: &Helm) -> f64 {
    let magnitude = (helm.forward * helm.forward + helm.vertical * helm.vertical).sqrt();
    if helm.forward < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}
