//! Sweep line: advances every tick and reveals contacts it passes over.

use abyss_core::components::Sonar;
use abyss_core::constants::{SONAR_REVEAL_TOLERANCE, SONAR_SWEEP_SPEED};

/// Wrap an angle into [0, 360).
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed difference `a - b` wrapped into [-180, 180).
pub fn angle_difference(a: f64, b: f64) -> f64 {
    (a - b + 180.0).rem_euclid(360.0) - 180.0
}

/// Advance the sweep, drop expired contacts, then reveal those under the sweep line.
pub fn tick(sonar: &mut Sonar, now_ms: u64) {
    sonar.sweep_angle = normalize_degrees(sonar.sweep_angle + SONAR_SWEEP_SPEED);
    sonar.contacts.retain(|c| !c.is_expired(now_ms));

    let window = SONAR_SWEEP_SPEED + SONAR_REVEAL_TOLERANCE;
    let sweep = sonar.sweep_angle;
    for contact in sonar.contacts.iter_mut().filter(|c| !c.is_revealed()) {
        if angle_difference(sweep, contact.bearing).abs() <= window {
            contact.reveal(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abyss_core::contact::SonarContact;
    use abyss_core::enums::ContactClass;
    use glam::DVec3;

    fn sonar_with(sweep_angle: f64, bearings: &[f64]) -> Sonar {
        Sonar {
            sweep_angle,
            contacts: bearings
                .iter()
                .map(|&b| SonarContact::new(DVec3::new(0.0, 0.0, 10.0), b, ContactClass::Medium, 0))
                .collect(),
        }
    }

    #[test]
    fn test_sweep_wraps() {
        let mut sonar = sonar_with(359.0, &[]);
        tick(&mut sonar, 50);
        assert!((sonar.sweep_angle - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_reveal_window_across_zero() {
        let mut sonar = sonar_with(358.0, &[2.5, 10.0]);
        tick(&mut sonar, 50);
        assert!(sonar.contacts[0].is_revealed());
        assert!(!sonar.contacts[1].is_revealed());
        assert_eq!(sonar.contacts[0].revealed_ms, Some(50));
    }

    #[test]
    fn test_expired_unrevealed_contacts_purged() {
        let mut sonar = sonar_with(0.0, &[180.0]);
        tick(&mut sonar, 10_000);
        assert_eq!(sonar.contacts.len(), 1);
        tick(&mut sonar, 10_050);
        assert!(sonar.contacts.is_empty());
    }

    #[test]
    fn test_angle_difference() {
        assert_eq!(angle_difference(10.0, 350.0), 20.0);
        assert_eq!(angle_difference(350.0, 10.0), -20.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
    }
}
