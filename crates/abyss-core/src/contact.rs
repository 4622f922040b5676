//! Sonar contact record and its reveal/fade lifecycle.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::{SONAR_FADE_MS, SONAR_UNREVEALED_EXPIRY_MS};
use crate::enums::ContactClass;

/// A single sonar detection. Invisible to consumers until the sweep reveals it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SonarContact {
    /// Offset from the pinging vehicle at detection time.
    pub relative: DVec3,
    pub distance: f64,
    /// Vehicle-relative bearing in [0, 360).
    pub bearing: f64,
    pub class: ContactClass,
    pub detected_ms: u64,
    pub revealed_ms: Option<u64>,
}

impl SonarContact {
    pub fn new(relative: DVec3, bearing: f64, class: ContactClass, detected_ms: u64) -> Self {
        Self {
            relative,
            distance: relative.length(),
            bearing,
            class,
            detected_ms,
            revealed_ms: None,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed_ms.is_some()
    }

    /// Mark revealed. A contact is only ever revealed once.
    pub fn reveal(&mut self, now_ms: u64) {
        if self.revealed_ms.is_none() {
            self.revealed_ms = Some(now_ms);
        }
    }

    /// Unrevealed contacts expire 10 s after detection; revealed ones once fully faded.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self.revealed_ms {
            Some(at) => now_ms.saturating_sub(at) > SONAR_FADE_MS,
            None => now_ms.saturating_sub(self.detected_ms) > SONAR_UNREVEALED_EXPIRY_MS,
        }
    }

    /// Display opacity: 0 before reveal, 1 at reveal, linear to 0 over the fade window.
    pub fn fade_alpha(&self, now_ms: u64) -> f64 {
        let Some(at) = self.revealed_ms else {
            return 0.0;
        };
        let elapsed = now_ms.saturating_sub(at);
        if elapsed > SONAR_FADE_MS {
            return 0.0;
        }
        1.0 - elapsed as f64 / SONAR_FADE_MS as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> SonarContact {
        SonarContact::new(DVec3::new(3.0, 0.0, 4.0), 90.0, ContactClass::Medium, 1_000)
    }

    #[test]
    fn test_fade_alpha_lifecycle() {
        let mut c = contact();
        assert_eq!(c.fade_alpha(1_000), 0.0);
        assert_eq!(c.fade_alpha(5_000), 0.0);

        c.reveal(2_000);
        assert_eq!(c.fade_alpha(2_000), 1.0);
        assert!((c.fade_alpha(2_500) - 0.75).abs() < 1e-12);
        assert!((c.fade_alpha(3_000) - 0.5).abs() < 1e-12);
        assert_eq!(c.fade_alpha(4_000), 0.0);
        assert_eq!(c.fade_alpha(9_000), 0.0);
    }

    #[test]
    fn test_fade_alpha_monotonic() {
        let mut c = contact();
        c.reveal(0);
        let mut last = f64::INFINITY;
        for t in (0..=2_500).step_by(50) {
            let a = c.fade_alpha(t);
            assert!(a <= last);
            last = a;
        }
    }

    #[test]
    fn test_reveal_is_sticky() {
        let mut c = contact();
        c.reveal(2_000);
        c.reveal(3_000);
        assert_eq!(c.revealed_ms, Some(2_000));
    }

    #[test]
    fn test_expiry() {
        let mut c = contact();
        assert!(!c.is_expired(11_000));
        assert!(c.is_expired(11_001));

        c.reveal(2_000);
        assert!(!c.is_expired(4_000));
        assert!(c.is_expired(4_001));
        assert_eq!(c.distance, 5.0);
    }
}
