#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::commands::VehicleCommand;
    use crate::config::VehicleConfig;
    use crate::enums::*;
    use crate::events::SimEvent;
    use crate::state::SimSnapshot;
    use crate::types::{Aabb, EntityId, Position, SimTime};

    #[test]
    fn test_movement_mode_cycle() {
        let mut mode = MovementMode::default();
        assert_eq!(mode, MovementMode::Silent);
        mode = mode.next();
        assert_eq!(mode, MovementMode::Cruise);
        mode = mode.next();
        assert_eq!(mode, MovementMode::Flank);
        assert_eq!(mode.next(), MovementMode::Silent);
        assert!(MovementMode::Flank.max_speed() > MovementMode::Silent.max_speed());
        assert!(MovementMode::Flank.power_multiplier() > MovementMode::Cruise.power_multiplier());
    }

    #[test]
    fn test_targeting_mode_cycle_and_ordinals() {
        let mut mode = TargetingMode::default();
        for expected in [
            TargetingMode::Players,
            TargetingMode::Vehicles,
            TargetingMode::Other,
            TargetingMode::All,
        ] {
            mode = mode.next();
            assert_eq!(mode, expected);
            assert_eq!(TargetingMode::from_ordinal(mode.ordinal()), Some(mode));
        }
        assert_eq!(TargetingMode::from_ordinal(4), None);
        assert_eq!(MovementMode::from_ordinal(3), None);
    }

    #[test]
    fn test_command_serde_tagged() {
        let cmd = VehicleCommand::Fire {
            vehicle: EntityId(7),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"Fire\""));
        let back: VehicleCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
        assert_eq!(back.vehicle(), EntityId(7));
    }

    #[test]
    fn test_toggles_share_rate_limit_category() {
        let a = VehicleCommand::ToggleMovementMode {
            vehicle: EntityId(1),
        };
        let b = VehicleCommand::ToggleTargetingMode {
            vehicle: EntityId(1),
        };
        assert_eq!(a.category(), b.category());
        assert_eq!(a.category().cooldown_ms(), 200);
    }

    #[test]
    fn test_event_serde_tagged() {
        let ev = SimEvent::FireRejected {
            vehicle: EntityId(3),
            reason: FireRejection::NoOrdnance,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"type\":\"FireRejected\""));
        let back: SimEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ev);
    }

    #[test]
    fn test_partial_config_uses_preset_defaults() {
        let cfg: VehicleConfig = serde_json::from_str(r#"{"max_power": 250.0}"#).unwrap();
        assert_eq!(cfg.max_power, 250.0);
        assert_eq!(cfg.cooldown_ticks, 40);
        assert_eq!(cfg.projectile.max_turn_degrees, 5.0);
        assert_eq!(cfg.helm.backward_multiplier, 0.6);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        time.advance();
        time.advance();
        assert_eq!(time.tick, 2);
        assert_eq!(time.elapsed_ms, 100);
    }

    #[test]
    fn test_aabb_intersection_is_strict() {
        let a = Aabb::standing(DVec3::ZERO, 0.5, 0.5, 1.0);
        let touching = a.offset(DVec3::new(1.0, 0.0, 0.0));
        let overlapping = a.offset(DVec3::new(0.9, 0.0, 0.0));
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));

        let swept = a.stretch(DVec3::new(0.0, 0.0, -3.0));
        assert_eq!(swept.min.z, -3.5);
        assert_eq!(swept.max.z, 0.5);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = SimSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("vehicles"));
        assert_eq!(Position::new(0.0, 3.0, 4.0).distance_to(&Position::default()), 5.0);
    }
}
