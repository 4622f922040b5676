//! Power plant: drain under way, refuel from cargo, discrete charges.

use abyss_core::components::PowerCell;
use abyss_core::inventory::{Inventory, ItemStack};

pub fn has_power(cell: &PowerCell) -> bool {
    cell.current > 0.0
}

/// Drain one tick of movement cost while active.
pub fn consume(cell: &mut PowerCell, active: bool, rate: f64, mode_multiplier: f64) {
    if active {
        cell.current = (cell.current - rate * mode_multiplier).max(0.0);
    }
}

/// Atomic check-and-subtract for discrete costs. No mutation on failure.
pub fn consume_amount(cell: &mut PowerCell, amount: f64) -> bool {
    if cell.current >= amount {
        cell.current -= amount;
        true
    } else {
        false
    }
}

/// Return previously reserved charge.
pub fn refund(cell: &mut PowerCell, amount: f64) {
    cell.current = (cell.current + amount).min(cell.max);
}

/// Burn at most one unit of fuel from cargo.
///
/// Slots are scanned in order. A fuel is burned if its yield fits in the
/// missing charge, or if power has fallen to its usage threshold. Returns
/// whether anything was burned.
pub fn try_consume_fuel(cell: &mut PowerCell, cargo: &mut Inventory) -> bool {
    if cell.current >= cell.max {
        return false;
    }
    let need = cell.max - cell.current;

    let candidate = cargo.iter().find_map(|(slot, stack)| {
        let grade = stack.kind.fuel_grade()?;
        let fits = grade.yield_power - need <= 0.0;
        (fits || cell.current <= grade.usage_threshold).then_some((slot, stack, grade))
    });
    let Some((slot, stack, grade)) = candidate else {
        return false;
    };

    cell.current = (cell.current + grade.yield_power).min(cell.max);

    match stack.kind.residue() {
        Some(residue) if stack.count == 1 => {
            cargo.set(slot, Some(ItemStack::new(residue, 1)));
        }
        Some(residue) => {
            cargo.decrement(slot, 1);
            // No room: the container is lost.
            let _ = cargo.insert(ItemStack::new(residue, 1));
        }
        None => cargo.decrement(slot, 1),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use abyss_core::inventory::ItemKind;

    fn cell(current: f64) -> PowerCell {
        PowerCell {
            current,
            max: 100.0,
        }
    }

    fn cargo_with(stacks: &[(usize, ItemKind, u32)]) -> Inventory {
        let mut inv = Inventory::default();
        for &(slot, kind, count) in stacks {
            inv.set(slot, Some(ItemStack::new(kind, count)));
        }
        inv
    }

    #[test]
    fn test_consume_floors_at_zero() {
        let mut c = cell(0.02);
        consume(&mut c, true, 0.01, 2.5);
        assert_eq!(c.current, 0.0);
        consume(&mut c, true, 0.01, 2.5);
        assert_eq!(c.current, 0.0);

        let mut idle = cell(50.0);
        consume(&mut idle, false, 0.01, 2.5);
        assert_eq!(idle.current, 50.0);
    }

    #[test]
    fn test_consume_amount_is_atomic() {
        let mut c = cell(1.5);
        assert!(!consume_amount(&mut c, 2.0));
        assert_eq!(c.current, 1.5);
        assert!(consume_amount(&mut c, 1.5));
        assert_eq!(c.current, 0.0);
    }

    #[test]
    fn test_full_cell_burns_nothing() {
        let mut c = cell(100.0);
        let mut cargo = cargo_with(&[(0, ItemKind::Coal, 4)]);
        assert!(!try_consume_fuel(&mut c, &mut cargo));
        assert_eq!(cargo.get(0).unwrap().count, 4);
    }

    #[test]
    fn test_rich_fuel_held_in_reserve() {
        // 60 power: coal block (30/70) would overflow but 60 <= 70, so it burns.
        let mut c = cell(60.0);
        let mut cargo = cargo_with(&[(0, ItemKind::LavaBucket, 1), (1, ItemKind::CoalBlock, 2)]);
        assert!(try_consume_fuel(&mut c, &mut cargo));
        assert_eq!(c.current, 90.0);
        assert_eq!(cargo.get(0).unwrap().kind, ItemKind::LavaBucket);
        assert_eq!(cargo.get(1).unwrap().count, 1);

        // 90 power: coal block would waste 20 and 90 > 70. Lava would waste too. Nothing burns.
        assert!(!try_consume_fuel(&mut c, &mut cargo));
        assert_eq!(c.current, 90.0);
    }

    #[test]
    fn test_never_overfills() {
        let mut c = cell(45.0);
        let mut cargo = cargo_with(&[(0, ItemKind::LavaBucket, 1)]);
        assert!(try_consume_fuel(&mut c, &mut cargo));
        assert_eq!(c.current, 95.0);

        let mut low = cell(20.0);
        let mut cargo = cargo_with(&[(0, ItemKind::LavaBucket, 1)]);
        assert!(try_consume_fuel(&mut low, &mut cargo));
        assert_eq!(low.current, 70.0);

        let mut c = cell(96.0);
        let mut cargo = cargo_with(&[(0, ItemKind::Coal, 1)]);
        assert!(try_consume_fuel(&mut c, &mut cargo));
        assert_eq!(c.current, 99.0);
        assert!(c.current <= c.max);
    }

    #[test]
    fn test_lava_bucket_leaves_bucket_in_place() {
        let mut c = cell(10.0);
        let mut cargo = cargo_with(&[(4, ItemKind::LavaBucket, 1)]);
        assert!(try_consume_fuel(&mut c, &mut cargo));
        assert_eq!(cargo.get(4), Some(ItemStack::new(ItemKind::Bucket, 1)));
    }

    #[test]
    fn test_one_unit_per_call_in_slot_order() {
        let mut c = cell(5.0);
        let mut cargo = cargo_with(&[(2, ItemKind::Stick, 3), (7, ItemKind::Coal, 3)]);
        assert!(try_consume_fuel(&mut c, &mut cargo));
        assert_eq!(c.current, 5.5);
        assert_eq!(cargo.get(2).unwrap().count, 2);
        assert_eq!(cargo.get(7).unwrap().count, 3);
    }

    #[test]
    fn test_ordnance_is_not_fuel() {
        let mut c = cell(1.0);
        let mut cargo = cargo_with(&[(0, ItemKind::Torpedo, 4)]);
        assert!(!try_consume_fuel(&mut c, &mut cargo));
        assert_eq!(cargo.get(0).unwrap().count, 4);
    }

    #[test]
    fn test_refund_caps_at_max() {
        let mut c = cell(99.0);
        refund(&mut c, 2.0);
        assert_eq!(c.current, 100.0);
    }
}
