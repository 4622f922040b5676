//! Cargo inventory: a fixed array of stackable item slots, plus the fuel table.

use serde::{Deserialize, Serialize};

use crate::constants::INVENTORY_SLOTS;

/// Item types the simulation cares about. Anything else is `Misc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Torpedo,
    LavaBucket,
    /// Empty container left behind by a burned lava bucket.
    Bucket,
    CoalBlock,
    DriedKelpBlock,
    BlazeRod,
    Coal,
    Charcoal,
    Log,
    Planks,
    Stick,
    Bamboo,
    Misc(u16),
}

/// Power yield of one unit of fuel, and the power level at or below which it may be burned
/// even if part of the yield is wasted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelGrade {
    pub yield_power: f64,
    pub usage_threshold: f64,
}

impl ItemKind {
    pub fn max_stack(self) -> u32 {
        match self {
            ItemKind::LavaBucket => 1,
            ItemKind::Bucket | ItemKind::Torpedo => 16,
            _ => 64,
        }
    }

    /// Whether this item is launchable ordnance.
    pub fn is_ordnance(self) -> bool {
        matches!(self, ItemKind::Torpedo)
    }

    /// Fuel table. Hand-tuned: richer fuels are held back until power is low.
    pub fn fuel_grade(self) -> Option<FuelGrade> {
        let (yield_power, usage_threshold) = match self {
            ItemKind::LavaBucket => (50.0, 50.0),
            ItemKind::CoalBlock => (30.0, 70.0),
            ItemKind::DriedKelpBlock => (10.0, 90.0),
            ItemKind::BlazeRod => (5.0, 95.0),
            ItemKind::Coal | ItemKind::Charcoal => (3.0, 97.0),
            ItemKind::Log => (1.5, 100.0),
            ItemKind::Planks | ItemKind::Bamboo => (1.0, 100.0),
            ItemKind::Stick => (0.5, 100.0),
            _ => return None,
        };
        Some(FuelGrade {
            yield_power,
            usage_threshold,
        })
    }

    /// Container left behind after burning one unit, if any.
    pub fn residue(self) -> Option<ItemKind> {
        match self {
            ItemKind::LavaBucket => Some(ItemKind::Bucket),
            _ => None,
        }
    }
}

/// A stack of identical items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub count: u32,
}

impl ItemStack {
    pub fn new(kind: ItemKind, count: u32) -> Self {
        Self { kind, count }
    }
}

/// Fixed-size ordered slot array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_slots(INVENTORY_SLOTS)
    }
}

impl Inventory {
    pub fn with_slots(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn get(&self, slot: usize) -> Option<ItemStack> {
        self.slots.get(slot).copied().flatten()
    }

    /// Replace a slot. Counts are clamped to the stack limit; a zero count clears the slot.
    /// Returns false if the slot index is out of range.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        let Some(entry) = self.slots.get_mut(slot) else {
            return false;
        };
        *entry = stack
            .filter(|s| s.count > 0)
            .map(|s| ItemStack::new(s.kind, s.count.min(s.kind.max_stack())));
        true
    }

    /// Remove `n` items from a slot, clearing it when it empties.
    pub fn decrement(&mut self, slot: usize, n: u32) {
        if let Some(entry) = self.slots.get_mut(slot) {
            if let Some(stack) = entry {
                stack.count = stack.count.saturating_sub(n);
                if stack.count == 0 {
                    *entry = None;
                }
            }
        }
    }

    /// Insert a stack, merging into compatible slots first, then the first empty slot.
    /// Returns whatever did not fit.
    pub fn insert(&mut self, stack: ItemStack) -> Option<ItemStack> {
        let limit = stack.kind.max_stack();
        let mut remaining = stack.count;

        for existing in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if existing.kind == stack.kind && existing.count < limit {
                let moved = remaining.min(limit - existing.count);
                existing.count += moved;
                remaining -= moved;
            }
        }

        for entry in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if entry.is_none() {
                let moved = remaining.min(limit);
                *entry = Some(ItemStack::new(stack.kind, moved));
                remaining -= moved;
            }
        }

        (remaining > 0).then(|| ItemStack::new(stack.kind, remaining))
    }

    /// Total item count across slots whose kind matches `pred`.
    pub fn count_where(&self, pred: impl Fn(ItemKind) -> bool) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| pred(s.kind))
            .map(|s| s.count)
            .sum()
    }

    /// Occupied slots with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, ItemStack)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|s| (i, s)))
    }
}
