//! Per-actor ownership ledger.
//!
//! Each entry tracks two quantities of one held object: `current` (what is
//! held now) and `planned` (what will be held once every queued action in the
//! system has run). Entries whose quantities are both non-positive are removed
//! rather than kept at zero.
use std::collections::BTreeMap;

use crate::state::ObjectRef;

/// Current and planned quantity of one owned object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Holding {
    pub current: i32,
    pub planned: i32,
}

impl Holding {
    pub const fn new(current: i32, planned: i32) -> Self {
        Self { current, planned }
    }

    const fn is_depleted(&self) -> bool {
        self.current <= 0 && self.planned <= 0
    }
}

/// Ledger of objects held by one actor or prototype.
///
/// Not synchronized: it is only mutated from the single-threaded executor
/// pass or by the host between ticks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectOwner {
    owned: BTreeMap<ObjectRef, Holding>,
    revision: u64,
}

impl ObjectOwner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces both quantities; removes the entry when both are `<= 0`.
    pub fn set(&mut self, object: ObjectRef, current: i32, planned: i32) {
        let holding = Holding::new(current, planned);
        if holding.is_depleted() {
            self.owned.remove(&object);
        } else {
            self.owned.insert(object, holding);
        }
        self.touch();
    }

    /// Adds signed deltas to an entry, creating it if the result is positive.
    ///
    /// Updating an absent entry with deltas that are both `<= 0` is a no-op
    /// (logged): there is nothing to take away.
    pub fn update(&mut self, object: ObjectRef, delta_current: i32, delta_planned: i32) {
        if let Some(holding) = self.owned.get_mut(&object) {
            holding.current += delta_current;
            holding.planned += delta_planned;
            if holding.is_depleted() {
                self.owned.remove(&object);
            }
            self.touch();
        } else if delta_current > 0 || delta_planned > 0 {
            self.set(object, delta_current, delta_planned);
        } else {
            tracing::warn!(
                object = %object,
                delta_current,
                delta_planned,
                "update of an object that is not owned"
            );
        }
    }

    /// Drops every outstanding reservation: `planned = current` for all entries.
    pub fn reset_planned(&mut self) {
        for holding in self.owned.values_mut() {
            holding.planned = holding.current;
        }
        self.owned.retain(|_, holding| !holding.is_depleted());
        self.touch();
    }

    pub fn get(&self, object: ObjectRef) -> Option<Holding> {
        self.owned.get(&object).copied()
    }

    pub fn current(&self, object: ObjectRef) -> i32 {
        self.get(object).map_or(0, |h| h.current)
    }

    pub fn planned(&self, object: ObjectRef) -> i32 {
        self.get(object).map_or(0, |h| h.planned)
    }

    pub fn contains(&self, object: ObjectRef) -> bool {
        self.owned.contains_key(&object)
    }

    /// Entries in object order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectRef, Holding)> + '_ {
        self.owned.iter().map(|(object, holding)| (*object, *holding))
    }

    pub fn objects(&self) -> impl Iterator<Item = ObjectRef> + '_ {
        self.owned.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    /// Monotonic modification stamp, bumped by every mutating call.
    pub fn last_update(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

/// Reserves a future transfer of `quantity` units of `object` from one ledger
/// to another by moving only the planned quantities.
pub fn reserve_transfer(
    from: &mut ObjectOwner,
    to: &mut ObjectOwner,
    object: ObjectRef,
    quantity: i32,
) {
    from.update(object, 0, -quantity);
    to.update(object, 0, quantity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ActorId, PrototypeId};

    const SWORD: ObjectRef = ObjectRef::Prototype(PrototypeId(1));
    const BOX: ObjectRef = ObjectRef::Actor(ActorId(7));

    #[test]
    fn depleted_entries_are_removed() {
        let mut ledger = ObjectOwner::new();
        ledger.set(SWORD, 2, 2);
        ledger.update(SWORD, -1, -1);
        assert_eq!(ledger.get(SWORD), Some(Holding::new(1, 1)));
        ledger.update(SWORD, -1, -1);
        assert_eq!(ledger.get(SWORD), None);

        ledger.set(BOX, 0, 0);
        assert!(!ledger.contains(BOX));
        ledger.set(BOX, 1, 0);
        ledger.update(BOX, -3, -1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn mixed_sign_entries_are_kept() {
        let mut ledger = ObjectOwner::new();
        ledger.set(SWORD, 1, 1);
        ledger.update(SWORD, 0, -2);
        assert_eq!(ledger.get(SWORD), Some(Holding::new(1, -1)));
    }

    #[test]
    fn no_entry_is_ever_left_non_positive() {
        let ops: &[(i32, i32)] = &[(1, 0), (-1, 0), (0, 2), (2, -2), (-5, -5), (3, 3), (-3, -1)];
        let mut ledger = ObjectOwner::new();
        for &(c, p) in ops {
            ledger.update(SWORD, c, p);
            for (_, holding) in ledger.iter() {
                assert!(holding.current > 0 || holding.planned > 0);
            }
        }
    }

    #[test]
    fn update_of_missing_entry_with_non_positive_deltas_is_ignored() {
        let mut ledger = ObjectOwner::new();
        let before = ledger.last_update();
        ledger.update(SWORD, -1, 0);
        assert!(ledger.is_empty());
        assert_eq!(ledger.last_update(), before);

        ledger.update(SWORD, 0, 1);
        assert_eq!(ledger.get(SWORD), Some(Holding::new(0, 1)));
        assert!(ledger.last_update() > before);
    }

    #[test]
    fn reset_planned_cancels_reservations() {
        let mut ledger = ObjectOwner::new();
        ledger.set(SWORD, 2, 0);
        ledger.set(BOX, 0, 1);
        ledger.reset_planned();
        assert_eq!(ledger.get(SWORD), Some(Holding::new(2, 2)));
        assert_eq!(ledger.get(BOX), None);
    }

    #[test]
    fn reserve_transfer_moves_planned_only() {
        let mut chest = ObjectOwner::new();
        let mut hero = ObjectOwner::new();
        chest.set(SWORD, 1, 1);
        reserve_transfer(&mut chest, &mut hero, SWORD, 1);
        assert_eq!(chest.get(SWORD), Some(Holding::new(1, 0)));
        assert_eq!(hero.get(SWORD), Some(Holding::new(0, 1)));
    }
}
