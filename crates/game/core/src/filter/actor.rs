use std::collections::BTreeSet;

use super::{LogicFilter, PropertyFilter};
use crate::flags::{NeedMask, SelectionStatus};
use crate::state::{ComponentKind, ObjectRef, ObjectView};

/// Whether a component leaf needs all or any of its components.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RequiredMode {
    #[default]
    All,
    Any,
}

/// Leaf predicate of an actor filter tree.
#[derive(Clone, Debug)]
pub enum ActorLeaf {
    Property {
        filter: PropertyFilter,
        on_owned_object: bool,
    },
    Components {
        required: BTreeSet<ComponentKind>,
        mode: RequiredMode,
        on_owned_object: bool,
    },
}

impl ActorLeaf {
    fn on_owned_object(&self) -> bool {
        match self {
            Self::Property {
                on_owned_object, ..
            }
            | Self::Components {
                on_owned_object, ..
            } => *on_owned_object,
        }
    }

    /// With `on_owned_object` the leaf holds if any object in the subject's
    /// ledger satisfies it; a subject without a ledger fails.
    pub fn check<V: ObjectView + ?Sized>(&self, view: &V, subject: ObjectRef) -> bool {
        if !self.on_owned_object() {
            return self.check_direct(view, subject);
        }
        view.object_owner(subject)
            .is_some_and(|ledger| ledger.objects().any(|owned| self.check_direct(view, owned)))
    }

    fn check_direct<V: ObjectView + ?Sized>(&self, view: &V, subject: ObjectRef) -> bool {
        match self {
            Self::Property { filter, .. } => view
                .properties(subject)
                .is_some_and(|props| filter.check(props)),
            Self::Components { required, mode, .. } => {
                let mut present = required.iter().map(|kind| view.has_component(subject, *kind));
                match mode {
                    RequiredMode::All => present.all(|has| has),
                    RequiredMode::Any => present.any(|has| has),
                }
            }
        }
    }
}

/// Selection-status mask plus an optional logic tree over [`ActorLeaf`]s.
#[derive(Clone, Debug, Default)]
pub struct ActorFilter {
    pub selection_mask: SelectionStatus,
    pub selection_compare: SelectionStatus,
    pub logic: Option<LogicFilter<ActorLeaf>>,
}

impl ActorFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(mut self, mask: SelectionStatus, compare: SelectionStatus) -> Self {
        self.selection_mask = mask;
        self.selection_compare = compare;
        self
    }

    pub fn with_logic(mut self, logic: LogicFilter<ActorLeaf>) -> Self {
        self.logic = Some(logic);
        self
    }

    /// Target filter implied by an action's need mask.
    pub fn default_for_need(need: NeedMask) -> Self {
        let hidden = SelectionStatus::IS_HIDDEN | SelectionStatus::IS_UNAVAILABLE;
        if need.contains(NeedMask::SELECTABLE_ACTOR) {
            Self::new().with_selection(
                hidden | SelectionStatus::IS_SELECTABLE,
                SelectionStatus::IS_SELECTABLE,
            )
        } else if need.intersects(NeedMask::ACTOR) {
            Self::new().with_selection(
                hidden | SelectionStatus::IS_ACTION_TARGET,
                SelectionStatus::IS_ACTION_TARGET,
            )
        } else {
            Self::new()
        }
    }

    /// Overrides whichever parts an explicit filter definition provides.
    pub fn apply_override(
        &mut self,
        mask: Option<SelectionStatus>,
        compare: Option<SelectionStatus>,
        logic: Option<LogicFilter<ActorLeaf>>,
    ) {
        if let Some(mask) = mask {
            self.selection_mask = mask;
        }
        if let Some(compare) = compare {
            self.selection_compare = compare;
        }
        if logic.is_some() {
            self.logic = logic;
        }
    }

    /// Logic tree only; true when there is no tree.
    pub fn check<V: ObjectView + ?Sized>(&self, view: &V, subject: ObjectRef) -> bool {
        self.logic
            .as_ref()
            .is_none_or(|tree| tree.eval(&mut |leaf: &ActorLeaf| leaf.check(view, subject)))
    }

    /// Selection mask (failing closed for non-selectable subjects) and then
    /// the logic tree.
    pub fn full_check<V: ObjectView + ?Sized>(&self, view: &V, subject: ObjectRef) -> bool {
        if !self.selection_mask.is_empty() {
            let Some(status) = view.selection(subject) else {
                return false;
            };
            if status & self.selection_mask != self.selection_compare {
                return false;
            }
        }
        self.check(view, subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Comparison, ValueType};
    use crate::property::{PropertySet, PropertyValue};
    use crate::state::{ActorPrototype, ActorState, World};

    fn leaf_p_equals_5(on_owned_object: bool) -> LogicFilter<ActorLeaf> {
        LogicFilter::Leaf(ActorLeaf::Property {
            filter: PropertyFilter::new("P", ValueType::Int, Comparison::Equal, "5").unwrap(),
            on_owned_object,
        })
    }

    #[test]
    fn owned_object_leaf_is_existential() {
        let mut world = World::new();
        let gem = world.add_prototype(
            ActorPrototype::new("gem").with_properties(PropertySet::new().with("P", PropertyValue::Int(5))),
        );
        let holder = world.insert_actor(ActorState::new("holder").with_component(ComponentKind::ObjectOwner));
        let filter = ActorFilter::new().with_logic(leaf_p_equals_5(true));

        // no owned objects yet
        assert!(!filter.full_check(&world, ObjectRef::Actor(holder)));

        world
            .ledger_mut(ObjectRef::Actor(holder))
            .unwrap()
            .set(ObjectRef::Prototype(gem), 1, 1);
        assert!(filter.full_check(&world, ObjectRef::Actor(holder)));

        // the subject itself has no P, so the direct form fails
        let direct = ActorFilter::new().with_logic(leaf_p_equals_5(false));
        assert!(!direct.full_check(&world, ObjectRef::Actor(holder)));
    }

    #[test]
    fn owned_object_leaf_without_ledger_fails() {
        let mut world = World::new();
        let rock = world.insert_actor(ActorState::new("rock"));
        let filter = ActorFilter::new().with_logic(leaf_p_equals_5(true));
        assert!(!filter.check(&world, ObjectRef::Actor(rock)));
    }

    #[test]
    fn selection_mask_fails_closed() {
        let mut world = World::new();
        let plain = world.insert_actor(ActorState::new("plain"));
        let visible = world.insert_actor(ActorState::new("visible").with_component(ComponentKind::Selectable));
        let hidden = world.insert_actor(
            ActorState::new("hidden")
                .with_selection(SelectionStatus::IS_ACTION_TARGET | SelectionStatus::IS_HIDDEN),
        );

        let filter = ActorFilter::default_for_need(NeedMask::TARGET_ACTOR);
        assert!(!filter.full_check(&world, ObjectRef::Actor(plain)));
        assert!(filter.full_check(&world, ObjectRef::Actor(visible)));
        assert!(!filter.full_check(&world, ObjectRef::Actor(hidden)));
        // logic-only check ignores selection
        assert!(filter.check(&world, ObjectRef::Actor(plain)));
    }

    #[test]
    fn default_filter_prefers_selectable_need() {
        let selectable = ActorFilter::default_for_need(NeedMask::ACTOR);
        assert_eq!(selectable.selection_compare, SelectionStatus::IS_SELECTABLE);
        let target = ActorFilter::default_for_need(NeedMask::TARGET_ACTOR | NeedMask::POINT);
        assert_eq!(target.selection_compare, SelectionStatus::IS_ACTION_TARGET);
        assert!(ActorFilter::default_for_need(NeedMask::POINT).selection_mask.is_empty());
    }

    #[test]
    fn component_leaf_modes() {
        let mut world = World::new();
        let id = world.insert_actor(
            ActorState::new("walker")
                .with_component(ComponentKind::World3D)
                .with_component(ComponentKind::ActionQueue),
        );
        let subject = ObjectRef::Actor(id);
        let leaf = |kinds: &[ComponentKind], mode| ActorLeaf::Components {
            required: kinds.iter().copied().collect(),
            mode,
            on_owned_object: false,
        };

        let both = [ComponentKind::World3D, ComponentKind::Movable];
        assert!(!leaf(&both, RequiredMode::All).check(&world, subject));
        assert!(leaf(&both, RequiredMode::Any).check(&world, subject));
        assert!(leaf(&[], RequiredMode::All).check(&world, subject));
        assert!(!leaf(&[], RequiredMode::Any).check(&world, subject));
    }
}
