use super::{ComponentKind, ObjectRef};
use crate::flags::SelectionStatus;
use crate::ledger::ObjectOwner;
use crate::property::PropertySet;

/// Read-only access to whatever an [`ObjectRef`] points at.
///
/// Filters and prototypes evaluate against this trait so they work on live
/// actors and on actor prototypes alike.
pub trait ObjectView {
    fn properties(&self, object: ObjectRef) -> Option<&PropertySet>;

    fn has_component(&self, object: ObjectRef, kind: ComponentKind) -> bool;

    /// `None` when the object is not selectable at all.
    fn selection(&self, object: ObjectRef) -> Option<SelectionStatus>;

    fn object_owner(&self, object: ObjectRef) -> Option<&ObjectOwner>;
}
