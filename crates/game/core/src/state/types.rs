use std::fmt;
use std::ops::{Add, Sub};

/// Handle of a live actor in the [`World`](super::World) registry.
///
/// Handles never own the actor; an actor may vanish while handles to it are
/// still stored in queued actions or ledgers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle of an actor prototype (a template an actor can be spawned from).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrototypeId(pub u32);

impl fmt::Display for PrototypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proto#{}", self.0)
    }
}

/// Something that can be held in a ledger or carried as a tool: either a
/// concrete actor or an actor prototype standing in for "one of those".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectRef {
    Actor(ActorId),
    Prototype(PrototypeId),
}

impl ObjectRef {
    pub const fn as_actor(self) -> Option<ActorId> {
        match self {
            Self::Actor(id) => Some(id),
            Self::Prototype(_) => None,
        }
    }
}

impl From<ActorId> for ObjectRef {
    fn from(id: ActorId) -> Self {
        Self::Actor(id)
    }
}

impl From<PrototypeId> for ObjectRef {
    fn from(id: PrototypeId) -> Self {
        Self::Prototype(id)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actor(id) => id.fmt(f),
            Self::Prototype(id) => id.fmt(f),
        }
    }
}

/// World-space point.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Moves at most `step` units from `self` towards `target`.
    pub fn towards(self, target: Self, step: f32) -> Self {
        let delta = target - self;
        let len = delta.length();
        if len <= step || len == 0.0 {
            return target;
        }
        let k = step / len;
        Self::new(self.x + delta.x * k, self.y + delta.y * k, self.z + delta.z * k)
    }
}

impl Add for Point3 {
    type Output = Point3;
    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;
    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn towards_stops_at_target() {
        let a = Point3::ZERO;
        let b = Point3::new(3.0, 0.0, 4.0);
        let mid = a.towards(b, 2.5);
        assert!((mid.distance(a) - 2.5).abs() < 1e-5);
        assert_eq!(a.towards(b, 10.0), b);
    }

    #[test]
    fn object_refs_order_actors_before_prototypes() {
        let mut refs = vec![
            ObjectRef::Prototype(PrototypeId(0)),
            ObjectRef::Actor(ActorId(9)),
            ObjectRef::Actor(ActorId(1)),
        ];
        refs.sort();
        assert_eq!(refs[0], ObjectRef::Actor(ActorId(1)));
        assert_eq!(refs[2], ObjectRef::Prototype(PrototypeId(0)));
    }
}
