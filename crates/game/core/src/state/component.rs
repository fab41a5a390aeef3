use std::str::FromStr;

/// Capabilities an actor can carry.
///
/// `Selectable`, `ObjectOwner` and `ActionQueue` are backed by data on
/// [`ActorState`](super::ActorState); the rest are plain markers.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum ComponentKind {
    World3D = 1,
    Selectable = 2,
    ObjectOwner = 3,
    ActionQueue = 4,
    Movable = 5,
    Animated = 6,
    Trigger = 7,
}

impl ComponentKind {
    /// Resolves a component by name or by numeric id.
    pub fn parse(token: &str) -> Option<Self> {
        Self::from_str(token)
            .ok()
            .or_else(|| token.parse::<u16>().ok().and_then(Self::from_repr))
    }
}
