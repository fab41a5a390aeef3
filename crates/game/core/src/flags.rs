//! Action type, need mask and selection status vocabularies.
//!
//! An action type is a closed [`ActionKind`] plus an independent set of
//! [`ActionFlags`]. Both pack into one `u32` (kind in the low 16 bits) for
//! catalogues and save files. Textual forms are whitespace-separated token
//! lists where each token is a flag name or a raw integer; tokens are
//! OR-reduced.
use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::{EngineError, ErrorSeverity};

/// Low bits of a packed action type selecting the [`ActionKind`].
pub const ENUMERATIVE_MASK: u32 = 0xFFFF;

/// Primary behavior of an action. At most one per action.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u16)]
pub enum ActionKind {
    #[default]
    Empty = 0,
    RunScript = 1,
    Move = 2,
    StartMove = 3,
    Exit = 4,
    Enter = 5,
    SelectTool = 6,
    GetTools = 7,
    PutTools = 8,
}

impl ActionKind {
    /// Kinds that hand control to the movement collaborator.
    pub const fn is_movement(self) -> bool {
        matches!(self, Self::Move | Self::StartMove)
    }
}

bitflags! {
    /// Scheduling modifiers, independent of the [`ActionKind`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ActionFlags: u32 {
        const WAIT_FOR_READY_FLAG  = 1 << 21;
        const WAIT_FOR_TIMEOUT     = 1 << 22;
        const WAIT_FOR_NEXT_ACTION = 1 << 23;
        const MOVING               = 1 << 24;
        const ADD_AT_FRONT         = 1 << 30;
        const RUN_ON_PAUSE         = 1 << 31;
    }
}

bitflags! {
    /// What kind of target an action asks the user for.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NeedMask: u32 {
        const POINT            = 1;
        const AREA             = 1 << 1;
        const POLYGONAL_CHAIN  = 1 << 2;
        const TARGET_ACTOR     = 1 << 3;
        const SELECTABLE_ACTOR = 1 << 5;
        const ACTOR = Self::TARGET_ACTOR.bits() | Self::SELECTABLE_ACTOR.bits();
    }
}

bitflags! {
    /// Selectability state of an actor, matched by [`ActorFilter`](crate::filter::ActorFilter).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SelectionStatus: u8 {
        const IS_SELECTABLE    = 1;
        const IS_ACTION_TARGET = 1 << 1;
        const IS_HIDDEN        = 1 << 2;
        const IS_UNAVAILABLE   = 1 << 3;
    }
}

/// Errors raised while reading flag lists.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FlagParseError {
    #[error("unknown flag token '{0}'")]
    UnknownToken(String),

    #[error("action type names two kinds: {first} and {second}")]
    DuplicateKind { first: ActionKind, second: ActionKind },

    #[error("value {0:#x} does not name an action kind")]
    UnknownKind(u32),
}

impl EngineError for FlagParseError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownToken(_) => "FLAG_UNKNOWN_TOKEN",
            Self::DuplicateKind { .. } => "FLAG_DUPLICATE_KIND",
            Self::UnknownKind(_) => "FLAG_UNKNOWN_KIND",
        }
    }
}

fn parse_number(token: &str) -> Option<u32> {
    match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => token.parse().ok(),
    }
}

/// OR-reduces a whitespace-separated list of names (resolved by `lookup`) and
/// raw integers.
pub fn parse_flag_list(
    text: &str,
    lookup: impl Fn(&str) -> Option<u32>,
) -> Result<u32, FlagParseError> {
    text.split_whitespace().try_fold(0u32, |acc, token| {
        lookup(token)
            .or_else(|| parse_number(token))
            .map(|bits| acc | bits)
            .ok_or_else(|| FlagParseError::UnknownToken(token.to_owned()))
    })
}

impl FromStr for NeedMask {
    type Err = FlagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = parse_flag_list(s, |token| {
            let token = token.strip_prefix("NEED_").unwrap_or(token);
            if token == "NONE" {
                return Some(0);
            }
            NeedMask::from_name(token).map(|flag| flag.bits())
        })?;
        Ok(NeedMask::from_bits_retain(bits))
    }
}

impl FromStr for SelectionStatus {
    type Err = FlagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = parse_flag_list(s, |token| {
            SelectionStatus::from_name(token).map(|flag| u32::from(flag.bits()))
        })?;
        let bits = u8::try_from(bits).map_err(|_| FlagParseError::UnknownToken(s.to_owned()))?;
        Ok(SelectionStatus::from_bits_retain(bits))
    }
}

/// Full type of an action: one kind plus modifier flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ActionType {
    pub kind: ActionKind,
    pub flags: ActionFlags,
}

impl ActionType {
    pub const fn new(kind: ActionKind, flags: ActionFlags) -> Self {
        Self { kind, flags }
    }

    pub const fn of_kind(kind: ActionKind) -> Self {
        Self::new(kind, ActionFlags::empty())
    }

    pub const fn with_flags(flags: ActionFlags) -> Self {
        Self::new(ActionKind::Empty, flags)
    }

    /// The pure "in motion" type an action takes after START_MOVE succeeds.
    pub const fn moving() -> Self {
        Self::with_flags(ActionFlags::MOVING)
    }

    pub fn contains(&self, flags: ActionFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Packs kind and flags into the on-disk integer form.
    pub fn bits(&self) -> u32 {
        self.kind as u32 | self.flags.bits()
    }

    /// Unpacks the on-disk integer form.
    pub fn from_bits(bits: u32) -> Result<Self, FlagParseError> {
        let raw_kind = bits & ENUMERATIVE_MASK;
        let kind = u16::try_from(raw_kind)
            .ok()
            .and_then(ActionKind::from_repr)
            .ok_or(FlagParseError::UnknownKind(raw_kind))?;
        Ok(Self {
            kind,
            flags: ActionFlags::from_bits_retain(bits & !ENUMERATIVE_MASK),
        })
    }
}

impl FromStr for ActionType {
    type Err = FlagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut kind: Option<ActionKind> = None;
        let mut other = String::new();
        for token in s.split_whitespace() {
            match token.parse::<ActionKind>() {
                Ok(parsed) => {
                    if let Some(first) = kind {
                        return Err(FlagParseError::DuplicateKind {
                            first,
                            second: parsed,
                        });
                    }
                    kind = Some(parsed);
                }
                Err(_) => {
                    other.push_str(token);
                    other.push(' ');
                }
            }
        }
        let bits = parse_flag_list(&other, |token| {
            ActionFlags::from_name(token).map(|flag| flag.bits())
        })?;
        let kind_bits = kind.map_or(0, |kind| kind as u32);
        ActionType::from_bits(bits | kind_bits)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        if self.kind != ActionKind::Empty || self.flags.is_empty() {
            write!(f, "{}", self.kind)?;
            first = false;
        }
        for (name, _) in self.flags.iter_names() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kind_and_modifiers() {
        let parsed: ActionType = "RUN_SCRIPT WAIT_FOR_TIMEOUT RUN_ON_PAUSE".parse().unwrap();
        assert_eq!(parsed.kind, ActionKind::RunScript);
        assert_eq!(
            parsed.flags,
            ActionFlags::WAIT_FOR_TIMEOUT | ActionFlags::RUN_ON_PAUSE
        );
        assert_eq!(parsed.bits(), 1 | (1 << 22) | (1 << 31));
    }

    #[test]
    fn numeric_tokens_are_or_reduced() {
        let parsed: ActionType = "7 1073741824".parse().unwrap();
        assert_eq!(parsed.kind, ActionKind::GetTools);
        assert!(parsed.contains(ActionFlags::ADD_AT_FRONT));

        let hex: ActionType = "0x2 WAIT_FOR_NEXT_ACTION".parse().unwrap();
        assert_eq!(hex.kind, ActionKind::Move);
    }

    #[test]
    fn rejects_unknown_tokens_and_two_kinds() {
        assert_eq!(
            "RUN_SCRIPT BOGUS".parse::<ActionType>(),
            Err(FlagParseError::UnknownToken("BOGUS".into()))
        );
        assert!(matches!(
            "MOVE EXIT".parse::<ActionType>(),
            Err(FlagParseError::DuplicateKind { .. })
        ));
        assert_eq!(
            ActionType::from_bits(0x42),
            Err(FlagParseError::UnknownKind(0x42))
        );
    }

    #[test]
    fn bits_round_trip_through_packed_form() {
        let ty = ActionType::new(ActionKind::StartMove, ActionFlags::WAIT_FOR_READY_FLAG);
        assert_eq!(ActionType::from_bits(ty.bits()).unwrap(), ty);
        assert_eq!(ActionType::moving().bits(), 1 << 24);
    }

    #[test]
    fn need_mask_accepts_prefixed_and_bare_tokens() {
        let need: NeedMask = "NEED_POINT SELECTABLE_ACTOR".parse().unwrap();
        assert_eq!(need, NeedMask::POINT | NeedMask::SELECTABLE_ACTOR);
        assert!("NEED_ACTOR".parse::<NeedMask>().unwrap().contains(NeedMask::ACTOR));
        assert!("NONE".parse::<NeedMask>().unwrap().is_empty());
    }

    #[test]
    fn display_lists_kind_then_flags() {
        let ty = ActionType::new(ActionKind::Exit, ActionFlags::ADD_AT_FRONT);
        assert_eq!(ty.to_string(), "EXIT ADD_AT_FRONT");
        assert_eq!(ActionType::moving().to_string(), "MOVING");
        assert_eq!(ActionType::default().to_string(), "EMPTY");
    }
}
