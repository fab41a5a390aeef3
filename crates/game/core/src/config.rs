/// Names the executor uses when talking to collaborators and reading actor
/// properties.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExecutorConfig {
    pub idle_animation: String,
    pub move_animation: String,
    /// Point property added to an actor's position when it drops tools.
    pub exit_offset_property: String,
    /// String-list property naming the actions an actor may emit.
    pub possible_actions_property: String,
    /// Bool property on a tool that rebuilds its new holder.
    pub recreate_flag_property: String,
    /// Text property on a tool naming the prototype the holder is rebuilt from.
    pub recreate_prototype_property: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            idle_animation: "idle".into(),
            move_animation: "move".into(),
            exit_offset_property: "ExitPointOffset".into(),
            possible_actions_property: "PossibleActions".into(),
            recreate_flag_property: "needRecreateActor".into(),
            recreate_prototype_property: "newPrototypeName".into(),
        }
    }
}

/// Engine-wide settings loaded by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Language used for menu text lookups.
    pub language: String,
    /// Capacity of each event broadcast channel.
    pub event_capacity: usize,
    pub executor: ExecutorConfig,
}

impl EngineConfig {
    pub const DEFAULT_EVENT_CAPACITY: usize = 256;
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: "en".into(),
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
            executor: ExecutorConfig::default(),
        }
    }
}
