//! Runtime action instances and the templates they come from.
//!
//! An [`Action`] is a mutable unit of queued behavior. It is created detached
//! (from an [`ActionPrototype`], from a raw type, or from a save record),
//! started the first time [`Action::init`] succeeds for an actor, and
//! finalized by the executor when its queue drops it.
mod prototype;

use std::collections::BTreeSet;
use std::sync::Arc;

pub use prototype::{ActionPrototype, ActionPrototypeBuilder, LocalizedText, SubAction};

use crate::env::{ScriptCall, ScriptHost};
use crate::flags::{ActionFlags, ActionType};
use crate::state::{ActorId, ObjectRef, Point3};

/// Outcome of [`Action::init`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum InitState {
    /// Already started; nothing to do.
    NotNeedInit = 0,
    /// Started now.
    InitDoneOk = 1,
    /// Not ready; try again next tick.
    InitNeedRecall = 2,
    InitFail = 3,
}

impl InitState {
    /// Maps a script return code; unknown codes are failures.
    pub fn from_code(code: i64) -> Self {
        u8::try_from(code)
            .ok()
            .and_then(Self::from_repr)
            .unwrap_or(Self::InitFail)
    }
}

/// One queued unit of behavior.
#[derive(Clone, Debug, Default)]
pub struct Action {
    pub target_points: Vec<Point3>,
    pub target_objects: BTreeSet<ActorId>,
    pub tool_objects: BTreeSet<ObjectRef>,
    pub timer: f32,
    pub mode: i32,
    /// Set by collaborators to release a `WAIT_FOR_READY_FLAG` action.
    pub ready: bool,
    /// Excluded from save files.
    pub do_not_save: bool,
    prototype: Option<Arc<ActionPrototype>>,
    script_name: String,
    action_type: ActionType,
    owner: Option<ActorId>,
}

impl Action {
    /// Instance of a prototype, taking over its type.
    pub fn from_prototype(prototype: Arc<ActionPrototype>) -> Self {
        Self {
            action_type: prototype.action_type(),
            prototype: Some(prototype),
            ..Self::default()
        }
    }

    /// Hidden action identified only by its type (and optionally a script).
    pub fn new(action_type: ActionType, timer: f32) -> Self {
        Self {
            action_type,
            timer,
            ..Self::default()
        }
    }

    pub fn with_script(mut self, name: impl Into<String>) -> Self {
        self.script_name = name.into();
        self
    }

    pub fn with_target_point(mut self, point: Point3) -> Self {
        self.target_points.push(point);
        self
    }

    pub fn with_target_object(mut self, target: ActorId) -> Self {
        self.target_objects.insert(target);
        self
    }

    pub fn with_tool(mut self, tool: impl Into<ObjectRef>) -> Self {
        self.tool_objects.insert(tool.into());
        self
    }

    pub fn with_mode(mut self, mode: i32) -> Self {
        self.mode = mode;
        self
    }

    pub fn without_saving(mut self) -> Self {
        self.do_not_save = true;
        self
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    pub fn set_action_type(&mut self, action_type: ActionType) {
        self.action_type = action_type;
    }

    pub fn has_flags(&self, flags: ActionFlags) -> bool {
        self.action_type.contains(flags)
    }

    pub fn prototype(&self) -> Option<&Arc<ActionPrototype>> {
        self.prototype.as_ref()
    }

    /// Prototype name for prototype-backed actions, the own script name otherwise.
    pub fn script_name(&self) -> &str {
        match &self.prototype {
            Some(proto) => proto.name(),
            None => &self.script_name,
        }
    }

    /// Own script name, even when a prototype is attached.
    pub fn raw_script_name(&self) -> &str {
        &self.script_name
    }

    /// Actor that started this action; `None` until [`init`](Self::init) succeeds.
    pub fn owner(&self) -> Option<ActorId> {
        self.owner
    }

    pub fn is_started(&self) -> bool {
        self.owner.is_some()
    }

    /// Forgets the starting actor so the next `init` runs the start script again.
    pub fn reset_owner(&mut self) {
        self.owner = None;
    }

    /// Starts the action for `actor`.
    ///
    /// Idempotent: once an owner is recorded every further call returns
    /// [`InitState::NotNeedInit`] without side effects. Otherwise the
    /// prototype's start script decides; a failing or missing script host is
    /// an [`InitState::InitFail`].
    pub fn init(&mut self, actor: ActorId, scripts: Option<&mut (dyn ScriptHost + '_)>) -> InitState {
        if self.owner.is_some() {
            return InitState::NotNeedInit;
        }
        let state = self.run_start_script(actor, scripts);
        if matches!(state, InitState::InitDoneOk | InitState::NotNeedInit) {
            self.owner = Some(actor);
        }
        state
    }

    fn run_start_script(
        &mut self,
        actor: ActorId,
        scripts: Option<&mut (dyn ScriptHost + '_)>,
    ) -> InitState {
        let Some(script) = self
            .prototype
            .as_ref()
            .and_then(|proto| proto.script_on_start())
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
        else {
            return InitState::InitDoneOk;
        };
        let Some(scripts) = scripts else {
            tracing::warn!(actor = %actor, script, "no script host for start script");
            return InitState::InitFail;
        };
        let call = ScriptCall {
            actor,
            action: self,
            elapsed: None,
        };
        match scripts.invoke(&script, call) {
            Ok(value) => match value.as_int() {
                Some(code) => InitState::from_code(code),
                None => InitState::InitDoneOk,
            },
            Err(err) => {
                tracing::warn!(actor = %actor, script, error = %err, "start script failed");
                InitState::InitFail
            }
        }
    }
}
