//! Per-actor FIFO of actions.
//!
//! Every mutation goes through the [`ActionExecutor`] so the active set stays
//! in step with the queue contents: a queue is active iff it is non-empty.
use std::collections::VecDeque;

use crate::action::Action;
use crate::events::ActionEvent;
use crate::executor::ActionExecutor;
use crate::flags::ActionFlags;
use crate::state::ActorId;

#[derive(Clone, Debug, Default)]
pub struct ActionQueue {
    owner: ActorId,
    actions: VecDeque<Action>,
    revision: u64,
}

impl ActionQueue {
    pub fn new(owner: ActorId) -> Self {
        Self {
            owner,
            ..Self::default()
        }
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: ActorId) {
        self.owner = owner;
    }

    /// Action currently executing.
    pub fn front(&self) -> Option<&Action> {
        self.actions.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut Action> {
        self.actions.front_mut()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Monotonic modification stamp.
    pub fn last_update(&self) -> u64 {
        self.revision
    }

    pub fn add_action_at_front(&mut self, action: Action, executor: &mut ActionExecutor) {
        self.actions.push_front(action);
        executor.activate(self.owner);
        self.touch(executor);
    }

    /// Appends, unless the action carries `ADD_AT_FRONT`.
    pub fn add_action_at_end(&mut self, action: Action, executor: &mut ActionExecutor) {
        if action.has_flags(ActionFlags::ADD_AT_FRONT) {
            return self.add_action_at_front(action, executor);
        }
        self.actions.push_back(action);
        executor.activate(self.owner);
        self.touch(executor);
    }

    /// Drops the front action (its finalizer runs later in the tick).
    pub fn finish_action(&mut self, executor: &mut ActionExecutor) {
        if let Some(action) = self.actions.pop_front() {
            executor.retire(action);
        }
        if self.actions.is_empty() {
            executor.deactivate(self.owner);
        }
        self.touch(executor);
    }

    /// Drops every action; finalizers of started ones run later in the tick.
    ///
    /// Ledger reservations made for these actions are left untouched.
    pub fn clear(&mut self, executor: &mut ActionExecutor) {
        for action in self.actions.drain(..) {
            executor.retire(action);
        }
        executor.deactivate(self.owner);
        self.touch(executor);
    }

    /// Empties the queue and hands the actions back without finalizing them.
    pub fn take_all(&mut self, executor: &mut ActionExecutor) -> Vec<Action> {
        let actions = self.actions.drain(..).collect();
        executor.deactivate(self.owner);
        self.touch(executor);
        actions
    }

    /// Appends actions read from a save. No update notification is sent.
    pub fn restore(&mut self, actions: impl IntoIterator<Item = Action>, executor: &mut ActionExecutor) {
        self.actions.extend(actions);
        if !self.actions.is_empty() {
            executor.activate(self.owner);
        }
        self.revision += 1;
    }

    /// Releases a front action waiting for the ready flag.
    pub fn mark_front_ready(&mut self) -> bool {
        match self.actions.front_mut() {
            Some(action) if action.has_flags(ActionFlags::WAIT_FOR_READY_FLAG) => {
                action.ready = true;
                true
            }
            _ => false,
        }
    }

    fn touch(&mut self, executor: &mut ActionExecutor) {
        self.revision += 1;
        executor.notify(ActionEvent::QueueUpdated { actor: self.owner });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutorConfig;
    use crate::flags::{ActionKind, ActionType};

    fn tagged(mode: i32, flags: ActionFlags) -> Action {
        Action::new(ActionType::new(ActionKind::RunScript, flags), 0.0).with_mode(mode)
    }

    fn modes(queue: &ActionQueue) -> Vec<i32> {
        queue.iter().map(|a| a.mode).collect()
    }

    fn assert_active_iff_non_empty(queue: &ActionQueue, executor: &ActionExecutor) {
        assert_eq!(executor.is_active(queue.owner()), !queue.is_empty());
    }

    #[test]
    fn active_set_tracks_emptiness() {
        let mut executor = ActionExecutor::new(ExecutorConfig::default());
        let mut queue = ActionQueue::new(ActorId(4));
        assert_active_iff_non_empty(&queue, &executor);

        queue.add_action_at_end(tagged(1, ActionFlags::empty()), &mut executor);
        assert_active_iff_non_empty(&queue, &executor);
        queue.add_action_at_front(tagged(0, ActionFlags::empty()), &mut executor);
        assert_active_iff_non_empty(&queue, &executor);

        queue.finish_action(&mut executor);
        assert_active_iff_non_empty(&queue, &executor);
        queue.finish_action(&mut executor);
        assert_active_iff_non_empty(&queue, &executor);

        queue.add_action_at_end(tagged(2, ActionFlags::empty()), &mut executor);
        queue.clear(&mut executor);
        assert_active_iff_non_empty(&queue, &executor);

        queue.add_action_at_end(tagged(3, ActionFlags::empty()), &mut executor);
        assert_eq!(queue.take_all(&mut executor).len(), 1);
        assert_active_iff_non_empty(&queue, &executor);
    }

    #[test]
    fn add_at_front_flag_redirects_append() {
        let mut executor = ActionExecutor::new(ExecutorConfig::default());
        let mut appended = ActionQueue::new(ActorId(1));
        let mut fronted = ActionQueue::new(ActorId(2));
        for queue in [&mut appended, &mut fronted] {
            queue.add_action_at_end(tagged(1, ActionFlags::empty()), &mut executor);
            queue.add_action_at_end(tagged(2, ActionFlags::empty()), &mut executor);
        }

        appended.add_action_at_end(tagged(9, ActionFlags::ADD_AT_FRONT), &mut executor);
        fronted.add_action_at_front(tagged(9, ActionFlags::ADD_AT_FRONT), &mut executor);
        assert_eq!(modes(&appended), vec![9, 1, 2]);
        assert_eq!(modes(&appended), modes(&fronted));
    }

    #[test]
    fn every_mutation_stamps_and_notifies() {
        let mut executor = ActionExecutor::new(ExecutorConfig::default());
        let mut queue = ActionQueue::new(ActorId(8));
        queue.add_action_at_end(tagged(1, ActionFlags::empty()), &mut executor);
        let stamp = queue.last_update();
        queue.finish_action(&mut executor);
        assert!(queue.last_update() > stamp);
        let events = executor.drain_events();
        assert_eq!(events, vec![ActionEvent::QueueUpdated { actor: ActorId(8) }; 2]);
    }

    #[test]
    fn restore_activates_silently() {
        let mut executor = ActionExecutor::new(ExecutorConfig::default());
        let mut queue = ActionQueue::new(ActorId(6));
        queue.restore(vec![tagged(1, ActionFlags::empty())], &mut executor);
        assert!(executor.is_active(ActorId(6)));
        assert!(executor.drain_events().is_empty());
    }

    #[test]
    fn mark_front_ready_only_releases_waiting_actions() {
        let mut executor = ActionExecutor::new(ExecutorConfig::default());
        let mut queue = ActionQueue::new(ActorId(1));
        queue.add_action_at_end(tagged(1, ActionFlags::empty()), &mut executor);
        assert!(!queue.mark_front_ready());
        queue.add_action_at_front(
            Action::new(ActionType::with_flags(ActionFlags::WAIT_FOR_READY_FLAG), 0.0),
            &mut executor,
        );
        assert!(queue.mark_front_ready());
        assert!(queue.front().is_some_and(|a| a.ready));
    }
}
