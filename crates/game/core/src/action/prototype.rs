use std::collections::BTreeMap;

use crate::filter::ActorFilter;
use crate::flags::{ActionType, NeedMask};
use crate::state::{ObjectRef, ObjectView};

/// Text keyed by language; the empty key holds the language-neutral entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalizedText {
    entries: BTreeMap<String, String>,
}

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn neutral(text: impl Into<String>) -> Self {
        Self::new().with("", text)
    }

    pub fn with(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(lang, text);
        self
    }

    pub fn insert(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(lang.into(), text.into());
    }

    /// Entry for `lang`, falling back to the language-neutral entry.
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.entries
            .get(lang)
            .or_else(|| self.entries.get(""))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Variant of an action offered as a sub-menu entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubAction {
    pub mode: i32,
    pub menu_text: LocalizedText,
}

/// Immutable named template actions are instantiated from.
#[derive(Clone, Debug)]
pub struct ActionPrototype {
    name: String,
    action_type: ActionType,
    script_on_start: Option<String>,
    script_on_end: Option<String>,
    need_mask: NeedMask,
    executor_filter: ActorFilter,
    target_filter: ActorFilter,
    menu_text: LocalizedText,
    menu_icon: Option<String>,
    sub_actions: Vec<SubAction>,
    priority: i32,
}

impl ActionPrototype {
    pub fn builder(name: impl Into<String>) -> ActionPrototypeBuilder {
        ActionPrototypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    pub fn script_on_start(&self) -> Option<&str> {
        self.script_on_start.as_deref()
    }

    pub fn script_on_end(&self) -> Option<&str> {
        self.script_on_end.as_deref()
    }

    pub fn need_mask(&self) -> NeedMask {
        self.need_mask
    }

    pub fn executor_filter(&self) -> &ActorFilter {
        &self.executor_filter
    }

    pub fn target_filter(&self) -> &ActorFilter {
        &self.target_filter
    }

    pub fn menu_icon(&self) -> Option<&str> {
        self.menu_icon.as_deref()
    }

    pub fn sub_actions(&self) -> &[SubAction] {
        &self.sub_actions
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Menu label in `lang`, falling back to the neutral text and then the name.
    pub fn menu_text(&self, lang: &str) -> &str {
        self.menu_text.get(lang).unwrap_or(&self.name)
    }

    /// Label of the sub-action with `mode`; `None` if there is no such mode.
    pub fn sub_menu_text(&self, mode: i32, lang: &str) -> Option<String> {
        self.sub_actions
            .iter()
            .find(|sub| sub.mode == mode)
            .map(|sub| {
                sub.menu_text
                    .get(lang)
                    .map_or_else(|| mode.to_string(), str::to_owned)
            })
    }

    /// Actor targets are vetted by the target filter; other needs accept anything.
    pub fn is_valid_target<V: ObjectView + ?Sized>(&self, view: &V, target: ObjectRef) -> bool {
        if self.need_mask.intersects(NeedMask::ACTOR) {
            self.target_filter.full_check(view, target)
        } else {
            true
        }
    }
}

/// Builder applying the need-derived target filter defaults.
#[derive(Clone, Debug)]
pub struct ActionPrototypeBuilder {
    proto: ActionPrototype,
    target_override: Option<ActorFilter>,
}

impl ActionPrototypeBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            proto: ActionPrototype {
                name: name.into(),
                action_type: ActionType::of_kind(crate::flags::ActionKind::RunScript),
                script_on_start: None,
                script_on_end: None,
                need_mask: NeedMask::empty(),
                executor_filter: ActorFilter::new(),
                target_filter: ActorFilter::new(),
                menu_text: LocalizedText::new(),
                menu_icon: None,
                sub_actions: Vec::new(),
                priority: 0,
            },
            target_override: None,
        }
    }

    pub fn action_type(mut self, action_type: ActionType) -> Self {
        self.proto.action_type = action_type;
        self
    }

    pub fn script_on_start(mut self, name: impl Into<String>) -> Self {
        self.proto.script_on_start = Some(name.into());
        self
    }

    pub fn script_on_end(mut self, name: impl Into<String>) -> Self {
        self.proto.script_on_end = Some(name.into());
        self
    }

    pub fn need_mask(mut self, need: NeedMask) -> Self {
        self.proto.need_mask = need;
        self
    }

    pub fn executor_filter(mut self, filter: ActorFilter) -> Self {
        self.proto.executor_filter = filter;
        self
    }

    /// Explicit target filter. Its non-empty selection mask and its logic
    /// tree replace the need-derived defaults.
    pub fn target_filter(mut self, filter: ActorFilter) -> Self {
        self.target_override = Some(filter);
        self
    }

    pub fn menu_text(mut self, text: LocalizedText) -> Self {
        self.proto.menu_text = text;
        self
    }

    pub fn menu_icon(mut self, icon: impl Into<String>) -> Self {
        self.proto.menu_icon = Some(icon.into());
        self
    }

    pub fn sub_action(mut self, mode: i32, text: LocalizedText) -> Self {
        self.proto.sub_actions.push(SubAction {
            mode,
            menu_text: text,
        });
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.proto.priority = priority;
        self
    }

    pub fn build(self) -> ActionPrototype {
        let mut proto = self.proto;
        let mut target = ActorFilter::default_for_need(proto.need_mask);
        if let Some(explicit) = self.target_override {
            let has_mask = !explicit.selection_mask.is_empty();
            target.apply_override(
                has_mask.then_some(explicit.selection_mask),
                has_mask.then_some(explicit.selection_compare),
                explicit.logic,
            );
        }
        proto.target_filter = target;
        proto
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::SelectionStatus;

    #[test]
    fn menu_text_falls_back_to_neutral_then_name() {
        let localized = ActionPrototype::builder("Open")
            .menu_text(LocalizedText::neutral("Open it").with("pl", "Otwórz"))
            .build();
        assert_eq!(localized.menu_text("pl"), "Otwórz");
        assert_eq!(localized.menu_text("de"), "Open it");
        let bare = ActionPrototype::builder("Open").build();
        assert_eq!(bare.menu_text("en"), "Open");
    }

    #[test]
    fn sub_menu_text_falls_back_to_mode() {
        let proto = ActionPrototype::builder("Walk")
            .sub_action(1, LocalizedText::neutral("slowly"))
            .sub_action(2, LocalizedText::new())
            .build();
        assert_eq!(proto.sub_menu_text(1, "en").as_deref(), Some("slowly"));
        assert_eq!(proto.sub_menu_text(2, "en").as_deref(), Some("2"));
        assert_eq!(proto.sub_menu_text(3, "en"), None);
    }

    #[test]
    fn explicit_target_filter_overrides_need_defaults() {
        let defaulted = ActionPrototype::builder("Take")
            .need_mask(NeedMask::TARGET_ACTOR)
            .build();
        assert_eq!(
            defaulted.target_filter().selection_compare,
            SelectionStatus::IS_ACTION_TARGET
        );

        let overridden = ActionPrototype::builder("Take")
            .need_mask(NeedMask::TARGET_ACTOR)
            .target_filter(ActorFilter::new().with_selection(
                SelectionStatus::IS_HIDDEN,
                SelectionStatus::IS_HIDDEN,
            ))
            .build();
        assert_eq!(overridden.target_filter().selection_mask, SelectionStatus::IS_HIDDEN);
        assert_eq!(overridden.target_filter().selection_compare, SelectionStatus::IS_HIDDEN);
    }
}
