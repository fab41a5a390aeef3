//! Action catalogue loader.
//!
//! Each catalogue is a RON file carrying one priority for all its actions:
//!
//! ```ron
//! (
//!     priority: 1,
//!     actions: [
//!         (name: "Chop", type: "RUN_SCRIPT WAIT_FOR_TIMEOUT", script_on_start: "chop_start"),
//!         (name: "Walk", type: "MOVE", need: "POINT", menu_text: {"": "Walk", "pl": "Idź"}),
//!     ],
//! )
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use action_core::{ActionPrototype, ActionType, LocalizedText, NeedMask};
use serde::{Deserialize, Serialize};

use crate::loaders::filters::FilterSpec;
use crate::loaders::{LoadResult, read_file};
use crate::registry::ActionFactory;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActionFileRon {
    #[serde(default)]
    priority: i32,
    actions: Vec<ActionSpec>,
}

/// One action prototype definition. Empty strings mean "not set".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSpec {
    pub name: String,
    #[serde(rename = "type", default = "default_type")]
    pub action_type: String,
    #[serde(default)]
    pub script_on_start: String,
    #[serde(default)]
    pub script_on_end: String,
    #[serde(default)]
    pub need: String,
    #[serde(default)]
    pub executor_filter: FilterSpec,
    #[serde(default)]
    pub target_filter: FilterSpec,
    /// Language → text; the `""` key is the language-neutral entry.
    #[serde(default)]
    pub menu_text: BTreeMap<String, String>,
    #[serde(default)]
    pub menu_icon: String,
    #[serde(default)]
    pub sub_actions: Vec<SubActionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubActionSpec {
    pub mode: i32,
    #[serde(default)]
    pub menu_text: BTreeMap<String, String>,
}

fn default_type() -> String {
    "RUN_SCRIPT".into()
}

fn localized(entries: &BTreeMap<String, String>) -> LocalizedText {
    entries
        .iter()
        .fold(LocalizedText::new(), |text, (lang, value)| text.with(lang, value))
}

impl ActionSpec {
    /// Builds the prototype, stamping it with the catalogue's priority.
    pub fn build(&self, priority: i32) -> LoadResult<ActionPrototype> {
        let action_type = ActionType::from_str(&self.action_type).map_err(|e| {
            anyhow::anyhow!("Invalid type '{}' of action '{}': {}", self.action_type, self.name, e)
        })?;
        let need = NeedMask::from_str(&self.need).map_err(|e| {
            anyhow::anyhow!("Invalid need mask '{}' of action '{}': {}", self.need, self.name, e)
        })?;

        let mut builder = ActionPrototype::builder(self.name.as_str())
            .action_type(action_type)
            .need_mask(need)
            .priority(priority)
            .menu_text(localized(&self.menu_text))
            .executor_filter(self.executor_filter.build()?);
        if !self.target_filter.is_empty() {
            builder = builder.target_filter(self.target_filter.build()?);
        }
        if !self.script_on_start.is_empty() {
            builder = builder.script_on_start(self.script_on_start.as_str());
        }
        if !self.script_on_end.is_empty() {
            builder = builder.script_on_end(self.script_on_end.as_str());
        }
        if !self.menu_icon.is_empty() {
            builder = builder.menu_icon(self.menu_icon.as_str());
        }
        for sub in &self.sub_actions {
            builder = builder.sub_action(sub.mode, localized(&sub.menu_text));
        }
        Ok(builder.build())
    }
}

/// Loader for action catalogues.
pub struct ActionLoader;

impl ActionLoader {
    /// Parses a catalogue into prototypes carrying the file priority.
    pub fn parse(content: &str) -> LoadResult<Vec<ActionPrototype>> {
        let file: ActionFileRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse actions RON: {}", e))?;
        file.actions
            .iter()
            .map(|spec| spec.build(file.priority))
            .collect()
    }

    /// Load one catalogue file.
    pub fn load(path: &Path) -> LoadResult<Vec<ActionPrototype>> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    /// Loads every `*.ron` file of `dir` in path order into `factory`.
    ///
    /// Returns the number of prototypes that ended up registered (inserted
    /// or replacing a lower-priority one).
    pub fn load_dir(dir: &Path, factory: &mut ActionFactory) -> LoadResult<usize> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
            .collect();
        paths.sort();

        let mut registered = 0;
        for path in paths {
            tracing::info!(path = %path.display(), "loading action prototypes");
            for prototype in Self::load(&path)? {
                if !matches!(
                    factory.register(prototype),
                    crate::registry::Registration::Ignored { .. }
                ) {
                    registered += 1;
                }
            }
        }
        Ok(registered)
    }
}
