//! Actor filter definitions as they appear in action files.
//!
//! ```ron
//! target_filter: (
//!     selection_mask: "IS_HIDDEN IS_UNAVAILABLE IS_SELECTABLE",
//!     selection_compare: "IS_SELECTABLE",
//!     logic: Some(Expr(operator: "OR", elements: [
//!         Property(property: "Faction", type: "string", comparison: "EQUAL", value: "guild"),
//!         Components(required: ["Movable", "ObjectOwner"], mode: "any"),
//!     ])),
//! ),
//! ```

use std::str::FromStr;

use action_core::{
    ActorFilter, ActorLeaf, ComponentKind, LogicFilter, LogicOperator, PropertyFilter,
    RequiredMode, SelectionStatus,
};
use serde::{Deserialize, Serialize};

use crate::loaders::LoadResult;

/// Selection mask plus optional logic tree. Empty strings mean "not given".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub selection_mask: String,
    pub selection_compare: String,
    pub logic: Option<LogicSpec>,
}

/// Node of a filter's logic tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogicSpec {
    Expr {
        #[serde(default = "default_operator")]
        operator: String,
        #[serde(default)]
        negated: bool,
        elements: Vec<LogicSpec>,
    },
    Property {
        property: String,
        #[serde(rename = "type")]
        value_type: String,
        comparison: String,
        value: String,
        #[serde(default)]
        owned_object: bool,
    },
    Components {
        required: Vec<String>,
        #[serde(default)]
        mode: String,
        #[serde(default)]
        owned_object: bool,
    },
}

fn default_operator() -> String {
    "AND".into()
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        self.selection_mask.trim().is_empty() && self.logic.is_none()
    }

    pub fn build(&self) -> LoadResult<ActorFilter> {
        let mask = parse_selection(&self.selection_mask)?;
        let compare = parse_selection(&self.selection_compare)?;
        let mut filter = ActorFilter::new().with_selection(mask, compare);
        if let Some(logic) = &self.logic {
            filter = filter.with_logic(logic.build()?);
        }
        Ok(filter)
    }
}

fn parse_selection(text: &str) -> LoadResult<SelectionStatus> {
    SelectionStatus::from_str(text)
        .map_err(|e| anyhow::anyhow!("Invalid selection status '{}': {}", text, e))
}

impl LogicSpec {
    pub fn build(&self) -> LoadResult<LogicFilter<ActorLeaf>> {
        match self {
            Self::Expr {
                operator,
                negated,
                elements,
            } => {
                let operator = LogicOperator::parse(operator)
                    .map_err(|e| anyhow::anyhow!("Invalid filter expression: {}", e))?;
                let elements = elements
                    .iter()
                    .map(LogicSpec::build)
                    .collect::<LoadResult<Vec<_>>>()?;
                Ok(LogicFilter::Expression {
                    operator,
                    negated: *negated,
                    elements,
                })
            }
            Self::Property {
                property,
                value_type,
                comparison,
                value,
                owned_object,
            } => {
                let filter = PropertyFilter::parse(property.as_str(), value_type, comparison, value)
                    .map_err(|e| anyhow::anyhow!("Invalid filter on property '{}': {}", property, e))?;
                Ok(LogicFilter::Leaf(ActorLeaf::Property {
                    filter,
                    on_owned_object: *owned_object,
                }))
            }
            Self::Components {
                required,
                mode,
                owned_object,
            } => {
                let required = required
                    .iter()
                    .map(|token| {
                        ComponentKind::parse(token)
                            .ok_or_else(|| anyhow::anyhow!("Unknown component '{}'", token))
                    })
                    .collect::<LoadResult<_>>()?;
                let mode = if mode.is_empty() {
                    RequiredMode::default()
                } else {
                    RequiredMode::from_str(mode)
                        .map_err(|_| anyhow::anyhow!("Unknown component mode '{}'", mode))?
                };
                Ok(LogicFilter::Leaf(ActorLeaf::Components {
                    required,
                    mode,
                    on_owned_object: *owned_object,
                }))
            }
        }
    }
}
