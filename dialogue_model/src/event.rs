//! Events - side effects fired when nodes are entered or edges are taken.

use serde::{Deserialize, Serialize};

use crate::variables::{VariableStore, VariableType};

/// A single side effect on a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Set an int variable, or add to it when `delta` is true.
    SetInt {
        participant: String,
        variable: String,
        value: i64,
        #[serde(default)]
        delta: bool,
    },
    /// Set a float variable, or add to it when `delta` is true.
    SetFloat {
        participant: String,
        variable: String,
        value: f64,
        #[serde(default)]
        delta: bool,
    },
    SetBool {
        participant: String,
        variable: String,
        value: bool,
    },
    SetName {
        participant: String,
        variable: String,
        value: String,
    },
    /// Named action dispatched to the participant itself.
    Custom {
        participant: String,
        name: String,
    },
}

impl Event {
    pub fn set_int(
        participant: impl Into<String>,
        variable: impl Into<String>,
        value: i64,
    ) -> Self {
        Event::SetInt {
            participant: participant.into(),
            variable: variable.into(),
            value,
            delta: false,
        }
    }

    pub fn add_int(
        participant: impl Into<String>,
        variable: impl Into<String>,
        value: i64,
    ) -> Self {
        Event::SetInt {
            participant: participant.into(),
            variable: variable.into(),
            value,
            delta: true,
        }
    }

    pub fn set_float(
        participant: impl Into<String>,
        variable: impl Into<String>,
        value: f64,
    ) -> Self {
        Event::SetFloat {
            participant: participant.into(),
            variable: variable.into(),
            value,
            delta: false,
        }
    }

    pub fn add_float(
        participant: impl Into<String>,
        variable: impl Into<String>,
        value: f64,
    ) -> Self {
        Event::SetFloat {
            participant: participant.into(),
            variable: variable.into(),
            value,
            delta: true,
        }
    }

    pub fn set_bool(
        participant: impl Into<String>,
        variable: impl Into<String>,
        value: bool,
    ) -> Self {
        Event::SetBool {
            participant: participant.into(),
            variable: variable.into(),
            value,
        }
    }

    pub fn set_name(
        participant: impl Into<String>,
        variable: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Event::SetName {
            participant: participant.into(),
            variable: variable.into(),
            value: value.into(),
        }
    }

    pub fn custom(participant: impl Into<String>, name: impl Into<String>) -> Self {
        Event::Custom {
            participant: participant.into(),
            name: name.into(),
        }
    }

    /// The participant this event targets.
    pub fn participant(&self) -> &str {
        match self {
            Event::SetInt { participant, .. }
            | Event::SetFloat { participant, .. }
            | Event::SetBool { participant, .. }
            | Event::SetName { participant, .. }
            | Event::Custom { participant, .. } => participant,
        }
    }

    /// The typed variable this event writes, if any.
    pub fn variable(&self) -> Option<(VariableType, &str)> {
        match self {
            Event::SetInt { variable, .. } => Some((VariableType::Int, variable)),
            Event::SetFloat { variable, .. } => Some((VariableType::Float, variable)),
            Event::SetBool { variable, .. } => Some((VariableType::Bool, variable)),
            Event::SetName { variable, .. } => Some((VariableType::Name, variable)),
            Event::Custom { .. } => None,
        }
    }

    /// Name of the custom action, for custom events.
    pub fn custom_name(&self) -> Option<&str> {
        match self {
            Event::Custom { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Apply a variable event to a store.
    ///
    /// Returns `false` for custom events, which the store cannot handle.
    pub fn apply(&self, store: &mut VariableStore) -> bool {
        match self {
            Event::SetInt {
                variable,
                value,
                delta,
                ..
            } => {
                let base = if *delta { store.get_int(variable) } else { 0 };
                store.set_int(variable.as_str(), base.saturating_add(*value));
            }
            Event::SetFloat {
                variable,
                value,
                delta,
                ..
            } => {
                let base = if *delta { store.get_float(variable) } else { 0.0 };
                store.set_float(variable.as_str(), base + value);
            }
            Event::SetBool {
                variable, value, ..
            } => store.set_bool(variable.as_str(), *value),
            Event::SetName {
                variable, value, ..
            } => store.set_name(variable.as_str(), value.as_str()),
            Event::Custom { .. } => return false,
        }
        true
    }
}
