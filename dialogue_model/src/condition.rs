//! Conditions - read-only checks gating edges and node entry.

use serde::{Deserialize, Serialize};

use crate::names::compare_names;
use crate::variables::VariableType;

/// Comparison operator used by the variable conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl CompareOp {
    /// Apply the operator as `lhs <op> rhs`.
    pub fn compare<T: PartialOrd + ?Sized>(&self, lhs: &T, rhs: &T) -> bool {
        match self {
            CompareOp::Equal => lhs == rhs,
            CompareOp::NotEqual => lhs != rhs,
            CompareOp::Less => lhs < rhs,
            CompareOp::LessOrEqual => lhs <= rhs,
            CompareOp::Greater => lhs > rhs,
            CompareOp::GreaterOrEqual => lhs >= rhs,
        }
    }
}

/// Everything a condition may look at while it is evaluated.
///
/// Variable lookups for unbound participants or unknown names must return the
/// type's zero value.
pub trait ConditionScope {
    fn int_value(&self, participant: &str, variable: &str) -> i64;
    fn float_value(&self, participant: &str, variable: &str) -> f64;
    fn bool_value(&self, participant: &str, variable: &str) -> bool;
    fn name_value(&self, participant: &str, variable: &str) -> String;

    /// Ask a participant to evaluate a named custom predicate.
    fn check_custom(&self, participant: &str, name: &str) -> bool;

    /// Was the node entered during the current session (short-term memory)?
    fn visited_this_session(&self, node: usize) -> bool;

    /// Was the node ever entered according to the history (long-term memory)?
    fn was_node_visited(&self, node: usize) -> bool;
}

/// A single condition. Conditions never mutate state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    CompareInt {
        participant: String,
        variable: String,
        op: CompareOp,
        value: i64,
    },
    CompareFloat {
        participant: String,
        variable: String,
        op: CompareOp,
        value: f64,
    },
    CompareBool {
        participant: String,
        variable: String,
        value: bool,
    },
    /// Names compare with the ordinal policy from [`compare_names`].
    CompareName {
        participant: String,
        variable: String,
        op: CompareOp,
        value: String,
    },
    /// Reads the history unless `session_only` restricts it to the
    /// current session.
    HasSaidNode {
        node: usize,
        #[serde(default)]
        session_only: bool,
    },
    WasNodeVisited {
        node: usize,
    },
    Custom {
        participant: String,
        name: String,
    },
}

impl Condition {
    pub fn int(
        participant: impl Into<String>,
        variable: impl Into<String>,
        op: CompareOp,
        value: i64,
    ) -> Self {
        Condition::CompareInt {
            participant: participant.into(),
            variable: variable.into(),
            op,
            value,
        }
    }

    pub fn float(
        participant: impl Into<String>,
        variable: impl Into<String>,
        op: CompareOp,
        value: f64,
    ) -> Self {
        Condition::CompareFloat {
            participant: participant.into(),
            variable: variable.into(),
            op,
            value,
        }
    }

    pub fn bool(participant: impl Into<String>, variable: impl Into<String>, value: bool) -> Self {
        Condition::CompareBool {
            participant: participant.into(),
            variable: variable.into(),
            value,
        }
    }

    pub fn name(
        participant: impl Into<String>,
        variable: impl Into<String>,
        op: CompareOp,
        value: impl Into<String>,
    ) -> Self {
        Condition::CompareName {
            participant: participant.into(),
            variable: variable.into(),
            op,
            value: value.into(),
        }
    }

    pub fn has_said(node: usize) -> Self {
        Condition::HasSaidNode {
            node,
            session_only: false,
        }
    }

    pub fn has_said_this_session(node: usize) -> Self {
        Condition::HasSaidNode {
            node,
            session_only: true,
        }
    }

    pub fn was_visited(node: usize) -> Self {
        Condition::WasNodeVisited { node }
    }

    pub fn custom(participant: impl Into<String>, name: impl Into<String>) -> Self {
        Condition::Custom {
            participant: participant.into(),
            name: name.into(),
        }
    }

    /// Evaluate this condition against the scope.
    pub fn evaluate(&self, scope: &dyn ConditionScope) -> bool {
        match self {
            Condition::CompareInt {
                participant,
                variable,
                op,
                value,
            } => op.compare(&scope.int_value(participant, variable), value),
            Condition::CompareFloat {
                participant,
                variable,
                op,
                value,
            } => op.compare(&scope.float_value(participant, variable), value),
            Condition::CompareBool {
                participant,
                variable,
                value,
            } => scope.bool_value(participant, variable) == *value,
            Condition::CompareName {
                participant,
                variable,
                op,
                value,
            } => {
                let current = scope.name_value(participant, variable);
                op.compare(&compare_names(&current, value), &std::cmp::Ordering::Equal)
            }
            Condition::HasSaidNode {
                node,
                session_only: true,
            } => scope.visited_this_session(*node),
            Condition::HasSaidNode { node, .. } => scope.was_node_visited(*node),
            Condition::WasNodeVisited { node } => scope.was_node_visited(*node),
            Condition::Custom { participant, name } => scope.check_custom(participant, name),
        }
    }

    /// The participant this condition reads from, if any.
    pub fn participant(&self) -> Option<&str> {
        match self {
            Condition::CompareInt { participant, .. }
            | Condition::CompareFloat { participant, .. }
            | Condition::CompareBool { participant, .. }
            | Condition::CompareName { participant, .. }
            | Condition::Custom { participant, .. } => Some(participant),
            Condition::HasSaidNode { .. } | Condition::WasNodeVisited { .. } => None,
        }
    }

    /// The typed variable this condition reads, if any.
    pub fn variable(&self) -> Option<(VariableType, &str)> {
        match self {
            Condition::CompareInt { variable, .. } => Some((VariableType::Int, variable)),
            Condition::CompareFloat { variable, .. } => Some((VariableType::Float, variable)),
            Condition::CompareBool { variable, .. } => Some((VariableType::Bool, variable)),
            Condition::CompareName { variable, .. } => Some((VariableType::Name, variable)),
            _ => None,
        }
    }

    /// Name of the custom predicate, for custom conditions.
    pub fn custom_name(&self) -> Option<&str> {
        match self {
            Condition::Custom { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Evaluate a conjunction in order, stopping at the first failing condition.
pub fn all_conditions_hold(conditions: &[Condition], scope: &dyn ConditionScope) -> bool {
    conditions.iter().all(|condition| condition.evaluate(scope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::VariableStore;
    use std::cell::Cell;
    use std::collections::HashSet;

    #[derive(Default)]
    struct MockScope {
        store: VariableStore,
        said: HashSet<usize>,
        visited: HashSet<usize>,
        custom_true: HashSet<String>,
        custom_calls: Cell<u32>,
    }

    impl ConditionScope for MockScope {
        fn int_value(&self, participant: &str, variable: &str) -> i64 {
            if participant == "A" {
                self.store.get_int(variable)
            } else {
                0
            }
        }

        fn float_value(&self, _participant: &str, variable: &str) -> f64 {
            self.store.get_float(variable)
        }

        fn bool_value(&self, _participant: &str, variable: &str) -> bool {
            self.store.get_bool(variable)
        }

        fn name_value(&self, _participant: &str, variable: &str) -> String {
            self.store.get_name(variable).to_string()
        }

        fn check_custom(&self, _participant: &str, name: &str) -> bool {
            self.custom_calls.set(self.custom_calls.get() + 1);
            self.custom_true.contains(name)
        }

        fn visited_this_session(&self, node: usize) -> bool {
            self.said.contains(&node)
        }

        fn was_node_visited(&self, node: usize) -> bool {
            self.visited.contains(&node)
        }
    }

    #[test]
    fn test_compare_ops() {
        assert!(CompareOp::Equal.compare(&1, &1));
        assert!(CompareOp::NotEqual.compare(&1, &2));
        assert!(CompareOp::Less.compare(&1, &2));
        assert!(CompareOp::LessOrEqual.compare(&2, &2));
        assert!(CompareOp::Greater.compare(&3, &2));
        assert!(CompareOp::GreaterOrEqual.compare(&2, &2));
        assert!(!CompareOp::Greater.compare(&2, &2));
    }

    #[test]
    fn test_int_condition() {
        let mut scope = MockScope::default();
        scope.store.set_int("trust", 3);

        let cond = Condition::int("A", "trust", CompareOp::GreaterOrEqual, 5);
        assert!(!cond.evaluate(&scope));

        scope.store.set_int("trust", 10);
        assert!(cond.evaluate(&scope));
    }

    #[test]
    fn test_missing_variable_uses_zero_value() {
        let scope = MockScope::default();

        assert!(Condition::int("A", "unknown", CompareOp::Equal, 0).evaluate(&scope));
        assert!(Condition::bool("A", "unknown", false).evaluate(&scope));
        assert!(Condition::name("A", "unknown", CompareOp::Equal, "").evaluate(&scope));
    }

    #[test]
    fn test_name_condition() {
        let mut scope = MockScope::default();
        scope.store.set_name("mood", "happy");

        assert!(Condition::name("A", "mood", CompareOp::Equal, "happy").evaluate(&scope));
        assert!(Condition::name("A", "mood", CompareOp::NotEqual, "sad").evaluate(&scope));
        assert!(Condition::name("A", "mood", CompareOp::Less, "sad").evaluate(&scope));
    }

    #[test]
    fn test_memory_conditions() {
        let mut scope = MockScope::default();
        scope.said.insert(2);
        scope.visited.insert(4);

        assert!(Condition::has_said_this_session(2).evaluate(&scope));
        assert!(!Condition::has_said_this_session(4).evaluate(&scope));
        assert!(Condition::has_said(4).evaluate(&scope));
        assert!(!Condition::has_said(2).evaluate(&scope));
        assert!(Condition::was_visited(4).evaluate(&scope));
        assert!(!Condition::was_visited(2).evaluate(&scope));
    }

    #[test]
    fn test_conjunction_short_circuits() {
        let scope = MockScope::default();

        let conditions = vec![
            Condition::bool("A", "never_set", true),
            Condition::custom("A", "counted"),
        ];

        assert!(!all_conditions_hold(&conditions, &scope));
        assert_eq!(scope.custom_calls.get(), 0);
    }

    #[test]
    fn test_empty_conjunction_holds() {
        let scope = MockScope::default();
        assert!(all_conditions_hold(&[], &scope));
    }

    #[test]
    fn test_condition_accessors() {
        let cond = Condition::float("B", "gold", CompareOp::Less, 1.0);
        assert_eq!(cond.participant(), Some("B"));
        assert_eq!(cond.variable(), Some((VariableType::Float, "gold")));
        assert_eq!(cond.custom_name(), None);

        let visited = Condition::was_visited(1);
        assert_eq!(visited.participant(), None);
        assert_eq!(visited.variable(), None);
    }

    #[test]
    fn test_condition_json_shape() {
        let json = r#"{"type":"compare_int","participant":"A","variable":"trust",
            "op":"greater_or_equal","value":5}"#;
        let cond: Condition = serde_json::from_str(json).unwrap();
        assert_eq!(cond, Condition::int("A", "trust", CompareOp::GreaterOrEqual, 5));
    }

    #[test]
    fn test_has_said_defaults_to_history() {
        let json = r#"{"type":"has_said_node","node":3}"#;
        let cond: Condition = serde_json::from_str(json).unwrap();
        assert_eq!(cond, Condition::has_said(3));
    }
}
