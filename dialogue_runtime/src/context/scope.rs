//! Condition scope backed by a live context.

use std::collections::BTreeSet;

use dialogue_model::{ConditionScope, DialogueGuid};

use crate::history::HistoryStore;
use crate::participant::ParticipantRegistry;

/// Read-only view of everything a condition may consult during one step.
pub(crate) struct SessionScope<'a> {
    pub guid: DialogueGuid,
    pub participants: &'a ParticipantRegistry,
    pub history: &'a HistoryStore,
    pub session_visits: &'a BTreeSet<usize>,
}

impl ConditionScope for SessionScope<'_> {
    fn int_value(&self, participant: &str, variable: &str) -> i64 {
        self.participants
            .with_participant(participant, |p| p.variables().get_int(variable))
            .unwrap_or(0)
    }

    fn float_value(&self, participant: &str, variable: &str) -> f64 {
        self.participants
            .with_participant(participant, |p| p.variables().get_float(variable))
            .unwrap_or(0.0)
    }

    fn bool_value(&self, participant: &str, variable: &str) -> bool {
        self.participants
            .with_participant(participant, |p| p.variables().get_bool(variable))
            .unwrap_or(false)
    }

    fn name_value(&self, participant: &str, variable: &str) -> String {
        self.participants
            .with_participant(participant, |p| p.variables().get_name(variable).to_string())
            .unwrap_or_default()
    }

    fn check_custom(&self, participant: &str, name: &str) -> bool {
        self.participants
            .with_participant(participant, |p| p.check_condition(name))
            .unwrap_or(false)
    }

    fn visited_this_session(&self, node: usize) -> bool {
        self.session_visits.contains(&node)
    }

    fn was_node_visited(&self, node: usize) -> bool {
        self.history.was_node_visited(self.guid, node)
    }
}
