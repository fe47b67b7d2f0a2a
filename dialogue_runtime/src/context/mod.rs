//! Dialogue context - the traversal engine for one conversation.
//!
//! A context walks a shared [`DialogueGraph`] on behalf of a fixed set of
//! bound participants:
//! 1. **Start**: bind participants, enter node 0
//! 2. **Advance**: pick an outgoing edge of the active node, either the one
//!    the caller chose or the first satisfied one in authored order
//! 3. **Take edge**: record it, fire its events, enter the target
//! 4. **Finish**: reaching an end node, or running out of satisfied edges,
//!    ends the context; [`DialogueContext::stop`] aborts it
//!
//! Mutations are applied eagerly. Stopping a context keeps every variable
//! change and history record made so far.

mod scope;

use std::collections::BTreeSet;
use std::sync::Arc;

use dialogue_model::{all_conditions_hold, DialogueGraph, DialogueGuid, Edge, Event, NodeKind};
use tracing::{debug, warn};

use crate::config::RuntimeConfig;
use crate::error::{DialogueError, Result};
use crate::history::HistoryStore;
use crate::participant::{ParticipantHandle, ParticipantRegistry};

use scope::SessionScope;

/// Lifecycle of a context. `Ended` and `Stopped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Waiting at the given node.
    Active(usize),
    /// Reached an end node or ran out of satisfied edges.
    Ended,
    /// Terminated by the caller.
    Stopped,
}

impl std::fmt::Display for ContextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextState::Active(node) => write!(f, "active at node {}", node),
            ContextState::Ended => write!(f, "ended"),
            ContextState::Stopped => write!(f, "stopped"),
        }
    }
}

/// What the active node presents to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerState<'a> {
    pub node: usize,
    pub kind: NodeKind,
    /// Speaking participant, for speech nodes.
    pub speaker: Option<&'a str>,
    pub text: &'a str,
}

/// An outgoing edge of the active node, as offered to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueOption {
    /// Index of the edge within the active node.
    pub edge: usize,
    pub target: usize,
    pub text: String,
    /// Whether the edge can be taken right now.
    pub satisfied: bool,
}

/// A live traversal of one dialogue graph.
#[derive(Debug)]
pub struct DialogueContext {
    graph: Arc<DialogueGraph>,
    participants: ParticipantRegistry,
    config: RuntimeConfig,
    state: ContextState,
    /// Nodes entered during this context (short-term memory).
    session_visits: BTreeSet<usize>,
    /// Number of nodes entered so far.
    steps: u64,
}

impl DialogueContext {
    /// Start a dialogue with the default configuration.
    ///
    /// Fails without creating a context when the participant count is wrong,
    /// an object is not a participant, or a participant's name is not one of
    /// the graph's roles.
    pub fn start(
        graph: Arc<DialogueGraph>,
        participants: &[ParticipantHandle],
        history: &mut HistoryStore,
    ) -> Result<Self> {
        Self::start_with_config(graph, participants, history, RuntimeConfig::default())
    }

    pub fn start_with_config(
        graph: Arc<DialogueGraph>,
        participants: &[ParticipantHandle],
        history: &mut HistoryStore,
        config: RuntimeConfig,
    ) -> Result<Self> {
        let registry = match ParticipantRegistry::bind(&graph, participants) {
            Ok(registry) => registry,
            Err(error) => {
                warn!(dialogue = %graph.name(), %error, "failed to start dialogue");
                return Err(error);
            }
        };

        let mut context = Self {
            graph,
            participants: registry,
            config,
            state: ContextState::Active(DialogueGraph::ENTRY),
            session_visits: BTreeSet::new(),
            steps: 0,
        };

        debug!(dialogue = %context.graph.name(), guid = %context.guid(), "starting dialogue");
        context.enter_node(DialogueGraph::ENTRY, history);
        Ok(context)
    }

    /// Step the dialogue forward.
    ///
    /// With `Some(edge)` that edge of the active node is taken; it must exist
    /// and be satisfied, otherwise [`DialogueError::InvalidChoice`] is returned
    /// and nothing changes. With `None` the first satisfied edge in authored
    /// order is taken, and the context ends if there is none.
    pub fn advance(
        &mut self,
        choice: Option<usize>,
        history: &mut HistoryStore,
    ) -> Result<ContextState> {
        let node_index = self.require_active()?;
        let graph = Arc::clone(&self.graph);

        let Some(node) = graph.node(node_index) else {
            self.finish(ContextState::Ended);
            return Ok(self.state);
        };

        let edge_index = match choice {
            Some(edge) => {
                let satisfied = node
                    .edge(edge)
                    .is_some_and(|e| self.edge_satisfied(&graph, e, history));
                if !satisfied {
                    return Err(DialogueError::InvalidChoice {
                        node: node_index,
                        edge,
                    });
                }
                edge
            }
            None => match node
                .edges
                .iter()
                .position(|e| self.edge_satisfied(&graph, e, history))
            {
                Some(edge) => edge,
                None => {
                    debug!(node = node_index, "no satisfied edge");
                    self.finish(ContextState::Ended);
                    return Ok(self.state);
                }
            },
        };

        if let Some(edge) = node.edge(edge_index) {
            self.take_edge(edge, history);
        }
        Ok(self.state)
    }

    /// Terminate the dialogue. Changes already applied are kept.
    pub fn stop(&mut self) -> Result<()> {
        self.require_active()?;
        self.finish(ContextState::Stopped);
        Ok(())
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ContextState::Active(_))
    }

    /// Index of the active node, if the context is still running.
    pub fn active_node(&self) -> Option<usize> {
        match self.state {
            ContextState::Active(node) => Some(node),
            _ => None,
        }
    }

    pub fn graph(&self) -> &Arc<DialogueGraph> {
        &self.graph
    }

    pub fn guid(&self) -> DialogueGuid {
        self.graph.guid()
    }

    pub fn participants(&self) -> &ParticipantRegistry {
        &self.participants
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Number of nodes entered so far, including the entry node.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Was `node` entered during this context?
    pub fn has_said_node(&self, node: usize) -> bool {
        self.session_visits.contains(&node)
    }

    /// Speaker and text of the active node.
    pub fn speaker_state(&self) -> Option<SpeakerState<'_>> {
        let index = self.active_node()?;
        let node = self.graph.node(index)?;
        Some(SpeakerState {
            node: index,
            kind: node.kind,
            speaker: node.owner.as_deref(),
            text: &node.text,
        })
    }

    /// Every outgoing edge of the active node with its current satisfaction.
    pub fn options(&self, history: &HistoryStore) -> Vec<DialogueOption> {
        let Some(node) = self.active_node().and_then(|i| self.graph.node(i)) else {
            return Vec::new();
        };

        node.edges
            .iter()
            .enumerate()
            .map(|(index, edge)| DialogueOption {
                edge: index,
                target: edge.target,
                text: edge.text.clone(),
                satisfied: self.edge_satisfied(&self.graph, edge, history),
            })
            .collect()
    }

    /// Only the options that can be taken right now.
    pub fn satisfied_options(&self, history: &HistoryStore) -> Vec<DialogueOption> {
        self.options(history)
            .into_iter()
            .filter(|option| option.satisfied)
            .collect()
    }

    fn require_active(&self) -> Result<usize> {
        self.active_node()
            .ok_or_else(|| DialogueError::InvalidContextState {
                state: self.state.to_string(),
            })
    }

    fn scope<'a>(&'a self, history: &'a HistoryStore) -> SessionScope<'a> {
        SessionScope {
            guid: self.graph.guid(),
            participants: &self.participants,
            history,
            session_visits: &self.session_visits,
        }
    }

    /// Edge conditions first, then the target's enter-conditions.
    /// Edges into missing nodes are never satisfied.
    fn edge_satisfied(&self, graph: &DialogueGraph, edge: &Edge, history: &HistoryStore) -> bool {
        let Some(target) = graph.node(edge.target) else {
            return false;
        };
        let scope = self.scope(history);
        all_conditions_hold(&edge.conditions, &scope)
            && all_conditions_hold(&target.enter_conditions, &scope)
    }

    fn take_edge(&mut self, edge: &Edge, history: &mut HistoryStore) {
        debug!(source = edge.source, target = edge.target, "taking edge");
        if self.config.record_history {
            history.record_edge_taken(self.guid(), edge.source, edge.target);
        }
        self.fire_events(&edge.events);
        self.enter_node(edge.target, history);
    }

    fn enter_node(&mut self, index: usize, history: &mut HistoryStore) {
        let graph = Arc::clone(&self.graph);
        let Some(node) = graph.node(index) else {
            warn!(node = index, dialogue = %graph.name(), "entered missing node");
            self.finish(ContextState::Ended);
            return;
        };

        self.state = ContextState::Active(index);
        self.steps += 1;
        self.fire_events(&node.enter_events);
        self.session_visits.insert(index);
        if self.config.record_history {
            history.record_node_visit(self.guid(), index);
        }

        if node.is_end() {
            self.finish(ContextState::Ended);
        }
    }

    fn fire_events(&self, events: &[Event]) {
        for event in events {
            let applied = self.participants.with_participant_mut(event.participant(), |p| {
                match event.custom_name() {
                    Some(name) => p.on_dialogue_event(name),
                    None => {
                        event.apply(p.variables_mut());
                    }
                }
            });
            if applied.is_none() {
                warn!(participant = %event.participant(), "event targets an unbound participant");
            }
        }
    }

    fn finish(&mut self, state: ContextState) {
        debug!(dialogue = %self.graph.name(), %state, steps = self.steps, "dialogue finished");
        self.state = state;
    }
}

/// Start a dialogue with a single participant.
pub fn start_monologue(
    graph: Arc<DialogueGraph>,
    participant: ParticipantHandle,
    history: &mut HistoryStore,
) -> Result<DialogueContext> {
    DialogueContext::start(graph, &[participant], history)
}
