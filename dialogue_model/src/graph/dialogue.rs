//! Dialogue graph - validated, immutable container of nodes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use super::{Node, NodeKind};
use crate::condition::Condition;
use crate::event::Event;
use crate::ids::DialogueGuid;
use crate::names::sorted_unique;
use crate::variables::VariableType;

/// Structural problems found while validating a dialogue asset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("dialogue `{name}` has no nodes")]
    Empty { name: String },

    #[error("speech node {node} has no owner")]
    MissingSpeaker { node: usize },

    #[error("edge on node {node} claims source {claimed}")]
    EdgeSourceMismatch { node: usize, claimed: usize },

    #[error("edge on node {node} targets missing node {target}")]
    DanglingEdge { node: usize, target: usize },

    #[error("end node {node} has outgoing edges")]
    EndNodeHasEdges { node: usize },

    #[error("condition on node {node} references missing node {referenced}")]
    ConditionNodeOutOfRange { node: usize, referenced: usize },
}

/// The serialized form of a dialogue, as stored in asset files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueAsset {
    pub guid: DialogueGuid,
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// A loaded dialogue.
///
/// Node 0 is the entry node. Node indices never change once the graph is
/// built, and edges keep their authored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DialogueAsset", into = "DialogueAsset")]
pub struct DialogueGraph {
    guid: DialogueGuid,
    name: String,
    nodes: Vec<Node>,
    /// Sorted role names derived from speakers, conditions and events.
    participants: Vec<String>,
}

impl DialogueGraph {
    /// Index of the entry node.
    pub const ENTRY: usize = 0;

    /// Build and validate a graph.
    pub fn new(
        guid: DialogueGuid,
        name: impl Into<String>,
        nodes: Vec<Node>,
    ) -> Result<Self, GraphError> {
        Self::try_from(DialogueAsset {
            guid,
            name: name.into(),
            nodes,
        })
    }

    /// Build a graph without structural validation.
    ///
    /// Traversal never takes an edge whose target is missing.
    pub fn from_asset_unchecked(asset: DialogueAsset) -> Self {
        let participants = collect_participants(&asset.nodes);
        Self {
            guid: asset.guid,
            name: asset.name,
            nodes: asset.nodes,
            participants,
        }
    }

    pub fn guid(&self) -> DialogueGuid {
        self.guid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Required participant names, sorted ascending.
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn has_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p == name)
    }

    /// Every condition in the graph: node enter-conditions and edge conditions.
    pub fn all_conditions(&self) -> impl Iterator<Item = &Condition> {
        self.nodes.iter().flat_map(|node| {
            node.enter_conditions
                .iter()
                .chain(node.edges.iter().flat_map(|edge| edge.conditions.iter()))
        })
    }

    /// Every event in the graph: node enter-events and edge events.
    pub fn all_events(&self) -> impl Iterator<Item = &Event> {
        self.nodes.iter().flat_map(|node| {
            node.enter_events
                .iter()
                .chain(node.edges.iter().flat_map(|edge| edge.events.iter()))
        })
    }

    /// Variable names of one type that `participant` is read or written with.
    pub fn variable_names(&self, participant: &str, variable_type: VariableType) -> Vec<String> {
        let from_conditions = self
            .all_conditions()
            .filter(|c| c.participant() == Some(participant))
            .filter_map(|c| c.variable())
            .filter(|(ty, _)| *ty == variable_type)
            .map(|(_, name)| name);
        let from_events = self
            .all_events()
            .filter(|e| e.participant() == participant)
            .filter_map(|e| e.variable())
            .filter(|(ty, _)| *ty == variable_type)
            .map(|(_, name)| name);

        sorted_unique(from_conditions.chain(from_events))
    }

    /// Custom predicate names checked on `participant`.
    pub fn condition_names(&self, participant: &str) -> Vec<String> {
        sorted_unique(
            self.all_conditions()
                .filter(|c| c.participant() == Some(participant))
                .filter_map(|c| c.custom_name()),
        )
    }

    /// Custom action names dispatched to `participant`.
    pub fn event_names(&self, participant: &str) -> Vec<String> {
        sorted_unique(
            self.all_events()
                .filter(|e| e.participant() == participant)
                .filter_map(|e| e.custom_name()),
        )
    }
}

impl TryFrom<DialogueAsset> for DialogueGraph {
    type Error = GraphError;

    fn try_from(asset: DialogueAsset) -> Result<Self, Self::Error> {
        validate(&asset)?;
        Ok(Self::from_asset_unchecked(asset))
    }
}

impl From<DialogueGraph> for DialogueAsset {
    fn from(graph: DialogueGraph) -> Self {
        Self {
            guid: graph.guid,
            name: graph.name,
            nodes: graph.nodes,
        }
    }
}

fn validate(asset: &DialogueAsset) -> Result<(), GraphError> {
    if asset.nodes.is_empty() {
        return Err(GraphError::Empty {
            name: asset.name.clone(),
        });
    }

    let count = asset.nodes.len();
    for (index, node) in asset.nodes.iter().enumerate() {
        if node.kind == NodeKind::Speech && node.owner.is_none() {
            return Err(GraphError::MissingSpeaker { node: index });
        }
        if node.kind == NodeKind::End && !node.edges.is_empty() {
            return Err(GraphError::EndNodeHasEdges { node: index });
        }

        for edge in &node.edges {
            if edge.source != index {
                return Err(GraphError::EdgeSourceMismatch {
                    node: index,
                    claimed: edge.source,
                });
            }
            if edge.target >= count {
                return Err(GraphError::DanglingEdge {
                    node: index,
                    target: edge.target,
                });
            }
        }

        let conditions = node
            .enter_conditions
            .iter()
            .chain(node.edges.iter().flat_map(|e| e.conditions.iter()));
        for condition in conditions {
            let referenced = match condition {
                Condition::HasSaidNode { node, .. } | Condition::WasNodeVisited { node } => *node,
                _ => continue,
            };
            if referenced >= count {
                return Err(GraphError::ConditionNodeOutOfRange {
                    node: index,
                    referenced,
                });
            }
        }
    }

    Ok(())
}

fn collect_participants(nodes: &[Node]) -> Vec<String> {
    let mut names: BTreeSet<&str> = BTreeSet::new();

    for node in nodes {
        if let Some(owner) = &node.owner {
            names.insert(owner.as_str());
        }
        let conditions = node
            .enter_conditions
            .iter()
            .chain(node.edges.iter().flat_map(|e| e.conditions.iter()));
        names.extend(conditions.filter_map(|c| c.participant()));

        let events = node
            .enter_events
            .iter()
            .chain(node.edges.iter().flat_map(|e| e.events.iter()));
        names.extend(events.map(|e| e.participant()));
    }

    sorted_unique(names)
}
