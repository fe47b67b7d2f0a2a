//! Node and edge definitions.

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::event::Event;

/// What a node does when the traversal reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A line spoken by the owning participant. Advancing picks the first
    /// satisfied edge.
    Speech,
    /// A choice point. The caller picks the edge, or asks for the first
    /// satisfied one.
    Selector,
    /// Terminal node. Reaching it ends the dialogue.
    End,
}

/// A transition from one node to another.
///
/// Conditions form a conjunction evaluated in authored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,

    /// Option text shown to the player when this edge is offered.
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Fired when the edge is taken, before the target is entered.
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Edge {
    /// Create an unconditional edge.
    pub fn new(source: usize, target: usize) -> Self {
        Self {
            source,
            target,
            text: String::new(),
            conditions: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }
}

/// A node in the dialogue graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,

    /// Speaking participant. Required for speech nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default)]
    pub text: String,

    /// Outgoing edges in priority order.
    #[serde(default)]
    pub edges: Vec<Edge>,

    /// Must all hold for any edge into this node to be taken.
    #[serde(default)]
    pub enter_conditions: Vec<Condition>,

    #[serde(default)]
    pub enter_events: Vec<Event>,
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            owner: None,
            text: String::new(),
            edges: Vec::new(),
            enter_conditions: Vec::new(),
            enter_events: Vec::new(),
        }
    }

    /// Create a speech node spoken by `owner`.
    pub fn speech(owner: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::with_kind(NodeKind::Speech);
        node.owner = Some(owner.into());
        node.text = text.into();
        node
    }

    pub fn selector() -> Self {
        Self::with_kind(NodeKind::Selector)
    }

    pub fn end() -> Self {
        Self::with_kind(NodeKind::End)
    }

    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn with_enter_condition(mut self, condition: Condition) -> Self {
        self.enter_conditions.push(condition);
        self
    }

    pub fn with_enter_event(mut self, event: Event) -> Self {
        self.enter_events.push(event);
        self
    }

    pub fn is_end(&self) -> bool {
        self.kind == NodeKind::End
    }

    /// Get the outgoing edge at `index`.
    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::CompareOp;

    #[test]
    fn test_speech_builder() {
        let node = Node::speech("A", "Hello there")
            .with_edge(Edge::new(0, 1).with_text("Hi"))
            .with_enter_event(Event::set_bool("A", "greeted", true));

        assert_eq!(node.kind, NodeKind::Speech);
        assert_eq!(node.owner.as_deref(), Some("A"));
        assert_eq!(node.edges.len(), 1);
        assert_eq!(node.edge(0).map(|e| e.text.as_str()), Some("Hi"));
        assert!(node.edge(1).is_none());
        assert_eq!(node.enter_events.len(), 1);
    }

    #[test]
    fn test_edge_builder_keeps_order() {
        let edge = Edge::new(0, 2)
            .with_condition(Condition::int("A", "x", CompareOp::Equal, 1))
            .with_condition(Condition::was_visited(1));

        assert_eq!(edge.conditions.len(), 2);
        assert!(matches!(edge.conditions[1], Condition::WasNodeVisited { node: 1 }));
    }

    #[test]
    fn test_end_node() {
        let node = Node::end();
        assert!(node.is_end());
        assert!(node.owner.is_none());
    }

    #[test]
    fn test_node_json_defaults() {
        let node: Node = serde_json::from_str(r#"{"kind":"selector"}"#).unwrap();
        assert_eq!(node, Node::selector());
    }
}
