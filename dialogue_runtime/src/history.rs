//! History store - long-term memory of traversed nodes and edges.
//!
//! History is keyed by dialogue GUID and survives every context. It is only
//! cleared on request. Hosts persist it through [`HistoryStore::export`] and
//! restore it with [`HistoryStore::import`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use dialogue_model::DialogueGuid;

use crate::error::Result;

/// Traversal record for one dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueHistory {
    visited_nodes: BTreeSet<usize>,
    visit_counts: BTreeMap<usize, u32>,
    edge_counts: BTreeMap<(usize, usize), u32>,
}

impl DialogueHistory {
    pub fn record_node_visit(&mut self, node: usize) {
        self.visited_nodes.insert(node);
        let count = self.visit_counts.entry(node).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn record_edge_taken(&mut self, source: usize, target: usize) {
        let count = self.edge_counts.entry((source, target)).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn was_node_visited(&self, node: usize) -> bool {
        self.visited_nodes.contains(&node)
    }

    pub fn visit_count(&self, node: usize) -> u32 {
        self.visit_counts.get(&node).copied().unwrap_or(0)
    }

    pub fn was_edge_taken(&self, source: usize, target: usize) -> bool {
        self.edge_counts.contains_key(&(source, target))
    }

    pub fn edge_count(&self, source: usize, target: usize) -> u32 {
        self.edge_counts.get(&(source, target)).copied().unwrap_or(0)
    }

    /// Visited node indices, ascending.
    pub fn visited_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.visited_nodes.iter().copied()
    }

    /// Taken `(source, target)` pairs, ascending.
    pub fn taken_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edge_counts.keys().copied()
    }

    fn to_entry(&self) -> HistoryEntry {
        HistoryEntry {
            visited_nodes: self.visited_nodes.clone(),
            visit_counts: self.visit_counts.clone(),
            taken_edges: self
                .edge_counts
                .iter()
                .map(|(&(source, target), &count)| EdgeRecord {
                    source,
                    target,
                    count,
                })
                .collect(),
        }
    }

    fn from_entry(entry: HistoryEntry) -> Self {
        let mut visited_nodes = entry.visited_nodes;
        visited_nodes.extend(entry.visit_counts.keys().copied());

        let mut edge_counts = BTreeMap::new();
        for record in entry.taken_edges {
            let count = edge_counts.entry((record.source, record.target)).or_insert(0u32);
            *count = count.saturating_add(record.count);
        }

        Self {
            visited_nodes,
            visit_counts: entry.visit_counts,
            edge_counts,
        }
    }
}

/// Persisted form of one taken edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: usize,
    pub target: usize,
    pub count: u32,
}

/// Persisted form of one dialogue's history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub visited_nodes: BTreeSet<usize>,
    #[serde(default)]
    pub visit_counts: BTreeMap<usize, u32>,
    #[serde(default)]
    pub taken_edges: Vec<EdgeRecord>,
}

/// Whole-store snapshot exchanged with the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistorySnapshot {
    pub dialogues: BTreeMap<DialogueGuid, HistoryEntry>,
}

/// Process-wide traversal history, keyed by dialogue GUID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    dialogues: HashMap<DialogueGuid, DialogueHistory>,
}

impl HistoryStore {
    /// Create a new empty history store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a node was entered. Each call adds one visit.
    pub fn record_node_visit(&mut self, guid: DialogueGuid, node: usize) {
        self.dialogues.entry(guid).or_default().record_node_visit(node);
    }

    /// Record that an edge was taken. Each call adds one traversal.
    pub fn record_edge_taken(&mut self, guid: DialogueGuid, source: usize, target: usize) {
        self.dialogues
            .entry(guid)
            .or_default()
            .record_edge_taken(source, target);
    }

    pub fn was_node_visited(&self, guid: DialogueGuid, node: usize) -> bool {
        self.dialogues
            .get(&guid)
            .is_some_and(|history| history.was_node_visited(node))
    }

    pub fn visit_count(&self, guid: DialogueGuid, node: usize) -> u32 {
        self.dialogues
            .get(&guid)
            .map(|history| history.visit_count(node))
            .unwrap_or(0)
    }

    pub fn was_edge_taken(&self, guid: DialogueGuid, source: usize, target: usize) -> bool {
        self.dialogues
            .get(&guid)
            .is_some_and(|history| history.was_edge_taken(source, target))
    }

    pub fn edge_count(&self, guid: DialogueGuid, source: usize, target: usize) -> u32 {
        self.dialogues
            .get(&guid)
            .map(|history| history.edge_count(source, target))
            .unwrap_or(0)
    }

    /// Get the history of one dialogue, if it was ever traversed.
    pub fn history(&self, guid: DialogueGuid) -> Option<&DialogueHistory> {
        self.dialogues.get(&guid)
    }

    /// Forget one dialogue's history. Returns whether anything was removed.
    pub fn clear(&mut self, guid: DialogueGuid) -> bool {
        self.dialogues.remove(&guid).is_some()
    }

    /// Forget every dialogue's history.
    pub fn clear_all(&mut self) {
        self.dialogues.clear();
    }

    /// Number of dialogues with recorded history.
    pub fn len(&self) -> usize {
        self.dialogues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogues.is_empty()
    }

    /// Snapshot the whole store.
    pub fn export(&self) -> HistorySnapshot {
        HistorySnapshot {
            dialogues: self
                .dialogues
                .iter()
                .map(|(guid, history)| (*guid, history.to_entry()))
                .collect(),
        }
    }

    /// Replace the whole store with a snapshot.
    ///
    /// The snapshot is normalized on the way in: every node with a visit
    /// count is also marked visited, and repeated records for the same edge
    /// are summed, saturating at `u32::MAX`. Exporting afterwards therefore
    /// need not reproduce a hand-edited snapshot byte for byte.
    pub fn import(&mut self, snapshot: HistorySnapshot) {
        self.dialogues = snapshot
            .dialogues
            .into_iter()
            .map(|(guid, entry)| (guid, DialogueHistory::from_entry(entry)))
            .collect();
    }

    /// Export the store as JSON.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.export())?)
    }

    /// Replace the store with JSON produced by [`Self::export_json`].
    ///
    /// Normalizes like [`Self::import`]. On a parse error the store is left
    /// untouched.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let snapshot: HistorySnapshot = serde_json::from_str(json)?;
        self.import(snapshot);
        Ok(())
    }
}
