//! Dialogue catalog - the registry of every loaded dialogue graph.
//!
//! The catalog owns shared references to the graphs and answers the tooling
//! queries: which dialogues a participant appears in, and which participant,
//! variable, condition and event names exist across all of them. Every name
//! list is de-duplicated and sorted with [`dialogue_model::sort_default`].

mod source;

pub use source::*;

use std::collections::HashMap;
use std::sync::Arc;

use dialogue_model::{sorted_unique, DialogueGraph, DialogueGuid, VariableType};
use tracing::{info, warn};

use crate::config::RuntimeConfig;
use crate::error::DialogueError;

/// Outcome of [`DialogueCatalog::load_all`].
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of graphs added to the catalog.
    pub loaded: usize,
    /// Assets that could not be decoded or validated.
    pub skipped: Vec<DialogueError>,
    /// GUID collisions present in the catalog after loading.
    pub duplicates: Vec<DialogueError>,
}

impl LoadReport {
    /// True when nothing was skipped and no GUID collides.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.duplicates.is_empty()
    }
}

/// Every loaded dialogue graph.
#[derive(Debug, Default)]
pub struct DialogueCatalog {
    config: RuntimeConfig,
    dialogues: Vec<Arc<DialogueGraph>>,
}

impl DialogueCatalog {
    /// Create a new empty catalog with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            dialogues: Vec::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Load every asset from `source`.
    ///
    /// A malformed asset is skipped and reported; loading continues with the
    /// next one. Graphs with a colliding GUID are kept and reported.
    pub fn load_all(&mut self, source: &dyn AssetSource) -> LoadReport {
        let mut report = LoadReport::default();

        for raw in source.load_all() {
            let graph = raw.decode().and_then(|asset| {
                if self.config.validate_on_load {
                    DialogueGraph::try_from(asset).map_err(|e| DialogueError::MalformedAsset {
                        origin: raw.origin.clone(),
                        reason: e.to_string(),
                    })
                } else {
                    Ok(DialogueGraph::from_asset_unchecked(asset))
                }
            });

            match graph {
                Ok(graph) => {
                    self.insert(graph);
                    report.loaded += 1;
                }
                Err(error) => {
                    warn!(origin = %raw.origin, %error, "skipping dialogue asset");
                    report.skipped.push(error);
                }
            }
        }

        report.duplicates = self.duplicate_identity_errors();
        for duplicate in &report.duplicates {
            warn!(error = %duplicate, "duplicate dialogue identity");
        }

        info!(
            loaded = report.loaded,
            skipped = report.skipped.len(),
            total = self.dialogues.len(),
            "loaded dialogues"
        );
        report
    }

    /// Add an already built graph.
    pub fn insert(&mut self, graph: DialogueGraph) -> Arc<DialogueGraph> {
        let graph = Arc::new(graph);
        self.dialogues.push(Arc::clone(&graph));
        graph
    }

    /// Remove every graph. Contexts keep their own references.
    pub fn clear(&mut self) {
        self.dialogues.clear();
    }

    pub fn dialogues(&self) -> &[Arc<DialogueGraph>] {
        &self.dialogues
    }

    pub fn len(&self) -> usize {
        self.dialogues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogues.is_empty()
    }

    /// First graph loaded with `guid`.
    pub fn find_by_guid(&self, guid: DialogueGuid) -> Option<Arc<DialogueGraph>> {
        self.dialogues.iter().find(|g| g.guid() == guid).cloned()
    }

    /// Graphs whose GUID is shared with at least one other loaded graph.
    pub fn find_duplicate_identities(&self) -> Vec<Arc<DialogueGraph>> {
        let mut counts: HashMap<DialogueGuid, usize> = HashMap::new();
        for graph in &self.dialogues {
            *counts.entry(graph.guid()).or_default() += 1;
        }

        self.dialogues
            .iter()
            .filter(|g| counts.get(&g.guid()).copied().unwrap_or(0) > 1)
            .cloned()
            .collect()
    }

    /// One [`DialogueError::DuplicateGraphIdentity`] per colliding GUID.
    pub fn duplicate_identity_errors(&self) -> Vec<DialogueError> {
        let mut groups: Vec<(DialogueGuid, Vec<String>)> = Vec::new();
        for graph in self.find_duplicate_identities() {
            match groups.iter_mut().find(|(guid, _)| *guid == graph.guid()) {
                Some((_, names)) => names.push(graph.name().to_string()),
                None => groups.push((graph.guid(), vec![graph.name().to_string()])),
            }
        }

        groups
            .into_iter()
            .map(|(guid, names)| DialogueError::DuplicateGraphIdentity { guid, names })
            .collect()
    }

    /// Graphs that list `name` among their required participants.
    pub fn find_by_participant_name(&self, name: &str) -> Vec<Arc<DialogueGraph>> {
        self.dialogues
            .iter()
            .filter(|g| g.has_participant(name))
            .cloned()
            .collect()
    }

    /// Every participant name across all graphs.
    pub fn all_participant_names(&self) -> Vec<String> {
        sorted_unique(
            self.dialogues
                .iter()
                .flat_map(|g| g.participants().iter().map(String::as_str)),
        )
    }

    /// Every variable name of one type used with `participant`.
    pub fn all_variable_names(
        &self,
        participant: &str,
        variable_type: VariableType,
    ) -> Vec<String> {
        sorted_unique(
            self.dialogues
                .iter()
                .flat_map(|g| g.variable_names(participant, variable_type)),
        )
    }

    /// Every custom predicate name checked on `participant`.
    pub fn all_condition_names(&self, participant: &str) -> Vec<String> {
        sorted_unique(self.dialogues.iter().flat_map(|g| g.condition_names(participant)))
    }

    /// Every custom action name dispatched to `participant`.
    pub fn all_event_names(&self, participant: &str) -> Vec<String> {
        sorted_unique(self.dialogues.iter().flat_map(|g| g.event_names(participant)))
    }
}
