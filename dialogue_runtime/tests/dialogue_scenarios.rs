//! End-to-end scenarios: catalog loading, participant binding and traversal.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dialogue_model::{CompareOp, Condition, DialogueGraph, DialogueGuid, Edge, Node, VariableStore};
use dialogue_runtime::{
    participant_handle, ContextState, DialogueCatalog, DialogueContext, DialogueError,
    DialogueObject, HistoryStore, MemorySource, Participant, ParticipantHandle, RawAsset,
};

struct Villager {
    name: String,
    variables: VariableStore,
}

impl Villager {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variables: VariableStore::new(),
        }
    }

    fn with_int(mut self, variable: &str, value: i64) -> Self {
        self.variables.set_int(variable, value);
        self
    }
}

impl Participant for Villager {
    fn participant_name(&self) -> &str {
        &self.name
    }

    fn variables(&self) -> &VariableStore {
        &self.variables
    }

    fn variables_mut(&mut self) -> &mut VariableStore {
        &mut self.variables
    }
}

impl DialogueObject for Villager {
    fn as_participant(&self) -> Option<&dyn Participant> {
        Some(self)
    }

    fn as_participant_mut(&mut self) -> Option<&mut dyn Participant> {
        Some(self)
    }
}

/// A crate in the world: an object, but not a participant.
struct Crate;

impl DialogueObject for Crate {}

/// Node0(Speech, "A") with [edge to 1 if trust >= 5, edge to 2].
fn trust_graph() -> Arc<DialogueGraph> {
    Arc::new(
        DialogueGraph::new(
            DialogueGuid::new(),
            "Trust",
            vec![
                Node::speech("A", "Can I trust you?")
                    .with_edge(
                        Edge::new(0, 1).with_condition(Condition::int(
                            "A",
                            "trust",
                            CompareOp::GreaterOrEqual,
                            5,
                        )),
                    )
                    .with_edge(Edge::new(0, 2)),
                Node::speech("A", "Here is the secret").with_edge(Edge::new(1, 3)),
                Node::speech("A", "Come back later").with_edge(Edge::new(2, 3)),
                Node::end(),
            ],
        )
        .unwrap(),
    )
}

#[test]
fn low_trust_skips_conditional_edge() {
    let mut history = HistoryStore::new();
    let villager: ParticipantHandle = participant_handle(Villager::new("A").with_int("trust", 3));
    let mut context = DialogueContext::start(trust_graph(), &[villager], &mut history).unwrap();

    assert_eq!(context.advance(None, &mut history).unwrap(), ContextState::Active(2));
    assert_eq!(context.speaker_state().unwrap().text, "Come back later");
}

#[test]
fn high_trust_takes_first_matching_edge() {
    let mut history = HistoryStore::new();
    let villager = participant_handle(Villager::new("A").with_int("trust", 10));
    let mut context = DialogueContext::start(trust_graph(), &[villager], &mut history).unwrap();

    assert_eq!(context.advance(None, &mut history).unwrap(), ContextState::Active(1));
}

#[test]
fn edge_selection_is_deterministic() {
    let graph = trust_graph();

    for trust in [0, 4, 5, 6, 100] {
        let mut picks = Vec::new();
        for _ in 0..3 {
            let mut history = HistoryStore::new();
            let villager = participant_handle(Villager::new("A").with_int("trust", trust));
            let mut context =
                DialogueContext::start(graph.clone(), &[villager], &mut history).unwrap();
            picks.push(context.advance(None, &mut history).unwrap());
        }
        assert!(picks.windows(2).all(|w| w[0] == w[1]), "trust {}", trust);
    }
}

#[test]
fn wrong_participant_count_always_fails() {
    let graph = trust_graph();
    let mut history = HistoryStore::new();

    let none: Vec<ParticipantHandle> = Vec::new();
    let two = vec![
        participant_handle(Villager::new("A")),
        participant_handle(Villager::new("B")),
    ];
    let not_participants = vec![participant_handle(Crate), participant_handle(Crate)];

    for participants in [none, two, not_participants] {
        let result = DialogueContext::start(graph.clone(), &participants, &mut history);
        assert!(matches!(
            result,
            Err(DialogueError::ParticipantCountMismatch { expected: 1, .. })
        ));
    }
    assert!(history.is_empty());
}

#[test]
fn non_participant_object_is_rejected() {
    let mut history = HistoryStore::new();
    let result = DialogueContext::start(trust_graph(), &[participant_handle(Crate)], &mut history);

    assert!(matches!(
        result,
        Err(DialogueError::ParticipantCapabilityMissing { index: 0 })
    ));
}

#[test]
fn unknown_participant_name_is_rejected() {
    let mut history = HistoryStore::new();
    let result = DialogueContext::start(
        trust_graph(),
        &[participant_handle(Villager::new("Stranger"))],
        &mut history,
    );

    assert!(matches!(
        result,
        Err(DialogueError::ParticipantNameUnresolved { ref name }) if name == "Stranger"
    ));
}

#[test]
fn variables_outlive_the_context() {
    let graph = Arc::new(
        DialogueGraph::new(
            DialogueGuid::new(),
            "Bribe",
            vec![
                Node::speech("A", "A gift?").with_edge(
                    Edge::new(0, 1).with_event(dialogue_model::Event::add_int("A", "trust", 5)),
                ),
                Node::end(),
            ],
        )
        .unwrap(),
    );
    let villager = Rc::new(RefCell::new(Villager::new("A").with_int("trust", 3)));
    let mut history = HistoryStore::new();

    {
        let handle: ParticipantHandle = villager.clone();
        let mut context = DialogueContext::start(graph.clone(), &[handle], &mut history).unwrap();
        assert_eq!(context.advance(None, &mut history).unwrap(), ContextState::Ended);
    }

    assert_eq!(villager.borrow().variables.get_int("trust"), 8);
    assert_eq!(history.visit_count(graph.guid(), 1), 1);
    assert_eq!(history.edge_count(graph.guid(), 0, 1), 1);
}

#[test]
fn history_survives_export_and_import() {
    let graph = trust_graph();
    let mut history = HistoryStore::new();
    let villager = participant_handle(Villager::new("A").with_int("trust", 10));
    let mut context = DialogueContext::start(graph.clone(), &[villager], &mut history).unwrap();
    context.advance(None, &mut history).unwrap();
    context.advance(None, &mut history).unwrap();

    let saved = history.export_json().unwrap();
    let mut restored = HistoryStore::new();
    restored.import_json(&saved).unwrap();

    assert_eq!(restored, history);
    for node in 0..graph.node_count() {
        assert_eq!(
            restored.visit_count(graph.guid(), node),
            history.visit_count(graph.guid(), node)
        );
    }
    assert!(restored.was_edge_taken(graph.guid(), 1, 3));
}

#[test]
fn catalog_loads_and_answers_queries() {
    let first = r#"{
        "guid": "0b5d4a52-6a4f-4c55-9a0e-1f7c2d9e8a01",
        "name": "Market",
        "nodes": [
            {"kind": "speech", "owner": "A", "text": "Fresh bread!",
             "edges": [{"source": 0, "target": 1,
                        "conditions": [{"type": "compare_int", "participant": "B",
                                        "variable": "coins", "op": "greater", "value": 0}]}]},
            {"kind": "end"}
        ]
    }"#;
    let second = r#"
guid = "0b5d4a52-6a4f-4c55-9a0e-1f7c2d9e8a02"
name = "Gate"

[[nodes]]
kind = "speech"
owner = "C"
text = "Halt!"

[[nodes.edges]]
source = 0
target = 1

[[nodes.edges.events]]
type = "set_bool"
participant = "B"
variable = "stopped"
value = true

[[nodes]]
kind = "end"
"#;
    let source = MemorySource::new()
        .with_asset(RawAsset::json("market.json", first))
        .with_asset(RawAsset::toml("gate.toml", second))
        .with_asset(RawAsset::json("broken.json", "{"));

    let mut catalog = DialogueCatalog::new();
    let report = catalog.load_all(&source);

    assert_eq!(report.loaded, 2);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.duplicates.is_empty());
    assert_eq!(catalog.all_participant_names(), vec!["A", "B", "C"]);
    assert_eq!(catalog.find_by_participant_name("B").len(), 2);
    assert_eq!(
        catalog.all_variable_names("B", dialogue_model::VariableType::Int),
        vec!["coins"]
    );
    assert_eq!(
        catalog.all_variable_names("B", dialogue_model::VariableType::Bool),
        vec!["stopped"]
    );
}

#[test]
fn catalog_graphs_drive_contexts() {
    let asset = serde_json::to_string(&*trust_graph()).unwrap();
    let mut catalog = DialogueCatalog::new();
    catalog.load_all(&MemorySource::new().with_asset(RawAsset::json("trust.json", asset)));

    let graph = catalog.find_by_participant_name("A").remove(0);
    let mut history = HistoryStore::new();
    let villager = participant_handle(Villager::new("A").with_int("trust", 5));
    let mut context = DialogueContext::start(graph, &[villager], &mut history).unwrap();

    assert_eq!(context.advance(None, &mut history).unwrap(), ContextState::Active(1));
    assert_eq!(context.advance(None, &mut history).unwrap(), ContextState::Ended);
}
