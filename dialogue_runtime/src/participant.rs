//! Participants - host objects bound to a dialogue's named roles.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use dialogue_model::{DialogueGraph, VariableStore};
use tracing::debug;

use crate::error::{DialogueError, Result};

/// The capability a host object needs to take part in a dialogue.
pub trait Participant {
    /// Role name this object plays. Must match one of the graph's participants.
    fn participant_name(&self) -> &str;

    fn variables(&self) -> &VariableStore;

    fn variables_mut(&mut self) -> &mut VariableStore;

    /// Evaluate a custom predicate authored in the dialogue.
    fn check_condition(&self, _name: &str) -> bool {
        false
    }

    /// React to a custom action authored in the dialogue.
    fn on_dialogue_event(&mut self, _name: &str) {}
}

/// Any object a host may hand to [`crate::DialogueContext::start`].
///
/// Objects that can take part return themselves from the accessors; the
/// defaults report that the capability is missing.
pub trait DialogueObject {
    fn as_participant(&self) -> Option<&dyn Participant> {
        None
    }

    fn as_participant_mut(&mut self) -> Option<&mut dyn Participant> {
        None
    }
}

/// Shared handle to a host object.
pub type ParticipantHandle = Rc<RefCell<dyn DialogueObject>>;

/// Wrap a host object in a [`ParticipantHandle`].
pub fn participant_handle<T: DialogueObject + 'static>(object: T) -> ParticipantHandle {
    Rc::new(RefCell::new(object))
}

/// Role name to participant object bindings for one context.
#[derive(Clone, Default)]
pub struct ParticipantRegistry {
    bound: BTreeMap<String, ParticipantHandle>,
}

impl ParticipantRegistry {
    /// Bind `objects` to the roles of `graph`.
    ///
    /// Checks run in order: participant count, then for each object its
    /// capability, its role name, and uniqueness of that name.
    ///
    /// # Panics
    ///
    /// Panics if one of the objects is mutably borrowed elsewhere.
    pub fn bind(graph: &DialogueGraph, objects: &[ParticipantHandle]) -> Result<Self> {
        let expected = graph.participants().len();
        if objects.len() != expected {
            return Err(DialogueError::ParticipantCountMismatch {
                expected,
                actual: objects.len(),
            });
        }

        let mut bound = BTreeMap::new();
        for (index, object) in objects.iter().enumerate() {
            let name = {
                let borrowed = object.borrow();
                let participant = borrowed
                    .as_participant()
                    .ok_or(DialogueError::ParticipantCapabilityMissing { index })?;
                participant.participant_name().to_string()
            };

            if !graph.has_participant(&name) {
                return Err(DialogueError::ParticipantNameUnresolved { name });
            }
            if bound.contains_key(&name) {
                return Err(DialogueError::DuplicateParticipantName { name });
            }

            debug!(participant = %name, dialogue = %graph.name(), "bound participant");
            bound.insert(name, Rc::clone(object));
        }

        Ok(Self { bound })
    }

    pub fn get(&self, name: &str) -> Option<&ParticipantHandle> {
        self.bound.get(name)
    }

    /// Bound role names, sorted ascending.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bound.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Run `f` with read access to a bound participant.
    pub fn with_participant<R>(
        &self,
        name: &str,
        f: impl FnOnce(&dyn Participant) -> R,
    ) -> Option<R> {
        let handle = self.bound.get(name)?;
        let borrowed = handle.borrow();
        borrowed.as_participant().map(f)
    }

    /// Run `f` with write access to a bound participant.
    pub fn with_participant_mut<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut dyn Participant) -> R,
    ) -> Option<R> {
        let handle = self.bound.get(name)?;
        let mut borrowed = handle.borrow_mut();
        borrowed.as_participant_mut().map(f)
    }
}

impl std::fmt::Debug for ParticipantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticipantRegistry")
            .field("bound", &self.bound.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogue_model::{CompareOp, Condition, DialogueGuid, Edge, Node};

    struct Npc {
        name: String,
        variables: VariableStore,
    }

    impl Npc {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                variables: VariableStore::new(),
            }
        }
    }

    impl Participant for Npc {
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

    impl DialogueObject for Npc {
        fn as_participant(&self) -> Option<&dyn Participant> {
            Some(self)
        }

        fn as_participant_mut(&mut self) -> Option<&mut dyn Participant> {
            Some(self)
        }
    }

    struct Barrel;

    impl DialogueObject for Barrel {}

    fn two_party_graph() -> DialogueGraph {
        DialogueGraph::new(
            DialogueGuid::new(),
            "Chat",
            vec![
                Node::speech("A", "Hi").with_edge(
                    Edge::new(0, 1).with_condition(Condition::int("B", "x", CompareOp::Equal, 0)),
                ),
                Node::end(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_bind_success() {
        let graph = two_party_graph();
        let objects = vec![
            participant_handle(Npc::new("B")),
            participant_handle(Npc::new("A")),
        ];

        let registry = ParticipantRegistry::bind(&graph, &objects).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert!(registry.get("A").is_some());
    }

    #[test]
    fn test_bind_count_mismatch() {
        let graph = two_party_graph();
        let objects = vec![participant_handle(Npc::new("A"))];

        let result = ParticipantRegistry::bind(&graph, &objects);
        assert!(matches!(
            result,
            Err(DialogueError::ParticipantCountMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_bind_capability_missing() {
        let graph = two_party_graph();
        let objects = vec![participant_handle(Npc::new("A")), participant_handle(Barrel)];

        let result = ParticipantRegistry::bind(&graph, &objects);
        assert!(matches!(
            result,
            Err(DialogueError::ParticipantCapabilityMissing { index: 1 })
        ));
    }

    #[test]
    fn test_bind_unknown_name() {
        let graph = two_party_graph();
        let objects = vec![
            participant_handle(Npc::new("A")),
            participant_handle(Npc::new("Z")),
        ];

        let result = ParticipantRegistry::bind(&graph, &objects);
        assert!(matches!(
            result,
            Err(DialogueError::ParticipantNameUnresolved { name }) if name == "Z"
        ));
    }

    #[test]
    fn test_bind_duplicate_name() {
        let graph = two_party_graph();
        let objects = vec![
            participant_handle(Npc::new("A")),
            participant_handle(Npc::new("A")),
        ];

        let result = ParticipantRegistry::bind(&graph, &objects);
        assert!(matches!(
            result,
            Err(DialogueError::DuplicateParticipantName { name }) if name == "A"
        ));
    }

    #[test]
    fn test_with_participant_mut_writes_through_handle() {
        let graph = two_party_graph();
        let npc_a = participant_handle(Npc::new("A"));
        let objects = vec![Rc::clone(&npc_a), participant_handle(Npc::new("B"))];
        let registry = ParticipantRegistry::bind(&graph, &objects).unwrap();

        registry.with_participant_mut("A", |p| p.variables_mut().set_int("gold", 7));

        let gold = npc_a
            .borrow()
            .as_participant()
            .map(|p| p.variables().get_int("gold"));
        assert_eq!(gold, Some(7));
        assert_eq!(registry.with_participant("missing", |_| ()), None);
    }
}
