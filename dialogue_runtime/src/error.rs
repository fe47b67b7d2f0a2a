//! Error types for the dialogue runtime.

use dialogue_model::DialogueGuid;
use thiserror::Error;

/// Everything that can go wrong while loading or running dialogues.
#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("dialogue needs {expected} participants, got {actual}")]
    ParticipantCountMismatch { expected: usize, actual: usize },

    #[error("object at position {index} is not a dialogue participant")]
    ParticipantCapabilityMissing { index: usize },

    #[error("participant `{name}` is not part of this dialogue")]
    ParticipantNameUnresolved { name: String },

    #[error("participant `{name}` was bound more than once")]
    DuplicateParticipantName { name: String },

    #[error("operation not allowed while the context is {state}")]
    InvalidContextState { state: String },

    #[error("edge {edge} on node {node} cannot be taken")]
    InvalidChoice { node: usize, edge: usize },

    #[error("dialogue guid {guid} is shared by {names:?}")]
    DuplicateGraphIdentity { guid: DialogueGuid, names: Vec<String> },

    #[error("malformed dialogue asset `{origin}`: {reason}")]
    MalformedAsset { origin: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = DialogueError> = std::result::Result<T, E>;
