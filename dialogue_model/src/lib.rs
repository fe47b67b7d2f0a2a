//! # Dialogue Model
//!
//! The static half of the dialogue system. This crate defines what a dialogue
//! *is* - graphs of speech, selector and end nodes connected by conditional
//! edges - and the typed variables participants own. It contains no traversal
//! logic; `dialogue_runtime` walks these structures.
//!
//! ## Core Components
//!
//! - **graph**: `DialogueGraph`, its nodes and edges, and asset validation
//! - **condition** / **event**: read-only checks and variable mutations
//! - **variables**: per-participant typed key/value storage
//! - **names**: the single ascending-ordinal sort used for every enumeration

pub mod condition;
pub mod event;
pub mod graph;
pub mod ids;
pub mod names;
pub mod variables;

pub use condition::*;
pub use event::*;
pub use graph::*;
pub use ids::*;
pub use names::*;
pub use variables::*;
