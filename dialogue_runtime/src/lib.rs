//! # Dialogue Runtime
//!
//! Executes dialogues defined with `dialogue_model`. A host loads graphs into
//! a [`DialogueCatalog`], binds participant objects to a graph's roles with
//! [`DialogueContext::start`], and steps the conversation with
//! [`DialogueContext::advance`]. Every node entered and edge taken is written
//! to the [`HistoryStore`], which outlives contexts and is saved by the host.
//!
//! ## Core Components
//!
//! - **catalog**: process-wide registry of loaded graphs and tooling queries
//! - **context**: the traversal engine for one conversation
//! - **history**: long-term memory of visited nodes and taken edges
//! - **participant**: the capability a host object needs to join a dialogue
//!
//! ## Threading
//!
//! Contexts are single-threaded. The history store is borrowed mutably for
//! each step, so writes to it are serialized by the borrow checker; participant
//! handles are `Rc<RefCell<_>>` and cannot leave the thread.

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod participant;

pub use catalog::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use history::*;
pub use participant::*;

pub use dialogue_model;
