//! Dialogue graph module - the immutable definition of one dialogue.
//!
//! A graph consists of:
//! - **Nodes**: speech lines, selectors (choice points) and end markers
//! - **Edges**: ordered, conditional transitions owned by their source node
//! - **Participants**: the role names a context must bind before starting

mod dialogue;
mod node;

pub use dialogue::*;
pub use node::*;
