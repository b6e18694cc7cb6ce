//! Element-tree and event primitives shared by the host services and plugins.

pub mod events;
pub mod node;
pub mod text_edit;
