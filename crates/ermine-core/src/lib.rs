#![forbid(unsafe_code)]

//! ER diagram-code parser + semantic model (headless).
//!
//! Design goals:
//! - strict single-command parsing with user-facing errors; lenient
//!   whole-document loading that never fails the editor
//! - deterministic, testable passes (derivation, anchors, layout glue are
//!   pure functions over model snapshots)
//! - rendering-agnostic: live geometry and the layout engine are injected
//!   capabilities, so every pass runs without a rendering surface

pub mod anchors;
pub mod command;
pub mod derive;
pub mod document;
pub mod error;
pub mod geom;
pub mod layout;
pub mod model;
pub mod utils;

pub use anchors::{ANCHOR_GAP, AnchorPoint, NodeGeometry, RelAnchors, Side, assign_anchors};
pub use command::{parse_entity_command, parse_relationship_command};
pub use derive::{DerivedElements, derive_structural_elements, partition_hierarchy};
pub use document::{parse_document, serialize_document};
pub use error::{Error, Result};
pub use layout::{LayoutEngine, LayoutSpacing, SizedNode, compute_layout};
pub use model::{
    Arrow, AttrRole, Attribute, Cardinality, Diagram, Entity, EntityKind, NodeId, RelStyle,
    Relationship,
};

#[cfg(test)]
mod tests;
