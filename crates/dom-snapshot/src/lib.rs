//! Tree access layer over parsed documents.
//!
//! Documents arrive already parsed, either as a CDP `DOM.getDocument` payload
//! ([`DomTree::from_cdp_json`]) or through [`TreeBuilder`]. Every accessor is a
//! pure read and tolerates missing attributes, empty class lists and empty
//! text.

pub mod builder;
pub mod cdp;
pub mod errors;
pub mod model;
pub mod text;

pub use builder::TreeBuilder;
pub use errors::SnapshotError;
pub use model::{Attribute, DomTree, NodeKind};
pub use text::normalize_space;
pub use xpath_forge_core_types::{BackendNodeId, NodeId};
