//! Assembly decomposition pipeline
//!
//! This crate turns a loaded CAD document into per-part mesh files and records:
//! - Candidate selection: shapes, sizes, reference geometry, implausible bounds
//! - Part keys: run-scoped, collision-free, with provenance prefixes
//! - Hierarchy: best-effort parent links from back-references
//! - Export: tessellation and STL/PLY/OBJ writing, isolated per part
//! - Pipeline: the Loaded -> Done state machine tying it together

pub mod bounds;
pub mod candidate;
pub mod constants;
pub mod export;
pub mod filter;
pub mod hierarchy;
pub mod keys;
pub mod mesh;
pub mod pipeline;
pub mod record;

#[cfg(test)]
pub(crate) mod test_support;

pub use bounds::*;
pub use candidate::*;
pub use constants::*;
pub use export::*;
pub use filter::*;
pub use hierarchy::*;
pub use keys::*;
pub use mesh::*;
pub use pipeline::*;
pub use record::*;
