//! CAD Kernel Abstraction and Document Model
//!
//! This crate provides:
//! - Abstract CAD kernel trait for loading documents and tessellating shapes
//! - Document model (objects, labels, shape handles, back-references)
//! - Axis-aligned bounding boxes
//! - A mesh-file kernel backend for pre-tessellated inputs
//! - An OpenCASCADE backend for STEP assemblies (`opencascade` feature)

pub mod bound_box;
pub mod document;
pub mod kernel;

// Re-exports for convenience
pub use bound_box::BoundBox;
pub use document::{Document, DocumentKind, DocumentObject, Shape};
pub use kernel::{
    CadError, CadKernel, CadResult, InputFormat, MeshFileKernel, NullKernel, TessellatedMesh,
    TessellationParams, default_kernel,
};
#[cfg(feature = "opencascade")]
pub use kernel::OpenCascadeKernel;
