//! CAD kernel abstraction and backends

mod mesh_file;
#[cfg(feature = "opencascade")]
mod opencascade;
mod traits;

pub use mesh_file::{InputFormat, MeshFileKernel};
#[cfg(feature = "opencascade")]
pub use opencascade::OpenCascadeKernel;
pub use traits::{CadError, CadKernel, CadResult, NullKernel, TessellatedMesh, TessellationParams};

/// Get the default CAD kernel based on available features
pub fn default_kernel() -> Box<dyn CadKernel> {
    #[cfg(feature = "opencascade")]
    {
        Box::new(OpenCascadeKernel::new())
    }

    #[cfg(not(feature = "opencascade"))]
    {
        Box::new(MeshFileKernel::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kernel_matches_features() {
        let kernel = default_kernel();
        assert!(kernel.is_available());
        if cfg!(feature = "opencascade") {
            assert_eq!(kernel.name(), "opencascade");
        } else {
            assert_eq!(kernel.name(), "mesh-file");
        }
    }
}
