//! Global constants for cp-core

/// Default keywords marking reference/helper geometry (matched case-insensitively)
pub const DEFAULT_EXCLUDE_KEYWORDS: &[&str] = &["axis", "plane", "datum", "origin", "sketch", "csys"];

/// Default "huge" axis length; kernels materialize infinite planes/axes as boxes this large
pub const DEFAULT_HUGE_THRESHOLD: f64 = 1e50;

/// Axis lengths at or below this count as zero thickness
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// Fallback for empty node-path segments and file names
pub const PLACEHOLDER_NAME: &str = "part";

/// First segment of every node path
pub const NODE_PATH_ROOT: &str = "Root";

/// Separator between the provenance prefix and the sanitized name in mesh file names
pub const MESH_FILE_SEPARATOR: &str = "__";
