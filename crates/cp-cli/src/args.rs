//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;
use cp_core::{DecompositionOptions, MeshFormat};

/// Split a CAD assembly into per-part meshes with JSON metadata
#[derive(Parser, Debug)]
#[command(name = "cadparts", author, version, about, long_about = None)]
pub struct Args {
    /// CAD or mesh file to decompose
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory receiving the mesh files
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Mesh format: stl, ply or obj [default: stl]
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<MeshFormat>,

    /// Linear deflection [default: 10.0]
    #[arg(long, value_name = "VALUE")]
    pub linear: Option<f64>,

    /// Angular deflection in radians [default: 0.9]
    #[arg(long, value_name = "RADIANS")]
    pub angular: Option<f64>,

    /// Treat the linear deflection as relative to edge size
    #[arg(long)]
    pub relative: bool,

    /// Export at most this many parts, 0 for no limit
    #[arg(long, value_name = "N")]
    pub max_parts: Option<usize>,

    /// Skip parts whose bounding-box diagonal is below this value
    #[arg(long, value_name = "VALUE")]
    pub skip_small: Option<f64>,

    /// Skip parts with any axis at or above this length [default: 1e50]
    #[arg(long, value_name = "VALUE")]
    pub skip_huge: Option<f64>,

    /// Skip boxes that are flat on two or more axes
    #[arg(long)]
    pub skip_degenerate: bool,

    /// Comma-separated reference-geometry keywords
    #[arg(long, value_name = "CSV")]
    pub exclude_keywords: Option<String>,

    /// Do not filter parts by name
    #[arg(long)]
    pub no_name_filter: bool,

    /// Write the JSON here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub json_out: Option<PathBuf>,

    /// Do not infer parent links
    #[arg(long)]
    pub no_hierarchy: bool,

    /// Only log errors
    #[arg(long)]
    pub quiet: bool,

    /// Base options from a RON file; flags given here take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Apply the flags on top of `base`
    pub fn apply(&self, mut options: DecompositionOptions) -> DecompositionOptions {
        if let Some(format) = self.format {
            options.format = format;
        }
        if let Some(linear) = self.linear {
            options.tessellation.linear_deflection = linear;
        }
        if let Some(angular) = self.angular {
            options.tessellation.angular_deflection = angular;
        }
        if self.relative {
            options.tessellation.relative = true;
        }
        if let Some(max_parts) = self.max_parts {
            options.max_parts = max_parts;
        }
        if let Some(skip_small) = self.skip_small {
            options.skip_small = skip_small;
        }
        if let Some(skip_huge) = self.skip_huge {
            options.skip_huge = skip_huge;
        }
        if self.skip_degenerate {
            options.skip_degenerate = true;
        }
        if let Some(csv) = &self.exclude_keywords {
            options.exclude_keywords = csv
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
        }
        if self.no_name_filter {
            options.name_filter = false;
        }
        if self.no_hierarchy {
            options.hierarchy = false;
        }
        if self.quiet {
            options.quiet = true;
        }
        options
    }
}
