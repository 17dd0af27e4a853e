//! Output records of a decomposition run

use serde::{Deserialize, Serialize};

/// Metadata for one exported part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    /// Unique key within the run
    pub part_key: String,
    /// Display name (label, else internal name)
    pub name: String,
    /// Mesh file path, forward slashes
    pub mesh_path: String,
    /// Slash-delimited cosmetic path starting at `Root`
    pub node_path: String,
    /// Key of the parent record, if any
    pub parent_key: Option<String>,
    /// Reserved for scene-graph node indices; always null
    pub node_index: Option<u32>,
    /// Bounding-box center
    pub position: [f64; 3],
    /// Bounding-box extent
    pub size: [f64; 3],
}

/// The `{"parts": [...]}` document written at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartsPayload {
    pub parts: Vec<PartRecord>,
}

impl PartsPayload {
    pub fn new(parts: Vec<PartRecord>) -> Self {
        Self { parts }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn part_keys(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.part_key.as_str())
    }

    /// Find a record by key
    pub fn get(&self, part_key: &str) -> Option<&PartRecord> {
        self.parts.iter().find(|p| p.part_key == part_key)
    }
}
