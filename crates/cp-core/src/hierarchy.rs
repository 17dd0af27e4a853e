//! Best-effort parent inference from document back-references
//!
//! Many importers do not preserve the assembly tree. When the document exposes
//! "referencing objects" for a shape, the first referencing candidate is taken as its
//! parent. Formats without back-references yield a flat hierarchy, which is an
//! accepted degraded mode. Edges carry no confidence.

use std::collections::{HashMap, HashSet};

use cp_cad::DocumentObject;

/// Child internal name -> parent internal name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyMap {
    parents: HashMap<String, String>,
}

impl HierarchyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edge. Self-edges are refused.
    pub fn insert(&mut self, child: impl Into<String>, parent: impl Into<String>) -> bool {
        let child = child.into();
        let parent = parent.into();
        if child == parent {
            return false;
        }
        self.parents.insert(child, parent);
        true
    }

    /// Parent of `child`, or None for a root
    pub fn parent_of(&self, child: &str) -> Option<&str> {
        self.parents.get(child).map(String::as_str)
    }

    /// Ancestors of `name`, nearest first. Stops at the first repeated name.
    pub fn ancestors(&self, name: &str) -> Vec<&str> {
        let mut result = Vec::new();
        let mut visited = HashSet::from([name]);
        let mut current = name;
        while let Some(parent) = self.parent_of(current) {
            if !visited.insert(parent) {
                break;
            }
            result.push(parent);
            current = parent;
        }
        result
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Build a parent map over the given candidates
///
/// For each candidate, the first referencing object that is not the candidate itself
/// and is itself a candidate becomes its parent. A candidate whose reference list
/// cannot be read stays a root; the others are unaffected.
pub fn infer_parents(candidates: &[&DocumentObject]) -> HierarchyMap {
    let names: HashSet<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    let mut map = HierarchyMap::new();

    for candidate in candidates {
        let in_list = match candidate.in_list() {
            Ok(in_list) => in_list,
            Err(e) => {
                tracing::debug!("Cannot read references of {}: {}", candidate.name, e);
                continue;
            }
        };

        let parent = in_list
            .iter()
            .find(|p| p.as_str() != candidate.name && names.contains(p.as_str()));

        if let Some(parent) = parent {
            map.insert(candidate.name.clone(), parent.clone());
        }
    }

    tracing::debug!(
        "Inferred {} parent links over {} candidates",
        map.len(),
        candidates.len()
    );
    map
}
