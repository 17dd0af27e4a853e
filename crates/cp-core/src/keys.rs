//! Part keys, node-path segments and mesh file names

use std::collections::HashSet;

use cp_cad::DocumentKind;
use serde::{Deserialize, Serialize};

use crate::constants::PLACEHOLDER_NAME;

/// Provenance of a part key. Keys from different sources never collide incidentally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeySource {
    /// Object of a B-rep CAD document, keyed by kernel-internal name
    Cad,
    /// The single geometry of a mesh file
    Mesh,
    /// One geometry of a multi-geometry mesh file
    Geometry,
}

impl KeySource {
    /// Source matching the kind of document the objects come from
    pub fn for_document(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Brep => KeySource::Cad,
            DocumentKind::Mesh => KeySource::Mesh,
            DocumentKind::Scene => KeySource::Geometry,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            KeySource::Cad => "cad",
            KeySource::Mesh => "m",
            KeySource::Geometry => "g",
        }
    }

    /// `<prefix>:<identifier>`
    pub fn base_key(&self, identifier: &str) -> String {
        format!("{}:{}", self.prefix(), identifier)
    }
}

/// Run-scoped allocator of unique names
///
/// Collisions are resolved by appending `:1`, `:2`, ... (smallest unused).
/// The result depends only on the sequence of calls, so the same input order
/// always yields the same keys.
#[derive(Debug, Clone)]
pub struct KeyAllocator {
    used: HashSet<String>,
    separator: char,
    fold_case: bool,
}

impl Default for KeyAllocator {
    fn default() -> Self {
        Self {
            used: HashSet::new(),
            separator: ':',
            fold_case: false,
        }
    }
}

impl KeyAllocator {
    /// Allocator for part keys (`base:<n>` on collision)
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator for mesh file stems: `base_<n>` on collision, and names
    /// differing only in case collide (case-insensitive filesystems)
    pub fn for_file_stems() -> Self {
        Self {
            used: HashSet::new(),
            separator: '_',
            fold_case: true,
        }
    }

    /// Return `base` if free, otherwise the first free `base<sep><n>`, and mark it used
    pub fn allocate(&mut self, base: &str) -> String {
        if self.claim(base) {
            return base.to_string();
        }

        let mut suffix = 1u32;
        loop {
            let candidate = format!("{}{}{}", base, self.separator, suffix);
            if self.claim(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn claim(&mut self, name: &str) -> bool {
        self.used.insert(self.normalize(name))
    }

    fn normalize(&self, name: &str) -> String {
        if self.fold_case {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    /// Check if a key was already handed out
    pub fn contains(&self, key: &str) -> bool {
        self.used.contains(&self.normalize(key))
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Node-path segment: trimmed, path separators replaced, placeholder when empty
pub fn sanitize_node_segment(name: Option<&str>) -> String {
    let Some(name) = name else {
        return PLACEHOLDER_NAME.to_string();
    };
    let segment = name.trim().replace(['/', '\\'], "_");
    if segment.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        segment
    }
}

/// File name safe on all platforms (Windows-reserved characters replaced)
pub fn sanitize_filename(name: &str) -> String {
    const UNSAFE: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
    let sanitized: String = name
        .chars()
        .map(|c| if UNSAFE.contains(&c) || c.is_control() { '_' } else { c })
        .collect();
    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        sanitized.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_collisions() {
        let mut keys = KeyAllocator::new();
        assert_eq!(keys.allocate("m:foo"), "m:foo");
        assert_eq!(keys.allocate("m:foo"), "m:foo:1");
        assert_eq!(keys.allocate("m:foo"), "m:foo:2");
        assert_eq!(keys.allocate("m:bar"), "m:bar");
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_allocate_skips_taken_suffix() {
        let mut keys = KeyAllocator::new();
        assert_eq!(keys.allocate("g:a:1"), "g:a:1");
        assert_eq!(keys.allocate("g:a"), "g:a");
        assert_eq!(keys.allocate("g:a"), "g:a:2");
    }

    #[test]
    fn test_allocation_is_deterministic() {
        let names = ["x", "y", "x", "x", "z", "y"];
        let run = || {
            let mut keys = KeyAllocator::new();
            names
                .iter()
                .map(|n| keys.allocate(&KeySource::Cad.base_key(n)))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_allocators_are_independent() {
        let mut first = KeyAllocator::new();
        let mut second = KeyAllocator::new();
        assert_eq!(first.allocate("cad:Body"), "cad:Body");
        assert_eq!(second.allocate("cad:Body"), "cad:Body");
        assert!(!second.contains("cad:Body:1"));
    }

    #[test]
    fn test_file_stem_allocation() {
        let mut stems = KeyAllocator::for_file_stems();
        assert_eq!(stems.allocate("Body"), "Body");
        assert_eq!(stems.allocate("Body"), "Body_1");
        assert_eq!(stems.allocate("body"), "body_2");
        // "a:1" and "a_1" sanitize to the same file name
        assert_eq!(stems.allocate(&sanitize_filename("a:1")), "a_1");
        assert_eq!(stems.allocate(&sanitize_filename("a_1")), "a_1_1");
        assert!(stems.contains("BODY_1"));
    }

    #[test]
    fn test_key_source() {
        assert_eq!(KeySource::for_document(DocumentKind::Brep), KeySource::Cad);
        assert_eq!(KeySource::for_document(DocumentKind::Mesh), KeySource::Mesh);
        assert_eq!(KeySource::for_document(DocumentKind::Scene), KeySource::Geometry);
        assert_eq!(KeySource::Mesh.base_key("foo"), "m:foo");
        assert_eq!(KeySource::Cad.base_key("Body001"), "cad:Body001");
    }

    #[test]
    fn test_sanitize_node_segment() {
        assert_eq!(sanitize_node_segment(Some("a/b\\c")), "a_b_c");
        assert_eq!(sanitize_node_segment(Some("  Bracket ")), "Bracket");
        assert_eq!(sanitize_node_segment(Some("")), "part");
        assert_eq!(sanitize_node_segment(None), "part");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Body:001"), "Body_001");
        assert_eq!(sanitize_filename("a<b>c|d?e*f\"g"), "a_b_c_d_e_f_g");
        assert_eq!(sanitize_filename(" spaced "), "spaced");
        assert_eq!(sanitize_filename("   "), "part");
    }
}
