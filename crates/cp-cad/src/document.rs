//! Loaded CAD document and the objects it owns

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bound_box::BoundBox;
use crate::kernel::{CadError, CadResult};

/// Where the objects of a document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentKind {
    /// B-rep CAD document (STEP/IGES); objects carry kernel-internal names
    #[default]
    Brep,
    /// Mesh file holding a single geometry
    Mesh,
    /// Mesh file holding several named geometries
    Scene,
}

/// Handle to a shape whose geometry is held by the kernel that loaded it
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Unique identifier (key into the kernel's shape store)
    pub id: Uuid,
    bound_box: Option<BoundBox>,
    null: bool,
}

impl Shape {
    /// Create a shape handle with a known bounding box
    pub fn new(id: Uuid, bound_box: BoundBox) -> Self {
        Self {
            id,
            bound_box: Some(bound_box),
            null: false,
        }
    }

    /// Create a shape handle for which the kernel could not compute bounds
    pub fn unbounded(id: Uuid) -> Self {
        Self {
            id,
            bound_box: None,
            null: false,
        }
    }

    /// Create a null shape (no geometry behind the handle)
    pub fn null() -> Self {
        Self {
            id: Uuid::nil(),
            bound_box: None,
            null: true,
        }
    }

    /// Check if the shape has no geometry
    pub fn is_null(&self) -> bool {
        self.null
    }

    /// Bounding box, if the kernel provided one
    pub fn bound_box(&self) -> Option<&BoundBox> {
        self.bound_box.as_ref()
    }
}

/// One entity of a loaded document
#[derive(Debug, Clone)]
pub struct DocumentObject {
    /// Internal unique name (stable within the document)
    pub name: String,
    /// Human label, if the source carries one
    pub label: Option<String>,
    /// Shape, if this object has geometry
    pub shape: Option<Shape>,
    /// Names of the objects that use this one
    in_list: CadResult<Vec<String>>,
}

impl DocumentObject {
    /// Create an object with no label, no shape and no referencing objects
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            shape: None,
            in_list: Ok(Vec::new()),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Set the names of the objects referencing this one
    pub fn with_in_list<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.in_list = Ok(names.into_iter().map(Into::into).collect());
        self
    }

    /// Mark the referencing-object list as unreadable
    pub fn with_broken_in_list(mut self, reason: impl Into<String>) -> Self {
        self.in_list = Err(CadError::LinkResolution(reason.into()));
        self
    }

    /// Objects that structurally use this one (back-references)
    pub fn in_list(&self) -> CadResult<&[String]> {
        match &self.in_list {
            Ok(names) => Ok(names),
            Err(e) => Err(e.clone()),
        }
    }

    /// Label if present and non-empty, otherwise the internal name
    pub fn display_name(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ => &self.name,
        }
    }
}

/// A loaded document: an ordered list of objects
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub name: String,
    pub kind: DocumentKind,
    objects: Vec<DocumentObject>,
}

impl Document {
    /// Create an empty document
    pub fn new(name: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            objects: Vec::new(),
        }
    }

    /// Append an object (document order is insertion order)
    pub fn push(&mut self, object: DocumentObject) {
        self.objects.push(object);
    }

    /// All objects in document order
    pub fn objects(&self) -> &[DocumentObject] {
        &self.objects
    }

    /// Find an object by internal name
    pub fn find(&self, name: &str) -> Option<&DocumentObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
