//! Per-corner attribute schema.
//!
//! A mesh carries a fixed set of named float attributes (normals, texture
//! coordinates, colors, ...). Each attribute has an element size between 1
//! and 4 and stores one element per triangle corner. The schema is decided
//! when the mesh is built and cannot change afterwards.

use std::collections::HashMap;

use crate::error::{MeshError, Result};

/// Largest supported attribute element size.
pub const MAX_ATTRIBUTE_SIZE: usize = 4;

/// Index of an attribute within a mesh's schema.
///
/// Obtained from [`Mesh::attribute_id`](super::Mesh::attribute_id). Looking an
/// attribute up once and reusing the id avoids a hash lookup per access.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AttributeId(pub(crate) usize);

impl AttributeId {
    /// Position of the attribute in declaration order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Immutable description of a mesh's attributes, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct AttributeSchema {
    names: Vec<String>,
    sizes: Vec<usize>,
    lookup: HashMap<String, AttributeId>,
}

impl AttributeSchema {
    fn from_declarations(declared: Vec<(String, usize)>) -> Result<Self> {
        let mut schema = AttributeSchema::default();
        for (name, size) in declared {
            if size == 0 || size > MAX_ATTRIBUTE_SIZE {
                return Err(MeshError::InvalidAttributeSize { name, size });
            }
            if schema.lookup.contains_key(&name) {
                return Err(MeshError::DuplicateAttribute { name });
            }
            let id = AttributeId(schema.names.len());
            schema.lookup.insert(name.clone(), id);
            schema.names.push(name);
            schema.sizes.push(size);
        }
        Ok(schema)
    }

    /// Number of attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the schema declares no attributes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Look up an attribute by name.
    pub fn id(&self, name: &str) -> Result<AttributeId> {
        self.lookup
            .get(name)
            .copied()
            .ok_or_else(|| MeshError::unknown_attribute(name))
    }

    /// Element size of an attribute.
    pub fn size(&self, id: AttributeId) -> Result<usize> {
        self.sizes
            .get(id.0)
            .copied()
            .ok_or_else(|| MeshError::unknown_attribute(&format!("#{}", id.0)))
    }

    /// Name of an attribute.
    pub fn name(&self, id: AttributeId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    /// Iterate over `(id, name, element size)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeId, &str, usize)> + '_ {
        self.names
            .iter()
            .zip(&self.sizes)
            .enumerate()
            .map(|(i, (name, &size))| (AttributeId(i), name.as_str(), size))
    }

    #[inline]
    pub(crate) fn sizes(&self) -> &[usize] {
        &self.sizes
    }
}

/// Builder for a [`Mesh`](super::Mesh) with a custom attribute schema.
///
/// # Example
///
/// ```
/// use ferox_mesh::mesh::Mesh;
///
/// let mesh = Mesh::builder()
///     .attribute("normal", 3)
///     .attribute("uv", 2)
///     .capacity(64)
///     .build()
///     .unwrap();
///
/// assert_eq!(mesh.schema().len(), 2);
/// assert!(mesh.capacity() >= 64);
/// ```
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    attributes: Vec<(String, usize)>,
    capacity: usize,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self {
            attributes: Vec::new(),
            capacity: 1,
        }
    }
}

impl MeshBuilder {
    /// Create a builder with no attributes and room for one triangle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a per-corner attribute with the given element size (1 to 4).
    pub fn attribute(mut self, name: impl Into<String>, size: usize) -> Self {
        self.attributes.push((name.into(), size));
        self
    }

    /// Reserve storage for `capacity` triangles up front.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Build the mesh.
    ///
    /// Fails if an attribute size is outside `1..=4` or a name is repeated.
    pub fn build(self) -> Result<super::Mesh> {
        let schema = AttributeSchema::from_declarations(self.attributes)?;
        Ok(super::Mesh::with_schema(schema, self.capacity))
    }
}
