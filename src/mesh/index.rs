//! Index and handle types for mesh elements.
//!
//! Triangles are identified by lightweight [`Triangle`] handles that carry the
//! tag of the mesh that created them, the slot index into the mesh's parallel
//! arrays, and the generation of that slot. Corners of a triangle are named by
//! [`Corner`], and a specific corner of a specific triangle is packed into a
//! [`VertexKey`], which is the unit of connectivity.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU32, Ordering};

/// Sentinel for raw `u32` indices that point at nothing.
pub(crate) const INVALID: u32 = u32::MAX;

/// One of the three vertex slots of a triangle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Corner {
    /// The first corner.
    A,
    /// The second corner.
    B,
    /// The third corner.
    C,
}

impl Corner {
    /// All three corners in ordinal order.
    pub const ALL: [Corner; 3] = [Corner::A, Corner::B, Corner::C];

    /// The ordinal of this corner (0, 1 or 2).
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// The corner with the given ordinal.
    ///
    /// # Panics
    /// Panics if `ordinal > 2`.
    #[inline]
    pub fn from_ordinal(ordinal: usize) -> Corner {
        Corner::ALL[ordinal]
    }

    /// The edge that ends at this corner.
    pub fn incoming_edge(self) -> TriangleEdge {
        match self {
            Corner::A => TriangleEdge::CA,
            Corner::B => TriangleEdge::AB,
            Corner::C => TriangleEdge::BC,
        }
    }

    /// The edge that starts at this corner.
    pub fn outgoing_edge(self) -> TriangleEdge {
        match self {
            Corner::A => TriangleEdge::AB,
            Corner::B => TriangleEdge::BC,
            Corner::C => TriangleEdge::CA,
        }
    }
}

/// One of the three directed edges of a triangle, following the A -> B -> C winding.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TriangleEdge {
    /// From A to B.
    AB,
    /// From B to C.
    BC,
    /// From C to A.
    CA,
}

impl TriangleEdge {
    /// All three edges in winding order.
    pub const ALL: [TriangleEdge; 3] = [TriangleEdge::AB, TriangleEdge::BC, TriangleEdge::CA];

    /// The corner at the start of the edge.
    pub fn head(self) -> Corner {
        match self {
            TriangleEdge::AB => Corner::A,
            TriangleEdge::BC => Corner::B,
            TriangleEdge::CA => Corner::C,
        }
    }

    /// The corner at the end of the edge.
    pub fn tail(self) -> Corner {
        match self {
            TriangleEdge::AB => Corner::B,
            TriangleEdge::BC => Corner::C,
            TriangleEdge::CA => Corner::A,
        }
    }
}

/// Identity of the mesh a handle was created by.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct MeshTag(u32);

impl MeshTag {
    /// Hand out a tag no other live mesh in this process uses.
    pub(crate) fn next() -> Self {
        static NEXT_TAG: AtomicU32 = AtomicU32::new(0);
        MeshTag(NEXT_TAG.fetch_add(1, Ordering::Relaxed))
    }
}

/// A handle to a triangle stored in a [`Mesh`](super::Mesh).
///
/// A handle is a plain value: it does not borrow the mesh. It stays valid until
/// the triangle is removed; after that every mesh operation taking the handle
/// fails with [`MeshError::InvalidTriangle`](crate::error::MeshError::InvalidTriangle),
/// even if the slot has since been reused by a new triangle.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Triangle {
    pub(crate) mesh: MeshTag,
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Triangle {
    /// The slot index of this triangle in its mesh's backing arrays.
    ///
    /// Slot indices of live triangles never change, but a removed triangle's
    /// slot may be handed to a later triangle.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// The generation of the slot when this handle was created.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }

    /// The key of one corner of this triangle.
    #[inline]
    pub fn vertex(self, corner: Corner) -> VertexKey {
        VertexKey::new(self.index(), corner)
    }
}

impl Debug for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T({}#{})", self.index, self.generation)
    }
}

/// A type-safe vertex-of-triangle key: `triangle index * 3 + corner ordinal`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexKey(u32);

/// A type-safe index of a page in the connection arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub(crate) struct PageId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create an index from a raw value.
            #[inline]
            pub(crate) fn from_raw(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null index.
            #[inline]
            #[allow(dead_code)]
            pub(crate) fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }
    };
}

impl_index_type!(VertexKey, "VK");
impl_index_type!(PageId, "P");

impl VertexKey {
    /// Pack a triangle slot index and corner into a key.
    #[inline]
    pub fn new(triangle: usize, corner: Corner) -> Self {
        Self::from_raw(triangle * 3 + corner.ordinal())
    }

    /// The triangle slot index encoded in this key.
    #[inline]
    pub fn triangle_index(self) -> usize {
        self.index() / 3
    }

    /// The corner encoded in this key.
    #[inline]
    pub fn corner(self) -> Corner {
        Corner::from_ordinal(self.index() % 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_key_packing() {
        let key = VertexKey::new(42, Corner::C);
        assert_eq!(key.index(), 128);
        assert_eq!(key.triangle_index(), 42);
        assert_eq!(key.corner(), Corner::C);
        assert!(key.is_valid());

        let invalid = VertexKey::invalid();
        assert!(!invalid.is_valid());
    }

    #[test]
    fn test_corner_edges() {
        for corner in Corner::ALL {
            assert_eq!(corner.outgoing_edge().head(), corner);
            assert_eq!(corner.incoming_edge().tail(), corner);
        }
        assert_eq!(TriangleEdge::CA.head(), Corner::C);
        assert_eq!(TriangleEdge::CA.tail(), Corner::A);
    }

    #[test]
    fn test_mesh_tags_are_unique() {
        let a = MeshTag::next();
        let b = MeshTag::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", VertexKey::new(1, Corner::B)), "VK(4)");
        assert_eq!(format!("{:?}", PageId::invalid()), "P(INVALID)");
    }
}
