//! Per-triangle geometry and attribute access.
//!
//! Accessors that take a [`Triangle`] handle validate it first and fail with
//! [`MeshError::InvalidTriangle`](crate::error::MeshError::InvalidTriangle)
//! for stale or foreign handles. For tight loops over every triangle,
//! [`TriangleCursor`] reads the backing arrays directly without per-call
//! validation or allocation.

use nalgebra::{Point3, Vector3, Vector4};

use super::attribute::AttributeId;
use super::index::{Corner, Triangle, TriangleEdge, VertexKey};
use super::soup::{Mesh, FLOATS_PER_TRIANGLE};
use crate::error::Result;

#[inline]
fn position_offset(key: VertexKey) -> usize {
    key.index() * 3
}

impl Mesh {
    // ==================== Positions ====================

    /// Position of one corner.
    pub fn position(&self, t: Triangle, corner: Corner) -> Result<Point3<f64>> {
        self.validate(t)?;
        Ok(self.key_position(t.vertex(corner)))
    }

    /// All three corner positions in A, B, C order.
    pub fn positions(&self, t: Triangle) -> Result<[Point3<f64>; 3]> {
        self.validate(t)?;
        Ok(Corner::ALL.map(|c| self.key_position(t.vertex(c))))
    }

    /// Set the position of one corner. Connected corners are not moved.
    pub fn set_position(&mut self, t: Triangle, corner: Corner, p: &Point3<f64>) -> Result<()> {
        self.validate(t)?;
        self.set_key_position(t.vertex(corner), p);
        Ok(())
    }

    /// Set all three corner positions at once.
    pub fn set_positions(
        &mut self,
        t: Triangle,
        a: &Point3<f64>,
        b: &Point3<f64>,
        c: &Point3<f64>,
    ) -> Result<()> {
        self.validate(t)?;
        for (corner, p) in Corner::ALL.into_iter().zip([a, b, c]) {
            self.set_key_position(t.vertex(corner), p);
        }
        Ok(())
    }

    /// Set the position of one corner and of every corner connected to it.
    pub fn set_sticky_position(&mut self, t: Triangle, corner: Corner, p: &Point3<f64>) -> Result<()> {
        self.validate(t)?;
        let key = t.vertex(corner);
        let others: Vec<VertexKey> = self.connected_keys(key).collect();

        self.set_key_position(key, p);
        for other in others {
            self.set_key_position(other, p);
        }
        Ok(())
    }

    /// Unit normal of the triangle, counter-clockwise winding.
    ///
    /// Returns the zero vector for a degenerate triangle.
    pub fn normal(&self, t: Triangle) -> Result<Vector3<f64>> {
        let [a, b, c] = self.positions(t)?;
        let n = (b - a).cross(&(c - a));
        let len = n.norm();
        Ok(if len > 1e-300 { n / len } else { Vector3::zeros() })
    }

    /// Vector from the head to the tail of an edge.
    pub fn edge_vector(&self, t: Triangle, edge: TriangleEdge) -> Result<Vector3<f64>> {
        self.validate(t)?;
        let head = self.key_position(t.vertex(edge.head()));
        let tail = self.key_position(t.vertex(edge.tail()));
        Ok(tail - head)
    }

    #[inline]
    pub(crate) fn key_position(&self, key: VertexKey) -> Point3<f64> {
        let o = position_offset(key);
        Point3::new(self.positions[o], self.positions[o + 1], self.positions[o + 2])
    }

    #[inline]
    pub(crate) fn set_key_position(&mut self, key: VertexKey, p: &Point3<f64>) {
        let o = position_offset(key);
        self.positions[o..o + 3].copy_from_slice(p.coords.as_slice());
    }

    // ==================== Attributes ====================

    /// Look up an attribute by name.
    pub fn attribute_index(&self, name: &str) -> Option<AttributeId> {
        self.schema().id(name).ok()
    }

    /// Element size of an attribute.
    pub fn attribute_size(&self, id: AttributeId) -> Option<usize> {
        self.schema().size(id).ok()
    }

    /// Names of all attributes, in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> + '_ {
        self.schema().iter().map(|(_, name, _)| name)
    }

    /// Value of an attribute at one corner.
    ///
    /// Components beyond the attribute's element size are zero.
    pub fn attribute(&self, t: Triangle, attr: AttributeId, corner: Corner) -> Result<Vector4<f64>> {
        self.validate(t)?;
        let size = self.schema().size(attr)?;
        let key = t.vertex(corner);
        let data = &self.attributes[attr.index()][key.index() * size..(key.index() + 1) * size];

        let mut value = Vector4::zeros();
        value.as_mut_slice()[..size].copy_from_slice(data);
        Ok(value)
    }

    /// Set an attribute at one corner.
    ///
    /// Only the first `size` components of `value` are stored.
    pub fn set_attribute(
        &mut self,
        t: Triangle,
        attr: AttributeId,
        corner: Corner,
        value: &Vector4<f64>,
    ) -> Result<()> {
        self.validate(t)?;
        let size = self.schema().size(attr)?;
        let key = t.vertex(corner);
        self.attributes[attr.index()][key.index() * size..(key.index() + 1) * size]
            .copy_from_slice(&value.as_slice()[..size]);
        Ok(())
    }

    // ==================== Fast iteration ====================

    /// Create a cursor over all live triangles in ascending slot order.
    ///
    /// # Example
    ///
    /// ```
    /// use ferox_mesh::mesh::{Corner, Mesh};
    /// use nalgebra::Point3;
    ///
    /// let mut mesh = Mesh::new();
    /// let t = mesh.add_triangle();
    /// mesh.set_position(t, Corner::B, &Point3::new(1.0, 0.0, 0.0)).unwrap();
    ///
    /// let mut cursor = mesh.cursor();
    /// let mut sum = 0.0;
    /// while cursor.advance() {
    ///     sum += cursor.position(Corner::B).x;
    /// }
    /// assert_eq!(sum, 1.0);
    /// ```
    pub fn cursor(&self) -> TriangleCursor<'_> {
        TriangleCursor {
            mesh: self,
            next: 0,
            current: None,
        }
    }
}

/// Caller-owned cursor for allocation-free passes over a mesh.
///
/// Call [`advance`](Self::advance) to move to the next live triangle, then
/// read its data through the borrowing accessors. The accessors read the
/// mesh's backing arrays in place.
#[derive(Debug, Clone)]
pub struct TriangleCursor<'a> {
    mesh: &'a Mesh,
    next: usize,
    current: Option<usize>,
}

impl<'a> TriangleCursor<'a> {
    /// Move to the next live triangle. Returns `false` once exhausted.
    pub fn advance(&mut self) -> bool {
        while self.next < self.mesh.slot_limit() {
            let index = self.next;
            self.next += 1;
            if self.mesh.is_live_slot(index) {
                self.current = Some(index);
                return true;
            }
        }
        self.current = None;
        false
    }

    /// Handle of the current triangle, if positioned on one.
    pub fn triangle(&self) -> Option<Triangle> {
        self.current.map(|index| self.mesh.handle(index))
    }

    /// Rewind to before the first triangle.
    pub fn reset(&mut self) {
        self.next = 0;
        self.current = None;
    }

    #[inline]
    fn index(&self) -> usize {
        match self.current {
            Some(index) => index,
            None => panic!("cursor is not positioned on a triangle"),
        }
    }

    /// Raw `[x, y, z, x, y, z, x, y, z]` positions of the current triangle.
    ///
    /// # Panics
    /// Panics if the cursor is not positioned on a triangle.
    #[inline]
    pub fn raw_positions(&self) -> &'a [f64] {
        let start = self.index() * FLOATS_PER_TRIANGLE;
        &self.mesh.positions[start..start + FLOATS_PER_TRIANGLE]
    }

    /// Position of one corner of the current triangle.
    ///
    /// # Panics
    /// Panics if the cursor is not positioned on a triangle.
    #[inline]
    pub fn position(&self, corner: Corner) -> Point3<f64> {
        let o = corner.ordinal() * 3;
        let p = self.raw_positions();
        Point3::new(p[o], p[o + 1], p[o + 2])
    }

    /// All three corner positions of the current triangle.
    #[inline]
    pub fn positions(&self) -> [Point3<f64>; 3] {
        Corner::ALL.map(|c| self.position(c))
    }

    /// Attribute value at one corner of the current triangle, `size` floats long.
    ///
    /// # Panics
    /// Panics if the cursor is not positioned on a triangle or `attr` is not
    /// part of the mesh's schema.
    #[inline]
    pub fn attribute(&self, attr: AttributeId, corner: Corner) -> &'a [f64] {
        let size = self.mesh.schema().sizes()[attr.index()];
        let key = VertexKey::new(self.index(), corner).index();
        &self.mesh.attributes[attr.index()][key * size..(key + 1) * size]
    }
}
