//! Triangle soup with corner connectivity.
//!
//! [`Mesh`] stores triangles in parallel arrays indexed by slot: nine position
//! floats per triangle, one array per attribute, and a slot table holding the
//! generation and liveness of each slot. Removed slots are queued and reused
//! by later insertions, so slot indices of live triangles never move.
//!
//! Connectivity is a relation between triangle corners rather than between
//! shared vertices: any corner can be declared coincident with any other
//! corner through [`Mesh::attach_vertex`], and the relation is kept as
//! disjoint connection sets in a paged arena.
//!
//! # Thread Safety
//!
//! `Mesh` has no internal locking. Mutation needs `&mut Mesh`, so sharing a
//! mesh across threads requires an external lock.

use std::collections::{HashMap, VecDeque};

use nalgebra::{Point3, Vector3};

use super::attribute::{AttributeSchema, MeshBuilder};
use super::connection::{ConnectionSets, ConnectionStats};
use super::index::{Corner, MeshTag, Triangle, VertexKey};
use crate::error::{MeshError, Result};

/// Floats of position data per triangle.
pub(crate) const FLOATS_PER_TRIANGLE: usize = 9;

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    generation: u32,
    live: bool,
}

/// A soup of triangles with per-corner attributes and corner connectivity.
///
/// A clone keeps the identity of the original, so handles issued by one are
/// accepted by the other.
#[derive(Debug, Clone)]
pub struct Mesh {
    tag: MeshTag,
    schema: AttributeSchema,

    /// 9 floats per slot: xyz for corners A, B, C.
    pub(crate) positions: Vec<f64>,

    /// One array per attribute: `size * 3` floats per slot.
    pub(crate) attributes: Vec<Vec<f64>>,

    slots: Vec<Slot>,
    free_slots: VecDeque<u32>,
    next_slot: usize,
    live: usize,

    connections: ConnectionSets,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    /// Create an empty mesh without attributes.
    pub fn new() -> Self {
        Self::with_schema(AttributeSchema::default(), 1)
    }

    /// Start building a mesh with a custom attribute schema.
    pub fn builder() -> MeshBuilder {
        MeshBuilder::new()
    }

    pub(crate) fn with_schema(schema: AttributeSchema, capacity: usize) -> Self {
        let mut mesh = Self {
            tag: MeshTag::next(),
            attributes: vec![Vec::new(); schema.len()],
            schema,
            positions: Vec::new(),
            slots: Vec::new(),
            free_slots: VecDeque::new(),
            next_slot: 0,
            live: 0,
            connections: ConnectionSets::new(),
        };
        mesh.set_capacity(capacity.max(1));
        mesh
    }

    // ==================== Accessors ====================

    /// Number of live triangles.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the mesh holds no live triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of triangle slots currently backed by storage.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The attribute schema of this mesh.
    #[inline]
    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    /// Whether `t` is a live triangle of this mesh.
    pub fn contains(&self, t: Triangle) -> bool {
        t.mesh == self.tag
            && self
                .slots
                .get(t.index())
                .is_some_and(|slot| slot.live && slot.generation == t.generation)
    }

    pub(crate) fn validate(&self, t: Triangle) -> Result<()> {
        if self.contains(t) {
            Ok(())
        } else {
            Err(MeshError::InvalidTriangle { index: t.index() })
        }
    }

    /// Handle for a live slot.
    #[inline]
    pub(crate) fn handle(&self, index: usize) -> Triangle {
        Triangle {
            mesh: self.tag,
            index: index as u32,
            generation: self.slots[index].generation,
        }
    }

    #[inline]
    pub(crate) fn is_live_slot(&self, index: usize) -> bool {
        self.slots[index].live
    }

    /// Upper bound (exclusive) on slot indices ever handed out.
    #[inline]
    pub(crate) fn slot_limit(&self) -> usize {
        self.next_slot
    }

    // ==================== Storage ====================

    /// Make sure at least `capacity` triangle slots are backed by storage.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if capacity > self.capacity() {
            self.set_capacity(capacity);
        }
    }

    fn set_capacity(&mut self, capacity: usize) {
        log::debug!("mesh storage: {} -> {} triangles", self.capacity(), capacity);

        self.slots.resize(capacity, Slot::default());
        self.positions.resize(capacity * FLOATS_PER_TRIANGLE, 0.0);
        for (data, &size) in self.attributes.iter_mut().zip(self.schema.sizes()) {
            data.resize(capacity * 3 * size, 0.0);
        }
        self.connections.resize_keys(capacity * 3);
    }

    // ==================== Construction ====================

    /// Add a triangle and return its handle.
    ///
    /// A slot freed by [`remove_triangle`](Self::remove_triangle) is reused
    /// before a new one is appended. Positions and attributes of the new
    /// triangle are zero and its corners are connected to nothing.
    pub fn add_triangle(&mut self) -> Triangle {
        let index = match self.free_slots.pop_front() {
            Some(index) => index as usize,
            None => {
                let index = self.next_slot;
                self.next_slot += 1;
                index
            }
        };

        if index >= self.capacity() {
            let grown = (index + 1).next_power_of_two().max(2 * self.capacity());
            self.set_capacity(grown);
        }

        self.positions[index * FLOATS_PER_TRIANGLE..(index + 1) * FLOATS_PER_TRIANGLE].fill(0.0);
        for (data, &size) in self.attributes.iter_mut().zip(self.schema.sizes()) {
            data[index * 3 * size..(index + 1) * 3 * size].fill(0.0);
        }
        for corner in Corner::ALL {
            self.connections.reset_key(VertexKey::new(index, corner));
        }

        self.slots[index].live = true;
        self.live += 1;
        self.handle(index)
    }

    /// Remove a triangle.
    ///
    /// All three corners are detached from their connection sets before the
    /// slot is released. The slot's attribute data is left in place until the
    /// slot is reused.
    ///
    /// # Errors
    /// [`MeshError::InvalidTriangle`] if `t` is not a live triangle of this mesh.
    pub fn remove_triangle(&mut self, t: Triangle) -> Result<()> {
        self.validate(t)?;

        for corner in Corner::ALL {
            self.connections.detach(t.vertex(corner));
        }

        let slot = &mut self.slots[t.index()];
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push_back(t.index);
        self.live -= 1;
        Ok(())
    }

    // ==================== Connectivity ====================

    /// Declare corner `v1` of `t1` coincident with corner `v2` of `t2`.
    ///
    /// If both corners already belong to sets, the sets are merged. Attaching
    /// a corner to itself, or attaching an already connected pair, changes
    /// nothing.
    ///
    /// # Errors
    /// [`MeshError::InvalidTriangle`] if either handle is not live. Nothing is
    /// modified in that case.
    pub fn attach_vertex(&mut self, t1: Triangle, v1: Corner, t2: Triangle, v2: Corner) -> Result<()> {
        self.validate(t1)?;
        self.validate(t2)?;
        self.connections.attach(t1.vertex(v1), t2.vertex(v2));
        Ok(())
    }

    /// Remove corner `v` of `t` from its connection set, if it has one.
    ///
    /// # Errors
    /// [`MeshError::InvalidTriangle`] if `t` is not live.
    pub fn detach_vertex(&mut self, t: Triangle, v: Corner) -> Result<()> {
        self.validate(t)?;
        self.connections.detach(t.vertex(v));
        Ok(())
    }

    /// All other corners connected to corner `v` of `t`.
    ///
    /// # Errors
    /// [`MeshError::InvalidTriangle`] if `t` is not live.
    pub fn connected(&self, t: Triangle, v: Corner) -> Result<HashMap<Triangle, Corner>> {
        self.validate(t)?;
        Ok(self
            .connections
            .members(t.vertex(v))
            .map(|key| (self.handle(key.triangle_index()), key.corner()))
            .collect())
    }

    /// Whether two corners are in the same connection set.
    ///
    /// # Errors
    /// [`MeshError::InvalidTriangle`] if either handle is not live.
    pub fn is_connected(&self, t1: Triangle, v1: Corner, t2: Triangle, v2: Corner) -> Result<bool> {
        self.validate(t1)?;
        self.validate(t2)?;
        Ok(self.connections.are_connected(t1.vertex(v1), t2.vertex(v2)))
    }

    pub(crate) fn connected_keys(&self, key: VertexKey) -> impl Iterator<Item = VertexKey> + '_ {
        self.connections.members(key)
    }

    pub(crate) fn attach_keys(&mut self, a: VertexKey, b: VertexKey) {
        self.connections.attach(a, b);
    }

    /// Statistics about the connection arena.
    pub fn connection_stats(&self) -> ConnectionStats {
        self.connections.stats()
    }

    // ==================== Iteration ====================

    /// Iterate over handles of all live triangles in ascending slot order.
    ///
    /// Each call starts a fresh pass.
    pub fn triangles(&self) -> Triangles<'_> {
        Triangles {
            mesh: self,
            index: 0,
        }
    }

    // ==================== Geometry ====================

    /// Compute the axis-aligned bounding box of all live corners.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut bounds: Option<(Point3<f64>, Point3<f64>)> = None;

        let mut cursor = self.cursor();
        while cursor.advance() {
            for p in cursor.positions() {
                let (min, max) = bounds.get_or_insert((p, p));
                for i in 0..3 {
                    min[i] = min[i].min(p[i]);
                    max[i] = max[i].max(p[i]);
                }
            }
        }

        bounds
    }

    /// Total area of all live triangles.
    pub fn surface_area(&self) -> f64 {
        let mut area = 0.0;
        let mut cursor = self.cursor();
        while cursor.advance() {
            let [a, b, c] = cursor.positions();
            area += 0.5 * (b - a).cross(&(c - a)).norm();
        }
        area
    }

    /// Sum of unnormalized face normals. Zero for a closed, consistently wound surface.
    pub fn normal_sum(&self) -> Vector3<f64> {
        let mut sum = Vector3::zeros();
        let mut cursor = self.cursor();
        while cursor.advance() {
            let [a, b, c] = cursor.positions();
            sum += (b - a).cross(&(c - a));
        }
        sum
    }

    // ==================== Validation ====================

    /// Check that the internal bookkeeping is consistent.
    ///
    /// Every connected corner must be stored exactly once, in the set it maps
    /// to, and only live triangles may have connected corners.
    pub fn is_valid(&self) -> bool {
        if !self.connections.is_consistent() {
            return false;
        }

        let live = self.slots.iter().filter(|s| s.live).count();
        if live != self.live {
            return false;
        }

        // removed slots must be fully detached
        self.slots.iter().enumerate().all(|(index, slot)| {
            slot.live
                || Corner::ALL
                    .iter()
                    .all(|&c| self.connections.members(VertexKey::new(index, c)).next().is_none())
        })
    }
}

/// Iterator over handles of live triangles, in ascending slot order.
pub struct Triangles<'a> {
    mesh: &'a Mesh,
    index: usize,
}

impl Iterator for Triangles<'_> {
    type Item = Triangle;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.mesh.slot_limit() {
            let index = self.index;
            self.index += 1;
            if self.mesh.is_live_slot(index) {
                return Some(self.mesh.handle(index));
            }
        }
        None
    }
}
