//! Half-edge arena for polygon meshes with boundary.
//!
//! # Structure
//!
//! - Every edge is stored as two **half-edges** allocated next to each other,
//!   so edge `e` owns half-edges `2e` and `2e + 1` and the twin of a half-edge
//!   is found by flipping the lowest bit.
//! - A half-edge that belongs to a face knows its `next` and `prev` around
//!   that face. A half-edge with no face is a **boundary side**; it has no
//!   `next`/`prev` and boundary loops are recovered by
//!   [`extract_boundaries`](crate::algo::boundary::extract_boundaries).
//! - Faces are arbitrary polygons with at least three sides.
//!
//! Because each edge has exactly two sides, an edge carries one face
//! (boundary edge) or two faces (interior edge) and nothing else can be
//! represented: giving an edge a third face, or walking a directed edge that
//! is already used, is rejected by [`HalfEdgeMesh::add_face`].
//!
//! # Revisions
//!
//! Every mutation stamps the mesh with a fresh revision drawn from a
//! process-wide counter. Derived data such as boundary loops records the
//! revision it was computed at and is refused once the mesh moves on.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::Point3;

use super::index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn fresh_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// A vertex in the mesh. Positions are fixed once inserted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,
}

impl Vertex {
    /// Create a vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self { position }
    }
}

/// One directed side of an edge.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge leaves from. Null once the edge is removed.
    pub origin: VertexId<I>,

    /// The next half-edge around the face. Null on boundary sides.
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face. Null on boundary sides.
    pub prev: HalfEdgeId<I>,

    /// The face on this side. Null on boundary sides.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    fn unattached(origin: VertexId<I>) -> Self {
        Self {
            origin,
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }

    /// Whether no face lies on this side.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

/// A polygonal face.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// One half-edge on the face. Null once the face is removed.
    pub halfedge: HalfEdgeId<I>,
}

/// A polygon mesh with boundary, stored as a half-edge arena.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) halfedges: Vec<HalfEdge<I>>,
    pub(crate) faces: Vec<Face<I>>,

    /// Directed vertex pair to the half-edge walking it.
    directed: HashMap<(VertexId<I>, VertexId<I>), HalfEdgeId<I>>,

    live_edges: usize,
    live_faces: usize,
    revision: u64,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // Quad-dominant meshes: E ~ 2F, two half-edges per edge.
        let num_edges = num_faces * 2 + num_faces / 4;

        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_edges * 2),
            faces: Vec::with_capacity(num_faces),
            directed: HashMap::with_capacity(num_edges * 2),
            live_edges: 0,
            live_faces: 0,
            revision: fresh_revision(),
        }
    }

    // ==================== Counts ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of live edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.live_edges
    }

    /// Number of live faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.live_faces
    }

    /// Revision stamp of the current mesh state.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ==================== Element access ====================

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Whether the edge exists and has not been removed.
    #[inline]
    pub fn contains_edge(&self, e: EdgeId<I>) -> bool {
        let [h0, _] = e.halfedges();
        h0.index() < self.halfedges.len() && self.origin(h0).is_valid()
    }

    /// Whether the face exists and has not been removed.
    #[inline]
    pub fn contains_face(&self, f: FaceId<I>) -> bool {
        f.index() < self.faces.len() && self.face(f).halfedge.is_valid()
    }

    // ==================== Half-edge queries ====================

    /// Origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(he.twin())
    }

    /// Next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Face on this side of the edge (null for a boundary side).
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Whether no face lies on this side of the edge.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Find the half-edge walking from `from` to `to`, if that edge exists.
    #[inline]
    pub fn find_halfedge(&self, from: VertexId<I>, to: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.directed.get(&(from, to)).copied()
    }

    // ==================== Edge queries ====================

    /// The two endpoints of an edge.
    #[inline]
    pub fn edge_vertices(&self, e: EdgeId<I>) -> [VertexId<I>; 2] {
        let [h0, h1] = e.halfedges();
        [self.origin(h0), self.origin(h1)]
    }

    /// Faces incident to an edge (one for boundary edges, two otherwise).
    pub fn edge_faces(&self, e: EdgeId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        e.halfedges()
            .into_iter()
            .map(|he| self.face_of(he))
            .filter(|f| f.is_valid())
    }

    /// Number of faces incident to an edge.
    #[inline]
    pub fn edge_face_count(&self, e: EdgeId<I>) -> usize {
        self.edge_faces(e).count()
    }

    /// Whether the edge borders exactly one face.
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        self.edge_face_count(e) == 1
    }

    /// The face-less side of a boundary edge.
    pub fn boundary_side(&self, e: EdgeId<I>) -> Option<HalfEdgeId<I>> {
        let [h0, h1] = e.halfedges();
        match (self.is_boundary_halfedge(h0), self.is_boundary_halfedge(h1)) {
            (true, false) => Some(h0),
            (false, true) => Some(h1),
            _ => None,
        }
    }

    // ==================== Face queries ====================

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Iterate over vertices of a face, in winding order.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Iterate over edges of a face, in winding order.
    pub fn face_edges(&self, f: FaceId<I>) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.face_halfedges(f).map(|he| he.edge())
    }

    /// Number of sides of a face.
    pub fn face_degree(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over live edge IDs in ascending order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.halfedges.len() / 2)
            .map(EdgeId::new)
            .filter(move |&e| self.contains_edge(e))
    }

    /// Iterate over live face IDs in ascending order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len())
            .map(FaceId::new)
            .filter(move |&f| self.contains_face(f))
    }

    /// Axis-aligned bounding box of all vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Mutation ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        self.revision = fresh_revision();
        id
    }

    /// Add a polygonal face through the given vertices (in winding order).
    ///
    /// Existing boundary sides are reused and new edges are created for
    /// vertex pairs that are not yet connected. The whole face is checked
    /// before anything is written, so on error the mesh is unchanged.
    ///
    /// # Errors
    /// - [`MeshError::DegenerateFace`] for fewer than three or repeated vertices
    /// - [`MeshError::InvalidVertexIndex`] for unknown vertices
    /// - [`MeshError::MalformedTopology`] if a side is already taken, which
    ///   means the edge would get a third face or the winding is inconsistent
    pub fn add_face(&mut self, vertices: &[VertexId<I>]) -> Result<FaceId<I>> {
        let slot = self.faces.len();
        let n = vertices.len();
        if n < 3 {
            return Err(MeshError::DegenerateFace { face: slot });
        }

        for (i, &v) in vertices.iter().enumerate() {
            if !v.is_valid() || v.index() >= self.vertices.len() {
                return Err(MeshError::InvalidVertexIndex {
                    face: slot,
                    vertex: v.index(),
                });
            }
            if vertices[..i].contains(&v) {
                return Err(MeshError::DegenerateFace { face: slot });
            }
        }

        let mut sides: Vec<Option<HalfEdgeId<I>>> = Vec::with_capacity(n);
        for i in 0..n {
            let (u, v) = (vertices[i], vertices[(i + 1) % n]);
            match self.find_halfedge(u, v) {
                Some(he) if !self.is_boundary_halfedge(he) => {
                    let details = if self.is_boundary_halfedge(he.twin()) {
                        format!("side {:?}->{:?} is already used; face winding is inconsistent", u, v)
                    } else {
                        format!("edge {:?}-{:?} would get more than two incident faces", u, v)
                    };
                    return Err(MeshError::malformed(details));
                }
                existing => sides.push(existing),
            }
        }

        let face = FaceId::new(slot);
        let hes: Vec<HalfEdgeId<I>> = sides
            .into_iter()
            .enumerate()
            .map(|(i, side)| side.unwrap_or_else(|| self.push_edge(vertices[i], vertices[(i + 1) % n])))
            .collect();

        for i in 0..n {
            let he = &mut self.halfedges[hes[i].index()];
            he.face = face;
            he.next = hes[(i + 1) % n];
            he.prev = hes[(i + n - 1) % n];
        }

        self.faces.push(Face { halfedge: hes[0] });
        self.live_faces += 1;
        self.revision = fresh_revision();
        Ok(face)
    }

    /// Remove a face. Edges left without any face are removed as well;
    /// vertices are kept.
    pub fn remove_face(&mut self, f: FaceId<I>) -> Result<()> {
        if !self.contains_face(f) {
            return Err(MeshError::InvalidState(format!("face {:?} does not exist", f)));
        }

        let hes: Vec<HalfEdgeId<I>> = self.face_halfedges(f).collect();
        for &he in &hes {
            let side = &mut self.halfedges[he.index()];
            side.face = FaceId::invalid();
            side.next = HalfEdgeId::invalid();
            side.prev = HalfEdgeId::invalid();
        }
        for &he in &hes {
            if self.is_boundary_halfedge(he.twin()) {
                self.drop_edge(he.edge());
            }
        }

        self.faces[f.index()].halfedge = HalfEdgeId::invalid();
        self.live_faces -= 1;
        self.revision = fresh_revision();
        Ok(())
    }

    fn push_edge(&mut self, from: VertexId<I>, to: VertexId<I>) -> HalfEdgeId<I> {
        let forward = HalfEdgeId::new(self.halfedges.len());
        self.halfedges.push(HalfEdge::unattached(from));
        self.halfedges.push(HalfEdge::unattached(to));
        self.directed.insert((from, to), forward);
        self.directed.insert((to, from), forward.twin());
        self.live_edges += 1;
        forward
    }

    fn drop_edge(&mut self, e: EdgeId<I>) {
        let [a, b] = self.edge_vertices(e);
        self.directed.remove(&(a, b));
        self.directed.remove(&(b, a));
        for he in e.halfedges() {
            self.halfedges[he.index()].origin = VertexId::invalid();
        }
        self.live_edges -= 1;
    }

    // ==================== Validation ====================

    /// Check that all connectivity is consistent.
    ///
    /// Every live face must form a closed `next`/`prev` cycle of at least
    /// three sides pointing back at the face, every live edge must border one
    /// or two faces, and the directed-edge index must agree with the arena.
    pub fn is_valid(&self) -> bool {
        for f in self.face_ids() {
            let start = self.face(f).halfedge;
            let mut he = start;
            let mut sides = 0usize;
            loop {
                let h = self.halfedge(he);
                if h.face != f || !h.origin.is_valid() || !h.next.is_valid() {
                    return false;
                }
                if self.prev(h.next) != he || self.origin(h.next) != self.dest(he) {
                    return false;
                }
                sides += 1;
                if sides > self.halfedges.len() {
                    return false;
                }
                he = h.next;
                if he == start {
                    break;
                }
            }
            if sides < 3 {
                return false;
            }
        }

        let mut live = 0usize;
        for e in self.edge_ids() {
            live += 1;
            let faces = self.edge_face_count(e);
            if faces == 0 || faces > 2 {
                return false;
            }
            let [a, b] = self.edge_vertices(e);
            let [h0, h1] = e.halfedges();
            if a == b
                || self.find_halfedge(a, b) != Some(h0)
                || self.find_halfedge(b, a) != Some(h1)
            {
                return false;
            }
        }

        live == self.live_edges && self.directed.len() == 2 * live
    }
}

/// Iterator over half-edges around a face.
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, f: FaceId<I>) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a, I: MeshIndex> Iterator for FaceHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start || !self.current.is_valid() {
            self.done = true;
        }

        Some(result)
    }
}
