//! Boundary loop extraction.
//!
//! A boundary edge borders exactly one face. Its face-less side is walked
//! origin to destination, which strings the boundary edges of a well-formed
//! mesh into closed loops that run against the winding of the faces next to
//! them.
//!
//! Loops are stamped with the mesh revision they were extracted at. Any
//! mutation of the mesh makes them stale, and operations that consume loops
//! refuse stale ones with [`MeshError::StaleLoop`].

use std::collections::{HashMap, HashSet};

use log::debug;
use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

/// A closed loop of boundary edges.
#[derive(Debug, Clone)]
pub struct BoundaryLoop<I: MeshIndex = u32> {
    /// Face-less sides in walk order; side `k` ends where side `k + 1` starts.
    halfedges: Vec<HalfEdgeId<I>>,
    /// Origin of each side, in the same order.
    vertices: Vec<VertexId<I>>,
    centroid: Point3<f64>,
    revision: u64,
}

impl<I: MeshIndex> BoundaryLoop<I> {
    fn trace(mesh: &HalfEdgeMesh<I>, halfedges: Vec<HalfEdgeId<I>>) -> Self {
        let vertices: Vec<VertexId<I>> = halfedges.iter().map(|&he| mesh.origin(he)).collect();

        // Mean of one endpoint per edge. Not weighted by edge length: both
        // copies of a replicated seam carry the same bias and still coincide.
        let sum = vertices
            .iter()
            .fold(Vector3::zeros(), |acc, &v| acc + mesh.position(v).coords);
        let centroid = Point3::from(sum / vertices.len() as f64);

        Self {
            halfedges,
            vertices,
            centroid,
            revision: mesh.revision(),
        }
    }

    /// Number of edges (and vertices) in the loop.
    #[inline]
    pub fn len(&self) -> usize {
        self.halfedges.len()
    }

    /// Always false for extracted loops; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.halfedges.is_empty()
    }

    /// Face-less sides of the loop, in walk order.
    pub fn halfedges(&self) -> &[HalfEdgeId<I>] {
        &self.halfedges
    }

    /// Loop vertices; vertex `k` is the origin of side `k`.
    pub fn vertices(&self) -> &[VertexId<I>] {
        &self.vertices
    }

    /// Edges of the loop, in walk order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.halfedges.iter().map(|he| he.edge())
    }

    /// Representative point used for matching.
    #[inline]
    pub fn centroid(&self) -> Point3<f64> {
        self.centroid
    }

    /// Revision of the mesh this loop was extracted from.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the loop still describes the current state of `mesh`.
    #[inline]
    pub fn is_current(&self, mesh: &HalfEdgeMesh<I>) -> bool {
        self.revision == mesh.revision()
    }

    pub(crate) fn ensure_current(&self, mesh: &HalfEdgeMesh<I>) -> Result<()> {
        if self.is_current(mesh) {
            Ok(())
        } else {
            Err(MeshError::StaleLoop {
                loop_revision: self.revision,
                mesh_revision: mesh.revision(),
            })
        }
    }
}

/// Number of edges bordering exactly one face.
pub fn boundary_edge_count<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> usize {
    mesh.edge_ids().filter(|&e| mesh.is_boundary_edge(e)).count()
}

/// Extract every boundary loop of the mesh.
///
/// Loops are discovered in ascending edge order and each loop starts at its
/// lowest boundary edge, so the result is identical for identical mesh
/// states. Every boundary edge appears in exactly one loop.
///
/// # Errors
/// [`MeshError::MalformedTopology`] if a boundary vertex touches other than
/// exactly two boundary edges, or if neighbouring faces are wound so that a
/// boundary cannot be walked consistently.
///
/// # Example
/// ```
/// use tilestitch::algo::boundary::extract_boundaries;
/// use tilestitch::mesh::{build_from_quads, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh: HalfEdgeMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
///
/// let loops = extract_boundaries(&mesh).unwrap();
/// assert_eq!(loops.len(), 1);
/// assert_eq!(loops[0].len(), 4);
/// ```
pub fn extract_boundaries<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Result<Vec<BoundaryLoop<I>>> {
    let sides: Vec<HalfEdgeId<I>> = mesh.edge_ids().filter_map(|e| mesh.boundary_side(e)).collect();
    if sides.is_empty() {
        return Ok(Vec::new());
    }

    let mut degree: HashMap<VertexId<I>, usize> = HashMap::with_capacity(sides.len());
    for &he in &sides {
        *degree.entry(mesh.origin(he)).or_default() += 1;
        *degree.entry(mesh.dest(he)).or_default() += 1;
    }
    for &he in &sides {
        for v in [mesh.origin(he), mesh.dest(he)] {
            let d = degree[&v];
            if d != 2 {
                return Err(MeshError::malformed(format!(
                    "boundary vertex {:?} touches {} boundary edges (expected 2)",
                    v, d
                )));
            }
        }
    }

    let mut outgoing: HashMap<VertexId<I>, HalfEdgeId<I>> = HashMap::with_capacity(sides.len());
    for &he in &sides {
        let v = mesh.origin(he);
        if let Some(other) = outgoing.insert(v, he) {
            return Err(MeshError::malformed(format!(
                "boundary sides {:?} and {:?} both leave vertex {:?}; adjacent faces are wound inconsistently",
                other, he, v
            )));
        }
    }

    let mut visited: HashSet<HalfEdgeId<I>> = HashSet::with_capacity(sides.len());
    let mut loops = Vec::new();

    for &start in &sides {
        if visited.contains(&start) {
            continue;
        }

        let mut walk = Vec::new();
        let mut he = start;
        loop {
            visited.insert(he);
            walk.push(he);

            let next = outgoing.get(&mesh.dest(he)).copied().ok_or_else(|| {
                MeshError::malformed(format!("boundary walk from {:?} dead-ends at {:?}", start, he))
            })?;
            if next == start {
                break;
            }
            if visited.contains(&next) {
                return Err(MeshError::malformed(format!(
                    "boundary walk from {:?} rejoins another loop at {:?}",
                    start, next
                )));
            }
            he = next;
        }

        loops.push(BoundaryLoop::trace(mesh, walk));
    }

    debug!(
        "Extracted {} boundary loops from {} boundary edges, sizes: {:?}",
        loops.len(),
        sides.len(),
        loops.iter().map(BoundaryLoop::len).collect::<Vec<_>>()
    );

    Ok(loops)
}
