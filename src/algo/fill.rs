//! Hole filling.
//!
//! A boundary loop is capped either with a single polygon spanning the whole
//! loop or with a triangle fan. Both leave every edge of the loop with two
//! incident faces and add no new boundary edges.
//!
//! # Example
//!
//! ```
//! use tilestitch::algo::boundary::extract_boundaries;
//! use tilestitch::algo::fill::{fill_all, FillOptions, FillStrategy};
//! use tilestitch::mesh::{build_from_quads, HalfEdgeMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh: HalfEdgeMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
//!
//! let options = FillOptions::default().with_strategy(FillStrategy::Fan);
//! assert_eq!(fill_all(&mut mesh, &options).unwrap(), 1);
//! assert!(extract_boundaries(&mesh).unwrap().is_empty());
//! ```

use log::{debug, warn};

use super::boundary::{extract_boundaries, BoundaryLoop};
use crate::error::Result;
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// How a hole is capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillStrategy {
    /// One face with as many sides as the loop.
    #[default]
    Polygon,
    /// Triangles `[v0, vi, vi+1]` fanned out from the first loop vertex.
    ///
    /// Falls back to [`FillStrategy::Polygon`] when a fan chord would
    /// duplicate an existing edge.
    Fan,
}

/// Options for hole filling.
#[derive(Debug, Clone, Default)]
pub struct FillOptions {
    /// Capping strategy.
    pub strategy: FillStrategy,
}

impl FillOptions {
    /// Set the capping strategy.
    pub fn with_strategy(mut self, strategy: FillStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Cap a boundary loop with a single polygon.
///
/// The new face runs along the loop's face-less sides, so it is wound
/// consistently with its neighbours.
///
/// # Errors
/// [`MeshError::StaleLoop`](crate::error::MeshError::StaleLoop) if the loop
/// predates the last mutation of `mesh`.
pub fn fill<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, boundary: &BoundaryLoop<I>) -> Result<()> {
    fill_with(mesh, boundary, &FillOptions::default())
}

/// Cap a boundary loop using the given options.
///
/// # Errors
/// As [`fill`].
pub fn fill_with<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    boundary: &BoundaryLoop<I>,
    options: &FillOptions,
) -> Result<()> {
    boundary.ensure_current(mesh)?;
    let loop_vertices = boundary.vertices();
    let k = loop_vertices.len();

    let mut strategy = options.strategy;
    if strategy == FillStrategy::Fan && k > 3 {
        let v0 = loop_vertices[0];
        let blocked = loop_vertices[2..k - 1]
            .iter()
            .find(|&&v| mesh.find_halfedge(v0, v).is_some());
        if let Some(v) = blocked {
            warn!(
                "Fan chord {:?}-{:?} already exists, capping {}-edge hole with one polygon",
                v0, v, k
            );
            strategy = FillStrategy::Polygon;
        }
    }

    match strategy {
        FillStrategy::Polygon => {
            mesh.add_face(loop_vertices)?;
        }
        FillStrategy::Fan => {
            let v0 = loop_vertices[0];
            for i in 1..k - 1 {
                mesh.add_face(&[v0, loop_vertices[i], loop_vertices[i + 1]])?;
            }
        }
    }

    debug_assert!(mesh.is_valid());
    debug!("Filled {}-edge hole ({:?})", k, strategy);
    Ok(())
}

/// Cap every hole of the mesh. Returns the number of holes filled.
///
/// Boundaries are extracted afresh before each fill. Calling this on a
/// closed mesh does nothing and returns 0.
///
/// # Errors
/// Any error from [`extract_boundaries`] or [`fill_with`].
pub fn fill_all<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>, options: &FillOptions) -> Result<usize> {
    let mut filled = 0;
    while let Some(boundary) = extract_boundaries(mesh)?.into_iter().next() {
        fill_with(mesh, &boundary, options)?;
        filled += 1;
    }
    Ok(filled)
}
