//! Bridging of two boundary loops with a strip of quads.
//!
//! On an oriented mesh the open sides of two facing loops run in opposite
//! directions, so a consistently wound strip pairs the first loop forwards
//! with the second loop backwards. Only the rotation is free; it is chosen to
//! keep the connecting edges as short as possible.

use log::debug;

use super::boundary::BoundaryLoop;
use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex, VertexId};

/// Join two boundary loops with one quad per edge pair.
///
/// Afterwards every edge of both loops borders two faces and neither loop is
/// part of the boundary any more. The mesh gains `|first|` faces and
/// `|first|` edges; vertices are untouched.
///
/// # Errors
/// - [`MeshError::StaleLoop`] if either loop predates the last mutation
/// - [`MeshError::BridgeMismatch`] if the loops have different edge counts
/// - [`MeshError::InvalidState`] if the loops share a vertex or a connecting
///   edge already exists
///
/// Nothing is modified when an error is returned.
pub fn bridge<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    first: &BoundaryLoop<I>,
    second: &BoundaryLoop<I>,
) -> Result<()> {
    first.ensure_current(mesh)?;
    second.ensure_current(mesh)?;

    if first.len() != second.len() {
        return Err(MeshError::BridgeMismatch {
            first: first.len(),
            second: second.len(),
        });
    }

    let a = first.vertices();
    let b = second.vertices();
    if let Some(shared) = a.iter().find(|v| b.contains(v)) {
        return Err(MeshError::InvalidState(format!(
            "loops to bridge share vertex {:?}",
            shared
        )));
    }

    let k = a.len();
    let shift = best_rotation(mesh, a, b);
    let partner = |i: usize| b[(shift + k - i % k) % k];

    for (i, &v) in a.iter().enumerate() {
        let w = partner(i);
        if mesh.find_halfedge(v, w).is_some() {
            return Err(MeshError::InvalidState(format!(
                "connecting edge {:?}-{:?} already exists",
                v, w
            )));
        }
    }

    let faces_before = mesh.num_faces();
    for i in 0..k {
        mesh.add_face(&[a[i], a[(i + 1) % k], partner(i + 1), partner(i)])?;
    }

    debug_assert!(mesh.is_valid());
    debug_assert!(mesh.edge_ids().all(|e| mesh.edge_face_count(e) <= 2));
    debug_assert_eq!(mesh.num_faces(), faces_before + k);

    debug!(
        "Bridged two {}-edge loops (rotation {}), mesh now has {} faces",
        k,
        shift,
        mesh.num_faces()
    );
    Ok(())
}

/// Rotation `s` minimising the summed squared length of the connecting edges
/// `a[i] -- b[(s - i) mod k]`. Ties keep the smallest rotation.
fn best_rotation<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, a: &[VertexId<I>], b: &[VertexId<I>]) -> usize {
    let k = a.len();
    let mut best = (0, f64::INFINITY);
    for shift in 0..k {
        let cost: f64 = (0..k)
            .map(|i| (mesh.position(a[i]) - mesh.position(b[(shift + k - i) % k])).norm_squared())
            .sum();
        if cost < best.1 {
            best = (shift, cost);
        }
    }
    best.0
}
