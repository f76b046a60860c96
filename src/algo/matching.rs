//! Centroid matching of boundary loops.
//!
//! Replicating a tile along a grid axis leaves the seam between two copies
//! as two coincident (or nearly coincident) boundary loops, one per copy.
//! They are recognised by comparing loop centroids against a per-tile-family
//! tolerance.

use log::debug;

use super::boundary::BoundaryLoop;
use crate::error::{Ambiguity, MeshError, Result};
use crate::mesh::MeshIndex;

/// All index pairs `(i, j)`, `i < j`, whose centroids are closer than
/// `tolerance`, in lexicographic order.
///
/// No consistency check is made; see [`match_boundaries`].
pub fn candidate_pairs<I: MeshIndex>(loops: &[BoundaryLoop<I>], tolerance: f64) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..loops.len() {
        for j in (i + 1)..loops.len() {
            let distance = (loops[i].centroid() - loops[j].centroid()).norm();
            if distance < tolerance {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Pair up boundary loops whose centroids are closer than `tolerance`.
///
/// Every pair of loops is tested. Each loop may appear in at most one pair;
/// a loop within tolerance of several others means the tolerance is too
/// large for the tile spacing and is reported rather than resolved.
///
/// # Errors
/// - [`MeshError::InvalidParameter`] if `tolerance` is not a positive number
/// - [`MeshError::StaleLoop`] if the loops come from different mesh revisions
/// - [`MeshError::ResolutionAmbiguous`] if a loop matches more than one other
pub fn match_boundaries<I: MeshIndex>(
    loops: &[BoundaryLoop<I>],
    tolerance: f64,
) -> Result<Vec<(usize, usize)>> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(MeshError::invalid_param("tolerance", tolerance, "must be positive"));
    }
    if let Some(first) = loops.first() {
        if let Some(other) = loops.iter().find(|l| l.revision() != first.revision()) {
            return Err(MeshError::StaleLoop {
                loop_revision: other.revision(),
                mesh_revision: first.revision(),
            });
        }
    }

    let pairs = candidate_pairs(loops, tolerance);

    let mut partners: Vec<Vec<usize>> = vec![Vec::new(); loops.len()];
    for &(i, j) in &pairs {
        partners[i].push(j);
        partners[j].push(i);
    }
    if let Some((loop_index, list)) = partners.iter().enumerate().find(|(_, p)| p.len() > 1) {
        return Err(MeshError::ResolutionAmbiguous(Ambiguity::MultiplePartners {
            loop_index,
            partners: list.clone(),
        }));
    }

    debug!("Matched {} boundary pairs: {:?}", pairs.len(), pairs);
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::boundary::extract_boundaries;
    use crate::mesh::{build_from_quads, HalfEdgeMesh};
    use nalgebra::Point3;

    /// Unit quads whose centres sit at the given x coordinates on the x axis.
    fn quads_at(xs: &[f64]) -> Vec<BoundaryLoop> {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for &x in xs {
            let base = vertices.len();
            vertices.push(Point3::new(x - 0.5, -0.5, 0.0));
            vertices.push(Point3::new(x + 0.5, -0.5, 0.0));
            vertices.push(Point3::new(x + 0.5, 0.5, 0.0));
            vertices.push(Point3::new(x - 0.5, 0.5, 0.0));
            faces.push([base, base + 1, base + 2, base + 3]);
        }
        let mesh: HalfEdgeMesh = build_from_quads(&vertices, &faces).unwrap();
        extract_boundaries(&mesh).unwrap()
    }

    #[test]
    fn test_disjoint_pairs() {
        let loops = quads_at(&[0.0, 0.3, 10.0, 10.2, 20.0]);
        let pairs = match_boundaries(&loops, 0.5).unwrap();
        assert_eq!(pairs, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_distance_must_be_strictly_below_tolerance() {
        let loops = quads_at(&[0.0, 1.0]);
        assert!(match_boundaries(&loops, 1.0).unwrap().is_empty());
        assert_eq!(match_boundaries(&loops, 1.0 + 1e-9).unwrap(), vec![(0, 1)]);
    }

    #[test]
    fn test_over_matching_is_ambiguous() {
        let loops = quads_at(&[0.0, 1.0, 2.0]);
        let err = match_boundaries(&loops, 1.5).unwrap_err();
        assert_eq!(
            err,
            MeshError::ResolutionAmbiguous(Ambiguity::MultiplePartners {
                loop_index: 1,
                partners: vec![0, 2],
            })
        );
        // The raw candidates are still available for diagnosis.
        assert_eq!(candidate_pairs(&loops, 1.5), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_invalid_tolerance() {
        let loops = quads_at(&[0.0, 0.1]);
        for tolerance in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                match_boundaries(&loops, tolerance),
                Err(MeshError::InvalidParameter { name: "tolerance", .. })
            ));
        }
    }

    #[test]
    fn test_mixed_revisions_are_refused() {
        let mut loops = quads_at(&[0.0, 0.1]);
        let other = quads_at(&[5.0]);
        loops.extend(other);
        assert!(matches!(
            match_boundaries(&loops, 0.5),
            Err(MeshError::StaleLoop { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let loops: Vec<BoundaryLoop> = Vec::new();
        assert!(match_boundaries(&loops, 1.0).unwrap().is_empty());
    }
}
