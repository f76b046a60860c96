//! Synthetic tiles.
//!
//! Real tiles come from the host application. The cross-junction tile here
//! has the same seam layout as the cave blocks (one open boundary per grid
//! side) and is used to drive the assembly pipeline without a host.

use std::collections::HashMap;

use nalgebra::Point3;

use super::builder::build_from_quads;
use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, MeshIndex};
use crate::error::{MeshError, Result};

/// A cube of edge length `size` centred at the origin, each side split into
/// `cells × cells` quads, with the centre quad of the ±X and ±Y sides removed.
///
/// The result is a genus-0 surface with four boundary loops of four edges,
/// centred at `(±size/2, 0, 0)` and `(0, ±size/2, 0)`. All quads are wound
/// counter-clockwise seen from outside.
///
/// # Errors
/// [`MeshError::InvalidParameter`] unless `cells` is odd and at least 3 and
/// `size` is positive.
///
/// # Example
/// ```
/// use tilestitch::mesh::{primitives::cross_junction, HalfEdgeMesh};
///
/// let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
/// assert_eq!(tile.num_faces(), 6 * 9 - 4);
/// ```
pub fn cross_junction<I: MeshIndex>(cells: usize, size: f64) -> Result<HalfEdgeMesh<I>> {
    if cells < 3 || cells % 2 == 0 {
        return Err(MeshError::invalid_param("cells", cells, "must be odd and at least 3"));
    }
    if !(size.is_finite() && size > 0.0) {
        return Err(MeshError::invalid_param("size", size, "must be positive"));
    }

    let n = cells;
    let centre = (n - 1) / 2;
    let mut lattice: HashMap<[usize; 3], usize> = HashMap::new();
    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(6 * n * n + 2);
    let mut faces: Vec<[usize; 4]> = Vec::with_capacity(6 * n * n);
    let mut openings: Vec<usize> = Vec::with_capacity(4);

    let mut vertex = |p: [usize; 3]| -> usize {
        *lattice.entry(p).or_insert_with(|| {
            vertices.push(Point3::new(
                (p[0] as f64 / n as f64 - 0.5) * size,
                (p[1] as f64 / n as f64 - 0.5) * size,
                (p[2] as f64 / n as f64 - 0.5) * size,
            ));
            vertices.len() - 1
        })
    };

    for axis in 0..3 {
        // (u, v, axis) is a right-handed frame.
        let u = (axis + 1) % 3;
        let v = (axis + 2) % 3;
        for side in [0, n] {
            for i in 0..n {
                for j in 0..n {
                    let mut corner = |di: usize, dj: usize| {
                        let mut p = [0usize; 3];
                        p[axis] = side;
                        p[u] = i + di;
                        p[v] = j + dj;
                        vertex(p)
                    };
                    let quad = if side == n {
                        [corner(0, 0), corner(1, 0), corner(1, 1), corner(0, 1)]
                    } else {
                        [corner(0, 0), corner(0, 1), corner(1, 1), corner(1, 0)]
                    };
                    if axis != 2 && i == centre && j == centre {
                        openings.push(faces.len());
                    }
                    faces.push(quad);
                }
            }
        }
    }

    let mut mesh = build_from_quads(&vertices, &faces)?;
    for f in openings {
        mesh.remove_face(FaceId::new(f))?;
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_junction_counts() {
        let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();

        assert_eq!(tile.num_vertices(), 56);
        assert_eq!(tile.num_edges(), 108);
        assert_eq!(tile.num_faces(), 50);
        let boundary = tile.edge_ids().filter(|&e| tile.is_boundary_edge(e)).count();
        assert_eq!(boundary, 16);
        assert!(tile.is_valid());
    }

    #[test]
    fn test_cross_junction_extent() {
        let tile: HalfEdgeMesh = cross_junction(5, 4.0).unwrap();
        let (min, max) = tile.bounding_box().unwrap();
        assert!((min - Point3::new(-2.0, -2.0, -2.0)).norm() < 1e-12);
        assert!((max - Point3::new(2.0, 2.0, 2.0)).norm() < 1e-12);
        // V = 6n^2 + 2, every vertex kept after opening the sides.
        assert_eq!(tile.num_vertices(), 152);
    }

    #[test]
    fn test_cross_junction_parameters() {
        assert!(cross_junction::<u32>(4, 1.0).is_err());
        assert!(cross_junction::<u32>(1, 1.0).is_err());
        assert!(cross_junction::<u32>(3, 0.0).is_err());
        assert!(cross_junction::<u32>(3, f64::NAN).is_err());
    }
}
