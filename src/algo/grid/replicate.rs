//! Tile replication.

use log::debug;
use nalgebra::Point3;

use super::GridLayout;
use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, HalfEdgeMesh, MeshIndex};

/// Lay out `size_x × size_y` translated copies of `tile` in one mesh.
///
/// Copies are numbered with x varying fastest; copy `(i, j)` occupies
/// vertex range `(j * size_x + i) * V ..` of the result. Vertices of
/// different copies are never merged, even when they coincide.
///
/// # Errors
/// - [`MeshError::InvalidParameter`] if either size is zero
/// - [`MeshError::EmptyMesh`] if the tile has no faces
pub fn replicate<I: MeshIndex>(
    tile: &HalfEdgeMesh<I>,
    size_x: usize,
    size_y: usize,
    layout: &GridLayout,
) -> Result<HalfEdgeMesh<I>> {
    if size_x == 0 {
        return Err(MeshError::invalid_param("size_x", size_x, "must be at least 1"));
    }
    if size_y == 0 {
        return Err(MeshError::invalid_param("size_y", size_y, "must be at least 1"));
    }

    let (tile_vertices, tile_faces) = to_face_vertex(tile);
    if tile_faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let copies = size_x * size_y;
    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(tile_vertices.len() * copies);
    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(tile_faces.len() * copies);

    for j in 0..size_y {
        for i in 0..size_x {
            let base = vertices.len();
            let offset = layout.offset(i, j);
            vertices.extend(tile_vertices.iter().map(|p| p + offset));
            faces.extend(
                tile_faces
                    .iter()
                    .map(|face| face.iter().map(|&v| base + v).collect::<Vec<_>>()),
            );
        }
    }

    let mesh = build_from_polygons(&vertices, &faces)?;
    debug!(
        "Replicated tile into {}x{} grid: {} vertices, {} faces",
        size_x,
        size_y,
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::boundary::extract_boundaries;
    use crate::mesh::primitives::cross_junction;
    use crate::mesh::VertexId;
    use nalgebra::Vector3;

    #[test]
    fn test_copies_are_disjoint() {
        let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
        let layout = GridLayout::abutting(&tile, 0.5).unwrap();
        let grid = replicate(&tile, 3, 2, &layout).unwrap();

        assert_eq!(grid.num_vertices(), 6 * tile.num_vertices());
        assert_eq!(grid.num_edges(), 6 * tile.num_edges());
        assert_eq!(grid.num_faces(), 6 * tile.num_faces());
        assert_eq!(extract_boundaries(&grid).unwrap().len(), 24);
        assert!(grid.is_valid());
    }

    #[test]
    fn test_x_varies_fastest() {
        let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
        let layout = GridLayout::new(Vector3::new(10.0, 0.0, 0.0), Vector3::new(0.0, 20.0, 0.0));
        let grid = replicate(&tile, 2, 2, &layout).unwrap();

        let n = tile.num_vertices();
        let first = *tile.position(VertexId::new(0));
        // Copy (1, 0) is second, copy (0, 1) third.
        assert_eq!(*grid.position(VertexId::new(n)), first + Vector3::new(10.0, 0.0, 0.0));
        assert_eq!(*grid.position(VertexId::new(2 * n)), first + Vector3::new(0.0, 20.0, 0.0));
    }

    #[test]
    fn test_invalid_sizes() {
        let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
        let layout = GridLayout::abutting(&tile, 0.5).unwrap();
        assert!(replicate(&tile, 0, 2, &layout).is_err());
        assert!(replicate(&tile, 2, 0, &layout).is_err());

        let empty: HalfEdgeMesh = HalfEdgeMesh::new();
        assert_eq!(replicate(&empty, 1, 1, &layout).unwrap_err(), MeshError::EmptyMesh);
    }
}
