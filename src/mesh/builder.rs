//! Mesh construction utilities.
//!
//! Builds half-edge meshes from face-vertex lists, the form in which a host
//! application hands over its geometry, and converts them back.

use nalgebra::Point3;

use super::halfedge::HalfEdgeMesh;
use super::index::{MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and polygonal faces.
///
/// Faces are listed by vertex index in winding order and may have any number
/// of sides (at least three). All faces must be wound consistently.
///
/// # Errors
/// - [`MeshError::EmptyMesh`] if there are no faces
/// - [`MeshError::InvalidVertexIndex`] / [`MeshError::DegenerateFace`] for bad faces
/// - [`MeshError::MalformedTopology`] if an edge would border more than two
///   faces or two faces walk the same edge in the same direction
///
/// # Example
/// ```
/// use tilestitch::mesh::{build_from_polygons, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(2.0, 0.5, 0.0),
/// ];
/// let faces: Vec<Vec<usize>> = vec![vec![0, 1, 2, 3], vec![1, 4, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.num_edges(), 6);
/// ```
pub fn build_from_polygons<I, F>(vertices: &[Point3<f64>], faces: &[F]) -> Result<HalfEdgeMesh<I>>
where
    I: MeshIndex,
    F: AsRef<[usize]>,
{
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face.as_ref() {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len());
    let vertex_ids: Vec<VertexId<I>> = vertices.iter().map(|&p| mesh.add_vertex(p)).collect();

    let mut corners: Vec<VertexId<I>> = Vec::new();
    for (fi, face) in faces.iter().enumerate() {
        corners.clear();
        corners.extend(face.as_ref().iter().map(|&vi| vertex_ids[vi]));
        mesh.add_face(&corners).map_err(|err| match err {
            MeshError::MalformedTopology { details } => {
                MeshError::malformed(format!("face {}: {}", fi, details))
            }
            MeshError::DegenerateFace { .. } => MeshError::DegenerateFace { face: fi },
            other => other,
        })?;
    }

    Ok(mesh)
}

/// Build a half-edge mesh from vertices and triangle faces.
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    build_from_polygons(vertices, faces)
}

/// Build a half-edge mesh from vertices and quad faces (counter-clockwise).
pub fn build_from_quads<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 4]],
) -> Result<HalfEdgeMesh<I>> {
    build_from_polygons(vertices, faces)
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces). Vertex indices are unchanged; removed faces are
/// skipped.
pub fn to_face_vertex<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<Vec<usize>> = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| v.index()).collect())
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_quads() -> (Vec<Point3<f64>>, Vec<[usize; 4]>) {
        // Two quads sharing the edge 1-2
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2, 3], [1, 4, 5, 2]];
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_edges(), 3);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_two_quads() {
        let (vertices, faces) = two_quads();
        let mesh: HalfEdgeMesh<u32> = build_from_quads(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_edges(), 7);
        let boundary = mesh.edge_ids().filter(|&e| mesh.is_boundary_edge(e)).count();
        assert_eq!(boundary, 6);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_roundtrip_keeps_winding() {
        let (vertices, faces) = two_quads();
        let mesh: HalfEdgeMesh<u32> = build_from_quads(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);
        assert_eq!(out_verts, vertices);
        assert_eq!(out_faces, vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]]);
    }

    #[test]
    fn test_empty_and_invalid_input() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let no_faces: Vec<[usize; 3]> = Vec::new();
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &no_faces);
        assert_eq!(result.unwrap_err(), MeshError::EmptyMesh);

        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &[[0, 1, 2]]);
        assert_eq!(
            result.unwrap_err(),
            MeshError::InvalidVertexIndex { face: 0, vertex: 1 }
        );
    }

    #[test]
    fn test_non_manifold_fan_is_rejected() {
        // Three triangles hinged on the edge 0-1.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        let err = build_from_triangles::<u32>(&vertices, &faces).unwrap_err();
        match err {
            MeshError::MalformedTopology { details } => assert!(details.starts_with("face 2:")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_polygon_reports_input_index() {
        let (vertices, _) = two_quads();
        let faces: Vec<Vec<usize>> = vec![vec![0, 1, 2, 3], vec![4, 5]];
        let err = build_from_polygons::<u32, _>(&vertices, &faces).unwrap_err();
        assert_eq!(err, MeshError::DegenerateFace { face: 1 });
    }
}
