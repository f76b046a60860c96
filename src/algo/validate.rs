//! Topology validation of assembled grids.
//!
//! The genus of an orientable surface with `b` boundary loops follows from
//! its Euler characteristic: `χ = V - E + F = 2 - 2g - b`. An assembled grid
//! of `size_x × size_y` tiles of genus `g₀` is expected to have genus
//! `g₀·size_x·size_y + (size_x - 1)(size_y - 1)`: every tile contributes its
//! own handles and every interior cell of the grid closes one more.

use std::fmt;

use log::debug;

use super::boundary::extract_boundaries;
use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Genus and boundary loop count of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopologySignature {
    /// Number of handles.
    pub genus: i64,
    /// Number of boundary loops.
    pub boundary_count: usize,
}

impl TopologySignature {
    /// Create a signature.
    pub fn new(genus: i64, boundary_count: usize) -> Self {
        Self { genus, boundary_count }
    }
}

impl fmt::Display for TopologySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "genus {} with {} boundaries", self.genus, self.boundary_count)
    }
}

/// Shape of a tile grid and whether its outer holes get capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    size_x: usize,
    size_y: usize,
    base_genus: u32,
    fill_holes: bool,
}

impl GridSpec {
    /// A grid of `size_x × size_y` tiles of genus `base_genus`, holes left open.
    ///
    /// # Errors
    /// [`MeshError::InvalidParameter`] if either size is zero.
    pub fn new(size_x: usize, size_y: usize, base_genus: u32) -> Result<Self> {
        if size_x == 0 {
            return Err(MeshError::invalid_param("size_x", size_x, "must be at least 1"));
        }
        if size_y == 0 {
            return Err(MeshError::invalid_param("size_y", size_y, "must be at least 1"));
        }
        Ok(Self {
            size_x,
            size_y,
            base_genus,
            fill_holes: false,
        })
    }

    /// Set whether the outer holes are capped after bridging.
    pub fn with_fill_holes(mut self, fill_holes: bool) -> Self {
        self.fill_holes = fill_holes;
        self
    }

    /// Tiles along x.
    #[inline]
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    /// Tiles along y.
    #[inline]
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Genus of a single tile.
    #[inline]
    pub fn base_genus(&self) -> u32 {
        self.base_genus
    }

    /// Whether outer holes get capped.
    #[inline]
    pub fn fill_holes(&self) -> bool {
        self.fill_holes
    }

    /// Number of tiles in the grid.
    pub fn tile_count(&self) -> usize {
        self.size_x * self.size_y
    }

    /// Signature the assembled grid must have.
    ///
    /// ```
    /// use tilestitch::algo::validate::{GridSpec, TopologySignature};
    ///
    /// let spec = GridSpec::new(2, 1, 5).unwrap();
    /// assert_eq!(spec.expected_signature(), TopologySignature::new(10, 6));
    /// ```
    pub fn expected_signature(&self) -> TopologySignature {
        let (sx, sy) = (self.size_x as i64, self.size_y as i64);
        let genus = i64::from(self.base_genus) * sx * sy + (sx - 1) * (sy - 1);
        let boundary_count = if self.fill_holes {
            0
        } else {
            2 * (self.size_x + self.size_y)
        };
        TopologySignature::new(genus, boundary_count)
    }
}

/// `V - E + F` over live elements.
pub fn euler_characteristic<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> i64 {
    mesh.num_vertices() as i64 - mesh.num_edges() as i64 + mesh.num_faces() as i64
}

/// Genus and boundary count of `mesh`, assuming it is one connected
/// orientable surface.
///
/// # Errors
/// - [`MeshError::EmptyMesh`] for a mesh without faces
/// - [`MeshError::MalformedTopology`] if the boundary cannot be extracted or
///   `2 - b - χ` is odd
pub fn observed_signature<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Result<TopologySignature> {
    if mesh.num_faces() == 0 {
        return Err(MeshError::EmptyMesh);
    }

    let boundary_count = extract_boundaries(mesh)?.len();
    let chi = euler_characteristic(mesh);
    let numerator = 2 - boundary_count as i64 - chi;
    if numerator % 2 != 0 {
        return Err(MeshError::malformed(format!(
            "Euler characteristic {} with {} boundaries gives a fractional genus",
            chi, boundary_count
        )));
    }

    Ok(TopologySignature::new(numerator / 2, boundary_count))
}

/// Check `mesh` against the grid it was assembled from and return the
/// observed signature.
///
/// # Errors
/// [`MeshError::TopologyMismatch`] if the signatures disagree, plus anything
/// [`observed_signature`] reports.
pub fn validate_signature<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    spec: &GridSpec,
) -> Result<TopologySignature> {
    let expected = spec.expected_signature();
    let observed = observed_signature(mesh)?;
    debug!("Topology: expected {}, observed {}", expected, observed);
    if expected != observed {
        return Err(MeshError::TopologyMismatch { expected, observed });
    }
    Ok(observed)
}

/// Check `mesh` against the grid it was assembled from.
///
/// # Errors
/// As [`validate_signature`].
pub fn validate<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, spec: &GridSpec) -> Result<()> {
    validate_signature(mesh, spec).map(|_| ())
}
