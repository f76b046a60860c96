//! Error types for tilestitch.
//!
//! Every engine failure is a deterministic function of the input mesh and
//! configuration, so none of these errors are retried internally.

use thiserror::Error;

use crate::algo::validate::TopologySignature;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh construction and topology operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three vertices or repeats a vertex.
    #[error("face {face} is degenerate (fewer than 3 vertices or duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// The mesh violates the 2-manifold-with-boundary assumption.
    #[error("malformed topology: {details}")]
    MalformedTopology {
        /// Description of the violated condition.
        details: String,
    },

    /// Centroid matching produced an inconsistent pairing.
    #[error("boundary resolution is ambiguous: {0}")]
    ResolutionAmbiguous(Ambiguity),

    /// Two loops handed to the bridger have different edge counts.
    #[error("cannot bridge loops of different sizes ({first} edges vs {second} edges)")]
    BridgeMismatch {
        /// Edge count of the first loop.
        first: usize,
        /// Edge count of the second loop.
        second: usize,
    },

    /// The assembled mesh does not carry the predicted genus/boundary count.
    #[error("topology mismatch: expected {expected}, observed {observed}")]
    TopologyMismatch {
        /// Signature predicted from the grid configuration.
        expected: TopologySignature,
        /// Signature measured on the mesh.
        observed: TopologySignature,
    },

    /// A boundary loop was extracted before the latest mesh mutation.
    #[error("boundary loop from revision {loop_revision} used on mesh at revision {mesh_revision}")]
    StaleLoop {
        /// Revision the loop was extracted at.
        loop_revision: u64,
        /// Current revision of the mesh.
        mesh_revision: u64,
    },

    /// Invalid mesh state for the requested operation.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

/// The ways centroid matching can fail to resolve into disjoint seam pairs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Ambiguity {
    /// A loop lies within tolerance of more than one other loop.
    #[error("loop {loop_index} matches loops {partners:?}; tolerance is too large for the tile spacing")]
    MultiplePartners {
        /// Index of the over-matched loop.
        loop_index: usize,
        /// Indices of every loop it matched.
        partners: Vec<usize>,
    },

    /// The number of matched pairs differs from the number of grid seams.
    #[error("expected {expected} seam pairs but matched {found} among {loops} loops")]
    UnexpectedPairCount {
        /// Number of seams implied by the grid size.
        expected: usize,
        /// Number of pairs actually matched.
        found: usize,
        /// Number of boundary loops considered.
        loops: usize,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a malformed topology error.
    pub fn malformed(details: impl Into<String>) -> Self {
        MeshError::MalformedTopology {
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = MeshError::BridgeMismatch { first: 4, second: 6 };
        assert_eq!(
            err.to_string(),
            "cannot bridge loops of different sizes (4 edges vs 6 edges)"
        );

        let err = MeshError::ResolutionAmbiguous(Ambiguity::MultiplePartners {
            loop_index: 2,
            partners: vec![0, 5],
        });
        assert!(err.to_string().contains("loop 2 matches loops [0, 5]"));
    }

    #[test]
    fn test_topology_mismatch_display() {
        let err = MeshError::TopologyMismatch {
            expected: TopologySignature::new(10, 6),
            observed: TopologySignature::new(9, 8),
        };
        assert_eq!(
            err.to_string(),
            "topology mismatch: expected genus 10 with 6 boundaries, observed genus 9 with 8 boundaries"
        );
    }
}
