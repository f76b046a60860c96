//! Topology algorithms.
//!
//! - **Boundary**: extraction of boundary loops
//! - **Matching**: pairing loops by centroid distance
//! - **Bridge**: joining two loops with a quad strip
//! - **Fill**: capping holes
//! - **Validate**: genus and boundary count checks against a tile grid
//! - **Grid**: replication and the full assembly pipeline

pub mod boundary;
pub mod bridge;
pub mod fill;
pub mod grid;
pub mod matching;
pub mod progress;
pub mod validate;

pub use progress::Progress;
