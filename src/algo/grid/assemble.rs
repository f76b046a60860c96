//! The assembly pipeline: replicate, bridge seams, fill, validate.

use std::fmt;

use log::{debug, info};

use super::{expected_seam_count, replicate, AssemblyOptions};
use crate::algo::boundary::extract_boundaries;
use crate::algo::bridge::bridge;
use crate::algo::fill::fill_with;
use crate::algo::matching::match_boundaries;
use crate::algo::validate::{validate_signature, GridSpec, TopologySignature};
use crate::algo::Progress;
use crate::error::{Ambiguity, MeshError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Summary of an assembly run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Number of tile copies.
    pub tiles: usize,
    /// Boundary loops right after replication.
    pub boundaries_before: usize,
    /// Boundary loops left once every seam is bridged.
    pub boundaries_after: usize,
    /// Seams closed by bridging.
    pub seams_bridged: usize,
    /// Outer holes capped.
    pub holes_filled: usize,
    /// Genus and boundary count of the result.
    pub signature: TopologySignature,
}

impl fmt::Display for AssemblyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tiles:              {}", self.tiles)?;
        writeln!(f, "Boundaries before:  {}", self.boundaries_before)?;
        writeln!(f, "Seams bridged:      {}", self.seams_bridged)?;
        writeln!(f, "Boundaries after:   {}", self.boundaries_after)?;
        writeln!(f, "Holes filled:       {}", self.holes_filled)?;
        write!(f, "Result:             {}", self.signature)
    }
}

/// An assembled grid together with its report.
#[derive(Debug, Clone)]
pub struct Assembly<I: MeshIndex = u32> {
    /// The validated mesh.
    pub mesh: HalfEdgeMesh<I>,
    /// What was done to produce it.
    pub report: AssemblyReport,
}

/// Assemble a grid of tiles into one validated mesh.
///
/// See [`assemble_with_progress`].
pub fn assemble<I: MeshIndex>(
    tile: &HalfEdgeMesh<I>,
    spec: &GridSpec,
    options: &AssemblyOptions,
) -> Result<Assembly<I>> {
    assemble_with_progress(tile, spec, options, &Progress::none())
}

/// Assemble a grid of tiles into one validated mesh, reporting progress.
///
/// 1. Replicate the tile `size_x × size_y` times (a single tile is used as is).
/// 2. Match boundary loops by centroid; the number of pairs must equal the
///    number of seams in the grid.
/// 3. Bridge one pair at a time, extracting and matching afresh after each
///    bridge, until no pair is left.
/// 4. Cap every remaining hole if `spec.fill_holes()` is set.
/// 5. Check the genus and boundary count against `spec`.
///
/// # Errors
/// - [`MeshError::InvalidParameter`] if the grid has more than one tile and
///   no tolerance is set
/// - [`MeshError::ResolutionAmbiguous`] if matching is ambiguous or finds
///   the wrong number of seams
/// - [`MeshError::TopologyMismatch`] if the result has the wrong genus or
///   boundary count
/// - anything raised by the individual stages
pub fn assemble_with_progress<I: MeshIndex>(
    tile: &HalfEdgeMesh<I>,
    spec: &GridSpec,
    options: &AssemblyOptions,
    progress: &Progress,
) -> Result<Assembly<I>> {
    let (size_x, size_y) = (spec.size_x(), spec.size_y());
    let seams = expected_seam_count(size_x, size_y);
    let total = seams + 3;

    if options.tolerance.is_none() && seams > 0 {
        return Err(MeshError::invalid_param(
            "tolerance",
            "none",
            "required to identify seams between tiles",
        ));
    }

    progress.report(0, total, "Replicating tiles");
    let mut mesh = if spec.tile_count() > 1 {
        replicate(tile, size_x, size_y, &options.layout)?
    } else {
        tile.clone()
    };

    let loops = extract_boundaries(&mesh)?;
    let boundaries_before = loops.len();
    debug!("Boundaries after replication: {}", boundaries_before);

    // A lone tile has no seams; its own openings are never matched.
    let mut seams_bridged = 0;
    if let Some(tolerance) = options.tolerance.filter(|_| seams > 0) {
        let pairs = match_boundaries(&loops, tolerance)?;
        if pairs.len() != seams {
            return Err(MeshError::ResolutionAmbiguous(Ambiguity::UnexpectedPairCount {
                expected: seams,
                found: pairs.len(),
                loops: loops.len(),
            }));
        }
        info!("Identified {} seams among {} boundary loops", pairs.len(), loops.len());

        loop {
            let loops = extract_boundaries(&mesh)?;
            let pairs = match_boundaries(&loops, tolerance)?;
            let Some(&(a, b)) = pairs.first() else {
                break;
            };
            if seams_bridged == seams {
                return Err(MeshError::InvalidState(format!(
                    "pair {:?} still matches after all {} seams were bridged",
                    (a, b),
                    seams
                )));
            }
            progress.report(1 + seams_bridged, total, "Bridging seams");
            bridge(&mut mesh, &loops[a], &loops[b])?;
            seams_bridged += 1;
        }
    }

    let remaining = extract_boundaries(&mesh)?;
    let boundaries_after = remaining.len();
    debug!("Boundaries after bridging: {}", boundaries_after);

    progress.report(1 + seams, total, "Filling holes");
    let mut holes_filled = 0;
    if spec.fill_holes() {
        let mut holes = remaining;
        while let Some(hole) = holes.first() {
            fill_with(&mut mesh, hole, &options.fill)?;
            holes_filled += 1;
            holes = extract_boundaries(&mesh)?;
        }
        debug!("Filled {} holes", holes_filled);
    }

    progress.report(2 + seams, total, "Validating topology");
    let signature = validate_signature(&mesh, spec)?;
    progress.report(total, total, "Done");

    let report = AssemblyReport {
        tiles: spec.tile_count(),
        boundaries_before,
        boundaries_after,
        seams_bridged,
        holes_filled,
        signature,
    };
    info!(
        "Assembled {}x{} grid: {} seams bridged, {} holes filled, {}",
        size_x, size_y, seams_bridged, holes_filled, signature
    );
    Ok(Assembly { mesh, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fill::{FillOptions, FillStrategy};
    use crate::algo::grid::{GridLayout, TileFamily};
    use crate::mesh::primitives::cross_junction;
    use std::sync::{Arc, Mutex};

    fn run(size_x: usize, size_y: usize, fill: bool) -> Result<Assembly> {
        let tile: HalfEdgeMesh = cross_junction(3, 2.0)?;
        let family = TileFamily::CROSS_JUNCTION;
        let spec = family.grid_spec(size_x, size_y)?.with_fill_holes(fill);
        let options = AssemblyOptions::for_family(&family, GridLayout::abutting(&tile, 0.5)?);
        assemble(&tile, &spec, &options)
    }

    #[test]
    fn test_single_tile() {
        let assembly = run(1, 1, false).unwrap();
        assert_eq!(assembly.report.tiles, 1);
        assert_eq!(assembly.report.seams_bridged, 0);
        assert_eq!(assembly.report.signature, TopologySignature::new(0, 4));

        let filled = run(1, 1, true).unwrap();
        assert_eq!(filled.report.holes_filled, 4);
        assert_eq!(filled.report.signature, TopologySignature::new(0, 0));
    }

    #[test]
    fn test_lone_tile_openings_are_not_matched() {
        // The openings of a small tile sit well within the family tolerance
        // of each other; with no seams to find they must be left alone.
        let tile: HalfEdgeMesh = cross_junction(3, 0.5).unwrap();
        let family = TileFamily::CROSS_JUNCTION;
        let spec = family.grid_spec(1, 1).unwrap();
        let options = AssemblyOptions::for_family(&family, GridLayout::abutting(&tile, 0.5).unwrap());
        let openings = extract_boundaries(&tile).unwrap();
        assert!(match_boundaries(&openings, 1.0).is_err());

        let assembly = assemble(&tile, &spec, &options).unwrap();
        assert_eq!(assembly.report.seams_bridged, 0);
        assert_eq!(assembly.report.signature, TopologySignature::new(0, 4));
    }

    #[test]
    fn test_row_of_two() {
        let assembly = run(2, 1, false).unwrap();
        assert_eq!(assembly.report.boundaries_before, 8);
        assert_eq!(assembly.report.seams_bridged, 1);
        assert_eq!(assembly.report.boundaries_after, 6);
        assert_eq!(assembly.report.signature, TopologySignature::new(0, 6));
        assert!(assembly.mesh.is_valid());
    }

    #[test]
    fn test_square_closes_a_handle() {
        let assembly = run(2, 2, false).unwrap();
        assert_eq!(assembly.report.seams_bridged, 4);
        assert_eq!(assembly.report.signature, TopologySignature::new(1, 8));

        let filled = run(2, 2, true).unwrap();
        assert_eq!(filled.report.holes_filled, 8);
        assert_eq!(filled.report.signature, TopologySignature::new(1, 0));
    }

    #[test]
    fn test_three_by_two() {
        let assembly = run(3, 2, false).unwrap();
        assert_eq!(assembly.report.tiles, 6);
        assert_eq!(assembly.report.boundaries_before, 24);
        assert_eq!(assembly.report.seams_bridged, 7);
        assert_eq!(assembly.report.signature, TopologySignature::new(2, 10));

        let filled = run(3, 2, true).unwrap();
        assert_eq!(filled.report.signature, TopologySignature::new(2, 0));
    }

    #[test]
    fn test_fan_filling() {
        let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
        let spec = GridSpec::new(2, 1, 0).unwrap().with_fill_holes(true);
        let options = AssemblyOptions::new(GridLayout::abutting(&tile, 0.5).unwrap())
            .with_tolerance(1.0)
            .with_fill(FillOptions::default().with_strategy(FillStrategy::Fan));

        let assembly = assemble(&tile, &spec, &options).unwrap();
        assert_eq!(assembly.report.holes_filled, 6);
        assert_eq!(assembly.report.signature, TopologySignature::new(0, 0));
        assert!(assembly.mesh.face_ids().all(|f| assembly.mesh.face_degree(f) <= 4));
    }

    #[test]
    fn test_gap_beyond_tolerance_finds_no_seams() {
        let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
        let spec = GridSpec::new(2, 1, 0).unwrap();
        let options = AssemblyOptions::new(GridLayout::abutting(&tile, 3.0).unwrap()).with_tolerance(1.0);

        let err = assemble(&tile, &spec, &options).unwrap_err();
        assert_eq!(
            err,
            MeshError::ResolutionAmbiguous(Ambiguity::UnexpectedPairCount {
                expected: 1,
                found: 0,
                loops: 8,
            })
        );
    }

    #[test]
    fn test_wrong_base_genus_is_a_mismatch() {
        let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
        let spec = GridSpec::new(2, 1, 5).unwrap();
        let options = AssemblyOptions::new(GridLayout::abutting(&tile, 0.5).unwrap()).with_tolerance(1.0);

        assert!(matches!(
            assemble(&tile, &spec, &options),
            Err(MeshError::TopologyMismatch { .. })
        ));
    }

    #[test]
    fn test_tolerance_required_for_grids() {
        let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
        let spec = TileFamily::TUNNEL.grid_spec(2, 1).unwrap();
        let options = AssemblyOptions::for_family(
            &TileFamily::TUNNEL,
            GridLayout::abutting(&tile, 0.5).unwrap(),
        );
        assert!(matches!(
            assemble(&tile, &spec, &options),
            Err(MeshError::InvalidParameter { name: "tolerance", .. })
        ));
    }

    #[test]
    fn test_one_bridge_short_is_rejected() {
        let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
        let layout = GridLayout::abutting(&tile, 0.5).unwrap();
        let mut mesh = replicate(&tile, 2, 2, &layout).unwrap();

        let loops = extract_boundaries(&mesh).unwrap();
        let pairs = match_boundaries(&loops, 1.0).unwrap();
        assert_eq!(pairs.len(), 4);
        for _ in 0..3 {
            let loops = extract_boundaries(&mesh).unwrap();
            let pairs = match_boundaries(&loops, 1.0).unwrap();
            let (a, b) = pairs[0];
            bridge(&mut mesh, &loops[a], &loops[b]).unwrap();
        }

        let spec = GridSpec::new(2, 2, 0).unwrap();
        let err = validate_signature(&mesh, &spec).unwrap_err();
        assert_eq!(
            err,
            MeshError::TopologyMismatch {
                expected: TopologySignature::new(1, 8),
                observed: TopologySignature::new(0, 10),
            }
        );
    }

    #[test]
    fn test_progress_is_reported() {
        let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
        let spec = GridSpec::new(2, 1, 0).unwrap();
        let options = AssemblyOptions::new(GridLayout::abutting(&tile, 0.5).unwrap()).with_tolerance(1.0);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |current, total, _| {
            sink.lock().unwrap().push((current, total));
        });
        assemble_with_progress(&tile, &spec, &options, &progress).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.first(), Some(&(0, 4)));
        assert_eq!(seen.last(), Some(&(4, 4)));
        assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_report_display() {
        let report = run(2, 1, false).unwrap().report;
        let text = report.to_string();
        assert!(text.contains("Seams bridged:      1"));
        assert!(text.ends_with("genus 0 with 6 boundaries"));
    }
}
