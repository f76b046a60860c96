//! Tilestitch CLI - tile grid assembly tool.
//!
//! Usage: tilestitch [-v] <COMMAND> [OPTIONS]
//!
//! Run `tilestitch --help` for available commands.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use tilestitch::algo::fill::{FillOptions, FillStrategy};
use tilestitch::algo::grid::{assemble_with_progress, AssemblyOptions, GridLayout, TileFamily};
use tilestitch::algo::Progress;
use tilestitch::mesh::primitives::cross_junction;
use tilestitch::mesh::HalfEdgeMesh;

#[derive(Parser)]
#[command(name = "tilestitch")]
#[command(author, version, about = "Tile grid assembly CLI", long_about = None)]
struct Cli {
    /// Log every pipeline stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the genus and boundary count a grid must end up with
    Expect {
        /// Tile family (cave, tunnel or cross-junction)
        #[arg(short, long, value_parser = parse_family)]
        family: TileFamily,

        /// Tiles along x
        #[arg(long, default_value = "1")]
        grid_size_x: usize,

        /// Tiles along y
        #[arg(long, default_value = "1")]
        grid_size_y: usize,

        /// Cap the outer holes
        #[arg(long)]
        fill_holes: bool,
    },

    /// Assemble a grid of synthetic cross-junction tiles
    Assemble {
        /// Quads per tile side (odd, at least 3)
        #[arg(long, default_value = "3")]
        cells: usize,

        /// Tile edge length
        #[arg(long, default_value = "2.0")]
        size: f64,

        /// Distance between neighbouring tiles
        #[arg(long, default_value = "0.5")]
        gap: f64,

        /// Tiles along x
        #[arg(long, default_value = "1")]
        grid_size_x: usize,

        /// Tiles along y
        #[arg(long, default_value = "1")]
        grid_size_y: usize,

        /// Cap the outer holes
        #[arg(long)]
        fill_holes: bool,

        /// How holes are capped
        #[arg(long, value_enum, default_value = "polygon")]
        fill_strategy: FillMethod,

        /// Seam matching tolerance (defaults to the family's)
        #[arg(short, long)]
        tolerance: Option<f64>,
    },
}

fn parse_family(name: &str) -> Result<TileFamily, String> {
    TileFamily::by_name(name).ok_or_else(|| {
        let known: Vec<&str> = TileFamily::ALL.iter().map(|family| family.name).collect();
        format!("unknown tile family '{}' (expected one of: {})", name, known.join(", "))
    })
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FillMethod {
    /// One polygon per hole
    Polygon,
    /// Triangle fan
    Fan,
}

impl From<FillMethod> for FillStrategy {
    fn from(method: FillMethod) -> Self {
        match method {
            FillMethod::Polygon => FillStrategy::Polygon,
            FillMethod::Fan => FillStrategy::Fan,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Expect {
            family,
            grid_size_x,
            grid_size_y,
            fill_holes,
        } => {
            cmd_expect(family, grid_size_x, grid_size_y, fill_holes)?;
        }

        Commands::Assemble {
            cells,
            size,
            gap,
            grid_size_x,
            grid_size_y,
            fill_holes,
            fill_strategy,
            tolerance,
        } => {
            cmd_assemble(
                cells,
                size,
                gap,
                (grid_size_x, grid_size_y),
                fill_holes,
                fill_strategy,
                tolerance,
            )?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // highest percent shown so far

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Never move backwards.
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }
        let percent = raw_percent.max(previous);

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<24}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_expect(
    family: TileFamily,
    size_x: usize,
    size_y: usize,
    fill_holes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec = family.grid_spec(size_x, size_y)?.with_fill_holes(fill_holes);

    println!("Family: {}", family.name);
    println!("Grid: {}x{}", size_x, size_y);
    match family.tolerance {
        Some(tolerance) => println!("Seam tolerance: {}", tolerance),
        None => println!("Seam tolerance: none"),
    }
    println!("Expected: {}", spec.expected_signature());

    Ok(())
}

fn cmd_assemble(
    cells: usize,
    size: f64,
    gap: f64,
    (size_x, size_y): (usize, usize),
    fill_holes: bool,
    fill_strategy: FillMethod,
    tolerance: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let family = TileFamily::CROSS_JUNCTION;
    let tile: HalfEdgeMesh = cross_junction(cells, size)?;
    let spec = family.grid_spec(size_x, size_y)?.with_fill_holes(fill_holes);

    let mut options = AssemblyOptions::for_family(&family, GridLayout::abutting(&tile, gap)?)
        .with_fill(FillOptions::default().with_strategy(fill_strategy.into()));
    if let Some(tolerance) = tolerance {
        options = options.with_tolerance(tolerance);
    }

    println!(
        "Tile: {} vertices, {} edges, {} faces",
        tile.num_vertices(),
        tile.num_edges(),
        tile.num_faces()
    );
    println!("Expected: {}", spec.expected_signature());

    let progress = create_progress();
    let start = Instant::now();
    let assembly = assemble_with_progress(&tile, &spec, &options, &progress)?;
    let elapsed = start.elapsed();

    println!("{}", assembly.report);
    println!(
        "Mesh: {} vertices, {} edges, {} faces",
        assembly.mesh.num_vertices(),
        assembly.mesh.num_edges(),
        assembly.mesh.num_faces()
    );
    println!("Time: {:.2?}", elapsed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_family() {
        assert_eq!(parse_family("cave"), Ok(TileFamily::CAVE));
        assert_eq!(parse_family("Cross_Junction"), Ok(TileFamily::CROSS_JUNCTION));

        let err = parse_family("castle").unwrap_err();
        assert!(err.contains("cave, tunnel, cross-junction"));
    }
}
