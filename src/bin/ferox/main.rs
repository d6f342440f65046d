//! Ferox CLI - point cloud hulls and triangle soup inspection.
//!
//! Usage: ferox <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `ferox --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

use ferox_mesh::algo::hull::{ConvexHull, HullOptions};
use ferox_mesh::algo::Progress;
use ferox_mesh::io;

#[derive(Parser)]
#[command(name = "ferox")]
#[command(author, version, about = "Convex hull and adjacency mesh CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display triangle soup information
    Info {
        /// Input mesh file (.ply or .stl)
        input: PathBuf,

        /// Connect corners closer than this distance before reporting
        #[arg(long)]
        weld: Option<f64>,
    },

    /// Compute the convex hull of a point cloud
    Hull {
        /// Input point cloud (.ply or .stl)
        input: PathBuf,

        /// Output file for the hull (.ply, or .stl with --faces)
        output: Option<PathBuf>,

        /// Clouds with at least this many points are wrapped in chunks
        #[arg(long, default_value = "10000")]
        divide_threshold: usize,

        /// Number of chunks for large clouds
        #[arg(long, default_value = "8")]
        divisions: usize,

        /// Reduce the hull to the support points of this many directions
        #[arg(long)]
        simplify: Option<usize>,

        /// Also write hull triangles, not just hull points
        #[arg(long)]
        faces: bool,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input, weld } => {
            cmd_info(&input, weld)?;
        }

        Commands::Hull {
            input,
            output,
            divide_threshold,
            divisions,
            simplify,
            faces,
            sequential,
        } => {
            let options = HullOptions {
                divide_threshold,
                divisions,
                parallel: !sequential,
            };
            cmd_hull(&input, output.as_deref(), &options, simplify, faces)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that keeps one status line on the terminal.
fn create_progress() -> Progress {
    let last = Arc::new(AtomicUsize::new(usize::MAX));

    Progress::new(move |current, total, message| {
        // redraw only when the count changes
        if last.swap(current, Ordering::Relaxed) == current {
            return;
        }
        eprint!("\r{} ({}/{})", message, current, total);
        let _ = std::io::stderr().flush();
    })
}

fn cmd_info(input: &Path, weld: Option<f64>) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = io::load_mesh(input)?;

    if let Some(tolerance) = weld {
        let welded = mesh.weld(tolerance)?;
        println!("Welded corners: {}", welded);
    }

    println!("File: {}", input.display());
    println!("Triangles: {}", mesh.len());
    println!("Capacity: {}", mesh.capacity());

    let stats = mesh.connection_stats();
    println!("Connection sets: {}", stats.sets);
    println!(
        "Connected corners: {} of {}",
        stats.connected_corners,
        mesh.len() * 3
    );
    println!(
        "Pages: {} live, {} free",
        stats.live_pages, stats.free_pages
    );

    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!("Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z);
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    Ok(())
}

fn cmd_hull(
    input: &Path,
    output: Option<&Path>,
    options: &HullOptions,
    simplify: Option<usize>,
    faces: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let points = io::load_points(input)?;
    println!("Loaded: {} points", points.len());

    let mode = if options.parallel { "parallel" } else { "sequential" };
    let progress = create_progress();

    let start = Instant::now();
    let mut hull = ConvexHull::construct_with_progress(&points, options, &progress)?;
    let elapsed = start.elapsed();
    eprintln!();
    println!(
        "Hull: {} points, {} faces ({:.2?}, {})",
        hull.len(),
        hull.faces().len(),
        elapsed,
        mode
    );

    if let Some(samples) = simplify {
        hull = hull.simplify(samples)?;
        println!("Simplified: {} points, {} faces", hull.len(), hull.faces().len());
    }

    if let Some(output) = output {
        if faces {
            io::save_mesh(&hull.to_mesh()?, output)?;
        } else {
            io::save_points(hull.points(), output)?;
        }
        println!("Saved: {}", output.display());
    }

    Ok(())
}
