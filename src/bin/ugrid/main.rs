//! ugrid CLI - UGRID mesh inspection and conversion tool.
//!
//! Usage: ugrid <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `ugrid --help` for available commands.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ugrid::algo::skin_volume;
use ugrid::io;
use ugrid::mesh::{self, Strictness, VolumeMesh};

#[derive(Parser)]
#[command(name = "ugrid")]
#[command(author, version, about = "UGRID mesh inspection and conversion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file (<name>.<tag>.ugrid)
        input: PathBuf,
    },

    /// Run integrity checks (degenerate elements, hanging nodes)
    Check {
        /// Input mesh file
        input: PathBuf,

        /// Warn about hanging nodes instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Convert between precisions and endiannesses
    ///
    /// The output layout is taken from the output filename's own
    /// format tag, e.g. `ugrid convert in.b8.ugrid out.lb4.ugrid`.
    Convert {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,
    },

    /// Re-derive the boundary skin from the volume elements
    Skin {
        /// Input mesh file
        input: PathBuf,

        /// Skip the integrity checks before skinning
        #[arg(long)]
        no_check: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ugrid::error::Result<()> {
    match cli.command {
        Commands::Info { input } => {
            let mesh = load_timed(&input)?;
            print_info(&mesh);
        }
        Commands::Check { input, lenient } => {
            let mesh = load_timed(&input)?;
            let strictness = if lenient {
                Strictness::Lenient
            } else {
                Strictness::Strict
            };
            mesh::check(&mesh, strictness)?;
            println!("ok");
        }
        Commands::Convert { input, output } => {
            let mesh = load_timed(&input)?;
            let start = Instant::now();
            io::save(&mesh, &output)?;
            println!(
                "wrote {} in {:.2}s",
                output.display(),
                start.elapsed().as_secs_f64()
            );
        }
        Commands::Skin { input, no_check } => {
            let mesh = load_timed(&input)?;
            if !no_check {
                mesh::check(&mesh, Strictness::Strict)?;
            }
            let start = Instant::now();
            let skin = skin_volume(&mesh)?;
            println!(
                "skinned {} volume elements in {:.2}s",
                mesh.num_volume_elements(),
                start.elapsed().as_secs_f64()
            );
            println!(
                "  tri faces:  {} boundary, {} interior",
                skin.num_boundary_tris(),
                skin.tri_faces.len() - skin.num_boundary_tris()
            );
            println!(
                "  quad faces: {} boundary, {} interior",
                skin.num_boundary_quads(),
                skin.quad_faces.len() - skin.num_boundary_quads()
            );
        }
    }
    Ok(())
}

fn load_timed(input: &Path) -> ugrid::error::Result<VolumeMesh> {
    let start = Instant::now();
    let mesh = io::load(input)?;
    eprintln!(
        "loaded {} in {:.2}s",
        input.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(mesh)
}

fn print_info(mesh: &VolumeMesh) {
    println!("nodes:      {}", mesh.num_nodes());
    println!("triangles:  {}", mesh.tris.len());
    println!("quads:      {}", mesh.quads.len());
    println!("tets:       {}", mesh.tets.len());
    println!("pyramids:   {}", mesh.pyramids.len());
    println!("prisms:     {}", mesh.prisms.len());
    println!("hexahedra:  {}", mesh.hexas.len());
    println!("surface:    {}", mesh.num_surface_elements());
    println!("volume:     {}", mesh.num_volume_elements());
}
