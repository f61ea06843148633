//! Weft CLI — headless cloth simulation and mesh validation.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "weft")]
#[command(version, about = "Weft — XPBD cloth simulation engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a drape simulation headless and report metrics.
    Drape {
        /// OBJ file to simulate; a procedural grid when omitted.
        #[arg(short, long)]
        mesh: Option<String>,

        /// Procedural grid resolution (quads per side).
        #[arg(short, long, default_value_t = 20)]
        resolution: usize,

        /// Mounting policy (corner, top_row, middle, unconstrained).
        #[arg(long, default_value = "top_row")]
        mount: String,

        /// Number of frames to simulate.
        #[arg(short, long, default_value_t = 120)]
        frames: u32,

        /// Fixed frame delta in seconds.
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// XPBD substeps per frame.
        #[arg(long, default_value_t = 20)]
        substeps: u32,

        /// Pace frames by wall clock instead of the fixed delta.
        #[arg(long)]
        realtime: bool,

        /// Run the solver on a background worker thread.
        #[arg(long)]
        threaded: bool,

        /// Write the final report as JSON to this path.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Load a mesh and report its topology.
    Validate {
        /// Path to an OBJ file.
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Drape {
            mesh,
            resolution,
            mount,
            frames,
            dt,
            substeps,
            realtime,
            threaded,
            output,
        } => commands::drape(commands::DrapeArgs {
            mesh,
            resolution,
            mount,
            frames,
            dt,
            substeps,
            realtime,
            threaded,
            output,
        }),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
