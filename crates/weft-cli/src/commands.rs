//! CLI command implementations.

use std::time::Instant;

use serde::Serialize;

use weft_engine::{FrameClock, PhysicsEngine, SimWorker};
use weft_mesh::generators::cloth_grid;
use weft_mesh::{ClothMesh, SpringSet};
use weft_solver::{MountPolicy, SolverConfig};
use weft_types::WeftResult;

/// Arguments for the drape command.
pub struct DrapeArgs {
    pub mesh: Option<String>,
    pub resolution: usize,
    pub mount: String,
    pub frames: u32,
    pub dt: f32,
    pub substeps: u32,
    pub realtime: bool,
    pub threaded: bool,
    pub output: Option<String>,
}

/// Final report from a drape run.
#[derive(Debug, Serialize)]
struct DrapeReport {
    particles: usize,
    springs: usize,
    mount: &'static str,
    frames: u32,
    substeps: u32,
    wall_time_seconds: f64,
    max_displacement: f32,
    lowest_point: f32,
    /// Not available in threaded mode (the worker publishes positions only).
    #[serde(skip_serializing_if = "Option::is_none")]
    max_speed: Option<f32>,
}

fn parse_mount(name: &str) -> Result<MountPolicy, Box<dyn std::error::Error>> {
    match name {
        "corner" => Ok(MountPolicy::Corner),
        "top_row" => Ok(MountPolicy::TopRow),
        "middle" => Ok(MountPolicy::Middle),
        "unconstrained" => Ok(MountPolicy::Unconstrained),
        other => Err(format!(
            "unknown mount policy: '{other}' (expected corner, top_row, middle, unconstrained)"
        )
        .into()),
    }
}

fn load_mesh(args: &DrapeArgs) -> WeftResult<ClothMesh> {
    match &args.mesh {
        Some(path) => weft_io::load_obj(path),
        None => Ok(cloth_grid(args.resolution, 1.0)),
    }
}

/// Run a headless drape simulation.
pub fn drape(args: DrapeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mount = parse_mount(&args.mount)?;
    let mesh = load_mesh(&args)?;

    let config = SolverConfig {
        mount,
        substeps: args.substeps,
        ..Default::default()
    };

    let rest_x = mesh.pos_x.clone();
    let rest_y = mesh.pos_y.clone();
    let rest_z = mesh.pos_z.clone();

    let engine = PhysicsEngine::new(&mesh, config)?;
    let particles = engine.particle_count();
    let spring_count = engine.springs().len();

    println!("Weft Drape");
    println!("──────────");
    println!(
        "Particles: {particles}  Springs: {spring_count}  Mount: {}",
        mount.name()
    );
    println!(
        "Frames: {}  dt: {}  Substeps: {}  Mode: {}{}",
        args.frames,
        args.dt,
        args.substeps,
        if args.realtime { "realtime" } else { "fixed" },
        if args.threaded { " (threaded)" } else { "" },
    );
    println!();

    let mut clock = FrameClock::new();
    let start = Instant::now();

    let (final_x, final_y, final_z, max_speed) = if args.threaded {
        let worker = SimWorker::spawn(engine)?;
        for _ in 0..args.frames {
            let dt = if args.realtime { clock.tick() } else { args.dt };
            worker.update(dt)?;
            worker.wait();
        }
        let (x, y, z) = worker.positions();
        (x, y, z, None)
    } else {
        let mut engine = engine;
        for _ in 0..args.frames {
            let dt = if args.realtime { clock.tick() } else { args.dt };
            engine.update(dt)?;
        }
        let (x, y, z) = engine.positions();
        let speed = engine.state().max_speed();
        (x.to_vec(), y.to_vec(), z.to_vec(), Some(speed))
    };

    let wall_time = start.elapsed().as_secs_f64();

    let mut max_displacement = 0.0f32;
    let mut lowest_point = f32::MAX;
    for i in 0..particles {
        let dx = final_x[i] - rest_x[i];
        let dy = final_y[i] - rest_y[i];
        let dz = final_z[i] - rest_z[i];
        max_displacement = max_displacement.max((dx * dx + dy * dy + dz * dz).sqrt());
        lowest_point = lowest_point.min(final_y[i]);
    }

    let report = DrapeReport {
        particles,
        springs: spring_count,
        mount: mount.name(),
        frames: args.frames,
        substeps: args.substeps,
        wall_time_seconds: wall_time,
        max_displacement,
        lowest_point,
        max_speed,
    };

    println!("Wall time:        {:.3} s", report.wall_time_seconds);
    println!("Max displacement: {:.4} m", report.max_displacement);
    println!("Lowest point:     {:.4} m", report.lowest_point);
    if let Some(speed) = report.max_speed {
        println!("Max speed:        {speed:.4} m/s");
    }

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)?;
        println!("Report written to {path}");
    }

    Ok(())
}

/// Load a mesh and report its topology.
pub fn validate(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = weft_io::load_obj(path)?;
    let springs = SpringSet::extract(&mesh)?;
    let side = weft_mesh::grid_side(mesh.particle_count())?;

    println!("Weft Validate");
    println!("─────────────");
    println!("Path:      {path}");
    println!("Particles: {} ({side}×{side} grid)", mesh.particle_count());
    println!("Triangles: {}", mesh.triangle_count());
    println!(
        "Springs:   {} (rest spacing {:.4} m)",
        springs.len(),
        springs.rest_spacing()
    );

    Ok(())
}
