//! Integration tests for weft-engine.

use weft_engine::{FrameClock, PhysicsEngine, SimWorker};
use weft_mesh::generators::cloth_grid;
use weft_mesh::ClothMesh;
use weft_solver::{MountPolicy, SolverConfig};
use weft_types::WeftError;

fn free_fall_config() -> SolverConfig {
    SolverConfig {
        mount: MountPolicy::Unconstrained,
        ..Default::default()
    }
}

// ─── Engine Construction ──────────────────────────────────────

#[test]
fn engine_builds_from_grid() {
    let mesh = cloth_grid(2, 1.0);
    let engine = PhysicsEngine::new(&mesh, SolverConfig::default()).unwrap();
    assert_eq!(engine.particle_count(), 9);
    assert_eq!(engine.springs().len(), 12);
    // radius = rest_spacing / 3 = 0.5 / 3
    assert!((engine.collision_radius() - 0.5 / 3.0).abs() < 1e-6);
}

#[test]
fn engine_rejects_non_square_mesh() {
    let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mesh = ClothMesh::from_raw(&positions, &[0, 1, 2]).unwrap();
    assert!(matches!(
        PhysicsEngine::new(&mesh, SolverConfig::default()),
        Err(WeftError::NonSquareGrid { .. })
    ));
}

#[test]
fn engine_rejects_invalid_config() {
    let mesh = cloth_grid(2, 1.0);
    let config = SolverConfig {
        substeps: 0,
        ..Default::default()
    };
    assert!(matches!(
        PhysicsEngine::new(&mesh, config),
        Err(WeftError::InvalidConfig(_))
    ));
}

// ─── Update Semantics ─────────────────────────────────────────

#[test]
fn rest_pose_with_zero_gravity_is_equilibrium() {
    let mesh = cloth_grid(2, 1.0);
    let config = SolverConfig {
        gravity: [0.0, 0.0, 0.0],
        mount: MountPolicy::Unconstrained,
        ..Default::default()
    };
    let mut engine = PhysicsEngine::new(&mesh, config).unwrap();

    let stats = engine.update(1.0 / 60.0).unwrap();
    assert_eq!(stats.substeps, 20);

    let (x, y, z) = engine.positions();
    for i in 0..mesh.particle_count() {
        assert!((x[i] - mesh.pos_x[i]).abs() < 1e-6);
        assert!((y[i] - mesh.pos_y[i]).abs() < 1e-6);
        assert!((z[i] - mesh.pos_z[i]).abs() < 1e-6);
    }
}

#[test]
fn zero_dt_update_is_a_noop() {
    let mesh = cloth_grid(2, 1.0);
    let mut engine = PhysicsEngine::new(&mesh, free_fall_config()).unwrap();

    let stats = engine.update(0.0).unwrap();
    assert_eq!(stats.substeps, 0);

    let (_, y, _) = engine.positions();
    assert_eq!(y, &mesh.pos_y[..]);
}

#[test]
fn gravity_pulls_unpinned_cloth_down() {
    let mesh = cloth_grid(2, 1.0);
    let mut engine = PhysicsEngine::new(&mesh, free_fall_config()).unwrap();

    engine.update(1.0 / 60.0).unwrap();

    let (_, y, _) = engine.positions();
    for i in 0..9 {
        assert!(y[i] < mesh.pos_y[i], "particle {i} did not fall");
    }
}

#[test]
fn pinned_row_never_moves_while_cloth_drapes() {
    let mesh = cloth_grid(4, 1.0); // 5×5 grid, top row pinned
    let config = SolverConfig::default();
    let mut engine = PhysicsEngine::new(&mesh, config).unwrap();

    for _ in 0..30 {
        engine.update(1.0 / 60.0).unwrap();
    }

    let (x, y, z) = engine.positions();
    let n = mesh.particle_count();
    for i in (n - 5)..n {
        // Pinned particles are never written: exact equality.
        assert_eq!(x[i], mesh.pos_x[i]);
        assert_eq!(y[i], mesh.pos_y[i]);
        assert_eq!(z[i], mesh.pos_z[i]);
    }

    // The free bottom edge hangs below its rest height.
    assert!(y[0] < mesh.pos_y[0]);
    assert!(y[2] < mesh.pos_y[2]);

    for i in 0..n {
        assert!(y[i].is_finite());
        assert!(engine.state().vel_y[i].is_finite());
    }
}

#[test]
fn corner_pin_scenario_3x3() {
    // 3×3 unit cloth, rest length 0.5, corner pin on the last index,
    // 20 substeps, one 16 ms frame.
    let mesh = cloth_grid(2, 1.0);
    let config = SolverConfig {
        gravity: [0.0, -9.81, 0.0],
        substeps: 20,
        mount: MountPolicy::Corner,
        ..Default::default()
    };
    let mut engine = PhysicsEngine::new(&mesh, config).unwrap();

    engine.update(0.016).unwrap();

    let (x, y, z) = engine.positions();

    // Pinned corner sits exactly at its pre-call position.
    assert_eq!(x[8], mesh.pos_x[8]);
    assert_eq!(y[8], mesh.pos_y[8]);
    assert_eq!(z[8], mesh.pos_z[8]);

    // Every other particle has a non-zero displacement vector.
    for i in 0..8 {
        let dx = x[i] - mesh.pos_x[i];
        let dy = y[i] - mesh.pos_y[i];
        let dz = z[i] - mesh.pos_z[i];
        let displacement = (dx * dx + dy * dy + dz * dz).sqrt();
        assert!(displacement > 0.0, "particle {i} never moved");
    }

    // No NaN/Inf leaked into the dynamics.
    let state = engine.state();
    for i in 0..9 {
        assert!(state.vel_x[i].is_finite());
        assert!(state.vel_y[i].is_finite());
        assert!(state.vel_z[i].is_finite());
    }
}

#[test]
fn apply_to_mesh_publishes_and_dirties_normals() {
    let mut mesh = cloth_grid(2, 1.0);
    weft_mesh::normals::compute_vertex_normals(&mut mesh);
    let mut engine = PhysicsEngine::new(&mesh, free_fall_config()).unwrap();

    engine.update(1.0 / 60.0).unwrap();
    engine.apply_to_mesh(&mut mesh).unwrap();

    assert!(mesh.needs_normal_update());
    let (_, y, _) = engine.positions();
    assert_eq!(mesh.pos_y, y);
}

#[test]
fn apply_to_mesh_rejects_foreign_mesh() {
    let mesh = cloth_grid(2, 1.0);
    let engine = PhysicsEngine::new(&mesh, free_fall_config()).unwrap();

    let mut other = cloth_grid(3, 1.0);
    assert!(matches!(
        engine.apply_to_mesh(&mut other),
        Err(WeftError::InvariantViolation(_))
    ));
}

// ─── Frame Clock ──────────────────────────────────────────────

#[test]
fn frame_clock_first_tick_is_zero() {
    let mut clock = FrameClock::new();
    assert_eq!(clock.tick(), 0.0);
}

#[test]
fn frame_clock_measures_elapsed_time() {
    let mut clock = FrameClock::new();
    clock.tick();
    std::thread::sleep(std::time::Duration::from_millis(10));
    let dt = clock.tick();
    assert!(dt > 0.0);
    assert!(dt <= weft_engine::clock::MAX_FRAME_DELTA);
}

// ─── Worker Handshake ─────────────────────────────────────────

#[test]
fn worker_steps_and_publishes() {
    let mesh = cloth_grid(2, 1.0);
    let engine = PhysicsEngine::new(&mesh, free_fall_config()).unwrap();
    let worker = SimWorker::spawn(engine).unwrap();

    worker.update(1.0 / 60.0).unwrap();
    worker.wait();

    let (_, y, _) = worker.positions();
    for i in 0..9 {
        assert!(y[i] < mesh.pos_y[i], "particle {i} did not fall");
    }
}

#[test]
fn worker_wait_without_update_returns_immediately() {
    let mesh = cloth_grid(2, 1.0);
    let engine = PhysicsEngine::new(&mesh, free_fall_config()).unwrap();
    let worker = SimWorker::spawn(engine).unwrap();

    worker.wait(); // computed starts true
    let (x, _, _) = worker.positions();
    assert_eq!(x.len(), 9);
}

#[test]
fn worker_drives_a_render_loop() {
    let mut mesh = cloth_grid(3, 1.0);
    let engine = PhysicsEngine::new(&mesh, SolverConfig::default()).unwrap();
    let worker = SimWorker::spawn(engine).unwrap();

    for _ in 0..10 {
        worker.update(1.0 / 60.0).unwrap();
        worker.wait();
        worker.apply_to_mesh(&mut mesh).unwrap();
    }

    assert!(mesh.needs_normal_update());
    // Top row pinned by the default policy, still at rest height.
    let n = mesh.particle_count();
    assert_eq!(mesh.pos_y[n - 1], 0.5);
    // Free corner hangs lower.
    assert!(mesh.pos_y[0] < -0.5);

    drop(worker); // joins cleanly
}
