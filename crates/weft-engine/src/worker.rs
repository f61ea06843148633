//! Background simulation worker.
//!
//! A dedicated thread owns the [`PhysicsEngine`] exclusively; the main
//! thread talks to it through a strict ping-pong handshake around a
//! single `computed` flag. One step is in flight at most, and the
//! published position buffer is only read after `wait()` returns, which
//! gives the happens-before edge that makes finer-grained locking
//! unnecessary.

use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use weft_mesh::ClothMesh;
use weft_types::{WeftError, WeftResult};

use crate::engine::PhysicsEngine;

enum Command {
    Step(f32),
    Shutdown,
}

/// Published position channels, swapped wholesale after each step.
struct Snapshot {
    x: Vec<f32>,
    y: Vec<f32>,
    z: Vec<f32>,
}

struct Shared {
    computed: Mutex<bool>,
    signal: Condvar,
    published: Mutex<Snapshot>,
}

// A poisoned lock means the worker panicked mid-publish; the snapshot
// is still whole (channels are swapped one at a time but only read
// after `computed` flips), so recover the guard and continue.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle to the simulation worker thread.
///
/// Protocol: `update(dt)` clears the computed flag and wakes the
/// worker; the worker runs one full engine update, publishes the new
/// positions, sets the flag, and notifies; `wait()` blocks until the
/// flag is set. The caller must not consume positions between
/// `update()` and `wait()`.
///
/// Dropping the handle shuts the worker down and joins the thread.
pub struct SimWorker {
    commands: mpsc::Sender<Command>,
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl SimWorker {
    /// Moves the engine onto a new worker thread.
    ///
    /// # Errors
    ///
    /// `Io` when the OS refuses to spawn the thread.
    pub fn spawn(engine: PhysicsEngine) -> WeftResult<Self> {
        let (pos_x, pos_y, pos_z) = engine.positions();
        let shared = Arc::new(Shared {
            computed: Mutex::new(true),
            signal: Condvar::new(),
            published: Mutex::new(Snapshot {
                x: pos_x.to_vec(),
                y: pos_y.to_vec(),
                z: pos_z.to_vec(),
            }),
        });

        let (commands, inbox) = mpsc::channel::<Command>();
        let worker_shared = Arc::clone(&shared);

        let handle = thread::Builder::new()
            .name("weft-sim".into())
            .spawn(move || run_worker(engine, inbox, worker_shared))?;

        tracing::debug!("simulation worker started");

        Ok(Self {
            commands,
            shared,
            handle: Some(handle),
        })
    }

    /// Requests one simulation step of `dt` seconds.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` when the previous step has not been
    /// consumed with [`SimWorker::wait`] (the handshake is strict
    /// ping-pong), or when the worker thread is gone.
    pub fn update(&self, dt: f32) -> WeftResult<()> {
        {
            let mut computed = lock(&self.shared.computed);
            if !*computed {
                return Err(WeftError::InvariantViolation(
                    "simulation step already in flight; call wait() first".into(),
                ));
            }
            *computed = false;
        }
        self.commands.send(Command::Step(dt)).map_err(|_| {
            WeftError::InvariantViolation("simulation worker has exited".into())
        })
    }

    /// Blocks until the in-flight step (if any) has been published.
    pub fn wait(&self) {
        let mut computed = lock(&self.shared.computed);
        while !*computed {
            computed = self
                .shared
                .signal
                .wait(computed)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Clones the most recently published positions.
    ///
    /// Only meaningful after [`SimWorker::wait`] has returned.
    pub fn positions(&self) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
        let snapshot = lock(&self.shared.published);
        (snapshot.x.clone(), snapshot.y.clone(), snapshot.z.clone())
    }

    /// Publishes the most recent positions into the mesh.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` on a particle-count mismatch.
    pub fn apply_to_mesh(&self, mesh: &mut ClothMesh) -> WeftResult<()> {
        let snapshot = lock(&self.shared.published);
        mesh.set_positions(&snapshot.x, &snapshot.y, &snapshot.z)
    }
}

impl Drop for SimWorker {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        tracing::debug!("simulation worker stopped");
    }
}

fn run_worker(mut engine: PhysicsEngine, inbox: mpsc::Receiver<Command>, shared: Arc<Shared>) {
    while let Ok(command) = inbox.recv() {
        match command {
            Command::Step(dt) => {
                if let Err(error) = engine.update(dt) {
                    // Keep the handshake alive: the main thread is (or
                    // will be) blocked in wait().
                    tracing::error!(%error, "simulation step failed");
                }

                {
                    let (x, y, z) = engine.positions();
                    let mut snapshot = lock(&shared.published);
                    snapshot.x.copy_from_slice(x);
                    snapshot.y.copy_from_slice(y);
                    snapshot.z.copy_from_slice(z);
                }

                let mut computed = lock(&shared.computed);
                *computed = true;
                shared.signal.notify_all();
            }
            Command::Shutdown => break,
        }
    }
}
