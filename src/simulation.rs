// src/simulation.rs
//
// Temperature/field sweep driver.
//
// For each matched (T, H) point the driver runs `num_iterations` Heun steps,
// starting from the last state of the previous point (the state is never
// reset between points), and yields one `StepRecord` per step.
//
// Randomness: a single Xoshiro256** generator, seeded exactly once when the
// simulation is created. It draws the random initial state (if the system
// has none) and then all thermal noise, so a recorded seed reproduces a run.

use std::path::Path;

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::config::{RunInformation, SystemFile};
use crate::effective_field::uniform_magnetic_field;
use crate::energy::{compute_energy, EnergyBreakdown};
use crate::error::{LlgError, Result};
use crate::lattice::Lattice;
use crate::llg::{step_heun, HeunScratch};
use crate::params::{LLGParams, Parameters};
use crate::scalar_list::ScalarList;
use crate::sweep::{Sweep, SweepPoint};
use crate::vector_field::VectorField;

/// Everything a run needs: lattice, physical parameters and the scan.
#[derive(Debug, Clone)]
pub struct System {
    lattice: Lattice,
    parameters: Parameters,
    temperatures: ScalarList,
    fields: ScalarList,
    num_iterations: usize,
    initial_state: Option<VectorField>,
    seed: Option<u32>,
}

impl System {
    pub fn new(
        lattice: Lattice,
        parameters: Parameters,
        temperatures: ScalarList,
        fields: ScalarList,
        num_iterations: usize,
        initial_state: Option<VectorField>,
        seed: Option<u32>,
    ) -> Result<Self> {
        if let Some(state) = &initial_state {
            if state.len() != lattice.num_sites() {
                return Err(LlgError::InitialStateLength {
                    got: state.len(),
                    expected: lattice.num_sites(),
                });
            }
        }
        Ok(Self {
            lattice,
            parameters,
            temperatures,
            fields,
            num_iterations,
            initial_state,
            seed,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        info!("loading system from {}", path.display());
        SystemFile::from_path(path)?.into_system()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        SystemFile::from_json_str(s)?.into_system()
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn temperatures(&self) -> &ScalarList {
        &self.temperatures
    }

    pub fn fields(&self) -> &ScalarList {
        &self.fields
    }

    pub fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    pub fn initial_state(&self) -> Option<&VectorField> {
        self.initial_state.as_ref()
    }

    pub fn seed(&self) -> Option<u32> {
        self.seed
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_num_iterations(mut self, num_iterations: usize) -> Self {
        self.num_iterations = num_iterations;
        self
    }
}

/// One integration step of the trajectory.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub sweep: SweepPoint,
    pub iteration: usize,
    pub state: VectorField,
    pub energy: EnergyBreakdown,
}

impl StepRecord {
    pub fn total_energy(&self) -> f64 {
        self.energy.total()
    }
}

/// A seeded, ready-to-run simulation.
pub struct Simulation {
    system: System,
    sweep: Sweep,
    seed: u32,
    initial_state: VectorField,
    params: LLGParams,
    rng: Xoshiro256StarStar,
}

impl Simulation {
    /// Size-match the scan and seed the generator. Fails before any
    /// integration if a sweep list is empty.
    pub fn new(system: System) -> Result<Self> {
        let sweep = Sweep::new(&system.temperatures, &system.fields)?;

        let seed = match system.seed {
            Some(s) => s,
            None => {
                let s = rand::thread_rng().gen::<u32>();
                info!("no seed given, generated seed {s}");
                s
            }
        };
        let mut rng = Xoshiro256StarStar::seed_from_u64(u64::from(seed));

        let initial_state = match &system.initial_state {
            Some(state) => state.clone(),
            None => VectorField::random_unit(system.lattice.num_sites(), &mut rng),
        };

        let params = system.parameters.llg();
        info!(
            "simulation: {} sites, {} sweep points x {} iterations, seed {}",
            system.lattice.num_sites(),
            sweep.len(),
            system.num_iterations,
            seed
        );
        let exchange = system.lattice.exchange();
        debug!(
            "exchange table: {} layout, {} links, coordination up to {}",
            if exchange.is_dense() { "dense" } else { "csr" },
            exchange.num_links(),
            exchange.max_neighbors()
        );

        Ok(Self {
            system,
            sweep,
            seed,
            initial_state,
            params,
            rng,
        })
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn initial_state(&self) -> &VectorField {
        &self.initial_state
    }

    /// Run the per-site passes on the rayon pool (default) or serially.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.params.parallel = parallel;
    }

    pub fn information(&self) -> RunInformation {
        let lattice = &self.system.lattice;
        RunInformation {
            num_sites: lattice.num_sites(),
            parameters: self.system.parameters.clone(),
            temperatures: self.sweep.temperatures().to_vec(),
            magnetic_field_intensities: self.sweep.fields().to_vec(),
            seed: self.seed,
            num_iterations: self.system.num_iterations,
            positions: lattice.positions(),
            types: lattice.kinds(),
            initial_state: self.initial_state.clone(),
            num_sweep_points: self.sweep.len(),
            max_neighbors: lattice.exchange().max_neighbors(),
            num_links: lattice.exchange().num_links(),
        }
    }

    /// Lazily iterate the whole scan. Dropping the iterator stops the run
    /// after the current step.
    pub fn run(self) -> Trajectory {
        let n = self.system.lattice.num_sites();
        Trajectory {
            state: self.initial_state.clone(),
            scratch: HeunScratch::new(n),
            point: 0,
            iteration: 0,
            temperature: vec![0.0; n],
            magnetic: VectorField::zeros(n),
            warned_non_finite: false,
            sim: self,
        }
    }
}

/// Iterator over the `StepRecord`s of a run.
pub struct Trajectory {
    sim: Simulation,
    state: VectorField,
    scratch: HeunScratch,
    point: usize,
    iteration: usize,
    temperature: Vec<f64>,
    magnetic: VectorField,
    warned_non_finite: bool,
}

impl Trajectory {
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Configuration after the most recent step (the initial state before any).
    pub fn state(&self) -> &VectorField {
        &self.state
    }

    pub fn len_total(&self) -> usize {
        self.sim.sweep.len() * self.sim.system.num_iterations
    }

    fn enter_point(&mut self, p: SweepPoint) {
        self.temperature.iter_mut().for_each(|t| *t = p.temperature);
        self.magnetic = uniform_magnetic_field(p.field, self.sim.system.lattice.field_axes());
        debug!(
            "sweep point {}: T = {}, H = {}",
            p.index, p.temperature, p.field
        );
    }
}

impl Iterator for Trajectory {
    type Item = StepRecord;

    fn next(&mut self) -> Option<StepRecord> {
        let num_iterations = self.sim.system.num_iterations;
        if num_iterations == 0 || self.point >= self.sim.sweep.len() {
            return None;
        }

        let p = self.sim.sweep.point(self.point);
        if self.iteration == 0 {
            self.enter_point(p);
        }

        let next = step_heun(
            &mut self.sim.rng,
            &self.state,
            &self.sim.system.lattice,
            &self.temperature,
            &self.magnetic,
            &self.sim.params,
            &mut self.scratch,
        );
        self.state = next;

        if !self.warned_non_finite && !self.state.is_finite() {
            warn!(
                "non-finite spin state at sweep point {}, iteration {}; check mu, gamma, dt and temperatures",
                p.index, self.iteration
            );
            self.warned_non_finite = true;
        }

        let energy = compute_energy(&self.state, &self.sim.system.lattice, &self.magnetic);
        let record = StepRecord {
            sweep: p,
            iteration: self.iteration,
            state: self.state.clone(),
            energy,
        };

        self.iteration += 1;
        if self.iteration == num_iterations {
            self.iteration = 0;
            self.point += 1;
        }

        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let done = self.point * self.sim.system.num_iterations + self.iteration;
        let left = self.len_total().saturating_sub(done);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Trajectory {}
