// src/main.rs
//
// Thin driver: load a system file, run the temperature/field sweep and write
// the trajectory to `runs/<run_id>/` (or the directory given via `out=`).
//
// Examples:
//
//   cargo run --release -- samples/chain.json
//       -> full sweep with the seed/iterations from the file
//
//   cargo run --release -- samples/chain.json iterations=5000 discard=1000 states
//       -> override the iteration count, average over the last 4000 steps of
//          each sweep point and also dump every spin configuration
//
// Typical outputs (per run directory):
//   runs/<run_id>/
//     ├── config.json      (seed, matched T/H lists, initial state, ...)
//     ├── energy.csv
//     ├── averages.csv
//     └── states.jsonl     (if `states` is given)
//
// Logging goes through env_logger; set RUST_LOG=debug for per-sweep-point lines.

use std::env;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::{info, warn};

use llg_lattice::averages::SweepAverager;
use llg_lattice::output::{sanitize_run_id, write_averages_csv, TrajectoryWriter};
use llg_lattice::simulation::{Simulation, System};
use llg_lattice::Result;

fn print_usage() {
    eprintln!(
        r#"Usage:
  llg_lattice <system.json> [out=DIR] [run=RUN_ID] [iterations=N] [seed=N]
              [discard=N] [states] [serial]

Notes:
  - Temperatures and field intensities of different lengths are size-matched
    by repeating the shorter list.
  - `discard=N` skips the first N iterations of each sweep point in averages.csv.
  - `serial` disables the rayon site loops (same results, one thread).
"#
    );
}

fn default_run_id(system_path: &Path) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0));
    let stem = system_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "system".to_string());
    format!("{}{:03}_{}", now.as_secs(), now.subsec_millis(), stem)
}

fn unique_run_dir(out_root: &str, run_id: &str) -> PathBuf {
    let base = PathBuf::from(out_root);
    let mut dir = base.join(run_id);
    if !dir.exists() {
        return dir;
    }
    for k in 1..1000 {
        let cand = base.join(format!("{}_{}", run_id, k));
        if !cand.exists() {
            dir = cand;
            break;
        }
    }
    dir
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let argv: Vec<String> = env::args().collect();

    let mut system_path: Option<PathBuf> = None;
    let mut out_root = "runs".to_string();
    let mut run_id_override: Option<String> = None;
    let mut iterations_override: Option<usize> = None;
    let mut seed_override: Option<u32> = None;
    let mut discard: usize = 0;
    let mut dump_states = false;
    let mut serial = false;

    for arg in argv.iter().skip(1) {
        if arg == "-h" || arg == "--help" || arg == "help" {
            print_usage();
            return Ok(());
        }
        if arg == "states" {
            dump_states = true;
            continue;
        }
        if arg == "serial" {
            serial = true;
            continue;
        }
        if let Some(v) = arg.strip_prefix("out=") {
            out_root = v.to_string();
            continue;
        }
        if let Some(v) = arg.strip_prefix("run=") {
            run_id_override = Some(v.to_string());
            continue;
        }
        if let Some(v) = arg.strip_prefix("iterations=") {
            iterations_override = v.parse::<usize>().ok();
            if iterations_override.is_none() {
                warn!("could not parse iterations '{v}', ignoring");
            }
            continue;
        }
        if let Some(v) = arg.strip_prefix("seed=") {
            seed_override = v.parse::<u32>().ok();
            if seed_override.is_none() {
                warn!("could not parse seed '{v}', ignoring");
            }
            continue;
        }
        if let Some(v) = arg.strip_prefix("discard=") {
            discard = v.parse::<usize>().unwrap_or_else(|_| {
                warn!("could not parse discard '{v}', using 0");
                0
            });
            continue;
        }
        if system_path.is_none() && !arg.contains('=') {
            system_path = Some(PathBuf::from(arg));
            continue;
        }

        warn!("ignoring unknown argument '{arg}'");
    }

    let Some(system_path) = system_path else {
        print_usage();
        return Ok(());
    };

    let mut system = System::from_file(&system_path)?;
    if let Some(n) = iterations_override {
        system = system.with_num_iterations(n);
    }
    if let Some(s) = seed_override {
        system = system.with_seed(s);
    }

    let mut sim = Simulation::new(system)?;
    sim.set_parallel(!serial);

    let run_id = sanitize_run_id(
        &run_id_override.unwrap_or_else(|| default_run_id(&system_path)),
    );
    let out_dir = unique_run_dir(&out_root, &run_id);
    std::fs::create_dir_all(&out_dir)?;
    sim.information().write_to_dir(&out_dir)?;

    let num_iterations = sim.system().num_iterations();
    let mut averager = SweepAverager::new(discard, num_iterations, &sim.system().lattice().kinds())?;
    let mut writer = TrajectoryWriter::create(&out_dir, dump_states)?;

    let t0 = Instant::now();
    let trajectory = sim.run();
    let total = trajectory.len();
    let report_every = (total / 20).max(1);

    for (k, record) in trajectory.enumerate() {
        writer.write(&record)?;
        averager.observe(&record);
        if (k + 1) % report_every == 0 {
            info!(
                "{}/{} steps (sweep point {}, T = {}, H = {})",
                k + 1,
                total,
                record.sweep.index,
                record.sweep.temperature,
                record.sweep.field
            );
        }
    }
    writer.finish()?;

    let avg_path = write_averages_csv(&out_dir.join("averages.csv"), averager.kinds(), &averager.rows())?;

    println!("Wrote outputs to {:?}", out_dir);
    println!("  averages: {:?}", avg_path);
    println!("  {} steps in {:.2?}", total, t0.elapsed());

    Ok(())
}
