// tests/sweep.rs
//
// End-to-end checks of the sweep driver: system file -> simulation ->
// trajectory -> output files.
// Run only these tests: cargo test --test sweep

use std::fs;
use std::path::PathBuf;

use llg_lattice::averages::SweepAverager;
use llg_lattice::config::SystemFile;
use llg_lattice::output::{write_averages_csv, TrajectoryWriter};
use llg_lattice::scalar_list::{ScalarList, ScalarSpec};
use llg_lattice::simulation::{Simulation, StepRecord, System};
use llg_lattice::sweep::{ScalarListMatcher, Sweep};
use llg_lattice::LlgError;

const RING: &str = r#"{
    "geometry": {
        "sites": [
            {"index": 0, "position": [0, 0, 0], "type": "Fe", "mu": 2.2,
             "anisotropy_constant": 0.01, "anisotropy_axis": [0, 0, 1]},
            {"index": 1, "position": [1, 0, 0], "type": "Co", "mu": 1.7},
            {"index": 2, "position": [2, 0, 0], "type": "Fe", "mu": 2.2,
             "anisotropy_constant": 0.01, "anisotropy_axis": [0, 0, 1]},
            {"index": 3, "position": [3, 0, 0], "type": "Co", "mu": 1.7}
        ],
        "neighbors": [
            {"source": 0, "target": 1, "jex": 10.0}, {"source": 1, "target": 0, "jex": 10.0},
            {"source": 1, "target": 2, "jex": 10.0}, {"source": 2, "target": 1, "jex": 10.0},
            {"source": 2, "target": 3, "jex": 10.0}, {"source": 3, "target": 2, "jex": 10.0},
            {"source": 3, "target": 0, "jex": 10.0}, {"source": 0, "target": 3, "jex": 10.0}
        ]
    },
    "parameters": {"energy_unit": "mev", "damping": 0.1, "gyromagnetic": 0.176, "delta_time": 0.1},
    "temperature": {"start": 100, "final": 0, "step": 50},
    "field": [0.0, 1.0],
    "num_iterations": 25,
    "seed": 1234
}"#;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("llg_lattice_it_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn ring_system() -> System {
    System::from_json_str(RING).unwrap()
}

#[test]
fn range_shapes_resolve_like_arange() {
    let up = ScalarList::range(0.0, 10.0, 2.0).unwrap();
    assert_eq!(up.values(), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);

    let down = ScalarList::range(10.0, 0.0, 2.0).unwrap();
    assert_eq!(down.values(), &[10.0, 8.0, 6.0, 4.0, 2.0, 0.0]);
    let down_neg = ScalarList::range(10.0, 0.0, -2.0).unwrap();
    assert_eq!(down, down_neg);

    let spec: ScalarSpec = serde_json::from_str(r#"{"start": 1, "final": 1, "step": 0.5}"#).unwrap();
    assert_eq!(spec.resolve().unwrap().values(), &[1.0]);

    let zero_step = ScalarList::range(0.0, 1.0, 0.0).unwrap_err();
    assert!(matches!(zero_step, LlgError::InvalidRange { .. }));
}

#[test]
fn shorter_list_wraps_around() {
    let a = ScalarList::new(vec![1.0, 2.0, 3.0]);
    let b = ScalarList::new(vec![4.0, 5.0, 6.0, 7.0]);
    let m = ScalarListMatcher::new(&[("a", &a), ("b", &b)]).unwrap();
    let pairs: Vec<Vec<f64>> = (0..m.len())
        .map(|i| m.lists().iter().map(|l| l.values()[i]).collect())
        .collect();
    assert_eq!(
        pairs,
        vec![
            vec![1.0, 4.0],
            vec![2.0, 5.0],
            vec![3.0, 6.0],
            vec![1.0, 7.0]
        ]
    );

    let sweep = Sweep::new(&ScalarList::new(vec![300.0]), &b).unwrap();
    assert!(sweep.points().all(|p| p.temperature == 300.0));
}

#[test]
fn file_sweep_runs_every_point_in_order() {
    let sim = Simulation::new(ring_system()).unwrap();
    assert_eq!(sim.sweep().temperatures(), &[100.0, 50.0, 0.0]);
    assert_eq!(sim.sweep().fields(), &[0.0, 1.0, 0.0]);

    let records: Vec<StepRecord> = sim.run().collect();
    assert_eq!(records.len(), 75);
    assert_eq!(records[0].sweep.index, 0);
    assert_eq!(records[25].sweep.index, 1);
    assert_eq!(records[25].sweep.field, 1.0);
    assert_eq!(records[74].iteration, 24);
    for r in &records {
        assert!(r.state.max_norm_deviation() < 1e-9);
        assert!(r.total_energy().is_finite());
    }
}

#[test]
fn file_seed_makes_runs_reproducible() {
    let a: Vec<StepRecord> = Simulation::new(ring_system()).unwrap().run().collect();
    let mut sim = Simulation::new(ring_system()).unwrap();
    sim.set_parallel(false);
    let b: Vec<StepRecord> = sim.run().collect();
    assert_eq!(a.len(), b.len());
    for (ra, rb) in a.iter().zip(&b) {
        assert_eq!(ra.state, rb.state);
    }

    let c: Vec<StepRecord> = Simulation::new(ring_system().with_seed(4321)).unwrap().run().collect();
    assert_ne!(a[0].state, c[0].state);
}

#[test]
fn empty_list_in_file_is_rejected() {
    let json = RING.replace("\"field\": [0.0, 1.0]", "\"field\": []");
    let system = SystemFile::from_json_str(&json).unwrap().into_system().unwrap();
    let err = Simulation::new(system).err().unwrap();
    assert!(matches!(err, LlgError::EmptySweepList(ref name) if name == "field"));
}

#[test]
fn run_writes_config_energy_and_averages() {
    let dir = scratch_dir("run");
    fs::create_dir_all(&dir).unwrap();

    let sim = Simulation::new(ring_system().with_num_iterations(10)).unwrap();
    sim.information().write_to_dir(&dir).unwrap();
    let kinds = sim.system().lattice().kinds();
    let mut averager = SweepAverager::new(4, 10, &kinds).unwrap();
    let mut writer = TrajectoryWriter::create(&dir, false).unwrap();
    for r in sim.run() {
        writer.write(&r).unwrap();
        averager.observe(&r);
    }
    writer.finish().unwrap();
    let rows = averager.rows();
    write_averages_csv(&dir.join("averages.csv"), averager.kinds(), &rows).unwrap();

    let config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("config.json")).unwrap()).unwrap();
    assert_eq!(config["seed"], 1234);
    assert_eq!(config["num_sites"], 4);
    assert_eq!(config["temperatures"].as_array().unwrap().len(), 3);
    assert_eq!(config["max_neighbors"], 2);
    assert_eq!(config["num_links"], 8);

    let energy = fs::read_to_string(dir.join("energy.csv")).unwrap();
    assert_eq!(energy.lines().count(), 1 + 30);
    assert!(!dir.join("states.jsonl").exists());

    assert_eq!(averager.kinds(), &["Co".to_string(), "Fe".to_string()]);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.samples == 6));
    let averages = fs::read_to_string(dir.join("averages.csv")).unwrap();
    assert_eq!(averages.lines().count(), 4);
    assert!(averages.lines().next().unwrap().contains("M_Co,M_Co_x"));

    let _ = fs::remove_dir_all(&dir);
}
