// src/output.rs
//
// Plain-text run outputs, one directory per run:
//   <out>/<run_id>/
//     ├── config.json     run metadata (RunInformation)
//     ├── energy.csv      one row per step
//     ├── averages.csv    one row per sweep point
//     └── states.jsonl    one JSON object per step (optional)

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::averages::AverageRow;
use crate::magnetization::magnetization_vector;
use crate::simulation::StepRecord;
use crate::vec3::norm;
use crate::vector_field::VectorField;

/// Keep run ids filesystem-safe.
pub fn sanitize_run_id(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[derive(Serialize)]
struct StateLine<'a> {
    sweep_index: usize,
    iteration: usize,
    state: &'a VectorField,
}

/// Streams step records to `energy.csv` (and optionally `states.jsonl`).
pub struct TrajectoryWriter {
    energy: BufWriter<File>,
    states: Option<BufWriter<File>>,
}

impl TrajectoryWriter {
    pub fn create(out_dir: &Path, with_states: bool) -> std::io::Result<Self> {
        create_dir_all(out_dir)?;
        let mut energy = BufWriter::new(File::create(out_dir.join("energy.csv"))?);
        writeln!(
            energy,
            "sweep,iteration,temperature,field,E_exchange,E_anisotropy,E_field,E_total,M,Mx,My,Mz"
        )?;
        let states = if with_states {
            Some(BufWriter::new(File::create(out_dir.join("states.jsonl"))?))
        } else {
            None
        };
        Ok(Self { energy, states })
    }

    pub fn write(&mut self, r: &StepRecord) -> std::io::Result<()> {
        let m = magnetization_vector(&r.state);
        writeln!(
            self.energy,
            "{},{},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e}",
            r.sweep.index,
            r.iteration,
            r.sweep.temperature,
            r.sweep.field,
            r.energy.exchange,
            r.energy.anisotropy,
            r.energy.magnetic,
            r.energy.total(),
            norm(m),
            m[0],
            m[1],
            m[2],
        )?;

        if let Some(w) = self.states.as_mut() {
            let line = StateLine {
                sweep_index: r.sweep.index,
                iteration: r.iteration,
                state: &r.state,
            };
            serde_json::to_writer(&mut *w, &line)?;
            writeln!(w)?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> std::io::Result<()> {
        self.energy.flush()?;
        if let Some(w) = self.states.as_mut() {
            w.flush()?;
        }
        Ok(())
    }
}

/// Write `averages.csv`; per-kind columns follow the order of `kinds`.
pub fn write_averages_csv(path: &Path, kinds: &[String], rows: &[AverageRow]) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let mut w = BufWriter::new(File::create(path)?);

    let mut header = String::from(
        "temperature,field,samples,E_exchange,E_anisotropy,E_field,E_total,M_total,M_total_x,M_total_y,M_total_z",
    );
    for k in kinds {
        header.push_str(&format!(",M_{k},M_{k}_x,M_{k}_y,M_{k}_z"));
    }
    writeln!(w, "{header}")?;

    for r in rows {
        let mut line = format!(
            "{:.16e},{:.16e},{},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e}",
            r.temperature,
            r.field,
            r.samples,
            r.exchange_energy,
            r.anisotropy_energy,
            r.magnetic_energy,
            r.total_energy,
            r.magnetization,
            r.magnetization_vector[0],
            r.magnetization_vector[1],
            r.magnetization_vector[2],
        );
        for (m, v) in r.magnetization_by_kind.iter().zip(&r.magnetization_vector_by_kind) {
            line.push_str(&format!(",{:.16e},{:.16e},{:.16e},{:.16e}", m, v[0], v[1], v[2]));
        }
        writeln!(w, "{line}")?;
    }
    w.flush()?;
    Ok(path.to_path_buf())
}
