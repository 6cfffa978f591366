// src/averages.rs
//
// Per-sweep-point thermal averages of a trajectory: energies and
// magnetisation (overall and per site kind), skipping the first `discard`
// iterations of every sweep point as equilibration.

use serde::Serialize;

use crate::error::{LlgError, Result};
use crate::magnetization::{kind_labels, magnetization_vector, magnetization_vector_by_type};
use crate::simulation::StepRecord;
use crate::vec3::norm;

#[derive(Debug, Clone, Default)]
struct Accumulator {
    temperature: f64,
    field: f64,
    samples: usize,
    exchange: f64,
    anisotropy: f64,
    magnetic: f64,
    total: f64,
    m_norm: f64,
    m_vec: [f64; 3],
    kind_norm: Vec<f64>,
    kind_vec: Vec<[f64; 3]>,
}

/// Averages of one sweep point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageRow {
    pub sweep_index: usize,
    pub temperature: f64,
    pub field: f64,
    pub samples: usize,
    pub exchange_energy: f64,
    pub anisotropy_energy: f64,
    pub magnetic_energy: f64,
    pub total_energy: f64,
    /// Mean over iterations of |M|.
    pub magnetization: f64,
    /// Mean over iterations of M.
    pub magnetization_vector: [f64; 3],
    pub magnetization_by_kind: Vec<f64>,
    pub magnetization_vector_by_kind: Vec<[f64; 3]>,
}

pub struct SweepAverager {
    discard: usize,
    kinds: Vec<String>,
    kind_ids: Vec<usize>,
    acc: Vec<Accumulator>,
}

impl SweepAverager {
    /// `discard` may equal `num_iterations` (every row then has zero samples
    /// and NaN averages) but not exceed it.
    pub fn new(discard: usize, num_iterations: usize, site_kinds: &[String]) -> Result<Self> {
        if discard > num_iterations {
            return Err(LlgError::InvalidDiscard {
                discard,
                num_iterations,
            });
        }
        let (kinds, kind_ids) = kind_labels(site_kinds);
        Ok(Self {
            discard,
            kinds,
            kind_ids,
            acc: Vec::new(),
        })
    }

    /// Sorted kind labels, in the order of the `*_by_kind` columns.
    pub fn kinds(&self) -> &[String] {
        &self.kinds
    }

    pub fn observe(&mut self, record: &StepRecord) {
        let idx = record.sweep.index;
        let num_kinds = self.kinds.len();
        while self.acc.len() <= idx {
            self.acc.push(Accumulator {
                kind_norm: vec![0.0; num_kinds],
                kind_vec: vec![[0.0; 3]; num_kinds],
                ..Default::default()
            });
        }
        let a = &mut self.acc[idx];
        a.temperature = record.sweep.temperature;
        a.field = record.sweep.field;
        if record.iteration < self.discard {
            return;
        }

        a.samples += 1;
        a.exchange += record.energy.exchange;
        a.anisotropy += record.energy.anisotropy;
        a.magnetic += record.energy.magnetic;
        a.total += record.energy.total();

        let m = magnetization_vector(&record.state);
        a.m_norm += norm(m);
        for c in 0..3 {
            a.m_vec[c] += m[c];
        }

        let by_kind = magnetization_vector_by_type(&record.state, num_kinds, &self.kind_ids);
        for (t, mk) in by_kind.into_iter().enumerate() {
            a.kind_norm[t] += norm(mk);
            for c in 0..3 {
                a.kind_vec[t][c] += mk[c];
            }
        }
    }

    pub fn rows(&self) -> Vec<AverageRow> {
        self.acc
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let n = a.samples as f64;
                AverageRow {
                    sweep_index: i,
                    temperature: a.temperature,
                    field: a.field,
                    samples: a.samples,
                    exchange_energy: a.exchange / n,
                    anisotropy_energy: a.anisotropy / n,
                    magnetic_energy: a.magnetic / n,
                    total_energy: a.total / n,
                    magnetization: a.m_norm / n,
                    magnetization_vector: [a.m_vec[0] / n, a.m_vec[1] / n, a.m_vec[2] / n],
                    magnetization_by_kind: a.kind_norm.iter().map(|v| v / n).collect(),
                    magnetization_vector_by_kind: a
                        .kind_vec
                        .iter()
                        .map(|v| [v[0] / n, v[1] / n, v[2] / n])
                        .collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::EnergyBreakdown;
    use crate::sweep::SweepPoint;
    use crate::vector_field::VectorField;

    fn record(sweep: usize, iteration: usize, mz: f64, e: f64) -> StepRecord {
        StepRecord {
            sweep: SweepPoint {
                index: sweep,
                temperature: 10.0 * sweep as f64,
                field: 1.0,
            },
            iteration,
            state: VectorField::from_vec(vec![[0.0, 0.0, mz], [0.0, 0.0, mz]]),
            energy: EnergyBreakdown {
                exchange: e,
                anisotropy: 0.0,
                magnetic: 0.0,
            },
        }
    }

    #[test]
    fn discarded_iterations_do_not_count() {
        let kinds = vec!["A".to_string(), "B".to_string()];
        let mut avg = SweepAverager::new(1, 3, &kinds).unwrap();
        avg.observe(&record(0, 0, -1.0, 100.0));
        avg.observe(&record(0, 1, 1.0, -1.0));
        avg.observe(&record(0, 2, 1.0, -3.0));
        avg.observe(&record(1, 0, 1.0, 0.0));
        avg.observe(&record(1, 1, -1.0, 0.0));
        avg.observe(&record(1, 2, -1.0, 0.0));

        let rows = avg.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].samples, 2);
        assert_eq!(rows[0].exchange_energy, -2.0);
        assert_eq!(rows[0].total_energy, -2.0);
        assert_eq!(rows[0].magnetization, 1.0);
        assert_eq!(rows[1].temperature, 10.0);
        assert_eq!(rows[1].magnetization, 1.0);
        assert_eq!(rows[1].magnetization_vector, [0.0, 0.0, -1.0]);
        assert_eq!(rows[1].magnetization_by_kind, vec![1.0, 1.0]);
    }

    #[test]
    fn discard_larger_than_run_is_rejected() {
        assert!(matches!(
            SweepAverager::new(5, 4, &[]),
            Err(LlgError::InvalidDiscard { discard: 5, num_iterations: 4 })
        ));
    }
}
