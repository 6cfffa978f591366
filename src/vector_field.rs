// src/vector_field.rs

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::vec3::{is_finite, norm, normalize};

/// One 3-vector per lattice site: spin configurations and fields alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorField {
    pub data: Vec<[f64; 3]>,
}

impl VectorField {
    /// All-zero field over `n` sites.
    pub fn zeros(n: usize) -> Self {
        Self {
            data: vec![[0.0; 3]; n],
        }
    }

    pub fn from_vec(data: Vec<[f64; 3]>) -> Self {
        Self { data }
    }

    /// Every site set to the same vector.
    pub fn uniform(n: usize, v: [f64; 3]) -> Self {
        Self { data: vec![v; n] }
    }

    /// Random unit vectors, isotropic on the sphere (normalised Gaussian triples).
    pub fn random_unit<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let data = (0..n)
            .map(|_| {
                normalize([
                    rng.sample::<f64, _>(StandardNormal),
                    rng.sample::<f64, _>(StandardNormal),
                    rng.sample::<f64, _>(StandardNormal),
                ])
            })
            .collect();
        Self { data }
    }

    /// Set all cells to the same vector (mx, my, mz).
    pub fn set_uniform(&mut self, mx: f64, my: f64, mz: f64) {
        for cell in &mut self.data {
            *cell = [mx, my, mz];
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Largest | |v| - 1 | over all rows (NaN if any row is non-finite).
    pub fn max_norm_deviation(&self) -> f64 {
        let mut worst = 0.0_f64;
        for v in &self.data {
            if !is_finite(*v) {
                return f64::NAN;
            }
            worst = worst.max((norm(*v) - 1.0).abs());
        }
        worst
    }

    /// True if every component of every row is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| is_finite(*v))
    }
}

impl From<Vec<[f64; 3]>> for VectorField {
    fn from(data: Vec<[f64; 3]>) -> Self {
        Self { data }
    }
}
