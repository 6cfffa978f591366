// src/energy.rs
//
// Diagnostic energies of a spin configuration (no state mutation):
//   E_ex  = -½ Σ_i Σ_{k∈nhb(i)} J_ik (S_i·S_k)   (½: every bond is listed from both ends)
//   E_ani = -Σ_i k_i (S_i·u_i)^2
//   E_zee = -Σ_i μ_i (S_i·H_i)

use serde::Serialize;

use crate::lattice::{ExchangeTable, Lattice};
use crate::vec3::dot;
use crate::vector_field::VectorField;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EnergyBreakdown {
    pub exchange: f64,
    pub anisotropy: f64,
    pub magnetic: f64,
}

impl EnergyBreakdown {
    pub fn total(&self) -> f64 {
        self.exchange + self.anisotropy + self.magnetic
    }
}

pub fn compute_exchange_energy(state: &VectorField, exchange: &ExchangeTable) -> f64 {
    let s = &state.data;
    let mut total = 0.0;
    for i in 0..exchange.num_sites() {
        let (neighbors, jex) = exchange.row(i);
        for (&k, &j) in neighbors.iter().zip(jex) {
            total -= j * dot(s[i], s[k]);
        }
    }
    0.5 * total
}

pub fn compute_anisotropy_energy(state: &VectorField, k: &[f64], axes: &[[f64; 3]]) -> f64 {
    let mut total = 0.0;
    for ((s, &k_i), &u) in state.data.iter().zip(k).zip(axes) {
        let p = dot(*s, u);
        total -= k_i * p * p;
    }
    total
}

/// `field` is the external (Zeeman) field per site, already intensity × axis.
pub fn compute_magnetic_energy(state: &VectorField, mu: &[f64], field: &VectorField) -> f64 {
    let mut total = 0.0;
    for ((s, &mu_i), &h) in state.data.iter().zip(mu).zip(&field.data) {
        total -= mu_i * dot(*s, h);
    }
    total
}

/// All three terms for a lattice.
pub fn compute_energy(state: &VectorField, lattice: &Lattice, field: &VectorField) -> EnergyBreakdown {
    EnergyBreakdown {
        exchange: compute_exchange_energy(state, lattice.exchange()),
        anisotropy: compute_anisotropy_energy(
            state,
            lattice.anisotropy_constants(),
            lattice.anisotropy_axes(),
        ),
        magnetic: compute_magnetic_energy(state, lattice.mu(), field),
    }
}
