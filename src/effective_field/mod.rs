// src/effective_field/mod.rs
//
// Effective field H_eff = H_thermal + H_zeeman + H_exchange + H_anisotropy.
//
// The first two do not depend on the spin configuration; the integrator
// builds them once per step (`build_h_ext`) and adds the state-dependent
// terms for each predictor/corrector evaluation (`build_h_eff`).
pub mod anisotropy;
pub mod exchange;
pub mod thermal;
pub mod zeeman;

use rand::Rng;
use rayon::prelude::*;

use crate::lattice::Lattice;
use crate::params::LLGParams;
use crate::vector_field::VectorField;

pub use anisotropy::{add_anisotropy_field, anisotropy_interaction_field};
pub use exchange::{add_exchange_field, exchange_interaction_field};
pub use thermal::{add_thermal_field, thermal_field};
pub use zeeman::{add_zeeman_field, magnetic_field, uniform_magnetic_field};

/// Apply `f(i, &mut out[i])` to every site, optionally on the rayon pool.
///
/// `f` only reads shared inputs, so both paths give bit-identical results.
pub(crate) fn for_each_site<F>(out: &mut [[f64; 3]], parallel: bool, f: F)
where
    F: Fn(usize, &mut [f64; 3]) + Send + Sync,
{
    if parallel {
        out.par_iter_mut().enumerate().for_each(|(i, v)| f(i, v));
    } else {
        out.iter_mut().enumerate().for_each(|(i, v)| f(i, v));
    }
}

/// External (state-independent) field for one step: fresh thermal noise plus
/// the pre-multiplied Zeeman field. Overwrites `h_ext`.
pub fn build_h_ext<R: Rng + ?Sized>(
    rng: &mut R,
    lattice: &Lattice,
    temperature: &[f64],
    magnetic: &VectorField,
    params: &LLGParams,
    h_ext: &mut VectorField,
) {
    h_ext.set_uniform(0.0, 0.0, 0.0);
    add_thermal_field(rng, temperature, lattice.mu(), params, h_ext);
    add_zeeman_field(h_ext, magnetic);
}

/// H_eff = h_ext + exchange(state) + anisotropy(state). Overwrites `h_eff`.
pub fn build_h_eff(
    state: &VectorField,
    lattice: &Lattice,
    h_ext: &VectorField,
    h_eff: &mut VectorField,
    parallel: bool,
) {
    debug_assert_eq!(state.len(), lattice.num_sites());
    h_eff.data.copy_from_slice(&h_ext.data);
    add_exchange_field(state, lattice.mu(), lattice.exchange(), h_eff, parallel);
    add_anisotropy_field(
        state,
        lattice.mu(),
        lattice.anisotropy_constants(),
        lattice.anisotropy_axes(),
        h_eff,
        parallel,
    );
}
