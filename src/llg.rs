// src/llg.rs
//
// Stochastic Heun (predictor-corrector) step of the LLG equation:
//
//   dS/dt = -γ/(1+α²) [ S × H_eff + α S × (S × H_eff) ]
//
// One step:
//   H_ext = H_thermal + H_zeeman                  (one noise draw per step)
//   dS    = rhs(S,  H_ext + H_spin(S))
//   S'    = normalize(S + Δt dS)                   (predictor)
//   dS'   = rhs(S', H_ext + H_spin(S'))            (corrector, same H_ext)
//   S_new = normalize(S + ½ Δt (dS + dS'))
//
// Predictor and corrector share the thermal field (Stratonovich reading of
// the multiplicative noise); a step never draws noise twice.
//
// Invalid physics is not trapped here: inf/NaN fields give NaN rows after
// normalisation and those rows stay NaN in every later step.

use rand::Rng;

use crate::effective_field::{build_h_eff, build_h_ext, for_each_site};
use crate::lattice::Lattice;
use crate::params::LLGParams;
use crate::vec3::{add_scaled, cross, normalize};
use crate::vector_field::VectorField;

/// LLG right-hand side for one spin.
#[inline]
pub fn llg_torque(s: [f64; 3], h: [f64; 3], gamma: f64, alpha: f64) -> [f64; 3] {
    let pref = -gamma / (1.0 + alpha * alpha);
    let s_x_h = cross(s, h);
    let s_x_s_x_h = cross(s, s_x_h);
    [
        pref * (s_x_h[0] + alpha * s_x_s_x_h[0]),
        pref * (s_x_h[1] + alpha * s_x_s_x_h[1]),
        pref * (s_x_h[2] + alpha * s_x_s_x_h[2]),
    ]
}

/// dS for every site.
pub fn llg_rhs(state: &VectorField, h_eff: &VectorField, ds: &mut VectorField, params: &LLGParams) {
    let s = &state.data;
    let h = &h_eff.data;
    let (gamma, alpha) = (params.gamma, params.alpha);
    for_each_site(&mut ds.data, params.parallel, |i, out| {
        *out = llg_torque(s[i], h[i], gamma, alpha);
    });
}

/// Buffers reused across steps so the driver loop does not allocate.
pub struct HeunScratch {
    h_ext: VectorField,
    h_eff: VectorField,
    ds: VectorField,
    ds_prime: VectorField,
    state_prime: VectorField,
}

impl HeunScratch {
    pub fn new(num_sites: usize) -> Self {
        Self {
            h_ext: VectorField::zeros(num_sites),
            h_eff: VectorField::zeros(num_sites),
            ds: VectorField::zeros(num_sites),
            ds_prime: VectorField::zeros(num_sites),
            state_prime: VectorField::zeros(num_sites),
        }
    }
}

/// Heun step with an externally supplied, state-independent field `h_ext`.
pub fn step_heun_with_h_ext(
    state: &VectorField,
    lattice: &Lattice,
    h_ext: &VectorField,
    params: &LLGParams,
    scratch: &mut HeunScratch,
) -> VectorField {
    let n = state.len();
    debug_assert_eq!(n, lattice.num_sites());
    debug_assert_eq!(scratch.ds.len(), n);
    let dt = params.dt;

    // predictor
    build_h_eff(state, lattice, h_ext, &mut scratch.h_eff, params.parallel);
    llg_rhs(state, &scratch.h_eff, &mut scratch.ds, params);
    {
        let ds = &scratch.ds.data;
        let s = &state.data;
        for_each_site(&mut scratch.state_prime.data, params.parallel, |i, out| {
            *out = normalize(add_scaled(s[i], dt, ds[i]));
        });
    }

    // corrector
    build_h_eff(
        &scratch.state_prime,
        lattice,
        h_ext,
        &mut scratch.h_eff,
        params.parallel,
    );
    llg_rhs(&scratch.state_prime, &scratch.h_eff, &mut scratch.ds_prime, params);

    let mut next = VectorField::zeros(n);
    {
        let ds = &scratch.ds.data;
        let ds_prime = &scratch.ds_prime.data;
        let s = &state.data;
        let half_dt = 0.5 * dt;
        for_each_site(&mut next.data, params.parallel, |i, out| {
            let sum = [
                ds[i][0] + ds_prime[i][0],
                ds[i][1] + ds_prime[i][1],
                ds[i][2] + ds_prime[i][2],
            ];
            *out = normalize(add_scaled(s[i], half_dt, sum));
        });
    }
    next
}

/// One stochastic Heun step reusing `scratch`.
///
/// `temperature` is per site; `magnetic` is the pre-multiplied external field.
pub fn step_heun<R: Rng + ?Sized>(
    rng: &mut R,
    state: &VectorField,
    lattice: &Lattice,
    temperature: &[f64],
    magnetic: &VectorField,
    params: &LLGParams,
    scratch: &mut HeunScratch,
) -> VectorField {
    let mut h_ext = std::mem::replace(&mut scratch.h_ext, VectorField::zeros(0));
    build_h_ext(rng, lattice, temperature, magnetic, params, &mut h_ext);
    let next = step_heun_with_h_ext(state, lattice, &h_ext, params, scratch);
    scratch.h_ext = h_ext;
    next
}

/// Advance `state` by one stochastic Heun step and return the new configuration.
pub fn integrate<R: Rng + ?Sized>(
    rng: &mut R,
    state: &VectorField,
    lattice: &Lattice,
    temperature: &[f64],
    magnetic: &VectorField,
    params: &LLGParams,
) -> VectorField {
    let mut scratch = HeunScratch::new(state.len());
    step_heun(rng, state, lattice, temperature, magnetic, params, &mut scratch)
}
