// src/effective_field/thermal.rs
//
// Stochastic (Langevin) field:
//   H_th,i = ξ_i · sqrt( 2 α k_B T_i / (γ μ_i Δt) ),   ξ_i ~ N(0, 1)^3
//
// This is the only random input of the whole model. Degenerate parameters are
// not checked: μ_i = 0, γ = 0 or Δt = 0 give ±inf rows, negative T_i, α, μ_i,
// γ or Δt give NaN rows. Callers see those values as-is.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::params::LLGParams;
use crate::vector_field::VectorField;

#[inline]
fn thermal_amplitude(temperature: f64, mu: f64, alpha: f64, dt: f64, gamma: f64, kb: f64) -> f64 {
    ((2.0 * kb * temperature * alpha) / (gamma * dt * mu)).sqrt()
}

/// Add a freshly sampled thermal field to `h`.
///
/// Draws 3 normals per site, in site order, so a seeded generator always
/// produces the same field regardless of the rayon pool.
pub fn add_thermal_field<R: Rng + ?Sized>(
    rng: &mut R,
    temperature: &[f64],
    mu: &[f64],
    params: &LLGParams,
    h: &mut VectorField,
) {
    debug_assert_eq!(temperature.len(), h.len());
    debug_assert_eq!(mu.len(), h.len());

    for ((h_i, &t_i), &mu_i) in h.data.iter_mut().zip(temperature).zip(mu) {
        let xi: [f64; 3] = [
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
        ];
        let amp = thermal_amplitude(t_i, mu_i, params.alpha, params.dt, params.gamma, params.kb);
        h_i[0] += xi[0] * amp;
        h_i[1] += xi[1] * amp;
        h_i[2] += xi[2] * amp;
    }
}

/// Thermal field for every site as a new field.
pub fn thermal_field<R: Rng + ?Sized>(
    rng: &mut R,
    temperature: &[f64],
    mu: &[f64],
    alpha: f64,
    dt: f64,
    gamma: f64,
    kb: f64,
) -> VectorField {
    let params = LLGParams {
        gamma,
        alpha,
        dt,
        kb,
        parallel: false,
    };
    let mut h = VectorField::zeros(mu.len());
    add_thermal_field(rng, temperature, mu, &params, &mut h);
    h
}
