// src/effective_field/anisotropy.rs

use crate::effective_field::for_each_site;
use crate::vec3::dot;
use crate::vector_field::VectorField;

/// Add the per-site uniaxial anisotropy field.
///
/// For E_ani,i = -k_i (S_i·u_i)^2 we get:
///   H_ani,i = (2 k_i / μ_i) (S_i·u_i) u_i
pub fn add_anisotropy_field(
    state: &VectorField,
    mu: &[f64],
    k: &[f64],
    axes: &[[f64; 3]],
    h_eff: &mut VectorField,
    parallel: bool,
) {
    let s = &state.data;

    for_each_site(&mut h_eff.data, parallel, |i, h_i| {
        let u = axes[i];
        let coeff = 2.0 * k[i] * dot(s[i], u) / mu[i];
        h_i[0] += coeff * u[0];
        h_i[1] += coeff * u[1];
        h_i[2] += coeff * u[2];
    });
}

/// Anisotropy field for every site as a new field.
pub fn anisotropy_interaction_field(
    state: &VectorField,
    mu: &[f64],
    k: &[f64],
    axes: &[[f64; 3]],
) -> VectorField {
    let mut h = VectorField::zeros(state.len());
    add_anisotropy_field(state, mu, k, axes, &mut h, false);
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_projected_on_easy_axis() {
        let state = VectorField::from_vec(vec![[0.6, 0.0, 0.8], [1.0, 0.0, 0.0]]);
        let axes = [[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]];
        let h = anisotropy_interaction_field(&state, &[2.0, 1.0], &[5.0, 3.0], &axes);

        // 2 * 5 * 0.8 / 2 = 4
        assert!((h.data[0][2] - 4.0).abs() < 1e-12);
        assert_eq!(h.data[0][0], 0.0);
        // perpendicular spin feels no anisotropy field
        assert_eq!(h.data[1], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_mu_gives_non_finite_field() {
        let state = VectorField::from_vec(vec![[0.0, 0.0, 1.0]]);
        let h = anisotropy_interaction_field(&state, &[0.0], &[1.0], &[[0.0, 0.0, 1.0]]);
        assert_eq!(h.data[0][2], f64::INFINITY);
    }
}
